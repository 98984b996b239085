//! Data Transfer Objects
//!
//! Request and response types for the policy analytics API.
//! These types are serialized/deserialized to/from JSON, except for the
//! form bodies which go out `application/x-www-form-urlencoded`.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

// ============================================
// HEALTH
// ============================================

/// `GET /health`
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct HealthResponse {
    pub status: String,
}

// ============================================
// UPLOAD
// ============================================

/// `error` field of an upload body such as `{"error": "Unsupported file type"}`
pub fn upload_error(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("error")
        .and_then(|e| e.as_str())
        .map(str::to_string)
}

// ============================================
// FILES
// ============================================

/// One uploaded file as listed by `GET /files`
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct FileRecord {
    pub id: i64,
    pub filename: String,
    /// Storage location (`s3://bucket/key` or `local://path`)
    #[serde(default)]
    pub file_url: Option<String>,
    #[serde(default)]
    pub content_type: Option<String>,
    #[serde(default)]
    pub upload_time: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    /// Policy snippets extracted by the backend, in server order
    #[serde(default)]
    pub policies: Vec<String>,
}

// ============================================
// ANALYTICS
// ============================================

/// `GET /analytics/summary`
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct Summary {
    #[serde(default)]
    pub total_files: u64,
    #[serde(default)]
    pub total_policies: u64,
    #[serde(default)]
    pub file_types: FileTypeCounts,
}

/// File type histogram that keeps the key order of the JSON object.
///
/// The pie chart segments must follow the server's order, so this is a list
/// of pairs rather than a hash map.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FileTypeCounts(pub Vec<(String, u64)>);

impl FileTypeCounts {
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, u64)> for FileTypeCounts {
    fn from_iter<I: IntoIterator<Item = (K, u64)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl Serialize for FileTypeCounts {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (k, v) in &self.0 {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for FileTypeCounts {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct CountsVisitor;

        impl<'de> Visitor<'de> for CountsVisitor {
            type Value = FileTypeCounts;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of file type to count")
            }

            fn visit_map<M: MapAccess<'de>>(self, mut access: M) -> Result<Self::Value, M::Error> {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((key, value)) = access.next_entry::<String, u64>()? {
                    entries.push((key, value));
                }
                Ok(FileTypeCounts(entries))
            }

            fn visit_unit<E>(self) -> Result<Self::Value, E> {
                Ok(FileTypeCounts::default())
            }
        }

        deserializer.deserialize_any(CountsVisitor)
    }
}

/// `GET /analytics/anomalies`
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AnomaliesResponse {
    #[serde(default)]
    pub anomalies: Vec<i64>,
}

/// `GET /analytics/policies`
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ClustersResponse {
    #[serde(default)]
    pub clusters: Vec<Vec<String>>,
}

// ============================================
// ENRICHMENT
// ============================================

/// One web result for a policy topic
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct EnrichmentResult {
    pub url: String,
    pub name: String,
    #[serde(default)]
    pub snippet: String,
}

/// `GET /enrich/topic?q=...`
///
/// The backend answers `{"error": ...}` with a 200 when its search key is
/// missing, so both fields are optional.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct EnrichResponse {
    #[serde(default)]
    pub results: Vec<EnrichmentResult>,
    #[serde(default)]
    pub error: Option<String>,
}

// ============================================
// AUTH
// ============================================

/// Form body for `POST /login` and `POST /register`
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

/// Any answer from the auth and comment endpoints.
///
/// Exactly one of `access_token`, `msg` or `detail` is normally present.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AuthResponse {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub msg: Option<String>,
    /// A string for handled errors, an array for request validation failures
    #[serde(default)]
    pub detail: Option<serde_json::Value>,
}

impl AuthResponse {
    /// Token from a successful login, ignoring empty strings
    pub fn token(&self) -> Option<&str> {
        self.access_token.as_deref().filter(|t| !t.is_empty())
    }

    /// Confirmation from a successful register or comment post
    pub fn message(&self) -> Option<&str> {
        self.msg.as_deref().filter(|m| !m.is_empty())
    }

    /// Server-provided failure reason, or `fallback`
    pub fn detail_or(&self, fallback: &str) -> String {
        match &self.detail {
            Some(serde_json::Value::String(s)) if !s.is_empty() => s.clone(),
            Some(serde_json::Value::Null) | None => fallback.to_string(),
            Some(serde_json::Value::String(_)) => fallback.to_string(),
            Some(other) => other.to_string(),
        }
    }
}

/// `GET /me`
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct UserProfile {
    pub username: String,
    #[serde(default)]
    pub role: Option<String>,
}

// ============================================
// COMMENTS
// ============================================

/// One entry of `GET /comments/{file_id}`
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Comment {
    pub user: String,
    #[serde(default)]
    pub timestamp: Option<String>,
    pub content: String,
    #[serde(default)]
    pub policy_text: Option<String>,
}

/// Form body for `POST /comment`
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NewComment {
    pub file_id: i64,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub policy_text: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_types_keep_server_order() {
        let summary: Summary = serde_json::from_str(
            r#"{"total_files": 5, "total_policies": 9, "file_types": {"pdf": 3, "docx": 2}}"#,
        )
        .unwrap();

        let keys: Vec<_> = summary.file_types.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["pdf", "docx"]);

        let reversed: Summary =
            serde_json::from_str(r#"{"file_types": {"docx": 2, "pdf": 3}}"#).unwrap();
        let keys: Vec<_> = reversed.file_types.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["docx", "pdf"]);
    }

    #[test]
    fn test_file_types_serialize_as_object() {
        let counts: FileTypeCounts = vec![("application/pdf", 1u64)].into_iter().collect();
        let json = serde_json::to_string(&counts).unwrap();
        assert_eq!(json, r#"{"application/pdf":1}"#);
    }

    #[test]
    fn test_file_record_nullable_fields() {
        let record: FileRecord = serde_json::from_str(
            r#"{"id": 4, "filename": "a.csv", "file_url": null, "summary": null, "policies": []}"#,
        )
        .unwrap();
        assert_eq!(record.id, 4);
        assert!(record.file_url.is_none());
        assert!(record.summary.is_none());
    }

    #[test]
    fn test_auth_detail_variants() {
        let string_detail: AuthResponse =
            serde_json::from_str(r#"{"detail": "Incorrect username or password"}"#).unwrap();
        assert_eq!(string_detail.detail_or("Auth failed"), "Incorrect username or password");

        let none: AuthResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(none.detail_or("Auth failed"), "Auth failed");

        let validation: AuthResponse =
            serde_json::from_str(r#"{"detail": [{"loc": ["body", "username"]}]}"#).unwrap();
        assert!(validation.detail_or("Auth failed").contains("username"));
    }

    #[test]
    fn test_empty_token_is_not_a_token() {
        let resp: AuthResponse = serde_json::from_str(r#"{"access_token": ""}"#).unwrap();
        assert!(resp.token().is_none());
    }

    #[test]
    fn test_upload_error() {
        assert_eq!(
            upload_error(r#"{"error":"Unsupported file type"}"#).as_deref(),
            Some("Unsupported file type")
        );
        assert_eq!(upload_error(r#"{"filename":"a.pdf"}"#), None);
        assert_eq!(upload_error("not json"), None);
    }

    #[test]
    fn test_new_comment_omits_missing_policy() {
        let body = NewComment {
            file_id: 1,
            content: "hi".to_string(),
            policy_text: None,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert!(json.get("policy_text").is_none());
    }
}
