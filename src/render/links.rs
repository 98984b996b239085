//! Storage Links
//!
//! Turns backend storage locations into URLs a browser can open.

use serde::{Deserialize, Serialize};

use crate::api::dto::FileRecord;

/// Public endpoint for `s3://` locations
pub const DEFAULT_S3_PUBLIC_BASE: &str = "https://s3.amazonaws.com/";

/// Root for `local://` locations
pub const DEFAULT_LOCAL_ROOT: &str = "/";

/// Rewrite rules for storage URLs. Nothing checks that the result is reachable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageLinks {
    pub s3_public_base: String,
    pub local_root: String,
}

impl Default for StorageLinks {
    fn default() -> Self {
        Self {
            s3_public_base: DEFAULT_S3_PUBLIC_BASE.to_string(),
            local_root: DEFAULT_LOCAL_ROOT.to_string(),
        }
    }
}

impl StorageLinks {
    pub fn new(s3_public_base: impl Into<String>, local_root: impl Into<String>) -> Self {
        Self {
            s3_public_base: s3_public_base.into(),
            local_root: local_root.into(),
        }
    }

    /// `s3://bucket/key` and `local://path` become HTTP paths; anything else
    /// is returned as is.
    pub fn rewrite(&self, url: &str) -> String {
        if let Some(rest) = url.strip_prefix("s3://") {
            join(&self.s3_public_base, rest)
        } else if let Some(rest) = url.strip_prefix("local://") {
            join(&self.local_root, rest)
        } else {
            url.to_string()
        }
    }

    /// Display link for a listed file, `None` when it has no location
    pub fn file_link(&self, file: &FileRecord) -> Option<String> {
        file.file_url
            .as_deref()
            .filter(|u| !u.is_empty())
            .map(|u| self.rewrite(u))
    }
}

/// Rewrite with the default rules
pub fn display_url(url: &str) -> String {
    StorageLinks::default().rewrite(url)
}

fn join(base: &str, rest: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        rest.trim_start_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_s3_rewrite() {
        assert_eq!(
            display_url("s3://bucket/key.pdf"),
            "https://s3.amazonaws.com/bucket/key.pdf"
        );
    }

    #[test]
    fn test_local_rewrite() {
        assert_eq!(display_url("local://uploads/x.pdf"), "/uploads/x.pdf");
    }

    #[test]
    fn test_other_urls_untouched() {
        assert_eq!(
            display_url("https://cdn.example.com/a.pdf"),
            "https://cdn.example.com/a.pdf"
        );
        assert_eq!(display_url("uploads/s3://x"), "uploads/s3://x");
    }

    #[test]
    fn test_custom_bases() {
        let links = StorageLinks::new("https://files.example.org", "/static/");
        assert_eq!(
            links.rewrite("s3://b/k.docx"),
            "https://files.example.org/b/k.docx"
        );
        assert_eq!(links.rewrite("local://u/x.csv"), "/static/u/x.csv");
    }

    #[test]
    fn test_file_link_missing() {
        let mut file = FileRecord {
            id: 1,
            filename: "a.pdf".to_string(),
            file_url: None,
            content_type: None,
            upload_time: None,
            summary: None,
            policies: vec![],
        };
        let links = StorageLinks::default();
        assert_eq!(links.file_link(&file), None);

        file.file_url = Some("local://uploads/a.pdf".to_string());
        assert_eq!(links.file_link(&file).as_deref(), Some("/uploads/a.pdf"));
    }
}
