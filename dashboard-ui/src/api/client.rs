//! HTTP API Client
//!
//! `fetch`-backed implementation of [`DashboardApi`] for the browser.

use async_trait::async_trait;
use gloo_net::http::{Request, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use wasm_bindgen::JsValue;

use policy_dashboard::api::dto::{
    AnomaliesResponse, AuthResponse, ClustersResponse, Comment, Credentials, EnrichResponse,
    FileRecord, HealthResponse, NewComment, Summary, UserProfile,
};
use policy_dashboard::{ClientError, ClientResult, DashboardApi, PendingUpload, Resource};

/// Default API base URL
pub const DEFAULT_API_BASE: &str = "http://localhost:8000";

const API_URL_KEY: &str = "policy_dashboard_api_url";

/// Get the API base URL from local storage or use default
pub fn get_api_base() -> String {
    let url = web_sys::window()
        .and_then(|window| window.local_storage().ok().flatten())
        .and_then(|storage| storage.get_item(API_URL_KEY).ok().flatten())
        .unwrap_or_else(|| DEFAULT_API_BASE.to_string());
    url.trim_end_matches('/').to_string()
}

/// Set the API base URL in local storage
pub fn set_api_base(url: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(Some(storage)) = window.local_storage() {
            let _ = storage.set_item(API_URL_KEY, url);
        }
    }
}

/// `application/x-www-form-urlencoded` body
fn form_body(pairs: &[(&str, &str)]) -> String {
    pairs
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Multipart body with the selected file under field `file`
fn upload_form(file: &PendingUpload) -> Result<web_sys::FormData, JsValue> {
    let parts = js_sys::Array::of1(&js_sys::Uint8Array::from(file.bytes.as_slice()));
    let options = web_sys::BlobPropertyBag::new();
    if let Some(content_type) = &file.content_type {
        options.set_type(content_type);
    }
    let blob = web_sys::Blob::new_with_u8_array_sequence_and_options(&parts, &options)?;

    let form = web_sys::FormData::new()?;
    form.append_with_blob_and_filename("file", &blob, &file.file_name)?;
    Ok(form)
}

fn transport(e: gloo_net::Error) -> ClientError {
    ClientError::Transport(e.to_string())
}

fn js_error(e: JsValue) -> ClientError {
    ClientError::Transport(e.as_string().unwrap_or_else(|| format!("{:?}", e)))
}

/// Client bound to the API base URL stored in the browser
#[derive(Debug, Clone)]
pub struct GlooClient {
    base_url: String,
}

impl GlooClient {
    pub fn from_storage() -> Self {
        Self {
            base_url: get_api_base(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// GET a JSON resource; non-2xx is an error
    async fn get_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> ClientResult<T> {
        let response = request.send().await.map_err(transport)?;
        let response = Self::ensure_success(response).await?;
        response
            .json()
            .await
            .map_err(|e| ClientError::Decode(e.to_string()))
    }

    /// POST a form and decode the body whatever the status; rejections
    /// arrive as 4xx with a `detail` body
    async fn post_form(
        &self,
        path: &str,
        pairs: &[(&str, &str)],
        token: Option<&str>,
    ) -> ClientResult<AuthResponse> {
        let mut builder = Request::post(&self.url(path))
            .header("Content-Type", "application/x-www-form-urlencoded");
        if let Some(token) = token {
            builder = builder.header("Authorization", &format!("Bearer {}", token));
        }

        let response = builder
            .body(form_body(pairs))
            .map_err(transport)?
            .send()
            .await
            .map_err(transport)?;
        let status = response.status();
        let ok = response.ok();
        let text = response.text().await.map_err(transport)?;

        serde_json::from_str(&text).map_err(|e| {
            if ok {
                ClientError::Decode(e.to_string())
            } else {
                ClientError::Api {
                    status,
                    message: text,
                }
            }
        })
    }

    async fn ensure_success(response: Response) -> ClientResult<Response> {
        if response.ok() {
            return Ok(response);
        }

        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        let message = match serde_json::from_str::<AuthResponse>(&text) {
            Ok(body) if body.detail.is_some() => body.detail_or(&text),
            _ => text,
        };
        Err(ClientError::Api { status, message })
    }
}

#[async_trait(?Send)]
impl DashboardApi for GlooClient {
    async fn health(&self) -> ClientResult<HealthResponse> {
        self.get_json(Request::get(&self.url("/health"))).await
    }

    async fn upload(&self, file: &PendingUpload) -> ClientResult<String> {
        let form = upload_form(file).map_err(js_error)?;
        let response = Request::post(&self.url("/upload"))
            .body(form)
            .map_err(transport)?
            .send()
            .await
            .map_err(transport)?;

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| ClientError::Decode(e.to_string()))?;
        Ok(body.to_string())
    }

    async fn list_files(&self) -> ClientResult<Vec<FileRecord>> {
        self.get_json(Request::get(&self.url(Resource::Files.path())))
            .await
    }

    async fn summary(&self) -> ClientResult<Summary> {
        self.get_json(Request::get(&self.url(Resource::Summary.path())))
            .await
    }

    async fn anomalies(&self) -> ClientResult<Vec<i64>> {
        let response: AnomaliesResponse = self
            .get_json(Request::get(&self.url(Resource::Anomalies.path())))
            .await?;
        Ok(response.anomalies)
    }

    async fn policy_clusters(&self) -> ClientResult<Vec<Vec<String>>> {
        let response: ClustersResponse = self
            .get_json(Request::get(&self.url(Resource::PolicyClusters.path())))
            .await?;
        Ok(response.clusters)
    }

    async fn enrich_topic(&self, query: &str) -> ClientResult<EnrichResponse> {
        let url = format!(
            "{}?q={}",
            self.url("/enrich/topic"),
            urlencoding::encode(query)
        );
        self.get_json(Request::get(&url)).await
    }

    async fn login(&self, credentials: &Credentials) -> ClientResult<AuthResponse> {
        let pairs = [
            ("username", credentials.username.as_str()),
            ("password", credentials.password.as_str()),
        ];
        self.post_form("/login", &pairs, None).await
    }

    async fn register(&self, credentials: &Credentials) -> ClientResult<AuthResponse> {
        let pairs = [
            ("username", credentials.username.as_str()),
            ("password", credentials.password.as_str()),
        ];
        self.post_form("/register", &pairs, None).await
    }

    async fn me(&self, token: &str) -> ClientResult<UserProfile> {
        self.get_json(
            Request::get(&self.url("/me")).header("Authorization", &format!("Bearer {}", token)),
        )
        .await
    }

    async fn comments(&self, file_id: i64) -> ClientResult<Vec<Comment>> {
        self.get_json(Request::get(&self.url(&format!("/comments/{}", file_id))))
            .await
    }

    async fn add_comment(&self, token: &str, comment: &NewComment) -> ClientResult<AuthResponse> {
        let file_id = comment.file_id.to_string();
        let mut pairs = vec![("file_id", file_id.as_str()), ("content", comment.content.as_str())];
        if let Some(policy) = comment.policy_text.as_deref() {
            pairs.push(("policy_text", policy));
        }
        self.post_form("/comment", &pairs, Some(token)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_body_encoding() {
        let body = form_body(&[("username", "ann lee"), ("password", "p&ss=1")]);
        assert_eq!(body, "username=ann%20lee&password=p%26ss%3D1");
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod browser_tests {
    use super::*;
    use wasm_bindgen::JsCast;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_upload_form_carries_file_bytes() {
        let upload = PendingUpload::new("report.pdf", b"%PDF-1.4".to_vec());
        let form = upload_form(&upload).unwrap();

        let file: web_sys::File = form.get("file").dyn_into().unwrap();
        assert_eq!(file.name(), "report.pdf");
        assert_eq!(file.size() as u64, upload.size);
        assert_eq!(file.type_(), "application/pdf");
    }
}
