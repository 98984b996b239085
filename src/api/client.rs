//! Policy API REST Client
//!
//! reqwest-backed implementation of [`DashboardApi`].

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

use super::dto::{
    AnomaliesResponse, AuthResponse, ClustersResponse, Comment, Credentials, EnrichResponse,
    FileRecord, HealthResponse, NewComment, Summary, UserProfile,
};
use super::error::{ClientError, ClientResult};
use super::DashboardApi;
use crate::config::ApiConfig;
use crate::state::{PendingUpload, Resource};

/// HTTP client for the policy analytics API
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
}

impl HttpClient {
    /// Create a client for `base_url`. `None` means requests never time out.
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> ClientResult<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(ClientError::Request)?;

        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { client, base_url })
    }

    /// Build from the `[api]` config section
    pub fn from_config(config: &ApiConfig) -> ClientResult<Self> {
        Self::new(&config.base_url, config.request_timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// GET a JSON resource, treating any non-success status as an error
    async fn get_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> ClientResult<T> {
        let response = request.send().await?;
        let response = Self::ensure_success(response).await?;
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// POST a form and decode the body whatever the status.
    ///
    /// Login, register and comment rejections come back as 4xx with a
    /// `{"detail": ...}` body that the caller needs to see.
    async fn post_form<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        token: Option<&str>,
    ) -> ClientResult<AuthResponse> {
        let mut request = self.client.post(self.url(path)).form(body);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        serde_json::from_str(&body).map_err(|e| {
            tracing::debug!(path, status = status.as_u16(), error = %e, "Undecodable form response");
            if status.is_success() {
                ClientError::Decode(e.to_string())
            } else {
                ClientError::Api {
                    status: status.as_u16(),
                    message: body,
                }
            }
        })
    }

    async fn ensure_success(response: Response) -> ClientResult<Response> {
        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        let message = match serde_json::from_str::<AuthResponse>(&text) {
            Ok(body) if body.detail.is_some() => body.detail_or(&text),
            _ => text,
        };

        Err(ClientError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl DashboardApi for HttpClient {
    async fn health(&self) -> ClientResult<HealthResponse> {
        tracing::debug!("GET /health");
        self.get_json(self.client.get(self.url("/health"))).await
    }

    async fn upload(&self, file: &PendingUpload) -> ClientResult<String> {
        tracing::debug!(file_name = %file.file_name, size = file.size, "POST /upload");

        let mut part = Part::bytes(file.bytes.clone()).file_name(file.file_name.clone());
        if let Some(content_type) = &file.content_type {
            part = part.mime_str(content_type).map_err(ClientError::Request)?;
        }
        let form = Form::new().part("file", part);

        let response = self
            .client
            .post(self.url("/upload"))
            .multipart(form)
            .send()
            .await?;
        let body = response.text().await?;

        // Normalise to compact JSON; a non-JSON body is a decode failure
        let value: serde_json::Value = serde_json::from_str(&body)?;
        Ok(value.to_string())
    }

    async fn list_files(&self) -> ClientResult<Vec<FileRecord>> {
        let path = Resource::Files.path();
        tracing::debug!(path, "GET listing");
        self.get_json(self.client.get(self.url(path))).await
    }

    async fn summary(&self) -> ClientResult<Summary> {
        let path = Resource::Summary.path();
        tracing::debug!(path, "GET listing");
        self.get_json(self.client.get(self.url(path))).await
    }

    async fn anomalies(&self) -> ClientResult<Vec<i64>> {
        let path = Resource::Anomalies.path();
        tracing::debug!(path, "GET listing");
        let response: AnomaliesResponse = self.get_json(self.client.get(self.url(path))).await?;
        Ok(response.anomalies)
    }

    async fn policy_clusters(&self) -> ClientResult<Vec<Vec<String>>> {
        let path = Resource::PolicyClusters.path();
        tracing::debug!(path, "GET listing");
        let response: ClustersResponse = self.get_json(self.client.get(self.url(path))).await?;
        Ok(response.clusters)
    }

    async fn enrich_topic(&self, query: &str) -> ClientResult<EnrichResponse> {
        let url = format!(
            "{}?q={}",
            self.url("/enrich/topic"),
            urlencoding::encode(query)
        );
        tracing::debug!(%url, "GET enrichment");
        self.get_json(self.client.get(url)).await
    }

    async fn login(&self, credentials: &Credentials) -> ClientResult<AuthResponse> {
        tracing::debug!(username = %credentials.username, "POST /login");
        self.post_form("/login", credentials, None).await
    }

    async fn register(&self, credentials: &Credentials) -> ClientResult<AuthResponse> {
        tracing::debug!(username = %credentials.username, "POST /register");
        self.post_form("/register", credentials, None).await
    }

    async fn me(&self, token: &str) -> ClientResult<UserProfile> {
        tracing::debug!("GET /me");
        self.get_json(self.client.get(self.url("/me")).bearer_auth(token))
            .await
    }

    async fn comments(&self, file_id: i64) -> ClientResult<Vec<Comment>> {
        tracing::debug!(file_id, "GET /comments");
        self.get_json(self.client.get(self.url(&format!("/comments/{}", file_id))))
            .await
    }

    async fn add_comment(&self, token: &str, comment: &NewComment) -> ClientResult<AuthResponse> {
        tracing::debug!(file_id = comment.file_id, "POST /comment");
        self.post_form("/comment", comment, Some(token)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_slash_trimmed() {
        let client = HttpClient::new("http://localhost:8000/", None).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8000");
        assert_eq!(
            client.url(Resource::Files.path()),
            "http://localhost:8000/files"
        );
    }

    #[test]
    fn test_from_config() {
        let config = ApiConfig::default();
        let client = HttpClient::from_config(&config).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8000");
    }
}
