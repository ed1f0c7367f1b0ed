use super::auth::AuthContext;
use super::config::Config;
use super::error::ApiError;
use super::types::{
    Acknowledgement, Health, LoginResponse, MediaItem, MediaKind, MediaPage, MediaQuery,
    UploadRequest, UploadResponse,
};
use crate::gallery::archive::{BlobFetcher, FetchError};
use crate::gallery::upload::MediaUploader;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::json;
use std::time::Duration;

pub type Result<T> = std::result::Result<T, ApiError>;

/// HTTP client for the gallery REST API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    auth: AuthContext,
}

impl ApiClient {
    pub fn new(config: &Config, auth: AuthContext) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .build()?;
        log::debug!("api client for {}", config.base_url);
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            auth,
        })
    }
    pub fn auth(&self) -> &AuthContext {
        &self.auth
    }
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
    /// Resolves an endpoint path or a content location against the base URL.
    pub fn url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else {
            format!("{}/{}", self.base_url, path.trim_start_matches('/'))
        }
    }
    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        match self.auth.token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }
    fn require_token(&self) -> Result<()> {
        if self.auth.is_logged_in() {
            Ok(())
        } else {
            Err(ApiError::AuthRequired)
        }
    }
    async fn send_bytes(&self, builder: RequestBuilder, fallback: &str) -> Result<Vec<u8>> {
        let response = self.authorize(builder).send().await?;
        let status = response.status();
        let body = response.bytes().await?;
        if !status.is_success() {
            return Err(ApiError::from_response(status, &body, fallback));
        }
        Ok(body.to_vec())
    }
    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T> {
        let body = self.send_bytes(builder, "API Error").await?;
        Ok(serde_json::from_slice(&body)?)
    }

    pub async fn list_media(&self, query: &MediaQuery) -> Result<MediaPage> {
        log::debug!("list media: {query:?}");
        self.send(self.client.get(self.url("/media")).query(&query.params()))
            .await
    }
    pub async fn get_media(&self, id: &str) -> Result<MediaItem> {
        self.send(self.client.get(self.url(&format!("/media/{id}"))))
            .await
    }
    pub async fn upload(&self, request: UploadRequest) -> Result<Vec<MediaItem>> {
        self.require_token()?;
        let mut form = Form::new();
        for file in &request.files {
            let bytes = tokio::fs::read(&file.path).await?;
            let part = Part::bytes(bytes)
                .file_name(file.name.clone())
                .mime_str(&file.mime)?;
            form = form.part("files", part);
        }
        if let Some(caption) = request.caption.filter(|c| !c.is_empty()) {
            form = form.text("caption", caption);
        }
        log::debug!("upload {} files", request.files.len());
        let body = self
            .send_bytes(
                self.client.post(self.url("/media/upload")).multipart(form),
                "Upload Error",
            )
            .await?;
        Ok(serde_json::from_slice::<UploadResponse>(&body)?.media)
    }
    pub async fn update_caption(&self, id: &str, caption: &str) -> Result<MediaItem> {
        self.send(
            self.client
                .patch(self.url(&format!("/media/{id}/caption")))
                .json(&json!({ "caption": caption })),
        )
        .await
    }
    pub async fn delete_media(&self, id: &str) -> Result<Acknowledgement> {
        self.send(self.client.delete(self.url(&format!("/media/{id}"))))
            .await
    }
    /// Server-built archive of every item, optionally restricted to one kind.
    pub async fn download_zip(&self, kind: Option<MediaKind>) -> Result<Vec<u8>> {
        self.require_token()?;
        let mut builder = self.client.get(self.url("/media/download/zip"));
        if let Some(kind) = kind {
            builder = builder.query(&[("type", kind.as_str())]);
        }
        self.send_bytes(builder, "Download failed").await
    }
    pub async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>> {
        self.send_bytes(self.client.get(self.url(url)), "Download failed")
            .await
    }
    pub async fn login(&self, password: &str) -> Result<()> {
        let response: LoginResponse = self
            .send(
                self.client
                    .post(self.url("/admin/login"))
                    .json(&json!({ "password": password })),
            )
            .await?;
        if let Some(token) = response.token {
            self.auth.set_token(token);
        }
        Ok(())
    }
    /// Ends the session. The local token is dropped even if the request fails.
    pub async fn logout(&self) -> Result<Acknowledgement> {
        let result = self.send(self.client.post(self.url("/admin/logout"))).await;
        self.auth.clear();
        result
    }
    pub async fn health(&self) -> Result<Health> {
        self.send(self.client.get(self.url("/health"))).await
    }
}

impl BlobFetcher for ApiClient {
    async fn fetch(&self, url: &str) -> std::result::Result<Vec<u8>, FetchError> {
        self.fetch_bytes(url)
            .await
            .map_err(|source| FetchError::new(url, source))
    }
}

impl MediaUploader for ApiClient {
    async fn upload(&self, request: UploadRequest) -> Result<Vec<MediaItem>> {
        ApiClient::upload(self, request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base_url: &str) -> ApiClient {
        let config = Config {
            base_url: base_url.to_string(),
            ..Default::default()
        };
        ApiClient::new(&config, AuthContext::default()).expect("failed to build client")
    }

    #[test]
    fn resolve_urls() {
        let client = client("https://gallery.test/api/");
        assert_eq!(client.base_url(), "https://gallery.test/api");
        assert_eq!(client.url("/media"), "https://gallery.test/api/media");
        assert_eq!(client.url("media/1"), "https://gallery.test/api/media/1");
        assert_eq!(
            client.url("https://cdn.test/a.jpg"),
            "https://cdn.test/a.jpg"
        );
    }

    #[tokio::test]
    async fn refuse_without_token() {
        let client = client("http://127.0.0.1:9");
        let request = UploadRequest {
            files: Vec::new(),
            caption: None,
        };
        assert!(matches!(
            client.upload(request).await,
            Err(ApiError::AuthRequired)
        ));
        assert!(matches!(
            client.download_zip(None).await,
            Err(ApiError::AuthRequired)
        ));
    }

    #[tokio::test]
    async fn logout_clears_token_on_failure() {
        let client = client("http://127.0.0.1:9");
        client.auth().set_token(String::from("t"));
        assert!(client.logout().await.is_err());
        assert!(!client.auth().is_logged_in());
    }
}
