//! HTTP client for the hosted store.

pub mod functions;
pub mod storage;
pub mod tables;

use serde::de::DeserializeOwned;
use url::Url;

use crate::error::{ClientError, Result};

/// HTTP client for the hosted store's REST, storage and function endpoints.
#[derive(Debug, Clone)]
pub struct StoreClient {
    client: reqwest::Client,
    base_url: Url,
    api_key: String,
    bucket: String,
}

impl StoreClient {
    /// Create a new client for the project at `base_url`.
    ///
    /// Flyers are uploaded to `bucket`.
    pub fn new(base_url: &str, api_key: impl Into<String>, bucket: impl Into<String>) -> Result<Self> {
        let mut base_url = Url::parse(base_url)?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self {
            client: reqwest::Client::new(),
            base_url,
            api_key: api_key.into(),
            bucket: bucket.into(),
        })
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build a URL for an endpoint path relative to the project root.
    fn url(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path)?)
    }

    /// Attach the project key headers.
    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    /// Handle responses carrying a JSON body.
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();
        if status.is_success() {
            response.json().await.map_err(ClientError::from)
        } else {
            Err(Self::server_error(response).await)
        }
    }

    /// Handle responses with no body expected.
    async fn handle_empty_response(&self, response: reqwest::Response) -> Result<()> {
        if response.status().is_success() {
            Ok(())
        } else {
            Err(Self::server_error(response).await)
        }
    }

    async fn server_error(response: reqwest::Response) -> ClientError {
        let status = response.status().as_u16();
        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        tracing::debug!(status, message = %message, "Store request failed");
        ClientError::ServerError { status, message }
    }
}
