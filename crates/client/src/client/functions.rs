//! Remote function invocation.

use async_trait::async_trait;
use eventdesk_core::storage::{RemoteFunctions, Result};
use serde_json::Value;

use super::StoreClient;
use crate::error::ClientError;

#[async_trait]
impl RemoteFunctions for StoreClient {
    async fn invoke(&self, name: &str, payload: Value) -> Result<Value> {
        let url = self.url(&format!("functions/v1/{}", urlencoding::encode(name)))?;
        let response = self
            .authorized(self.client.post(url))
            .json(&payload)
            .send()
            .await
            .map_err(ClientError::from)?;
        let status = response.status();
        if !status.is_success() {
            return Err(StoreClient::server_error(response).await.into());
        }
        // Functions may answer with an empty body.
        let body = response.text().await.map_err(ClientError::from)?;
        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&body).map_err(ClientError::from)?)
    }
}
