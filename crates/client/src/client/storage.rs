//! Object storage for flyers.

use async_trait::async_trait;
use eventdesk_core::storage::{ObjectHandle, ObjectStorage, Result};

use super::StoreClient;
use crate::error::ClientError;

fn object_path(bucket: &str, name: &str) -> String {
    format!(
        "{}/{}",
        urlencoding::encode(bucket),
        urlencoding::encode(name)
    )
}

#[async_trait]
impl ObjectStorage for StoreClient {
    async fn upload(&self, name: &str, content_type: &str, bytes: Vec<u8>) -> Result<ObjectHandle> {
        let url = self.url(&format!("storage/v1/object/{}", object_path(&self.bucket, name)))?;
        let response = self
            .authorized(self.client.post(url))
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .header("x-upsert", "true")
            .body(bytes)
            .send()
            .await
            .map_err(ClientError::from)?;
        self.handle_empty_response(response).await?;
        Ok(ObjectHandle {
            bucket: self.bucket.clone(),
            path: name.to_string(),
        })
    }

    fn public_url(&self, handle: &ObjectHandle) -> String {
        format!(
            "{}storage/v1/object/public/{}",
            self.base_url,
            object_path(&handle.bucket, &handle.path)
        )
    }
}
