use async_trait::async_trait;
use serde_json::Value;

use super::{Filter, ObjectHandle, Result, Row, Table};

/// Generic per-table access to the hosted relational store.
///
/// Every call is atomic on its own table. Nothing spans tables.
#[async_trait]
pub trait Store: Send + Sync {
    /// Reads every row of a table matching all filters.
    async fn select(&self, table: Table, filters: &[Filter]) -> Result<Vec<Row>>;

    /// Inserts rows and returns them as stored, in insertion order, with
    /// generated columns filled in.
    async fn insert(&self, table: Table, rows: Vec<Row>) -> Result<Vec<Row>>;

    /// Applies a patch to every row matching all filters and returns the
    /// affected rows.
    async fn update(&self, table: Table, patch: Row, filters: &[Filter]) -> Result<Vec<Row>>;

    /// Deletes every row matching all filters.
    ///
    /// Implementations refuse an empty filter list.
    async fn delete(&self, table: Table, filters: &[Filter]) -> Result<()>;
}

/// Object storage used for event flyers.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Uploads a named blob.
    async fn upload(&self, name: &str, content_type: &str, bytes: Vec<u8>) -> Result<ObjectHandle>;

    /// Returns the durable public URL for an uploaded object.
    fn public_url(&self, handle: &ObjectHandle) -> String;
}

/// Named side-effecting functions hosted next to the store.
#[async_trait]
pub trait RemoteFunctions: Send + Sync {
    /// Invokes a function with a JSON payload and returns its JSON response.
    async fn invoke(&self, name: &str, payload: Value) -> Result<Value>;
}
