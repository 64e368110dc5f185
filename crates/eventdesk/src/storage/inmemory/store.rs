//! In-memory store implementation.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::{json, Value};
use tokio::sync::RwLock;
use uuid::Uuid;

use eventdesk_core::storage::{
    columns, matches_all, Filter, ObjectHandle, ObjectStorage, RemoteFunctions, RepositoryError,
    Result, Row, Store, Table,
};

/// A store operation, as recorded in the call log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Select,
    Insert,
    Update,
    Delete,
}

impl Operation {
    pub fn is_write(&self) -> bool {
        !matches!(self, Operation::Select)
    }
}

#[derive(Debug, Clone)]
struct StoredObject {
    content_type: String,
    bytes: Vec<u8>,
}

/// In-memory storage backend for testing.
///
/// Generates ids and `created_at` like the hosted store does, records every
/// call, and can be told to fail specific operations.
/// Data is not persisted and will be lost when the store is dropped.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<RwLock<HashMap<Table, Vec<Row>>>>,
    calls: Arc<RwLock<Vec<(Operation, Table)>>>,
    failures: Arc<RwLock<HashSet<(Operation, Table)>>>,
    objects: Arc<RwLock<HashMap<String, StoredObject>>>,
    fail_uploads: Arc<RwLock<bool>>,
    invocations: Arc<RwLock<Vec<(String, Value)>>>,
}

impl InMemoryStore {
    /// Creates a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call made so far, in order.
    pub async fn calls(&self) -> Vec<(Operation, Table)> {
        self.calls.read().await.clone()
    }

    /// Number of insert, update and delete calls made so far.
    pub async fn write_count(&self) -> usize {
        self.calls
            .read()
            .await
            .iter()
            .filter(|(op, _)| op.is_write())
            .count()
    }

    pub async fn clear_calls(&self) {
        self.calls.write().await.clear();
    }

    /// Makes every future `operation` on `table` fail.
    pub async fn fail_on(&self, operation: Operation, table: Table) {
        self.failures.write().await.insert((operation, table));
    }

    /// Makes every future upload fail.
    pub async fn fail_uploads(&self) {
        *self.fail_uploads.write().await = true;
    }

    /// Current rows of a table, without recording a call.
    pub async fn rows(&self, table: Table) -> Vec<Row> {
        self.tables
            .read()
            .await
            .get(&table)
            .cloned()
            .unwrap_or_default()
    }

    /// Names of the uploaded objects.
    pub async fn object_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.objects.read().await.keys().cloned().collect();
        names.sort();
        names
    }

    /// Content type of an uploaded object.
    pub async fn object_content_type(&self, name: &str) -> Option<String> {
        self.objects
            .read()
            .await
            .get(name)
            .map(|o| o.content_type.clone())
    }

    /// Bytes of an uploaded object.
    pub async fn object_bytes(&self, name: &str) -> Option<Vec<u8>> {
        self.objects.read().await.get(name).map(|o| o.bytes.clone())
    }

    /// Remote function invocations, in order.
    pub async fn invocations(&self) -> Vec<(String, Value)> {
        self.invocations.read().await.clone()
    }

    async fn record(&self, operation: Operation, table: Table) -> Result<()> {
        self.calls.write().await.push((operation, table));
        if self.failures.read().await.contains(&(operation, table)) {
            return Err(RepositoryError::QueryFailed(format!(
                "injected failure on {:?} {}",
                operation, table
            )));
        }
        Ok(())
    }
}

fn has_audit_columns(table: Table) -> bool {
    matches!(
        table,
        Table::Events | Table::MeetingCategories | Table::EventCategories
    )
}

fn refuse_unfiltered(operation: &str, table: Table, filters: &[Filter]) -> Result<()> {
    if filters.is_empty() {
        return Err(RepositoryError::InvalidData(format!(
            "refusing to {} every row of {}",
            operation, table
        )));
    }
    Ok(())
}

#[async_trait]
impl Store for InMemoryStore {
    async fn select(&self, table: Table, filters: &[Filter]) -> Result<Vec<Row>> {
        self.record(Operation::Select, table).await?;
        let tables = self.tables.read().await;
        Ok(tables
            .get(&table)
            .map(|rows| {
                rows.iter()
                    .filter(|row| matches_all(filters, row))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn insert(&self, table: Table, rows: Vec<Row>) -> Result<Vec<Row>> {
        self.record(Operation::Insert, table).await?;
        let now = Utc::now().to_rfc3339();
        let inserted: Vec<Row> = rows
            .into_iter()
            .map(|mut row| {
                row.entry(columns::ID.to_string())
                    .or_insert_with(|| json!(Uuid::new_v4().to_string()));
                if has_audit_columns(table) {
                    row.entry(columns::CREATED_AT.to_string())
                        .or_insert_with(|| json!(now));
                }
                row
            })
            .collect();

        let mut tables = self.tables.write().await;
        tables
            .entry(table)
            .or_default()
            .extend(inserted.iter().cloned());
        Ok(inserted)
    }

    async fn update(&self, table: Table, patch: Row, filters: &[Filter]) -> Result<Vec<Row>> {
        self.record(Operation::Update, table).await?;
        refuse_unfiltered("update", table, filters)?;
        let mut tables = self.tables.write().await;
        let mut updated = Vec::new();
        for row in tables.entry(table).or_default().iter_mut() {
            if matches_all(filters, row) {
                for (column, value) in &patch {
                    row.insert(column.clone(), value.clone());
                }
                updated.push(row.clone());
            }
        }
        Ok(updated)
    }

    async fn delete(&self, table: Table, filters: &[Filter]) -> Result<()> {
        self.record(Operation::Delete, table).await?;
        refuse_unfiltered("delete", table, filters)?;
        let mut tables = self.tables.write().await;
        if let Some(rows) = tables.get_mut(&table) {
            rows.retain(|row| !matches_all(filters, row));
        }
        Ok(())
    }
}

#[async_trait]
impl ObjectStorage for InMemoryStore {
    async fn upload(&self, name: &str, content_type: &str, bytes: Vec<u8>) -> Result<ObjectHandle> {
        if *self.fail_uploads.read().await {
            return Err(RepositoryError::ConnectionFailed(
                "object storage unavailable".to_string(),
            ));
        }
        self.objects.write().await.insert(
            name.to_string(),
            StoredObject {
                content_type: content_type.to_string(),
                bytes,
            },
        );
        Ok(ObjectHandle {
            bucket: "memory".to_string(),
            path: name.to_string(),
        })
    }

    fn public_url(&self, handle: &ObjectHandle) -> String {
        format!("memory://{}/{}", handle.bucket, handle.path)
    }
}

#[async_trait]
impl RemoteFunctions for InMemoryStore {
    async fn invoke(&self, name: &str, payload: Value) -> Result<Value> {
        self.invocations
            .write()
            .await
            .push((name.to_string(), payload));
        Ok(json!({ "ok": true }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(value: Value) -> Row {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected a JSON object"),
        }
    }

    #[tokio::test]
    async fn test_insert_generates_id_and_created_at() {
        let store = InMemoryStore::new();
        let inserted = store
            .insert(Table::MeetingCategories, vec![row(json!({"name": "Finance"}))])
            .await
            .unwrap();

        assert_eq!(inserted.len(), 1);
        assert!(inserted[0].get("id").and_then(Value::as_str).is_some());
        assert!(inserted[0].contains_key("created_at"));
    }

    #[tokio::test]
    async fn test_link_rows_have_no_audit_columns() {
        let store = InMemoryStore::new();
        let inserted = store
            .insert(
                Table::EventInvitees,
                vec![row(json!({"event_id": "e", "participant_id": "p"}))],
            )
            .await
            .unwrap();
        assert!(!inserted[0].contains_key("created_at"));
    }

    #[tokio::test]
    async fn test_select_filters() {
        let store = InMemoryStore::new();
        store
            .insert(
                Table::EventAttendees,
                vec![
                    row(json!({"event_id": "e1", "participant_id": "p1", "attendance_type": "online"})),
                    row(json!({"event_id": "e1", "participant_id": "p2", "attendance_type": "in_person"})),
                    row(json!({"event_id": "e2", "participant_id": "p1", "attendance_type": "online"})),
                ],
            )
            .await
            .unwrap();

        let rows = store
            .select(
                Table::EventAttendees,
                &[
                    Filter::eq("event_id", "e1"),
                    Filter::is_in("participant_id", ["p1", "p3"]),
                ],
            )
            .await
            .unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["attendance_type"], "online");
    }

    #[tokio::test]
    async fn test_update_returns_affected_rows() {
        let store = InMemoryStore::new();
        store
            .insert(Table::EventCategories, vec![row(json!({"id": "c1", "name": "Old"}))])
            .await
            .unwrap();

        let updated = store
            .update(
                Table::EventCategories,
                row(json!({"name": "New"})),
                &[Filter::eq("id", "c1")],
            )
            .await
            .unwrap();
        assert_eq!(updated[0]["name"], "New");

        let none = store
            .update(
                Table::EventCategories,
                row(json!({"name": "Other"})),
                &[Filter::eq("id", "missing")],
            )
            .await
            .unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn test_unfiltered_delete_is_refused() {
        let store = InMemoryStore::new();
        store
            .insert(Table::Events, vec![row(json!({"subject": "Keep"}))])
            .await
            .unwrap();

        let result = store.delete(Table::Events, &[]).await;

        assert!(matches!(result, Err(RepositoryError::InvalidData(_))));
        assert_eq!(store.rows(Table::Events).await.len(), 1);
    }

    #[tokio::test]
    async fn test_injected_failure_is_recorded() {
        let store = InMemoryStore::new();
        store.fail_on(Operation::Insert, Table::EventInvitees).await;

        let result = store
            .insert(Table::EventInvitees, vec![row(json!({"event_id": "e"}))])
            .await;

        assert!(matches!(result, Err(RepositoryError::QueryFailed(_))));
        assert_eq!(
            store.calls().await,
            vec![(Operation::Insert, Table::EventInvitees)]
        );
        assert!(store.rows(Table::EventInvitees).await.is_empty());
    }

    #[tokio::test]
    async fn test_upload_and_public_url() {
        let store = InMemoryStore::new();
        let handle = store
            .upload("poster.png", "image/png", vec![1, 2, 3])
            .await
            .unwrap();

        assert_eq!(store.public_url(&handle), "memory://memory/poster.png");
        assert_eq!(
            store.object_content_type("poster.png").await.as_deref(),
            Some("image/png")
        );
    }

    #[tokio::test]
    async fn test_invocations_are_recorded() {
        let store = InMemoryStore::new();
        store
            .invoke("notify-event-attendees", json!({"eventId": "e1"}))
            .await
            .unwrap();

        let invocations = store.invocations().await;
        assert_eq!(invocations[0].0, "notify-event-attendees");
        assert_eq!(invocations[0].1["eventId"], "e1");
    }
}
