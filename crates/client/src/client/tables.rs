//! Table operations over the REST endpoint.

use async_trait::async_trait;
use eventdesk_core::storage::{Filter, RepositoryError, Result, Row, Store, Table};
use serde_json::Value;

use super::StoreClient;
use crate::error::ClientError;

/// Encodes a filter as a query pair: `column=eq.value` or `column=in.("a","b")`.
pub fn encode_filter(filter: &Filter) -> (String, String) {
    match filter {
        Filter::Eq { column, value } => (column.to_string(), format!("eq.{}", encode_value(value))),
        Filter::In { column, values } => {
            let quoted: Vec<String> = values
                .iter()
                .map(|v| format!("\"{}\"", encode_value(v).replace('"', "\\\"")))
                .collect();
            (column.to_string(), format!("in.({})", quoted.join(",")))
        }
    }
}

fn encode_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "null".to_string(),
        other => other.to_string(),
    }
}

fn encode_filters(filters: &[Filter]) -> Vec<(String, String)> {
    filters.iter().map(encode_filter).collect()
}

impl StoreClient {
    fn table_url(&self, table: Table) -> std::result::Result<url::Url, ClientError> {
        self.url(&format!("rest/v1/{}", table.name()))
    }
}

#[async_trait]
impl Store for StoreClient {
    async fn select(&self, table: Table, filters: &[Filter]) -> Result<Vec<Row>> {
        let mut query = vec![("select".to_string(), "*".to_string())];
        query.extend(encode_filters(filters));
        let response = self
            .authorized(self.client.get(self.table_url(table)?))
            .query(&query)
            .send()
            .await
            .map_err(ClientError::from)?;
        Ok(self.handle_response(response).await?)
    }

    async fn insert(&self, table: Table, rows: Vec<Row>) -> Result<Vec<Row>> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }
        let response = self
            .authorized(self.client.post(self.table_url(table)?))
            .header("Prefer", "return=representation")
            .json(&rows)
            .send()
            .await
            .map_err(ClientError::from)?;
        let inserted: Vec<Row> = self.handle_response(response).await?;
        tracing::trace!(table = %table, count = inserted.len(), "Inserted rows");
        Ok(inserted)
    }

    async fn update(&self, table: Table, patch: Row, filters: &[Filter]) -> Result<Vec<Row>> {
        if filters.is_empty() {
            return Err(RepositoryError::InvalidData(format!(
                "refusing to update every row of {}",
                table
            )));
        }
        let response = self
            .authorized(self.client.patch(self.table_url(table)?))
            .header("Prefer", "return=representation")
            .query(&encode_filters(filters))
            .json(&patch)
            .send()
            .await
            .map_err(ClientError::from)?;
        Ok(self.handle_response(response).await?)
    }

    async fn delete(&self, table: Table, filters: &[Filter]) -> Result<()> {
        if filters.is_empty() {
            return Err(RepositoryError::InvalidData(format!(
                "refusing to delete every row of {}",
                table
            )));
        }
        let response = self
            .authorized(self.client.delete(self.table_url(table)?))
            .query(&encode_filters(filters))
            .send()
            .await
            .map_err(ClientError::from)?;
        Ok(self.handle_empty_response(response).await?)
    }
}
