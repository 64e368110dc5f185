//! Entity mappers between store rows and application entities.
//!
//! Link tables and categories map one-to-one through serde (with column
//! renames on the link types). Events need real mapping: the stored count is
//! nullable and signed, the cancelled flag is nullable, and the organizer kind
//! may be missing on rows written before it was stored.

use std::collections::HashSet;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::{RepositoryError, Result, Row};
use crate::event::{Event, EventDraft, OrganizerKind};

/// Column names shared by several tables.
pub mod columns {
    pub const ID: &str = "id";
    pub const EVENT_ID: &str = "event_id";
    pub const PARTICIPANT_ID: &str = "participant_id";
    pub const MEETING_CATEGORY_ID: &str = "commission_id";
    pub const CATEGORY_ID: &str = "category_id";
    pub const ATTENDANCE_TYPE: &str = "attendance_type";
    pub const NAME: &str = "name";
    pub const IS_CANCELLED: &str = "is_cancelled";
    pub const CREATED_AT: &str = "created_at";
    pub const CREATED_BY: &str = "created_by";
    pub const UPDATED_AT: &str = "updated_at";
    pub const UPDATED_BY: &str = "updated_by";
}

/// Encodes a value as a store row.
pub fn encode_row<T: Serialize>(value: &T) -> Result<Row> {
    match serde_json::to_value(value) {
        Ok(Value::Object(row)) => Ok(row),
        Ok(other) => Err(RepositoryError::Serialization(format!(
            "expected an object, got {}",
            other
        ))),
        Err(e) => Err(RepositoryError::Serialization(e.to_string())),
    }
}

/// Encodes a slice of values as store rows.
pub fn encode_rows<T: Serialize>(values: &[T]) -> Result<Vec<Row>> {
    values.iter().map(encode_row).collect()
}

/// Decodes a store row.
pub fn decode_row<T: DeserializeOwned>(row: Row) -> Result<T> {
    serde_json::from_value(Value::Object(row))
        .map_err(|e| RepositoryError::Serialization(e.to_string()))
}

/// Decodes store rows, failing on the first malformed row.
pub fn decode_rows<T: DeserializeOwned>(rows: Vec<Row>) -> Result<Vec<T>> {
    rows.into_iter().map(decode_row).collect()
}

/// An `events` row as stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRow {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    pub subject: String,
    #[serde(default)]
    pub organizer_kind: Option<OrganizerKind>,
    pub date: NaiveDate,
    #[serde(with = "crate::serde::time_of_day")]
    pub start_time: NaiveTime,
    #[serde(with = "crate::serde::time_of_day")]
    pub end_time: NaiveTime,
    #[serde(default, deserialize_with = "crate::serde::deserialize_optional_string")]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "crate::serde::deserialize_optional_string")]
    pub description: Option<String>,
    #[serde(default)]
    pub cost: Option<f64>,
    #[serde(default)]
    pub investment: Option<f64>,
    #[serde(default)]
    pub revenue: Option<f64>,
    #[serde(default, deserialize_with = "crate::serde::deserialize_optional_string")]
    pub flyer_url: Option<String>,
    #[serde(default)]
    pub external_participants_count: Option<i64>,
    #[serde(default)]
    pub is_cancelled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl EventRow {
    /// Builds the row written for a draft. The store generates the id.
    pub fn from_draft(draft: &EventDraft) -> Self {
        Self {
            id: None,
            subject: draft.subject.trim().to_string(),
            organizer_kind: Some(draft.organizer_type),
            date: draft.date,
            start_time: draft.start_time,
            end_time: draft.end_time,
            location: draft.location.clone(),
            description: draft.description.clone(),
            cost: draft.cost,
            investment: draft.investment,
            revenue: draft.revenue,
            flyer_url: draft.flyer_url.clone(),
            external_participants_count: Some(i64::from(draft.external_participants_count)),
            is_cancelled: Some(draft.is_cancelled),
            created_by: None,
            created_at: None,
            updated_by: None,
            updated_at: None,
        }
    }

    /// Converts a stored row into an [`Event`].
    ///
    /// `fallback_kind` is only consulted when the row has no stored organizer kind.
    pub fn into_event(self, fallback_kind: impl FnOnce(Uuid) -> OrganizerKind) -> Result<Event> {
        let id = self
            .id
            .ok_or_else(|| RepositoryError::InvalidData("event row without id".to_string()))?;
        let organizer_type = self.organizer_kind.unwrap_or_else(|| fallback_kind(id));
        let external_participants_count = self
            .external_participants_count
            .map(|count| u32::try_from(count.max(0)).unwrap_or(u32::MAX))
            .unwrap_or(0);

        Ok(Event {
            id,
            subject: self.subject,
            organizer_type,
            date: self.date,
            start_time: self.start_time,
            end_time: self.end_time,
            location: self.location,
            description: self.description,
            cost: self.cost,
            investment: self.investment,
            revenue: self.revenue,
            flyer_url: self.flyer_url,
            external_participants_count,
            is_cancelled: self.is_cancelled.unwrap_or(false),
            created_by: self.created_by,
            created_at: self.created_at,
            updated_by: self.updated_by,
            updated_at: self.updated_at,
        })
    }
}

/// Returns true if any row lacks a stored organizer kind.
pub fn needs_organizer_fallback(rows: &[EventRow]) -> bool {
    rows.iter().any(|row| row.organizer_kind.is_none())
}

/// Infers the organizer kind of an event from link table membership.
///
/// Meeting-category links win over category links. An event in neither set
/// defaults to [`OrganizerKind::MeetingCategory`].
pub fn infer_organizer_kind(
    event_id: Uuid,
    meeting_organized: &HashSet<Uuid>,
    category_organized: &HashSet<Uuid>,
) -> OrganizerKind {
    if meeting_organized.contains(&event_id) {
        OrganizerKind::MeetingCategory
    } else if category_organized.contains(&event_id) {
        OrganizerKind::Category
    } else {
        OrganizerKind::MeetingCategory
    }
}
