//! JSON output formatting.

use serde::Serialize;

use eventdesk_core::event::{Event, EventParticipants};

/// Format a value as JSON.
pub fn format_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_default()
}

/// An event as listed, with its resolved organizer display name.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListedEvent<'a> {
    #[serde(flatten)]
    pub event: &'a Event,
    pub organizer: String,
}

/// An event with its participant lists.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDetail<'a> {
    #[serde(flatten)]
    pub event: &'a Event,
    pub organizer: String,
    pub participants: &'a EventParticipants,
}
