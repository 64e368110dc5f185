//! Mutation orchestrators.
//!
//! Each orchestrator validates its input, performs its store calls strictly in
//! sequence and invalidates the query keys it touched once every call has
//! succeeded. A failure part way through leaves earlier writes in place.

mod categories;
mod events;
mod flyer;

pub use categories::{
    assess_category_deletion, create_category, delete_category, rename_category,
    set_participant_meeting_categories,
};
pub use events::{
    create_complex_event, delete_complex_event, notify_event_attendees, set_event_cancelled,
    update_complex_event, NOTIFY_FUNCTION,
};
pub use flyer::attach_flyer;

use chrono::Utc;
use serde_json::json;

use eventdesk_core::storage::{columns, Row};

/// Audit columns stamped on every update.
fn updated_stamp(actor: &str) -> Row {
    let mut row = Row::new();
    row.insert(columns::UPDATED_BY.to_string(), json!(actor));
    row.insert(columns::UPDATED_AT.to_string(), json!(Utc::now().to_rfc3339()));
    row
}
