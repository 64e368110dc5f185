//! Input types for event mutations.
//!
//! Following the Functional Core pattern, these are pure data types with no I/O.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::schedule::ScheduleEntry;
use super::types::{Event, OrganizerKind};

/// Scalar fields of an event as entered in the create wizard or edit form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDraft {
    pub subject: String,
    pub organizer_type: OrganizerKind,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub cost: Option<f64>,
    #[serde(default)]
    pub investment: Option<f64>,
    #[serde(default)]
    pub revenue: Option<f64>,
    #[serde(default)]
    pub flyer_url: Option<String>,
    #[serde(default)]
    pub external_participants_count: u32,
    #[serde(default)]
    pub is_cancelled: bool,
}

impl EventDraft {
    /// Creates a draft with only the required fields.
    pub fn new(
        subject: impl Into<String>,
        organizer_type: OrganizerKind,
        date: NaiveDate,
        start_time: NaiveTime,
        end_time: NaiveTime,
    ) -> Self {
        Self {
            subject: subject.into(),
            organizer_type,
            date,
            start_time,
            end_time,
            location: None,
            description: None,
            cost: None,
            investment: None,
            revenue: None,
            flyer_url: None,
            external_participants_count: 0,
            is_cancelled: false,
        }
    }

    /// Set the location.
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the financial fields.
    pub fn with_finances(
        mut self,
        cost: Option<f64>,
        investment: Option<f64>,
        revenue: Option<f64>,
    ) -> Self {
        self.cost = cost;
        self.investment = investment;
        self.revenue = revenue;
        self
    }

    /// Set the number of participants who are not registered in the system.
    pub fn with_external_participants(mut self, count: u32) -> Self {
        self.external_participants_count = count;
        self
    }

    /// Returns a copy of this draft placed on a schedule entry.
    pub fn for_schedule(&self, entry: &ScheduleEntry) -> Self {
        Self {
            date: entry.date,
            start_time: entry.start_time,
            end_time: entry.end_time,
            ..self.clone()
        }
    }

    /// Builds the edit form draft for an existing event.
    pub fn from_event(event: &Event) -> Self {
        Self {
            subject: event.subject.clone(),
            organizer_type: event.organizer_type,
            date: event.date,
            start_time: event.start_time,
            end_time: event.end_time,
            location: event.location.clone(),
            description: event.description.clone(),
            cost: event.cost,
            investment: event.investment,
            revenue: event.revenue,
            flyer_url: event.flyer_url.clone(),
            external_participants_count: event.external_participants_count,
            is_cancelled: event.is_cancelled,
        }
    }
}

/// The people and categories attached to an event.
///
/// Organizer ids refer to meeting categories or event categories depending on
/// the draft's [`OrganizerKind`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventParticipants {
    #[serde(default)]
    pub organizer_ids: Vec<Uuid>,
    #[serde(default)]
    pub invitee_ids: Vec<Uuid>,
    #[serde(default)]
    pub attendee_in_person_ids: Vec<Uuid>,
    #[serde(default)]
    pub attendee_online_ids: Vec<Uuid>,
}

impl EventParticipants {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_organizers(mut self, ids: impl IntoIterator<Item = Uuid>) -> Self {
        self.organizer_ids = ids.into_iter().collect();
        self
    }

    pub fn with_invitees(mut self, ids: impl IntoIterator<Item = Uuid>) -> Self {
        self.invitee_ids = ids.into_iter().collect();
        self
    }

    pub fn with_in_person_attendees(mut self, ids: impl IntoIterator<Item = Uuid>) -> Self {
        self.attendee_in_person_ids = ids.into_iter().collect();
        self
    }

    pub fn with_online_attendees(mut self, ids: impl IntoIterator<Item = Uuid>) -> Self {
        self.attendee_online_ids = ids.into_iter().collect();
        self
    }
}

/// A flyer image picked in the wizard, not yet uploaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlyerUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl FlyerUpload {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    /// Returns a collision-free object name for this upload.
    ///
    /// Path separators and spaces in the original file name are replaced.
    pub fn object_name(&self, prefix: Uuid) -> String {
        let sanitized: String = self
            .file_name
            .chars()
            .map(|c| match c {
                '/' | '\\' | ' ' => '_',
                c => c,
            })
            .collect();
        format!("{}-{}", prefix, sanitized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> EventDraft {
        EventDraft::new(
            "Annual assembly",
            OrganizerKind::MeetingCategory,
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
        )
        .with_location("Main hall")
        .with_finances(Some(100.0), None, Some(250.0))
    }

    #[test]
    fn test_for_schedule_overrides_only_date_and_times() {
        let entry = ScheduleEntry::new(
            NaiveDate::from_ymd_opt(2024, 2, 2).unwrap(),
            NaiveTime::from_hms_opt(14, 0, 0).unwrap(),
            NaiveTime::from_hms_opt(16, 0, 0).unwrap(),
        )
        .unwrap();

        let placed = draft().for_schedule(&entry);

        assert_eq!(placed.date, entry.date);
        assert_eq!(placed.start_time, entry.start_time);
        assert_eq!(placed.end_time, entry.end_time);
        assert_eq!(placed.subject, "Annual assembly");
        assert_eq!(placed.location.as_deref(), Some("Main hall"));
        assert_eq!(placed.revenue, Some(250.0));
    }

    #[test]
    fn test_participants_builder() {
        let a = Uuid::new_v4();
        let participants = EventParticipants::new()
            .with_organizers([a])
            .with_online_attendees([a]);
        assert_eq!(participants.organizer_ids, vec![a]);
        assert!(participants.invitee_ids.is_empty());
        assert_eq!(participants.attendee_online_ids, vec![a]);
    }

    #[test]
    fn test_flyer_object_name_is_sanitized() {
        let upload = FlyerUpload::new("my flyer/v2.png", "image/png", vec![1, 2, 3]);
        let name = upload.object_name(Uuid::nil());
        assert_eq!(name, "00000000-0000-0000-0000-000000000000-my_flyer_v2.png");
    }
}
