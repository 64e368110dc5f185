use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::storage::Table;

/// Which link table holds an event's organizers.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum OrganizerKind {
    /// Organized by one or more meeting categories (`commissions`).
    #[default]
    MeetingCategory,
    /// Organized by one or more event categories.
    Category,
}

impl OrganizerKind {
    /// Returns the stored string value.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrganizerKind::MeetingCategory => "meeting_category",
            OrganizerKind::Category => "category",
        }
    }

    /// Returns the link table that holds organizers of this kind.
    pub fn link_table(&self) -> Table {
        match self {
            OrganizerKind::MeetingCategory => Table::EventOrganizingMeetingCategories,
            OrganizerKind::Category => Table::EventOrganizingCategories,
        }
    }

    /// Returns the category namespace organizers of this kind come from.
    pub fn category_kind(&self) -> CategoryKind {
        match self {
            OrganizerKind::MeetingCategory => CategoryKind::Meeting,
            OrganizerKind::Category => CategoryKind::Event,
        }
    }
}

impl std::str::FromStr for OrganizerKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "meeting_category" => Ok(OrganizerKind::MeetingCategory),
            "category" => Ok(OrganizerKind::Category),
            other => Err(format!("unknown organizer kind: {}", other)),
        }
    }
}

/// How an attendee took part in an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceType {
    InPerson,
    Online,
}

impl AttendanceType {
    /// Returns the stored string value.
    pub fn as_str(&self) -> &'static str {
        match self {
            AttendanceType::InPerson => "in_person",
            AttendanceType::Online => "online",
        }
    }
}

/// An organizational event as the application sees it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: Uuid,
    pub subject: String,
    pub organizer_type: OrganizerKind,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub location: Option<String>,
    pub description: Option<String>,
    pub cost: Option<f64>,
    pub investment: Option<f64>,
    pub revenue: Option<f64>,
    pub flyer_url: Option<String>,
    pub external_participants_count: u32,
    pub is_cancelled: bool,
    pub created_by: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_by: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// The two independent category namespaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryKind {
    /// Meeting categories, stored as `commissions`.
    Meeting,
    /// Event categories.
    Event,
}

impl CategoryKind {
    /// Returns the table holding categories of this kind.
    pub fn table(&self) -> Table {
        match self {
            CategoryKind::Meeting => Table::MeetingCategories,
            CategoryKind::Event => Table::EventCategories,
        }
    }

    /// Returns the organizer kind for events organized by this namespace.
    pub fn organizer_kind(&self) -> OrganizerKind {
        match self {
            CategoryKind::Meeting => OrganizerKind::MeetingCategory,
            CategoryKind::Event => OrganizerKind::Category,
        }
    }

    /// Human label used in messages.
    pub fn label(&self) -> &'static str {
        match self {
            CategoryKind::Meeting => "Meeting category",
            CategoryKind::Event => "Event category",
        }
    }
}

/// A meeting category or an event category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub created_by: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_by: Option<String>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Category {
    /// Creates a category with the given id and name (useful for testing).
    pub fn new(id: Uuid, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            created_by: None,
            created_at: None,
            updated_by: None,
            updated_at: None,
        }
    }
}

/// A meeting held by a meeting category.
///
/// Meetings are a hard dependency: a category with meetings cannot be deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meeting {
    pub id: Uuid,
    #[serde(rename = "commission_id")]
    pub meeting_category_id: Uuid,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

/// Organizer link to a meeting category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EventOrganizingMeetingCategory {
    pub event_id: Uuid,
    #[serde(rename = "commission_id")]
    pub meeting_category_id: Uuid,
}

/// Organizer link to an event category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EventOrganizingCategory {
    pub event_id: Uuid,
    pub category_id: Uuid,
}

/// A participant invited to an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EventInvitee {
    pub event_id: Uuid,
    pub participant_id: Uuid,
}

/// A participant recorded as having attended an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EventAttendee {
    pub event_id: Uuid,
    pub participant_id: Uuid,
    pub attendance_type: AttendanceType,
}

/// Membership of a participant in a meeting category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ParticipantMeetingCategory {
    pub participant_id: Uuid,
    #[serde(rename = "commission_id")]
    pub meeting_category_id: Uuid,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_organizer_kind_routes_to_link_table() {
        assert_eq!(
            OrganizerKind::MeetingCategory.link_table(),
            Table::EventOrganizingMeetingCategories
        );
        assert_eq!(
            OrganizerKind::Category.link_table(),
            Table::EventOrganizingCategories
        );
        assert_eq!(OrganizerKind::default(), OrganizerKind::MeetingCategory);
    }

    #[test]
    fn test_organizer_kind_from_str() {
        assert_eq!(
            "meeting_category".parse::<OrganizerKind>(),
            Ok(OrganizerKind::MeetingCategory)
        );
        assert_eq!("category".parse::<OrganizerKind>(), Ok(OrganizerKind::Category));
        assert!("committee".parse::<OrganizerKind>().is_err());
    }

    #[test]
    fn test_category_kind_round_trips_through_organizer_kind() {
        for kind in [CategoryKind::Meeting, CategoryKind::Event] {
            assert_eq!(kind.organizer_kind().category_kind(), kind);
        }
        assert_eq!(CategoryKind::Meeting.table(), Table::MeetingCategories);
    }

    #[test]
    fn test_meeting_category_links_use_commission_column() {
        let link = EventOrganizingMeetingCategory {
            event_id: Uuid::nil(),
            meeting_category_id: Uuid::nil(),
        };
        let value = serde_json::to_value(link).unwrap();
        assert!(value.get("commission_id").is_some());
        assert!(value.get("meeting_category_id").is_none());
    }

    #[test]
    fn test_attendee_decodes_attendance_type() {
        let id = Uuid::nil().to_string();
        let attendee: EventAttendee = serde_json::from_value(json!({
            "id": 7,
            "event_id": id,
            "participant_id": id,
            "attendance_type": "in_person"
        }))
        .unwrap();
        assert_eq!(attendee.attendance_type, AttendanceType::InPerson);
    }

    #[test]
    fn test_event_serializes_camel_case() {
        let event = Event {
            id: Uuid::nil(),
            subject: "Board".to_string(),
            organizer_type: OrganizerKind::Category,
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            start_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            location: None,
            description: None,
            cost: None,
            investment: None,
            revenue: None,
            flyer_url: None,
            external_participants_count: 0,
            is_cancelled: false,
            created_by: None,
            created_at: None,
            updated_by: None,
            updated_at: None,
        };
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["organizerType"], "category");
        assert_eq!(value["externalParticipantsCount"], 0);
    }
}
