use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::event::{CategoryKind, OrganizerKind};
use crate::storage::Table;

/// How quickly a cached collection goes stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Volatility {
    /// Edited during normal work (events and their links).
    Volatile,
    /// Edited rarely (categories and memberships).
    Reference,
}

/// Freshness windows per volatility class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Freshness {
    pub volatile: Duration,
    pub reference: Duration,
}

impl Freshness {
    pub const DEFAULT_VOLATILE: Duration = Duration::from_secs(5 * 60);
    pub const DEFAULT_REFERENCE: Duration = Duration::from_secs(30 * 60);

    /// Returns the window for a volatility class.
    pub fn window(&self, volatility: Volatility) -> Duration {
        match volatility {
            Volatility::Volatile => self.volatile,
            Volatility::Reference => self.reference,
        }
    }
}

impl Default for Freshness {
    fn default() -> Self {
        Self {
            volatile: Self::DEFAULT_VOLATILE,
            reference: Self::DEFAULT_REFERENCE,
        }
    }
}

/// Cached full-table collections.
///
/// Every accessor caches under exactly one key and every mutation names the
/// keys it invalidates, so the registry is closed over this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryKey {
    Events,
    MeetingCategories,
    EventCategories,
    EventOrganizingMeetingCategories,
    EventOrganizingCategories,
    EventInvitees,
    EventAttendees,
    ParticipantMeetingCategories,
    Meetings,
}

impl QueryKey {
    /// Every key, in a stable order.
    pub const ALL: [QueryKey; 9] = [
        QueryKey::Events,
        QueryKey::MeetingCategories,
        QueryKey::EventCategories,
        QueryKey::EventOrganizingMeetingCategories,
        QueryKey::EventOrganizingCategories,
        QueryKey::EventInvitees,
        QueryKey::EventAttendees,
        QueryKey::ParticipantMeetingCategories,
        QueryKey::Meetings,
    ];

    /// Keys touched by any event mutation.
    pub const EVENT_GRAPH: [QueryKey; 5] = [
        QueryKey::Events,
        QueryKey::EventOrganizingMeetingCategories,
        QueryKey::EventOrganizingCategories,
        QueryKey::EventInvitees,
        QueryKey::EventAttendees,
    ];

    /// Returns the stable cache key name.
    pub fn name(&self) -> &'static str {
        match self {
            QueryKey::Events => "events",
            QueryKey::MeetingCategories => "meeting-categories",
            QueryKey::EventCategories => "event-categories",
            QueryKey::EventOrganizingMeetingCategories => "event-organizing-meeting-categories",
            QueryKey::EventOrganizingCategories => "event-organizing-categories",
            QueryKey::EventInvitees => "event-invitees",
            QueryKey::EventAttendees => "event-attendees",
            QueryKey::ParticipantMeetingCategories => "participant-meeting-categories",
            QueryKey::Meetings => "meetings",
        }
    }

    /// Returns the table the collection is read from.
    pub fn table(&self) -> Table {
        match self {
            QueryKey::Events => Table::Events,
            QueryKey::MeetingCategories => Table::MeetingCategories,
            QueryKey::EventCategories => Table::EventCategories,
            QueryKey::EventOrganizingMeetingCategories => Table::EventOrganizingMeetingCategories,
            QueryKey::EventOrganizingCategories => Table::EventOrganizingCategories,
            QueryKey::EventInvitees => Table::EventInvitees,
            QueryKey::EventAttendees => Table::EventAttendees,
            QueryKey::ParticipantMeetingCategories => Table::ParticipantMeetingCategories,
            QueryKey::Meetings => Table::Meetings,
        }
    }

    pub fn volatility(&self) -> Volatility {
        match self {
            QueryKey::MeetingCategories
            | QueryKey::EventCategories
            | QueryKey::ParticipantMeetingCategories => Volatility::Reference,
            _ => Volatility::Volatile,
        }
    }

    /// Key holding the categories of a namespace.
    pub fn categories(kind: CategoryKind) -> Self {
        match kind {
            CategoryKind::Meeting => QueryKey::MeetingCategories,
            CategoryKind::Event => QueryKey::EventCategories,
        }
    }

    /// Key holding the organizer links of a kind.
    pub fn organizer_links(kind: OrganizerKind) -> Self {
        match kind {
            OrganizerKind::MeetingCategory => QueryKey::EventOrganizingMeetingCategories,
            OrganizerKind::Category => QueryKey::EventOrganizingCategories,
        }
    }
}

impl std::fmt::Display for QueryKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
