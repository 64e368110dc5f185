use uuid::Uuid;

use super::error::{CategoryError, Result};
use crate::event::{
    CategoryKind, EventOrganizingCategory, EventOrganizingMeetingCategory, Meeting,
    ParticipantMeetingCategory,
};

const MAX_NAME_LEN: usize = 100;

/// Validates and normalizes a category name.
///
/// Returns the trimmed name.
pub fn validate_category_name(name: &str) -> Result<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(CategoryError::EmptyName);
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(CategoryError::NameTooLong(MAX_NAME_LEN));
    }
    Ok(name.to_string())
}

/// Rows depending on a category that is about to be deleted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeletionImpact {
    /// Meetings held by the category. Any blocks deletion.
    pub meetings: usize,
    /// Events organized by the category. Their links are dropped.
    pub events: usize,
    /// Participants belonging to the category. Their links are dropped.
    pub participants: usize,
}

/// Outcome of a deletion guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeletionVerdict {
    Allowed,
    /// Deletion proceeds and drops the dependent link rows.
    AllowedWithWarning { events: usize, participants: usize },
    Blocked { meetings: usize },
}

impl DeletionImpact {
    /// Counts the dependents of a meeting category.
    pub fn for_meeting_category(
        category_id: Uuid,
        meetings: &[Meeting],
        organizer_links: &[EventOrganizingMeetingCategory],
        participant_links: &[ParticipantMeetingCategory],
    ) -> Self {
        Self {
            meetings: meetings
                .iter()
                .filter(|m| m.meeting_category_id == category_id)
                .count(),
            events: organizer_links
                .iter()
                .filter(|l| l.meeting_category_id == category_id)
                .count(),
            participants: participant_links
                .iter()
                .filter(|l| l.meeting_category_id == category_id)
                .count(),
        }
    }

    /// Counts the dependents of an event category.
    pub fn for_event_category(category_id: Uuid, organizer_links: &[EventOrganizingCategory]) -> Self {
        Self {
            events: organizer_links
                .iter()
                .filter(|l| l.category_id == category_id)
                .count(),
            ..Self::default()
        }
    }

    pub fn verdict(&self) -> DeletionVerdict {
        if self.meetings > 0 {
            DeletionVerdict::Blocked {
                meetings: self.meetings,
            }
        } else if self.events > 0 || self.participants > 0 {
            DeletionVerdict::AllowedWithWarning {
                events: self.events,
                participants: self.participants,
            }
        } else {
            DeletionVerdict::Allowed
        }
    }

    /// Fails when the category still has meetings.
    pub fn ensure_deletable(&self, kind: CategoryKind) -> Result<()> {
        match self.verdict() {
            DeletionVerdict::Blocked { meetings } => Err(CategoryError::HasMeetings {
                label: kind.label(),
                meetings,
            }),
            _ => Ok(()),
        }
    }

    /// Confirmation text shown before a deletion that drops links.
    pub fn warning(&self) -> Option<String> {
        match self.verdict() {
            DeletionVerdict::AllowedWithWarning {
                events,
                participants,
            } => Some(format!(
                "{} event link(s) and {} participant link(s) will be removed",
                events, participants
            )),
            _ => None,
        }
    }
}
