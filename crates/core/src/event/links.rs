//! Link rows between events and their organizers, invitees and attendees.
//!
//! Link tables are resynchronized with a set diff: only the rows that differ
//! between the current and the desired state are written.

use std::collections::{BTreeSet, HashSet};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::requests::EventParticipants;
use super::types::{
    AttendanceType, EventAttendee, EventInvitee, EventOrganizingCategory,
    EventOrganizingMeetingCategory, OrganizerKind,
};

/// All link rows belonging to a set of events.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventLinks {
    pub organizing_meeting_categories: Vec<EventOrganizingMeetingCategory>,
    pub organizing_categories: Vec<EventOrganizingCategory>,
    pub invitees: Vec<EventInvitee>,
    pub attendees: Vec<EventAttendee>,
}

impl EventLinks {
    /// Builds the links for every event id crossed with every participant.
    ///
    /// Organizers land in the table selected by `organizer_kind`; the other
    /// organizer table stays empty. Repeated ids within one list are dropped,
    /// keeping the first occurrence. The same participant may appear both in
    /// person and online.
    pub fn for_events(
        event_ids: &[Uuid],
        organizer_kind: OrganizerKind,
        participants: &EventParticipants,
    ) -> Self {
        let organizers = unique(&participants.organizer_ids);
        let invitees = unique(&participants.invitee_ids);
        let in_person = unique(&participants.attendee_in_person_ids);
        let online = unique(&participants.attendee_online_ids);

        let mut links = Self::default();
        for &event_id in event_ids {
            match organizer_kind {
                OrganizerKind::MeetingCategory => {
                    links
                        .organizing_meeting_categories
                        .extend(organizers.iter().map(|&meeting_category_id| {
                            EventOrganizingMeetingCategory {
                                event_id,
                                meeting_category_id,
                            }
                        }));
                }
                OrganizerKind::Category => {
                    links
                        .organizing_categories
                        .extend(organizers.iter().map(|&category_id| EventOrganizingCategory {
                            event_id,
                            category_id,
                        }));
                }
            }
            links
                .invitees
                .extend(invitees.iter().map(|&participant_id| EventInvitee {
                    event_id,
                    participant_id,
                }));
            links.attendees.extend(
                in_person
                    .iter()
                    .map(|&participant_id| (participant_id, AttendanceType::InPerson))
                    .chain(
                        online
                            .iter()
                            .map(|&participant_id| (participant_id, AttendanceType::Online)),
                    )
                    .map(|(participant_id, attendance_type)| EventAttendee {
                        event_id,
                        participant_id,
                        attendance_type,
                    }),
            );
        }
        links
    }

    /// Extracts the links of a single event from full link collections.
    pub fn for_event(
        event_id: Uuid,
        organizing_meeting_categories: &[EventOrganizingMeetingCategory],
        organizing_categories: &[EventOrganizingCategory],
        invitees: &[EventInvitee],
        attendees: &[EventAttendee],
    ) -> Self {
        Self {
            organizing_meeting_categories: organizing_meeting_categories
                .iter()
                .filter(|l| l.event_id == event_id)
                .copied()
                .collect(),
            organizing_categories: organizing_categories
                .iter()
                .filter(|l| l.event_id == event_id)
                .copied()
                .collect(),
            invitees: invitees
                .iter()
                .filter(|l| l.event_id == event_id)
                .copied()
                .collect(),
            attendees: attendees
                .iter()
                .filter(|l| l.event_id == event_id)
                .copied()
                .collect(),
        }
    }

    /// Total number of link rows.
    pub fn len(&self) -> usize {
        self.organizing_meeting_categories.len()
            + self.organizing_categories.len()
            + self.invitees.len()
            + self.attendees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Rebuilds the participant lists of a single event's links.
    pub fn participants(&self, organizer_kind: OrganizerKind) -> EventParticipants {
        let organizer_ids = match organizer_kind {
            OrganizerKind::MeetingCategory => self
                .organizing_meeting_categories
                .iter()
                .map(|l| l.meeting_category_id)
                .collect(),
            OrganizerKind::Category => self
                .organizing_categories
                .iter()
                .map(|l| l.category_id)
                .collect(),
        };
        let attendees_of = |kind: AttendanceType| {
            self.attendees
                .iter()
                .filter(|a| a.attendance_type == kind)
                .map(|a| a.participant_id)
                .collect()
        };
        EventParticipants {
            organizer_ids,
            invitee_ids: self.invitees.iter().map(|l| l.participant_id).collect(),
            attendee_in_person_ids: attendees_of(AttendanceType::InPerson),
            attendee_online_ids: attendees_of(AttendanceType::Online),
        }
    }
}

/// Rows to write so that a link table goes from one state to another.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkDiff<T> {
    pub to_add: Vec<T>,
    pub to_remove: Vec<T>,
}

impl<T> LinkDiff<T> {
    pub fn is_empty(&self) -> bool {
        self.to_add.is_empty() && self.to_remove.is_empty()
    }
}

/// Computes the rows to add and remove to turn `current` into `desired`.
///
/// Duplicates on either side collapse; both outputs are sorted.
pub fn diff_links<T: Ord + Clone>(current: &[T], desired: &[T]) -> LinkDiff<T> {
    let current: BTreeSet<&T> = current.iter().collect();
    let desired: BTreeSet<&T> = desired.iter().collect();
    LinkDiff {
        to_add: desired.difference(&current).map(|&l| l.clone()).collect(),
        to_remove: current.difference(&desired).map(|&l| l.clone()).collect(),
    }
}

fn unique(ids: &[Uuid]) -> Vec<Uuid> {
    let mut seen = HashSet::with_capacity(ids.len());
    ids.iter().copied().filter(|id| seen.insert(*id)).collect()
}
