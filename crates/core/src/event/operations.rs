use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::EventError;
use super::requests::{EventDraft, EventParticipants};
use super::types::{
    Category, Event, EventOrganizingCategory, EventOrganizingMeetingCategory, OrganizerKind,
};
use crate::storage::DateRange;

/// Placeholder shown when an event has no organizer links.
pub const UNSPECIFIED_ORGANIZER: &str = "Unspecified";

const MAX_SUBJECT_LEN: usize = 200;

/// Validates an event draft before creation or update.
pub fn validate_event_draft(draft: &EventDraft) -> Result<(), EventError> {
    if draft.subject.trim().is_empty() {
        return Err(EventError::EmptySubject);
    }
    if draft.subject.chars().count() > MAX_SUBJECT_LEN {
        return Err(EventError::SubjectTooLong);
    }
    if draft.end_time <= draft.start_time {
        return Err(EventError::InvalidTimeRange);
    }
    validate_amounts(draft)
}

/// Validates the financial fields of a draft.
pub fn validate_amounts(draft: &EventDraft) -> Result<(), EventError> {
    for (label, amount) in [
        ("Cost", draft.cost),
        ("Investment", draft.investment),
        ("Revenue", draft.revenue),
    ] {
        if amount.is_some_and(|a| a < 0.0) {
            return Err(EventError::NegativeAmount(label));
        }
    }
    Ok(())
}

/// Validates that at least one organizer was picked.
pub fn validate_organizers(participants: &EventParticipants) -> Result<(), EventError> {
    if participants.organizer_ids.is_empty() {
        return Err(EventError::MissingOrganizer);
    }
    Ok(())
}

/// Returns true if the event matches a free-text search term.
///
/// The match is a case-insensitive substring test on subject and location.
/// A blank term matches everything.
pub fn matches_search(event: &Event, term: &str) -> bool {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return true;
    }
    event.subject.to_lowercase().contains(&term)
        || event
            .location
            .as_deref()
            .is_some_and(|location| location.to_lowercase().contains(&term))
}

/// Filters events by period and search term, sorted by date then start time.
pub fn filter_events<'a>(
    events: &'a [Event],
    period: Option<DateRange>,
    search: &str,
) -> Vec<&'a Event> {
    let mut filtered: Vec<&Event> = events
        .iter()
        .filter(|event| period.is_none_or(|p| p.contains(event.date)))
        .filter(|event| matches_search(event, search))
        .collect();
    filtered.sort_by(|a, b| {
        (a.date, a.start_time, &a.subject).cmp(&(b.date, b.start_time, &b.subject))
    });
    filtered
}

/// Resolves organizer links to category names.
#[derive(Debug, Clone, Copy)]
pub struct OrganizerIndex<'a> {
    pub meeting_links: &'a [EventOrganizingMeetingCategory],
    pub category_links: &'a [EventOrganizingCategory],
    pub meeting_categories: &'a [Category],
    pub event_categories: &'a [Category],
}

impl<'a> OrganizerIndex<'a> {
    /// Returns the names of the categories organizing an event, in link order.
    ///
    /// Links pointing at categories that no longer exist are skipped.
    pub fn organizer_names(&self, event: &Event) -> Vec<&'a str> {
        let (category_ids, categories): (Vec<Uuid>, &'a [Category]) = match event.organizer_type
        {
            OrganizerKind::MeetingCategory => (
                self.meeting_links
                    .iter()
                    .filter(|l| l.event_id == event.id)
                    .map(|l| l.meeting_category_id)
                    .collect(),
                self.meeting_categories,
            ),
            OrganizerKind::Category => (
                self.category_links
                    .iter()
                    .filter(|l| l.event_id == event.id)
                    .map(|l| l.category_id)
                    .collect(),
                self.event_categories,
            ),
        };
        let names: HashMap<Uuid, &'a str> = categories
            .iter()
            .map(|c| (c.id, c.name.as_str()))
            .collect();
        category_ids
            .iter()
            .filter_map(|id| names.get(id).copied())
            .collect()
    }

    /// Comma-joined organizer names, or [`UNSPECIFIED_ORGANIZER`].
    pub fn display_name(&self, event: &Event) -> String {
        let names = self.organizer_names(event);
        if names.is_empty() {
            return UNSPECIFIED_ORGANIZER.to_string();
        }
        names.join(", ")
    }
}

/// Number of events a category organizes within a view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCount {
    pub category_id: Uuid,
    pub name: String,
    pub count: usize,
}

/// Tallies organizer link occurrences per category for the given events.
///
/// Categories with no occurrence are left out. The result is sorted by name.
pub fn tally_organizers<I>(
    events: &[&Event],
    links: I,
    categories: &[Category],
) -> Vec<CategoryCount>
where
    I: IntoIterator<Item = (Uuid, Uuid)>,
{
    let event_ids: HashSet<Uuid> = events.iter().map(|e| e.id).collect();
    let mut counts: HashMap<Uuid, usize> = HashMap::new();
    for (event_id, category_id) in links {
        if event_ids.contains(&event_id) {
            *counts.entry(category_id).or_default() += 1;
        }
    }

    let mut tally: Vec<CategoryCount> = categories
        .iter()
        .filter_map(|category| {
            counts.get(&category.id).map(|&count| CategoryCount {
                category_id: category.id,
                name: category.name.clone(),
                count,
            })
        })
        .filter(|c| c.count > 0)
        .collect();
    tally.sort_by(|a, b| a.name.cmp(&b.name).then(a.category_id.cmp(&b.category_id)));
    tally
}
