//! Event orchestrators.

use serde::Serialize;
use serde_json::json;
use uuid::Uuid;

use eventdesk_core::cache::QueryKey;
use eventdesk_core::event::{
    diff_links, validate_event_draft, AttendanceType, Event, EventAttendee, EventDraft,
    EventInvitee, EventLinks, EventOrganizingCategory, EventOrganizingMeetingCategory,
    EventParticipants, ScheduleEntry,
};
use eventdesk_core::storage::{
    columns, decode_rows, encode_row, encode_rows, EventRow, Filter, RepositoryError, Table,
};

use super::updated_stamp;
use crate::error::Result;
use crate::state::AppState;

/// Remote function that emails an event's attendees.
pub const NOTIFY_FUNCTION: &str = "notify-event-attendees";

/// Validates the drafts that will actually be written.
///
/// Schedule entries replace the draft's date and times, so the draft's own
/// times only matter when there are no entries.
fn validate_creation(draft: &EventDraft, schedules: &[ScheduleEntry]) -> Result<()> {
    if schedules.is_empty() {
        return Ok(validate_event_draft(draft)?);
    }
    for entry in schedules {
        validate_event_draft(&draft.for_schedule(entry))?;
    }
    Ok(())
}

/// Inserts link rows in one call, skipping empty collections.
async fn insert_links<T: Serialize>(state: &AppState, table: Table, links: &[T]) -> Result<()> {
    if links.is_empty() {
        return Ok(());
    }
    state.store.insert(table, encode_rows(links)?).await?;
    Ok(())
}

/// Creates one event per schedule entry and links every participant to each.
///
/// With no schedule entries a single event is created from the draft's own
/// date and times. Returns the created events in insertion order.
pub async fn create_complex_event(
    state: &AppState,
    draft: &EventDraft,
    schedules: &[ScheduleEntry],
    participants: &EventParticipants,
) -> Result<Vec<Event>> {
    validate_creation(draft, schedules)?;

    let drafts: Vec<EventDraft> = if schedules.is_empty() {
        vec![draft.clone()]
    } else {
        schedules.iter().map(|s| draft.for_schedule(s)).collect()
    };
    let rows = drafts
        .iter()
        .map(|d| {
            let mut row = EventRow::from_draft(d);
            row.created_by = Some(state.actor.clone());
            encode_row(&row)
        })
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let inserted: Vec<EventRow> = decode_rows(state.store.insert(Table::Events, rows).await?)?;
    let events = inserted
        .into_iter()
        .map(|row| row.into_event(|_| draft.organizer_type))
        .collect::<std::result::Result<Vec<_>, _>>()?;
    let event_ids: Vec<Uuid> = events.iter().map(|e| e.id).collect();

    let links = EventLinks::for_events(&event_ids, draft.organizer_type, participants);
    insert_links(
        state,
        Table::EventOrganizingMeetingCategories,
        &links.organizing_meeting_categories,
    )
    .await?;
    insert_links(
        state,
        Table::EventOrganizingCategories,
        &links.organizing_categories,
    )
    .await?;
    insert_links(state, Table::EventInvitees, &links.invitees).await?;
    insert_links(state, Table::EventAttendees, &links.attendees).await?;

    state.queries.invalidate_all(&QueryKey::EVENT_GRAPH).await;
    tracing::debug!(
        events = events.len(),
        links = links.len(),
        "Created complex event"
    );
    Ok(events)
}

/// Updates an event and resynchronizes its links to exactly `participants`.
///
/// Only the link rows that differ are written, so repeating a call is a no-op
/// on the link tables.
pub async fn update_complex_event(
    state: &AppState,
    event_id: Uuid,
    draft: &EventDraft,
    participants: &EventParticipants,
) -> Result<Event> {
    validate_event_draft(draft)?;

    let mut patch = encode_row(&EventRow::from_draft(draft))?;
    patch.extend(updated_stamp(&state.actor));
    let updated = state
        .store
        .update(Table::Events, patch, &[Filter::eq_id(columns::ID, event_id)])
        .await?;
    let row: EventRow = decode_rows(updated)?
        .into_iter()
        .next()
        .ok_or_else(|| RepositoryError::NotFound {
            entity_type: "Event",
            id: event_id.to_string(),
        })?;
    let event = row.into_event(|_| draft.organizer_type)?;

    let desired = EventLinks::for_events(&[event_id], draft.organizer_type, participants);
    let by_event = [Filter::eq_id(columns::EVENT_ID, event_id)];

    let current: Vec<EventOrganizingMeetingCategory> = decode_rows(
        state
            .store
            .select(Table::EventOrganizingMeetingCategories, &by_event)
            .await?,
    )?;
    let diff = diff_links(&current, &desired.organizing_meeting_categories);
    remove_links(
        state,
        Table::EventOrganizingMeetingCategories,
        event_id,
        columns::MEETING_CATEGORY_ID,
        diff.to_remove.iter().map(|l| l.meeting_category_id),
    )
    .await?;
    insert_links(state, Table::EventOrganizingMeetingCategories, &diff.to_add).await?;

    let current: Vec<EventOrganizingCategory> = decode_rows(
        state
            .store
            .select(Table::EventOrganizingCategories, &by_event)
            .await?,
    )?;
    let diff = diff_links(&current, &desired.organizing_categories);
    remove_links(
        state,
        Table::EventOrganizingCategories,
        event_id,
        columns::CATEGORY_ID,
        diff.to_remove.iter().map(|l| l.category_id),
    )
    .await?;
    insert_links(state, Table::EventOrganizingCategories, &diff.to_add).await?;

    let current: Vec<EventInvitee> =
        decode_rows(state.store.select(Table::EventInvitees, &by_event).await?)?;
    let diff = diff_links(&current, &desired.invitees);
    remove_links(
        state,
        Table::EventInvitees,
        event_id,
        columns::PARTICIPANT_ID,
        diff.to_remove.iter().map(|l| l.participant_id),
    )
    .await?;
    insert_links(state, Table::EventInvitees, &diff.to_add).await?;

    let current: Vec<EventAttendee> =
        decode_rows(state.store.select(Table::EventAttendees, &by_event).await?)?;
    let diff = diff_links(&current, &desired.attendees);
    for attendance_type in [AttendanceType::InPerson, AttendanceType::Online] {
        let removed: Vec<Uuid> = diff
            .to_remove
            .iter()
            .filter(|a| a.attendance_type == attendance_type)
            .map(|a| a.participant_id)
            .collect();
        if removed.is_empty() {
            continue;
        }
        state
            .store
            .delete(
                Table::EventAttendees,
                &[
                    Filter::eq_id(columns::EVENT_ID, event_id),
                    Filter::eq(columns::ATTENDANCE_TYPE, attendance_type.as_str()),
                    Filter::in_ids(columns::PARTICIPANT_ID, &removed),
                ],
            )
            .await?;
    }
    insert_links(state, Table::EventAttendees, &diff.to_add).await?;

    state.queries.invalidate_all(&QueryKey::EVENT_GRAPH).await;
    tracing::debug!(event_id = %event_id, "Updated complex event");
    Ok(event)
}

/// Deletes the link rows of one event whose `column` is in `ids`.
async fn remove_links(
    state: &AppState,
    table: Table,
    event_id: Uuid,
    column: &'static str,
    ids: impl Iterator<Item = Uuid>,
) -> Result<()> {
    let ids: Vec<Uuid> = ids.collect();
    if ids.is_empty() {
        return Ok(());
    }
    state
        .store
        .delete(
            table,
            &[
                Filter::eq_id(columns::EVENT_ID, event_id),
                Filter::in_ids(column, &ids),
            ],
        )
        .await?;
    Ok(())
}

/// Deletes an event after its organizer, invitee and attendee links.
pub async fn delete_complex_event(state: &AppState, event_id: Uuid) -> Result<()> {
    let by_event = [Filter::eq_id(columns::EVENT_ID, event_id)];
    for table in [
        Table::EventOrganizingMeetingCategories,
        Table::EventOrganizingCategories,
        Table::EventInvitees,
        Table::EventAttendees,
    ] {
        state.store.delete(table, &by_event).await?;
    }
    state
        .store
        .delete(Table::Events, &[Filter::eq_id(columns::ID, event_id)])
        .await?;

    state.queries.invalidate_all(&QueryKey::EVENT_GRAPH).await;
    tracing::debug!(event_id = %event_id, "Deleted complex event");
    Ok(())
}

/// Marks an event as cancelled or restores it.
pub async fn set_event_cancelled(state: &AppState, event_id: Uuid, cancelled: bool) -> Result<()> {
    let mut patch = updated_stamp(&state.actor);
    patch.insert(columns::IS_CANCELLED.to_string(), json!(cancelled));
    let updated = state
        .store
        .update(Table::Events, patch, &[Filter::eq_id(columns::ID, event_id)])
        .await?;
    if updated.is_empty() {
        return Err(RepositoryError::NotFound {
            entity_type: "Event",
            id: event_id.to_string(),
        }
        .into());
    }

    state.queries.invalidate(QueryKey::Events).await;
    Ok(())
}

/// Asks the hosted function to notify the attendees of an event.
pub async fn notify_event_attendees(state: &AppState, event_id: Uuid) -> Result<()> {
    let response = state
        .functions
        .invoke(NOTIFY_FUNCTION, json!({ "eventId": event_id }))
        .await?;
    tracing::debug!(event_id = %event_id, response = %response, "Notified event attendees");
    Ok(())
}
