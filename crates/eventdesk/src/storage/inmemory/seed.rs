//! Demo data for the in-memory store.

use chrono::{Duration, NaiveDate, NaiveTime};
use serde_json::json;
use uuid::Uuid;

use eventdesk_core::event::{
    AttendanceType, EventAttendee, EventDraft, EventInvitee, EventOrganizingCategory,
    EventOrganizingMeetingCategory, OrganizerKind, ParticipantMeetingCategory,
};
use eventdesk_core::storage::{
    decode_rows, encode_row, encode_rows, EventRow, Result, Row, Store, Table,
};

use super::InMemoryStore;

fn time(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap_or(NaiveTime::MIN)
}

async fn insert_named(store: &InMemoryStore, table: Table, names: &[&str]) -> Result<Vec<Uuid>> {
    let rows = names
        .iter()
        .map(|name| encode_row(&json!({ "name": name, "created_by": "seed" })))
        .collect::<Result<Vec<Row>>>()?;
    let inserted = store.insert(table, rows).await?;
    let ids: Vec<IdOnly> = decode_rows(inserted)?;
    Ok(ids.into_iter().map(|r| r.id).collect())
}

#[derive(serde::Deserialize)]
struct IdOnly {
    id: Uuid,
}

/// Fills the store with categories, meetings and events spread around `center`.
///
/// The "Legal" meeting category holds a meeting, so it cannot be deleted.
/// One event is written without a stored organizer kind, like rows created
/// before the column existed.
pub async fn seed_demo_data(store: &InMemoryStore, center: NaiveDate) -> Result<()> {
    let committees = insert_named(
        store,
        Table::MeetingCategories,
        &["Finance", "Legal", "Communications"],
    )
    .await?;
    let (finance, legal, communications) = (committees[0], committees[1], committees[2]);
    let categories = insert_named(store, Table::EventCategories, &["Culture", "Sports"]).await?;
    let culture = categories[0];

    store
        .insert(
            Table::Meetings,
            vec![encode_row(&json!({
                "commission_id": legal,
                "subject": "Contract review",
                "date": center - Duration::days(3),
            }))?],
        )
        .await?;

    let participants: Vec<Uuid> = (0..4).map(|_| Uuid::new_v4()).collect();
    let memberships = vec![
        ParticipantMeetingCategory {
            participant_id: participants[0],
            meeting_category_id: finance,
        },
        ParticipantMeetingCategory {
            participant_id: participants[1],
            meeting_category_id: finance,
        },
        ParticipantMeetingCategory {
            participant_id: participants[2],
            meeting_category_id: legal,
        },
    ];
    store
        .insert(Table::ParticipantMeetingCategories, encode_rows(&memberships)?)
        .await?;

    let drafts = [
        EventDraft::new(
            "Budget review",
            OrganizerKind::MeetingCategory,
            center,
            time(9, 0),
            time(10, 30),
        )
        .with_location("Room Kepler")
        .with_finances(Some(120.0), None, None),
        EventDraft::new(
            "Open air concert",
            OrganizerKind::Category,
            center + Duration::days(2),
            time(19, 0),
            time(22, 0),
        )
        .with_location("City park")
        .with_finances(Some(800.0), Some(200.0), Some(1500.0))
        .with_external_participants(40),
        EventDraft::new(
            "Press briefing",
            OrganizerKind::MeetingCategory,
            center - Duration::days(1),
            time(11, 0),
            time(12, 0),
        )
        .with_description("Quarterly results"),
    ];
    let mut rows: Vec<EventRow> = drafts.iter().map(EventRow::from_draft).collect();
    // Written before the organizer kind was stored.
    rows[2].organizer_kind = None;
    for row in &mut rows {
        row.created_by = Some("seed".to_string());
    }
    let inserted: Vec<EventRow> = decode_rows(store.insert(Table::Events, encode_rows(&rows)?).await?)?;
    let ids: Vec<Uuid> = inserted.iter().filter_map(|r| r.id).collect();
    let (budget, concert, briefing) = (ids[0], ids[1], ids[2]);

    let meeting_links = vec![
        EventOrganizingMeetingCategory {
            event_id: budget,
            meeting_category_id: finance,
        },
        EventOrganizingMeetingCategory {
            event_id: budget,
            meeting_category_id: legal,
        },
        EventOrganizingMeetingCategory {
            event_id: briefing,
            meeting_category_id: communications,
        },
    ];
    let category_links = vec![EventOrganizingCategory {
        event_id: concert,
        category_id: culture,
    }];
    let invitees = vec![
        EventInvitee {
            event_id: budget,
            participant_id: participants[0],
        },
        EventInvitee {
            event_id: budget,
            participant_id: participants[1],
        },
    ];
    let attendees = vec![
        EventAttendee {
            event_id: budget,
            participant_id: participants[0],
            attendance_type: AttendanceType::InPerson,
        },
        EventAttendee {
            event_id: budget,
            participant_id: participants[3],
            attendance_type: AttendanceType::Online,
        },
    ];
    store
        .insert(Table::EventOrganizingMeetingCategories, encode_rows(&meeting_links)?)
        .await?;
    store
        .insert(Table::EventOrganizingCategories, encode_rows(&category_links)?)
        .await?;
    store
        .insert(Table::EventInvitees, encode_rows(&invitees)?)
        .await?;
    store
        .insert(Table::EventAttendees, encode_rows(&attendees)?)
        .await?;

    store.clear_calls().await;
    tracing::debug!(events = ids.len(), "Seeded demo data");
    Ok(())
}
