//! End-to-end event and category flows against the in-memory store.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime};
use uuid::Uuid;

use eventdesk::mutations::{
    attach_flyer, create_complex_event, delete_category, update_complex_event,
};
use eventdesk::storage::{InMemoryStore, Operation};
use eventdesk::{AppState, MutationError};
use eventdesk_core::category::CategoryError;
use eventdesk_core::event::{
    expand_date_range, Category, CategoryKind, EventDraft, EventParticipants, FlyerUpload,
    OrganizerIndex, OrganizerKind, Schedule, ScheduleEntry, ScheduleError,
    UNSPECIFIED_ORGANIZER,
};
use eventdesk_core::storage::{encode_row, Store, Table};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn time(h: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, 0, 0).unwrap()
}

fn draft(kind: OrganizerKind) -> EventDraft {
    EventDraft::new("Quarterly assembly", kind, date(2024, 1, 1), time(9), time(10))
        .with_location("Main hall")
        .with_finances(Some(50.0), None, Some(80.0))
}

fn setup() -> (Arc<InMemoryStore>, AppState) {
    let store = Arc::new(InMemoryStore::new());
    let state = AppState::with_memory_cache(store.clone());
    (store, state)
}

fn ids(n: usize) -> Vec<Uuid> {
    (0..n).map(|_| Uuid::new_v4()).collect()
}

#[tokio::test]
async fn test_each_schedule_entry_becomes_an_event_with_all_links() {
    let (store, state) = setup();
    let schedules = expand_date_range(date(2024, 1, 1), date(2024, 1, 3), time(9), time(10)).unwrap();
    let participants = EventParticipants::new()
        .with_organizers(ids(2))
        .with_invitees(ids(3))
        .with_in_person_attendees(ids(1))
        .with_online_attendees(ids(2));

    let events = create_complex_event(
        &state,
        &draft(OrganizerKind::MeetingCategory),
        &schedules,
        &participants,
    )
    .await
    .unwrap();

    assert_eq!(events.len(), 3);
    let dates: Vec<NaiveDate> = events.iter().map(|e| e.date).collect();
    assert_eq!(dates, vec![date(2024, 1, 1), date(2024, 1, 2), date(2024, 1, 3)]);
    for event in &events {
        assert_eq!(event.subject, "Quarterly assembly");
        assert_eq!(event.location.as_deref(), Some("Main hall"));
        assert_eq!(event.revenue, Some(80.0));
        assert_eq!(event.organizer_type, OrganizerKind::MeetingCategory);
    }

    assert_eq!(store.rows(Table::Events).await.len(), 3);
    assert_eq!(store.rows(Table::EventOrganizingMeetingCategories).await.len(), 3 * 2);
    assert!(store.rows(Table::EventOrganizingCategories).await.is_empty());
    assert_eq!(store.rows(Table::EventInvitees).await.len(), 3 * 3);
    assert_eq!(store.rows(Table::EventAttendees).await.len(), 3 * 3);

    // One bulk event insert, then one insert per non-empty link collection
    assert_eq!(
        store.calls().await,
        vec![
            (Operation::Insert, Table::Events),
            (Operation::Insert, Table::EventOrganizingMeetingCategories),
            (Operation::Insert, Table::EventInvitees),
            (Operation::Insert, Table::EventAttendees),
        ]
    );
}

#[tokio::test]
async fn test_schedule_entries_replace_draft_date_and_times() {
    let (store, state) = setup();
    // The draft's own times are inverted; only the entries' times are written
    let mut base = draft(OrganizerKind::Category);
    base.start_time = time(18);
    base.end_time = time(8);
    let schedules = vec![
        ScheduleEntry::new(date(2024, 2, 5), time(14), time(16)).unwrap(),
        ScheduleEntry::new(date(2024, 2, 7), time(9), time(11)).unwrap(),
    ];

    let events = create_complex_event(&state, &base, &schedules, &EventParticipants::new())
        .await
        .unwrap();

    assert_eq!(events.len(), 2);
    let rows = store.rows(Table::Events).await;
    for ((event, row), entry) in events.iter().zip(&rows).zip(&schedules) {
        assert_eq!(event.date, entry.date);
        assert_eq!(event.start_time, entry.start_time);
        assert_eq!(event.end_time, entry.end_time);
        assert_eq!(row["date"], entry.date.to_string());
        assert_eq!(row["start_time"], entry.start_time.format("%H:%M:%S").to_string());
        assert_eq!(row["end_time"], entry.end_time.format("%H:%M:%S").to_string());
    }
}

#[tokio::test]
async fn test_update_leaves_exactly_the_requested_links() {
    let (store, state) = setup();
    let organizers = ids(3);
    let invitees = ids(3);
    let events = create_complex_event(
        &state,
        &draft(OrganizerKind::Category),
        &[],
        &EventParticipants::new()
            .with_organizers(organizers[..2].to_vec())
            .with_invitees(invitees[..2].to_vec()),
    )
    .await
    .unwrap();
    let id = events[0].id;

    let desired = EventParticipants::new()
        .with_organizers(organizers[1..].to_vec())
        .with_invitees([invitees[2]])
        .with_in_person_attendees([invitees[0]])
        .with_online_attendees([invitees[0]]);
    update_complex_event(&state, id, &draft(OrganizerKind::Category), &desired)
        .await
        .unwrap();

    let organizer_ids: BTreeSet<Uuid> = state
        .queries
        .organizing_categories()
        .await
        .unwrap()
        .iter()
        .filter(|l| l.event_id == id)
        .map(|l| l.category_id)
        .collect();
    assert_eq!(organizer_ids, organizers[1..].iter().copied().collect());
    let invitee_ids: Vec<Uuid> = state
        .queries
        .invitees()
        .await
        .unwrap()
        .iter()
        .map(|l| l.participant_id)
        .collect();
    assert_eq!(invitee_ids, vec![invitees[2]]);
    // Hybrid attendance keeps both rows
    assert_eq!(state.queries.attendees().await.unwrap().len(), 2);

    // A second identical call writes nothing to the link tables
    store.clear_calls().await;
    update_complex_event(&state, id, &draft(OrganizerKind::Category), &desired)
        .await
        .unwrap();
    let link_writes: Vec<(Operation, Table)> = store
        .calls()
        .await
        .into_iter()
        .filter(|(op, table)| op.is_write() && table.is_link_table())
        .collect();
    assert!(link_writes.is_empty(), "unexpected writes: {:?}", link_writes);
    assert_eq!(store.rows(Table::EventOrganizingCategories).await.len(), 2);
    assert_eq!(store.rows(Table::EventInvitees).await.len(), 1);
}

#[tokio::test]
async fn test_meeting_category_deletion_guard() {
    let (store, state) = setup();
    let mut rows = Vec::new();
    for name in ["Finance", "Legal"] {
        rows.push(encode_row(&serde_json::json!({ "name": name })).unwrap());
    }
    let inserted = store.insert(Table::MeetingCategories, rows).await.unwrap();
    let finance: Uuid = inserted[0]["id"].as_str().unwrap().parse().unwrap();
    let legal: Uuid = inserted[1]["id"].as_str().unwrap().parse().unwrap();

    create_complex_event(
        &state,
        &draft(OrganizerKind::MeetingCategory),
        &[],
        &EventParticipants::new().with_organizers([finance, legal]),
    )
    .await
    .unwrap();
    let participant = Uuid::new_v4();
    store
        .insert(
            Table::ParticipantMeetingCategories,
            vec![encode_row(&serde_json::json!({
                "participant_id": participant,
                "commission_id": finance,
            }))
            .unwrap()],
        )
        .await
        .unwrap();
    store
        .insert(
            Table::Meetings,
            vec![encode_row(&serde_json::json!({ "commission_id": legal })).unwrap()],
        )
        .await
        .unwrap();

    // Legal holds a meeting: refused before any write
    store.clear_calls().await;
    let refused = delete_category(&state, CategoryKind::Meeting, legal).await;
    assert!(matches!(
        refused,
        Err(MutationError::Category(CategoryError::HasMeetings { meetings: 1, .. }))
    ));
    assert_eq!(store.write_count().await, 0);

    // Finance has no meetings: its links go with it
    let impact = delete_category(&state, CategoryKind::Meeting, finance)
        .await
        .unwrap();
    assert_eq!((impact.events, impact.participants), (1, 1));

    let remaining: Vec<Category> = state.queries.meeting_categories().await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, legal);
    let links = state.queries.organizing_meeting_categories().await.unwrap();
    assert!(links.iter().all(|l| l.meeting_category_id != finance));
    assert_eq!(links.len(), 1);
    assert!(state
        .queries
        .participant_meeting_categories()
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_organizer_display_names() {
    let (store, state) = setup();
    let categories = store
        .insert(
            Table::MeetingCategories,
            vec![
                encode_row(&serde_json::json!({ "name": "Finance" })).unwrap(),
                encode_row(&serde_json::json!({ "name": "Legal" })).unwrap(),
            ],
        )
        .await
        .unwrap();
    let committee_ids: Vec<Uuid> = categories
        .iter()
        .map(|r| r["id"].as_str().unwrap().parse().unwrap())
        .collect();

    let organized = create_complex_event(
        &state,
        &draft(OrganizerKind::MeetingCategory),
        &[],
        &EventParticipants::new().with_organizers(committee_ids),
    )
    .await
    .unwrap();
    let orphan = create_complex_event(
        &state,
        &draft(OrganizerKind::MeetingCategory),
        &[],
        &EventParticipants::new(),
    )
    .await
    .unwrap();

    let meeting_links = state.queries.organizing_meeting_categories().await.unwrap();
    let category_links = state.queries.organizing_categories().await.unwrap();
    let meeting_categories = state.queries.meeting_categories().await.unwrap();
    let event_categories = state.queries.event_categories().await.unwrap();
    let index = OrganizerIndex {
        meeting_links: &meeting_links,
        category_links: &category_links,
        meeting_categories: &meeting_categories,
        event_categories: &event_categories,
    };

    assert_eq!(index.display_name(&organized[0]), "Finance, Legal");
    assert_eq!(index.display_name(&orphan[0]), UNSPECIFIED_ORGANIZER);
    assert!(!index.display_name(&orphan[0]).is_empty());
}

#[test]
fn test_range_expands_to_ascending_daily_entries() {
    let entries = expand_date_range(date(2024, 1, 1), date(2024, 1, 3), time(9), time(10)).unwrap();

    assert_eq!(
        entries,
        vec![
            ScheduleEntry::new(date(2024, 1, 1), time(9), time(10)).unwrap(),
            ScheduleEntry::new(date(2024, 1, 2), time(9), time(10)).unwrap(),
            ScheduleEntry::new(date(2024, 1, 3), time(9), time(10)).unwrap(),
        ]
    );
}

#[test]
fn test_rejected_entry_leaves_schedule_untouched() {
    let mut schedule = Schedule::new();
    schedule.add(date(2024, 1, 1), time(9), time(10)).unwrap();
    let before = schedule.clone();

    assert_eq!(
        schedule.add(date(2024, 1, 2), time(10), time(10)),
        Err(ScheduleError::InvalidTimeRange)
    );
    assert_eq!(
        schedule.add_range(date(2024, 1, 2), date(2024, 1, 4), time(11), time(9)),
        Err(ScheduleError::InvalidTimeRange)
    );
    assert_eq!(schedule, before);
}

#[tokio::test]
async fn test_flyer_failure_still_saves_event() {
    let (store, state) = setup();
    store.fail_uploads().await;
    let mut draft = draft(OrganizerKind::Category);

    attach_flyer(
        &state,
        &mut draft,
        &FlyerUpload::new("poster.png", "image/png", vec![0; 16]),
    )
    .await;
    let events = create_complex_event(&state, &draft, &[], &EventParticipants::new())
        .await
        .unwrap();

    assert_eq!(events.len(), 1);
    assert_eq!(events[0].flyer_url, None);
}

#[tokio::test]
async fn test_partial_failure_keeps_earlier_writes() {
    let (store, state) = setup();
    store.fail_on(Operation::Insert, Table::EventInvitees).await;

    let result = create_complex_event(
        &state,
        &draft(OrganizerKind::MeetingCategory),
        &[],
        &EventParticipants::new()
            .with_organizers(ids(1))
            .with_invitees(ids(1))
            .with_online_attendees(ids(1)),
    )
    .await;

    assert!(matches!(result, Err(MutationError::Repository(_))));
    assert_eq!(store.rows(Table::Events).await.len(), 1);
    assert_eq!(store.rows(Table::EventOrganizingMeetingCategories).await.len(), 1);
    assert!(store.rows(Table::EventInvitees).await.is_empty());
    // Later collections are never attempted
    assert!(store.rows(Table::EventAttendees).await.is_empty());
}
