//! Event management view.

use serde::Serialize;
use uuid::Uuid;

use eventdesk_core::event::{
    filter_events, tally_organizers, Category, CategoryCount, Event, EventAttendee, EventDraft,
    EventInvitee, EventLinks, EventOrganizingCategory, EventOrganizingMeetingCategory,
    EventParticipants, OrganizerIndex,
};
use eventdesk_core::storage::{DateRange, Result as StoreResult};
use eventdesk_core::view::{
    Affordances, CreateWizard, EditForm, LoadState, ModalMode, Notice, ResourceKind,
};

use crate::mutations;
use crate::state::AppState;

/// Collections the event view renders from.
#[derive(Debug, Clone, Default)]
pub struct EventsSnapshot {
    pub events: Vec<Event>,
    pub meeting_categories: Vec<Category>,
    pub event_categories: Vec<Category>,
    pub meeting_links: Vec<EventOrganizingMeetingCategory>,
    pub category_links: Vec<EventOrganizingCategory>,
    pub invitees: Vec<EventInvitee>,
    pub attendees: Vec<EventAttendee>,
}

impl EventsSnapshot {
    /// Loads every collection through the cached accessors.
    pub async fn load(state: &AppState) -> StoreResult<Self> {
        Ok(Self {
            events: state.queries.events().await?,
            meeting_categories: state.queries.meeting_categories().await?,
            event_categories: state.queries.event_categories().await?,
            meeting_links: state.queries.organizing_meeting_categories().await?,
            category_links: state.queries.organizing_categories().await?,
            invitees: state.queries.invitees().await?,
            attendees: state.queries.attendees().await?,
        })
    }

    pub fn organizer_index(&self) -> OrganizerIndex<'_> {
        OrganizerIndex {
            meeting_links: &self.meeting_links,
            category_links: &self.category_links,
            meeting_categories: &self.meeting_categories,
            event_categories: &self.event_categories,
        }
    }

    pub fn links_of(&self, event_id: Uuid) -> EventLinks {
        EventLinks::for_event(
            event_id,
            &self.meeting_links,
            &self.category_links,
            &self.invitees,
            &self.attendees,
        )
    }
}

/// Per-category event counts for the visible period.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Sidebar {
    pub meeting_categories: Vec<CategoryCount>,
    pub event_categories: Vec<CategoryCount>,
}

/// Controller for the event management screen.
pub struct ManageEventsView {
    state: AppState,
    period: DateRange,
    search: String,
    modal: ModalMode,
    wizard: Option<CreateWizard>,
    edit: Option<EditForm>,
    notice: Option<Notice>,
    load: LoadState,
    snapshot: EventsSnapshot,
}

impl ManageEventsView {
    pub fn new(state: AppState, period: DateRange) -> Self {
        Self {
            state,
            period,
            search: String::new(),
            modal: ModalMode::Closed,
            wizard: None,
            edit: None,
            notice: None,
            load: LoadState::Idle,
            snapshot: EventsSnapshot::default(),
        }
    }

    /// Reloads the collections. A failure keeps the previous snapshot.
    pub async fn refresh(&mut self) {
        match EventsSnapshot::load(&self.state).await {
            Ok(snapshot) => {
                self.snapshot = snapshot;
                self.load = LoadState::Loaded;
            }
            Err(err) => {
                tracing::warn!(error = %err, "Failed to load events");
                self.load = LoadState::Failed(err.to_string());
            }
        }
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load
    }

    pub fn snapshot(&self) -> &EventsSnapshot {
        &self.snapshot
    }

    pub fn period(&self) -> DateRange {
        self.period
    }

    pub fn next_period(&mut self) {
        self.period = self.period.next_month();
    }

    pub fn previous_period(&mut self) {
        self.period = self.period.previous_month();
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search = term.into();
    }

    /// Events in the period matching the search, by date then start time.
    pub fn visible_events(&self) -> Vec<&Event> {
        filter_events(&self.snapshot.events, Some(self.period), &self.search)
    }

    pub fn organizer_name(&self, event: &Event) -> String {
        self.snapshot.organizer_index().display_name(event)
    }

    pub fn sidebar(&self) -> Sidebar {
        let visible = self.visible_events();
        Sidebar {
            meeting_categories: tally_organizers(
                &visible,
                self.snapshot
                    .meeting_links
                    .iter()
                    .map(|l| (l.event_id, l.meeting_category_id)),
                &self.snapshot.meeting_categories,
            ),
            event_categories: tally_organizers(
                &visible,
                self.snapshot
                    .category_links
                    .iter()
                    .map(|l| (l.event_id, l.category_id)),
                &self.snapshot.event_categories,
            ),
        }
    }

    pub fn affordances(&self) -> Affordances {
        Affordances::resolve(self.state.capabilities.as_ref(), ResourceKind::Events)
    }

    pub fn modal(&self) -> ModalMode {
        self.modal
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// Returns and clears the pending notice.
    pub fn take_notice(&mut self) -> Option<Notice> {
        self.notice.take()
    }

    pub fn event(&self, id: Uuid) -> Option<&Event> {
        self.snapshot.events.iter().find(|e| e.id == id)
    }

    /// Current participants of an event, rebuilt from its links.
    pub fn participants_of(&self, event: &Event) -> EventParticipants {
        self.snapshot
            .links_of(event.id)
            .participants(event.organizer_type)
    }

    pub fn open_create(&mut self, draft: EventDraft) -> &mut CreateWizard {
        self.modal = ModalMode::Create;
        self.edit = None;
        self.wizard.insert(CreateWizard::new(draft))
    }

    pub fn wizard_mut(&mut self) -> Option<&mut CreateWizard> {
        self.wizard.as_mut()
    }

    /// Validates the wizard, uploads the flyer and creates the events.
    ///
    /// Returns true on success. On failure the wizard stays open.
    pub async fn submit_wizard(&mut self) -> bool {
        let Some(wizard) = &self.wizard else {
            return false;
        };
        let mut submission = match wizard.finish() {
            Ok(submission) => submission,
            Err(err) => {
                self.notice = Some(Notice::error(&err));
                return false;
            }
        };

        if let Some(flyer) = &submission.flyer {
            mutations::attach_flyer(&self.state, &mut submission.draft, flyer).await;
        }
        let result = mutations::create_complex_event(
            &self.state,
            &submission.draft,
            &submission.schedules,
            &submission.participants,
        )
        .await;
        match result {
            Ok(events) => {
                self.notice = Some(Notice::success(format!(
                    "Created {} event(s)",
                    events.len()
                )));
                self.close_modal();
                self.refresh().await;
                true
            }
            Err(err) => {
                self.notice = Some(Notice::error(&err));
                false
            }
        }
    }

    pub fn open_view(&mut self, id: Uuid) -> Option<&Event> {
        self.event(id)?;
        self.modal = ModalMode::View(id);
        self.event(id)
    }

    /// Switches the open view modal to the edit form.
    pub fn switch_to_edit(&mut self) -> Option<&mut EditForm> {
        let id = self.modal.selected()?;
        self.open_edit(id)
    }

    /// Opens the edit form prefilled from the event and its links.
    pub fn open_edit(&mut self, id: Uuid) -> Option<&mut EditForm> {
        let event = self.event(id)?;
        let form = EditForm::new(EventDraft::from_event(event), self.participants_of(event));
        self.modal = ModalMode::Edit(id);
        self.wizard = None;
        Some(self.edit.insert(form))
    }

    pub fn edit_form_mut(&mut self) -> Option<&mut EditForm> {
        self.edit.as_mut()
    }

    pub async fn submit_edit(&mut self) -> bool {
        let (ModalMode::Edit(id), Some(form)) = (self.modal, &self.edit) else {
            return false;
        };
        if let Err(err) = form.validate() {
            self.notice = Some(Notice::error(&err));
            return false;
        }
        let participants = form.submitted_participants();
        let result =
            mutations::update_complex_event(&self.state, id, &form.draft, &participants).await;
        match result {
            Ok(_) => {
                self.notice = Some(Notice::success("Event updated"));
                self.close_modal();
                self.refresh().await;
                true
            }
            Err(err) => {
                self.notice = Some(Notice::error(&err));
                false
            }
        }
    }

    pub async fn delete_event(&mut self, id: Uuid) -> bool {
        let result = mutations::delete_complex_event(&self.state, id).await;
        self.finish_action(result.map(|_| "Event deleted")).await
    }

    pub async fn toggle_cancelled(&mut self, id: Uuid) -> bool {
        let Some(cancelled) = self.event(id).map(|e| !e.is_cancelled) else {
            return false;
        };
        let result = mutations::set_event_cancelled(&self.state, id, cancelled).await;
        let message = if cancelled {
            "Event cancelled"
        } else {
            "Event restored"
        };
        self.finish_action(result.map(|_| message)).await
    }

    pub async fn notify(&mut self, id: Uuid) -> bool {
        match mutations::notify_event_attendees(&self.state, id).await {
            Ok(()) => {
                self.notice = Some(Notice::success("Attendees notified"));
                true
            }
            Err(err) => {
                self.notice = Some(Notice::error(&err));
                false
            }
        }
    }

    async fn finish_action(&mut self, result: crate::Result<&'static str>) -> bool {
        match result {
            Ok(message) => {
                self.notice = Some(Notice::success(message));
                self.close_modal();
                self.refresh().await;
                true
            }
            Err(err) => {
                self.notice = Some(Notice::error(&err));
                false
            }
        }
    }

    pub fn close_modal(&mut self) {
        self.modal = ModalMode::Closed;
        self.wizard = None;
        self.edit = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use chrono::{NaiveDate, NaiveTime};
    use eventdesk_core::event::{FlyerUpload, OrganizerKind};
    use eventdesk_core::storage::Table;
    use eventdesk_core::view::{NoticeKind, StaticCapabilities};

    use crate::storage::{seed_demo_data, InMemoryStore, Operation};

    fn march() -> DateRange {
        DateRange::month(2024, 3).unwrap()
    }

    fn time(h: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, 0, 0).unwrap()
    }

    async fn seeded() -> (Arc<InMemoryStore>, ManageEventsView) {
        let store = Arc::new(InMemoryStore::new());
        seed_demo_data(&store, NaiveDate::from_ymd_opt(2024, 3, 15).unwrap())
            .await
            .unwrap();
        let mut view = ManageEventsView::new(AppState::with_memory_cache(store.clone()), march());
        view.refresh().await;
        (store, view)
    }

    #[tokio::test]
    async fn test_refresh_loads_seeded_events() {
        let (_store, view) = seeded().await;

        assert_eq!(view.load_state(), &LoadState::Loaded);
        assert_eq!(view.visible_events().len(), 3);
    }

    #[tokio::test]
    async fn test_refresh_failure_sets_failed_state() {
        let store = Arc::new(InMemoryStore::new());
        store.fail_on(Operation::Select, Table::Events).await;
        let mut view = ManageEventsView::new(AppState::with_memory_cache(store), march());

        view.refresh().await;

        assert!(matches!(view.load_state(), LoadState::Failed(m) if m.contains("injected")));
    }

    #[tokio::test]
    async fn test_search_and_period_filter_visible_events() {
        let (_store, mut view) = seeded().await;

        view.set_search("CONCERT");
        assert_eq!(view.visible_events().len(), 1);

        view.set_search("");
        view.next_period();
        assert!(view.visible_events().is_empty());
        view.previous_period();
        assert_eq!(view.period(), march());
    }

    #[tokio::test]
    async fn test_sidebar_counts_visible_events_only() {
        let (_store, mut view) = seeded().await;

        view.set_search("budget");
        let sidebar = view.sidebar();

        assert!(sidebar.event_categories.is_empty());
        assert!(sidebar.meeting_categories.iter().all(|c| c.count == 1));
        assert!(!sidebar.meeting_categories.is_empty());
    }

    #[tokio::test]
    async fn test_wizard_submission_creates_events_and_closes() {
        let (store, mut view) = seeded().await;
        let organizer = view.snapshot().event_categories[0].id;

        let wizard = view.open_create(EventDraft::new(
            "Film night",
            OrganizerKind::Category,
            NaiveDate::from_ymd_opt(2024, 3, 20).unwrap(),
            time(20),
            time(22),
        ));
        wizard.participants = EventParticipants::new().with_organizers([organizer]);
        wizard
            .schedule
            .add(NaiveDate::from_ymd_opt(2024, 3, 20).unwrap(), time(20), time(22))
            .unwrap();
        wizard.flyer = Some(FlyerUpload::new("film.png", "image/png", vec![7]));

        assert!(view.submit_wizard().await);

        assert_eq!(view.modal(), ModalMode::Closed);
        assert_eq!(view.take_notice().map(|n| n.kind), Some(NoticeKind::Success));
        let created = view
            .visible_events()
            .into_iter()
            .find(|e| e.subject == "Film night")
            .cloned()
            .unwrap();
        assert!(created.flyer_url.is_some());
        assert_eq!(view.organizer_name(&created), view.snapshot().event_categories[0].name);
        assert_eq!(store.object_names().await.len(), 1);
    }

    #[tokio::test]
    async fn test_invalid_wizard_keeps_modal_open() {
        let (store, mut view) = seeded().await;
        store.clear_calls().await;

        view.open_create(EventDraft::new(
            "",
            OrganizerKind::MeetingCategory,
            NaiveDate::from_ymd_opt(2024, 3, 20).unwrap(),
            time(9),
            time(10),
        ));

        assert!(!view.submit_wizard().await);
        assert_eq!(view.modal(), ModalMode::Create);
        assert!(view.notice().is_some_and(Notice::is_error));
        assert_eq!(store.write_count().await, 0);
    }

    #[tokio::test]
    async fn test_view_then_edit_prefills_participants() {
        let (_store, mut view) = seeded().await;
        let event = view
            .visible_events()
            .into_iter()
            .find(|e| e.subject == "Budget review")
            .cloned()
            .unwrap();

        view.open_view(event.id).unwrap();
        let form = view.switch_to_edit().unwrap();
        assert!(!form.participants.organizer_ids.is_empty());
        form.draft.subject = "Budget review (rescheduled)".to_string();

        assert!(view.submit_edit().await);
        assert_eq!(view.event(event.id).unwrap().subject, "Budget review (rescheduled)");
    }

    #[tokio::test]
    async fn test_edit_switching_organizer_kind_does_not_carry_committee_ids() {
        let (store, mut view) = seeded().await;
        let budget = view
            .visible_events()
            .into_iter()
            .find(|e| e.subject == "Budget review")
            .map(|e| e.id)
            .unwrap();

        let form = view.open_edit(budget).unwrap();
        form.draft.organizer_type = OrganizerKind::Category;
        assert!(view.submit_edit().await);

        assert!(store.rows(Table::EventOrganizingCategories).await.iter().all(|row| {
            row["event_id"] != budget.to_string()
        }));
        assert!(store.rows(Table::EventOrganizingMeetingCategories).await.iter().all(|row| {
            row["event_id"] != budget.to_string()
        }));

        let culture: Uuid = store
            .rows(Table::EventCategories)
            .await
            .iter()
            .find(|row| row["name"] == "Culture")
            .and_then(|row| row["id"].as_str())
            .unwrap()
            .parse()
            .unwrap();
        let form = view.open_edit(budget).unwrap();
        form.participants.organizer_ids = vec![culture];
        assert!(view.submit_edit().await);

        let event = view.event(budget).cloned().unwrap();
        assert_eq!(event.organizer_type, OrganizerKind::Category);
        assert_eq!(view.organizer_name(&event), "Culture");
    }

    #[tokio::test]
    async fn test_store_error_surfaces_raw_message() {
        let (store, mut view) = seeded().await;
        let id = view.visible_events()[0].id;
        store.fail_on(Operation::Delete, Table::EventInvitees).await;

        assert!(!view.delete_event(id).await);

        let notice = view.take_notice().unwrap();
        assert!(notice.is_error());
        assert_eq!(
            notice.message,
            "Query failed: injected failure on Delete event_invitees"
        );
    }

    #[tokio::test]
    async fn test_toggle_cancelled_and_notify() {
        let (store, mut view) = seeded().await;
        let id = view.visible_events()[0].id;

        assert!(view.toggle_cancelled(id).await);
        assert!(view.event(id).unwrap().is_cancelled);
        assert!(view.notify(id).await);
        assert_eq!(store.invocations().await.len(), 1);
    }

    #[tokio::test]
    async fn test_affordances_follow_capabilities() {
        let store = Arc::new(InMemoryStore::new());
        let caps = StaticCapabilities::parse("create:events").unwrap();
        let state = AppState::with_memory_cache(store).with_capabilities(Arc::new(caps));
        let view = ManageEventsView::new(state, march());

        let affordances = view.affordances();
        assert!(affordances.can_create);
        assert!(!affordances.can_update);
        assert!(!affordances.can_delete);
    }
}
