//! Category management view, shared by both namespaces.

use serde::Serialize;
use uuid::Uuid;

use eventdesk_core::category::{DeletionImpact, DeletionVerdict};
use eventdesk_core::event::{
    Category, CategoryKind, EventOrganizingCategory, EventOrganizingMeetingCategory, Meeting,
    ParticipantMeetingCategory,
};
use eventdesk_core::storage::Result as StoreResult;
use eventdesk_core::view::{Affordances, LoadState, ModalMode, Notice, ResourceKind};

use crate::mutations;
use crate::state::AppState;

/// One line of the category table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRow {
    pub id: Uuid,
    pub name: String,
    /// Events organized by the category.
    pub events: usize,
    /// Participants belonging to the category. Always 0 for event categories.
    pub participants: usize,
    /// Meetings held by the category. Always 0 for event categories.
    pub meetings: usize,
}

#[derive(Debug, Clone, Default)]
struct Snapshot {
    categories: Vec<Category>,
    meetings: Vec<Meeting>,
    meeting_links: Vec<EventOrganizingMeetingCategory>,
    category_links: Vec<EventOrganizingCategory>,
    participant_links: Vec<ParticipantMeetingCategory>,
}

impl Snapshot {
    async fn load(state: &AppState, kind: CategoryKind) -> StoreResult<Self> {
        let categories = state.queries.categories(kind).await?;
        Ok(match kind {
            CategoryKind::Meeting => Self {
                categories,
                meetings: state.queries.meetings().await?,
                meeting_links: state.queries.organizing_meeting_categories().await?,
                participant_links: state.queries.participant_meeting_categories().await?,
                ..Self::default()
            },
            CategoryKind::Event => Self {
                categories,
                category_links: state.queries.organizing_categories().await?,
                ..Self::default()
            },
        })
    }

    fn impact(&self, kind: CategoryKind, id: Uuid) -> DeletionImpact {
        match kind {
            CategoryKind::Meeting => DeletionImpact::for_meeting_category(
                id,
                &self.meetings,
                &self.meeting_links,
                &self.participant_links,
            ),
            CategoryKind::Event => DeletionImpact::for_event_category(id, &self.category_links),
        }
    }
}

/// The committees screen: a [`ManageCategoriesView`] over meeting categories.
pub type ManageCommitteesView = ManageCategoriesView;

/// Controller for the meeting category or event category screen.
pub struct ManageCategoriesView {
    state: AppState,
    kind: CategoryKind,
    search: String,
    modal: ModalMode,
    pending_delete: Option<(Uuid, DeletionImpact)>,
    notice: Option<Notice>,
    load: LoadState,
    snapshot: Snapshot,
}

impl ManageCategoriesView {
    pub fn new(state: AppState, kind: CategoryKind) -> Self {
        Self {
            state,
            kind,
            search: String::new(),
            modal: ModalMode::Closed,
            pending_delete: None,
            notice: None,
            load: LoadState::Idle,
            snapshot: Snapshot::default(),
        }
    }

    pub async fn refresh(&mut self) {
        match Snapshot::load(&self.state, self.kind).await {
            Ok(snapshot) => {
                self.snapshot = snapshot;
                self.load = LoadState::Loaded;
            }
            Err(err) => {
                tracing::warn!(kind = ?self.kind, error = %err, "Failed to load categories");
                self.load = LoadState::Failed(err.to_string());
            }
        }
    }

    /// Controller for the committees screen.
    pub fn committees(state: AppState) -> ManageCommitteesView {
        Self::new(state, CategoryKind::Meeting)
    }

    pub fn kind(&self) -> CategoryKind {
        self.kind
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search = term.into();
    }

    /// Categories matching the search, sorted by name, with their counts.
    pub fn rows(&self) -> Vec<CategoryRow> {
        let term = self.search.trim().to_lowercase();
        let mut rows: Vec<CategoryRow> = self
            .snapshot
            .categories
            .iter()
            .filter(|c| term.is_empty() || c.name.to_lowercase().contains(&term))
            .map(|c| {
                let impact = self.snapshot.impact(self.kind, c.id);
                CategoryRow {
                    id: c.id,
                    name: c.name.clone(),
                    events: impact.events,
                    participants: impact.participants,
                    meetings: impact.meetings,
                }
            })
            .collect();
        rows.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        rows
    }

    pub fn affordances(&self) -> Affordances {
        let resource = match self.kind {
            CategoryKind::Meeting => ResourceKind::MeetingCategories,
            CategoryKind::Event => ResourceKind::EventCategories,
        };
        Affordances::resolve(self.state.capabilities.as_ref(), resource)
    }

    pub fn modal(&self) -> ModalMode {
        self.modal
    }

    pub fn open_create(&mut self) {
        self.modal = ModalMode::Create;
    }

    pub fn open_edit(&mut self, id: Uuid) {
        self.modal = ModalMode::Edit(id);
    }

    pub fn close_modal(&mut self) {
        self.modal = ModalMode::Closed;
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn take_notice(&mut self) -> Option<Notice> {
        self.notice.take()
    }

    /// Submits the create or rename form, depending on the open modal.
    pub async fn submit(&mut self, name: &str) -> bool {
        let result = match self.modal {
            ModalMode::Create => mutations::create_category(&self.state, self.kind, name)
                .await
                .map(|c| format!("{} \"{}\" created", self.kind.label(), c.name)),
            ModalMode::Edit(id) => mutations::rename_category(&self.state, self.kind, id, name)
                .await
                .map(|c| format!("{} renamed to \"{}\"", self.kind.label(), c.name)),
            ModalMode::View(_) | ModalMode::Closed => return false,
        };
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

    /// Checks the dependents of a category before asking for confirmation.
    ///
    /// A blocked deletion sets an error notice and never reaches the store.
    pub fn request_delete(&mut self, id: Uuid) -> DeletionVerdict {
        let impact = self.snapshot.impact(self.kind, id);
        let verdict = impact.verdict();
        match impact.ensure_deletable(self.kind) {
            Ok(()) => self.pending_delete = Some((id, impact)),
            Err(err) => {
                self.pending_delete = None;
                self.notice = Some(Notice::error(&err));
            }
        }
        verdict
    }

    /// Confirmation text for the pending deletion, if it drops links.
    pub fn pending_warning(&self) -> Option<String> {
        self.pending_delete.and_then(|(_, impact)| impact.warning())
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    pub async fn confirm_delete(&mut self) -> bool {
        let Some((id, _)) = self.pending_delete.take() else {
            return false;
        };
        match mutations::delete_category(&self.state, self.kind, id).await {
            Ok(_) => {
                self.notice = Some(Notice::success(format!("{} deleted", self.kind.label())));
                self.refresh().await;
                true
            }
            Err(err) => {
                self.notice = Some(Notice::error(&err));
                false
            }
        }
    }
}
