//! Category orchestrators for both namespaces.

use serde_json::json;
use uuid::Uuid;

use eventdesk_core::cache::QueryKey;
use eventdesk_core::category::{validate_category_name, DeletionImpact};
use eventdesk_core::event::{diff_links, Category, CategoryKind, ParticipantMeetingCategory};
use eventdesk_core::storage::{
    columns, decode_row, decode_rows, encode_rows, Filter, RepositoryError, Row, Table,
};

use super::updated_stamp;
use crate::error::Result;
use crate::state::AppState;

fn single_category(rows: Vec<Row>, kind: CategoryKind, id: &str) -> Result<Category> {
    let row = rows.into_iter().next().ok_or_else(|| RepositoryError::NotFound {
        entity_type: kind.label(),
        id: id.to_string(),
    })?;
    Ok(decode_row(row)?)
}

/// Creates a category. The name is trimmed and must not be blank.
pub async fn create_category(state: &AppState, kind: CategoryKind, name: &str) -> Result<Category> {
    let name = validate_category_name(name)?;

    let mut row = Row::new();
    row.insert(columns::NAME.to_string(), json!(name));
    row.insert(columns::CREATED_BY.to_string(), json!(state.actor));
    let inserted = state.store.insert(kind.table(), vec![row]).await?;
    let category = single_category(inserted, kind, &name)?;

    state.queries.invalidate(QueryKey::categories(kind)).await;
    tracing::debug!(kind = ?kind, id = %category.id, "Created category");
    Ok(category)
}

/// Renames a category.
pub async fn rename_category(
    state: &AppState,
    kind: CategoryKind,
    id: Uuid,
    name: &str,
) -> Result<Category> {
    let name = validate_category_name(name)?;

    let mut patch = updated_stamp(&state.actor);
    patch.insert(columns::NAME.to_string(), json!(name));
    let updated = state
        .store
        .update(kind.table(), patch, &[Filter::eq_id(columns::ID, id)])
        .await?;
    let category = single_category(updated, kind, &id.to_string())?;

    state.queries.invalidate(QueryKey::categories(kind)).await;
    Ok(category)
}

/// Counts the rows that depend on a category, from the cached collections.
pub async fn assess_category_deletion(
    state: &AppState,
    kind: CategoryKind,
    id: Uuid,
) -> Result<DeletionImpact> {
    let impact = match kind {
        CategoryKind::Meeting => DeletionImpact::for_meeting_category(
            id,
            &state.queries.meetings().await?,
            &state.queries.organizing_meeting_categories().await?,
            &state.queries.participant_meeting_categories().await?,
        ),
        CategoryKind::Event => {
            DeletionImpact::for_event_category(id, &state.queries.organizing_categories().await?)
        }
    };
    Ok(impact)
}

/// Deletes a category together with the link rows pointing at it.
///
/// A meeting category that still has meetings is refused before any write.
/// Returns the impact that was applied.
pub async fn delete_category(
    state: &AppState,
    kind: CategoryKind,
    id: Uuid,
) -> Result<DeletionImpact> {
    let impact = assess_category_deletion(state, kind, id).await?;
    impact.ensure_deletable(kind)?;

    let organizer_kind = kind.organizer_kind();
    match kind {
        CategoryKind::Meeting => {
            let by_category = [Filter::eq_id(columns::MEETING_CATEGORY_ID, id)];
            state
                .store
                .delete(organizer_kind.link_table(), &by_category)
                .await?;
            state
                .store
                .delete(Table::ParticipantMeetingCategories, &by_category)
                .await?;
        }
        CategoryKind::Event => {
            state
                .store
                .delete(
                    organizer_kind.link_table(),
                    &[Filter::eq_id(columns::CATEGORY_ID, id)],
                )
                .await?;
        }
    }
    state
        .store
        .delete(kind.table(), &[Filter::eq_id(columns::ID, id)])
        .await?;

    state
        .queries
        .invalidate_all(&[
            QueryKey::categories(kind),
            QueryKey::organizer_links(organizer_kind),
        ])
        .await;
    if kind == CategoryKind::Meeting {
        state
            .queries
            .invalidate(QueryKey::ParticipantMeetingCategories)
            .await;
    }
    tracing::debug!(kind = ?kind, id = %id, impact = ?impact, "Deleted category");
    Ok(impact)
}

/// Sets the meeting categories a participant belongs to.
pub async fn set_participant_meeting_categories(
    state: &AppState,
    participant_id: Uuid,
    meeting_category_ids: &[Uuid],
) -> Result<()> {
    let by_participant = [Filter::eq_id(columns::PARTICIPANT_ID, participant_id)];
    let current: Vec<ParticipantMeetingCategory> = decode_rows(
        state
            .store
            .select(Table::ParticipantMeetingCategories, &by_participant)
            .await?,
    )?;
    let desired: Vec<ParticipantMeetingCategory> = meeting_category_ids
        .iter()
        .map(|&meeting_category_id| ParticipantMeetingCategory {
            participant_id,
            meeting_category_id,
        })
        .collect();
    let diff = diff_links(&current, &desired);

    if !diff.to_remove.is_empty() {
        let removed: Vec<Uuid> = diff.to_remove.iter().map(|l| l.meeting_category_id).collect();
        state
            .store
            .delete(
                Table::ParticipantMeetingCategories,
                &[
                    Filter::eq_id(columns::PARTICIPANT_ID, participant_id),
                    Filter::in_ids(columns::MEETING_CATEGORY_ID, &removed),
                ],
            )
            .await?;
    }
    if !diff.to_add.is_empty() {
        state
            .store
            .insert(Table::ParticipantMeetingCategories, encode_rows(&diff.to_add)?)
            .await?;
    }

    state
        .queries
        .invalidate(QueryKey::ParticipantMeetingCategories)
        .await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use eventdesk_core::category::CategoryError;
    use eventdesk_core::storage::{encode_row, Store};

    use crate::error::MutationError;
    use crate::storage::{InMemoryStore, Operation};

    fn setup() -> (Arc<InMemoryStore>, AppState) {
        let store = Arc::new(InMemoryStore::new());
        let state = AppState::with_memory_cache(store.clone());
        (store, state)
    }

    #[tokio::test]
    async fn test_create_category_trims_name() {
        let (_store, state) = setup();

        let category = create_category(&state, CategoryKind::Event, "  Culture ")
            .await
            .unwrap();

        assert_eq!(category.name, "Culture");
        assert_eq!(category.created_by.as_deref(), Some("eventdesk"));
        assert_eq!(state.queries.event_categories().await.unwrap(), vec![category]);
    }

    #[tokio::test]
    async fn test_blank_name_is_rejected_before_store() {
        let (store, state) = setup();

        let result = create_category(&state, CategoryKind::Meeting, "   ").await;

        assert_eq!(result, Err(MutationError::Category(CategoryError::EmptyName)));
        assert!(store.calls().await.is_empty());
    }

    #[tokio::test]
    async fn test_rename_category() {
        let (_store, state) = setup();
        let category = create_category(&state, CategoryKind::Meeting, "Finanse")
            .await
            .unwrap();

        let renamed = rename_category(&state, CategoryKind::Meeting, category.id, "Finance")
            .await
            .unwrap();

        assert_eq!(renamed.id, category.id);
        assert_eq!(renamed.name, "Finance");
        assert_eq!(renamed.updated_by.as_deref(), Some("eventdesk"));
    }

    #[tokio::test]
    async fn test_rename_missing_category_is_not_found() {
        let (_store, state) = setup();

        let result = rename_category(&state, CategoryKind::Event, Uuid::new_v4(), "Sports").await;

        assert!(matches!(
            result,
            Err(MutationError::Repository(RepositoryError::NotFound { .. }))
        ));
    }

    #[tokio::test]
    async fn test_delete_event_category_drops_organizer_links() {
        let (store, state) = setup();
        let category = create_category(&state, CategoryKind::Event, "Sports")
            .await
            .unwrap();
        store
            .insert(
                Table::EventOrganizingCategories,
                vec![encode_row(&json!({"event_id": Uuid::new_v4(), "category_id": category.id}))
                    .unwrap()],
            )
            .await
            .unwrap();

        let impact = delete_category(&state, CategoryKind::Event, category.id)
            .await
            .unwrap();

        assert_eq!(impact.events, 1);
        assert!(store.rows(Table::EventOrganizingCategories).await.is_empty());
        assert!(state.queries.event_categories().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_meeting_category_with_meetings_is_kept() {
        let (store, state) = setup();
        let category = create_category(&state, CategoryKind::Meeting, "Legal")
            .await
            .unwrap();
        store
            .insert(
                Table::Meetings,
                vec![encode_row(&json!({"commission_id": category.id})).unwrap()],
            )
            .await
            .unwrap();
        store.clear_calls().await;

        let result = delete_category(&state, CategoryKind::Meeting, category.id).await;

        assert!(matches!(
            result,
            Err(MutationError::Category(CategoryError::HasMeetings { meetings: 1, .. }))
        ));
        assert_eq!(store.write_count().await, 0);
        assert_eq!(store.rows(Table::MeetingCategories).await.len(), 1);
    }

    #[tokio::test]
    async fn test_set_participant_meeting_categories_writes_only_the_diff() {
        let (store, state) = setup();
        let participant = Uuid::new_v4();
        let (a, b, c) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        set_participant_meeting_categories(&state, participant, &[a, b])
            .await
            .unwrap();
        store.clear_calls().await;

        set_participant_meeting_categories(&state, participant, &[b, c])
            .await
            .unwrap();

        assert_eq!(
            store.calls().await,
            vec![
                (Operation::Select, Table::ParticipantMeetingCategories),
                (Operation::Delete, Table::ParticipantMeetingCategories),
                (Operation::Insert, Table::ParticipantMeetingCategories),
            ]
        );
        let mut ids: Vec<Uuid> = state
            .queries
            .participant_meeting_categories()
            .await
            .unwrap()
            .iter()
            .map(|l| l.meeting_category_id)
            .collect();
        ids.sort();
        let mut expected = vec![b, c];
        expected.sort();
        assert_eq!(ids, expected);
    }
}
