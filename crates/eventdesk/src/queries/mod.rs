//! Query accessors.
//!
//! One accessor per entity or relation. Each reads its whole table, maps the
//! rows and caches the result under its [`QueryKey`] for the key's freshness
//! window. Mutations call [`QueryClient::invalidate`] on the keys they touch.

use std::collections::HashSet;
use std::future::Future;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

use eventdesk_core::cache::{
    deserialize_collection, serialize_collection, Cache, Freshness, QueryKey,
};
use eventdesk_core::event::{
    Category, CategoryKind, Event, EventAttendee, EventInvitee, EventOrganizingCategory,
    EventOrganizingMeetingCategory, Meeting, OrganizerKind, ParticipantMeetingCategory,
};
use eventdesk_core::storage::{
    decode_rows, infer_organizer_kind, needs_organizer_fallback, EventRow, Result, Store,
};

/// Cache-aside reader over the store.
#[derive(Clone)]
pub struct QueryClient {
    store: Arc<dyn Store>,
    cache: Arc<dyn Cache>,
    freshness: Freshness,
}

impl QueryClient {
    pub fn new(store: Arc<dyn Store>, cache: Arc<dyn Cache>, freshness: Freshness) -> Self {
        Self {
            store,
            cache,
            freshness,
        }
    }

    /// Drops a cached collection so the next read goes to the store.
    ///
    /// Cache failures are logged; the next read will refill the key anyway.
    pub async fn invalidate(&self, key: QueryKey) {
        if let Err(err) = self.cache.delete(key.name()).await {
            tracing::warn!(key = %key, error = %err, "Failed to invalidate cache key");
        }
    }

    /// Invalidates several keys in order.
    pub async fn invalidate_all(&self, keys: &[QueryKey]) {
        for key in keys {
            self.invalidate(*key).await;
        }
    }

    /// Returns the cached collection for `key` or loads and caches it.
    async fn cached<T, F, Fut>(&self, key: QueryKey, load: F) -> Result<Vec<T>>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<T>>>,
    {
        if let Ok(Some(bytes)) = self.cache.get(key.name()).await {
            match deserialize_collection(&bytes) {
                Ok(items) => {
                    tracing::trace!(key = %key, "Cache hit");
                    return Ok(items);
                }
                // Deserialization failed - treat as cache miss
                Err(err) => tracing::warn!(key = %key, error = %err, "Cached collection unreadable"),
            }
        }

        tracing::trace!(key = %key, "Cache miss");
        let items = load().await?;

        match serialize_collection(&items) {
            Ok(bytes) => {
                let ttl = self.freshness.window(key.volatility());
                if let Err(err) = self.cache.set(key.name(), &bytes, Some(ttl)).await {
                    tracing::warn!(key = %key, error = %err, "Failed to cache collection");
                }
            }
            Err(err) => tracing::warn!(key = %key, error = %err, "Failed to serialize collection"),
        }

        Ok(items)
    }

    async fn fetch_table<T: DeserializeOwned>(&self, key: QueryKey) -> Result<Vec<T>> {
        decode_rows(self.store.select(key.table(), &[]).await?)
    }

    async fn cached_table<T>(&self, key: QueryKey) -> Result<Vec<T>>
    where
        T: Serialize + DeserializeOwned,
    {
        self.cached(key, || self.fetch_table(key)).await
    }

    /// All events, with `organizer_type` resolved.
    pub async fn events(&self) -> Result<Vec<Event>> {
        self.cached(QueryKey::Events, || self.load_events()).await
    }

    async fn load_events(&self) -> Result<Vec<Event>> {
        let rows: Vec<EventRow> = self.fetch_table(QueryKey::Events).await?;
        if !needs_organizer_fallback(&rows) {
            return rows
                .into_iter()
                .map(|row| row.into_event(|_| OrganizerKind::default()))
                .collect();
        }

        tracing::debug!("Resolving organizer kind from links for legacy event rows");
        let meeting_organized: HashSet<Uuid> = self
            .organizing_meeting_categories()
            .await?
            .iter()
            .map(|l| l.event_id)
            .collect();
        let category_organized: HashSet<Uuid> = self
            .organizing_categories()
            .await?
            .iter()
            .map(|l| l.event_id)
            .collect();
        rows.into_iter()
            .map(|row| {
                row.into_event(|id| infer_organizer_kind(id, &meeting_organized, &category_organized))
            })
            .collect()
    }

    /// Finds one event by id.
    pub async fn event(&self, id: Uuid) -> Result<Option<Event>> {
        Ok(self.events().await?.into_iter().find(|e| e.id == id))
    }

    pub async fn meeting_categories(&self) -> Result<Vec<Category>> {
        self.cached_table(QueryKey::MeetingCategories).await
    }

    pub async fn event_categories(&self) -> Result<Vec<Category>> {
        self.cached_table(QueryKey::EventCategories).await
    }

    /// Categories of either namespace.
    pub async fn categories(&self, kind: CategoryKind) -> Result<Vec<Category>> {
        self.cached_table(QueryKey::categories(kind)).await
    }

    pub async fn organizing_meeting_categories(&self) -> Result<Vec<EventOrganizingMeetingCategory>> {
        self.cached_table(QueryKey::EventOrganizingMeetingCategories)
            .await
    }

    pub async fn organizing_categories(&self) -> Result<Vec<EventOrganizingCategory>> {
        self.cached_table(QueryKey::EventOrganizingCategories).await
    }

    pub async fn invitees(&self) -> Result<Vec<EventInvitee>> {
        self.cached_table(QueryKey::EventInvitees).await
    }

    pub async fn attendees(&self) -> Result<Vec<EventAttendee>> {
        self.cached_table(QueryKey::EventAttendees).await
    }

    pub async fn participant_meeting_categories(&self) -> Result<Vec<ParticipantMeetingCategory>> {
        self.cached_table(QueryKey::ParticipantMeetingCategories)
            .await
    }

    pub async fn meetings(&self) -> Result<Vec<Meeting>> {
        self.cached_table(QueryKey::Meetings).await
    }
}
