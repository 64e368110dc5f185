//! Shared application state.
//!
//! Holds the collaborators every orchestrator and view needs, as trait
//! objects so the hosted store and the in-memory store are interchangeable.

use std::sync::Arc;

use eventdesk_core::cache::{Cache, Freshness};
use eventdesk_core::storage::{ObjectStorage, RemoteFunctions, Store};
use eventdesk_core::view::{AllowAll, CapabilityCheck};

use crate::cache::MemoryCache;
use crate::queries::QueryClient;

/// Shared application state.
///
/// Cheap to clone; every field is reference counted.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub objects: Arc<dyn ObjectStorage>,
    pub functions: Arc<dyn RemoteFunctions>,
    pub queries: QueryClient,
    pub capabilities: Arc<dyn CapabilityCheck>,
    /// Identity stamped on `created_by` / `updated_by`.
    pub actor: String,
}

impl AppState {
    /// Creates state over a backend that implements all three store traits.
    pub fn new<B>(backend: Arc<B>, cache: Arc<dyn Cache>, freshness: Freshness) -> Self
    where
        B: Store + ObjectStorage + RemoteFunctions + 'static,
    {
        let store: Arc<dyn Store> = backend.clone();
        Self {
            queries: QueryClient::new(store.clone(), cache, freshness),
            store,
            objects: backend.clone(),
            functions: backend,
            capabilities: Arc::new(AllowAll),
            actor: "eventdesk".to_string(),
        }
    }

    /// Creates state with a fresh memory cache and default freshness.
    pub fn with_memory_cache<B>(backend: Arc<B>) -> Self
    where
        B: Store + ObjectStorage + RemoteFunctions + 'static,
    {
        Self::new(backend, Arc::new(MemoryCache::new(1_000)), Freshness::default())
    }

    pub fn with_capabilities(mut self, capabilities: Arc<dyn CapabilityCheck>) -> Self {
        self.capabilities = capabilities;
        self
    }

    pub fn with_actor(mut self, actor: impl Into<String>) -> Self {
        self.actor = actor.into();
        self
    }
}
