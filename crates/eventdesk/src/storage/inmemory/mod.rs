//! In-memory storage backend for testing.
//!
//! This module provides an in-memory implementation of the store, object
//! storage and remote function traits that keeps all rows in HashMaps wrapped
//! in `Arc<RwLock<_>>`. This is useful for testing and development scenarios
//! where persistence is not required.
//!
//! # Example
//!
//! ```rust,ignore
//! use eventdesk::storage::inmemory::InMemoryStore;
//!
//! let store = InMemoryStore::new();
//! // Use store for testing...
//! ```

mod seed;
mod store;

pub use seed::seed_demo_data;
pub use store::{InMemoryStore, Operation};
