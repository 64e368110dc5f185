//! Store backends.
//!
//! The hosted store is reached through `eventdesk_client::StoreClient`. This
//! module holds the in-memory backend used by tests and the demo mode.

pub mod inmemory;

pub use inmemory::{seed_demo_data, InMemoryStore, Operation};
