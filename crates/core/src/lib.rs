//! eventdesk_core - Functional core for the eventdesk back office.
//!
//! Pure data types and functions for events, categories and their link
//! tables, plus the traits that the imperative shell implements to reach the
//! hosted store, object storage, remote functions and the query cache.

pub mod cache;
pub mod category;
pub mod event;
pub mod serde;
pub mod storage;
pub mod view;
