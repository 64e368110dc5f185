//! eventdesk_client - HTTP client for the hosted store.
//!
//! Implements the store, object storage and remote function traits of
//! `eventdesk_core` against a PostgREST-style REST service.

pub mod client;
pub mod error;

pub use client::StoreClient;
pub use error::{ClientError, Result};
