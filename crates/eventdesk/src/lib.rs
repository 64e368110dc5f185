//! eventdesk - imperative shell of the back office.
//!
//! Wires the functional core to a cache backend and a store, and exposes the
//! query accessors, mutation orchestrators and view controllers used by the
//! CLI.

pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod mutations;
pub mod output;
pub mod queries;
pub mod state;
pub mod storage;
pub mod views;

pub use config::Config;
pub use error::{MutationError, Result};
pub use state::AppState;
