//! View controllers.
//!
//! Headless state machines behind the management screens: they hold the
//! loaded collections, the modal and form state and the last notice, and
//! call the orchestrators on submit.

mod categories;
mod events;

pub use categories::{CategoryRow, ManageCategoriesView, ManageCommitteesView};
pub use events::{EventsSnapshot, ManageEventsView, Sidebar};
