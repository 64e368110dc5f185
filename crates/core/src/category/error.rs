use thiserror::Error;

/// Errors from category validation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CategoryError {
    #[error("Name is required")]
    EmptyName,
    #[error("Name must be at most {0} characters")]
    NameTooLong(usize),
    #[error("{label} is referenced by {meetings} meeting(s) and cannot be deleted")]
    HasMeetings { label: &'static str, meetings: usize },
}

/// Result type for category operations.
pub type Result<T> = std::result::Result<T, CategoryError>;
