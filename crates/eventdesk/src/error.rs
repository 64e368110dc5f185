use eventdesk_core::category::CategoryError;
use eventdesk_core::event::EventError;
use eventdesk_core::storage::RepositoryError;
use thiserror::Error;

/// Errors returned by mutation orchestrators.
///
/// Validation failures are raised before any store call. Store failures are
/// propagated as-is, without retry.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MutationError {
    #[error(transparent)]
    Event(#[from] EventError),
    #[error(transparent)]
    Category(#[from] CategoryError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl MutationError {
    /// Returns true if the error was raised before reaching the store.
    pub fn is_validation(&self) -> bool {
        matches!(self, MutationError::Event(_) | MutationError::Category(_))
    }
}

/// Result type for mutations.
pub type Result<T> = std::result::Result<T, MutationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_pass_through() {
        let error: MutationError = EventError::EmptySubject.into();
        assert_eq!(error.to_string(), "Event subject cannot be empty");
        assert!(error.is_validation());

        let error: MutationError = RepositoryError::QueryFailed("HTTP 500: boom".to_string()).into();
        assert_eq!(error.to_string(), "Query failed: HTTP 500: boom");
        assert!(!error.is_validation());
    }
}
