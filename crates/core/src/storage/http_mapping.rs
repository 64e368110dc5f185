//! Pure functions for mapping hosted store HTTP statuses to repository errors.
//!
//! This module follows the Functional Core pattern - pure functions with no
//! side effects. The HTTP client calls it once it has read a failed response.

use super::RepositoryError;

/// Maps an HTTP status code and response body to a [`RepositoryError`].
///
/// - `400`, `422` -> `InvalidData` (bad filter, constraint violation)
/// - `401`, `403` -> `Unauthorized`
/// - `404` -> `QueryFailed` (unknown table or route)
/// - `409` -> `Conflict` (duplicate key, foreign key violation)
/// - `502`, `503`, `504` -> `ConnectionFailed`
/// - anything else -> `QueryFailed`
///
/// # Examples
///
/// ```
/// use eventdesk_core::storage::{repository_error_from_status, RepositoryError};
///
/// let error = repository_error_from_status(409, "duplicate key".to_string());
/// assert_eq!(error, RepositoryError::Conflict("duplicate key".to_string()));
/// ```
pub fn repository_error_from_status(status: u16, message: String) -> RepositoryError {
    match status {
        400 | 422 => RepositoryError::InvalidData(message),
        401 | 403 => RepositoryError::Unauthorized(message),
        409 => RepositoryError::Conflict(message),
        502..=504 => RepositoryError::ConnectionFailed(message),
        _ => RepositoryError::QueryFailed(format!("HTTP {}: {}", status, message)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bad_request_maps_to_invalid_data() {
        assert_eq!(
            repository_error_from_status(400, "bad filter".to_string()),
            RepositoryError::InvalidData("bad filter".to_string())
        );
        assert!(matches!(
            repository_error_from_status(422, "x".to_string()),
            RepositoryError::InvalidData(_)
        ));
    }

    #[test]
    fn test_auth_failures_map_to_unauthorized() {
        assert!(matches!(
            repository_error_from_status(401, "x".to_string()),
            RepositoryError::Unauthorized(_)
        ));
        assert!(matches!(
            repository_error_from_status(403, "x".to_string()),
            RepositoryError::Unauthorized(_)
        ));
    }

    #[test]
    fn test_conflict_maps_to_conflict() {
        assert_eq!(
            repository_error_from_status(409, "fk violation".to_string()),
            RepositoryError::Conflict("fk violation".to_string())
        );
    }

    #[test]
    fn test_gateway_errors_map_to_connection_failed() {
        for status in [502, 503, 504] {
            assert!(matches!(
                repository_error_from_status(status, "down".to_string()),
                RepositoryError::ConnectionFailed(_)
            ));
        }
    }

    #[test]
    fn test_other_statuses_keep_the_code() {
        assert_eq!(
            repository_error_from_status(404, "relation does not exist".to_string()),
            RepositoryError::QueryFailed("HTTP 404: relation does not exist".to_string())
        );
        assert!(matches!(
            repository_error_from_status(500, "boom".to_string()),
            RepositoryError::QueryFailed(_)
        ));
    }
}
