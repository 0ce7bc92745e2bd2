//! Application-wide error types.

use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Application error types.
///
/// Each variant maps to the HTTP status the API layer surfaces it as.
#[derive(Debug, Error)]
pub enum AppError {
    /// Malformed or missing input.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Authentication failed.
    #[error("Authentication failed: {0}")]
    Unauthorized(String),

    /// Authenticated but not allowed to touch the target resource.
    #[error("Access denied: {0}")]
    Forbidden(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A referenced record is in a state the operation cannot work with,
    /// e.g. a member with no business behind a finalize.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::BadRequest(_) | Self::InvalidState(_) => 400,
            Self::Unauthorized(_) => 401,
            Self::Forbidden(_) => 403,
            Self::NotFound(_) => 404,
            Self::Database(_) | Self::Internal(_) => 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(AppError::BadRequest(String::new()), 400)]
    #[case(AppError::Unauthorized(String::new()), 401)]
    #[case(AppError::Forbidden(String::new()), 403)]
    #[case(AppError::NotFound(String::new()), 404)]
    #[case(AppError::InvalidState(String::new()), 400)]
    #[case(AppError::Database(String::new()), 500)]
    #[case(AppError::Internal(String::new()), 500)]
    fn test_error_status_codes(#[case] err: AppError, #[case] status: u16) {
        assert_eq!(err.status_code(), status);
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            AppError::Forbidden("msg".into()).to_string(),
            "Access denied: msg"
        );
        assert_eq!(
            AppError::NotFound("msg".into()).to_string(),
            "Not found: msg"
        );
        assert_eq!(
            AppError::InvalidState("msg".into()).to_string(),
            "Invalid state: msg"
        );
    }
}
