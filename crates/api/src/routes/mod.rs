//! API route definitions and shared response helpers.

use axum::{
    Json, Router,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::error;

use crate::{AppState, middleware::auth::auth_middleware};
use dropsplit_db::repositories::{DropError, MemberError};
use dropsplit_shared::AppError;

pub mod auth;
pub mod businesses;
pub mod drops;
pub mod health;
pub mod member;
pub mod owner;

/// Creates the API router with protected routes that need state for middleware.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    // Protected routes that require authentication
    let protected_routes = Router::new()
        .merge(member::routes())
        .merge(owner::routes())
        .merge(drops::routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    // Combine public and protected routes
    Router::new()
        .merge(health::routes())
        .merge(auth::routes())
        .merge(businesses::routes())
        .merge(protected_routes)
}

/// Renders an application error as `{ "error": message }` with its
/// status code. Server-side errors are logged and replaced with a
/// generic message so internals never leak to clients.
pub(crate) fn app_error_response(err: &AppError) -> Response {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    let message = if status.is_server_error() {
        error!(error = %err, "Request failed");
        "An internal error occurred".to_string()
    } else {
        err.to_string()
    };

    (status, Json(json!({ "error": message }))).into_response()
}

/// Maps drop lifecycle errors onto the shared error taxonomy.
pub(crate) fn drop_error(err: DropError) -> AppError {
    match err {
        DropError::NotFound(_) | DropError::MemberNotFound(_) => AppError::NotFound(err.to_string()),
        DropError::NotDropOwner | DropError::NotMemberManager => {
            AppError::Forbidden(err.to_string())
        }
        DropError::NoBusiness => AppError::InvalidState(err.to_string()),
        DropError::NoDropsSpecified | DropError::InvalidMonth { .. } | DropError::Reconcile(_) => {
            AppError::BadRequest(err.to_string())
        }
        DropError::OwnerNotFound(_) => AppError::Internal(err.to_string()),
        DropError::Database(e) => AppError::Database(e.to_string()),
    }
}

/// Maps member repository errors onto the shared error taxonomy.
pub(crate) fn member_error(err: MemberError) -> AppError {
    match err {
        MemberError::NotFound(_) | MemberError::BusinessNotFound => {
            AppError::NotFound(err.to_string())
        }
        MemberError::NotManager => AppError::Forbidden(err.to_string()),
        MemberError::InvalidPercentage(_) => AppError::BadRequest(err.to_string()),
        MemberError::Database(e) => AppError::Database(e.to_string()),
    }
}

/// Renders the 403 returned when a caller's role does not match the
/// route group.
pub(crate) fn wrong_role_response(expected: &str) -> Response {
    app_error_response(&AppError::Forbidden(format!(
        "This endpoint is only available to {expected} accounts"
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(DropError::NotFound(1), 404)]
    #[case(DropError::MemberNotFound(1), 404)]
    #[case(DropError::NotDropOwner, 403)]
    #[case(DropError::NotMemberManager, 403)]
    #[case(DropError::NoBusiness, 400)]
    #[case(DropError::NoDropsSpecified, 400)]
    #[case(DropError::InvalidMonth { year: 2026, month: 13 }, 400)]
    #[case(DropError::OwnerNotFound(1), 500)]
    fn test_drop_error_mapping(#[case] err: DropError, #[case] status: u16) {
        assert_eq!(drop_error(err).status_code(), status);
    }

    #[rstest]
    #[case(MemberError::NotFound(1), 404)]
    #[case(MemberError::BusinessNotFound, 404)]
    #[case(MemberError::NotManager, 403)]
    #[case(MemberError::InvalidPercentage(120), 400)]
    fn test_member_error_mapping(#[case] err: MemberError, #[case] status: u16) {
        assert_eq!(member_error(err).status_code(), status);
    }
}
