//! Authentication middleware for protected routes.

use axum::{
    Json,
    extract::{FromRequestParts, Request, State},
    http::{StatusCode, header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::AppState;
use dropsplit_shared::{Caller, Claims, JwtError, Role};

/// Extracts the bearer token from the Authorization header.
fn extract_bearer_token(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .or_else(|| header.strip_prefix("bearer "))
}

/// Authentication middleware that validates JWT tokens.
///
/// This middleware:
/// 1. Extracts the Bearer token from the Authorization header
/// 2. Validates the token using the JWT service
/// 3. Stores the claims in request extensions for handlers to access
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let Some(token) = auth_header.and_then(extract_bearer_token) else {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "Authorization header with Bearer token is required" })),
        )
            .into_response();
    };

    match state.jwt_service.validate_token(token) {
        Ok(claims) => {
            request.extensions_mut().insert(claims);
            next.run(request).await
        }
        Err(e) => {
            let message = match e {
                JwtError::Expired => "Token has expired",
                _ => "Invalid or malformed token",
            };
            (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": message })),
            )
                .into_response()
        }
    }
}

/// Extractor for the authenticated caller.
///
/// Use this in handlers to get the caller resolved by the middleware:
///
/// ```ignore
/// async fn handler(auth: AuthUser) -> impl IntoResponse {
///     let caller = auth.caller();
///     // ...
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    /// Returns the caller identity from the claims.
    #[must_use]
    pub const fn caller(&self) -> Caller {
        self.0.caller()
    }

    /// Returns the account id if the caller is a member.
    #[must_use]
    pub const fn member_id(&self) -> Option<i32> {
        match self.0.role {
            Role::Member => Some(self.0.sub),
            Role::Owner => None,
        }
    }

    /// Returns the account id if the caller is an owner.
    #[must_use]
    pub const fn owner_id(&self) -> Option<i32> {
        match self.0.role {
            Role::Owner => Some(self.0.sub),
            Role::Member => None,
        }
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<serde_json::Value>);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Claims>()
            .cloned()
            .map(AuthUser)
            .ok_or_else(|| {
                (
                    StatusCode::UNAUTHORIZED,
                    Json(json!({ "error": "Authentication required" })),
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(extract_bearer_token("Bearer abc.def.ghi"), Some("abc.def.ghi"));
        assert_eq!(extract_bearer_token("bearer abc"), Some("abc"));
        assert_eq!(extract_bearer_token("Basic abc"), None);
        assert_eq!(extract_bearer_token(""), None);
    }

    #[test]
    fn test_auth_user_role_accessors() {
        let expires = chrono::Utc::now() + chrono::Duration::minutes(5);
        let member = AuthUser(Claims::new(3, Role::Member, expires));
        assert_eq!(member.member_id(), Some(3));
        assert_eq!(member.owner_id(), None);

        let owner = AuthUser(Claims::new(9, Role::Owner, expires));
        assert_eq!(owner.owner_id(), Some(9));
        assert_eq!(owner.member_id(), None);
        assert_eq!(owner.caller().role, Role::Owner);
    }
}
