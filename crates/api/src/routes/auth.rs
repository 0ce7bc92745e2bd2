//! Authentication routes for owner and member registration and login.

use axum::{Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::post};
use serde_json::json;
use tracing::{error, info};

use crate::AppState;
use crate::routes::app_error_response;
use dropsplit_core::auth::{hash_password, verify_password};
use dropsplit_db::{BusinessRepository, MemberRepository, OwnerRepository};
use dropsplit_shared::auth::{
    LoginRequest, MemberRegisterRequest, OwnerRegisterRequest, TokenResponse,
};
use dropsplit_shared::{AppError, Role};

/// Creates the auth router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/owner/register", post(owner_register))
        .route("/auth/owner/login", post(owner_login))
        .route("/auth/member/register", post(member_register))
        .route("/auth/member/login", post(member_login))
}

/// POST /auth/owner/register - Create an owner account.
async fn owner_register(
    State(state): State<AppState>,
    Json(payload): Json<OwnerRegisterRequest>,
) -> impl IntoResponse {
    let repo = OwnerRepository::new((*state.db).clone());

    match repo.username_exists(&payload.username).await {
        Ok(true) => {
            return app_error_response(&AppError::BadRequest(
                "Username is already taken".to_string(),
            ));
        }
        Ok(false) => {}
        Err(e) => return app_error_response(&AppError::Database(e.to_string())),
    }

    let password_hash = match hash_password(&payload.password) {
        Ok(h) => h,
        Err(e) => {
            error!(error = %e, "Password hashing failed");
            return app_error_response(&AppError::Internal(e.to_string()));
        }
    };

    let owner = match repo
        .create(&payload.username, &password_hash, &payload.owner_name)
        .await
    {
        Ok(o) => o,
        Err(e) => return app_error_response(&AppError::Database(e.to_string())),
    };

    let token = match state.jwt_service.generate_token(owner.id, Role::Owner) {
        Ok(t) => t,
        Err(e) => {
            error!(error = %e, "Failed to generate token");
            return app_error_response(&AppError::Internal(e.to_string()));
        }
    };

    info!(owner_id = owner.id, "Owner registered");

    (
        StatusCode::CREATED,
        Json(json!({
            "owner": owner,
            "token": token,
            "expiresIn": state.jwt_service.token_expires_in(),
        })),
    )
        .into_response()
}

/// POST /auth/owner/login - Authenticate an owner and return a token.
async fn owner_login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> impl IntoResponse {
    let repo = OwnerRepository::new((*state.db).clone());

    let owner = match repo.find_by_username(&payload.username).await {
        Ok(Some(o)) => o,
        Ok(None) => {
            info!(username = %payload.username, "Login attempt for unknown owner");
            return invalid_credentials();
        }
        Err(e) => return app_error_response(&AppError::Database(e.to_string())),
    };

    match check_password(&payload.password, &owner.password_hash) {
        Ok(()) => {}
        Err(response) => return response,
    }

    match state.jwt_service.generate_token(owner.id, Role::Owner) {
        Ok(token) => {
            info!(owner_id = owner.id, "Owner logged in");
            Json(TokenResponse {
                token,
                expires_in: state.jwt_service.token_expires_in(),
            })
            .into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to generate token");
            app_error_response(&AppError::Internal(e.to_string()))
        }
    }
}

/// POST /auth/member/register - Create a member account, optionally
/// joining a business by name and code.
async fn member_register(
    State(state): State<AppState>,
    Json(payload): Json<MemberRegisterRequest>,
) -> impl IntoResponse {
    let members = MemberRepository::new((*state.db).clone());

    match members.username_exists(&payload.username).await {
        Ok(true) => {
            return app_error_response(&AppError::BadRequest(
                "Username is already taken".to_string(),
            ));
        }
        Ok(false) => {}
        Err(e) => return app_error_response(&AppError::Database(e.to_string())),
    }

    // A business is only resolved when both the name and the code are
    // supplied; registration without them creates an unaffiliated member.
    let business_id = match (&payload.business_name, &payload.code) {
        (Some(name), Some(code)) => {
            let businesses = BusinessRepository::new((*state.db).clone());
            match businesses.find_by_name_and_code(name, code).await {
                Ok(Some(b)) => Some(b.id),
                Ok(None) => {
                    return app_error_response(&AppError::NotFound(
                        "No business matches that name and code".to_string(),
                    ));
                }
                Err(e) => return app_error_response(&AppError::Database(e.to_string())),
            }
        }
        (None, None) => None,
        _ => {
            return app_error_response(&AppError::BadRequest(
                "businessName and code must be supplied together".to_string(),
            ));
        }
    };

    let password_hash = match hash_password(&payload.password) {
        Ok(h) => h,
        Err(e) => {
            error!(error = %e, "Password hashing failed");
            return app_error_response(&AppError::Internal(e.to_string()));
        }
    };

    let member = match members
        .create(
            &payload.username,
            &password_hash,
            &payload.member_name,
            business_id,
        )
        .await
    {
        Ok(m) => m,
        Err(e) => return app_error_response(&AppError::Database(e.to_string())),
    };

    let token = match state.jwt_service.generate_token(member.id, Role::Member) {
        Ok(t) => t,
        Err(e) => {
            error!(error = %e, "Failed to generate token");
            return app_error_response(&AppError::Internal(e.to_string()));
        }
    };

    info!(member_id = member.id, "Member registered");

    (
        StatusCode::CREATED,
        Json(json!({
            "member": member,
            "token": token,
            "expiresIn": state.jwt_service.token_expires_in(),
        })),
    )
        .into_response()
}

/// POST /auth/member/login - Authenticate a member and return a token.
async fn member_login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> impl IntoResponse {
    let repo = MemberRepository::new((*state.db).clone());

    let member = match repo.find_by_username(&payload.username).await {
        Ok(Some(m)) => m,
        Ok(None) => {
            info!(username = %payload.username, "Login attempt for unknown member");
            return invalid_credentials();
        }
        Err(e) => return app_error_response(&AppError::Database(e.to_string())),
    };

    match check_password(&payload.password, &member.password_hash) {
        Ok(()) => {}
        Err(response) => return response,
    }

    match state.jwt_service.generate_token(member.id, Role::Member) {
        Ok(token) => {
            info!(member_id = member.id, "Member logged in");
            Json(TokenResponse {
                token,
                expires_in: state.jwt_service.token_expires_in(),
            })
            .into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to generate token");
            app_error_response(&AppError::Internal(e.to_string()))
        }
    }
}

/// Verifies a password, mapping failures onto login responses.
fn check_password(
    password: &str,
    password_hash: &str,
) -> Result<(), axum::response::Response> {
    match verify_password(password, password_hash) {
        Ok(true) => Ok(()),
        Ok(false) => Err(invalid_credentials()),
        Err(e) => {
            error!(error = %e, "Password verification error");
            Err(app_error_response(&AppError::Internal(e.to_string())))
        }
    }
}

fn invalid_credentials() -> axum::response::Response {
    app_error_response(&AppError::Unauthorized(
        "Invalid username or password".to_string(),
    ))
}
