//! Owner routes: profile, business management, percentages, and batch
//! payouts.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch, post},
};
use serde::Deserialize;
use tracing::info;

use crate::AppState;
use crate::middleware::auth::AuthUser;
use crate::routes::{app_error_response, drop_error, member_error, wrong_role_response};
use dropsplit_db::repositories::PayDropsInput;
use dropsplit_db::{BusinessRepository, DropRepository, MemberRepository, OwnerRepository};
use dropsplit_shared::AppError;

/// Creates the owner router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/owner", get(profile))
        .route("/owner/business", post(create_business))
        .route("/owner/percentage", patch(update_percentage))
        .route("/owner/paydrops", post(pay_drops))
        .route(
            "/owner/memberdrops/{member_id}/{year}/{month}",
            get(member_drops_for_month),
        )
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateBusinessRequest {
    business_name: String,
    code: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdatePercentageRequest {
    member_id: i32,
    percentage: i32,
}

/// GET /owner - Nested owner profile: businesses, members, drops.
async fn profile(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    let Some(owner_id) = auth.owner_id() else {
        return wrong_role_response("owner");
    };
    let repo = OwnerRepository::new((*state.db).clone());

    match repo.profile(owner_id).await {
        Ok(Some(profile)) => Json(profile).into_response(),
        Ok(None) => app_error_response(&AppError::NotFound("Owner not found".to_string())),
        Err(e) => app_error_response(&AppError::Database(e.to_string())),
    }
}

/// POST /owner/business - Create a business with a join code.
async fn create_business(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateBusinessRequest>,
) -> impl IntoResponse {
    let Some(owner_id) = auth.owner_id() else {
        return wrong_role_response("owner");
    };
    let repo = BusinessRepository::new((*state.db).clone());

    // The (name, code) pair must stay unique; checked up front to give a
    // clear message instead of a raw constraint violation.
    match repo
        .find_by_name_and_code(&payload.business_name, &payload.code)
        .await
    {
        Ok(Some(_)) => {
            return app_error_response(&AppError::BadRequest(
                "A business with that name and code already exists".to_string(),
            ));
        }
        Ok(None) => {}
        Err(e) => return app_error_response(&AppError::Database(e.to_string())),
    }

    match repo
        .create(owner_id, &payload.business_name, &payload.code)
        .await
    {
        Ok(business) => {
            info!(owner_id, business_id = business.id, "Business created");
            (StatusCode::CREATED, Json(business)).into_response()
        }
        Err(e) => app_error_response(&AppError::Database(e.to_string())),
    }
}

/// PATCH /owner/percentage - Update a member's split percentage.
async fn update_percentage(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<UpdatePercentageRequest>,
) -> impl IntoResponse {
    let Some(owner_id) = auth.owner_id() else {
        return wrong_role_response("owner");
    };
    let repo = MemberRepository::new((*state.db).clone());

    match repo
        .update_percentage(owner_id, payload.member_id, payload.percentage)
        .await
    {
        Ok(member) => {
            info!(
                owner_id,
                member_id = member.id,
                percentage = member.percentage,
                "Member percentage updated"
            );
            Json(member).into_response()
        }
        Err(e) => app_error_response(&member_error(e)),
    }
}

/// POST /owner/paydrops - Pay out a batch of a member's drops.
async fn pay_drops(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<PayDropsInput>,
) -> impl IntoResponse {
    let Some(owner_id) = auth.owner_id() else {
        return wrong_role_response("owner");
    };
    let repo = DropRepository::new((*state.db).clone());

    match repo.pay_drops(owner_id, payload).await {
        Ok(batch) => (StatusCode::CREATED, Json(batch)).into_response(),
        Err(e) => app_error_response(&drop_error(e)),
    }
}

/// GET /owner/memberdrops/{member_id}/{year}/{month} - A member's drops
/// within one UTC calendar month.
async fn member_drops_for_month(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((member_id, year, month)): Path<(i32, i32, u32)>,
) -> impl IntoResponse {
    let Some(owner_id) = auth.owner_id() else {
        return wrong_role_response("owner");
    };
    let repo = DropRepository::new((*state.db).clone());

    match repo
        .list_member_month(owner_id, member_id, year, month)
        .await
    {
        Ok(drops) => Json(drops).into_response(),
        Err(e) => app_error_response(&drop_error(e)),
    }
}
