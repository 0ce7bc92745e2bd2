//! Member routes: profile, business affiliation, and the drop
//! lifecycle operations a member drives.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde::Deserialize;
use tracing::info;

use crate::AppState;
use crate::middleware::auth::AuthUser;
use crate::routes::{app_error_response, drop_error, member_error, wrong_role_response};
use dropsplit_db::repositories::{FinalizeDropInput, PaymentNoticeInput, ServiceInput};
use dropsplit_db::{DropRepository, MemberRepository};

/// Creates the member router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/member", get(profile))
        .route("/member/business", post(join_business))
        .route("/member/drops", post(create_drop))
        .route("/member/drops/paid", get(list_paid))
        .route(
            "/member/drops/{id}",
            get(get_drop).post(finalize_drop).delete(delete_drop),
        )
        .route("/member/drops/{id}/services", post(add_service))
        .route("/member/paynotice", post(create_payment_notice))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JoinBusinessRequest {
    business_name: String,
    code: String,
}

/// GET /member - Full member profile with business, teammates, and
/// drops.
async fn profile(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    let Some(member_id) = auth.member_id() else {
        return wrong_role_response("member");
    };
    let repo = MemberRepository::new((*state.db).clone());

    match repo.profile(member_id).await {
        Ok(profile) => Json(profile).into_response(),
        Err(e) => app_error_response(&member_error(e)),
    }
}

/// POST /member/business - Join a business by name and code.
async fn join_business(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<JoinBusinessRequest>,
) -> impl IntoResponse {
    let Some(member_id) = auth.member_id() else {
        return wrong_role_response("member");
    };
    let repo = MemberRepository::new((*state.db).clone());

    match repo
        .join_business(member_id, &payload.business_name, &payload.code)
        .await
    {
        Ok(member) => {
            info!(member_id, business_id = ?member.business_id, "Member joined business");
            Json(member).into_response()
        }
        Err(e) => app_error_response(&member_error(e)),
    }
}

/// POST /member/drops - Create a zeroed, unpaid drop.
async fn create_drop(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    let Some(member_id) = auth.member_id() else {
        return wrong_role_response("member");
    };
    let repo = DropRepository::new((*state.db).clone());

    match repo.create(member_id).await {
        Ok(drop) => (StatusCode::CREATED, Json(drop)).into_response(),
        Err(e) => app_error_response(&drop_error(e)),
    }
}

/// GET /member/drops/{id} - A member's own drop with its services.
async fn get_drop(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(drop_id): Path<i32>,
) -> impl IntoResponse {
    if auth.member_id().is_none() {
        return wrong_role_response("member");
    }
    let repo = DropRepository::new((*state.db).clone());

    match repo.get_for_caller(auth.caller(), drop_id).await {
        Ok(detail) => Json(detail).into_response(),
        Err(e) => app_error_response(&drop_error(e)),
    }
}

/// POST /member/drops/{id} - Finalize a drop with its figures.
async fn finalize_drop(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(drop_id): Path<i32>,
    Json(payload): Json<FinalizeDropInput>,
) -> impl IntoResponse {
    let Some(member_id) = auth.member_id() else {
        return wrong_role_response("member");
    };
    let repo = DropRepository::new((*state.db).clone());

    match repo.finalize(member_id, drop_id, payload).await {
        Ok(result) => Json(result).into_response(),
        Err(e) => app_error_response(&drop_error(e)),
    }
}

/// DELETE /member/drops/{id} - Delete a drop, reversing its balances.
async fn delete_drop(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(drop_id): Path<i32>,
) -> impl IntoResponse {
    let Some(member_id) = auth.member_id() else {
        return wrong_role_response("member");
    };
    let repo = DropRepository::new((*state.db).clone());

    match repo.delete(member_id, drop_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => app_error_response(&drop_error(e)),
    }
}

/// GET /member/drops/paid - The member's paid drops, newest first.
async fn list_paid(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    let Some(member_id) = auth.member_id() else {
        return wrong_role_response("member");
    };
    let repo = DropRepository::new((*state.db).clone());

    match repo.list_paid(member_id).await {
        Ok(drops) => Json(drops).into_response(),
        Err(e) => app_error_response(&drop_error(e)),
    }
}

/// POST /member/drops/{id}/services - Log a service line item.
async fn add_service(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(drop_id): Path<i32>,
    Json(payload): Json<ServiceInput>,
) -> impl IntoResponse {
    let Some(member_id) = auth.member_id() else {
        return wrong_role_response("member");
    };
    let repo = DropRepository::new((*state.db).clone());

    match repo.add_service(member_id, drop_id, payload).await {
        Ok(service) => (StatusCode::CREATED, Json(service)).into_response(),
        Err(e) => app_error_response(&drop_error(e)),
    }
}

/// POST /member/paynotice - Attach a payment notice to unpaid drops.
async fn create_payment_notice(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<PaymentNoticeInput>,
) -> impl IntoResponse {
    let Some(member_id) = auth.member_id() else {
        return wrong_role_response("member");
    };
    let repo = DropRepository::new((*state.db).clone());

    match repo.create_payment_notice(member_id, payload).await {
        Ok(notice) => {
            info!(member_id, notice_id = notice.id, "Payment notice created");
            (StatusCode::CREATED, Json(notice)).into_response()
        }
        Err(e) => app_error_response(&drop_error(e)),
    }
}
