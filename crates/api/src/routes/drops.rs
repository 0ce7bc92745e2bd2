//! Shared drop route available to both roles.

use axum::{
    Json, Router,
    extract::{Path, State},
    response::IntoResponse,
    routing::get,
};

use crate::AppState;
use crate::middleware::auth::AuthUser;
use crate::routes::{app_error_response, drop_error};
use dropsplit_db::DropRepository;

/// Creates the shared drops router.
pub fn routes() -> Router<AppState> {
    Router::new().route("/drops/{id}", get(get_drop))
}

/// GET /drops/{id} - A drop with its services, visible to the member who
/// owns it or to the owner of that member's business.
async fn get_drop(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(drop_id): Path<i32>,
) -> impl IntoResponse {
    let repo = DropRepository::new((*state.db).clone());

    match repo.get_for_caller(auth.caller(), drop_id).await {
        Ok(detail) => Json(detail).into_response(),
        Err(e) => app_error_response(&drop_error(e)),
    }
}
