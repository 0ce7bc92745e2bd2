//! Public business directory route.

use axum::{Json, Router, extract::State, response::IntoResponse, routing::get};
use serde_json::json;

use crate::AppState;
use crate::routes::app_error_response;
use dropsplit_db::BusinessRepository;
use dropsplit_shared::AppError;

/// Creates the businesses router.
pub fn routes() -> Router<AppState> {
    Router::new().route("/businesses", get(list_businesses))
}

/// GET /businesses - Lists business names members can join.
///
/// Join codes are deliberately omitted; a member must get the code from
/// the owner out of band.
async fn list_businesses(State(state): State<AppState>) -> impl IntoResponse {
    let repo = BusinessRepository::new((*state.db).clone());

    match repo.list_all().await {
        Ok(businesses) => {
            let listing: Vec<_> = businesses
                .into_iter()
                .map(|b| json!({ "id": b.id, "businessName": b.business_name }))
                .collect();
            Json(listing).into_response()
        }
        Err(e) => app_error_response(&AppError::Database(e.to_string())),
    }
}
