use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::rbac;
use crate::AppState;

pub mod campaigns;
pub mod status;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/campaigns/status", get(status::global_status))
        .route("/campaigns/:id/launch", post(campaigns::launch_campaign))
        .route("/campaigns/:id/retry-failed", post(campaigns::retry_failed))
        .layer(middleware::from_fn_with_state(state.clone(), rbac::require_operator))
        .route("/healthz", get(|| async { "ok" }))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
