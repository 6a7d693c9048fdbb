use axum::extract::State;
use axum::Json;
use chrono::Utc;

use crate::error::ApiError;
use crate::services::status_service::{self, StatusReport};
use crate::AppState;

/// GET /campaigns/status — global queue utilization for operator dashboards.
pub async fn global_status(
    State(state): State<AppState>,
) -> Result<Json<StatusReport>, ApiError> {
    let report = status_service::global_status(&state.pool, &state.config, Utc::now()).await?;
    Ok(Json(report))
}
