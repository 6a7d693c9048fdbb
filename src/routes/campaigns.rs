use std::collections::BTreeMap;

use axum::extract::{Path, State};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::db::queries;
use crate::error::ApiError;
use crate::models::campaign::CampaignStatus;
use crate::models::email::EmailStatus;
use crate::services::schedule_service::{self, Selection};
use crate::AppState;

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct LaunchRequest {
    /// Restrict the launch to these staged emails; omitted means everything.
    #[serde(default)]
    pub email_ids: Option<Vec<String>>,
    #[serde(default)]
    pub all: Option<bool>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LaunchScheduling {
    pub timezone: String,
    pub interval_minutes: f64,
    #[serde(rename = "startTimeUTC")]
    pub start_time_utc: DateTime<Utc>,
    #[serde(rename = "estimatedEndTimeUTC")]
    pub estimated_end_time_utc: Option<DateTime<Utc>>,
    pub emails_by_day: BTreeMap<String, u64>,
    pub total_days: usize,
}

#[derive(Debug, Serialize)]
pub struct LaunchResponse {
    pub success: bool,
    pub queued: u64,
    pub scheduling: LaunchScheduling,
}

/// POST /campaigns/:id/launch
pub async fn launch_campaign(
    State(state): State<AppState>,
    Path(campaign_id): Path<String>,
    body: Option<Json<LaunchRequest>>,
) -> Result<Json<LaunchResponse>, ApiError> {
    let campaign = queries::get_campaign(&state.pool, &campaign_id)
        .await?
        .ok_or(ApiError::CampaignNotFound)?;
    if !campaign.status().is_launchable() {
        return Err(ApiError::BadRequest(format!(
            "campaign cannot be launched from status '{}'",
            campaign.status
        )));
    }

    let req = body.map(|Json(b)| b).unwrap_or_default();
    let selection = match req.email_ids {
        Some(ids) if !ids.is_empty() => Selection::Ids(ids),
        _ => Selection::All,
    };

    let outcome = schedule_service::schedule_batch(
        &state.pool,
        &state.config,
        &campaign_id,
        campaign.sender_profile(),
        EmailStatus::Staged,
        &selection,
        Utc::now(),
    )
    .await?;
    queries::set_campaign_status(&state.pool, &campaign_id, CampaignStatus::Active.as_str())
        .await?;
    tracing::info!(campaign_id, queued = outcome.scheduled, "campaign launched");

    let total_days = outcome.emails_by_day.len();
    Ok(Json(LaunchResponse {
        success: true,
        queued: outcome.scheduled,
        scheduling: LaunchScheduling {
            timezone: state.config.timezone.name().to_string(),
            interval_minutes: state.config.interval_minutes,
            start_time_utc: outcome.start_time,
            estimated_end_time_utc: outcome.estimated_end,
            emails_by_day: outcome.emails_by_day,
            total_days,
        },
    }))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RetryScheduling {
    pub timezone: String,
    pub interval_minutes: f64,
    #[serde(rename = "estimatedEndTimeUTC")]
    pub estimated_end_time_utc: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
pub struct RetryResponse {
    pub success: bool,
    pub retried: u64,
    pub scheduling: RetryScheduling,
}

/// POST /campaigns/:id/retry-failed — same allocator, restricted to failed
/// rows. These usually already carry a sticky identity from the original pass.
pub async fn retry_failed(
    State(state): State<AppState>,
    Path(campaign_id): Path<String>,
) -> Result<Json<RetryResponse>, ApiError> {
    let campaign = queries::get_campaign(&state.pool, &campaign_id)
        .await?
        .ok_or(ApiError::CampaignNotFound)?;

    let outcome = schedule_service::schedule_batch(
        &state.pool,
        &state.config,
        &campaign.id,
        campaign.sender_profile(),
        EmailStatus::Failed,
        &Selection::All,
        Utc::now(),
    )
    .await?;
    tracing::info!(campaign_id, retried = outcome.scheduled, "failed emails requeued");

    Ok(Json(RetryResponse {
        success: true,
        retried: outcome.scheduled,
        scheduling: RetryScheduling {
            timezone: state.config.timezone.name().to_string(),
            interval_minutes: state.config.interval_minutes,
            estimated_end_time_utc: outcome.estimated_end,
        },
    }))
}
