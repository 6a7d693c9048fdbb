//! Read-only capacity and utilization reporting over the queue table.

use anyhow::Result;
use chrono::{DateTime, Datelike, Days, NaiveDate, Timelike, Utc};
use serde::Serialize;
use sqlx::SqlitePool;

use crate::config::SchedulingConfig;
use crate::db::queries;
use crate::models::email::QueueEmail;
use crate::models::identity::{pool_size, ROTATION_DOMAINS};
use crate::services::work_clock::WorkClock;

const SAMPLE_LIMIT: i64 = 10;

#[derive(Debug, Serialize)]
pub struct StatusCounts {
    pub queued: i64,
    pub sent: i64,
    pub failed: i64,
    pub processing: i64,
    pub total: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayCapacity {
    pub date: String,
    pub day_label: String,
    pub day_of_week: u32,
    pub queued: i64,
    pub sent: i64,
    pub capacity: i64,
    pub remaining: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining_hours: Option<i64>,
    pub is_today: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainLoad {
    pub domain: String,
    pub queued: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageSample {
    pub id: String,
    pub to_address: String,
    pub subject: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sent_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<QueueEmail> for MessageSample {
    fn from(email: QueueEmail) -> Self {
        let sent_at = email.sent_at_utc();
        Self {
            id: email.id,
            to_address: email.to_address,
            subject: email.subject,
            sent_at,
            error: email.error,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusReport {
    pub counts: StatusCounts,
    pub week_schedule: Vec<DayCapacity>,
    pub domains: Vec<DomainLoad>,
    pub recent_sent: Vec<MessageSample>,
    pub recent_failures: Vec<MessageSample>,
}

pub async fn global_status(
    pool: &SqlitePool,
    cfg: &SchedulingConfig,
    now: DateTime<Utc>,
) -> Result<StatusReport> {
    let clock = WorkClock::new(cfg);
    let by_status = queries::counts_by_status(pool).await?;
    let count = |status: &str| by_status.get(status).copied().unwrap_or(0);
    let counts = StatusCounts {
        queued: count("queued"),
        sent: count("sent"),
        failed: count("failed"),
        processing: count("processing"),
        total: by_status.values().sum(),
    };

    let now_local = now.with_timezone(&cfg.timezone);
    let today = now_local.date_naive();
    let mut week_schedule = Vec::with_capacity(7);
    for offset in 0..7u64 {
        let date = today.checked_add_days(Days::new(offset)).unwrap_or(today);
        let is_today = offset == 0;
        let (day_start, day_end) = clock.local_day_bounds(date);
        let queued = queries::queued_count_between(
            pool,
            day_start.timestamp_millis(),
            day_end.timestamp_millis(),
        )
        .await?;
        let sent = if is_today {
            queries::sent_count_between(
                pool,
                day_start.timestamp_millis(),
                day_end.timestamp_millis(),
            )
            .await?
        } else {
            0
        };

        let hours = window_hours(cfg, &clock, date, is_today, now_local.hour());
        let capacity = daily_capacity(cfg, hours);
        week_schedule.push(DayCapacity {
            date: date.format("%Y-%m-%d").to_string(),
            day_label: date.format("%a").to_string(),
            day_of_week: date.weekday().num_days_from_sunday(),
            queued,
            sent,
            capacity,
            remaining: (capacity - queued - sent).max(0),
            remaining_hours: is_today.then_some(hours as i64),
            is_today,
        });
    }

    let domains = queries::queued_by_identity(pool)
        .await?
        .into_iter()
        .map(|(idx, queued)| DomainLoad {
            domain: ROTATION_DOMAINS[(idx as usize) % pool_size()].to_string(),
            queued,
        })
        .collect();

    let recent_sent = queries::recent_sent(pool, SAMPLE_LIMIT)
        .await?
        .into_iter()
        .map(MessageSample::from)
        .collect();
    let recent_failures = queries::recent_failed(pool, SAMPLE_LIMIT)
        .await?
        .into_iter()
        .map(MessageSample::from)
        .collect();

    Ok(StatusReport { counts, week_schedule, domains, recent_sent, recent_failures })
}

/// Usable window hours for a day: full window on future working days, the
/// remainder of the window today, zero on skipped weekend days.
fn window_hours(
    cfg: &SchedulingConfig,
    clock: &WorkClock,
    date: NaiveDate,
    is_today: bool,
    current_hour: u32,
) -> u32 {
    if clock.is_skipped(date) {
        return 0;
    }
    if !is_today {
        return cfg.window_hours();
    }
    if current_hour >= cfg.working_hour_end {
        0
    } else if current_hour < cfg.working_hour_start {
        cfg.window_hours()
    } else {
        cfg.working_hour_end - current_hour
    }
}

// division last so exact cases (420 min / 3.5) stay exact
fn daily_capacity(cfg: &SchedulingConfig, hours: u32) -> i64 {
    ((hours as f64 * 60.0 * pool_size() as f64) / cfg.interval_minutes).floor() as i64
}
