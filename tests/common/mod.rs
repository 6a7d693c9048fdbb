#![allow(dead_code)]

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

use clearhaven_campaigns::config::SchedulingConfig;
use clearhaven_campaigns::db::queries;
use clearhaven_campaigns::models::email::QueueEmail;
use clearhaven_campaigns::AppState;

/// Single-connection pool so `:memory:` state is shared across queries.
pub async fn test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("connect in-memory sqlite");
    sqlx::raw_sql(include_str!("../../migrations/0001_init.sql"))
        .execute(&pool)
        .await
        .expect("apply schema");
    pool
}

pub fn la_config(jitter_seconds_max: f64) -> SchedulingConfig {
    SchedulingConfig {
        timezone: chrono_tz::America::Los_Angeles,
        working_hour_start: 9,
        working_hour_end: 17,
        skip_weekends: true,
        interval_minutes: 3.5,
        jitter_seconds_max,
    }
}

pub fn local(cfg: &SchedulingConfig, y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
    cfg.timezone
        .with_ymd_and_hms(y, mo, d, h, mi, 0)
        .unwrap()
        .with_timezone(&Utc)
}

pub async fn seed_campaign(pool: &SqlitePool, status: &str) -> String {
    queries::create_campaign(pool, "OZ Fund II outreach", "acquisitions", status)
        .await
        .unwrap()
        .id
}

pub async fn stage_emails(pool: &SqlitePool, campaign_id: &str, n: usize) -> Vec<String> {
    let mut ids = Vec::with_capacity(n);
    for i in 0..n {
        let id = queries::stage_email(
            pool,
            campaign_id,
            &format!("prospect{i}@example.com"),
            "Opportunity Zone fund intro",
            "Hello!",
            1_000_000 + i as i64,
        )
        .await
        .unwrap();
        ids.push(id);
    }
    ids
}

pub async fn fetch_all(pool: &SqlitePool) -> Vec<QueueEmail> {
    sqlx::query_as("SELECT * FROM queue_emails ORDER BY created_at ASC, id ASC")
        .fetch_all(pool)
        .await
        .unwrap()
}

pub fn app_state(pool: SqlitePool, cfg: SchedulingConfig, token: Option<&str>) -> AppState {
    AppState {
        pool,
        config: Arc::new(cfg),
        operator_token: token.map(String::from),
    }
}
