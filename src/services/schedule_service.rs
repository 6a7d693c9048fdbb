//! The schedule allocator: assigns each schedulable email a sending identity
//! (round-robin with sticky reuse) and a send instant respecting per-identity
//! spacing, jitter, and the working-hours window.
//!
//! Coordination with concurrently running campaigns happens only through the
//! persisted queue snapshot read at batch start. Two launches racing each
//! other can land closer together than the interval on a shared domain; that
//! is an accepted weak-consistency tradeoff of the read-then-write snapshot,
//! not a bug to lock away.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::SchedulingConfig;
use crate::db::queries;
use crate::models::email::EmailStatus;
use crate::models::identity::{identities, SenderProfile};
use crate::services::work_clock::WorkClock;

const PAGE_SIZE: i64 = 200;

#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("no {source_status} emails to schedule")]
    EmptyBatch { source_status: &'static str },
    /// Remaining pages are abandoned; the `scheduled` rows already written
    /// stay valid and are skipped on a re-run.
    #[error("failed to persist schedule for email {email_id} after {scheduled} scheduled")]
    Persist {
        email_id: String,
        scheduled: u64,
        #[source]
        source: sqlx::Error,
    },
    #[error(transparent)]
    Db(#[from] sqlx::Error),
}

/// Which staged rows a launch covers.
#[derive(Debug, Clone)]
pub enum Selection {
    All,
    Ids(Vec<String>),
}

#[derive(Debug)]
pub struct BatchOutcome {
    pub scheduled: u64,
    pub start_time: DateTime<Utc>,
    pub estimated_end: Option<DateTime<Utc>>,
    /// Local calendar day ("YYYY-MM-DD") -> scheduled count.
    pub emails_by_day: BTreeMap<String, u64>,
}

/// Schedule every `source_status` email of the campaign (optionally narrowed
/// to explicit ids), moving them to `queued`. Pages of `PAGE_SIZE` bound
/// memory; the rotation counter and per-domain times carry across pages.
pub async fn schedule_batch(
    pool: &SqlitePool,
    cfg: &SchedulingConfig,
    campaign_id: &str,
    sender: SenderProfile,
    source_status: EmailStatus,
    selection: &Selection,
    now: DateTime<Utc>,
) -> Result<BatchOutcome, ScheduleError> {
    let clock = WorkClock::new(cfg);
    let pool_identities = identities(sender);
    let interval = cfg.interval();
    let start_time = clock.start_of_next_window(now);

    // Latest commitment per domain across all campaigns, then overlaid by the
    // times assigned within this batch as domains get touched.
    let mut domain_last = queries::latest_scheduled_per_identity(pool).await?;
    let mut domain_current: HashMap<i64, DateTime<Utc>> = HashMap::new();

    let mut round_robin: i64 = 0;
    let mut seen: u64 = 0;
    let mut scheduled: u64 = 0;
    let mut estimated_end: Option<DateTime<Utc>> = None;
    let mut emails_by_day: BTreeMap<String, u64> = BTreeMap::new();

    let ids = match selection {
        Selection::All => None,
        Selection::Ids(ids) => Some(ids.as_slice()),
    };

    loop {
        let page = queries::batch_page(pool, campaign_id, source_status, ids, PAGE_SIZE).await?;
        if page.is_empty() {
            break;
        }
        seen += page.len() as u64;

        for email in page {
            // Sticky identity: never reassign once set.
            let idx = match email.identity_index {
                Some(idx) => idx,
                None => {
                    let idx = round_robin % pool_identities.len() as i64;
                    round_robin += 1;
                    idx
                }
            };
            let identity = &pool_identities[(idx as usize) % pool_identities.len()];

            let jitter = jitter_duration(cfg.jitter_seconds_max);
            let base = domain_current.get(&idx).or_else(|| domain_last.get(&idx)).copied();
            let scheduled_for = match base {
                Some(prev) => clock.clamp_to_window(prev + interval + jitter),
                None => clock.clamp_to_window(start_time + jitter),
            };
            domain_current.insert(idx, scheduled_for);
            domain_last.insert(idx, scheduled_for);

            match queries::mark_queued(
                pool,
                &email.id,
                source_status,
                idx,
                &identity.from_address(),
                scheduled_for.timestamp_millis(),
            )
            .await
            {
                Ok(true) => {
                    scheduled += 1;
                    if estimated_end.map_or(true, |end| scheduled_for > end) {
                        estimated_end = Some(scheduled_for);
                    }
                    let day = scheduled_for
                        .with_timezone(&cfg.timezone)
                        .format("%Y-%m-%d")
                        .to_string();
                    *emails_by_day.entry(day).or_insert(0) += 1;
                }
                Ok(false) => {
                    // The worker (or another operator) moved the row out of
                    // the selected status between the page read and this write.
                    warn!(campaign_id, email_id = %email.id, "email changed status mid-batch, skipping");
                }
                Err(source) => {
                    tracing::error!(
                        campaign_id,
                        email_id = %email.id,
                        error = %source,
                        scheduled,
                        "failed to persist schedule, aborting remaining pages"
                    );
                    return Err(ScheduleError::Persist { email_id: email.id, scheduled, source });
                }
            }
        }
    }

    if seen == 0 {
        return Err(ScheduleError::EmptyBatch { source_status: source_status.as_str() });
    }

    info!(
        campaign_id,
        scheduled,
        start = %start_time,
        end = ?estimated_end,
        "batch scheduled"
    );

    Ok(BatchOutcome { scheduled, start_time, estimated_end, emails_by_day })
}

fn jitter_duration(jitter_seconds_max: f64) -> Duration {
    if jitter_seconds_max <= 0.0 {
        return Duration::zero();
    }
    let secs: f64 = rand::thread_rng().gen_range(0.0..=jitter_seconds_max);
    Duration::milliseconds((secs * 1000.0) as i64)
}
