use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::db::now_epoch_ms;
use crate::models::campaign::Campaign;
use crate::models::email::{EmailStatus, QueueEmail};

pub async fn get_campaign(pool: &SqlitePool, id: &str) -> sqlx::Result<Option<Campaign>> {
    sqlx::query_as::<_, Campaign>("SELECT * FROM campaigns WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn create_campaign(
    pool: &SqlitePool,
    name: &str,
    sender: &str,
    status: &str,
) -> sqlx::Result<Campaign> {
    let id = uuid::Uuid::new_v4().to_string();
    let now = now_epoch_ms();
    sqlx::query(
        "INSERT INTO campaigns (id, name, sender, status, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(&id)
    .bind(name)
    .bind(sender)
    .bind(status)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;
    Ok(Campaign {
        id,
        name: name.to_string(),
        sender: sender.to_string(),
        status: status.to_string(),
        created_at: now,
        updated_at: now,
    })
}

pub async fn set_campaign_status(pool: &SqlitePool, id: &str, status: &str) -> sqlx::Result<()> {
    sqlx::query("UPDATE campaigns SET status = ?, updated_at = ? WHERE id = ?")
        .bind(status)
        .bind(now_epoch_ms())
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Insertion point for the (out-of-scope) content generation step.
pub async fn stage_email(
    pool: &SqlitePool,
    campaign_id: &str,
    to_address: &str,
    subject: &str,
    body: &str,
    created_at_ms: i64,
) -> sqlx::Result<String> {
    let id = uuid::Uuid::new_v4().to_string();
    sqlx::query(
        "INSERT INTO queue_emails (id, campaign_id, to_address, subject, body, status, created_at)
         VALUES (?, ?, ?, ?, ?, 'staged', ?)",
    )
    .bind(&id)
    .bind(campaign_id)
    .bind(to_address)
    .bind(subject)
    .bind(body)
    .bind(created_at_ms)
    .execute(pool)
    .await?;
    Ok(id)
}

/// One page of schedulable rows for a campaign, oldest first. Scheduled rows
/// leave `status`, so repeated calls walk the batch without an offset.
pub async fn batch_page(
    pool: &SqlitePool,
    campaign_id: &str,
    status: EmailStatus,
    ids: Option<&[String]>,
    limit: i64,
) -> sqlx::Result<Vec<QueueEmail>> {
    let mut qb = sqlx::QueryBuilder::new("SELECT * FROM queue_emails WHERE campaign_id = ");
    qb.push_bind(campaign_id);
    qb.push(" AND status = ").push_bind(status.as_str());
    if let Some(ids) = ids {
        qb.push(" AND id IN (");
        let mut sep = qb.separated(", ");
        for id in ids {
            sep.push_bind(id);
        }
        qb.push(")");
    }
    qb.push(" ORDER BY created_at ASC, id ASC LIMIT ").push_bind(limit);
    qb.build_query_as::<QueueEmail>().fetch_all(pool).await
}

/// Latest commitment per identity across every campaign. This is the
/// cross-campaign coordination snapshot: a fresh launch must not schedule a
/// domain sooner than the interval after its last known commitment.
pub async fn latest_scheduled_per_identity(
    pool: &SqlitePool,
) -> sqlx::Result<HashMap<i64, DateTime<Utc>>> {
    let rows: Vec<(i64, i64)> = sqlx::query_as(
        "SELECT identity_index, MAX(scheduled_for) FROM queue_emails
         WHERE status IN ('queued', 'processing')
           AND identity_index IS NOT NULL AND scheduled_for IS NOT NULL
         GROUP BY identity_index",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows
        .into_iter()
        .filter_map(|(idx, ms)| DateTime::from_timestamp_millis(ms).map(|t| (idx, t)))
        .collect())
}

/// Move one row to `queued` with its schedule assignment, dropping any stale
/// failure reason. The status guard keeps us off rows the send worker already
/// picked up; returns false when nothing matched.
pub async fn mark_queued(
    pool: &SqlitePool,
    id: &str,
    from_status: EmailStatus,
    identity_index: i64,
    from_address: &str,
    scheduled_for_ms: i64,
) -> sqlx::Result<bool> {
    let res = sqlx::query(
        "UPDATE queue_emails SET status = 'queued', identity_index = ?, from_address = ?, scheduled_for = ?, error = NULL
         WHERE id = ? AND status = ?",
    )
    .bind(identity_index)
    .bind(from_address)
    .bind(scheduled_for_ms)
    .bind(id)
    .bind(from_status.as_str())
    .execute(pool)
    .await?;
    Ok(res.rows_affected() > 0)
}

pub async fn counts_by_status(pool: &SqlitePool) -> sqlx::Result<HashMap<String, i64>> {
    let rows: Vec<(String, i64)> =
        sqlx::query_as("SELECT status, COUNT(*) FROM queue_emails GROUP BY status")
            .fetch_all(pool)
            .await?;
    Ok(rows.into_iter().collect())
}

pub async fn queued_count_between(
    pool: &SqlitePool,
    start_ms: i64,
    end_ms: i64,
) -> sqlx::Result<i64> {
    sqlx::query_scalar(
        "SELECT COUNT(*) FROM queue_emails
         WHERE status = 'queued' AND scheduled_for >= ? AND scheduled_for < ?",
    )
    .bind(start_ms)
    .bind(end_ms)
    .fetch_one(pool)
    .await
}

pub async fn sent_count_between(pool: &SqlitePool, start_ms: i64, end_ms: i64) -> sqlx::Result<i64> {
    sqlx::query_scalar(
        "SELECT COUNT(*) FROM queue_emails
         WHERE status = 'sent' AND sent_at >= ? AND sent_at < ?",
    )
    .bind(start_ms)
    .bind(end_ms)
    .fetch_one(pool)
    .await
}

pub async fn queued_by_identity(pool: &SqlitePool) -> sqlx::Result<Vec<(i64, i64)>> {
    sqlx::query_as(
        "SELECT identity_index, COUNT(*) FROM queue_emails
         WHERE status = 'queued' AND identity_index IS NOT NULL
         GROUP BY identity_index ORDER BY identity_index",
    )
    .fetch_all(pool)
    .await
}

pub async fn recent_sent(pool: &SqlitePool, limit: i64) -> sqlx::Result<Vec<QueueEmail>> {
    sqlx::query_as::<_, QueueEmail>(
        "SELECT * FROM queue_emails WHERE status = 'sent' ORDER BY sent_at DESC LIMIT ?",
    )
    .bind(limit)
    .fetch_all(pool)
    .await
}

pub async fn recent_failed(pool: &SqlitePool, limit: i64) -> sqlx::Result<Vec<QueueEmail>> {
    sqlx::query_as::<_, QueueEmail>(
        "SELECT * FROM queue_emails WHERE status = 'failed' ORDER BY created_at DESC LIMIT ?",
    )
    .bind(limit)
    .fetch_all(pool)
    .await
}
