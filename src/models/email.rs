use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle of a queued email. The allocator only ever performs
/// `staged -> queued` and `failed -> queued`; the send worker owns the rest.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EmailStatus {
    Staged,
    Queued,
    Processing,
    Sent,
    Failed,
}

impl EmailStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Staged => "staged",
            Self::Queued => "queued",
            Self::Processing => "processing",
            Self::Sent => "sent",
            Self::Failed => "failed",
        }
    }
}

/// Row in `queue_emails`. Instants are epoch milliseconds UTC.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct QueueEmail {
    pub id: String,
    pub campaign_id: String,
    pub to_address: String,
    pub subject: String,
    pub body: String,
    pub status: String,
    /// Index into the rotation pool; sticky once assigned.
    pub identity_index: Option<i64>,
    pub from_address: Option<String>,
    pub scheduled_for: Option<i64>,
    pub created_at: i64,
    pub sent_at: Option<i64>,
    /// Last failure reason recorded by the send worker.
    pub error: Option<String>,
}

impl QueueEmail {
    pub fn scheduled_for_utc(&self) -> Option<DateTime<Utc>> {
        self.scheduled_for.and_then(DateTime::from_timestamp_millis)
    }

    pub fn sent_at_utc(&self) -> Option<DateTime<Utc>> {
        self.sent_at.and_then(DateTime::from_timestamp_millis)
    }
}
