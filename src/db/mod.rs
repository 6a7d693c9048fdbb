use std::fs;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Result;
use sqlx::SqlitePool;

pub mod queries;

/// Apply every `migrations/*.sql` file in lexical order. Files may contain
/// multiple statements; everything is idempotent (`IF NOT EXISTS`).
pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    let mut entries: Vec<_> = fs::read_dir("migrations")?.filter_map(|e| e.ok()).collect();
    entries.sort_by_key(|e| e.path());
    for entry in entries {
        let path = entry.path();
        if path.extension().and_then(|s| s.to_str()) == Some("sql") {
            let sql = fs::read_to_string(&path)?;
            sqlx::raw_sql(&sql).execute(pool).await?;
        }
    }
    Ok(())
}

pub fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}
