use std::sync::Arc;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use clearhaven_campaigns::config::SchedulingConfig;
use clearhaven_campaigns::{db, routes, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,clearhaven_campaigns=debug")),
        )
        .init();

    let config = Arc::new(SchedulingConfig::from_env()?);

    let raw_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://campaigns.db".into());
    let db_url = normalize_sqlite_url(&raw_url);
    // Ensure the file exists for file-based sqlite (avoids open errors on some setups)
    if let Some(path) = db_file_path(&db_url) {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).ok();
        }
        if !path.exists() {
            std::fs::File::create(&path).ok();
        }
    }
    let pool = sqlx::SqlitePool::connect(&db_url).await?;
    db::run_migrations(&pool).await?;

    let state = AppState {
        pool,
        config,
        operator_token: std::env::var("ADMIN_TOKEN").ok().filter(|t| !t.is_empty()),
    };
    let app = routes::router(state);

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3050);
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    use tokio::signal;
    let ctrl_c = async {
        signal::ctrl_c().await.ok();
    };
    #[cfg(unix)]
    let term = async {
        if let Ok(mut s) = signal::unix::signal(signal::unix::SignalKind::terminate()) {
            s.recv().await;
        }
    };
    #[cfg(not(unix))]
    let term = std::future::pending::<()>();
    tokio::select! { _ = ctrl_c => {}, _ = term => {} }
}

fn normalize_sqlite_url(input: &str) -> String {
    // Accept forms: sqlite:foo.db (fix), sqlite://foo.db (ok), file:foo.db (convert), bare path (prepend)
    if input.starts_with("sqlite://") || input.starts_with("sqlite::memory:") {
        return input.to_string();
    }
    if input.starts_with("sqlite:") {
        let rest = input.trim_start_matches("sqlite:");
        return format!("sqlite://{}", rest.trim_start_matches('/'));
    }
    if input.starts_with("file:") {
        return format!("sqlite://{}", input.trim_start_matches("file:"));
    }
    format!("sqlite://{}", input)
}

fn db_file_path(url: &str) -> Option<std::path::PathBuf> {
    if let Some(rest) = url.strip_prefix("sqlite://") {
        if rest == ":memory:" {
            return None;
        }
        return Some(std::path::PathBuf::from(rest));
    }
    None
}
