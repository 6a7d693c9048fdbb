pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod rbac;
pub mod routes;
pub mod services;

use std::sync::Arc;

use axum::extract::FromRef;
use sqlx::SqlitePool;

use crate::config::SchedulingConfig;

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub config: Arc<SchedulingConfig>,
    /// Shared operator token; `None` leaves the instance open (local dev).
    pub operator_token: Option<String>,
}

impl FromRef<AppState> for SqlitePool {
    fn from_ref(state: &AppState) -> Self {
        state.pool.clone()
    }
}

impl FromRef<AppState> for Arc<SchedulingConfig> {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}
