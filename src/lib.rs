// Core modules
pub mod api;
pub mod db;
mod health;
mod metrics;
mod model;

// Re-export key types and functions
pub use api::{AppState, create_router};
pub use db::{
    DatabaseConfig, Db, ScheduleCreate, ScheduleDao, ScheduleRecord, create_connection,
    ensure_schema,
};
pub use health::HealthState;
pub use metrics::{MetricsSnapshot, Operation, RequestMetrics};
pub use model::Schedule;

use anyhow::Result;
use std::time::Duration;

/// Convenience function to create a fully wired schedule router.
///
/// This connects to the database, ensures the schema exists, and builds
/// the REST router with fresh health and metrics state.
pub async fn create_app(config: DatabaseConfig, all_delay: Duration) -> Result<axum::Router> {
    let db = create_connection(config).await?;
    ensure_schema(&db).await?;

    let state = AppState {
        db,
        health: HealthState::new(),
        metrics: RequestMetrics::new(),
        all_delay,
    };

    Ok(create_router(state))
}
