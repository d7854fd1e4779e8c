use std::sync::Arc;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheap to clone: the pool is reference-counted and the rest sits behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool, created once at startup.
    pub pool: devflow_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// Bus carrying change events to the revalidation relay.
    pub event_bus: Arc<devflow_events::EventBus>,
}
