use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    /// `"ok"`, or `"degraded"` when the store is unreachable.
    pub status: &'static str,
    pub version: &'static str,
    pub store: StoreHealth,
    /// Listeners currently attached to the revalidation event bus.
    pub event_subscribers: usize,
}

#[derive(Serialize)]
pub struct StoreHealth {
    pub reachable: bool,
    /// Open connections, idle or in use.
    pub pool_size: u32,
    pub idle_connections: usize,
}

/// GET /health
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let reachable = match devflow_db::health_check(&state.pool).await {
        Ok(()) => true,
        Err(err) => {
            tracing::warn!(error = %err, "Store health check failed");
            false
        }
    };

    Json(HealthResponse {
        status: if reachable { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        store: StoreHealth {
            reachable,
            pool_size: state.pool.size(),
            idle_connections: state.pool.num_idle(),
        },
        event_subscribers: state.event_bus.subscriber_count(),
    })
}

/// Mounted at the root, outside `/api/v1`.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
