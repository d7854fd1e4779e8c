use axum::routing::post;
use axum::Router;

use crate::handlers::identity;
use crate::state::AppState;

/// Identity routes mounted at `/identity`.
///
/// ```text
/// POST   /events           -> receive_event
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/events", post(identity::receive_event))
}
