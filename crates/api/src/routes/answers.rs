use axum::routing::post;
use axum::Router;

use crate::handlers::answers;
use crate::state::AppState;

/// Answer routes mounted at `/answers`.
///
/// ```text
/// POST   /{id}/votes       -> vote_answer
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/{id}/votes", post(answers::vote_answer))
}
