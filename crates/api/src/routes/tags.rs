use axum::routing::get;
use axum::Router;

use crate::handlers::tags;
use crate::state::AppState;

/// Tag routes mounted at `/tags`.
///
/// ```text
/// GET    /                 -> list_tags
/// GET    /popular          -> popular_tags
/// GET    /{id}/questions   -> tag_questions
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(tags::list_tags))
        .route("/popular", get(tags::popular_tags))
        .route("/{id}/questions", get(tags::tag_questions))
}
