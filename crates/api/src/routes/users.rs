//! Route definitions for user profiles and user-scoped listings.
//!
//! Users are addressed by their identity-provider id.

use axum::routing::get;
use axum::Router;

use crate::handlers::users;
use crate::state::AppState;

/// User routes mounted at `/users`.
///
/// ```text
/// GET    /                              -> list_users
/// GET    /{external_id}                 -> get_user
/// GET    /{external_id}/saved           -> saved_questions
/// POST   /{external_id}/saved           -> toggle_saved
/// GET    /{external_id}/top-tags        -> top_tags
/// GET    /{external_id}/questions       -> user_questions
/// GET    /{external_id}/answers         -> user_answers
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(users::list_users))
        .route("/{external_id}", get(users::get_user))
        .route(
            "/{external_id}/saved",
            get(users::saved_questions).post(users::toggle_saved),
        )
        .route("/{external_id}/top-tags", get(users::top_tags))
        .route("/{external_id}/questions", get(users::user_questions))
        .route("/{external_id}/answers", get(users::user_answers))
}
