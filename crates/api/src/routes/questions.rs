//! Route definitions for questions and the answers nested under them.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{answers, questions};
use crate::state::AppState;

/// Question routes mounted at `/questions`.
///
/// ```text
/// GET    /                 -> list_questions
/// POST   /                 -> create_question
/// GET    /hot              -> hot_questions
/// GET    /{id}             -> get_question
/// PUT    /{id}             -> edit_question
/// DELETE /{id}             -> delete_question
/// POST   /{id}/views       -> record_view
/// POST   /{id}/votes       -> vote_question
/// GET    /{id}/answers     -> list_answers
/// POST   /{id}/answers     -> create_answer
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(questions::list_questions).post(questions::create_question),
        )
        .route("/hot", get(questions::hot_questions))
        .route(
            "/{id}",
            get(questions::get_question)
                .put(questions::edit_question)
                .delete(questions::delete_question),
        )
        .route("/{id}/views", post(questions::record_view))
        .route("/{id}/votes", post(questions::vote_question))
        .route(
            "/{id}/answers",
            get(answers::list_answers).post(answers::create_answer),
        )
}
