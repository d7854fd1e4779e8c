pub mod answers;
pub mod health;
pub mod identity;
pub mod questions;
pub mod tags;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /questions                                  list, create
/// /questions/hot                              most viewed
/// /questions/{id}                             detail, edit, delete
/// /questions/{id}/views                       record a view (POST)
/// /questions/{id}/votes                       vote (POST)
/// /questions/{id}/answers                     list, create
///
/// /answers/{id}/votes                         vote (POST)
///
/// /tags                                       list
/// /tags/popular                               most used
/// /tags/{id}/questions                        questions carrying the tag
///
/// /users                                      list
/// /users/{external_id}                        profile with totals
/// /users/{external_id}/saved                  saved questions, toggle (POST)
/// /users/{external_id}/top-tags               most used tags
/// /users/{external_id}/questions              authored questions
/// /users/{external_id}/answers                authored answers
///
/// /identity/events                            identity provider events (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/questions", questions::router())
        .nest("/answers", answers::router())
        .nest("/tags", tags::router())
        .nest("/users", users::router())
        .nest("/identity", identity::router())
}
