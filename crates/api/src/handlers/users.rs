//! Handlers for user profiles, user-scoped listings and the saved set.
//!
//! The `{external_id}` path segment is the identity-provider id; each handler
//! resolves it to the internal user once.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use devflow_core::filters::{SavedQuestionFilter, UserFilter};
use devflow_core::types::{ExternalId, QuestionId};
use devflow_db::repositories::{AnswerRepo, QuestionRepo, TagRepo, UserRepo};
use devflow_events::{event_types, ForumEvent};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::AppResult;
use crate::handlers::announce;
use crate::query::{LimitParams, ListParams, PageParams};
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ToggleSavedRequest {
    pub question_id: QuestionId,
    pub path: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SavedState {
    pub question_id: QuestionId,
    /// Whether the question is in the saved set after the toggle.
    pub saved: bool,
}

/// GET /api/v1/users
pub async fn list_users(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> AppResult<impl IntoResponse> {
    let filter: UserFilter = params.filter()?;
    let page = params.page_request()?;

    let users = UserRepo::list(&state.pool, filter, params.search(), &page).await?;
    Ok(Json(users))
}

/// GET /api/v1/users/{external_id}
///
/// The profile with totals of authored questions and answers.
pub async fn get_user(
    State(state): State<AppState>,
    Path(external_id): Path<ExternalId>,
) -> AppResult<impl IntoResponse> {
    let info = UserRepo::info(&state.pool, &external_id).await?;
    Ok(Json(DataResponse { data: info }))
}

/// GET /api/v1/users/{external_id}/saved
pub async fn saved_questions(
    State(state): State<AppState>,
    Path(external_id): Path<ExternalId>,
    Query(params): Query<ListParams>,
) -> AppResult<impl IntoResponse> {
    let filter: SavedQuestionFilter = params.filter()?;
    let page = params.page_request()?;

    let questions =
        UserRepo::saved_questions(&state.pool, &external_id, filter, params.search(), &page)
            .await?;
    Ok(Json(questions))
}

/// POST /api/v1/users/{external_id}/saved
///
/// Adds the question to the saved set, or removes it if already there.
pub async fn toggle_saved(
    State(state): State<AppState>,
    Path(external_id): Path<ExternalId>,
    Json(input): Json<ToggleSavedRequest>,
) -> AppResult<impl IntoResponse> {
    let user = UserRepo::require_by_external_id(&state.pool, &external_id).await?;
    let saved = UserRepo::toggle_saved(&state.pool, user.id, input.question_id).await?;

    announce(
        &state,
        ForumEvent::new(event_types::QUESTION_SAVED_TOGGLED)
            .with_source("question", input.question_id)
            .with_actor(user.id)
            .with_revalidate_path(input.path)
            .with_payload(json!({ "saved": saved })),
    );

    Ok(Json(DataResponse {
        data: SavedState {
            question_id: input.question_id,
            saved,
        },
    }))
}

/// GET /api/v1/users/{external_id}/top-tags
pub async fn top_tags(
    State(state): State<AppState>,
    Path(external_id): Path<ExternalId>,
    Query(params): Query<LimitParams>,
) -> AppResult<impl IntoResponse> {
    let user = UserRepo::require_by_external_id(&state.pool, &external_id).await?;
    let tags = TagRepo::top_interacted_for_user(&state.pool, user.id, params.limit).await?;
    Ok(Json(DataResponse { data: tags }))
}

/// GET /api/v1/users/{external_id}/questions
pub async fn user_questions(
    State(state): State<AppState>,
    Path(external_id): Path<ExternalId>,
    Query(params): Query<PageParams>,
) -> AppResult<impl IntoResponse> {
    let page = params.page_request()?;
    let user = UserRepo::require_by_external_id(&state.pool, &external_id).await?;

    let questions = QuestionRepo::for_user(&state.pool, user.id, &page).await?;
    Ok(Json(questions))
}

/// GET /api/v1/users/{external_id}/answers
pub async fn user_answers(
    State(state): State<AppState>,
    Path(external_id): Path<ExternalId>,
    Query(params): Query<PageParams>,
) -> AppResult<impl IntoResponse> {
    let page = params.page_request()?;
    let user = UserRepo::require_by_external_id(&state.pool, &external_id).await?;

    let answers = AnswerRepo::for_user(&state.pool, user.id, &page).await?;
    Ok(Json(answers))
}
