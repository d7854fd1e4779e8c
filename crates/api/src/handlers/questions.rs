//! Handlers for questions: listings, detail, create/edit/delete, views and votes.
//!
//! Every mutation accepts an optional `path` revalidation hint, which is
//! published with the resulting event and never interpreted here.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use devflow_core::error::CoreError;
use devflow_core::filters::QuestionFilter;
use devflow_core::types::{QuestionId, UserId};
use devflow_core::validation::{check, QuestionDraft, QuestionEdit};
use devflow_core::vote::{PriorVote, VoteDirection};
use devflow_db::models::question::CreateQuestion;
use devflow_db::repositories::{InteractionRepo, QuestionRepo, VoteRepo};
use devflow_events::{event_types, ForumEvent};
use serde::Deserialize;
use serde_json::json;

use crate::error::{AppError, AppResult};
use crate::handlers::announce;
use crate::query::{LimitParams, ListParams, PathParams};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request bodies
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct CreateQuestionRequest {
    #[serde(flatten)]
    pub draft: QuestionDraft,
    pub author_id: UserId,
    pub path: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct EditQuestionRequest {
    #[serde(flatten)]
    pub edit: QuestionEdit,
    pub path: Option<String>,
}

/// A vote on a question or answer.
///
/// `has_up_voted` / `has_down_voted` are the caller's view of the voter's
/// current stance and default to `false`.
#[derive(Debug, Deserialize)]
pub struct VoteRequest {
    pub user_id: UserId,
    pub direction: VoteDirection,
    #[serde(flatten)]
    pub prior: PriorVote,
    pub path: Option<String>,
}

/// The viewer, if signed in. Anonymous viewers send `{}`.
#[derive(Debug, Default, Deserialize)]
pub struct ViewRequest {
    #[serde(default)]
    pub user_id: Option<UserId>,
}

// ---------------------------------------------------------------------------
// Listings and reads
// ---------------------------------------------------------------------------

/// GET /api/v1/questions
pub async fn list_questions(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> AppResult<impl IntoResponse> {
    let filter: QuestionFilter = params.filter()?;
    let page = params.page_request()?;

    let questions = QuestionRepo::list(&state.pool, filter, params.search(), &page).await?;
    Ok(Json(questions))
}

/// GET /api/v1/questions/hot
pub async fn hot_questions(
    State(state): State<AppState>,
    Query(params): Query<LimitParams>,
) -> AppResult<impl IntoResponse> {
    let questions = QuestionRepo::hot(&state.pool, params.limit).await?;
    Ok(Json(DataResponse { data: questions }))
}

/// GET /api/v1/questions/{id}
pub async fn get_question(
    State(state): State<AppState>,
    Path(id): Path<QuestionId>,
) -> AppResult<impl IntoResponse> {
    let question = QuestionRepo::detail(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found(QuestionId::ENTITY, id)))?;

    Ok(Json(DataResponse { data: question }))
}

// ---------------------------------------------------------------------------
// Mutations
// ---------------------------------------------------------------------------

/// POST /api/v1/questions
///
/// Validates the draft, creates the question and resolves its tags.
pub async fn create_question(
    State(state): State<AppState>,
    Json(input): Json<CreateQuestionRequest>,
) -> AppResult<impl IntoResponse> {
    let tags = input.draft.validated_tags()?;
    let create = CreateQuestion {
        title: input.draft.title,
        content: input.draft.content,
        author_id: input.author_id,
        tags,
    };

    let question = QuestionRepo::create_with_tags(&state.pool, &create).await?;

    announce(
        &state,
        ForumEvent::new(event_types::QUESTION_CREATED)
            .with_source("question", question.id)
            .with_actor(question.author_id)
            .with_revalidate_path(input.path)
            .with_payload(json!({ "title": question.title, "tags": question.tags })),
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: question })))
}

/// PUT /api/v1/questions/{id}
///
/// Replaces title and content only.
pub async fn edit_question(
    State(state): State<AppState>,
    Path(id): Path<QuestionId>,
    Json(input): Json<EditQuestionRequest>,
) -> AppResult<impl IntoResponse> {
    check(&input.edit)?;

    let question = QuestionRepo::edit(&state.pool, id, &input.edit).await?;

    announce(
        &state,
        ForumEvent::new(event_types::QUESTION_UPDATED)
            .with_source("question", question.id)
            .with_actor(question.author_id)
            .with_revalidate_path(input.path),
    );

    Ok(Json(DataResponse { data: question }))
}

/// DELETE /api/v1/questions/{id}
///
/// Removes the question with its answers, interactions and every
/// reference to it.
pub async fn delete_question(
    State(state): State<AppState>,
    Path(id): Path<QuestionId>,
    Query(params): Query<PathParams>,
) -> AppResult<impl IntoResponse> {
    QuestionRepo::delete_cascade(&state.pool, id).await?;

    announce(
        &state,
        ForumEvent::new(event_types::QUESTION_DELETED)
            .with_source("question", id)
            .with_revalidate_path(params.path),
    );

    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/questions/{id}/views
pub async fn record_view(
    State(state): State<AppState>,
    Path(id): Path<QuestionId>,
    Json(input): Json<ViewRequest>,
) -> AppResult<impl IntoResponse> {
    let outcome = InteractionRepo::record_view(&state.pool, id, input.user_id).await?;

    if outcome.counted {
        let mut event = ForumEvent::new(event_types::QUESTION_VIEWED).with_source("question", id);
        if let Some(viewer) = input.user_id {
            event = event.with_actor(viewer);
        }
        announce(&state, event);
    }

    Ok(Json(DataResponse { data: outcome }))
}

/// POST /api/v1/questions/{id}/votes
pub async fn vote_question(
    State(state): State<AppState>,
    Path(id): Path<QuestionId>,
    Json(input): Json<VoteRequest>,
) -> AppResult<impl IntoResponse> {
    let tally =
        VoteRepo::vote_question(&state.pool, id, input.user_id, input.direction, input.prior)
            .await?;

    announce(
        &state,
        ForumEvent::new(event_types::VOTE_APPLIED)
            .with_source("question", id)
            .with_actor(input.user_id)
            .with_revalidate_path(input.path)
            .with_payload(json!({
                "direction": input.direction,
                "upvote_count": tally.upvote_count,
                "downvote_count": tally.downvote_count,
            })),
    );

    Ok(Json(DataResponse { data: tally }))
}
