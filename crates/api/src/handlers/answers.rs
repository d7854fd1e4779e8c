//! Handlers for answers.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use devflow_core::filters::AnswerFilter;
use devflow_core::types::{AnswerId, QuestionId, UserId};
use devflow_core::validation::{check, AnswerDraft};
use devflow_db::models::answer::CreateAnswer;
use devflow_db::repositories::{AnswerRepo, VoteRepo};
use devflow_events::{event_types, ForumEvent};
use serde::Deserialize;
use serde_json::json;

use crate::error::AppResult;
use crate::handlers::announce;
use crate::handlers::questions::VoteRequest;
use crate::query::ListParams;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateAnswerRequest {
    #[serde(flatten)]
    pub draft: AnswerDraft,
    pub author_id: UserId,
    pub path: Option<String>,
}

/// GET /api/v1/questions/{id}/answers
///
/// Search terms are ignored; answers are only filtered by ordering.
pub async fn list_answers(
    State(state): State<AppState>,
    Path(question_id): Path<QuestionId>,
    Query(params): Query<ListParams>,
) -> AppResult<impl IntoResponse> {
    let filter: AnswerFilter = params.filter()?;
    let page = params.page_request()?;

    let answers = AnswerRepo::list_for_question(&state.pool, question_id, filter, &page).await?;
    Ok(Json(answers))
}

/// POST /api/v1/questions/{id}/answers
pub async fn create_answer(
    State(state): State<AppState>,
    Path(question_id): Path<QuestionId>,
    Json(input): Json<CreateAnswerRequest>,
) -> AppResult<impl IntoResponse> {
    check(&input.draft)?;

    let create = CreateAnswer {
        content: input.draft.content,
        author_id: input.author_id,
        question_id,
    };
    let answer = AnswerRepo::create(&state.pool, &create).await?;

    announce(
        &state,
        ForumEvent::new(event_types::ANSWER_CREATED)
            .with_source("answer", answer.id)
            .with_actor(answer.author_id)
            .with_revalidate_path(input.path)
            .with_payload(json!({ "question_id": answer.question_id })),
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: answer })))
}

/// POST /api/v1/answers/{id}/votes
pub async fn vote_answer(
    State(state): State<AppState>,
    Path(id): Path<AnswerId>,
    Json(input): Json<VoteRequest>,
) -> AppResult<impl IntoResponse> {
    let tally =
        VoteRepo::vote_answer(&state.pool, id, input.user_id, input.direction, input.prior)
            .await?;

    announce(
        &state,
        ForumEvent::new(event_types::VOTE_APPLIED)
            .with_source("answer", id)
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
