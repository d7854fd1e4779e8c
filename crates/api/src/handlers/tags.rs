//! Handlers for the tag registry's read side.
//!
//! Tags are created only as a side effect of asking a question.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use devflow_core::filters::TagFilter;
use devflow_core::types::TagId;
use devflow_db::repositories::TagRepo;

use crate::error::AppResult;
use crate::query::{LimitParams, ListParams};
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/tags
pub async fn list_tags(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> AppResult<impl IntoResponse> {
    let filter: TagFilter = params.filter()?;
    let page = params.page_request()?;

    let tags = TagRepo::list(&state.pool, filter, params.search(), &page).await?;
    Ok(Json(tags))
}

/// GET /api/v1/tags/popular
///
/// Tags attached to the most questions, most used first.
pub async fn popular_tags(
    State(state): State<AppState>,
    Query(params): Query<LimitParams>,
) -> AppResult<impl IntoResponse> {
    let tags = TagRepo::top_popular(&state.pool, params.limit).await?;
    Ok(Json(DataResponse { data: tags }))
}

/// GET /api/v1/tags/{id}/questions
///
/// The tag name plus one page of its questions, newest first. `q` matches
/// question titles; `filter` is not used here.
pub async fn tag_questions(
    State(state): State<AppState>,
    Path(tag_id): Path<TagId>,
    Query(params): Query<ListParams>,
) -> AppResult<impl IntoResponse> {
    let page = params.page_request()?;

    let result = TagRepo::questions_for_tag(&state.pool, tag_id, params.search(), &page).await?;
    Ok(Json(DataResponse { data: result }))
}
