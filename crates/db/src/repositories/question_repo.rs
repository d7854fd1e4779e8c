//! Repository for the `questions` table.
//!
//! A question owns its tag list, answer list and voter sets. Writes that
//! touch other rows (tags, answers, saved lists) run as ordered single-row
//! statements without a transaction; each step is idempotent so a failed
//! sequence can be retried from the start.

use devflow_core::error::CoreError;
use devflow_core::filters::{
    hot_questions_spec, user_questions_spec, ListFilter, QuestionFilter, DEFAULT_HOT_QUESTIONS,
};
use devflow_core::pagination::{Page, PageRequest, MAX_PAGE_SIZE};
use devflow_core::search::like_pattern;
use devflow_core::types::{AnswerId, QuestionId, TagId, UserId};
use devflow_core::validation::QuestionEdit;
use sqlx::PgPool;

use crate::error::DbResult;
use crate::listing::{order_by, question_predicate, SortTarget};
use crate::models::question::{
    CreateQuestion, Question, QuestionDetail, QuestionSummary, QUESTION_COLUMNS,
};
use crate::models::tag::TAG_REFS_JSON;
use crate::models::user::AUTHOR_JSON;
use crate::pagination::{fetch_limited, paginate, ListArg, ListQuery};
use crate::repositories::{AnswerRepo, InteractionRepo, TagRepo, UserRepo};

/// Search condition over title and content. `{p}` is the `ILIKE` pattern.
pub(crate) const QUESTION_SEARCH: &str = "(q.title ILIKE {p} OR q.content ILIKE {p})";

/// Base listing query producing [`QuestionSummary`] rows.
pub(crate) fn summary_query() -> ListQuery {
    ListQuery::new(
        format!(
            "SELECT q.id, q.title, {AUTHOR_JSON} AS author, {TAG_REFS_JSON} AS tags, q.views, \
             cardinality(q.upvotes) AS upvote_count, cardinality(q.downvotes) AS downvote_count, \
             cardinality(q.answers) AS answer_count, q.created_at \
             FROM questions q JOIN users u ON u.id = q.author_id"
        ),
        "SELECT COUNT(*) FROM questions q",
    )
}

/// Provides question CRUD, listings and the question delete cascade.
pub struct QuestionRepo;

impl QuestionRepo {
    // -----------------------------------------------------------------------
    // Creation
    // -----------------------------------------------------------------------

    /// Insert a question and attach its tags.
    ///
    /// Order: insert the question, resolve each tag name (creating the tag
    /// with this question already listed), then union the tag ids into the
    /// question's tag list. Tag names are expected to be validated already.
    pub async fn create_with_tags(pool: &PgPool, input: &CreateQuestion) -> DbResult<Question> {
        if !UserRepo::exists(pool, input.author_id).await? {
            return Err(CoreError::not_found(UserId::ENTITY, input.author_id).into());
        }

        let question = Self::insert(pool, input).await?;

        let mut tag_ids = Vec::with_capacity(input.tags.len());
        for name in &input.tags {
            let tag_id = TagRepo::resolve_or_create(pool, name, question.id).await?;
            if !tag_ids.contains(&tag_id) {
                tag_ids.push(tag_id);
            }
        }

        let question = Self::link_tags(pool, question.id, &tag_ids)
            .await?
            .ok_or_else(|| CoreError::not_found(QuestionId::ENTITY, question.id))?;

        tracing::info!(
            question_id = %question.id,
            author_id = %question.author_id,
            tag_count = question.tags.len(),
            "Question created",
        );
        Ok(question)
    }

    async fn insert(pool: &PgPool, input: &CreateQuestion) -> Result<Question, sqlx::Error> {
        let query = format!(
            "INSERT INTO questions AS q (title, content, author_id) \
             VALUES ($1, $2, $3) \
             RETURNING {QUESTION_COLUMNS}"
        );
        sqlx::query_as::<_, Question>(&query)
            .bind(&input.title)
            .bind(&input.content)
            .bind(input.author_id)
            .fetch_one(pool)
            .await
    }

    /// Union `tag_ids` into the question's tag list.
    ///
    /// Returns `None` if the question does not exist.
    pub async fn link_tags(
        pool: &PgPool,
        id: QuestionId,
        tag_ids: &[TagId],
    ) -> Result<Option<Question>, sqlx::Error> {
        let query = format!(
            "UPDATE questions AS q SET tags = q.tags || ARRAY( \
                 SELECT DISTINCT n.tag_id FROM unnest($2::BIGINT[]) AS n(tag_id) \
                 WHERE NOT (n.tag_id = ANY(q.tags)) \
             ) \
             WHERE q.id = $1 \
             RETURNING {QUESTION_COLUMNS}"
        );
        let raw: Vec<i64> = tag_ids.iter().map(|t| t.get()).collect();
        sqlx::query_as::<_, Question>(&query)
            .bind(id)
            .bind(raw)
            .fetch_optional(pool)
            .await
    }

    /// Append `answer_id` to the question's answer list if absent.
    ///
    /// Returns `false` if the question does not exist.
    pub async fn append_answer(
        pool: &PgPool,
        id: QuestionId,
        answer_id: AnswerId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE questions SET answers = CASE \
                 WHEN $2 = ANY(answers) THEN answers \
                 ELSE array_append(answers, $2) \
             END \
             WHERE id = $1",
        )
        .bind(id)
        .bind(answer_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Remove `answer_id` from the question's answer list.
    pub async fn remove_answer(
        pool: &PgPool,
        id: QuestionId,
        answer_id: AnswerId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE questions SET answers = array_remove(answers, $2) \
             WHERE id = $1",
        )
        .bind(id)
        .bind(answer_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    pub async fn find_by_id(
        pool: &PgPool,
        id: QuestionId,
    ) -> Result<Option<Question>, sqlx::Error> {
        let query = format!("SELECT {QUESTION_COLUMNS} FROM questions q WHERE q.id = $1");
        sqlx::query_as::<_, Question>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn exists(pool: &PgPool, id: QuestionId) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM questions WHERE id = $1)")
            .bind(id)
            .fetch_one(pool)
            .await
    }

    /// The question with its author and tag names resolved.
    pub async fn detail(
        pool: &PgPool,
        id: QuestionId,
    ) -> Result<Option<QuestionDetail>, sqlx::Error> {
        let query = format!(
            "SELECT {QUESTION_COLUMNS}, {AUTHOR_JSON} AS author, {TAG_REFS_JSON} AS tag_refs \
             FROM questions q JOIN users u ON u.id = q.author_id \
             WHERE q.id = $1"
        );
        sqlx::query_as::<_, QuestionDetail>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List questions with a filter and optional title/content search.
    pub async fn list(
        pool: &PgPool,
        filter: QuestionFilter,
        search: Option<&str>,
        page: &PageRequest,
    ) -> DbResult<Page<QuestionSummary>> {
        let spec = filter.spec();
        let mut list = summary_query()
            .and_bind_opt(QUESTION_SEARCH, like_pattern(search).map(ListArg::Text));
        if let Some(predicate) = spec.predicate {
            list = list.and(question_predicate(predicate));
        }
        let list = list.order_by(order_by(SortTarget::Questions, &spec.sort)?);

        tracing::debug!(
            filter = filter.keyword(),
            page = page.page(),
            "Listing questions",
        );
        Ok(paginate(pool, &list, page).await?)
    }

    /// The most viewed, then most upvoted, questions.
    pub async fn hot(pool: &PgPool, limit: Option<i64>) -> DbResult<Vec<QuestionSummary>> {
        let limit = limit
            .unwrap_or(DEFAULT_HOT_QUESTIONS)
            .clamp(1, MAX_PAGE_SIZE);
        let sort = order_by(SortTarget::Questions, &hot_questions_spec().sort)?;
        let list = summary_query().order_by(sort);
        Ok(fetch_limited(pool, &list, limit).await?)
    }

    /// One page of the questions `author_id` wrote.
    pub async fn for_user(
        pool: &PgPool,
        author_id: UserId,
        page: &PageRequest,
    ) -> DbResult<Page<QuestionSummary>> {
        let list = summary_query()
            .and_bind("q.author_id = {p}", ListArg::Id(author_id.get()))
            .order_by(order_by(SortTarget::Questions, &user_questions_spec().sort)?);
        Ok(paginate(pool, &list, page).await?)
    }

    pub async fn ids_by_author(
        pool: &PgPool,
        author_id: UserId,
    ) -> Result<Vec<QuestionId>, sqlx::Error> {
        sqlx::query_scalar::<_, QuestionId>(
            "SELECT id FROM questions WHERE author_id = $1 \
             ORDER BY id",
        )
        .bind(author_id)
        .fetch_all(pool)
        .await
    }

    // -----------------------------------------------------------------------
    // Updates and deletion
    // -----------------------------------------------------------------------

    /// Replace title and content. Tags, author and votes are untouched.
    pub async fn edit(pool: &PgPool, id: QuestionId, edit: &QuestionEdit) -> DbResult<Question> {
        let query = format!(
            "UPDATE questions AS q SET title = $2, content = $3 \
             WHERE q.id = $1 \
             RETURNING {QUESTION_COLUMNS}"
        );
        let question = sqlx::query_as::<_, Question>(&query)
            .bind(id)
            .bind(&edit.title)
            .bind(&edit.content)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| CoreError::not_found(QuestionId::ENTITY, id))?;

        tracing::info!(question_id = %id, "Question edited");
        Ok(question)
    }

    /// Delete a question and everything hanging off it.
    ///
    /// Order: answers, interactions, tag back-references, saved lists, then
    /// the question row itself. The question is removed last so a failed
    /// run can be repeated with the same id.
    pub async fn delete_cascade(pool: &PgPool, id: QuestionId) -> DbResult<()> {
        if !Self::exists(pool, id).await? {
            return Err(CoreError::not_found(QuestionId::ENTITY, id).into());
        }

        let answers = AnswerRepo::delete_for_question(pool, id).await?;
        let interactions = InteractionRepo::delete_for_question(pool, id).await?;
        let tags = TagRepo::unlink_question(pool, id).await?;
        let saved_by = UserRepo::remove_saved_everywhere(pool, id).await?;

        sqlx::query("DELETE FROM questions WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        tracing::info!(
            question_id = %id,
            answers,
            interactions,
            tags,
            saved_by,
            "Question deleted",
        );
        Ok(())
    }
}
