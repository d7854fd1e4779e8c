//! Repository for the `answers` table.

use devflow_core::error::CoreError;
use devflow_core::filters::{user_answers_spec, AnswerFilter, ListFilter};
use devflow_core::pagination::{Page, PageRequest};
use devflow_core::types::{AnswerId, QuestionId, UserId};
use sqlx::PgPool;

use crate::error::DbResult;
use crate::listing::{order_by, SortTarget};
use crate::models::answer::{Answer, AnswerWithAuthor, CreateAnswer, UserAnswer, ANSWER_COLUMNS};
use crate::models::user::AUTHOR_JSON;
use crate::pagination::{paginate, ListArg, ListQuery};
use crate::repositories::{QuestionRepo, UserRepo};

/// Provides answer creation, listings and bulk removal.
pub struct AnswerRepo;

impl AnswerRepo {
    /// Insert an answer, then append its id to the parent question.
    ///
    /// If the question disappears between the two writes, the new answer is
    /// removed again and `NotFound` is returned.
    pub async fn create(pool: &PgPool, input: &CreateAnswer) -> DbResult<Answer> {
        if !QuestionRepo::exists(pool, input.question_id).await? {
            return Err(CoreError::not_found(QuestionId::ENTITY, input.question_id).into());
        }
        if !UserRepo::exists(pool, input.author_id).await? {
            return Err(CoreError::not_found(UserId::ENTITY, input.author_id).into());
        }

        let query = format!(
            "INSERT INTO answers AS a (content, author_id, question_id) \
             VALUES ($1, $2, $3) \
             RETURNING {ANSWER_COLUMNS}"
        );
        let answer = sqlx::query_as::<_, Answer>(&query)
            .bind(&input.content)
            .bind(input.author_id)
            .bind(input.question_id)
            .fetch_one(pool)
            .await?;

        if !QuestionRepo::append_answer(pool, answer.question_id, answer.id).await? {
            tracing::warn!(
                answer_id = %answer.id,
                question_id = %answer.question_id,
                "Question vanished while answering, removing answer",
            );
            Self::delete(pool, answer.id).await?;
            return Err(CoreError::not_found(QuestionId::ENTITY, answer.question_id).into());
        }

        tracing::info!(
            answer_id = %answer.id,
            question_id = %answer.question_id,
            author_id = %answer.author_id,
            "Answer created",
        );
        Ok(answer)
    }

    pub async fn find_by_id(pool: &PgPool, id: AnswerId) -> Result<Option<Answer>, sqlx::Error> {
        let query = format!("SELECT {ANSWER_COLUMNS} FROM answers a WHERE a.id = $1");
        sqlx::query_as::<_, Answer>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// One page of the answers under `question_id`.
    pub async fn list_for_question(
        pool: &PgPool,
        question_id: QuestionId,
        filter: AnswerFilter,
        page: &PageRequest,
    ) -> DbResult<Page<AnswerWithAuthor>> {
        if !QuestionRepo::exists(pool, question_id).await? {
            return Err(CoreError::not_found(QuestionId::ENTITY, question_id).into());
        }

        let list = ListQuery::new(
            format!(
                "SELECT {ANSWER_COLUMNS}, {AUTHOR_JSON} AS author \
                 FROM answers a JOIN users u ON u.id = a.author_id"
            ),
            "SELECT COUNT(*) FROM answers a",
        )
        .and_bind("a.question_id = {p}", ListArg::Id(question_id.get()))
        .order_by(order_by(SortTarget::Answers, &filter.spec().sort)?);

        tracing::debug!(question_id = %question_id, filter = filter.keyword(), "Listing answers");
        Ok(paginate(pool, &list, page).await?)
    }

    /// One page of the answers `author_id` wrote, most upvoted first.
    pub async fn for_user(
        pool: &PgPool,
        author_id: UserId,
        page: &PageRequest,
    ) -> DbResult<Page<UserAnswer>> {
        let list = ListQuery::new(
            format!(
                "SELECT {ANSWER_COLUMNS}, q.title AS question_title, {AUTHOR_JSON} AS author \
                 FROM answers a \
                 JOIN questions q ON q.id = a.question_id \
                 JOIN users u ON u.id = a.author_id"
            ),
            "SELECT COUNT(*) FROM answers a",
        )
        .and_bind("a.author_id = {p}", ListArg::Id(author_id.get()))
        .order_by(order_by(SortTarget::Answers, &user_answers_spec().sort)?);

        Ok(paginate(pool, &list, page).await?)
    }

    /// Delete one answer row. Does not touch the parent's answer list.
    pub async fn delete(pool: &PgPool, id: AnswerId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM answers WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete every answer under `question_id`.
    pub async fn delete_for_question(
        pool: &PgPool,
        question_id: QuestionId,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM answers WHERE question_id = $1")
            .bind(question_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Delete every answer `author_id` wrote, unlisting each from its
    /// question first.
    pub async fn delete_by_author(pool: &PgPool, author_id: UserId) -> Result<u64, sqlx::Error> {
        let owned: Vec<(AnswerId, QuestionId)> =
            sqlx::query_as("SELECT id, question_id FROM answers WHERE author_id = $1")
                .bind(author_id)
                .fetch_all(pool)
                .await?;

        for (answer_id, question_id) in &owned {
            QuestionRepo::remove_answer(pool, *question_id, *answer_id).await?;
        }

        let result = sqlx::query("DELETE FROM answers WHERE author_id = $1")
            .bind(author_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
