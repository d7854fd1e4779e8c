//! Repository for the `tags` table.
//!
//! Tags are created lazily the first time a question uses a name and are
//! never deleted here. Each tag keeps a back-reference list of its questions;
//! the question's own `tags` column is the authoritative side.

use devflow_core::error::CoreError;
use devflow_core::filters::{tag_questions_spec, ListFilter, TagFilter};
use devflow_core::pagination::{Page, PageRequest, MAX_PAGE_SIZE};
use devflow_core::search::like_pattern;
use devflow_core::tags::{normalize_tag_name, DEFAULT_POPULAR_TAGS, DEFAULT_TOP_USER_TAGS};
use devflow_core::types::{QuestionId, TagId, UserId};
use sqlx::PgPool;

use crate::error::DbResult;
use crate::listing::{order_by, SortTarget};
use crate::models::question::QuestionSummary;
use crate::models::tag::{
    Tag, TagQuestions, TagRef, TagSummary, TagUsage, TAG_COLUMNS, TAG_SUMMARY_COLUMNS,
};
use crate::pagination::{fetch_limited, paginate, ListArg, ListQuery};
use crate::repositories::question_repo::summary_query;

/// Provides tag resolution, back-reference maintenance and tag listings.
pub struct TagRepo;

impl TagRepo {
    // -----------------------------------------------------------------------
    // Resolution and back-references
    // -----------------------------------------------------------------------

    /// Return the id of the tag named `name` (any casing), creating it if
    /// absent, and attach `question_id` to its question list.
    ///
    /// One statement: concurrent callers with the same name converge on a
    /// single row through the unique index on `lower(name)`. The stored name
    /// keeps the casing of whoever created it.
    pub async fn resolve_or_create(
        pool: &PgPool,
        name: &str,
        question_id: QuestionId,
    ) -> Result<TagId, sqlx::Error> {
        let tag_id = sqlx::query_scalar::<_, TagId>(
            "INSERT INTO tags (name, questions) VALUES ($1, ARRAY[$2]::BIGINT[]) \
             ON CONFLICT ((lower(name))) DO UPDATE SET questions = CASE \
                 WHEN $2 = ANY(tags.questions) THEN tags.questions \
                 ELSE array_append(tags.questions, $2) \
             END \
             RETURNING id",
        )
        .bind(normalize_tag_name(name))
        .bind(question_id)
        .fetch_one(pool)
        .await?;

        tracing::debug!(tag_id = %tag_id, question_id = %question_id, name, "Resolved tag");
        Ok(tag_id)
    }

    /// Remove `question_id` from every tag that lists it.
    ///
    /// Returns the number of tags updated.
    pub async fn unlink_question(
        pool: &PgPool,
        question_id: QuestionId,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE tags SET questions = array_remove(questions, $1) \
             WHERE questions @> ARRAY[$1]::BIGINT[]",
        )
        .bind(question_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Remove `user_id` from every tag's follower list.
    pub async fn remove_follower(pool: &PgPool, user_id: UserId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE tags SET followers = array_remove(followers, $1) \
             WHERE followers @> ARRAY[$1]::BIGINT[]",
        )
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    pub async fn find_by_id(pool: &PgPool, id: TagId) -> Result<Option<Tag>, sqlx::Error> {
        let query = format!("SELECT {TAG_COLUMNS} FROM tags t WHERE t.id = $1");
        sqlx::query_as::<_, Tag>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a tag by name, ignoring case.
    pub async fn find_by_name(pool: &PgPool, name: &str) -> Result<Option<Tag>, sqlx::Error> {
        let query = format!("SELECT {TAG_COLUMNS} FROM tags t WHERE lower(t.name) = lower($1)");
        sqlx::query_as::<_, Tag>(&query)
            .bind(normalize_tag_name(name))
            .fetch_optional(pool)
            .await
    }

    /// List tags, optionally matching `search` against the name.
    pub async fn list(
        pool: &PgPool,
        filter: TagFilter,
        search: Option<&str>,
        page: &PageRequest,
    ) -> DbResult<Page<TagSummary>> {
        let list = ListQuery::new(
            format!("SELECT {TAG_SUMMARY_COLUMNS} FROM tags t"),
            "SELECT COUNT(*) FROM tags t",
        )
        .and_bind_opt("t.name ILIKE {p}", like_pattern(search).map(ListArg::Text))
        .order_by(order_by(SortTarget::Tags, &filter.spec().sort)?);

        tracing::debug!(
            filter = filter.keyword(),
            page = page.page(),
            "Listing tags",
        );
        Ok(paginate(pool, &list, page).await?)
    }

    /// The tags attached to the most questions.
    pub async fn top_popular(
        pool: &PgPool,
        limit: Option<i64>,
    ) -> Result<Vec<TagSummary>, sqlx::Error> {
        let limit = limit
            .unwrap_or(DEFAULT_POPULAR_TAGS)
            .clamp(1, MAX_PAGE_SIZE);
        let list = ListQuery::new(
            format!("SELECT {TAG_SUMMARY_COLUMNS} FROM tags t"),
            "SELECT COUNT(*) FROM tags t",
        )
        .order_by("cardinality(t.questions) DESC, t.id DESC");
        fetch_limited(pool, &list, limit).await
    }

    /// One page of the questions carrying `tag_id`, newest first, optionally
    /// matching `search` against the title.
    pub async fn questions_for_tag(
        pool: &PgPool,
        tag_id: TagId,
        search: Option<&str>,
        page: &PageRequest,
    ) -> DbResult<TagQuestions> {
        let tag = Self::find_by_id(pool, tag_id)
            .await?
            .ok_or_else(|| CoreError::not_found(TagId::ENTITY, tag_id))?;

        let list = summary_query()
            .and_bind("q.tags @> ARRAY[{p}]::BIGINT[]", ListArg::Id(tag_id.get()))
            .and_bind_opt("q.title ILIKE {p}", like_pattern(search).map(ListArg::Text))
            .order_by(order_by(SortTarget::Questions, &tag_questions_spec().sort)?);

        let questions: Page<QuestionSummary> = paginate(pool, &list, page).await?;
        Ok(TagQuestions {
            tag: TagRef {
                id: tag.id,
                name: tag.name,
            },
            questions,
        })
    }

    /// The tags `user_id` has used most across their own questions.
    pub async fn top_interacted_for_user(
        pool: &PgPool,
        user_id: UserId,
        limit: Option<i64>,
    ) -> Result<Vec<TagUsage>, sqlx::Error> {
        let limit = limit
            .unwrap_or(DEFAULT_TOP_USER_TAGS)
            .clamp(1, MAX_PAGE_SIZE);
        sqlx::query_as::<_, TagUsage>(
            "SELECT t.id, t.name, COUNT(*) AS usage_count \
             FROM questions q \
             CROSS JOIN LATERAL unnest(q.tags) AS qt(tag_id) \
             JOIN tags t ON t.id = qt.tag_id \
             WHERE q.author_id = $1 \
             GROUP BY t.id, t.name \
             ORDER BY usage_count DESC, lower(t.name) ASC, t.id ASC \
             LIMIT $2",
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(pool)
        .await
    }
}
