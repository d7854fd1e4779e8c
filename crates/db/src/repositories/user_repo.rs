//! Repository for the `users` table.
//!
//! Users are provisioned from identity-provider events and addressed by
//! their external id at the edges; everything inside the store uses the
//! internal [`UserId`].

use devflow_core::error::CoreError;
use devflow_core::filters::{ListFilter, SavedQuestionFilter, UserFilter};
use devflow_core::pagination::{Page, PageRequest};
use devflow_core::search::like_pattern;
use devflow_core::types::{ExternalId, QuestionId, UserId};
use devflow_core::validation::ProfileUpdate;
use sqlx::PgPool;

use crate::error::{conflict_as_exists, DbError, DbResult};
use crate::listing::{order_by, SortTarget};
use crate::models::question::QuestionSummary;
use crate::models::user::{CreateUser, User, UserInfo, USER_COLUMNS};
use crate::pagination::{paginate, ListArg, ListQuery};
use crate::repositories::question_repo::{summary_query, QUESTION_SEARCH};
use crate::repositories::{AnswerRepo, InteractionRepo, QuestionRepo, TagRepo, VoteRepo};

/// Provides user CRUD, the saved-question set and the user delete cascade.
pub struct UserRepo;

impl UserRepo {
    // -----------------------------------------------------------------------
    // CRUD
    // -----------------------------------------------------------------------

    /// Insert a user. A duplicate external id or username is `AlreadyExists`.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> DbResult<User> {
        let query = format!(
            "INSERT INTO users AS u (external_id, name, username, email, picture) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {USER_COLUMNS}"
        );
        let user = sqlx::query_as::<_, User>(&query)
            .bind(&input.external_id)
            .bind(&input.name)
            .bind(&input.username)
            .bind(&input.email)
            .bind(&input.picture)
            .fetch_one(pool)
            .await
            .map_err(|e| {
                conflict_as_exists(e, || {
                    format!(
                        "user with external id '{}' or username '{}'",
                        input.external_id, input.username
                    )
                })
            })?;

        tracing::info!(user_id = %user.id, external_id = %user.external_id, "User created");
        Ok(user)
    }

    pub async fn find_by_id(pool: &PgPool, id: UserId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {USER_COLUMNS} FROM users u WHERE u.id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_external_id(
        pool: &PgPool,
        external_id: &ExternalId,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {USER_COLUMNS} FROM users u WHERE u.external_id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(external_id)
            .fetch_optional(pool)
            .await
    }

    /// Like [`Self::find_by_external_id`], with absence as `NotFound`.
    pub async fn require_by_external_id(pool: &PgPool, external_id: &ExternalId) -> DbResult<User> {
        Self::find_by_external_id(pool, external_id)
            .await?
            .ok_or_else(|| CoreError::not_found(UserId::ENTITY, external_id).into())
    }

    pub async fn exists(pool: &PgPool, id: UserId) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM users WHERE id = $1)")
            .bind(id)
            .fetch_one(pool)
            .await
    }

    /// Apply the fields present in `update`, leaving the rest untouched.
    pub async fn update_by_external_id(
        pool: &PgPool,
        external_id: &ExternalId,
        update: &ProfileUpdate,
    ) -> DbResult<User> {
        let query = format!(
            "UPDATE users AS u SET \
                 name = COALESCE($2, u.name), \
                 username = COALESCE($3, u.username), \
                 email = COALESCE($4, u.email), \
                 picture = COALESCE($5, u.picture), \
                 bio = COALESCE($6, u.bio), \
                 location = COALESCE($7, u.location), \
                 portfolio_url = COALESCE($8, u.portfolio_url) \
             WHERE u.external_id = $1 \
             RETURNING {USER_COLUMNS}"
        );
        let user = sqlx::query_as::<_, User>(&query)
            .bind(external_id)
            .bind(update.name.as_deref())
            .bind(update.username.as_deref())
            .bind(update.email.as_deref())
            .bind(update.picture.as_deref())
            .bind(update.bio.as_deref())
            .bind(update.location.as_deref())
            .bind(update.portfolio_url.as_deref())
            .fetch_optional(pool)
            .await
            .map_err(|e| {
                conflict_as_exists(e, || {
                    format!(
                        "username '{}'",
                        update.username.as_deref().unwrap_or_default()
                    )
                })
            })?
            .ok_or_else(|| CoreError::not_found(UserId::ENTITY, external_id))?;

        tracing::info!(user_id = %user.id, external_id = %external_id, "User updated");
        Ok(user)
    }

    /// The user with totals of authored questions and answers.
    pub async fn info(pool: &PgPool, external_id: &ExternalId) -> DbResult<UserInfo> {
        let query = format!(
            "SELECT {USER_COLUMNS}, \
                 (SELECT COUNT(*) FROM questions q WHERE q.author_id = u.id) AS total_questions, \
                 (SELECT COUNT(*) FROM answers a WHERE a.author_id = u.id) AS total_answers \
             FROM users u WHERE u.external_id = $1"
        );
        sqlx::query_as::<_, UserInfo>(&query)
            .bind(external_id)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| CoreError::not_found(UserId::ENTITY, external_id).into())
    }

    /// List users, optionally matching `search` against name or username.
    pub async fn list(
        pool: &PgPool,
        filter: UserFilter,
        search: Option<&str>,
        page: &PageRequest,
    ) -> DbResult<Page<User>> {
        let list = ListQuery::new(
            format!("SELECT {USER_COLUMNS} FROM users u"),
            "SELECT COUNT(*) FROM users u",
        )
        .and_bind_opt(
            "(u.name ILIKE {p} OR u.username ILIKE {p})",
            like_pattern(search).map(ListArg::Text),
        )
        .order_by(order_by(SortTarget::Users, &filter.spec().sort)?);

        tracing::debug!(
            filter = filter.keyword(),
            page = page.page(),
            "Listing users",
        );
        Ok(paginate(pool, &list, page).await?)
    }

    // -----------------------------------------------------------------------
    // Saved questions
    // -----------------------------------------------------------------------

    /// Flip membership of `question_id` in the user's saved set.
    ///
    /// Returns whether the question is saved afterwards.
    pub async fn toggle_saved(
        pool: &PgPool,
        user_id: UserId,
        question_id: QuestionId,
    ) -> DbResult<bool> {
        if !QuestionRepo::exists(pool, question_id).await? {
            return Err(CoreError::not_found(QuestionId::ENTITY, question_id).into());
        }

        let saved = sqlx::query_scalar::<_, bool>(
            "UPDATE users SET saved = CASE \
                 WHEN $2 = ANY(saved) THEN array_remove(saved, $2) \
                 ELSE array_append(saved, $2) \
             END \
             WHERE id = $1 \
             RETURNING $2 = ANY(saved)",
        )
        .bind(user_id)
        .bind(question_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| CoreError::not_found(UserId::ENTITY, user_id))?;

        tracing::info!(user_id = %user_id, question_id = %question_id, saved, "Saved set toggled");
        Ok(saved)
    }

    /// One page of the user's saved questions.
    ///
    /// Ids in the saved set whose question no longer exists are skipped.
    pub async fn saved_questions(
        pool: &PgPool,
        external_id: &ExternalId,
        filter: SavedQuestionFilter,
        search: Option<&str>,
        page: &PageRequest,
    ) -> DbResult<Page<QuestionSummary>> {
        let user = Self::require_by_external_id(pool, external_id).await?;
        if user.saved.is_empty() {
            return Ok(Page::empty());
        }

        let saved: Vec<i64> = user.saved.iter().map(|id| id.get()).collect();
        let list = summary_query()
            .and_bind("q.id = ANY({p})", ListArg::Ids(saved))
            .and_bind_opt(QUESTION_SEARCH, like_pattern(search).map(ListArg::Text))
            .order_by(order_by(SortTarget::Questions, &filter.spec().sort)?);

        Ok(paginate(pool, &list, page).await?)
    }

    /// Remove `question_id` from every user's saved set.
    pub async fn remove_saved_everywhere(
        pool: &PgPool,
        question_id: QuestionId,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE users SET saved = array_remove(saved, $1) \
             WHERE saved @> ARRAY[$1]::BIGINT[]",
        )
        .bind(question_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    // -----------------------------------------------------------------------
    // Deletion
    // -----------------------------------------------------------------------

    /// Delete a user and everything they authored.
    ///
    /// Order: each authored question with its own cascade, authored answers
    /// (unlisted from their questions first), interactions, votes and tag
    /// follows, then the user row. Returns the deleted user.
    pub async fn delete_cascade(pool: &PgPool, external_id: &ExternalId) -> DbResult<User> {
        let user = Self::require_by_external_id(pool, external_id).await?;

        let question_ids = QuestionRepo::ids_by_author(pool, user.id).await?;
        for question_id in &question_ids {
            match QuestionRepo::delete_cascade(pool, *question_id).await {
                Ok(()) | Err(DbError::Core(CoreError::NotFound { .. })) => {}
                Err(e) => return Err(e),
            }
        }

        let answers = AnswerRepo::delete_by_author(pool, user.id).await?;
        let interactions = InteractionRepo::delete_for_user(pool, user.id).await?;
        let votes = VoteRepo::remove_voter(pool, user.id).await?;
        let follows = TagRepo::remove_follower(pool, user.id).await?;

        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user.id)
            .execute(pool)
            .await?;

        tracing::info!(
            user_id = %user.id,
            external_id = %external_id,
            questions = question_ids.len(),
            answers,
            interactions,
            votes,
            follows,
            "User deleted",
        );
        Ok(user)
    }
}
