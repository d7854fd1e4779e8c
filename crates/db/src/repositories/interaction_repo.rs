//! Repository for the `interactions` table.

use devflow_core::error::CoreError;
use devflow_core::types::{QuestionId, UserId};
use sqlx::PgPool;

use crate::error::DbResult;
use crate::models::interaction::{Interaction, ViewOutcome, ACTION_VIEW};
use crate::repositories::{QuestionRepo, UserRepo};

/// Provides view recording and interaction cleanup.
pub struct InteractionRepo;

impl InteractionRepo {
    /// Record that `viewer` opened the question.
    ///
    /// A signed-in viewer is counted once per question: the interaction row
    /// is inserted with `ON CONFLICT DO NOTHING` and the counter moves only
    /// when a row was actually inserted. Anonymous views always count.
    pub async fn record_view(
        pool: &PgPool,
        question_id: QuestionId,
        viewer: Option<UserId>,
    ) -> DbResult<ViewOutcome> {
        if !QuestionRepo::exists(pool, question_id).await? {
            return Err(CoreError::not_found(QuestionId::ENTITY, question_id).into());
        }
        if let Some(user_id) = viewer {
            if !UserRepo::exists(pool, user_id).await? {
                return Err(CoreError::not_found(UserId::ENTITY, user_id).into());
            }
        }

        let first_view = match viewer {
            Some(user_id) => {
                let result = sqlx::query(
                    "INSERT INTO interactions (user_id, action, question_id) \
                     VALUES ($1, $2, $3) \
                     ON CONFLICT (user_id, action, question_id) DO NOTHING",
                )
                .bind(user_id)
                .bind(ACTION_VIEW)
                .bind(question_id)
                .execute(pool)
                .await?;
                result.rows_affected() > 0
            }
            None => true,
        };

        if !first_view {
            return Ok(ViewOutcome { counted: false });
        }

        let result = sqlx::query("UPDATE questions SET views = views + 1 WHERE id = $1")
            .bind(question_id)
            .execute(pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(CoreError::not_found(QuestionId::ENTITY, question_id).into());
        }

        tracing::debug!(question_id = %question_id, viewer = ?viewer, "View counted");
        Ok(ViewOutcome { counted: true })
    }

    /// All interactions `user_id` has recorded, newest first.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: UserId,
    ) -> Result<Vec<Interaction>, sqlx::Error> {
        sqlx::query_as::<_, Interaction>(
            "SELECT id, user_id, action, question_id, created_at \
             FROM interactions WHERE user_id = $1 \
             ORDER BY created_at DESC, id DESC",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    pub async fn delete_for_question(
        pool: &PgPool,
        question_id: QuestionId,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM interactions WHERE question_id = $1")
            .bind(question_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }

    pub async fn delete_for_user(pool: &PgPool, user_id: UserId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM interactions WHERE user_id = $1")
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
