//! Vote ledger execution.
//!
//! A [`VotePlan`] is applied as one `UPDATE` that rewrites both voter arrays
//! of a single row, so no reader ever sees the voter in both sets. Adding to
//! one set always strips the voter from the other.

use devflow_core::error::CoreError;
use devflow_core::types::{AnswerId, DbId, QuestionId, UserId};
use devflow_core::vote::{PriorVote, VoteDirection, VotePlan};
use serde::Serialize;
use sqlx::PgPool;

use crate::error::DbResult;
use crate::models::question::VoteTally;
use crate::repositories::UserRepo;

/// The kind of row a vote lands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteTarget {
    Question,
    Answer,
}

impl VoteTarget {
    fn table(self) -> &'static str {
        match self {
            Self::Question => "questions",
            Self::Answer => "answers",
        }
    }

    pub fn entity(self) -> &'static str {
        match self {
            Self::Question => QuestionId::ENTITY,
            Self::Answer => AnswerId::ENTITY,
        }
    }
}

/// Render the single-statement vote update for `target`.
///
/// Parameters: `$1` item id, `$2` voter, `$3` remove_up, `$4` remove_down,
/// `$5` add_up, `$6` add_down.
pub fn vote_update_sql(target: VoteTarget) -> String {
    format!(
        "UPDATE {table} SET \
             upvotes = CASE \
                 WHEN $3 OR $6 THEN array_remove(upvotes, $2) \
                 WHEN $5 AND NOT ($2 = ANY(upvotes)) THEN array_append(upvotes, $2) \
                 ELSE upvotes \
             END, \
             downvotes = CASE \
                 WHEN $4 OR $5 THEN array_remove(downvotes, $2) \
                 WHEN $6 AND NOT ($2 = ANY(downvotes)) THEN array_append(downvotes, $2) \
                 ELSE downvotes \
             END \
         WHERE id = $1 \
         RETURNING cardinality(upvotes) AS upvote_count, cardinality(downvotes) AS downvote_count",
        table = target.table()
    )
}

/// Applies votes and strips voters from every item.
pub struct VoteRepo;

impl VoteRepo {
    /// Apply `plan` for `voter` on one question or answer row.
    ///
    /// An unknown voter or item is `NotFound`; nothing is written.
    pub async fn apply(
        pool: &PgPool,
        target: VoteTarget,
        item_id: DbId,
        voter: UserId,
        plan: &VotePlan,
    ) -> DbResult<VoteTally> {
        if !UserRepo::exists(pool, voter).await? {
            return Err(CoreError::not_found(UserId::ENTITY, voter).into());
        }

        let sql = vote_update_sql(target);
        let tally = sqlx::query_as::<_, VoteTally>(&sql)
            .bind(item_id)
            .bind(voter)
            .bind(plan.remove_up)
            .bind(plan.remove_down)
            .bind(plan.add_up)
            .bind(plan.add_down)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| CoreError::not_found(target.entity(), item_id))?;

        tracing::info!(
            target = target.table(),
            item_id,
            voter = %voter,
            retraction = plan.is_retraction(),
            upvotes = tally.upvote_count,
            downvotes = tally.downvote_count,
            "Vote applied",
        );
        Ok(tally)
    }

    pub async fn vote_question(
        pool: &PgPool,
        question_id: QuestionId,
        voter: UserId,
        direction: VoteDirection,
        prior: PriorVote,
    ) -> DbResult<VoteTally> {
        let plan = VotePlan::for_vote(direction, prior);
        Self::apply(pool, VoteTarget::Question, question_id.get(), voter, &plan).await
    }

    pub async fn vote_answer(
        pool: &PgPool,
        answer_id: AnswerId,
        voter: UserId,
        direction: VoteDirection,
        prior: PriorVote,
    ) -> DbResult<VoteTally> {
        let plan = VotePlan::for_vote(direction, prior);
        Self::apply(pool, VoteTarget::Answer, answer_id.get(), voter, &plan).await
    }

    /// Remove `voter` from the voter sets of every question and answer.
    pub async fn remove_voter(pool: &PgPool, voter: UserId) -> Result<u64, sqlx::Error> {
        let mut affected = 0;
        for target in [VoteTarget::Question, VoteTarget::Answer] {
            let sql = format!(
                "UPDATE {table} SET \
                     upvotes = array_remove(upvotes, $1), \
                     downvotes = array_remove(downvotes, $1) \
                 WHERE upvotes @> ARRAY[$1]::BIGINT[] OR downvotes @> ARRAY[$1]::BIGINT[]",
                table = target.table()
            );
            let result = sqlx::query(&sql).bind(voter).execute(pool).await?;
            affected += result.rows_affected();
        }
        Ok(affected)
    }
}
