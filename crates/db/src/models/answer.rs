//! Answer rows and DTOs.

use devflow_core::types::{AnswerId, QuestionId, Timestamp, UserId};
use devflow_core::vote::VoteSets;
use serde::Serialize;
use sqlx::types::Json;
use sqlx::FromRow;

use crate::models::user::AuthorRef;

/// Column list for `answers` queries, qualified by the `a` alias.
pub const ANSWER_COLUMNS: &str =
    "a.id, a.content, a.author_id, a.question_id, a.upvotes, a.downvotes, a.created_at";

/// A row from the `answers` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Answer {
    pub id: AnswerId,
    pub content: String,
    pub author_id: UserId,
    pub question_id: QuestionId,
    pub upvotes: Vec<UserId>,
    pub downvotes: Vec<UserId>,
    pub created_at: Timestamp,
}

impl Answer {
    pub fn vote_sets(&self) -> VoteSets<UserId> {
        VoteSets::new(self.upvotes.clone(), self.downvotes.clone())
    }
}

/// An answer under a question, with its author.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AnswerWithAuthor {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub answer: Answer,
    pub author: Json<AuthorRef>,
}

/// An answer on its author's profile, with the parent question's title.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserAnswer {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub answer: Answer,
    pub question_title: String,
    pub author: Json<AuthorRef>,
}

/// DTO for inserting an answer.
#[derive(Debug, Clone)]
pub struct CreateAnswer {
    pub content: String,
    pub author_id: UserId,
    pub question_id: QuestionId,
}
