//! Question rows and DTOs.

use devflow_core::types::{AnswerId, QuestionId, TagId, Timestamp, UserId};
use devflow_core::vote::VoteSets;
use serde::Serialize;
use sqlx::types::Json;
use sqlx::FromRow;

use crate::models::tag::TagRef;
use crate::models::user::AuthorRef;

/// Column list for `questions` queries, qualified by the `q` alias.
pub const QUESTION_COLUMNS: &str = "\
    q.id, q.title, q.content, q.author_id, q.tags, q.answers, q.views, \
    q.upvotes, q.downvotes, q.created_at";

/// A row from the `questions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Question {
    pub id: QuestionId,
    pub title: String,
    pub content: String,
    pub author_id: UserId,
    pub tags: Vec<TagId>,
    pub answers: Vec<AnswerId>,
    pub views: i32,
    pub upvotes: Vec<UserId>,
    pub downvotes: Vec<UserId>,
    pub created_at: Timestamp,
}

impl Question {
    /// The question's voter sets, for deriving a voter's prior stance.
    pub fn vote_sets(&self) -> VoteSets<UserId> {
        VoteSets::new(self.upvotes.clone(), self.downvotes.clone())
    }
}

/// A question with its author and tags resolved, for the question page.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct QuestionDetail {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub question: Question,
    pub author: Json<AuthorRef>,
    pub tag_refs: Json<Vec<TagRef>>,
}

/// Listing row for question cards.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct QuestionSummary {
    pub id: QuestionId,
    pub title: String,
    pub author: Json<AuthorRef>,
    pub tags: Json<Vec<TagRef>>,
    pub views: i32,
    pub upvote_count: i32,
    pub downvote_count: i32,
    pub answer_count: i32,
    pub created_at: Timestamp,
}

/// DTO for inserting a question. Tag names are resolved by the repository.
#[derive(Debug, Clone)]
pub struct CreateQuestion {
    pub title: String,
    pub content: String,
    pub author_id: UserId,
    pub tags: Vec<String>,
}

/// Result of a vote on a question or answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromRow, Serialize)]
pub struct VoteTally {
    pub upvote_count: i32,
    pub downvote_count: i32,
}
