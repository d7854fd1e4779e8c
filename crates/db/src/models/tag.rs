//! Tag rows.

use devflow_core::pagination::Page;
use devflow_core::types::{QuestionId, TagId, Timestamp, UserId};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::question::QuestionSummary;

/// Column list for `tags` queries, qualified by the `t` alias.
pub const TAG_COLUMNS: &str = "t.id, t.name, t.description, t.questions, t.followers, t.created_at";

/// A row from the `tags` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Tag {
    pub id: TagId,
    pub name: String,
    pub description: String,
    pub questions: Vec<QuestionId>,
    pub followers: Vec<UserId>,
    pub created_at: Timestamp,
}

/// Tag listing row: the question list is reduced to its size.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TagSummary {
    pub id: TagId,
    pub name: String,
    pub description: String,
    pub question_count: i32,
    pub created_at: Timestamp,
}

/// Column list producing a [`TagSummary`] from the `t` alias.
pub const TAG_SUMMARY_COLUMNS: &str =
    "t.id, t.name, t.description, cardinality(t.questions) AS question_count, t.created_at";

/// The tag block embedded in question rows.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct TagRef {
    pub id: TagId,
    pub name: String,
}

/// SQL building a JSON array of [`TagRef`]s for the question alias `q`.
pub const TAG_REFS_JSON: &str = "\
    COALESCE((SELECT jsonb_agg(jsonb_build_object('id', t.id, 'name', t.name) ORDER BY t.name) \
    FROM tags t WHERE t.id = ANY(q.tags)), '[]'::jsonb)";

/// How often a user has used a tag across their own questions.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TagUsage {
    pub id: TagId,
    pub name: String,
    pub usage_count: i64,
}

/// A tag and one page of its questions.
#[derive(Debug, Clone, Serialize)]
pub struct TagQuestions {
    pub tag: TagRef,
    pub questions: Page<QuestionSummary>,
}
