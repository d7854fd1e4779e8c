//! Interaction rows.

use devflow_core::types::{DbId, QuestionId, Timestamp, UserId};
use serde::Serialize;
use sqlx::FromRow;

/// Action kind recorded when a signed-in user opens a question.
pub const ACTION_VIEW: &str = "view";

/// A row from the `interactions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Interaction {
    pub id: DbId,
    pub user_id: UserId,
    pub action: String,
    pub question_id: QuestionId,
    pub created_at: Timestamp,
}

/// Result of recording a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ViewOutcome {
    /// Whether the question's view counter was incremented.
    pub counted: bool,
}
