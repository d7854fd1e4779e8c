//! User rows and DTOs.

use devflow_core::types::{ExternalId, QuestionId, Timestamp, UserId};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Column list for `users` queries, qualified by the `u` alias.
pub const USER_COLUMNS: &str = "\
    u.id, u.external_id, u.name, u.username, u.email, u.picture, u.bio, \
    u.location, u.portfolio_url, u.reputation, u.saved, u.joined_at";

/// A row from the `users` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: UserId,
    pub external_id: ExternalId,
    pub name: String,
    pub username: String,
    pub email: String,
    pub picture: String,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub portfolio_url: Option<String>,
    pub reputation: i32,
    pub saved: Vec<QuestionId>,
    pub joined_at: Timestamp,
}

/// A user with their authored-content totals, for profile pages.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserInfo {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub user: User,
    pub total_questions: i64,
    pub total_answers: i64,
}

/// The author block embedded in question and answer listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorRef {
    pub id: UserId,
    pub external_id: ExternalId,
    pub name: String,
    pub picture: String,
}

/// SQL building an [`AuthorRef`] JSON document from the `u` alias.
pub const AUTHOR_JSON: &str = "\
    jsonb_build_object('id', u.id, 'external_id', u.external_id, \
    'name', u.name, 'picture', u.picture)";

/// DTO for provisioning a user from an identity-provider event.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUser {
    pub external_id: ExternalId,
    pub name: String,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub picture: String,
}
