//! Shared primitive types and typed entity identifiers.
//!
//! Identifiers cross the HTTP boundary as numbers or path segments. Each
//! entity gets its own newtype so a `QuestionId` can never be passed where a
//! `TagId` is expected, and every inbound value is validated exactly once,
//! when it is deserialized or parsed.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident, $entity:literal) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord,
            Serialize, Deserialize, sqlx::Type,
        )]
        #[serde(try_from = "DbId", into = "DbId")]
        #[sqlx(transparent)]
        pub struct $name(DbId);

        impl $name {
            /// Entity name used in error messages.
            pub const ENTITY: &'static str = $entity;

            /// Wrap a raw row id, rejecting zero and negative values.
            pub fn new(raw: DbId) -> Result<Self, CoreError> {
                if raw > 0 {
                    Ok(Self(raw))
                } else {
                    Err(CoreError::Validation(format!(
                        "{} id must be a positive integer, got {raw}",
                        $entity
                    )))
                }
            }

            /// The raw row id.
            pub fn get(self) -> DbId {
                self.0
            }
        }

        impl TryFrom<DbId> for $name {
            type Error = CoreError;

            fn try_from(raw: DbId) -> Result<Self, Self::Error> {
                Self::new(raw)
            }
        }

        impl From<$name> for DbId {
            fn from(id: $name) -> DbId {
                id.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = CoreError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return Err(CoreError::Validation(format!(
                        "{} id must not be empty",
                        $entity
                    )));
                }
                let raw: DbId = trimmed.parse().map_err(|_| {
                    CoreError::Validation(format!(
                        "{} id '{trimmed}' is not a valid integer",
                        $entity
                    ))
                })?;
                Self::new(raw)
            }
        }
    };
}

entity_id!(
    /// Row id of a `users` record.
    UserId,
    "User"
);
entity_id!(
    /// Row id of a `questions` record.
    QuestionId,
    "Question"
);
entity_id!(
    /// Row id of an `answers` record.
    AnswerId,
    "Answer"
);
entity_id!(
    /// Row id of a `tags` record.
    TagId,
    "Tag"
);

/// Opaque user id issued by the external identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(try_from = "String", into = "String")]
#[sqlx(transparent)]
pub struct ExternalId(String);

impl ExternalId {
    pub fn new(raw: impl Into<String>) -> Result<Self, CoreError> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(CoreError::Validation(
                "external user id must not be empty".to_string(),
            ));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ExternalId {
    type Error = CoreError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::new(raw)
    }
}

impl From<ExternalId> for String {
    fn from(id: ExternalId) -> String {
        id.0
    }
}

impl FromStr for ExternalId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for ExternalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn parses_positive_ids() {
        let id: QuestionId = "42".parse().unwrap();
        assert_eq!(id.get(), 42);
        assert_eq!(id.to_string(), "42");
    }

    #[test]
    fn trims_whitespace_before_parsing() {
        let id: TagId = "  7 ".parse().unwrap();
        assert_eq!(id.get(), 7);
    }

    #[test]
    fn rejects_empty_zero_negative_and_garbage() {
        assert_matches!("".parse::<UserId>(), Err(CoreError::Validation(_)));
        assert_matches!("   ".parse::<UserId>(), Err(CoreError::Validation(_)));
        assert_matches!("0".parse::<AnswerId>(), Err(CoreError::Validation(_)));
        assert_matches!("-3".parse::<AnswerId>(), Err(CoreError::Validation(_)));
        assert_matches!("abc".parse::<QuestionId>(), Err(CoreError::Validation(_)));
    }

    #[test]
    fn serde_uses_plain_numbers() {
        let id = UserId::new(9).unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "9");

        let back: UserId = serde_json::from_str("9").unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn serde_rejects_non_positive_ids() {
        assert!(serde_json::from_str::<QuestionId>("0").is_err());
        assert!(serde_json::from_str::<QuestionId>("-1").is_err());
    }

    #[test]
    fn external_id_is_trimmed_and_non_empty() {
        let id = ExternalId::new("  user_2abc ").unwrap();
        assert_eq!(id.as_str(), "user_2abc");
        assert_matches!(ExternalId::new(" "), Err(CoreError::Validation(_)));
        assert!(serde_json::from_str::<ExternalId>("\"\"").is_err());
    }
}
