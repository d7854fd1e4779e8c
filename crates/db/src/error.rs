//! Store-layer error type.
//!
//! Plain reads return `sqlx::Error` and signal absence with `Option`.
//! Operations that span several statements, or that must report a missing
//! entity as a domain error, return [`DbResult`].

use devflow_core::error::CoreError;

/// PostgreSQL SQLSTATE for `unique_violation`.
pub const UNIQUE_VIOLATION: &str = "23505";

#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Store failure: {0}")]
    Store(#[from] sqlx::Error),
}

pub type DbResult<T> = Result<T, DbError>;

impl DbError {
    /// The domain error, if this is one.
    pub fn as_core(&self) -> Option<&CoreError> {
        match self {
            Self::Core(e) => Some(e),
            Self::Store(_) => None,
        }
    }
}

/// Whether `err` is a unique-constraint violation.
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.code().as_deref() == Some(UNIQUE_VIOLATION))
}

/// Map a unique violation to `AlreadyExists(what)`, passing anything else through.
pub fn conflict_as_exists(err: sqlx::Error, what: impl FnOnce() -> String) -> DbError {
    if is_unique_violation(&err) {
        DbError::Core(CoreError::AlreadyExists(what()))
    } else {
        DbError::Store(err)
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn non_database_errors_pass_through() {
        let err = conflict_as_exists(sqlx::Error::RowNotFound, || "user".to_string());
        assert_matches!(err, DbError::Store(sqlx::Error::RowNotFound));
    }

    #[test]
    fn core_errors_convert_with_question_mark() {
        fn fails() -> DbResult<()> {
            Err(CoreError::not_found("Question", 4))?
        }
        let err = fails().unwrap_err();
        assert_matches!(
            err.as_core(),
            Some(CoreError::NotFound { entity: "Question", .. })
        );
    }
}
