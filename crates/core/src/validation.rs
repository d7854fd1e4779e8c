//! Caller-facing input schemas.
//!
//! These are the shapes the presentation layer submits. Field bounds are
//! checked with `validator` before anything reaches the store; the store
//! layer itself trusts its inputs.

use serde::Deserialize;
use validator::{Validate, ValidationErrors};

use crate::error::CoreError;
use crate::tags::validate_question_tags;

/// A new question as submitted by the ask-question form.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct QuestionDraft {
    #[validate(length(min = 5, max = 130))]
    pub title: String,
    #[validate(length(min = 100))]
    pub content: String,
    pub tags: Vec<String>,
}

impl QuestionDraft {
    /// Validate all fields and return the de-duplicated tag names.
    pub fn validated_tags(&self) -> Result<Vec<String>, CoreError> {
        check(self)?;
        validate_question_tags(&self.tags)
    }
}

/// An edit to an existing question. Tags are not editable.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct QuestionEdit {
    #[validate(length(min = 5, max = 130))]
    pub title: String,
    #[validate(length(min = 100))]
    pub content: String,
}

/// A new answer.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AnswerDraft {
    #[validate(length(min = 100))]
    pub content: String,
}

/// Profile fields a user may change. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ProfileUpdate {
    #[validate(length(min = 5, max = 50))]
    pub name: Option<String>,
    #[validate(length(min = 5, max = 50))]
    pub username: Option<String>,
    pub email: Option<String>,
    pub picture: Option<String>,
    #[validate(length(min = 10, max = 150))]
    pub bio: Option<String>,
    #[validate(url)]
    pub portfolio_url: Option<String>,
    #[validate(length(min = 5, max = 50))]
    pub location: Option<String>,
}

/// Run `validator` checks and flatten failures into a [`CoreError`].
pub fn check<T: Validate>(input: &T) -> Result<(), CoreError> {
    input.validate().map_err(to_core_error)
}

fn to_core_error(errors: ValidationErrors) -> CoreError {
    let mut fields: Vec<String> = errors
        .field_errors()
        .into_iter()
        .map(|(field, errs)| {
            let codes: Vec<&str> = errs.iter().map(|e| e.code.as_ref()).collect();
            format!("{field} ({})", codes.join(", "))
        })
        .collect();
    fields.sort();
    CoreError::Validation(format!("Invalid fields: {}", fields.join("; ")))
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn draft(title: &str, content_len: usize, tags: &[&str]) -> QuestionDraft {
        QuestionDraft {
            title: title.to_string(),
            content: "x".repeat(content_len),
            tags: tags.iter().map(|t| t.to_string()).collect(),
        }
    }

    #[test]
    fn valid_question_draft_returns_tags() {
        let tags = draft(
            "How do lifetimes work?",
            120,
            &["rust", "Rust", "lifetimes"],
        )
            .validated_tags()
            .unwrap();
        assert_eq!(tags, vec!["rust".to_string(), "lifetimes".to_string()]);
    }

    #[test]
    fn short_title_is_rejected() {
        let err = draft("Why", 120, &["rust"]).validated_tags().unwrap_err();
        assert_matches!(err, CoreError::Validation(msg) if msg.contains("title"));
    }

    #[test]
    fn short_content_is_rejected() {
        let err = draft("A proper title", 10, &["rust"])
            .validated_tags()
            .unwrap_err();
        assert_matches!(err, CoreError::Validation(msg) if msg.contains("content"));
    }

    #[test]
    fn bad_tags_are_rejected_after_fields_pass() {
        assert_matches!(
            draft("A proper title", 120, &[]).validated_tags(),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn answer_needs_minimum_content() {
        assert!(check(&AnswerDraft { content: "y".repeat(100) }).is_ok());
        assert_matches!(
            check(&AnswerDraft { content: "too short".into() }),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn profile_update_checks_only_present_fields() {
        assert!(check(&ProfileUpdate::default()).is_ok());

        let bad = ProfileUpdate {
            portfolio_url: Some("not a url".into()),
            ..ProfileUpdate::default()
        };
        assert_matches!(
            check(&bad),
            Err(CoreError::Validation(msg)) if msg.contains("portfolio_url")
        );
    }
}
