//! SQL rendering of listing specifications.
//!
//! `devflow_core::filters` describes orderings by abstract [`SortKey`]s;
//! this module maps them onto the columns of one table alias. Only keys a
//! table actually has are accepted, so a filter from the wrong scope is an
//! internal error rather than silently ignored.

use devflow_core::error::CoreError;
use devflow_core::filters::{Predicate, SortDirection, SortKey, SortSpec};

/// The table a listing reads from, with the alias its queries use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortTarget {
    /// `questions q`
    Questions,
    /// `answers a`
    Answers,
    /// `users u`
    Users,
    /// `tags t`
    Tags,
}

impl SortTarget {
    /// SQL expression for `key` on this table, if the table has it.
    pub fn column(self, key: SortKey) -> Option<&'static str> {
        use SortKey::*;
        match (self, key) {
            (Self::Questions, CreatedAt) => Some("q.created_at"),
            (Self::Questions, Views) => Some("q.views"),
            (Self::Questions, UpvoteCount) => Some("cardinality(q.upvotes)"),
            (Self::Questions, AnswerCount) => Some("cardinality(q.answers)"),
            (Self::Questions, Id) => Some("q.id"),

            (Self::Answers, CreatedAt) => Some("a.created_at"),
            (Self::Answers, UpvoteCount) => Some("cardinality(a.upvotes)"),
            (Self::Answers, Id) => Some("a.id"),

            (Self::Users, JoinedAt) => Some("u.joined_at"),
            (Self::Users, Reputation) => Some("u.reputation"),
            (Self::Users, Name) => Some("lower(u.name)"),
            (Self::Users, Id) => Some("u.id"),

            (Self::Tags, CreatedAt) => Some("t.created_at"),
            (Self::Tags, QuestionCount) => Some("cardinality(t.questions)"),
            (Self::Tags, Name) => Some("lower(t.name)"),
            (Self::Tags, Id) => Some("t.id"),

            _ => None,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::Questions => "questions",
            Self::Answers => "answers",
            Self::Users => "users",
            Self::Tags => "tags",
        }
    }
}

/// Render `spec` as the body of an `ORDER BY` clause.
pub fn order_by(target: SortTarget, spec: &SortSpec) -> Result<String, CoreError> {
    let mut parts = Vec::new();
    for field in spec.fields() {
        let column = target.column(field.key).ok_or_else(|| {
            CoreError::Internal(format!(
                "{:?} is not sortable on {}",
                field.key,
                target.name()
            ))
        })?;
        let direction = match field.direction {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        };
        parts.push(format!("{column} {direction}"));
    }
    Ok(parts.join(", "))
}

/// Render a filter predicate as a `WHERE` condition on the questions alias.
pub fn question_predicate(predicate: Predicate) -> &'static str {
    match predicate {
        Predicate::Unanswered => "cardinality(q.answers) = 0",
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use devflow_core::filters::{
        hot_questions_spec, AnswerFilter, ListFilter, QuestionFilter, SavedQuestionFilter,
        TagFilter, UserFilter,
    };

    use super::*;

    #[test]
    fn question_filters_render_with_id_tiebreak() {
        assert_eq!(
            order_by(SortTarget::Questions, &QuestionFilter::Newest.spec().sort).unwrap(),
            "q.created_at DESC, q.id DESC"
        );
        assert_eq!(
            order_by(SortTarget::Questions, &QuestionFilter::Frequent.spec().sort).unwrap(),
            "q.views DESC, q.id DESC"
        );
    }

    #[test]
    fn hot_questions_sort_by_views_then_upvotes() {
        assert_eq!(
            order_by(SortTarget::Questions, &hot_questions_spec().sort).unwrap(),
            "q.views DESC, cardinality(q.upvotes) DESC, q.id DESC"
        );
    }

    #[test]
    fn every_filter_renders_on_its_own_table() {
        for f in SavedQuestionFilter::all() {
            assert!(order_by(SortTarget::Questions, &f.spec().sort).is_ok());
        }
        for f in UserFilter::all() {
            assert!(order_by(SortTarget::Users, &f.spec().sort).is_ok());
        }
        for f in TagFilter::all() {
            assert!(order_by(SortTarget::Tags, &f.spec().sort).is_ok());
        }
        for f in AnswerFilter::all() {
            assert!(order_by(SortTarget::Answers, &f.spec().sort).is_ok());
        }
    }

    #[test]
    fn popular_tags_sort_by_question_count_ascending() {
        assert_eq!(
            order_by(SortTarget::Tags, &TagFilter::Popular.spec().sort).unwrap(),
            "cardinality(t.questions) ASC, t.id ASC"
        );
    }

    #[test]
    fn key_from_another_scope_is_rejected() {
        let err = order_by(SortTarget::Tags, &UserFilter::TopContributors.spec().sort);
        assert_matches!(err, Err(CoreError::Internal(msg)) if msg.contains("tags"));
    }

    #[test]
    fn unanswered_predicate_checks_answer_list() {
        let spec = QuestionFilter::Unanswered.spec();
        let predicate = spec.predicate.unwrap();
        assert_eq!(question_predicate(predicate), "cardinality(q.answers) = 0");
    }
}
