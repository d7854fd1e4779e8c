//! Listing filter vocabulary and the sort/selection each filter implies.
//!
//! Every listing accepts an optional `filter` keyword. Keywords are parsed
//! into closed enums per scope; each variant maps to a [`ListSpec`], an
//! ordered [`SortSpec`] plus an optional [`Predicate`]. The `db` crate renders
//! a `ListSpec` to SQL, so adding a filter never touches query text.

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Sort specification
// ---------------------------------------------------------------------------

/// A sortable attribute, independent of table or column naming.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    CreatedAt,
    Views,
    UpvoteCount,
    AnswerCount,
    JoinedAt,
    Reputation,
    QuestionCount,
    Name,
    /// Row id; used as the final tie-breaker for stable pages.
    Id,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortField {
    pub key: SortKey,
    pub direction: SortDirection,
}

/// An ordered list of sort fields, always ending with [`SortKey::Id`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    fields: Vec<SortField>,
}

impl SortSpec {
    /// Start a spec with its primary sort field.
    pub fn by(key: SortKey, direction: SortDirection) -> Self {
        Self {
            fields: vec![SortField { key, direction }],
        }
    }

    /// Add a secondary sort field.
    pub fn then(mut self, key: SortKey, direction: SortDirection) -> Self {
        self.fields.push(SortField { key, direction });
        self
    }

    /// The fields in order, with the id tie-breaker appended in the primary
    /// field's direction.
    pub fn fields(&self) -> Vec<SortField> {
        let mut fields = self.fields.clone();
        if fields.last().map(|f| f.key) != Some(SortKey::Id) {
            let direction = fields
                .first()
                .map(|f| f.direction)
                .unwrap_or(SortDirection::Asc);
            fields.push(SortField {
                key: SortKey::Id,
                direction,
            });
        }
        fields
    }
}

/// Extra row selection a filter imposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Predicate {
    /// Questions whose answer list is empty.
    Unanswered,
}

/// The translated form of a filter keyword.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListSpec {
    pub sort: SortSpec,
    pub predicate: Option<Predicate>,
}

impl ListSpec {
    pub fn sorted(sort: SortSpec) -> Self {
        Self {
            sort,
            predicate: None,
        }
    }

    pub fn has_predicate(&self, predicate: Predicate) -> bool {
        self.predicate == Some(predicate)
    }
}

// ---------------------------------------------------------------------------
// Filter vocabularies
// ---------------------------------------------------------------------------

/// A closed set of filter keywords for one listing scope.
pub trait ListFilter: Sized + Copy + 'static {
    /// Scope name used in error messages.
    const SCOPE: &'static str;

    /// Filter applied when the caller gives none.
    const DEFAULT: Self;

    /// Every variant, in documentation order.
    fn all() -> &'static [Self];

    /// The snake_case keyword callers send.
    fn keyword(self) -> &'static str;

    /// The sort and selection this filter implies.
    fn spec(self) -> ListSpec;

    /// Parse an optional keyword. Blank input selects [`Self::DEFAULT`];
    /// an unknown keyword is a validation error.
    fn parse(raw: Option<&str>) -> Result<Self, CoreError> {
        let keyword = match raw.map(str::trim) {
            None | Some("") => return Ok(Self::DEFAULT),
            Some(k) => k,
        };

        Self::all()
            .iter()
            .copied()
            .find(|f| f.keyword() == keyword)
            .ok_or_else(|| {
                let valid: Vec<&str> = Self::all().iter().map(|f| f.keyword()).collect();
                CoreError::Validation(format!(
                    "Unknown {} filter: '{keyword}'. Valid filters: {}",
                    Self::SCOPE,
                    valid.join(", ")
                ))
            })
    }
}

use SortDirection::{Asc, Desc};

/// Filters for the main question listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionFilter {
    Newest,
    Frequent,
    Unanswered,
}

impl ListFilter for QuestionFilter {
    const SCOPE: &'static str = "question";
    const DEFAULT: Self = Self::Newest;

    fn all() -> &'static [Self] {
        &[Self::Newest, Self::Frequent, Self::Unanswered]
    }

    fn keyword(self) -> &'static str {
        match self {
            Self::Newest => "newest",
            Self::Frequent => "frequent",
            Self::Unanswered => "unanswered",
        }
    }

    fn spec(self) -> ListSpec {
        match self {
            Self::Newest => ListSpec::sorted(SortSpec::by(SortKey::CreatedAt, Desc)),
            Self::Frequent => ListSpec::sorted(SortSpec::by(SortKey::Views, Desc)),
            Self::Unanswered => ListSpec {
                sort: SortSpec::by(SortKey::CreatedAt, Desc),
                predicate: Some(Predicate::Unanswered),
            },
        }
    }
}

/// Filters for a user's saved questions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SavedQuestionFilter {
    MostRecent,
    Oldest,
    MostVoted,
    MostViewed,
    MostAnswered,
}

impl ListFilter for SavedQuestionFilter {
    const SCOPE: &'static str = "saved question";
    const DEFAULT: Self = Self::MostRecent;

    fn all() -> &'static [Self] {
        &[
            Self::MostRecent,
            Self::Oldest,
            Self::MostVoted,
            Self::MostViewed,
            Self::MostAnswered,
        ]
    }

    fn keyword(self) -> &'static str {
        match self {
            Self::MostRecent => "most_recent",
            Self::Oldest => "oldest",
            Self::MostVoted => "most_voted",
            Self::MostViewed => "most_viewed",
            Self::MostAnswered => "most_answered",
        }
    }

    fn spec(self) -> ListSpec {
        let sort = match self {
            Self::MostRecent => SortSpec::by(SortKey::CreatedAt, Desc),
            Self::Oldest => SortSpec::by(SortKey::CreatedAt, Asc),
            Self::MostVoted => SortSpec::by(SortKey::UpvoteCount, Desc),
            Self::MostViewed => SortSpec::by(SortKey::Views, Desc),
            Self::MostAnswered => SortSpec::by(SortKey::AnswerCount, Desc),
        };
        ListSpec::sorted(sort)
    }
}

/// Filters for the community (users) listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserFilter {
    NewUsers,
    OldUsers,
    TopContributors,
}

impl ListFilter for UserFilter {
    const SCOPE: &'static str = "user";
    const DEFAULT: Self = Self::NewUsers;

    fn all() -> &'static [Self] {
        &[Self::NewUsers, Self::OldUsers, Self::TopContributors]
    }

    fn keyword(self) -> &'static str {
        match self {
            Self::NewUsers => "new_users",
            Self::OldUsers => "old_users",
            Self::TopContributors => "top_contributors",
        }
    }

    fn spec(self) -> ListSpec {
        let sort = match self {
            Self::NewUsers => SortSpec::by(SortKey::JoinedAt, Desc),
            Self::OldUsers => SortSpec::by(SortKey::JoinedAt, Asc),
            Self::TopContributors => SortSpec::by(SortKey::Reputation, Desc),
        };
        ListSpec::sorted(sort)
    }
}

/// Filters for the tag listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagFilter {
    Popular,
    Recent,
    Name,
    Old,
}

impl ListFilter for TagFilter {
    const SCOPE: &'static str = "tag";
    const DEFAULT: Self = Self::Popular;

    fn all() -> &'static [Self] {
        &[Self::Popular, Self::Recent, Self::Name, Self::Old]
    }

    fn keyword(self) -> &'static str {
        match self {
            Self::Popular => "popular",
            Self::Recent => "recent",
            Self::Name => "name",
            Self::Old => "old",
        }
    }

    fn spec(self) -> ListSpec {
        let sort = match self {
            // Ascending by question count.
            Self::Popular => SortSpec::by(SortKey::QuestionCount, Asc),
            Self::Recent => SortSpec::by(SortKey::CreatedAt, Desc),
            Self::Name => SortSpec::by(SortKey::Name, Asc),
            Self::Old => SortSpec::by(SortKey::CreatedAt, Asc),
        };
        ListSpec::sorted(sort)
    }
}

/// Filters for the answers under a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerFilter {
    HighestUpvotes,
    LowestUpvotes,
    Recent,
    Old,
}

impl ListFilter for AnswerFilter {
    const SCOPE: &'static str = "answer";
    const DEFAULT: Self = Self::Recent;

    fn all() -> &'static [Self] {
        &[
            Self::HighestUpvotes,
            Self::LowestUpvotes,
            Self::Recent,
            Self::Old,
        ]
    }

    fn keyword(self) -> &'static str {
        match self {
            Self::HighestUpvotes => "highest_upvotes",
            Self::LowestUpvotes => "lowest_upvotes",
            Self::Recent => "recent",
            Self::Old => "old",
        }
    }

    fn spec(self) -> ListSpec {
        let sort = match self {
            Self::HighestUpvotes => SortSpec::by(SortKey::UpvoteCount, Desc),
            Self::LowestUpvotes => SortSpec::by(SortKey::UpvoteCount, Asc),
            Self::Recent => SortSpec::by(SortKey::CreatedAt, Desc),
            Self::Old => SortSpec::by(SortKey::CreatedAt, Asc),
        };
        ListSpec::sorted(sort)
    }
}

// ---------------------------------------------------------------------------
// Fixed orderings
// ---------------------------------------------------------------------------

/// A user's own questions on their profile: most viewed, then most upvoted.
pub fn user_questions_spec() -> ListSpec {
    ListSpec::sorted(SortSpec::by(SortKey::Views, Desc).then(SortKey::UpvoteCount, Desc))
}

/// A user's own answers on their profile: most upvoted first.
pub fn user_answers_spec() -> ListSpec {
    ListSpec::sorted(SortSpec::by(SortKey::UpvoteCount, Desc))
}

/// The "hot questions" sidebar: most viewed, then most upvoted.
pub fn hot_questions_spec() -> ListSpec {
    user_questions_spec()
}

/// Questions under a tag: newest first.
pub fn tag_questions_spec() -> ListSpec {
    ListSpec::sorted(SortSpec::by(SortKey::CreatedAt, Desc))
}

/// Default number of rows in the "hot questions" sidebar.
pub const DEFAULT_HOT_QUESTIONS: i64 = 5;
