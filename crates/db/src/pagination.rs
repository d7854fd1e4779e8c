//! Two-round-trip page executor.
//!
//! A [`ListQuery`] holds a `SELECT` head, a matching `COUNT(*)` head, the
//! shared `WHERE` conditions with their bound arguments, and an `ORDER BY`
//! body. [`paginate`] runs the windowed select and then the unwindowed count
//! against the same conditions, so `total_count` always reflects the whole
//! filter.

use devflow_core::pagination::{Page, PageRequest};
use devflow_core::types::DbId;
use sqlx::postgres::{PgArguments, PgRow};
use sqlx::query::{QueryAs, QueryScalar};
use sqlx::{FromRow, PgPool, Postgres};

/// Placeholder in a condition that is replaced by the argument's `$n`.
pub const PARAM: &str = "{p}";

/// A value bound to a listing condition.
#[derive(Debug, Clone, PartialEq)]
pub enum ListArg {
    Text(String),
    Id(DbId),
    Ids(Vec<DbId>),
}

#[derive(Debug, Clone)]
pub struct ListQuery {
    select: String,
    count: String,
    conditions: Vec<String>,
    order_by: String,
    args: Vec<ListArg>,
}

impl ListQuery {
    /// `select` and `count` are everything up to (not including) `WHERE`.
    pub fn new(select: impl Into<String>, count: impl Into<String>) -> Self {
        Self {
            select: select.into(),
            count: count.into(),
            conditions: Vec::new(),
            order_by: String::new(),
            args: Vec::new(),
        }
    }

    /// Add a condition with no bound argument.
    pub fn and(mut self, condition: impl Into<String>) -> Self {
        self.conditions.push(condition.into());
        self
    }

    /// Add a condition binding `arg`. Every `{p}` in `condition` refers to it.
    pub fn and_bind(mut self, condition: &str, arg: ListArg) -> Self {
        self.args.push(arg);
        let placeholder = format!("${}", self.args.len());
        self.conditions.push(condition.replace(PARAM, &placeholder));
        self
    }

    /// Add a condition binding `arg` only when one is given.
    pub fn and_bind_opt(self, condition: &str, arg: Option<ListArg>) -> Self {
        match arg {
            Some(arg) => self.and_bind(condition, arg),
            None => self,
        }
    }

    pub fn order_by(mut self, order_by: impl Into<String>) -> Self {
        self.order_by = order_by.into();
        self
    }

    fn where_clause(&self) -> String {
        if self.conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", self.conditions.join(" AND "))
        }
    }

    fn order_clause(&self) -> String {
        if self.order_by.is_empty() {
            String::new()
        } else {
            format!(" ORDER BY {}", self.order_by)
        }
    }

    /// The windowed select. `LIMIT` and `OFFSET` follow the condition args.
    pub fn page_sql(&self) -> String {
        let limit = self.args.len() + 1;
        let offset = self.args.len() + 2;
        format!(
            "{}{}{} LIMIT ${limit} OFFSET ${offset}",
            self.select,
            self.where_clause(),
            self.order_clause()
        )
    }

    /// The select capped by `LIMIT` only.
    pub fn limited_sql(&self) -> String {
        format!(
            "{}{}{} LIMIT ${}",
            self.select,
            self.where_clause(),
            self.order_clause(),
            self.args.len() + 1
        )
    }

    /// The count over the same conditions.
    pub fn count_sql(&self) -> String {
        format!("{}{}", self.count, self.where_clause())
    }

    pub fn args(&self) -> &[ListArg] {
        &self.args
    }
}

fn bind_rows<'q, T>(
    mut query: QueryAs<'q, Postgres, T, PgArguments>,
    args: &[ListArg],
) -> QueryAs<'q, Postgres, T, PgArguments> {
    for arg in args {
        query = match arg {
            ListArg::Text(v) => query.bind(v.clone()),
            ListArg::Id(v) => query.bind(*v),
            ListArg::Ids(v) => query.bind(v.clone()),
        };
    }
    query
}

fn bind_scalar<'q>(
    mut query: QueryScalar<'q, Postgres, i64, PgArguments>,
    args: &[ListArg],
) -> QueryScalar<'q, Postgres, i64, PgArguments> {
    for arg in args {
        query = match arg {
            ListArg::Text(v) => query.bind(v.clone()),
            ListArg::Id(v) => query.bind(*v),
            ListArg::Ids(v) => query.bind(v.clone()),
        };
    }
    query
}

/// Fetch one page of `list` and the total row count for its conditions.
pub async fn paginate<T>(
    pool: &PgPool,
    list: &ListQuery,
    request: &PageRequest,
) -> Result<Page<T>, sqlx::Error>
where
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    let page_sql = list.page_sql();
    let rows = bind_rows(sqlx::query_as::<_, T>(&page_sql), list.args())
        .bind(request.limit())
        .bind(request.offset())
        .fetch_all(pool)
        .await?;

    let count_sql = list.count_sql();
    let total = bind_scalar(sqlx::query_scalar::<_, i64>(&count_sql), list.args())
        .fetch_one(pool)
        .await?;

    Ok(Page::from_parts(rows, total, request))
}

/// Fetch at most `limit` rows of `list`, without counting.
pub async fn fetch_limited<T>(
    pool: &PgPool,
    list: &ListQuery,
    limit: i64,
) -> Result<Vec<T>, sqlx::Error>
where
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    let sql = list.limited_sql();
    bind_rows(sqlx::query_as::<_, T>(&sql), list.args())
        .bind(limit)
        .fetch_all(pool)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn questions() -> ListQuery {
        ListQuery::new(
            "SELECT q.id FROM questions q",
            "SELECT COUNT(*) FROM questions q",
        )
    }

    #[test]
    fn no_conditions_renders_bare_heads() {
        let list = questions().order_by("q.id DESC");
        assert_eq!(
            list.page_sql(),
            "SELECT q.id FROM questions q ORDER BY q.id DESC LIMIT $1 OFFSET $2"
        );
        assert_eq!(list.count_sql(), "SELECT COUNT(*) FROM questions q");
    }

    #[test]
    fn conditions_are_numbered_in_bind_order() {
        let list = questions()
            .and_bind("q.author_id = {p}", ListArg::Id(3))
            .and("cardinality(q.answers) = 0")
            .and_bind("(q.title ILIKE {p} OR q.content ILIKE {p})", ListArg::Text("%x%".into()))
            .order_by("q.created_at DESC, q.id DESC");

        assert_eq!(
            list.page_sql(),
            "SELECT q.id FROM questions q \
             WHERE q.author_id = $1 AND cardinality(q.answers) = 0 \
             AND (q.title ILIKE $2 OR q.content ILIKE $2) \
             ORDER BY q.created_at DESC, q.id DESC LIMIT $3 OFFSET $4"
        );
        assert_eq!(list.args().len(), 2);
    }

    #[test]
    fn count_shares_conditions_but_not_window() {
        let list = questions()
            .and_bind("q.id = ANY({p})", ListArg::Ids(vec![1, 2]))
            .order_by("q.id");
        assert_eq!(
            list.count_sql(),
            "SELECT COUNT(*) FROM questions q WHERE q.id = ANY($1)"
        );
        assert!(!list.count_sql().contains("LIMIT"));
        assert!(!list.count_sql().contains("ORDER BY"));
    }

    #[test]
    fn absent_optional_condition_is_skipped() {
        let list = questions().and_bind_opt("q.title ILIKE {p}", None);
        assert_eq!(list.count_sql(), "SELECT COUNT(*) FROM questions q");
        assert!(list.args().is_empty());
    }

    #[test]
    fn limited_sql_has_no_offset() {
        let list = questions()
            .and_bind("q.author_id = {p}", ListArg::Id(1))
            .order_by("q.views DESC");
        assert_eq!(
            list.limited_sql(),
            "SELECT q.id FROM questions q WHERE q.author_id = $1 ORDER BY q.views DESC LIMIT $2"
        );
    }
}
