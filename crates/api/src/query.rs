//! Shared query parameter types for API handlers.
//!
//! Raw strings and numbers arrive here; handlers turn them into the core
//! types (`PageRequest`, filter enums) once, before calling a repository.

use devflow_core::error::CoreError;
use devflow_core::filters::ListFilter;
use devflow_core::pagination::PageRequest;
use serde::Deserialize;

/// Listing parameters (`?filter=&q=&page=&page_size=`).
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub filter: Option<String>,
    pub q: Option<String>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

impl ListParams {
    pub fn page_request(&self) -> Result<PageRequest, CoreError> {
        PageRequest::new(self.page, self.page_size)
    }

    /// Parse `filter` against the vocabulary of `F`.
    pub fn filter<F: ListFilter>(&self) -> Result<F, CoreError> {
        F::parse(self.filter.as_deref())
    }

    pub fn search(&self) -> Option<&str> {
        self.q.as_deref()
    }
}

/// Pagination only (`?page=&page_size=`).
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

impl PageParams {
    pub fn page_request(&self) -> Result<PageRequest, CoreError> {
        PageRequest::new(self.page, self.page_size)
    }
}

/// Fixed-size listings (`?limit=`). Repositories apply the default and clamp.
#[derive(Debug, Default, Deserialize)]
pub struct LimitParams {
    pub limit: Option<i64>,
}

/// Revalidation hint on requests without a body (`?path=`).
#[derive(Debug, Default, Deserialize)]
pub struct PathParams {
    pub path: Option<String>,
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use devflow_core::filters::QuestionFilter;

    use super::*;

    #[test]
    fn empty_params_use_defaults() {
        let params = ListParams::default();
        let page = params.page_request().unwrap();
        assert_eq!((page.page(), page.page_size()), (1, 10));
        assert_eq!(
            params.filter::<QuestionFilter>().unwrap(),
            QuestionFilter::Newest
        );
        assert_eq!(params.search(), None);
    }

    #[test]
    fn unknown_filter_is_a_validation_error() {
        let params = ListParams {
            filter: Some("loudest".into()),
            ..ListParams::default()
        };
        assert_matches!(
            params.filter::<QuestionFilter>(),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn page_zero_is_rejected() {
        let params = PageParams {
            page: Some(0),
            page_size: None,
        };
        assert_matches!(params.page_request(), Err(CoreError::Validation(_)));
    }
}
