//! Backend-agnostic search options: query text, pagination and one filter.

use crate::error::ValidationError;
use crate::filter::SearchFilters;

/// Page size used when the caller asks for zero or fewer items.
pub const DEFAULT_PER_PAGE: i64 = 10;

/// Validated options for one backend query.
///
/// Built only through [`SearchOptions::new`], which normalizes pagination
/// and validates the filter. Immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOptions<F> {
    query: String,
    page: i64,
    per_page: i64,
    filters: F,
}

impl<F: SearchFilters> SearchOptions<F> {
    /// Build options for one backend.
    ///
    /// A negative `page` becomes `0` and a `per_page` of zero or less becomes
    /// [`DEFAULT_PER_PAGE`]. Normalization runs before validation, so
    /// out-of-range pagination never fails on its own.
    ///
    /// # Errors
    ///
    /// Returns the filter's own [`ValidationError`], unchanged, if
    /// `filters.validate()` fails.
    pub fn new(
        query: impl Into<String>,
        page: i64,
        per_page: i64,
        filters: F,
    ) -> Result<Self, ValidationError> {
        let page = page.max(0);
        let per_page = if per_page <= 0 {
            DEFAULT_PER_PAGE
        } else {
            per_page
        };

        let options = Self {
            query: query.into(),
            page,
            per_page,
            filters,
        };
        options.validate()?;
        Ok(options)
    }

    /// Validate the filter, then the pagination bounds.
    ///
    /// # Errors
    ///
    /// Returns the first violated rule.
    pub fn validate(&self) -> Result<(), ValidationError> {
        tracing::trace!(page = self.page, per_page = self.per_page, "validating search options");
        self.filters.validate()?;
        if self.page < 0 {
            return Err(ValidationError::Page(self.page));
        }
        if self.per_page <= 0 {
            return Err(ValidationError::PerPage(self.per_page));
        }
        Ok(())
    }
}

impl<F> SearchOptions<F> {
    /// Free-text query.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Zero-based page index.
    pub fn page(&self) -> i64 {
        self.page
    }

    /// Items per page.
    pub fn per_page(&self) -> i64 {
        self.per_page
    }

    /// Backend-specific filter.
    pub fn filters(&self) -> &F {
        &self.filters
    }
}
