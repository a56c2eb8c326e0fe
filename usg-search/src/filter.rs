//! Backend-specific search constraints.
//!
//! Every backend defines its own filter type. The only capability they
//! share is self-validation, which [`SearchOptions`](crate::SearchOptions)
//! runs once at construction time.

use crate::error::ValidationError;

/// A backend's search constraints.
///
/// `validate` must be pure, deterministic and total: no I/O, no blocking,
/// the same answer for the same value.
pub trait SearchFilters: Send + Sync + 'static {
    /// Check the filter against the backend's rules.
    ///
    /// # Errors
    ///
    /// Returns the [`ValidationError`] describing the first violated rule.
    fn validate(&self) -> Result<(), ValidationError>;
}

/// Filter for backends that accept unconstrained queries. Always valid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoFilters;

impl SearchFilters for NoFilters {
    fn validate(&self) -> Result<(), ValidationError> {
        Ok(())
    }
}
