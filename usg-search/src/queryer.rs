//! Trait definition for pluggable search backends.
//!
//! Each backend (OMDb, post index) implements [`Queryer`] with its own
//! filter and item types. [`QueryBinding`](crate::binding::QueryBinding)
//! erases both so differently-typed backends can run side by side.

use serde::Serialize;

use crate::error::BackendError;
use crate::filter::SearchFilters;
use crate::options::SearchOptions;
use crate::types::Backend;

/// A pluggable search backend.
///
/// Implementors own whatever client they need (usually behind an `Arc`) and
/// translate [`SearchOptions`] into a backend call. Implementations must be
/// `Send + Sync` because each query runs on its own task.
pub trait Queryer: Send + Sync + 'static {
    /// Filter type this backend understands.
    type Filters: SearchFilters;

    /// Result item type this backend returns.
    type Item: Serialize + Send + 'static;

    /// Run one query.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError`] if the backend could not be reached, answered
    /// with an error status, or returned an undecodable body.
    fn query(
        &self,
        options: &SearchOptions<Self::Filters>,
    ) -> impl std::future::Future<Output = Result<Vec<Self::Item>, BackendError>> + Send;

    /// Which [`Backend`] this implementation represents.
    fn backend(&self) -> Backend;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::NoFilters;

    /// A mock backend for testing trait bounds and async execution.
    struct MockQueryer {
        backend: Backend,
        items: Vec<String>,
    }

    impl Queryer for MockQueryer {
        type Filters = NoFilters;
        type Item = String;

        async fn query(
            &self,
            _options: &SearchOptions<NoFilters>,
        ) -> Result<Vec<String>, BackendError> {
            if self.items.is_empty() {
                return Err(BackendError::Http("mock backend failure".into()));
            }
            Ok(self.items.clone())
        }

        fn backend(&self) -> Backend {
            self.backend
        }
    }

    fn options() -> SearchOptions<NoFilters> {
        SearchOptions::new("test", 0, 10, NoFilters).expect("valid options")
    }

    #[test]
    fn mock_queryer_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<MockQueryer>();
    }

    #[tokio::test]
    async fn mock_queryer_returns_items() {
        let queryer = MockQueryer {
            backend: Backend::Post,
            items: vec!["a".into(), "b".into()],
        };
        let items = queryer.query(&options()).await.expect("should succeed");
        assert_eq!(items, vec!["a".to_string(), "b".to_string()]);
    }

    #[tokio::test]
    async fn mock_queryer_propagates_errors() {
        let queryer = MockQueryer {
            backend: Backend::Omdb,
            items: vec![],
        };
        let err = queryer.query(&options()).await.unwrap_err();
        assert!(err.to_string().contains("mock backend failure"));
        assert_eq!(queryer.backend(), Backend::Omdb);
    }
}
