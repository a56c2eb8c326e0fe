//! Type-erased pairing of one backend with its validated options.

use futures::future::BoxFuture;
use futures::FutureExt;
use std::fmt;
use std::future::Future;

use crate::error::BackendError;
use crate::options::SearchOptions;
use crate::queryer::Queryer;
use crate::types::{Backend, SearchItem};

type Job = Box<dyn FnOnce() -> BoxFuture<'static, SearchItem> + Send>;

/// A ready-to-run backend query.
///
/// The backend tag is captured at construction, so a failed query can still
/// be attributed even though it produced no payload. Running the binding
/// consumes it.
pub struct QueryBinding {
    backend: Backend,
    job: Job,
}

impl QueryBinding {
    /// Bind `queryer` to `options`.
    pub fn new<Q: Queryer>(queryer: Q, options: SearchOptions<Q::Filters>) -> Self {
        let backend = queryer.backend();
        let job: Job = Box::new(move || {
            async move {
                tracing::trace!(%backend, query = options.query(), "querying backend");
                let outcome = queryer.query(&options).await;
                into_item(backend, outcome)
            }
            .boxed()
        });
        Self { backend, job }
    }

    /// Bind an arbitrary future-producing closure under `backend`.
    pub fn from_fn<Fut, T>(backend: Backend, f: impl FnOnce() -> Fut + Send + 'static) -> Self
    where
        Fut: Future<Output = Result<Vec<T>, BackendError>> + Send + 'static,
        T: serde::Serialize + Send + 'static,
    {
        let job: Job = Box::new(move || async move { into_item(backend, f().await) }.boxed());
        Self { backend, job }
    }

    /// The backend this binding queries.
    pub fn backend(&self) -> Backend {
        self.backend
    }

    /// Run the query and wrap its outcome as a [`SearchItem`].
    pub async fn execute(self) -> SearchItem {
        (self.job)().await
    }
}

impl fmt::Debug for QueryBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryBinding")
            .field("backend", &self.backend)
            .finish_non_exhaustive()
    }
}

fn into_item<T: serde::Serialize>(
    backend: Backend,
    outcome: Result<Vec<T>, BackendError>,
) -> SearchItem {
    let items = match outcome {
        Ok(items) => items,
        Err(err) => {
            tracing::warn!(%backend, error = %err, "backend query failed");
            return SearchItem::failure(backend, &err);
        }
    };

    let encoded: Result<Vec<_>, _> = items.iter().map(serde_json::to_value).collect();
    match encoded {
        Ok(data) => {
            tracing::debug!(%backend, count = data.len(), "backend returned results");
            SearchItem::success(backend, data)
        }
        Err(err) => {
            let err = BackendError::Encode(err.to_string());
            tracing::warn!(%backend, error = %err, "backend results could not be encoded");
            SearchItem::failure(backend, &err)
        }
    }
}
