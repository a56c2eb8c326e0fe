//! # usg-search
//!
//! Concurrent multi-backend search aggregation for the unified search
//! gateway.
//!
//! ## Design
//!
//! - Each backend has its own filter type implementing [`SearchFilters`]
//! - [`SearchOptions`] normalises pagination and validates the filter once
//! - [`QueryBinding`] erases the backend's filter and item types so bindings
//!   for different backends fit in one `Vec`
//! - The [`Aggregator`] runs every binding on its own task and merges the
//!   completions as they arrive
//! - Graceful degradation: if some backends fail, the others still return
//!   results, and the failures appear as error items
//!
//! ## Security
//!
//! - No network listeners: this is a library, not a server
//! - Search queries are logged only at trace level
//! - Backend errors never carry the OMDb API key or request URL

pub mod backends;
pub mod binding;
pub mod config;
pub mod error;
pub mod filter;
pub mod http;
pub mod options;
pub mod orchestrator;
pub mod queryer;
pub mod types;

pub use binding::QueryBinding;
pub use config::{AggregatorConfig, OmdbConfig};
pub use error::{BackendError, Result, SearchError, ValidationError};
pub use filter::{NoFilters, SearchFilters};
pub use options::{SearchOptions, DEFAULT_PER_PAGE};
pub use orchestrator::{handle_search, Aggregator};
pub use queryer::Queryer;
pub use types::{Backend, SearchItem};

/// Search the OMDb and post backends concurrently.
///
/// Builds one binding per backend and runs them through `aggregator`.
///
/// # Errors
///
/// Returns [`SearchError::AllBackendsFailed`] if both backends fail.
///
/// # Examples
///
/// ```no_run
/// # async fn example() -> usg_search::Result<()> {
/// use std::sync::Arc;
/// use usg_search::backends::{OmdbClient, OmdbFilters, OmdbQueryer, PostFilters, PostQueryer};
/// use usg_search::{Aggregator, OmdbConfig, SearchOptions};
///
/// let config = OmdbConfig { api_key: "key".into(), ..Default::default() };
/// let omdb = OmdbQueryer::new(Arc::new(OmdbClient::new(&config)?));
/// let movies = SearchOptions::new("alien", 0, 10, OmdbFilters::default())?;
/// let posts = SearchOptions::new(
///     "alien",
///     0,
///     10,
///     PostFilters { author: "ada".into(), ..Default::default() },
/// )?;
///
/// let items = usg_search::unified_search(&Aggregator::default(), omdb, movies, posts).await?;
/// for item in &items {
///     println!("{}: {} results", item.backend, item.data.len());
/// }
/// # Ok(())
/// # }
/// ```
pub async fn unified_search(
    aggregator: &Aggregator,
    omdb: backends::OmdbQueryer,
    omdb_options: SearchOptions<backends::OmdbFilters>,
    post_options: SearchOptions<backends::PostFilters>,
) -> Result<Vec<SearchItem>> {
    aggregator
        .handle_search(vec![
            QueryBinding::new(omdb, omdb_options),
            QueryBinding::new(backends::PostQueryer, post_options),
        ])
        .await
}
