//! Error types for the usg-search crate.
//!
//! Three layers of failure exist and each has its own type:
//!
//! - [`ValidationError`]: malformed filter or pagination input, reported to
//!   the caller verbatim.
//! - [`BackendError`]: one backend's query failed. It never escapes a
//!   binding; it is folded into the [`SearchItem`](crate::types::SearchItem)
//!   for that backend.
//! - [`SearchError`]: request-level failures (every backend failed, invalid
//!   configuration).
//!
//! No API keys or request URLs appear in error messages.

/// Content types accepted by the metadata backend's `type` filter.
pub const OMDB_CONTENT_TYPES: [&str; 3] = ["movie", "series", "episode"];

/// Markers accepted by the post backend's `has` filter.
pub const POST_HAS_MARKERS: [&str; 4] = ["video", "image", "link", "note"];

/// Invalid search input, detected before any backend is queried.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// The metadata content type is not one of [`OMDB_CONTENT_TYPES`].
    #[error("filter type must be one of: movie, series, episode (got {0:?})")]
    ContentType(String),

    /// The release year is not a four-digit number.
    #[error("filter year must be a four-digit number (got {0:?})")]
    ReleaseYear(String),

    /// The post filter has no author.
    #[error("author cannot be empty")]
    MissingAuthor,

    /// A `has` marker is not one of [`POST_HAS_MARKERS`].
    #[error("filter has must be one of: video, image, link, note (got {0:?})")]
    HasMarker(String),

    /// Page index is negative.
    #[error("page must be greater than or equal to 0 (got {0})")]
    Page(i64),

    /// Page size is zero or negative.
    #[error("perPage must be greater than 0 (got {0})")]
    PerPage(i64),

    /// Any other rule a filter wants to enforce.
    #[error("{0}")]
    Invalid(String),
}

/// A single backend's query failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BackendError {
    /// The request could not be sent or the response could not be read.
    #[error("HTTP error: {0}")]
    Http(String),

    /// The backend answered with a 4xx or 5xx status.
    #[error("HTTP status {status}: {reason}")]
    Status {
        /// Numeric status code.
        status: u16,
        /// Canonical reason phrase.
        reason: String,
    },

    /// The backend answered 2xx but the body did not decode.
    #[error("decode error: {0}")]
    Decode(String),

    /// The query did not complete in time.
    #[error("timed out after {0}s")]
    Timeout(u64),

    /// A result item could not be encoded for the response.
    #[error("encode error: {0}")]
    Encode(String),

    /// The worker running the query panicked.
    #[error("backend query panicked")]
    Panicked,
}

/// Request-level search failures.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// Every submitted binding failed.
    #[error("all search backends failed: {0}")]
    AllBackendsFailed(String),

    /// Invalid backend or aggregator configuration.
    #[error("config error: {0}")]
    Config(String),

    /// Invalid search input.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Convenience type alias for usg-search results.
pub type Result<T> = std::result::Result<T, SearchError>;
