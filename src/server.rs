//! HTTP front end for the unified search gateway.
//!
//! ## Endpoints
//!
//! - `GET /api/search` — OMDb and post index, queried concurrently
//! - `GET /api/search/omdb` — OMDb only
//! - `GET /api/search/post` — post index only
//! - `GET /health` — liveness check
//!
//! Every search endpoint answers with a JSON array of per-backend items.
//! Invalid input is a 400 carrying the validation message; a request where
//! every backend failed is a 500 with a generic body.

use axum::Router;
use axum::extract::{Query, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Json, Response};
use axum::routing::get;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tracing::info;
use usg_search::backends::{OmdbClient, OmdbFilters, OmdbQueryer, PostFilters, PostQueryer};
use usg_search::{Aggregator, QueryBinding, SearchError, SearchItem, SearchOptions, ValidationError};

use crate::config::{GatewayConfig, ServerConfig};
use crate::error::{GatewayError, Result};

/// Body sent with every 500 response. Backend details stay in the logs.
pub const INTERNAL_ERROR_MESSAGE: &str = "Something went wrong.";

// ---------------------------------------------------------------------------
// Request parameters
// ---------------------------------------------------------------------------

/// Query-string parameters accepted by the search endpoints.
///
/// All fields are optional strings so that malformed numbers surface as our
/// own 400 message instead of an extractor rejection.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchParams {
    /// Free-text query.
    pub q: Option<String>,
    /// Zero-based page index.
    pub page: Option<String>,
    /// Items per page.
    #[serde(rename = "perPage")]
    pub per_page: Option<String>,
    /// OMDb content type.
    #[serde(rename = "type")]
    pub content_type: Option<String>,
    /// OMDb release year.
    pub year: Option<String>,
    /// Post author.
    pub author: Option<String>,
    /// Comma-separated post topics.
    pub topic: Option<String>,
    /// Post label.
    pub label: Option<String>,
    /// Comma-separated embedded-content markers.
    pub has: Option<String>,
    /// Post publication date.
    #[serde(rename = "publishedAt")]
    pub published_at: Option<String>,
}

impl SearchParams {
    fn query(&self) -> &str {
        self.q.as_deref().unwrap_or_default()
    }

    /// Parse `page` and `perPage`. Absent or empty values mean `0`.
    fn pagination(&self) -> std::result::Result<(i64, i64), ApiError> {
        Ok((
            parse_int("page", self.page.as_deref())?,
            parse_int("perPage", self.per_page.as_deref())?,
        ))
    }

    fn omdb_filters(&self) -> OmdbFilters {
        OmdbFilters {
            content_type: self.content_type.clone().unwrap_or_default(),
            year: self.year.clone().unwrap_or_default(),
        }
    }

    // `type` belongs to OMDb; the post index has no content-type parameter.
    fn post_filters(&self) -> PostFilters {
        PostFilters {
            author: self.author.clone().unwrap_or_default(),
            topics: csv(self.topic.as_deref()),
            published_at: self.published_at.clone().unwrap_or_default(),
            label: self.label.clone().unwrap_or_default(),
            has: csv(self.has.as_deref()),
            content_type: String::new(),
        }
    }
}

fn parse_int(name: &str, value: Option<&str>) -> std::result::Result<i64, ApiError> {
    match value.map(str::trim) {
        None | Some("") => Ok(0),
        Some(raw) => raw
            .parse()
            .map_err(|e| ApiError::BadRequest(format!("invalid {name} {raw:?}: {e}"))),
    }
}

fn csv(value: Option<&str>) -> Vec<String> {
    value
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .collect()
}

// ---------------------------------------------------------------------------
// Error response
// ---------------------------------------------------------------------------

/// JSON error body: `{ "error": "<message>" }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
}

/// A request-level failure, mapped onto a status code.
#[derive(Debug)]
enum ApiError {
    /// Malformed or invalid input; the message is shown to the client.
    BadRequest(String),
    /// Anything else; the client only sees [`INTERNAL_ERROR_MESSAGE`].
    Internal,
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self::BadRequest(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            Self::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            Self::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                INTERNAL_ERROR_MESSAGE.to_owned(),
            ),
        };
        (status, Json(ErrorResponse { error })).into_response()
    }
}

// ---------------------------------------------------------------------------
// Shared application state
// ---------------------------------------------------------------------------

/// Shared state for axum handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// OMDb client shared by every request's binding.
    omdb: Arc<OmdbClient>,
    /// Aggregator applying the configured per-binding deadline.
    aggregator: Aggregator,
}

impl AppState {
    /// Assemble state from already-built parts.
    pub fn new(omdb: Arc<OmdbClient>, aggregator: Aggregator) -> Self {
        Self { omdb, aggregator }
    }

    /// Build the OMDb client and aggregator from `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the OMDb or aggregator configuration is invalid.
    pub fn from_config(config: &GatewayConfig) -> Result<Self> {
        config.aggregator.validate()?;
        let omdb = OmdbClient::new(&config.omdb)?;
        Ok(Self::new(
            Arc::new(omdb),
            Aggregator::new(config.aggregator.clone()),
        ))
    }

    fn omdb_binding(&self, options: SearchOptions<OmdbFilters>) -> QueryBinding {
        QueryBinding::new(OmdbQueryer::new(Arc::clone(&self.omdb)), options)
    }
}

/// Build the gateway router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/search", get(handle_unified_search))
        .route("/api/search/omdb", get(handle_omdb_search))
        .route("/api/search/post", get(handle_post_search))
        .route("/health", get(handle_health))
        .with_state(state)
}

// ---------------------------------------------------------------------------
// GatewayServer
// ---------------------------------------------------------------------------

/// The gateway's HTTP server, running on a background task.
pub struct GatewayServer {
    /// The address the server is listening on.
    addr: SocketAddr,
    /// Handle to the background server task.
    handle: JoinHandle<()>,
}

impl GatewayServer {
    /// Start the gateway.
    ///
    /// Binds to `{config.host}:{config.port}` (use port `0` for auto-assign)
    /// and begins serving in a background tokio task.
    ///
    /// # Errors
    ///
    /// Returns an error if the TCP listener cannot bind.
    pub async fn start(state: AppState, config: &ServerConfig) -> Result<Self> {
        let app = router(state);

        let bind_addr = format!("{}:{}", config.host, config.port);
        let listener = TcpListener::bind(&bind_addr)
            .await
            .map_err(|e| GatewayError::Server(format!("bind to {bind_addr} failed: {e}")))?;

        let addr = listener
            .local_addr()
            .map_err(|e| GatewayError::Server(format!("failed to get local addr: {e}")))?;

        info!("search gateway listening on http://{addr}");

        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!("search gateway error: {e}");
            }
        });

        Ok(Self { addr, handle })
    }

    /// Returns the address the server is listening on.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Returns the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.addr.port()
    }

    /// Abort the server task.
    pub fn shutdown(&self) {
        self.handle.abort();
    }
}

impl Drop for GatewayServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

// ---------------------------------------------------------------------------
// Route handlers
// ---------------------------------------------------------------------------

/// `GET /api/search` — OMDb and post index together.
async fn handle_unified_search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> std::result::Result<Response, ApiError> {
    info!("handling unified search");
    let (page, per_page) = params.pagination()?;
    let omdb_options = SearchOptions::new(params.query(), page, per_page, params.omdb_filters())?;
    let post_options = SearchOptions::new(params.query(), page, per_page, params.post_filters())?;

    let bindings = vec![
        state.omdb_binding(omdb_options),
        QueryBinding::new(PostQueryer, post_options),
    ];
    search_response(state.aggregator.handle_search(bindings).await)
}

/// `GET /api/search/omdb` — OMDb only.
async fn handle_omdb_search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> std::result::Result<Response, ApiError> {
    info!("handling OMDb search");
    let (page, per_page) = params.pagination()?;
    let options = SearchOptions::new(params.query(), page, per_page, params.omdb_filters())?;

    let bindings = vec![state.omdb_binding(options)];
    search_response(state.aggregator.handle_search(bindings).await)
}

/// `GET /api/search/post` — post index only.
async fn handle_post_search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> std::result::Result<Response, ApiError> {
    info!("handling post search");
    let (page, per_page) = params.pagination()?;
    let options = SearchOptions::new(params.query(), page, per_page, params.post_filters())?;

    let bindings = vec![QueryBinding::new(PostQueryer, options)];
    search_response(state.aggregator.handle_search(bindings).await)
}

/// `GET /health` — liveness check.
async fn handle_health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Serialize aggregated items, or map a request-level failure to a 500.
fn search_response(
    outcome: std::result::Result<Vec<SearchItem>, SearchError>,
) -> std::result::Result<Response, ApiError> {
    let items = outcome.map_err(|e| {
        tracing::error!(error = %e, "search failed");
        ApiError::Internal
    })?;

    let body = serde_json::to_vec(&items).map_err(|e| {
        tracing::error!(error = %e, "failed to serialize search response");
        ApiError::Internal
    })?;

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        body,
    )
        .into_response())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;
    use usg_search::{Backend, BackendError};

    fn params(pairs: &[(&str, &str)]) -> SearchParams {
        let query = pairs
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("&");
        parse_query(&query)
    }

    // Decode the same way the `Query` extractor does.
    fn parse_query(query: &str) -> SearchParams {
        let uri: axum::http::Uri = format!("/api/search?{query}").parse().unwrap();
        Query::<SearchParams>::try_from_uri(&uri).unwrap().0
    }

    #[test]
    fn empty_pagination_is_zero() {
        let p = params(&[("page", ""), ("perPage", "")]);
        assert_eq!(p.pagination().unwrap(), (0, 0));
        assert_eq!(SearchParams::default().pagination().unwrap(), (0, 0));
    }

    #[test]
    fn negative_pagination_parses() {
        let p = params(&[("page", "-2"), ("perPage", "-1")]);
        assert_eq!(p.pagination().unwrap(), (-2, -1));
    }

    #[test]
    fn non_numeric_page_is_bad_request() {
        let p = params(&[("page", "two")]);
        let ApiError::BadRequest(message) = p.pagination().unwrap_err() else {
            panic!("expected BadRequest");
        };
        assert!(message.contains("page"));
        assert!(message.contains("two"));
    }

    #[test]
    fn filters_built_from_params() {
        let p = params(&[
            ("type", "movie"),
            ("year", "1979"),
            ("author", "ada"),
            ("topic", "rust,%20async,,"),
            ("has", "video"),
            ("label", "news"),
            ("publishedAt", "2024-01-01"),
        ]);
        let omdb = p.omdb_filters();
        assert_eq!(omdb.content_type, "movie");
        assert_eq!(omdb.year, "1979");

        let post = p.post_filters();
        assert_eq!(post.author, "ada");
        assert_eq!(post.topics, vec!["rust".to_string(), "async".to_string()]);
        assert_eq!(post.has, vec!["video".to_string()]);
        assert_eq!(post.label, "news");
        assert_eq!(post.published_at, "2024-01-01");
    }

    #[test]
    fn omdb_type_stays_out_of_post_filters() {
        let p = params(&[("type", "movie"), ("author", "ada")]);
        assert_eq!(p.omdb_filters().content_type, "movie");
        assert!(p.post_filters().content_type.is_empty());
    }

    #[test]
    fn csv_handles_absent_and_blank() {
        assert!(csv(None).is_empty());
        assert!(csv(Some(" , ,")).is_empty());
    }

    #[test]
    fn total_failure_maps_to_internal() {
        let outcome = Err(SearchError::AllBackendsFailed("omdb: secret detail".into()));
        let response = search_response(outcome).unwrap_err().into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn partial_failure_is_ok() {
        let items = vec![
            SearchItem::success(Backend::Omdb, vec![serde_json::json!({"title": "X"})]),
            SearchItem::failure(Backend::Post, &BackendError::Http("down".into())),
        ];
        let response = search_response(Ok(items)).unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
    }

    #[test]
    fn validation_error_is_bad_request() {
        let response = ApiError::from(ValidationError::MissingAuthor).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
