//! OMDb movie/TV metadata backend.
//!
//! OMDb answers `GET /?apikey=..&s=..&type=..&y=..&page=..` with a JSON body
//! whose `Search` array holds up to ten titles per page. A missing `Search`
//! array means nothing matched.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::config::OmdbConfig;
use crate::error::{BackendError, SearchError, ValidationError, OMDB_CONTENT_TYPES};
use crate::filter::SearchFilters;
use crate::http;
use crate::options::SearchOptions;
use crate::queryer::Queryer;
use crate::types::Backend;

/// Titles per OMDb search page. OMDb does not let callers change it.
const OMDB_PAGE_SIZE: u64 = 10;

/// Filters understood by the OMDb backend.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OmdbFilters {
    /// `movie`, `series`, `episode`, or empty for any.
    pub content_type: String,
    /// Four-digit release year, or empty for any.
    pub year: String,
}

impl SearchFilters for OmdbFilters {
    fn validate(&self) -> Result<(), ValidationError> {
        let content_type = self.content_type.as_str();
        if !content_type.is_empty() && !OMDB_CONTENT_TYPES.contains(&content_type) {
            return Err(ValidationError::ContentType(self.content_type.clone()));
        }
        let year_ok = self.year.len() == 4 && self.year.bytes().all(|b| b.is_ascii_digit());
        if !self.year.is_empty() && !year_ok {
            return Err(ValidationError::ReleaseYear(self.year.clone()));
        }
        Ok(())
    }
}

/// A single title returned by OMDb.
///
/// Decodes OMDb's capitalised field names and serialises in camelCase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OmdbTitle {
    #[serde(alias = "Title")]
    pub title: String,
    /// Release year; a range such as `2008–2013` for series.
    #[serde(alias = "Year", default)]
    pub year: String,
    #[serde(alias = "imdbID", default)]
    pub imdb_id: String,
    #[serde(rename = "type", alias = "Type", default)]
    pub kind: String,
    #[serde(alias = "Poster", default)]
    pub poster: String,
}

#[derive(Debug, Deserialize)]
struct OmdbSearchResponse {
    #[serde(rename = "Search", default)]
    search: Vec<OmdbTitle>,
}

/// HTTP client for the OMDb API.
#[derive(Clone)]
pub struct OmdbClient {
    http: reqwest::Client,
    base_url: url::Url,
    api_key: String,
    timeout_seconds: u64,
}

impl OmdbClient {
    /// Create a client from validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] if `config` is invalid or the HTTP
    /// client cannot be built.
    pub fn new(config: &OmdbConfig) -> Result<Self, SearchError> {
        config.validate()?;
        let base_url = url::Url::parse(&config.base_url)
            .map_err(|e| SearchError::Config(format!("omdb base_url is invalid: {e}")))?;
        Ok(Self {
            http: http::build_client(config)?,
            base_url,
            api_key: config.api_key.clone(),
            timeout_seconds: config.timeout_seconds,
        })
    }

    /// Search titles, first page.
    ///
    /// # Errors
    ///
    /// See [`OmdbClient::search_page`].
    pub async fn search(
        &self,
        title: &str,
        content_type: &str,
        release_year: &str,
    ) -> Result<Vec<OmdbTitle>, BackendError> {
        self.search_page(title, content_type, release_year, 1).await
    }

    /// Search titles on a one-based OMDb `page`.
    ///
    /// # Errors
    ///
    /// - [`BackendError::Timeout`] if the request exceeds the configured timeout
    /// - [`BackendError::Http`] if the request cannot be sent or read
    /// - [`BackendError::Status`] for any 4xx or 5xx answer
    /// - [`BackendError::Decode`] if a 2xx body is not valid OMDb JSON
    pub async fn search_page(
        &self,
        title: &str,
        content_type: &str,
        release_year: &str,
        page: u64,
    ) -> Result<Vec<OmdbTitle>, BackendError> {
        tracing::trace!(title, content_type, release_year, page, "OMDb search");

        let mut url = self.base_url.clone();
        url.query_pairs_mut()
            .append_pair("apikey", &self.api_key)
            .append_pair("s", title)
            .append_pair("type", content_type)
            .append_pair("y", release_year)
            .append_pair("page", &page.to_string());

        let response = self
            .http
            .get(url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if status.is_client_error() || status.is_server_error() {
            return Err(BackendError::Status {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("unknown").to_owned(),
            });
        }

        let body = response.bytes().await.map_err(|e| self.transport_error(e))?;
        tracing::trace!(bytes = body.len(), "OMDb response received");

        let decoded: OmdbSearchResponse =
            serde_json::from_slice(&body).map_err(|e| BackendError::Decode(e.to_string()))?;
        tracing::debug!(count = decoded.search.len(), "OMDb results parsed");
        Ok(decoded.search)
    }

    // The request URL carries the API key, so it is stripped before the
    // error is turned into a message.
    fn transport_error(&self, err: reqwest::Error) -> BackendError {
        if err.is_timeout() {
            return BackendError::Timeout(self.timeout_seconds);
        }
        BackendError::Http(err.without_url().to_string())
    }
}

impl fmt::Debug for OmdbClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OmdbClient")
            .field("base_url", &self.base_url.as_str())
            .field("api_key", &"<redacted>")
            .field("timeout_seconds", &self.timeout_seconds)
            .finish_non_exhaustive()
    }
}

/// [`Queryer`] backed by a shared [`OmdbClient`].
#[derive(Debug, Clone)]
pub struct OmdbQueryer {
    client: Arc<OmdbClient>,
}

impl OmdbQueryer {
    /// Create a queryer sharing `client`.
    pub fn new(client: Arc<OmdbClient>) -> Self {
        Self { client }
    }
}

impl Queryer for OmdbQueryer {
    type Filters = OmdbFilters;
    type Item = OmdbTitle;

    /// Serves the window `[page * per_page, (page + 1) * per_page)` out of
    /// OMDb's fixed ten-title pages, fetching the next OMDb page when the
    /// window crosses a page boundary.
    async fn query(
        &self,
        options: &SearchOptions<OmdbFilters>,
    ) -> Result<Vec<OmdbTitle>, BackendError> {
        let filters = options.filters();
        let per_page = u64::try_from(options.per_page()).unwrap_or(0);
        let offset = u64::try_from(options.page())
            .unwrap_or(0)
            .saturating_mul(per_page);
        let wanted = usize::try_from(per_page).unwrap_or(usize::MAX);

        let mut omdb_page = offset / OMDB_PAGE_SIZE + 1;
        let mut skip = usize::try_from(offset % OMDB_PAGE_SIZE).unwrap_or(0);
        let mut titles = Vec::new();
        loop {
            let batch = self
                .client
                .search_page(options.query(), &filters.content_type, &filters.year, omdb_page)
                .await?;
            let exhausted = (batch.len() as u64) < OMDB_PAGE_SIZE;
            titles.extend(batch.into_iter().skip(skip));
            skip = 0;
            if exhausted || titles.len() >= wanted {
                break;
            }
            omdb_page += 1;
        }
        titles.truncate(wanted);
        tracing::debug!(offset, omdb_page, count = titles.len(), "OMDb window served");
        Ok(titles)
    }

    fn backend(&self) -> Backend {
        Backend::Omdb
    }
}
