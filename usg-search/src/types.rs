//! Core types for backend identification and per-backend results.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::BackendError;

/// Search backends the gateway can query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// OMDb movie/TV metadata API.
    Omdb,
    /// Internal content-post index.
    Post,
}

impl Backend {
    /// Returns the wire name of this backend, as used in the `type` tag.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Omdb => "omdb",
            Self::Post => "post",
        }
    }

    /// Returns all available backend variants.
    pub fn all() -> &'static [Backend] {
        &[Self::Omdb, Self::Post]
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The result of running one backend query.
///
/// Exactly one of `data` / `error` is meaningful: a failed query carries an
/// empty `data` and the error message. `backend` is always set, whether the
/// query succeeded or not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchItem {
    /// Which backend produced this item.
    #[serde(rename = "type")]
    pub backend: Backend,
    /// Backend-specific result items, already encoded as JSON.
    #[serde(default)]
    pub data: Vec<serde_json::Value>,
    /// Error message when the query failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SearchItem {
    /// A successful item carrying `data`.
    pub fn success(backend: Backend, data: Vec<serde_json::Value>) -> Self {
        Self {
            backend,
            data,
            error: None,
        }
    }

    /// A failed item carrying the error message and no data.
    pub fn failure(backend: Backend, error: &BackendError) -> Self {
        Self {
            backend,
            data: Vec::new(),
            error: Some(error.to_string()),
        }
    }

    /// Whether the query behind this item failed.
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}
