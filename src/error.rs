//! Error types for the usg gateway.

/// Top-level error type for the gateway process.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The HTTP listener could not be started.
    #[error("server error: {0}")]
    Server(String),

    /// Search core error (backend setup, aggregation).
    #[error(transparent)]
    Search(#[from] usg_search::SearchError),
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, GatewayError>;
