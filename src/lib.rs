//! usg: unified search gateway.
//!
//! One HTTP endpoint over several independent search backends:
//! Request → per-backend options → query bindings → concurrent aggregation → JSON
//!
//! # Architecture
//!
//! - **Config**: TOML file plus environment overrides ([`GatewayConfig`])
//! - **Server**: axum router and listener lifecycle ([`server::GatewayServer`])
//! - **Search core**: filters, options, bindings and the aggregator live in
//!   the `usg-search` crate

pub mod config;
pub mod error;
pub mod server;

pub use config::{GatewayConfig, ServerConfig};
pub use error::{GatewayError, Result};
pub use server::{AppState, GatewayServer};
