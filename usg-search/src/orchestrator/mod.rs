//! Search orchestrator: concurrent fan-out over query bindings and fan-in of
//! their results.
//!
//! Every binding runs on its own task. Completions are merged in arrival
//! order; a failing backend contributes an error item instead of aborting the
//! others.

pub mod aggregate;

pub use aggregate::{handle_search, Aggregator};
