//! Concrete search backends.
//!
//! Each module provides a filter type and a [`crate::queryer::Queryer`]
//! implementation for one backend.

pub mod omdb;
pub mod post;

pub use omdb::{OmdbClient, OmdbFilters, OmdbQueryer, OmdbTitle};
pub use post::{Post, PostFilters, PostQueryer};
