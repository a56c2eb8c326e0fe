//! Internal content-post backend.
//!
//! The post index is not wired up yet: [`PostQueryer`] validates and accepts
//! queries but always answers with an empty page.

use serde::{Deserialize, Serialize};

use crate::error::{BackendError, ValidationError, POST_HAS_MARKERS};
use crate::filter::SearchFilters;
use crate::options::SearchOptions;
use crate::queryer::Queryer;
use crate::types::Backend;

/// Filters understood by the post backend.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostFilters {
    /// Post author. Required.
    pub author: String,
    pub topics: Vec<String>,
    pub published_at: String,
    pub label: String,
    /// Embedded content the body must contain: video, image, link, note.
    pub has: Vec<String>,
    /// Content type as published.
    pub content_type: String,
}

impl SearchFilters for PostFilters {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.author.trim().is_empty() {
            return Err(ValidationError::MissingAuthor);
        }
        if let Some(marker) = self
            .has
            .iter()
            .find(|m| !POST_HAS_MARKERS.contains(&m.as_str()))
        {
            return Err(ValidationError::HasMarker(marker.clone()));
        }
        Ok(())
    }
}

/// A post from the internal content index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    pub title: String,
    pub author: String,
    pub topics: Vec<String>,
    pub label: String,
    pub published_at: String,
    pub body: String,
}

/// [`Queryer`] for the post index.
#[derive(Debug, Clone, Copy, Default)]
pub struct PostQueryer;

impl Queryer for PostQueryer {
    type Filters = PostFilters;
    type Item = Post;

    async fn query(&self, options: &SearchOptions<PostFilters>) -> Result<Vec<Post>, BackendError> {
        tracing::trace!(
            query = options.query(),
            author = %options.filters().author,
            "post search"
        );
        Ok(Vec::new())
    }

    fn backend(&self) -> Backend {
        Backend::Post
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_author(author: &str) -> PostFilters {
        PostFilters {
            author: author.into(),
            ..Default::default()
        }
    }

    #[test]
    fn author_required() {
        assert_eq!(
            PostFilters::default().validate(),
            Err(ValidationError::MissingAuthor)
        );
        assert_eq!(
            with_author("   ").validate(),
            Err(ValidationError::MissingAuthor)
        );
    }

    #[test]
    fn author_alone_is_valid() {
        assert_eq!(with_author("ada").validate(), Ok(()));
    }

    #[test]
    fn known_has_markers_accepted() {
        let filters = PostFilters {
            has: vec!["video".into(), "note".into()],
            ..with_author("ada")
        };
        assert_eq!(filters.validate(), Ok(()));
    }

    #[test]
    fn unknown_has_marker_rejected() {
        let filters = PostFilters {
            has: vec!["image".into(), "gif".into()],
            ..with_author("ada")
        };
        assert_eq!(
            filters.validate(),
            Err(ValidationError::HasMarker("gif".into()))
        );
    }

    #[tokio::test]
    async fn stub_returns_empty_page() {
        let options = SearchOptions::new("rust", 0, 10, with_author("ada")).expect("valid");
        let posts = PostQueryer.query(&options).await.expect("stub never fails");
        assert!(posts.is_empty());
        assert_eq!(PostQueryer.backend(), Backend::Post);
    }
}
