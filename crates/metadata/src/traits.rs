// FILE: src/traits.rs
// ============================================================================

use crate::SourceResult;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Metadata source trait
pub trait MetadataSource {
    /// Search for candidate books. Implementations degrade to an empty
    /// result set on provider failure instead of propagating it.
    fn search(
        &self,
        query: &SearchQuery,
    ) -> impl std::future::Future<Output = SourceResult<Vec<BookDraft>>> + Send;

    /// Fetch a single volume by provider id. Provider failure propagates.
    fn fetch(
        &self,
        volume_id: &str,
    ) -> impl std::future::Future<Output = SourceResult<BookDraft>> + Send;

    /// Get metadata about the source
    fn metadata(&self) -> SourceMetadata;
}

/// Search query
#[derive(Debug, Clone)]
pub struct SearchQuery {
    pub text: String,
    pub title: Option<String>,
    pub author: Option<String>,
    pub isbn: Option<String>,
    pub limit: usize,
}

impl SearchQuery {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            title: None,
            author: None,
            isbn: None,
            limit: 10,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn with_isbn(mut self, isbn: impl Into<String>) -> Self {
        self.isbn = Some(isbn.into());
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// True when no field carries a usable term
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
            && self.title.as_deref().is_none_or(|s| s.trim().is_empty())
            && self.author.as_deref().is_none_or(|s| s.trim().is_empty())
            && self.isbn.as_deref().is_none_or(|s| s.trim().is_empty())
    }
}

/// A candidate book produced by a lookup, convertible into a creation
/// request. Drafts are never written to storage directly; submitting one
/// goes through the normal creation path so lifecycle and normalization
/// rules still apply.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookDraft {
    /// Provider-side volume id
    pub source_id: String,
    pub title: String,
    pub description: Option<String>,
    pub page_count: Option<u32>,
    pub isbn: Option<String>,
    pub publisher: Option<String>,
    pub published_date: Option<NaiveDate>,
    /// Candidate author names, capped at a small fixed count
    pub authors: Vec<String>,
    /// Candidate genre names, capped at a small fixed count
    pub genres: Vec<String>,
}

/// Source metadata
#[derive(Debug, Clone)]
pub struct SourceMetadata {
    pub name: String,
    pub base_url: String,
    pub requires_auth: bool,
}

#[cfg(test)]
mod trait_tests {
    use super::*;

    #[test]
    fn test_search_query_builder() {
        let query = SearchQuery::new("test")
            .with_author("Author")
            .with_limit(5);

        assert_eq!(query.text, "test");
        assert_eq!(query.author.as_deref(), Some("Author"));
        assert_eq!(query.limit, 5);
    }

    #[test]
    fn test_search_query_default_limit() {
        let query = SearchQuery::new("test");
        assert_eq!(query.limit, 10);
        assert_eq!(query.title, None);
    }

    #[test]
    fn test_search_query_is_empty() {
        assert!(SearchQuery::new("   ").is_empty());
        assert!(!SearchQuery::new("dune").is_empty());
        assert!(!SearchQuery::new("").with_isbn("9780441013593").is_empty());
    }
}
