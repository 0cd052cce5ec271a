// FILE: crates/metadata/src/google_books.rs

use crate::{BookDraft, MetadataSource, SearchQuery, SourceError, SourceMetadata, SourceResult};
use chrono::NaiveDate;
use log::warn;
use serde::{Deserialize, Serialize};
use std::time::Duration as StdDuration;

/// How many candidate author/genre names a draft carries at most
const MAX_CANDIDATE_NAMES: usize = 3;

/// Google Books client configuration
#[derive(Debug, Clone)]
pub struct GoogleBooksConfig {
    /// API base URL, overridable for testing
    pub base_url: String,
    /// Optional API key appended to every request
    pub api_key: Option<String>,
    /// Bounded request timeout
    pub timeout: StdDuration,
}

impl Default for GoogleBooksConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.googleapis.com/books/v1".to_string(),
            api_key: None,
            timeout: StdDuration::from_secs(10),
        }
    }
}

/// Google Books volume lookup
pub struct GoogleBooksClient {
    config: GoogleBooksConfig,
    client: Option<reqwest::Client>,
}

impl GoogleBooksClient {
    /// Create a client with the default configuration
    pub fn new() -> Self {
        Self::with_config(GoogleBooksConfig::default())
    }

    /// Create a client with custom configuration
    pub fn with_config(config: GoogleBooksConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION"),
            ))
            .build()
            .ok();

        Self { config, client }
    }

    /// Search the volumes endpoint; provider failures propagate here, the
    /// trait impl downgrades them
    async fn search_volumes(&self, query: &SearchQuery) -> SourceResult<Vec<BookDraft>> {
        if query.is_empty() {
            return Err(SourceError::InvalidQuery("Empty query".to_string()));
        }

        let client = self
            .client
            .as_ref()
            .ok_or_else(|| SourceError::NetworkError("HTTP client not available".to_string()))?;

        let url = format!("{}/volumes", self.config.base_url);
        let terms = build_search_terms(query);
        let limit = query.limit.clamp(1, 40).to_string();
        let mut params = vec![("q", terms), ("maxResults", limit)];
        if let Some(key) = &self.config.api_key {
            params.push(("key", key.clone()));
        }

        let response = client
            .get(&url)
            .query(&params)
            .send()
            .await
            .map_err(|e| SourceError::NetworkError(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(SourceError::NetworkError(format!(
                "HTTP {} {}",
                response.status().as_u16(),
                response.status().canonical_reason().unwrap_or("Unknown")
            )));
        }

        let body: VolumesResponse = response
            .json()
            .await
            .map_err(|e| SourceError::ParseError(format!("JSON parse error: {}", e)))?;

        Ok(body
            .items
            .unwrap_or_default()
            .into_iter()
            .filter_map(draft_from_volume)
            .collect())
    }
}

impl Default for GoogleBooksClient {
    fn default() -> Self {
        Self::new()
    }
}

impl MetadataSource for GoogleBooksClient {
    async fn search(&self, query: &SearchQuery) -> SourceResult<Vec<BookDraft>> {
        match self.search_volumes(query).await {
            Ok(drafts) => Ok(drafts),
            Err(err @ SourceError::InvalidQuery(_)) => Err(err),
            Err(err) => {
                // Search lookups degrade to empty instead of failing the caller
                warn!("Google Books search degraded to empty: {}", err);
                Ok(Vec::new())
            }
        }
    }

    async fn fetch(&self, volume_id: &str) -> SourceResult<BookDraft> {
        if volume_id.trim().is_empty() {
            return Err(SourceError::InvalidQuery("Empty volume id".to_string()));
        }

        let client = self
            .client
            .as_ref()
            .ok_or_else(|| SourceError::Unavailable("HTTP client not available".to_string()))?;

        let url = format!("{}/volumes/{}", self.config.base_url, volume_id);
        let mut request = client.get(&url);
        if let Some(key) = &self.config.api_key {
            request = request.query(&[("key", key)]);
        }

        let response = request
            .send()
            .await
            .map_err(|e| SourceError::Unavailable(format!("Request failed: {}", e)))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(SourceError::NotFound(volume_id.to_string()));
        }
        if !response.status().is_success() {
            return Err(SourceError::Unavailable(format!(
                "HTTP {}",
                response.status().as_u16()
            )));
        }

        let volume: Volume = response
            .json()
            .await
            .map_err(|e| SourceError::ParseError(format!("JSON parse error: {}", e)))?;

        draft_from_volume(volume).ok_or_else(|| SourceError::NotFound(volume_id.to_string()))
    }

    fn metadata(&self) -> SourceMetadata {
        SourceMetadata {
            name: "Google Books".to_string(),
            base_url: self.config.base_url.clone(),
            requires_auth: self.config.api_key.is_some(),
        }
    }
}

/// Combines the free-text term with field qualifiers the way the volumes
/// endpoint expects them
fn build_search_terms(query: &SearchQuery) -> String {
    let mut terms = Vec::new();
    let text = query.text.trim();
    if !text.is_empty() {
        terms.push(text.to_string());
    }
    if let Some(title) = query.title.as_deref().map(str::trim) {
        if !title.is_empty() {
            terms.push(format!("intitle:{}", title));
        }
    }
    if let Some(author) = query.author.as_deref().map(str::trim) {
        if !author.is_empty() {
            terms.push(format!("inauthor:{}", author));
        }
    }
    if let Some(isbn) = query.isbn.as_deref().map(str::trim) {
        if !isbn.is_empty() {
            terms.push(format!("isbn:{}", isbn));
        }
    }
    terms.join(" ")
}

/// Parses the volumes API's published-date forms: year, year-month, or full
/// date. Anything else yields None.
pub fn parse_published_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(date);
    }

    if let Some((year, month)) = trimmed.split_once('-') {
        if year.len() == 4 {
            if let (Ok(year), Ok(month)) = (year.parse::<i32>(), month.parse::<u32>()) {
                return NaiveDate::from_ymd_opt(year, month, 1);
            }
        }
        return None;
    }

    if trimmed.len() == 4 && trimmed.chars().all(|c| c.is_ascii_digit()) {
        if let Ok(year) = trimmed.parse::<i32>() {
            return NaiveDate::from_ymd_opt(year, 1, 1);
        }
    }

    None
}

fn draft_from_volume(volume: Volume) -> Option<BookDraft> {
    let info = volume.volume_info?;
    let title = info.title?;

    // Prefer the 13-digit identifier when both are present
    let isbn = info
        .industry_identifiers
        .iter()
        .find(|id| id.kind == "ISBN_13")
        .or_else(|| {
            info.industry_identifiers
                .iter()
                .find(|id| id.kind == "ISBN_10")
        })
        .map(|id| id.identifier.clone());

    Some(BookDraft {
        source_id: volume.id,
        title,
        description: info.description,
        page_count: info.page_count.and_then(|n| u32::try_from(n).ok()),
        isbn,
        publisher: info.publisher,
        published_date: info.published_date.as_deref().and_then(parse_published_date),
        authors: info
            .authors
            .into_iter()
            .take(MAX_CANDIDATE_NAMES)
            .collect(),
        genres: info
            .categories
            .into_iter()
            .take(MAX_CANDIDATE_NAMES)
            .collect(),
    })
}

/// Volumes endpoint response envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
struct VolumesResponse {
    #[serde(default)]
    items: Option<Vec<Volume>>,
}

/// One volume in an API response
#[derive(Debug, Clone, Serialize, Deserialize)]
struct Volume {
    id: String,
    #[serde(rename = "volumeInfo")]
    volume_info: Option<VolumeInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct VolumeInfo {
    title: Option<String>,
    #[serde(default)]
    authors: Vec<String>,
    publisher: Option<String>,
    #[serde(rename = "publishedDate")]
    published_date: Option<String>,
    description: Option<String>,
    #[serde(rename = "industryIdentifiers", default)]
    industry_identifiers: Vec<IndustryIdentifier>,
    #[serde(rename = "pageCount")]
    page_count: Option<i64>,
    #[serde(default)]
    categories: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct IndustryIdentifier {
    #[serde(rename = "type")]
    kind: String,
    identifier: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn volume_fixture() -> Volume {
        serde_json::from_str(
            r#"{
                "id": "zyTCAlFPjgYC",
                "volumeInfo": {
                    "title": "The Google Story",
                    "authors": ["David A. Vise", "Mark Malseed", "Third Author", "Fourth Author"],
                    "publisher": "Random House Digital",
                    "publishedDate": "2005-11",
                    "description": "The remarkable history of a company.",
                    "industryIdentifiers": [
                        {"type": "ISBN_10", "identifier": "055380457X"},
                        {"type": "ISBN_13", "identifier": "9780553804577"}
                    ],
                    "pageCount": 207,
                    "categories": ["Business", "Technology", "History", "Biography"]
                }
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_parse_published_date_forms() {
        assert_eq!(
            parse_published_date("2005-11-15"),
            NaiveDate::from_ymd_opt(2005, 11, 15)
        );
        assert_eq!(
            parse_published_date("2005-11"),
            NaiveDate::from_ymd_opt(2005, 11, 1)
        );
        assert_eq!(
            parse_published_date("2005"),
            NaiveDate::from_ymd_opt(2005, 1, 1)
        );
    }

    #[test]
    fn test_parse_published_date_garbage_is_none() {
        assert_eq!(parse_published_date("unknown"), None);
        assert_eq!(parse_published_date(""), None);
        assert_eq!(parse_published_date("c. 1850"), None);
        assert_eq!(parse_published_date("2005-13"), None);
        assert_eq!(parse_published_date("85"), None);
    }

    #[test]
    fn test_draft_prefers_isbn13() {
        let draft = draft_from_volume(volume_fixture()).unwrap();
        assert_eq!(draft.isbn.as_deref(), Some("9780553804577"));
    }

    #[test]
    fn test_draft_caps_candidate_names() {
        let draft = draft_from_volume(volume_fixture()).unwrap();
        assert_eq!(draft.authors.len(), MAX_CANDIDATE_NAMES);
        assert_eq!(draft.genres.len(), MAX_CANDIDATE_NAMES);
        assert_eq!(draft.authors[0], "David A. Vise");
    }

    #[test]
    fn test_draft_parses_partial_published_date() {
        let draft = draft_from_volume(volume_fixture()).unwrap();
        assert_eq!(draft.published_date, NaiveDate::from_ymd_opt(2005, 11, 1));
        assert_eq!(draft.page_count, Some(207));
    }

    #[test]
    fn test_draft_without_title_is_dropped() {
        let volume: Volume =
            serde_json::from_str(r#"{"id": "x", "volumeInfo": {"pageCount": 10}}"#).unwrap();
        assert!(draft_from_volume(volume).is_none());
    }

    #[test]
    fn test_build_search_terms_combines_qualifiers() {
        let query = SearchQuery::new("dune")
            .with_author("herbert")
            .with_isbn("9780441013593");
        let terms = build_search_terms(&query);
        assert_eq!(terms, "dune inauthor:herbert isbn:9780441013593");
    }

    #[test]
    fn test_metadata_reports_auth_requirement() {
        let anonymous = GoogleBooksClient::new();
        assert!(!anonymous.metadata().requires_auth);

        let keyed = GoogleBooksClient::with_config(GoogleBooksConfig {
            api_key: Some("secret".to_string()),
            ..Default::default()
        });
        assert!(keyed.metadata().requires_auth);
    }

    #[tokio::test]
    async fn test_empty_query_is_rejected_not_degraded() {
        let client = GoogleBooksClient::new();
        let result = client.search(&SearchQuery::new("  ")).await;
        assert!(matches!(result, Err(SourceError::InvalidQuery(_))));
    }

    #[tokio::test]
    async fn test_unreachable_provider_degrades_search_to_empty() {
        let client = GoogleBooksClient::with_config(GoogleBooksConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            timeout: StdDuration::from_millis(200),
            ..Default::default()
        });

        let results = client.search(&SearchQuery::new("dune")).await.unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_provider_fails_single_fetch() {
        let client = GoogleBooksClient::with_config(GoogleBooksConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            timeout: StdDuration::from_millis(200),
            ..Default::default()
        });

        let result = client.fetch("zyTCAlFPjgYC").await;
        assert!(matches!(result, Err(SourceError::Unavailable(_))));
    }

    // Network tests - only run with network access
    #[tokio::test]
    #[ignore = "Requires network access"]
    async fn test_real_search() {
        let client = GoogleBooksClient::new();
        let results = client
            .search(&SearchQuery::new("pride and prejudice").with_limit(5))
            .await
            .unwrap();

        for draft in &results {
            println!("  - {} ({:?})", draft.title, draft.published_date);
        }
    }

    #[tokio::test]
    #[ignore = "Requires network access"]
    async fn test_real_fetch() {
        let client = GoogleBooksClient::new();
        match client.fetch("zyTCAlFPjgYC").await {
            Ok(draft) => assert!(!draft.title.is_empty()),
            Err(e) => eprintln!("Fetch failed: {}", e),
        }
    }
}
