//! Genre domain model and name normalization
//!
//! Genre names are free text at the API edge but a single canonical form in
//! storage. `normalize_genre_name` is the dedup key: creating a genre whose
//! normalized name matches an existing row reuses that row.

use crate::error::Violation;
use crate::types::Validator;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a genre
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GenreId(Uuid);

impl GenreId {
    /// Creates a new random GenreId
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a GenreId from a UUID string
    pub fn from_string(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?))
    }

    /// Returns the GenreId as a string
    pub fn as_string(&self) -> String {
        self.0.to_string()
    }
}

impl Default for GenreId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for GenreId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Represents a genre label shared across books
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Genre {
    pub id: GenreId,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Genre {
    /// Creates a new genre, normalizing the supplied name
    pub fn new(name: &str) -> Self {
        let now = Utc::now();
        Self {
            id: GenreId::new(),
            name: normalize_genre_name(name),
            description: None,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Validator for Genre {
    fn validate(&self) -> Result<(), Vec<Violation>> {
        if self.name.trim().is_empty() {
            Err(vec![Violation::new("name", "must not be blank")])
        } else {
            Ok(())
        }
    }
}

/// Known spelling variants collapsed to one canonical form (lower-case keys)
const SYNONYMS: [(&str, &str); 4] = [
    ("sci-fi", "science fiction"),
    ("scifi", "science fiction"),
    ("ya", "young adult"),
    ("nonfiction", "non-fiction"),
];

/// Words kept lower-case in title position, unless they lead the name
const MINOR_WORDS: [&str; 10] = [
    "of", "and", "the", "in", "on", "at", "to", "for", "with", "&",
];

/// Canonicalizes a free-text genre name.
///
/// Trims and collapses internal whitespace, lower-cases, applies the synonym
/// table, then title-cases each word except minor words in non-leading
/// position. Idempotent: normalizing an already-normalized name returns it
/// unchanged.
pub fn normalize_genre_name(raw: &str) -> String {
    let collapsed = raw
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();

    let canonical = SYNONYMS
        .iter()
        .find(|(variant, _)| *variant == collapsed)
        .map(|(_, replacement)| (*replacement).to_string())
        .unwrap_or(collapsed);

    canonical
        .split(' ')
        .enumerate()
        .map(|(i, word)| {
            if i > 0 && MINOR_WORDS.contains(&word) {
                word.to_string()
            } else {
                capitalize(word)
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
