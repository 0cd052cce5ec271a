//! Domain types for Readstack
//!
//! This module contains all domain models organized by responsibility:
//! - `book`: Book, its lifecycle status, and the progress state machine
//! - `author`: Authors and their derived display fields
//! - `genre`: Genres and genre-name normalization
//! - `session`: Reading sessions and moods
//! - `stats`: Aggregate statistics shapes
//! - `common`: Shared traits and utilities

mod author;
mod book;
mod common;
mod genre;
mod session;
mod stats;

// Re-export all public types
pub use author::{Author, AuthorId};
pub use book::{Book, BookId, BookStatus, ProgressOutcome};
pub use common::{round_one_decimal, Validator};
pub use genre::{normalize_genre_name, Genre, GenreId};
pub use session::{ReadingMood, ReadingSession, SessionId};
pub use stats::{DashboardSummary, GenrePopularity, MoodStatistics, StatusCounts, YearlyProgress};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_id_types_are_exported() {
        let _book_id: BookId = BookId::new();
        let _author_id: AuthorId = AuthorId::new();
        let _genre_id: GenreId = GenreId::new();
        let _session_id: SessionId = SessionId::new();
    }

    #[test]
    fn test_status_and_mood_are_distinct_vocabularies() {
        assert!(BookStatus::from_str("excited").is_none());
        assert!(ReadingMood::from_str("reading").is_none());
    }
}
