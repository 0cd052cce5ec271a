pub mod error;
pub mod types;

// Re-export commonly used types
pub use error::{AppError, Result, Violation};
pub use types::{
    normalize_genre_name, round_one_decimal, Author, AuthorId, Book, BookId, BookStatus,
    DashboardSummary, Genre,
    GenreId, GenrePopularity, MoodStatistics, ProgressOutcome, ReadingMood, ReadingSession,
    SessionId, StatusCounts, Validator, YearlyProgress,
};
