//! Aggregate statistics types produced by the analytics queries

use crate::types::{round_one_decimal, GenreId, ReadingMood};
use serde::{Deserialize, Serialize};

/// Book counts per lifecycle status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    pub reading: i64,
    pub finished: i64,
    pub wishlist: i64,
    pub abandoned: i64,
    pub on_hold: i64,
}

impl StatusCounts {
    /// Sum over all statuses
    pub fn total(&self) -> i64 {
        self.reading + self.finished + self.wishlist + self.abandoned + self.on_hold
    }

    /// Completion rate in percent, rounded to one decimal; 0 when empty
    pub fn completion_rate(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        round_one_decimal(self.finished as f64 / total as f64 * 100.0)
    }
}

/// Dashboard summary over the whole library
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub total_books: i64,
    pub status_counts: StatusCounts,
    /// FINISHED / total in percent, one decimal, 0 when the library is empty
    pub completion_rate: f64,
    /// Average total pages over books with a known page count; absent when
    /// no book qualifies (absent is "no data", distinct from zero)
    pub average_total_pages: Option<f64>,
    /// Average pages per day over finished books with both dates and a known
    /// page count; absent when no book qualifies
    pub pages_per_day: Option<f64>,
}

impl DashboardSummary {
    /// Summary of an empty library
    pub fn empty() -> Self {
        Self {
            total_books: 0,
            status_counts: StatusCounts::default(),
            completion_rate: 0.0,
            average_total_pages: None,
            pages_per_day: None,
        }
    }
}

impl Default for DashboardSummary {
    fn default() -> Self {
        Self::empty()
    }
}

/// Books finished within one calendar year
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearlyProgress {
    pub year: i32,
    pub books_finished: i64,
}

/// How many books carry a given genre
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenrePopularity {
    pub genre_id: GenreId,
    pub name: String,
    pub book_count: i64,
}

/// Session count and average pages per session for one observed mood
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoodStatistics {
    pub mood: ReadingMood,
    pub session_count: i64,
    pub average_pages: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_counts_total() {
        let counts = StatusCounts {
            reading: 2,
            finished: 3,
            wishlist: 4,
            abandoned: 1,
            on_hold: 0,
        };
        assert_eq!(counts.total(), 10);
    }

    #[test]
    fn test_completion_rate_rounds_to_one_decimal() {
        let counts = StatusCounts {
            reading: 1,
            finished: 1,
            wishlist: 1,
            abandoned: 0,
            on_hold: 0,
        };
        assert_eq!(counts.completion_rate(), 33.3);
    }

    #[test]
    fn test_completion_rate_empty_is_zero_not_nan() {
        let counts = StatusCounts::default();
        assert_eq!(counts.completion_rate(), 0.0);
    }

    #[test]
    fn test_empty_dashboard_has_absent_averages() {
        let summary = DashboardSummary::empty();
        assert_eq!(summary.total_books, 0);
        assert_eq!(summary.completion_rate, 0.0);
        assert!(summary.average_total_pages.is_none());
        assert!(summary.pages_per_day.is_none());
    }

    #[test]
    fn test_dashboard_default_is_empty() {
        let summary = DashboardSummary::default();
        assert_eq!(summary.total_books, 0);
    }
}
