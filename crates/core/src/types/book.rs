//! Book domain model and the reading-lifecycle state machine

use crate::error::{AppError, Violation};
use crate::types::Validator;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a book
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BookId(Uuid);

impl BookId {
    /// Creates a new random BookId
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a BookId from a UUID string
    pub fn from_string(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?))
    }

    /// Returns the BookId as a string
    pub fn as_string(&self) -> String {
        self.0.to_string()
    }
}

impl Default for BookId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle state of a book
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookStatus {
    Wishlist,
    Reading,
    Finished,
    Abandoned,
    OnHold,
}

impl BookStatus {
    /// All statuses, in dashboard display order
    pub const ALL: [BookStatus; 5] = [
        BookStatus::Reading,
        BookStatus::Finished,
        BookStatus::Wishlist,
        BookStatus::Abandoned,
        BookStatus::OnHold,
    ];

    /// Returns the storage representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Wishlist => "wishlist",
            Self::Reading => "reading",
            Self::Finished => "finished",
            Self::Abandoned => "abandoned",
            Self::OnHold => "on_hold",
        }
    }

    /// Parses the storage representation
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "wishlist" => Some(Self::Wishlist),
            "reading" => Some(Self::Reading),
            "finished" => Some(Self::Finished),
            "abandoned" => Some(Self::Abandoned),
            "on_hold" => Some(Self::OnHold),
            _ => None,
        }
    }

    /// Terminal states are never auto-exited by progress updates
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Finished | Self::Abandoned)
    }
}

impl fmt::Display for BookStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What a progress update changed, used to derive a session record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressOutcome {
    pub previous_page: u32,
    pub current_page: u32,
    pub started_reading: bool,
    pub finished: bool,
}

impl ProgressOutcome {
    /// Pages advanced by this update; zero when the page moved backwards
    pub fn pages_advanced(&self) -> u32 {
        self.current_page.saturating_sub(self.previous_page)
    }
}

/// Represents one book in the personal library
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub isbn: Option<String>,
    pub total_pages: Option<u32>,
    pub current_page: u32,
    pub status: BookStatus,
    pub publisher: Option<String>,
    pub published_date: Option<NaiveDate>,
    pub description: Option<String>,
    pub rating: Option<u8>, // 1-5 stars
    pub notes: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub finish_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Book {
    /// Creates a new book on the wishlist
    pub fn new(title: String) -> Self {
        let now = Utc::now();
        Self {
            id: BookId::new(),
            title,
            isbn: None,
            total_pages: None,
            current_page: 0,
            status: BookStatus::Wishlist,
            publisher: None,
            published_date: None,
            description: None,
            rating: None,
            notes: None,
            start_date: None,
            finish_date: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Applies a progress update, keeping page, status, and dates consistent.
    ///
    /// Rules:
    /// - page must not exceed `total_pages` when the total is known
    /// - WISHLIST + page > 0 moves the book to READING and stamps `start_date`
    /// - page >= `total_pages` moves the book to FINISHED and stamps `finish_date`
    /// - FINISHED and ABANDONED are sticky: only the page counter changes
    /// - dates are stamped at most once; re-applying the same page is a no-op
    ///   for both dates and status
    pub fn apply_progress(
        &mut self,
        new_page: u32,
        today: NaiveDate,
    ) -> Result<ProgressOutcome, AppError> {
        if let Some(total) = self.total_pages {
            if new_page > total {
                return Err(AppError::invalid_argument(
                    "current_page",
                    format!("page {} exceeds total pages {}", new_page, total),
                ));
            }
        }

        let previous_page = self.current_page;
        self.current_page = new_page;

        let mut started_reading = false;
        let mut finished = false;

        if self.status == BookStatus::Wishlist && new_page > 0 {
            self.status = BookStatus::Reading;
            started_reading = true;
            if self.start_date.is_none() {
                self.start_date = Some(today);
            }
        }

        let completed = self
            .total_pages
            .is_some_and(|total| total > 0 && new_page >= total);
        if completed && !self.status.is_terminal() {
            self.status = BookStatus::Finished;
            finished = true;
            if self.finish_date.is_none() {
                self.finish_date = Some(today);
            }
        }

        self.updated_at = Utc::now();

        Ok(ProgressOutcome {
            previous_page,
            current_page: new_page,
            started_reading,
            finished,
        })
    }

    /// Sets the status directly. Manual transitions win over the automatic
    /// rules and never alter the page counter; previously stamped dates are
    /// kept.
    pub fn set_status(&mut self, status: BookStatus, today: NaiveDate) {
        self.status = status;
        match status {
            BookStatus::Reading if self.start_date.is_none() => {
                self.start_date = Some(today);
            }
            BookStatus::Finished if self.finish_date.is_none() => {
                self.finish_date = Some(today);
            }
            _ => {}
        }
        self.updated_at = Utc::now();
    }

    /// Completion percentage, absent when the total page count is unknown or zero
    pub fn completion_percentage(&self) -> Option<f64> {
        match self.total_pages {
            Some(total) if total > 0 => {
                Some(f64::from(self.current_page) / f64::from(total) * 100.0)
            }
            _ => None,
        }
    }
}

impl Validator for Book {
    fn validate(&self) -> Result<(), Vec<Violation>> {
        let mut violations = Vec::new();

        if self.title.trim().is_empty() {
            violations.push(Violation::new("title", "must not be blank"));
        }

        if let Some(total) = self.total_pages {
            if self.current_page > total {
                violations.push(Violation::new(
                    "current_page",
                    "must not exceed total pages",
                ));
            }
        }

        if let Some(rating) = self.rating {
            if !(1..=5).contains(&rating) {
                violations.push(Violation::new("rating", "must be between 1 and 5"));
            }
        }

        if let (Some(start), Some(finish)) = (self.start_date, self.finish_date) {
            if finish < start {
                violations.push(Violation::new(
                    "finish_date",
                    "must not be before start date",
                ));
            }
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 14).unwrap()
    }

    fn book_with_total(total: u32) -> Book {
        let mut book = Book::new("Test Book".to_string());
        book.total_pages = Some(total);
        book
    }

    #[test]
    fn test_book_id_roundtrip() {
        let id = BookId::new();
        let parsed = BookId::from_string(&id.as_string()).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_book_id_uniqueness() {
        assert_ne!(BookId::new(), BookId::new());
    }

    #[test]
    fn test_status_str_roundtrip() {
        for status in BookStatus::ALL {
            assert_eq!(BookStatus::from_str(status.as_str()), Some(status));
        }
        assert_eq!(BookStatus::from_str("paused"), None);
    }

    #[test]
    fn test_new_book_defaults_to_wishlist() {
        let book = Book::new("Dune".to_string());
        assert_eq!(book.status, BookStatus::Wishlist);
        assert_eq!(book.current_page, 0);
        assert!(book.start_date.is_none());
        assert!(book.finish_date.is_none());
    }

    #[test]
    fn test_progress_starts_reading_from_wishlist() {
        let mut book = book_with_total(300);

        let outcome = book.apply_progress(50, today()).unwrap();

        assert_eq!(book.status, BookStatus::Reading);
        assert_eq!(book.start_date, Some(today()));
        assert_eq!(book.current_page, 50);
        assert!(outcome.started_reading);
        assert!(!outcome.finished);
        assert_eq!(outcome.pages_advanced(), 50);
    }

    #[test]
    fn test_progress_start_date_is_stamped_once() {
        let mut book = book_with_total(300);
        book.apply_progress(50, today()).unwrap();

        let later = NaiveDate::from_ymd_opt(2026, 3, 20).unwrap();
        book.apply_progress(50, later).unwrap();

        assert_eq!(book.start_date, Some(today()));
    }

    #[test]
    fn test_progress_completion_finishes_book() {
        let mut book = book_with_total(300);
        book.apply_progress(50, today()).unwrap();

        let finish_day = NaiveDate::from_ymd_opt(2026, 4, 1).unwrap();
        let outcome = book.apply_progress(300, finish_day).unwrap();

        assert_eq!(book.status, BookStatus::Finished);
        assert_eq!(book.finish_date, Some(finish_day));
        assert!(outcome.finished);
        assert!(book.finish_date >= book.start_date);
    }

    #[test]
    fn test_progress_beyond_total_is_rejected_and_book_unchanged() {
        let mut book = book_with_total(300);
        book.apply_progress(50, today()).unwrap();
        let snapshot = book.clone();

        let err = book.apply_progress(301, today()).unwrap_err();

        assert!(matches!(err, AppError::InvalidArgument { .. }));
        assert_eq!(book.current_page, snapshot.current_page);
        assert_eq!(book.status, snapshot.status);
    }

    #[test]
    fn test_progress_from_wishlist_straight_to_finished() {
        let mut book = book_with_total(120);

        let outcome = book.apply_progress(120, today()).unwrap();

        assert_eq!(book.status, BookStatus::Finished);
        assert_eq!(book.start_date, Some(today()));
        assert_eq!(book.finish_date, Some(today()));
        assert!(outcome.started_reading);
        assert!(outcome.finished);
    }

    #[test]
    fn test_abandoned_is_sticky_under_progress() {
        let mut book = book_with_total(300);
        book.apply_progress(50, today()).unwrap();
        book.set_status(BookStatus::Abandoned, today());

        book.apply_progress(300, today()).unwrap();

        assert_eq!(book.status, BookStatus::Abandoned);
    }

    #[test]
    fn test_finished_is_not_restamped_on_reapply() {
        let mut book = book_with_total(300);
        let finish_day = NaiveDate::from_ymd_opt(2026, 4, 1).unwrap();
        book.apply_progress(300, finish_day).unwrap();

        let later = NaiveDate::from_ymd_opt(2026, 5, 1).unwrap();
        let outcome = book.apply_progress(300, later).unwrap();

        assert_eq!(book.finish_date, Some(finish_day));
        assert_eq!(book.status, BookStatus::Finished);
        assert!(!outcome.finished);
        assert_eq!(outcome.pages_advanced(), 0);
    }

    #[test]
    fn test_progress_without_known_total_never_finishes() {
        let mut book = Book::new("Serial".to_string());

        book.apply_progress(500, today()).unwrap();

        assert_eq!(book.status, BookStatus::Reading);
        assert!(book.finish_date.is_none());
    }

    #[test]
    fn test_manual_reopen_after_finish() {
        let mut book = book_with_total(300);
        book.apply_progress(300, today()).unwrap();

        book.set_status(BookStatus::Reading, today());

        assert_eq!(book.status, BookStatus::Reading);
        // Dates stay monotonic: neither stamp is cleared
        assert!(book.start_date.is_some());
        assert!(book.finish_date.is_some());
    }

    #[test]
    fn test_manual_status_to_reading_stamps_start_date() {
        let mut book = book_with_total(300);
        book.set_status(BookStatus::Reading, today());
        assert_eq!(book.start_date, Some(today()));
        assert_eq!(book.current_page, 0);
    }

    #[test]
    fn test_completion_percentage() {
        let mut book = book_with_total(200);
        book.current_page = 50;
        assert_eq!(book.completion_percentage(), Some(25.0));

        book.total_pages = None;
        assert_eq!(book.completion_percentage(), None);

        book.total_pages = Some(0);
        assert_eq!(book.completion_percentage(), None);
    }

    #[test]
    fn test_validation_blank_title() {
        let mut book = Book::new("   ".to_string());
        book.title = "   ".to_string();
        assert!(!book.is_valid());
    }

    #[test]
    fn test_validation_rating_bounds() {
        let mut book = Book::new("Test".to_string());
        book.rating = Some(6);
        assert!(!book.is_valid());
        book.rating = Some(5);
        assert!(book.is_valid());
    }

    #[test]
    fn test_validation_finish_before_start() {
        let mut book = Book::new("Test".to_string());
        book.start_date = NaiveDate::from_ymd_opt(2026, 4, 1);
        book.finish_date = NaiveDate::from_ymd_opt(2026, 3, 1);
        let violations = book.validate().unwrap_err();
        assert_eq!(violations[0].field, "finish_date");
    }

    #[test]
    fn test_validation_page_beyond_total() {
        let mut book = book_with_total(100);
        book.current_page = 150;
        assert!(!book.is_valid());
    }
}
