//! The analytics aggregator
//!
//! Assembles the dashboard and statistics shapes from the database-side
//! grouping queries. All operations are read-only; averages over an empty
//! set stay absent rather than becoming zero.

use readstack_core::{
    round_one_decimal, AppError, DashboardSummary, GenrePopularity, MoodStatistics,
    YearlyProgress,
};
use readstack_database::queries::stats;
use readstack_database::DbPool;

/// Builds the dashboard summary: totals, per-status counts, completion rate,
/// and the page averages
pub async fn dashboard_summary(pool: &DbPool) -> Result<DashboardSummary, AppError> {
    let status_counts = stats::status_counts(pool).await?;
    let total_books = stats::total_books(pool).await?;
    let average_total_pages = stats::average_total_pages(pool).await?;
    let pages_per_day = stats::pages_per_day(pool).await?;

    Ok(DashboardSummary {
        total_books,
        completion_rate: status_counts.completion_rate(),
        status_counts,
        average_total_pages: average_total_pages.map(round_one_decimal),
        pages_per_day: pages_per_day.map(round_one_decimal),
    })
}

/// Books finished per calendar year over the full history, most recent first
pub async fn yearly_history(pool: &DbPool) -> Result<Vec<YearlyProgress>, AppError> {
    stats::finished_by_year(pool).await
}

/// Books finished within one calendar year
pub async fn yearly_progress(pool: &DbPool, year: i32) -> Result<YearlyProgress, AppError> {
    let books_finished = stats::finished_in_year(pool, year).await?;
    Ok(YearlyProgress {
        year,
        books_finished,
    })
}

/// Book count per genre, most popular first
pub async fn genre_popularity(pool: &DbPool) -> Result<Vec<GenrePopularity>, AppError> {
    stats::genre_popularity(pool).await
}

/// Session count and average pages per session for each observed mood
pub async fn mood_statistics(pool: &DbPool) -> Result<Vec<MoodStatistics>, AppError> {
    let mut observed = stats::mood_statistics(pool).await?;
    for entry in &mut observed {
        entry.average_pages = round_one_decimal(entry.average_pages);
    }
    Ok(observed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use readstack_core::{Book, BookStatus, ReadingMood, ReadingSession};
    use readstack_database::queries::{books, sessions};
    use readstack_database::{connect_memory, run_migrations};

    async fn setup() -> DbPool {
        let pool = connect_memory().await.expect("Failed to create test db");
        run_migrations(&pool).await.expect("Failed to migrate");
        pool
    }

    #[tokio::test]
    async fn test_empty_library_dashboard() {
        let pool = setup().await;

        let summary = dashboard_summary(&pool).await.unwrap();

        assert_eq!(summary.total_books, 0);
        assert_eq!(summary.completion_rate, 0.0);
        assert!(summary.average_total_pages.is_none());
        assert!(summary.pages_per_day.is_none());
    }

    #[tokio::test]
    async fn test_dashboard_counts_and_completion_rate() {
        let pool = setup().await;

        let mut finished = Book::new("Done".to_string());
        finished.total_pages = Some(100);
        finished.current_page = 100;
        finished.status = BookStatus::Finished;
        finished.start_date = NaiveDate::from_ymd_opt(2026, 1, 1);
        finished.finish_date = NaiveDate::from_ymd_opt(2026, 1, 5);
        books::create_book(&pool, &finished).await.unwrap();

        let mut reading = Book::new("Going".to_string());
        reading.total_pages = Some(250);
        reading.status = BookStatus::Reading;
        books::create_book(&pool, &reading).await.unwrap();

        books::create_book(&pool, &Book::new("Someday".to_string()))
            .await
            .unwrap();

        let summary = dashboard_summary(&pool).await.unwrap();
        assert_eq!(summary.total_books, 3);
        assert_eq!(summary.status_counts.finished, 1);
        assert_eq!(summary.status_counts.reading, 1);
        assert_eq!(summary.status_counts.wishlist, 1);
        assert_eq!(summary.completion_rate, 33.3);
        // Only the two books with known page counts enter the average
        assert_eq!(summary.average_total_pages, Some(175.0));
        // 100 pages over Jan 1..=Jan 5 inclusive
        assert_eq!(summary.pages_per_day, Some(20.0));
    }

    #[tokio::test]
    async fn test_yearly_progress_for_year_without_finishes() {
        let pool = setup().await;
        let result = yearly_progress(&pool, 2020).await.unwrap();
        assert_eq!(result.year, 2020);
        assert_eq!(result.books_finished, 0);
    }

    #[tokio::test]
    async fn test_mood_statistics_scenario() {
        let pool = setup().await;
        let book = Book::new("Moody".to_string());
        books::create_book(&pool, &book).await.unwrap();

        for (mood, pages) in [
            (Some(ReadingMood::Excited), 20),
            (Some(ReadingMood::Excited), 40),
            (Some(ReadingMood::Tired), 10),
            (None, 55),
        ] {
            let mut session = ReadingSession::from_progress(book.id, pages);
            session.mood = mood;
            sessions::create_session(&pool, &session).await.unwrap();
        }

        let stats = mood_statistics(&pool).await.unwrap();
        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0].mood, ReadingMood::Excited);
        assert_eq!(stats[0].session_count, 2);
        assert_eq!(stats[0].average_pages, 30.0);
        assert_eq!(stats[1].mood, ReadingMood::Tired);
        assert_eq!(stats[1].average_pages, 10.0);
    }
}
