//! Aggregate statistics queries
//!
//! Everything in this module is read-only and deterministic for a stable
//! snapshot: grouping happens database-side and orderings are total (ties
//! always broken by name or id).

use crate::DbPool;
use readstack_core::{
    AppError, BookStatus, GenreId, GenrePopularity, MoodStatistics, ReadingMood, StatusCounts,
    YearlyProgress,
};
use sqlx::Row;

/// Total number of books
pub async fn total_books(pool: &DbPool) -> Result<i64, AppError> {
    sqlx::query_scalar("SELECT COUNT(*) FROM books")
        .fetch_one(pool)
        .await
        .map_err(|e| AppError::database("Failed to count books", e))
}

/// Book counts grouped by lifecycle status
pub async fn status_counts(pool: &DbPool) -> Result<StatusCounts, AppError> {
    let rows = sqlx::query("SELECT status, COUNT(*) AS n FROM books GROUP BY status")
        .fetch_all(pool)
        .await
        .map_err(|e| AppError::database("Failed to count books by status", e))?;

    let mut counts = StatusCounts::default();
    for row in rows {
        let status: String = row
            .try_get("status")
            .map_err(|e| AppError::database("Missing status", e))?;
        let n: i64 = row
            .try_get("n")
            .map_err(|e| AppError::database("Missing count", e))?;
        match BookStatus::from_str(&status) {
            Some(BookStatus::Reading) => counts.reading = n,
            Some(BookStatus::Finished) => counts.finished = n,
            Some(BookStatus::Wishlist) => counts.wishlist = n,
            Some(BookStatus::Abandoned) => counts.abandoned = n,
            Some(BookStatus::OnHold) => counts.on_hold = n,
            None => {
                return Err(AppError::internal(format!(
                    "Unknown book status '{}' in aggregation",
                    status
                )))
            }
        }
    }

    Ok(counts)
}

/// Average total pages over books with a known page count.
///
/// None when no book has a page count, so callers can tell "no data" from
/// "average is zero".
pub async fn average_total_pages(pool: &DbPool) -> Result<Option<f64>, AppError> {
    sqlx::query_scalar("SELECT AVG(total_pages) FROM books WHERE total_pages IS NOT NULL")
        .fetch_one(pool)
        .await
        .map_err(|e| AppError::database("Failed to average page counts", e))
}

/// Average pages read per day over finished books with both dates and a
/// known page count. The day span is inclusive, so a same-day read counts
/// as one day.
pub async fn pages_per_day(pool: &DbPool) -> Result<Option<f64>, AppError> {
    sqlx::query_scalar(
        r#"
        SELECT AVG(CAST(total_pages AS REAL) /
                   (julianday(finish_date) - julianday(start_date) + 1))
        FROM books
        WHERE status = 'finished'
          AND total_pages IS NOT NULL
          AND start_date IS NOT NULL
          AND finish_date IS NOT NULL
          AND finish_date >= start_date
        "#,
    )
    .fetch_one(pool)
    .await
    .map_err(|e| AppError::database("Failed to compute reading pace", e))
}

/// Books finished per calendar year, most recent year first
pub async fn finished_by_year(pool: &DbPool) -> Result<Vec<YearlyProgress>, AppError> {
    let rows = sqlx::query(
        r#"
        SELECT CAST(strftime('%Y', finish_date) AS INTEGER) AS year, COUNT(*) AS n
        FROM books
        WHERE status = 'finished' AND finish_date IS NOT NULL
        GROUP BY year
        ORDER BY year DESC
        "#,
    )
    .fetch_all(pool)
    .await
    .map_err(|e| AppError::database("Failed to group finished books by year", e))?;

    rows.into_iter()
        .map(|row| {
            let year: i64 = row
                .try_get("year")
                .map_err(|e| AppError::database("Missing year", e))?;
            let n: i64 = row
                .try_get("n")
                .map_err(|e| AppError::database("Missing count", e))?;
            Ok(YearlyProgress {
                year: year as i32,
                books_finished: n,
            })
        })
        .collect()
}

/// Books finished within one calendar year
pub async fn finished_in_year(pool: &DbPool, year: i32) -> Result<i64, AppError> {
    sqlx::query_scalar(
        r#"
        SELECT COUNT(*)
        FROM books
        WHERE status = 'finished'
          AND finish_date IS NOT NULL
          AND CAST(strftime('%Y', finish_date) AS INTEGER) = ?
        "#,
    )
    .bind(i64::from(year))
    .fetch_one(pool)
    .await
    .map_err(|e| AppError::database("Failed to count finished books for year", e))
}

/// Book count per genre, descending by count, ties broken by name
pub async fn genre_popularity(pool: &DbPool) -> Result<Vec<GenrePopularity>, AppError> {
    let rows = sqlx::query(
        r#"
        SELECT g.id AS id, g.name AS name, COUNT(bg.book_id) AS n
        FROM genres g
        LEFT JOIN book_genres bg ON bg.genre_id = g.id
        GROUP BY g.id, g.name
        ORDER BY n DESC, g.name ASC
        "#,
    )
    .fetch_all(pool)
    .await
    .map_err(|e| AppError::database("Failed to rank genres", e))?;

    rows.into_iter()
        .map(|row| {
            let id_str: String = row
                .try_get("id")
                .map_err(|e| AppError::database("Missing genre ID", e))?;
            let genre_id = GenreId::from_string(&id_str)
                .map_err(|e| AppError::database("Invalid genre ID", e))?;
            let name: String = row
                .try_get("name")
                .map_err(|e| AppError::database("Missing genre name", e))?;
            let n: i64 = row
                .try_get("n")
                .map_err(|e| AppError::database("Missing count", e))?;
            Ok(GenrePopularity {
                genre_id,
                name,
                book_count: n,
            })
        })
        .collect()
}

/// Session count and average pages per session, per observed mood.
///
/// Moods with no sessions are omitted, not zero-filled.
pub async fn mood_statistics(pool: &DbPool) -> Result<Vec<MoodStatistics>, AppError> {
    let rows = sqlx::query(
        r#"
        SELECT mood, COUNT(*) AS n, AVG(pages_read) AS avg_pages
        FROM reading_sessions
        WHERE mood IS NOT NULL
        GROUP BY mood
        ORDER BY n DESC, mood ASC
        "#,
    )
    .fetch_all(pool)
    .await
    .map_err(|e| AppError::database("Failed to group sessions by mood", e))?;

    rows.into_iter()
        .map(|row| {
            let mood_str: String = row
                .try_get("mood")
                .map_err(|e| AppError::database("Missing mood", e))?;
            let mood = ReadingMood::from_str(&mood_str).ok_or_else(|| {
                AppError::internal(format!("Unknown mood '{}' in aggregation", mood_str))
            })?;
            let n: i64 = row
                .try_get("n")
                .map_err(|e| AppError::database("Missing count", e))?;
            let avg_pages: f64 = row
                .try_get("avg_pages")
                .map_err(|e| AppError::database("Missing average", e))?;
            Ok(MoodStatistics {
                mood,
                session_count: n,
                average_pages: avg_pages,
            })
        })
        .collect()
}
