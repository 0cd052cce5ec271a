//! Reading session database operations

use crate::queries::datetime_from_millis;
use crate::DbPool;
use chrono::{DateTime, Utc};
use readstack_core::{AppError, BookId, ReadingMood, ReadingSession, SessionId};

/// Creates a new reading session
pub async fn create_session(pool: &DbPool, session: &ReadingSession) -> Result<(), AppError> {
    sqlx::query(
        r#"
        INSERT INTO reading_sessions (id, book_id, started_at, ended_at, pages_read, mood)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(session.id.as_string())
    .bind(session.book_id.as_string())
    .bind(session.started_at.timestamp_millis())
    .bind(session.ended_at.map(|t| t.timestamp_millis()))
    .bind(i64::from(session.pages_read))
    .bind(session.mood.map(|m| m.as_str()))
    .execute(pool)
    .await
    .map_err(|e| AppError::database("Failed to create reading session", e))?;

    Ok(())
}

/// Gets a session by ID
pub async fn get_session(pool: &DbPool, id: SessionId) -> Result<ReadingSession, AppError> {
    let row = sqlx::query(
        r#"
        SELECT id, book_id, started_at, ended_at, pages_read, mood
        FROM reading_sessions WHERE id = ?
        "#,
    )
    .bind(id.as_string())
    .fetch_optional(pool)
    .await
    .map_err(|e| AppError::database("Failed to fetch reading session", e))?
    .ok_or_else(|| AppError::not_found("session", id))?;

    row_to_session(row)
}

/// Closes an open session at the given end time
pub async fn end_session(
    pool: &DbPool,
    id: SessionId,
    ended_at: DateTime<Utc>,
) -> Result<(), AppError> {
    let result = sqlx::query(
        "UPDATE reading_sessions SET ended_at = ? WHERE id = ? AND ended_at IS NULL",
    )
    .bind(ended_at.timestamp_millis())
    .bind(id.as_string())
    .execute(pool)
    .await
    .map_err(|e| AppError::database("Failed to end reading session", e))?;

    if result.rows_affected() == 0 {
        // Either the id is unknown or the session is already closed
        let session = get_session(pool, id).await?;
        return Err(AppError::invalid_argument(
            "session",
            format!("session {} is already closed", session.id),
        ));
    }

    Ok(())
}

/// Deletes a session
pub async fn delete_session(pool: &DbPool, id: SessionId) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM reading_sessions WHERE id = ?")
        .bind(id.as_string())
        .execute(pool)
        .await
        .map_err(|e| AppError::database("Failed to delete reading session", e))?;

    if result.rows_affected() == 0 {
        return Err(AppError::not_found("session", id));
    }

    Ok(())
}

/// Lists the sessions of a book, most recent first
pub async fn sessions_for_book(
    pool: &DbPool,
    book_id: BookId,
) -> Result<Vec<ReadingSession>, AppError> {
    let rows = sqlx::query(
        r#"
        SELECT id, book_id, started_at, ended_at, pages_read, mood
        FROM reading_sessions
        WHERE book_id = ?
        ORDER BY started_at DESC, id
        "#,
    )
    .bind(book_id.as_string())
    .fetch_all(pool)
    .await
    .map_err(|e| AppError::database("Failed to list sessions for book", e))?;

    rows.into_iter().map(row_to_session).collect()
}

/// Counts the sessions of a book without loading them
pub async fn count_sessions_for_book(pool: &DbPool, book_id: BookId) -> Result<i64, AppError> {
    sqlx::query_scalar("SELECT COUNT(*) FROM reading_sessions WHERE book_id = ?")
        .bind(book_id.as_string())
        .fetch_one(pool)
        .await
        .map_err(|e| AppError::database("Failed to count sessions for book", e))
}

fn row_to_session(row: sqlx::sqlite::SqliteRow) -> Result<ReadingSession, AppError> {
    use sqlx::Row;

    let id_str: String = row
        .try_get("id")
        .map_err(|e| AppError::database("Missing session ID", e))?;
    let id = SessionId::from_string(&id_str)
        .map_err(|e| AppError::database("Invalid session ID", e))?;

    let book_id_str: String = row
        .try_get("book_id")
        .map_err(|e| AppError::database("Missing book ID", e))?;
    let book_id = BookId::from_string(&book_id_str)
        .map_err(|e| AppError::database("Invalid book ID", e))?;

    let started_at: i64 = row
        .try_get("started_at")
        .map_err(|e| AppError::database("Missing started_at", e))?;
    let ended_at: Option<i64> = row.try_get("ended_at").ok();
    let pages_read: i64 = row
        .try_get("pages_read")
        .map_err(|e| AppError::database("Missing pages_read", e))?;
    let mood: Option<String> = row.try_get("mood").ok();

    Ok(ReadingSession {
        id,
        book_id,
        started_at: datetime_from_millis(started_at),
        ended_at: ended_at.map(datetime_from_millis),
        pages_read: u32::try_from(pages_read).unwrap_or(0),
        mood: mood.as_deref().and_then(ReadingMood::from_str),
    })
}
