//! Book database operations

use crate::queries::{date_from_text, date_to_text, datetime_from_millis, map_write_error};
use crate::DbPool;
use readstack_core::{AppError, Book, BookId, BookStatus, ReadingSession};

/// Creates a new book in the database
pub async fn create_book(pool: &DbPool, book: &Book) -> Result<(), AppError> {
    sqlx::query(
        r#"
        INSERT INTO books (
            id, title, isbn, total_pages, current_page, status,
            publisher, published_date, description, rating, notes,
            start_date, finish_date, created_at, updated_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(book.id.as_string())
    .bind(&book.title)
    .bind(&book.isbn)
    .bind(book.total_pages.map(i64::from))
    .bind(i64::from(book.current_page))
    .bind(book.status.as_str())
    .bind(&book.publisher)
    .bind(date_to_text(book.published_date))
    .bind(&book.description)
    .bind(book.rating.map(i64::from))
    .bind(&book.notes)
    .bind(date_to_text(book.start_date))
    .bind(date_to_text(book.finish_date))
    .bind(book.created_at.timestamp_millis())
    .bind(book.updated_at.timestamp_millis())
    .execute(pool)
    .await
    .map_err(|e| map_write_error(e, "isbn", "a book with this ISBN already exists"))?;

    Ok(())
}

/// Gets a book by ID
pub async fn get_book(pool: &DbPool, id: BookId) -> Result<Book, AppError> {
    let row = sqlx::query(
        r#"
        SELECT id, title, isbn, total_pages, current_page, status,
               publisher, published_date, description, rating, notes,
               start_date, finish_date, created_at, updated_at
        FROM books WHERE id = ?
        "#,
    )
    .bind(id.as_string())
    .fetch_optional(pool)
    .await
    .map_err(|e| AppError::database("Failed to fetch book", e))?
    .ok_or_else(|| AppError::not_found("book", id))?;

    row_to_book(row)
}

/// Updates an existing book
pub async fn update_book(pool: &DbPool, book: &Book) -> Result<(), AppError> {
    let result = sqlx::query(
        r#"
        UPDATE books SET
            title = ?, isbn = ?, total_pages = ?, current_page = ?, status = ?,
            publisher = ?, published_date = ?, description = ?, rating = ?, notes = ?,
            start_date = ?, finish_date = ?, updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(&book.title)
    .bind(&book.isbn)
    .bind(book.total_pages.map(i64::from))
    .bind(i64::from(book.current_page))
    .bind(book.status.as_str())
    .bind(&book.publisher)
    .bind(date_to_text(book.published_date))
    .bind(&book.description)
    .bind(book.rating.map(i64::from))
    .bind(&book.notes)
    .bind(date_to_text(book.start_date))
    .bind(date_to_text(book.finish_date))
    .bind(book.updated_at.timestamp_millis())
    .bind(book.id.as_string())
    .execute(pool)
    .await
    .map_err(|e| map_write_error(e, "isbn", "a book with this ISBN already exists"))?;

    if result.rows_affected() == 0 {
        return Err(AppError::not_found("book", book.id));
    }

    Ok(())
}

/// Persists a progress update and its derived session in one transaction.
///
/// Either both rows land or neither does; concurrent readers never observe a
/// stamped date without the matching page count.
pub async fn apply_progress_update(
    pool: &DbPool,
    book: &Book,
    session: Option<&ReadingSession>,
) -> Result<(), AppError> {
    let mut tx = pool
        .begin()
        .await
        .map_err(|e| AppError::database("Failed to begin transaction", e))?;

    let result = sqlx::query(
        r#"
        UPDATE books SET
            current_page = ?, status = ?, start_date = ?, finish_date = ?, updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(i64::from(book.current_page))
    .bind(book.status.as_str())
    .bind(date_to_text(book.start_date))
    .bind(date_to_text(book.finish_date))
    .bind(book.updated_at.timestamp_millis())
    .bind(book.id.as_string())
    .execute(&mut *tx)
    .await
    .map_err(|e| AppError::database("Failed to update reading progress", e))?;

    if result.rows_affected() == 0 {
        return Err(AppError::not_found("book", book.id));
    }

    if let Some(session) = session {
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
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::database("Failed to record reading session", e))?;
    }

    tx.commit()
        .await
        .map_err(|e| AppError::database("Failed to commit progress update", e))?;

    Ok(())
}

/// Deletes a book; its sessions and relation rows cascade
pub async fn delete_book(pool: &DbPool, id: BookId) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM books WHERE id = ?")
        .bind(id.as_string())
        .execute(pool)
        .await
        .map_err(|e| AppError::database("Failed to delete book", e))?;

    if result.rows_affected() == 0 {
        return Err(AppError::not_found("book", id));
    }

    Ok(())
}

/// Lists all books, most recently added first
pub async fn list_books(pool: &DbPool) -> Result<Vec<Book>, AppError> {
    let rows = sqlx::query(
        r#"
        SELECT id, title, isbn, total_pages, current_page, status,
               publisher, published_date, description, rating, notes,
               start_date, finish_date, created_at, updated_at
        FROM books
        ORDER BY created_at DESC, id
        "#,
    )
    .fetch_all(pool)
    .await
    .map_err(|e| AppError::database("Failed to list books", e))?;

    rows.into_iter().map(row_to_book).collect()
}

/// Lists books in a given lifecycle status, by title
pub async fn list_books_by_status(
    pool: &DbPool,
    status: BookStatus,
) -> Result<Vec<Book>, AppError> {
    let rows = sqlx::query(
        r#"
        SELECT id, title, isbn, total_pages, current_page, status,
               publisher, published_date, description, rating, notes,
               start_date, finish_date, created_at, updated_at
        FROM books
        WHERE status = ?
        ORDER BY title
        "#,
    )
    .bind(status.as_str())
    .fetch_all(pool)
    .await
    .map_err(|e| AppError::database("Failed to list books by status", e))?;

    rows.into_iter().map(row_to_book).collect()
}

/// Converts a database row to a Book
pub(crate) fn row_to_book(row: sqlx::sqlite::SqliteRow) -> Result<Book, AppError> {
    use sqlx::Row;

    let id_str: String = row
        .try_get("id")
        .map_err(|e| AppError::database("Missing book ID", e))?;
    let id = BookId::from_string(&id_str).map_err(|e| AppError::database("Invalid book ID", e))?;

    let status_str: String = row
        .try_get("status")
        .map_err(|e| AppError::database("Missing status", e))?;
    let status = BookStatus::from_str(&status_str)
        .ok_or_else(|| AppError::internal(format!("Unknown book status '{}'", status_str)))?;

    let total_pages: Option<i64> = row.try_get("total_pages").ok();
    let current_page: i64 = row
        .try_get("current_page")
        .map_err(|e| AppError::database("Missing current page", e))?;
    let rating: Option<i64> = row.try_get("rating").ok();

    let created_at: i64 = row
        .try_get("created_at")
        .map_err(|e| AppError::database("Missing created_at", e))?;
    let updated_at: i64 = row
        .try_get("updated_at")
        .map_err(|e| AppError::database("Missing updated_at", e))?;

    Ok(Book {
        id,
        title: row
            .try_get("title")
            .map_err(|e| AppError::database("Missing title", e))?,
        isbn: row.try_get("isbn").ok(),
        total_pages: total_pages.and_then(|p| u32::try_from(p).ok()),
        current_page: u32::try_from(current_page).unwrap_or(0),
        status,
        publisher: row.try_get("publisher").ok(),
        published_date: date_from_text(row.try_get("published_date").ok()),
        description: row.try_get("description").ok(),
        rating: rating.filter(|&r| (1..=5).contains(&r)).map(|r| r as u8),
        notes: row.try_get("notes").ok(),
        start_date: date_from_text(row.try_get("start_date").ok()),
        finish_date: date_from_text(row.try_get("finish_date").ok()),
        created_at: datetime_from_millis(created_at),
        updated_at: datetime_from_millis(updated_at),
    })
}
