//! Author database operations, including the book_authors relation

use crate::queries::{date_from_text, date_to_text, datetime_from_millis};
use crate::DbPool;
use readstack_core::{AppError, Author, AuthorId, BookId};

/// Creates a new author
pub async fn create_author(pool: &DbPool, author: &Author) -> Result<(), AppError> {
    sqlx::query(
        r#"
        INSERT INTO authors (
            id, first_name, last_name, biography, birth_date, nationality,
            created_at, updated_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(author.id.as_string())
    .bind(&author.first_name)
    .bind(&author.last_name)
    .bind(&author.biography)
    .bind(date_to_text(author.birth_date))
    .bind(&author.nationality)
    .bind(author.created_at.timestamp_millis())
    .bind(author.updated_at.timestamp_millis())
    .execute(pool)
    .await
    .map_err(|e| AppError::database("Failed to create author", e))?;

    Ok(())
}

/// Gets an author by ID
pub async fn get_author(pool: &DbPool, id: AuthorId) -> Result<Author, AppError> {
    let row = sqlx::query(
        r#"
        SELECT id, first_name, last_name, biography, birth_date, nationality,
               created_at, updated_at
        FROM authors WHERE id = ?
        "#,
    )
    .bind(id.as_string())
    .fetch_optional(pool)
    .await
    .map_err(|e| AppError::database("Failed to fetch author", e))?
    .ok_or_else(|| AppError::not_found("author", id))?;

    row_to_author(row)
}

/// Updates an existing author
pub async fn update_author(pool: &DbPool, author: &Author) -> Result<(), AppError> {
    let result = sqlx::query(
        r#"
        UPDATE authors SET
            first_name = ?, last_name = ?, biography = ?, birth_date = ?,
            nationality = ?, updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(&author.first_name)
    .bind(&author.last_name)
    .bind(&author.biography)
    .bind(date_to_text(author.birth_date))
    .bind(&author.nationality)
    .bind(author.updated_at.timestamp_millis())
    .bind(author.id.as_string())
    .execute(pool)
    .await
    .map_err(|e| AppError::database("Failed to update author", e))?;

    if result.rows_affected() == 0 {
        return Err(AppError::not_found("author", author.id));
    }

    Ok(())
}

/// Deletes an author; relation rows cascade
pub async fn delete_author(pool: &DbPool, id: AuthorId) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM authors WHERE id = ?")
        .bind(id.as_string())
        .execute(pool)
        .await
        .map_err(|e| AppError::database("Failed to delete author", e))?;

    if result.rows_affected() == 0 {
        return Err(AppError::not_found("author", id));
    }

    Ok(())
}

/// Lists all authors, by last name then first name
pub async fn list_authors(pool: &DbPool) -> Result<Vec<Author>, AppError> {
    let rows = sqlx::query(
        r#"
        SELECT id, first_name, last_name, biography, birth_date, nationality,
               created_at, updated_at
        FROM authors
        ORDER BY last_name, first_name
        "#,
    )
    .fetch_all(pool)
    .await
    .map_err(|e| AppError::database("Failed to list authors", e))?;

    rows.into_iter().map(row_to_author).collect()
}

/// Lists the authors attached to a book, by last name
pub async fn authors_for_book(pool: &DbPool, book_id: BookId) -> Result<Vec<Author>, AppError> {
    let rows = sqlx::query(
        r#"
        SELECT a.id, a.first_name, a.last_name, a.biography, a.birth_date,
               a.nationality, a.created_at, a.updated_at
        FROM authors a
        JOIN book_authors ba ON ba.author_id = a.id
        WHERE ba.book_id = ?
        ORDER BY a.last_name, a.first_name
        "#,
    )
    .bind(book_id.as_string())
    .fetch_all(pool)
    .await
    .map_err(|e| AppError::database("Failed to list authors for book", e))?;

    rows.into_iter().map(row_to_author).collect()
}

/// Attaches an author to a book; attaching twice is a no-op
pub async fn attach_author(pool: &DbPool, book_id: BookId, author_id: AuthorId) -> Result<(), AppError> {
    sqlx::query(
        r#"
        INSERT INTO book_authors (book_id, author_id) VALUES (?, ?)
        ON CONFLICT (book_id, author_id) DO NOTHING
        "#,
    )
    .bind(book_id.as_string())
    .bind(author_id.as_string())
    .execute(pool)
    .await
    .map_err(|e| AppError::database("Failed to attach author to book", e))?;

    Ok(())
}

/// Detaches an author from a book
pub async fn detach_author(pool: &DbPool, book_id: BookId, author_id: AuthorId) -> Result<(), AppError> {
    sqlx::query("DELETE FROM book_authors WHERE book_id = ? AND author_id = ?")
        .bind(book_id.as_string())
        .bind(author_id.as_string())
        .execute(pool)
        .await
        .map_err(|e| AppError::database("Failed to detach author from book", e))?;

    Ok(())
}

/// Counts the authors attached to a book without loading them
pub async fn count_authors_for_book(pool: &DbPool, book_id: BookId) -> Result<i64, AppError> {
    sqlx::query_scalar("SELECT COUNT(*) FROM book_authors WHERE book_id = ?")
        .bind(book_id.as_string())
        .fetch_one(pool)
        .await
        .map_err(|e| AppError::database("Failed to count authors for book", e))
}

/// Counts the books attached to an author without loading them
pub async fn count_books_for_author(pool: &DbPool, author_id: AuthorId) -> Result<i64, AppError> {
    sqlx::query_scalar("SELECT COUNT(*) FROM book_authors WHERE author_id = ?")
        .bind(author_id.as_string())
        .fetch_one(pool)
        .await
        .map_err(|e| AppError::database("Failed to count books for author", e))
}

fn row_to_author(row: sqlx::sqlite::SqliteRow) -> Result<Author, AppError> {
    use sqlx::Row;

    let id_str: String = row
        .try_get("id")
        .map_err(|e| AppError::database("Missing author ID", e))?;
    let id =
        AuthorId::from_string(&id_str).map_err(|e| AppError::database("Invalid author ID", e))?;

    let created_at: i64 = row
        .try_get("created_at")
        .map_err(|e| AppError::database("Missing created_at", e))?;
    let updated_at: i64 = row
        .try_get("updated_at")
        .map_err(|e| AppError::database("Missing updated_at", e))?;

    Ok(Author {
        id,
        first_name: row
            .try_get("first_name")
            .map_err(|e| AppError::database("Missing first name", e))?,
        last_name: row
            .try_get("last_name")
            .map_err(|e| AppError::database("Missing last name", e))?,
        biography: row.try_get("biography").ok(),
        birth_date: date_from_text(row.try_get("birth_date").ok()),
        nationality: row.try_get("nationality").ok(),
        created_at: datetime_from_millis(created_at),
        updated_at: datetime_from_millis(updated_at),
    })
}
