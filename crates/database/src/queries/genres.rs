//! Genre database operations, including normalized lookup-or-create

use crate::queries::datetime_from_millis;
use crate::DbPool;
use readstack_core::{normalize_genre_name, AppError, BookId, Genre, GenreId};

/// Gets a genre by ID
pub async fn get_genre(pool: &DbPool, id: GenreId) -> Result<Genre, AppError> {
    let row = sqlx::query(
        "SELECT id, name, description, created_at, updated_at FROM genres WHERE id = ?",
    )
    .bind(id.as_string())
    .fetch_optional(pool)
    .await
    .map_err(|e| AppError::database("Failed to fetch genre", e))?
    .ok_or_else(|| AppError::not_found("genre", id))?;

    row_to_genre(row)
}

/// Gets a genre by its normalized name
pub async fn get_genre_by_name(pool: &DbPool, name: &str) -> Result<Option<Genre>, AppError> {
    let normalized = normalize_genre_name(name);
    let row = sqlx::query(
        "SELECT id, name, description, created_at, updated_at FROM genres WHERE name = ?",
    )
    .bind(&normalized)
    .fetch_optional(pool)
    .await
    .map_err(|e| AppError::database("Failed to fetch genre by name", e))?;

    row.map(row_to_genre).transpose()
}

/// Finds the genre with the given (free-text) name, creating it when absent.
///
/// The normalized name is the dedup key. Safe under concurrent creation: the
/// insert defers to the UNIQUE constraint and the loser re-reads the winning
/// row instead of erroring.
pub async fn find_or_create_genre(pool: &DbPool, name: &str) -> Result<Genre, AppError> {
    let candidate = Genre::new(name);

    sqlx::query(
        r#"
        INSERT INTO genres (id, name, description, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?)
        ON CONFLICT (name) DO NOTHING
        "#,
    )
    .bind(candidate.id.as_string())
    .bind(&candidate.name)
    .bind(&candidate.description)
    .bind(candidate.created_at.timestamp_millis())
    .bind(candidate.updated_at.timestamp_millis())
    .execute(pool)
    .await
    .map_err(|e| AppError::database("Failed to create genre", e))?;

    get_genre_by_name(pool, &candidate.name)
        .await?
        .ok_or_else(|| AppError::internal("Genre vanished between insert and re-read"))
}

/// Deletes a genre; relation rows cascade
pub async fn delete_genre(pool: &DbPool, id: GenreId) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM genres WHERE id = ?")
        .bind(id.as_string())
        .execute(pool)
        .await
        .map_err(|e| AppError::database("Failed to delete genre", e))?;

    if result.rows_affected() == 0 {
        return Err(AppError::not_found("genre", id));
    }

    Ok(())
}

/// Lists all genres, by name
pub async fn list_genres(pool: &DbPool) -> Result<Vec<Genre>, AppError> {
    let rows = sqlx::query(
        "SELECT id, name, description, created_at, updated_at FROM genres ORDER BY name",
    )
    .fetch_all(pool)
    .await
    .map_err(|e| AppError::database("Failed to list genres", e))?;

    rows.into_iter().map(row_to_genre).collect()
}

/// Lists the genres attached to a book, by name
pub async fn genres_for_book(pool: &DbPool, book_id: BookId) -> Result<Vec<Genre>, AppError> {
    let rows = sqlx::query(
        r#"
        SELECT g.id, g.name, g.description, g.created_at, g.updated_at
        FROM genres g
        JOIN book_genres bg ON bg.genre_id = g.id
        WHERE bg.book_id = ?
        ORDER BY g.name
        "#,
    )
    .bind(book_id.as_string())
    .fetch_all(pool)
    .await
    .map_err(|e| AppError::database("Failed to list genres for book", e))?;

    rows.into_iter().map(row_to_genre).collect()
}

/// Attaches a genre to a book; attaching twice is a no-op
pub async fn attach_genre(pool: &DbPool, book_id: BookId, genre_id: GenreId) -> Result<(), AppError> {
    sqlx::query(
        r#"
        INSERT INTO book_genres (book_id, genre_id) VALUES (?, ?)
        ON CONFLICT (book_id, genre_id) DO NOTHING
        "#,
    )
    .bind(book_id.as_string())
    .bind(genre_id.as_string())
    .execute(pool)
    .await
    .map_err(|e| AppError::database("Failed to attach genre to book", e))?;

    Ok(())
}

/// Detaches a genre from a book
pub async fn detach_genre(pool: &DbPool, book_id: BookId, genre_id: GenreId) -> Result<(), AppError> {
    sqlx::query("DELETE FROM book_genres WHERE book_id = ? AND genre_id = ?")
        .bind(book_id.as_string())
        .bind(genre_id.as_string())
        .execute(pool)
        .await
        .map_err(|e| AppError::database("Failed to detach genre from book", e))?;

    Ok(())
}

/// Counts the genres attached to a book without loading them
pub async fn count_genres_for_book(pool: &DbPool, book_id: BookId) -> Result<i64, AppError> {
    sqlx::query_scalar("SELECT COUNT(*) FROM book_genres WHERE book_id = ?")
        .bind(book_id.as_string())
        .fetch_one(pool)
        .await
        .map_err(|e| AppError::database("Failed to count genres for book", e))
}

/// Counts the books carrying a genre without loading them
pub async fn count_books_for_genre(pool: &DbPool, genre_id: GenreId) -> Result<i64, AppError> {
    sqlx::query_scalar("SELECT COUNT(*) FROM book_genres WHERE genre_id = ?")
        .bind(genre_id.as_string())
        .fetch_one(pool)
        .await
        .map_err(|e| AppError::database("Failed to count books for genre", e))
}

fn row_to_genre(row: sqlx::sqlite::SqliteRow) -> Result<Genre, AppError> {
    use sqlx::Row;

    let id_str: String = row
        .try_get("id")
        .map_err(|e| AppError::database("Missing genre ID", e))?;
    let id =
        GenreId::from_string(&id_str).map_err(|e| AppError::database("Invalid genre ID", e))?;

    let created_at: i64 = row
        .try_get("created_at")
        .map_err(|e| AppError::database("Missing created_at", e))?;
    let updated_at: i64 = row
        .try_get("updated_at")
        .map_err(|e| AppError::database("Missing updated_at", e))?;

    Ok(Genre {
        id,
        name: row
            .try_get("name")
            .map_err(|e| AppError::database("Missing genre name", e))?,
        description: row.try_get("description").ok(),
        created_at: datetime_from_millis(created_at),
        updated_at: datetime_from_millis(updated_at),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::connect_memory;
    use crate::migrations::run_migrations;
    use crate::queries::books::create_book;
    use readstack_core::Book;

    async fn setup() -> DbPool {
        let pool = connect_memory().await.expect("Failed to create test db");
        run_migrations(&pool).await.expect("Failed to migrate");
        pool
    }

    #[tokio::test]
    async fn test_find_or_create_creates_once() {
        let pool = setup().await;

        let first = find_or_create_genre(&pool, "Science Fiction").await.unwrap();
        let second = find_or_create_genre(&pool, "sci-fi").await.unwrap();
        let third = find_or_create_genre(&pool, "SCIFI").await.unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(second.id, third.id);
        assert_eq!(first.name, "Science Fiction");

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM genres")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn test_concurrent_create_yields_one_row() {
        // Two writers race on variant spellings of the same genre; the UNIQUE
        // constraint arbitrates and the loser re-reads the winning row
        let temp = tempfile::NamedTempFile::new().unwrap();
        let config = crate::connection::DatabaseConfig::new(temp.path().to_str().unwrap());
        let pool = crate::connection::connect(&config).await.unwrap();
        run_migrations(&pool).await.unwrap();

        let first = {
            let pool = pool.clone();
            tokio::spawn(async move { find_or_create_genre(&pool, "Science Fiction").await })
        };
        let second = {
            let pool = pool.clone();
            tokio::spawn(async move { find_or_create_genre(&pool, "sci-fi").await })
        };

        let first = first.await.unwrap().unwrap();
        let second = second.await.unwrap().unwrap();
        assert_eq!(first.id, second.id);

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM genres")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn test_variant_spellings_share_one_row_across_books() {
        let pool = setup().await;
        let first_book = Book::new("Left Hand".to_string());
        let second_book = Book::new("Neuromancer".to_string());
        create_book(&pool, &first_book).await.unwrap();
        create_book(&pool, &second_book).await.unwrap();

        let g1 = find_or_create_genre(&pool, "Science Fiction").await.unwrap();
        attach_genre(&pool, first_book.id, g1.id).await.unwrap();
        let g2 = find_or_create_genre(&pool, "sci-fi").await.unwrap();
        attach_genre(&pool, second_book.id, g2.id).await.unwrap();

        assert_eq!(g1.id, g2.id);
        assert_eq!(count_books_for_genre(&pool, g1.id).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_get_genre_by_name_normalizes_lookup() {
        let pool = setup().await;
        find_or_create_genre(&pool, "Young Adult").await.unwrap();

        let found = get_genre_by_name(&pool, "ya").await.unwrap();
        assert!(found.is_some());
        assert_eq!(found.unwrap().name, "Young Adult");

        let missing = get_genre_by_name(&pool, "Horror").await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_get_missing_genre_is_not_found() {
        let pool = setup().await;
        let err = get_genre(&pool, GenreId::new()).await.unwrap_err();
        assert_eq!(err.code(), "GENRE_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_list_genres_ordered_by_name() {
        let pool = setup().await;
        find_or_create_genre(&pool, "mystery").await.unwrap();
        find_or_create_genre(&pool, "fantasy").await.unwrap();

        let genres = list_genres(&pool).await.unwrap();
        assert_eq!(genres.len(), 2);
        assert_eq!(genres[0].name, "Fantasy");
        assert_eq!(genres[1].name, "Mystery");
    }

    #[tokio::test]
    async fn test_attach_and_detach_genre() {
        let pool = setup().await;
        let book = Book::new("Dune".to_string());
        create_book(&pool, &book).await.unwrap();
        let genre = find_or_create_genre(&pool, "sci-fi").await.unwrap();

        attach_genre(&pool, book.id, genre.id).await.unwrap();
        attach_genre(&pool, book.id, genre.id).await.unwrap();
        assert_eq!(count_genres_for_book(&pool, book.id).await.unwrap(), 1);

        let attached = genres_for_book(&pool, book.id).await.unwrap();
        assert_eq!(attached[0].name, "Science Fiction");

        detach_genre(&pool, book.id, genre.id).await.unwrap();
        assert_eq!(count_genres_for_book(&pool, book.id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_delete_genre() {
        let pool = setup().await;
        let genre = find_or_create_genre(&pool, "Horror").await.unwrap();
        delete_genre(&pool, genre.id).await.unwrap();
        assert!(get_genre(&pool, genre.id).await.is_err());
    }
}
