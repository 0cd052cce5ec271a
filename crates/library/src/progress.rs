//! The book lifecycle engine
//!
//! Wraps the pure state machine on `Book` with the fetch / persist cycle:
//! read the current row, apply the transition rules, and write the page,
//! status, dates, and derived session in one transaction.

use chrono::Utc;
use log::{debug, info};
use readstack_core::{AppError, Book, BookId, BookStatus, ReadingSession};
use readstack_database::queries::books;
use readstack_database::DbPool;

/// Applies a progress update to a book.
///
/// Fails with NotFound when the id does not resolve and InvalidArgument when
/// the page exceeds the known total; a failed update leaves the stored book
/// unmodified. A successful update that advances the page also records a
/// reading session carrying the delta, in the same transaction.
pub async fn update_progress(
    pool: &DbPool,
    book_id: BookId,
    new_page: u32,
) -> Result<Book, AppError> {
    let mut book = books::get_book(pool, book_id).await?;

    let today = Utc::now().date_naive();
    let outcome = book.apply_progress(new_page, today)?;

    let session = if outcome.pages_advanced() > 0 {
        Some(ReadingSession::from_progress(book.id, outcome.pages_advanced()))
    } else {
        None
    };

    books::apply_progress_update(pool, &book, session.as_ref()).await?;

    if outcome.finished {
        info!("Finished '{}' ({} pages)", book.title, book.current_page);
    } else if outcome.started_reading {
        info!("Started reading '{}'", book.title);
    } else {
        debug!(
            "Progress on '{}': page {} -> {}",
            book.title, outcome.previous_page, outcome.current_page
        );
    }

    Ok(book)
}

/// Sets a book's status directly.
///
/// Manual transitions never touch the page counter and are sticky: a later
/// progress update will not auto-revert them. Moving into READING or FINISHED
/// stamps the matching date if it was never set.
pub async fn change_status(
    pool: &DbPool,
    book_id: BookId,
    status: BookStatus,
) -> Result<Book, AppError> {
    let mut book = books::get_book(pool, book_id).await?;

    book.set_status(status, Utc::now().date_naive());
    books::update_book(pool, &book).await?;

    info!("Status of '{}' set to {}", book.title, status);

    Ok(book)
}
