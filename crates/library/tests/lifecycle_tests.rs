//! End-to-end service tests over an in-memory database

use chrono::{Datelike, Utc};
use readstack_core::{BookStatus, ReadingMood};
use readstack_database::{connect_memory, run_migrations};
use readstack_library::{LibraryManager, NewBook, NewSession};

async fn manager() -> LibraryManager {
    let pool = connect_memory().await.expect("Failed to create test db");
    run_migrations(&pool).await.expect("Failed to migrate");
    LibraryManager::with_pool(pool, 5)
}

#[tokio::test]
async fn test_three_hundred_page_walkthrough() {
    let manager = manager().await;
    let today = Utc::now().date_naive();

    let mut request = NewBook::titled("The Long Walk");
    request.total_pages = Some(300);
    let book = manager.create_book(request).await.unwrap();
    assert_eq!(book.status, BookStatus::Wishlist);

    // Progress to 50: reading, start date = today
    let book = manager.update_progress(book.id, 50).await.unwrap();
    assert_eq!(book.status, BookStatus::Reading);
    assert_eq!(book.start_date, Some(today));

    // Progress to 300: finished, finish date = today, finish >= start
    let book = manager.update_progress(book.id, 300).await.unwrap();
    assert_eq!(book.status, BookStatus::Finished);
    assert_eq!(book.finish_date, Some(today));
    assert!(book.finish_date >= book.start_date);

    // Progress to 301: rejected, book unchanged
    let err = manager.update_progress(book.id, 301).await.unwrap_err();
    assert_eq!(err.code(), "INVALID_ARGUMENT");
    let unchanged = manager.get_book(book.id).await.unwrap();
    assert_eq!(unchanged.current_page, 300);
    assert_eq!(unchanged.status, BookStatus::Finished);
}

#[tokio::test]
async fn test_finished_book_shows_up_in_yearly_progress() {
    let manager = manager().await;
    let year = Utc::now().date_naive().year();

    let mut request = NewBook::titled("Quick Read");
    request.total_pages = Some(120);
    let book = manager.create_book(request).await.unwrap();
    manager.update_progress(book.id, 120).await.unwrap();

    let progress = manager.yearly_progress(year).await.unwrap();
    assert_eq!(progress.books_finished, 1);

    let history = manager.yearly_history().await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].year, year);
}

#[tokio::test]
async fn test_dashboard_tracks_progress_sessions_and_moods() {
    let manager = manager().await;

    let mut request = NewBook::titled("Tracked");
    request.total_pages = Some(200);
    let book = manager.create_book(request).await.unwrap();

    manager.update_progress(book.id, 80).await.unwrap();

    let mut session = NewSession::default();
    session.pages_read = 20;
    session.mood = Some(ReadingMood::Focused);
    let open = manager.start_session(book.id, session).await.unwrap();
    manager.end_session(open.id).await.unwrap();

    let summary = manager.dashboard().await.unwrap();
    assert_eq!(summary.total_books, 1);
    assert_eq!(summary.status_counts.reading, 1);
    assert_eq!(summary.completion_rate, 0.0);

    let moods = manager.mood_statistics().await.unwrap();
    assert_eq!(moods.len(), 1);
    assert_eq!(moods[0].mood, ReadingMood::Focused);
    assert_eq!(moods[0].average_pages, 20.0);

    // Progress sessions carry no mood and stay out of the mood statistics
    let sessions = manager.list_sessions(book.id).await.unwrap();
    assert_eq!(sessions.len(), 2);
}

#[tokio::test]
async fn test_deleting_a_book_removes_its_sessions_but_not_shared_rows() {
    let manager = manager().await;

    let keep = manager.create_book(NewBook::titled("Keeper")).await.unwrap();
    let doomed = manager.create_book(NewBook::titled("Dropper")).await.unwrap();

    manager.add_genre_to_book(keep.id, "horror").await.unwrap();
    let genre = manager.add_genre_to_book(doomed.id, "horror").await.unwrap();
    manager
        .start_session(doomed.id, NewSession::default())
        .await
        .unwrap();

    manager.delete_book(doomed.id).await.unwrap();

    // The shared genre row survives with the remaining book attached
    let genre = manager.get_genre(genre.id).await.unwrap();
    assert_eq!(genre.book_count, 1);

    let summary = manager.dashboard().await.unwrap();
    assert_eq!(summary.total_books, 1);
}
