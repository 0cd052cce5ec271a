//! Route table

use crate::error::attach_error_path;
use crate::handlers::{authors, books, genres, lookup, sessions, stats};
use crate::state::AppState;
use axum::routing::{get, post, put};
use axum::{middleware, Router};

/// Builds the full application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/books", get(books::list_books).post(books::create_book))
        .route(
            "/books/:id",
            get(books::get_book)
                .put(books::update_book)
                .delete(books::delete_book),
        )
        .route("/books/:id/progress", put(books::update_progress))
        .route("/books/:id/status", put(books::change_status))
        .route(
            "/books/:id/authors/:author_id",
            post(books::attach_author).delete(books::detach_author),
        )
        .route("/books/:id/genres", post(books::add_genre))
        .route("/books/:id/genres/:genre_id", axum::routing::delete(books::remove_genre))
        .route(
            "/books/:id/sessions",
            get(sessions::list_sessions).post(sessions::start_session),
        )
        .route(
            "/authors",
            get(authors::list_authors).post(authors::create_author),
        )
        .route(
            "/authors/:id",
            get(authors::get_author)
                .put(authors::update_author)
                .delete(authors::delete_author),
        )
        .route("/genres", get(genres::list_genres))
        .route(
            "/genres/:id",
            get(genres::get_genre).delete(genres::delete_genre),
        )
        .route("/sessions/:id/end", put(sessions::end_session))
        .route("/stats/dashboard", get(stats::dashboard))
        .route("/stats/yearly", get(stats::yearly_history))
        .route("/stats/yearly/:year", get(stats::yearly_progress))
        .route("/stats/genres", get(stats::genre_popularity))
        .route("/stats/moods", get(stats::mood_statistics))
        .route("/lookup", get(lookup::search))
        .route("/lookup/:volume_id", get(lookup::fetch))
        .layer(middleware::from_fn(attach_error_path))
        .with_state(state)
}
