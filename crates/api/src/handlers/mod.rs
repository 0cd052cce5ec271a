//! Request handlers, one module per resource

pub mod authors;
pub mod books;
pub mod genres;
pub mod lookup;
pub mod sessions;
pub mod stats;

use crate::error::ApiError;
use readstack_core::{AppError, AuthorId, BookId, GenreId, SessionId};

pub(crate) fn parse_book_id(raw: &str) -> Result<BookId, ApiError> {
    BookId::from_string(raw)
        .map_err(|_| ApiError(AppError::invalid_argument("id", "not a valid book id")))
}

pub(crate) fn parse_author_id(raw: &str) -> Result<AuthorId, ApiError> {
    AuthorId::from_string(raw)
        .map_err(|_| ApiError(AppError::invalid_argument("id", "not a valid author id")))
}

pub(crate) fn parse_genre_id(raw: &str) -> Result<GenreId, ApiError> {
    GenreId::from_string(raw)
        .map_err(|_| ApiError(AppError::invalid_argument("id", "not a valid genre id")))
}

pub(crate) fn parse_session_id(raw: &str) -> Result<SessionId, ApiError> {
    SessionId::from_string(raw)
        .map_err(|_| ApiError(AppError::invalid_argument("id", "not a valid session id")))
}
