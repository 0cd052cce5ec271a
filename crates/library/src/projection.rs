//! Entity-to-response projection
//!
//! Projections are the read-side shapes returned by the service layer. All
//! derived fields (completion percentage, display names, age, popularity) are
//! computed here at read time and never persisted. Relations are projected
//! shallowly: a book carries author and genre summaries, never their own book
//! lists, so serialization cannot recurse.

use chrono::{DateTime, NaiveDate, Utc};
use readstack_core::{
    round_one_decimal, Author, AuthorId, Book, BookId, BookStatus, Genre, GenreId, ReadingMood,
    ReadingSession, SessionId,
};
use serde::{Deserialize, Serialize};

/// Shallow author reference embedded in a book response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorSummary {
    pub id: AuthorId,
    pub display_name: String,
}

/// Shallow genre reference embedded in a book response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenreSummary {
    pub id: GenreId,
    pub name: String,
}

/// Full book projection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookResponse {
    pub id: BookId,
    pub title: String,
    pub isbn: Option<String>,
    pub total_pages: Option<u32>,
    pub current_page: u32,
    pub status: BookStatus,
    pub publisher: Option<String>,
    pub published_date: Option<NaiveDate>,
    pub description: Option<String>,
    pub rating: Option<u8>,
    pub notes: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub finish_date: Option<NaiveDate>,
    /// current / total in percent, one decimal; absent when the total is
    /// unknown or zero
    pub completion_percentage: Option<f64>,
    pub authors: Vec<AuthorSummary>,
    pub genres: Vec<GenreSummary>,
    pub author_count: usize,
    pub genre_count: usize,
    pub session_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Full author projection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorResponse {
    pub id: AuthorId,
    pub first_name: String,
    pub last_name: String,
    pub display_name: String,
    pub biography: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub nationality: Option<String>,
    /// Whole years on the projection date; absent without a birth date
    pub age: Option<u32>,
    pub book_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Full genre projection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenreResponse {
    pub id: GenreId,
    pub name: String,
    pub description: Option<String>,
    pub book_count: i64,
    /// True when the book count exceeds the configured threshold
    pub popular: bool,
}

/// Full session projection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResponse {
    pub id: SessionId,
    pub book_id: BookId,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub pages_read: u32,
    pub mood: Option<ReadingMood>,
    pub in_progress: bool,
    /// Whole minutes between start and end; absent while in progress
    pub duration_minutes: Option<i64>,
}

/// Projects a book with its shallow relations
pub fn project_book(
    book: &Book,
    authors: &[Author],
    genres: &[Genre],
    session_count: i64,
) -> BookResponse {
    let authors: Vec<AuthorSummary> = authors
        .iter()
        .map(|a| AuthorSummary {
            id: a.id,
            display_name: a.display_name(),
        })
        .collect();
    let genres: Vec<GenreSummary> = genres
        .iter()
        .map(|g| GenreSummary {
            id: g.id,
            name: g.name.clone(),
        })
        .collect();

    BookResponse {
        id: book.id,
        title: book.title.clone(),
        isbn: book.isbn.clone(),
        total_pages: book.total_pages,
        current_page: book.current_page,
        status: book.status,
        publisher: book.publisher.clone(),
        published_date: book.published_date,
        description: book.description.clone(),
        rating: book.rating,
        notes: book.notes.clone(),
        start_date: book.start_date,
        finish_date: book.finish_date,
        completion_percentage: book.completion_percentage().map(round_one_decimal),
        author_count: authors.len(),
        genre_count: genres.len(),
        authors,
        genres,
        session_count,
        created_at: book.created_at,
        updated_at: book.updated_at,
    }
}

/// Projects an author; `today` anchors the derived age
pub fn project_author(author: &Author, book_count: i64, today: NaiveDate) -> AuthorResponse {
    AuthorResponse {
        id: author.id,
        first_name: author.first_name.clone(),
        last_name: author.last_name.clone(),
        display_name: author.display_name(),
        biography: author.biography.clone(),
        birth_date: author.birth_date,
        nationality: author.nationality.clone(),
        age: author.age_on(today),
        book_count,
        created_at: author.created_at,
        updated_at: author.updated_at,
    }
}

/// Projects a genre with its popularity flag
pub fn project_genre(genre: &Genre, book_count: i64, popular_threshold: i64) -> GenreResponse {
    GenreResponse {
        id: genre.id,
        name: genre.name.clone(),
        description: genre.description.clone(),
        book_count,
        popular: book_count > popular_threshold,
    }
}

/// Projects a reading session
pub fn project_session(session: &ReadingSession) -> SessionResponse {
    SessionResponse {
        id: session.id,
        book_id: session.book_id,
        started_at: session.started_at,
        ended_at: session.ended_at,
        pages_read: session.pages_read,
        mood: session.mood,
        in_progress: session.is_open(),
        duration_minutes: session
            .ended_at
            .map(|end| (end - session.started_at).num_minutes()),
    }
}
