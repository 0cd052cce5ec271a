//! High-level library management
//!
//! `LibraryManager` is the service layer: it validates change sets, applies
//! them read-modify-write against the database crate, and returns response
//! projections. Each public operation is one request-scoped unit of work.

use crate::changes::{NewAuthor, NewBook, NewSession, UpdateAuthor, UpdateBook};
use crate::projection::{
    project_author, project_book, project_genre, project_session, AuthorResponse, BookResponse,
    GenreResponse, SessionResponse,
};
use crate::{analytics, progress};
use chrono::Utc;
use log::info;
use readstack_core::{
    AppError, Author, AuthorId, Book, BookId, BookStatus, DashboardSummary, Genre,
    GenrePopularity, GenreId, MoodStatistics, ReadingSession, SessionId, Validator,
    YearlyProgress,
};
use readstack_database::queries::{authors, books, genres, sessions};
use readstack_database::{connect, run_migrations, DatabaseConfig, DbPool};

/// Library configuration
#[derive(Debug, Clone)]
pub struct LibraryConfig {
    /// Path to the SQLite database file
    pub database_path: String,
    /// A genre is flagged popular when its book count exceeds this
    pub popular_genre_threshold: i64,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            database_path: "readstack.db".to_string(),
            popular_genre_threshold: 5,
        }
    }
}

/// The service layer over books, authors, genres, and sessions
pub struct LibraryManager {
    pool: DbPool,
    popular_genre_threshold: i64,
}

impl LibraryManager {
    /// Creates a new library manager, connecting and migrating the database
    pub async fn new(config: LibraryConfig) -> Result<Self, AppError> {
        info!(
            "Initializing library with database: {}",
            config.database_path
        );

        let db_config = DatabaseConfig::new(&config.database_path);
        let pool = connect(&db_config).await?;
        run_migrations(&pool).await?;

        Ok(Self {
            pool,
            popular_genre_threshold: config.popular_genre_threshold,
        })
    }

    /// Wraps an existing pool; the caller is responsible for migrations
    pub fn with_pool(pool: DbPool, popular_genre_threshold: i64) -> Self {
        Self {
            pool,
            popular_genre_threshold,
        }
    }

    /// The underlying connection pool
    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    // ===== Books =====

    /// Creates a book from a creation request
    pub async fn create_book(&self, request: NewBook) -> Result<BookResponse, AppError> {
        let book = request.into_book();
        book.validate().map_err(AppError::validation)?;

        books::create_book(&self.pool, &book).await?;
        info!("Added book '{}'", book.title);

        self.book_response(&book).await
    }

    /// Gets a book projection by id
    pub async fn get_book(&self, id: BookId) -> Result<BookResponse, AppError> {
        let book = books::get_book(&self.pool, id).await?;
        self.book_response(&book).await
    }

    /// Lists all book projections, most recently added first
    pub async fn list_books(&self) -> Result<Vec<BookResponse>, AppError> {
        let all = books::list_books(&self.pool).await?;
        let mut responses = Vec::with_capacity(all.len());
        for book in &all {
            responses.push(self.book_response(book).await?);
        }
        Ok(responses)
    }

    /// Applies a partial update to a book
    pub async fn update_book(
        &self,
        id: BookId,
        update: UpdateBook,
    ) -> Result<BookResponse, AppError> {
        let mut book = books::get_book(&self.pool, id).await?;
        update.apply_to(&mut book);
        book.updated_at = Utc::now();
        book.validate().map_err(AppError::validation)?;

        books::update_book(&self.pool, &book).await?;
        self.book_response(&book).await
    }

    /// Deletes a book and, by cascade, its sessions and relation rows
    pub async fn delete_book(&self, id: BookId) -> Result<(), AppError> {
        books::delete_book(&self.pool, id).await?;
        info!("Deleted book {}", id);
        Ok(())
    }

    /// Applies a progress update (see the lifecycle rules on `Book`)
    pub async fn update_progress(
        &self,
        id: BookId,
        new_page: u32,
    ) -> Result<BookResponse, AppError> {
        let book = progress::update_progress(&self.pool, id, new_page).await?;
        self.book_response(&book).await
    }

    /// Sets a book's status directly
    pub async fn change_status(
        &self,
        id: BookId,
        status: BookStatus,
    ) -> Result<BookResponse, AppError> {
        let book = progress::change_status(&self.pool, id, status).await?;
        self.book_response(&book).await
    }

    // ===== Authors =====

    /// Creates an author from a creation request
    pub async fn create_author(&self, request: NewAuthor) -> Result<AuthorResponse, AppError> {
        let mut author = Author::new(request.first_name, request.last_name);
        author.biography = request.biography;
        author.birth_date = request.birth_date;
        author.nationality = request.nationality;
        author.validate().map_err(AppError::validation)?;

        authors::create_author(&self.pool, &author).await?;
        info!("Added author '{}'", author.display_name());

        self.author_response(&author).await
    }

    /// Gets an author projection by id
    pub async fn get_author(&self, id: AuthorId) -> Result<AuthorResponse, AppError> {
        let author = authors::get_author(&self.pool, id).await?;
        self.author_response(&author).await
    }

    /// Lists all author projections, by name
    pub async fn list_authors(&self) -> Result<Vec<AuthorResponse>, AppError> {
        let all = authors::list_authors(&self.pool).await?;
        let mut responses = Vec::with_capacity(all.len());
        for author in &all {
            responses.push(self.author_response(author).await?);
        }
        Ok(responses)
    }

    /// Applies a partial update to an author
    pub async fn update_author(
        &self,
        id: AuthorId,
        update: UpdateAuthor,
    ) -> Result<AuthorResponse, AppError> {
        let mut author = authors::get_author(&self.pool, id).await?;
        if let Some(first_name) = update.first_name {
            author.first_name = first_name;
        }
        if let Some(last_name) = update.last_name {
            author.last_name = last_name;
        }
        if let Some(biography) = update.biography {
            author.biography = Some(biography);
        }
        if let Some(birth_date) = update.birth_date {
            author.birth_date = Some(birth_date);
        }
        if let Some(nationality) = update.nationality {
            author.nationality = Some(nationality);
        }
        author.updated_at = Utc::now();
        author.validate().map_err(AppError::validation)?;

        authors::update_author(&self.pool, &author).await?;
        self.author_response(&author).await
    }

    /// Deletes an author; relation rows cascade
    pub async fn delete_author(&self, id: AuthorId) -> Result<(), AppError> {
        authors::delete_author(&self.pool, id).await
    }

    /// Attaches an existing author to an existing book
    pub async fn attach_author(
        &self,
        book_id: BookId,
        author_id: AuthorId,
    ) -> Result<BookResponse, AppError> {
        let book = books::get_book(&self.pool, book_id).await?;
        authors::get_author(&self.pool, author_id).await?;

        authors::attach_author(&self.pool, book_id, author_id).await?;
        self.book_response(&book).await
    }

    /// Detaches an author from a book
    pub async fn detach_author(
        &self,
        book_id: BookId,
        author_id: AuthorId,
    ) -> Result<BookResponse, AppError> {
        let book = books::get_book(&self.pool, book_id).await?;
        authors::detach_author(&self.pool, book_id, author_id).await?;
        self.book_response(&book).await
    }

    // ===== Genres =====

    /// Adds a genre to a book by free-text name, reusing the existing row
    /// when the normalized name already exists
    pub async fn add_genre_to_book(
        &self,
        book_id: BookId,
        name: &str,
    ) -> Result<GenreResponse, AppError> {
        books::get_book(&self.pool, book_id).await?;

        let genre = genres::find_or_create_genre(&self.pool, name).await?;
        genres::attach_genre(&self.pool, book_id, genre.id).await?;

        self.genre_response(&genre).await
    }

    /// Removes a genre from a book; the genre row itself is kept
    pub async fn remove_genre_from_book(
        &self,
        book_id: BookId,
        genre_id: GenreId,
    ) -> Result<BookResponse, AppError> {
        let book = books::get_book(&self.pool, book_id).await?;
        genres::detach_genre(&self.pool, book_id, genre_id).await?;
        self.book_response(&book).await
    }

    /// Gets a genre projection by id
    pub async fn get_genre(&self, id: GenreId) -> Result<GenreResponse, AppError> {
        let genre = genres::get_genre(&self.pool, id).await?;
        self.genre_response(&genre).await
    }

    /// Lists all genre projections, by name
    pub async fn list_genres(&self) -> Result<Vec<GenreResponse>, AppError> {
        let all = genres::list_genres(&self.pool).await?;
        let mut responses = Vec::with_capacity(all.len());
        for genre in &all {
            responses.push(self.genre_response(genre).await?);
        }
        Ok(responses)
    }

    /// Deletes a genre everywhere; relation rows cascade
    pub async fn delete_genre(&self, id: GenreId) -> Result<(), AppError> {
        genres::delete_genre(&self.pool, id).await
    }

    // ===== Sessions =====

    /// Opens a reading session for a book
    pub async fn start_session(
        &self,
        book_id: BookId,
        request: NewSession,
    ) -> Result<SessionResponse, AppError> {
        books::get_book(&self.pool, book_id).await?;

        let mut session = ReadingSession::open(book_id);
        session.pages_read = request.pages_read;
        session.mood = request.mood;

        sessions::create_session(&self.pool, &session).await?;
        Ok(project_session(&session))
    }

    /// Closes an open session now
    pub async fn end_session(&self, id: SessionId) -> Result<SessionResponse, AppError> {
        sessions::end_session(&self.pool, id, Utc::now()).await?;
        let session = sessions::get_session(&self.pool, id).await?;
        Ok(project_session(&session))
    }

    /// Lists a book's sessions, most recent first
    pub async fn list_sessions(&self, book_id: BookId) -> Result<Vec<SessionResponse>, AppError> {
        books::get_book(&self.pool, book_id).await?;
        let all = sessions::sessions_for_book(&self.pool, book_id).await?;
        Ok(all.iter().map(project_session).collect())
    }

    // ===== Analytics =====

    /// Dashboard summary over the whole library
    pub async fn dashboard(&self) -> Result<DashboardSummary, AppError> {
        analytics::dashboard_summary(&self.pool).await
    }

    /// Books finished per year, most recent first
    pub async fn yearly_history(&self) -> Result<Vec<YearlyProgress>, AppError> {
        analytics::yearly_history(&self.pool).await
    }

    /// Books finished in one calendar year
    pub async fn yearly_progress(&self, year: i32) -> Result<YearlyProgress, AppError> {
        analytics::yearly_progress(&self.pool, year).await
    }

    /// Book count per genre, most popular first
    pub async fn genre_popularity(&self) -> Result<Vec<GenrePopularity>, AppError> {
        analytics::genre_popularity(&self.pool).await
    }

    /// Session statistics per observed mood
    pub async fn mood_statistics(&self) -> Result<Vec<MoodStatistics>, AppError> {
        analytics::mood_statistics(&self.pool).await
    }

    // ===== Projection assembly =====

    async fn book_response(&self, book: &Book) -> Result<BookResponse, AppError> {
        let book_authors = authors::authors_for_book(&self.pool, book.id).await?;
        let book_genres = genres::genres_for_book(&self.pool, book.id).await?;
        let session_count = sessions::count_sessions_for_book(&self.pool, book.id).await?;
        Ok(project_book(book, &book_authors, &book_genres, session_count))
    }

    async fn author_response(&self, author: &Author) -> Result<AuthorResponse, AppError> {
        let book_count = authors::count_books_for_author(&self.pool, author.id).await?;
        Ok(project_author(author, book_count, Utc::now().date_naive()))
    }

    async fn genre_response(&self, genre: &Genre) -> Result<GenreResponse, AppError> {
        let book_count = genres::count_books_for_genre(&self.pool, genre.id).await?;
        Ok(project_genre(genre, book_count, self.popular_genre_threshold))
    }
}
