//! Readstack service layer
//!
//! Sits between the REST surface and the database crate:
//! - `manager`: CRUD orchestration and projection assembly
//! - `progress`: the book lifecycle engine
//! - `analytics`: dashboard and statistics aggregation
//! - `projection`: read-side response shapes with derived fields
//! - `changes`: creation and partial-update change sets

pub mod analytics;
pub mod changes;
pub mod manager;
pub mod progress;
pub mod projection;

pub use changes::{NewAuthor, NewBook, NewSession, UpdateAuthor, UpdateBook};
pub use manager::{LibraryConfig, LibraryManager};
pub use projection::{
    AuthorResponse, AuthorSummary, BookResponse, GenreResponse, GenreSummary, SessionResponse,
};
