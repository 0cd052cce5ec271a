//! Creation and update change sets
//!
//! Updates are explicit: a change set carries only the fields to overwrite
//! and is applied read-modify-write inside one operation. Absent fields are
//! left untouched.

use chrono::NaiveDate;
use readstack_core::{Book, BookStatus, ReadingMood};
use serde::{Deserialize, Serialize};

/// Fields accepted when creating a book
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewBook {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub isbn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_pages: Option<u32>,
    /// Defaults to the wishlist when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<BookStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl NewBook {
    /// Creates a request with just a title
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    /// Builds the book entity this request describes
    pub fn into_book(self) -> Book {
        let mut book = Book::new(self.title);
        book.isbn = self.isbn;
        book.total_pages = self.total_pages;
        book.status = self.status.unwrap_or(BookStatus::Wishlist);
        book.publisher = self.publisher;
        book.published_date = self.published_date;
        book.description = self.description;
        book.rating = self.rating;
        book.notes = self.notes;
        book
    }
}

/// Partial update for a book; present fields overwrite, absent fields keep
/// their stored value. Page counter and status have dedicated operations and
/// are not part of this change set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateBook {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub isbn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_pages: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl UpdateBook {
    /// Applies the present fields to a loaded book
    pub fn apply_to(&self, book: &mut Book) {
        if let Some(title) = &self.title {
            book.title = title.clone();
        }
        if let Some(isbn) = &self.isbn {
            book.isbn = Some(isbn.clone());
        }
        if let Some(total_pages) = self.total_pages {
            book.total_pages = Some(total_pages);
        }
        if let Some(publisher) = &self.publisher {
            book.publisher = Some(publisher.clone());
        }
        if let Some(published_date) = self.published_date {
            book.published_date = Some(published_date);
        }
        if let Some(description) = &self.description {
            book.description = Some(description.clone());
        }
        if let Some(rating) = self.rating {
            book.rating = Some(rating);
        }
        if let Some(notes) = &self.notes {
            book.notes = Some(notes.clone());
        }
    }
}

/// Fields accepted when creating an author
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewAuthor {
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub biography: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nationality: Option<String>,
}

impl NewAuthor {
    /// Creates a request with just the name fields
    pub fn named(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            ..Default::default()
        }
    }
}

/// Partial update for an author
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateAuthor {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub biography: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nationality: Option<String>,
}

/// Fields accepted when recording a session explicitly
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewSession {
    #[serde(default)]
    pub pages_read: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mood: Option<ReadingMood>,
}
