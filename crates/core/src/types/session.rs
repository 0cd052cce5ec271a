//! Reading session domain model

use crate::error::Violation;
use crate::types::{BookId, Validator};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a reading session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(Uuid);

impl SessionId {
    /// Creates a new random SessionId
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a SessionId from a UUID string
    pub fn from_string(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?))
    }

    /// Returns the SessionId as a string
    pub fn as_string(&self) -> String {
        self.0.to_string()
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Qualitative descriptor attached to a reading session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadingMood {
    Excited,
    Relaxed,
    Focused,
    Tired,
    Bored,
    Inspired,
}

impl ReadingMood {
    /// Returns the storage representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Excited => "excited",
            Self::Relaxed => "relaxed",
            Self::Focused => "focused",
            Self::Tired => "tired",
            Self::Bored => "bored",
            Self::Inspired => "inspired",
        }
    }

    /// Parses the storage representation
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "excited" => Some(Self::Excited),
            "relaxed" => Some(Self::Relaxed),
            "focused" => Some(Self::Focused),
            "tired" => Some(Self::Tired),
            "bored" => Some(Self::Bored),
            "inspired" => Some(Self::Inspired),
            _ => None,
        }
    }
}

impl fmt::Display for ReadingMood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One recorded interval of reading activity, owned by exactly one book
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadingSession {
    pub id: SessionId,
    pub book_id: BookId,
    pub started_at: DateTime<Utc>,
    /// None while the session is still in progress
    pub ended_at: Option<DateTime<Utc>>,
    pub pages_read: u32,
    pub mood: Option<ReadingMood>,
}

impl ReadingSession {
    /// Opens a new session for a book, starting now
    pub fn open(book_id: BookId) -> Self {
        Self {
            id: SessionId::new(),
            book_id,
            started_at: Utc::now(),
            ended_at: None,
            pages_read: 0,
            mood: None,
        }
    }

    /// Records a closed session for a progress delta; start and end coincide
    pub fn from_progress(book_id: BookId, pages_read: u32) -> Self {
        let now = Utc::now();
        Self {
            id: SessionId::new(),
            book_id,
            started_at: now,
            ended_at: Some(now),
            pages_read,
            mood: None,
        }
    }

    /// Returns true while the session has no end time
    pub fn is_open(&self) -> bool {
        self.ended_at.is_none()
    }

    /// Closes the session at the given time
    pub fn close(&mut self, ended_at: DateTime<Utc>) {
        self.ended_at = Some(ended_at);
    }
}

impl Validator for ReadingSession {
    fn validate(&self) -> Result<(), Vec<Violation>> {
        let mut violations = Vec::new();

        if let Some(ended) = self.ended_at {
            if ended < self.started_at {
                violations.push(Violation::new(
                    "ended_at",
                    "must not be before the start time",
                ));
            }
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_session_id_roundtrip() {
        let id = SessionId::new();
        let parsed = SessionId::from_string(&id.as_string()).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_mood_str_roundtrip() {
        for mood in [
            ReadingMood::Excited,
            ReadingMood::Relaxed,
            ReadingMood::Focused,
            ReadingMood::Tired,
            ReadingMood::Bored,
            ReadingMood::Inspired,
        ] {
            assert_eq!(ReadingMood::from_str(mood.as_str()), Some(mood));
        }
        assert_eq!(ReadingMood::from_str("grumpy"), None);
    }

    #[test]
    fn test_open_session_has_no_end() {
        let session = ReadingSession::open(BookId::new());
        assert!(session.is_open());
        assert_eq!(session.pages_read, 0);
        assert!(session.is_valid());
    }

    #[test]
    fn test_close_session() {
        let mut session = ReadingSession::open(BookId::new());
        let end = session.started_at + Duration::minutes(45);
        session.close(end);
        assert!(!session.is_open());
        assert!(session.is_valid());
    }

    #[test]
    fn test_end_before_start_is_invalid() {
        let mut session = ReadingSession::open(BookId::new());
        session.ended_at = Some(session.started_at - Duration::minutes(5));
        let violations = session.validate().unwrap_err();
        assert_eq!(violations[0].field, "ended_at");
    }

    #[test]
    fn test_from_progress_is_closed_with_delta() {
        let session = ReadingSession::from_progress(BookId::new(), 25);
        assert!(!session.is_open());
        assert_eq!(session.pages_read, 25);
        assert_eq!(session.ended_at, Some(session.started_at));
        assert!(session.mood.is_none());
    }
}
