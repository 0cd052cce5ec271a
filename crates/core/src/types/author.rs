//! Author domain model

use crate::error::Violation;
use crate::types::Validator;
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for an author
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AuthorId(Uuid);

impl AuthorId {
    /// Creates a new random AuthorId
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates an AuthorId from a UUID string
    pub fn from_string(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?))
    }

    /// Returns the AuthorId as a string
    pub fn as_string(&self) -> String {
        self.0.to_string()
    }
}

impl Default for AuthorId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AuthorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Represents an author of one or more books
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Author {
    pub id: AuthorId,
    pub first_name: String,
    pub last_name: String,
    pub biography: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub nationality: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Author {
    /// Creates a new author with the required name fields
    pub fn new(first_name: String, last_name: String) -> Self {
        let now = Utc::now();
        Self {
            id: AuthorId::new(),
            first_name,
            last_name,
            biography: None,
            birth_date: None,
            nationality: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Full display name, "First Last"
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
    }

    /// Age in whole years on the given date, absent without a birth date
    pub fn age_on(&self, today: NaiveDate) -> Option<u32> {
        let birth = self.birth_date?;
        if birth > today {
            return None;
        }
        let mut age = today.year() - birth.year();
        if (today.month(), today.day()) < (birth.month(), birth.day()) {
            age -= 1;
        }
        u32::try_from(age).ok()
    }
}

impl Validator for Author {
    fn validate(&self) -> Result<(), Vec<Violation>> {
        let mut violations = Vec::new();

        if self.first_name.trim().is_empty() {
            violations.push(Violation::new("first_name", "must not be blank"));
        }

        if self.last_name.trim().is_empty() {
            violations.push(Violation::new("last_name", "must not be blank"));
        }

        if let Some(birth) = self.birth_date {
            if birth > Utc::now().date_naive() {
                violations.push(Violation::new("birth_date", "must not be in the future"));
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

    #[test]
    fn test_author_id_roundtrip() {
        let id = AuthorId::new();
        let parsed = AuthorId::from_string(&id.as_string()).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_display_name() {
        let author = Author::new("Ursula".to_string(), "Le Guin".to_string());
        assert_eq!(author.display_name(), "Ursula Le Guin");
    }

    #[test]
    fn test_display_name_trims_whitespace() {
        let author = Author::new(" Octavia ".to_string(), " Butler ".to_string());
        assert_eq!(author.display_name(), "Octavia Butler");
    }

    #[test]
    fn test_age_on_before_and_after_birthday() {
        let mut author = Author::new("Test".to_string(), "Author".to_string());
        author.birth_date = NaiveDate::from_ymd_opt(1980, 6, 15);

        let before_birthday = NaiveDate::from_ymd_opt(2026, 6, 14).unwrap();
        let on_birthday = NaiveDate::from_ymd_opt(2026, 6, 15).unwrap();

        assert_eq!(author.age_on(before_birthday), Some(45));
        assert_eq!(author.age_on(on_birthday), Some(46));
    }

    #[test]
    fn test_age_absent_without_birth_date() {
        let author = Author::new("Test".to_string(), "Author".to_string());
        assert_eq!(author.age_on(Utc::now().date_naive()), None);
    }

    #[test]
    fn test_validation_blank_names() {
        let author = Author::new("  ".to_string(), "".to_string());
        let violations = author.validate().unwrap_err();
        assert_eq!(violations.len(), 2);
        assert_eq!(violations[0].field, "first_name");
        assert_eq!(violations[1].field, "last_name");
    }

    #[test]
    fn test_validation_future_birth_date() {
        let mut author = Author::new("Test".to_string(), "Author".to_string());
        author.birth_date = Some(Utc::now().date_naive() + chrono::Days::new(30));
        let violations = author.validate().unwrap_err();
        assert_eq!(violations[0].field, "birth_date");
    }

    #[test]
    fn test_validation_success() {
        let mut author = Author::new("Ted".to_string(), "Chiang".to_string());
        author.birth_date = NaiveDate::from_ymd_opt(1967, 1, 1);
        assert!(author.is_valid());
    }
}
