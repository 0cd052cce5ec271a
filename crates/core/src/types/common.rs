//! Shared traits and utilities for domain models

use crate::error::Violation;

/// Trait for types that can validate themselves
pub trait Validator {
    /// Validates the instance and returns per-field violations if invalid
    fn validate(&self) -> Result<(), Vec<Violation>>;

    /// Returns true if the instance is valid
    fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }
}

/// Rounds a percentage or average to one decimal place for display
pub fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
