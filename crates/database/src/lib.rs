//! Readstack Database Layer
//!
//! This crate provides database operations for the Readstack reading tracker.
//! It uses SQLite with sqlx for type-safe database queries.

pub mod connection;
pub mod migrations;
pub mod queries;

pub use connection::{connect, connect_memory, DatabaseConfig, DbPool};
pub use migrations::{current_version, optimize, run_migrations, verify_integrity};
