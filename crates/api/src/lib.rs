//! Readstack REST surface
//!
//! A thin axum layer over the service crate: routing, request decoding, and
//! the structured error contract. No business rules live here.

pub mod error;
pub mod handlers;
pub mod router;
pub mod state;

pub use error::{ApiError, ErrorBody};
pub use router::build_router;
pub use state::AppState;
