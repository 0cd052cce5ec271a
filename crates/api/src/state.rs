//! Shared handler state

use readstack_library::LibraryManager;
use readstack_metadata::GoogleBooksClient;
use std::sync::Arc;

/// State threaded through every handler
#[derive(Clone)]
pub struct AppState {
    pub manager: Arc<LibraryManager>,
    /// Absent when the lookup integration is disabled
    pub metadata: Option<Arc<GoogleBooksClient>>,
}

impl AppState {
    pub fn new(manager: LibraryManager, metadata: Option<GoogleBooksClient>) -> Self {
        Self {
            manager: Arc::new(manager),
            metadata: metadata.map(Arc::new),
        }
    }
}
