//! External metadata lookup endpoints
//!
//! Search failures degrade to an empty result inside the client; a direct
//! volume fetch propagates provider failure as 503.

use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::{Path, Query, State};
use axum::Json;
use readstack_core::AppError;
use readstack_metadata::{BookDraft, GoogleBooksClient, MetadataSource, SearchQuery};
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct LookupParams {
    #[serde(default)]
    pub q: String,
    pub title: Option<String>,
    pub author: Option<String>,
    pub isbn: Option<String>,
    pub limit: Option<usize>,
}

fn client(state: &AppState) -> Result<&Arc<GoogleBooksClient>, ApiError> {
    state.metadata.as_ref().ok_or_else(|| {
        ApiError(AppError::external_service(
            "Google Books",
            "metadata lookup is disabled",
        ))
    })
}

pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<LookupParams>,
) -> Result<Json<Vec<BookDraft>>, ApiError> {
    let client = client(&state)?;

    let mut query = SearchQuery::new(params.q);
    if let Some(title) = params.title {
        query = query.with_title(title);
    }
    if let Some(author) = params.author {
        query = query.with_author(author);
    }
    if let Some(isbn) = params.isbn {
        query = query.with_isbn(isbn);
    }
    if let Some(limit) = params.limit {
        query = query.with_limit(limit);
    }

    Ok(Json(client.search(&query).await?))
}

pub async fn fetch(
    State(state): State<AppState>,
    Path(volume_id): Path<String>,
) -> Result<Json<BookDraft>, ApiError> {
    let client = client(&state)?;
    Ok(Json(client.fetch(&volume_id).await?))
}
