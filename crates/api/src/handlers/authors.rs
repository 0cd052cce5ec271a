//! Author endpoints

use crate::error::ApiError;
use crate::handlers::parse_author_id;
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use readstack_library::{AuthorResponse, NewAuthor, UpdateAuthor};

pub async fn create_author(
    State(state): State<AppState>,
    Json(request): Json<NewAuthor>,
) -> Result<(StatusCode, Json<AuthorResponse>), ApiError> {
    let author = state.manager.create_author(request).await?;
    Ok((StatusCode::CREATED, Json(author)))
}

pub async fn list_authors(
    State(state): State<AppState>,
) -> Result<Json<Vec<AuthorResponse>>, ApiError> {
    Ok(Json(state.manager.list_authors().await?))
}

pub async fn get_author(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<AuthorResponse>, ApiError> {
    let id = parse_author_id(&id)?;
    Ok(Json(state.manager.get_author(id).await?))
}

pub async fn update_author(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateAuthor>,
) -> Result<Json<AuthorResponse>, ApiError> {
    let id = parse_author_id(&id)?;
    Ok(Json(state.manager.update_author(id, request).await?))
}

pub async fn delete_author(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_author_id(&id)?;
    state.manager.delete_author(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
