//! Genre endpoints

use crate::error::ApiError;
use crate::handlers::parse_genre_id;
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use readstack_library::GenreResponse;

pub async fn list_genres(
    State(state): State<AppState>,
) -> Result<Json<Vec<GenreResponse>>, ApiError> {
    Ok(Json(state.manager.list_genres().await?))
}

pub async fn get_genre(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<GenreResponse>, ApiError> {
    let id = parse_genre_id(&id)?;
    Ok(Json(state.manager.get_genre(id).await?))
}

pub async fn delete_genre(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_genre_id(&id)?;
    state.manager.delete_genre(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
