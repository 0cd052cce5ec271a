//! Book endpoints: CRUD, progress, status, and relation management

use crate::error::ApiError;
use crate::handlers::{parse_author_id, parse_book_id, parse_genre_id};
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use readstack_core::{AppError, BookStatus};
use readstack_library::{BookResponse, GenreResponse, NewBook, UpdateBook};
use serde::Deserialize;

/// Progress update body. The page is accepted as a signed integer so a
/// negative value surfaces as InvalidArgument rather than a decode failure.
#[derive(Debug, Deserialize)]
pub struct ProgressRequest {
    pub current_page: i64,
}

/// Manual status change body
#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    pub status: BookStatus,
}

/// Genre attachment body; the name is free text and gets normalized
#[derive(Debug, Deserialize)]
pub struct AddGenreRequest {
    pub name: String,
}

pub async fn create_book(
    State(state): State<AppState>,
    Json(request): Json<NewBook>,
) -> Result<(StatusCode, Json<BookResponse>), ApiError> {
    let book = state.manager.create_book(request).await?;
    Ok((StatusCode::CREATED, Json(book)))
}

pub async fn list_books(
    State(state): State<AppState>,
) -> Result<Json<Vec<BookResponse>>, ApiError> {
    Ok(Json(state.manager.list_books().await?))
}

pub async fn get_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<BookResponse>, ApiError> {
    let id = parse_book_id(&id)?;
    Ok(Json(state.manager.get_book(id).await?))
}

pub async fn update_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateBook>,
) -> Result<Json<BookResponse>, ApiError> {
    let id = parse_book_id(&id)?;
    Ok(Json(state.manager.update_book(id, request).await?))
}

pub async fn delete_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_book_id(&id)?;
    state.manager.delete_book(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn update_progress(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<ProgressRequest>,
) -> Result<Json<BookResponse>, ApiError> {
    let id = parse_book_id(&id)?;
    let page = u32::try_from(request.current_page).map_err(|_| {
        ApiError(AppError::invalid_argument(
            "current_page",
            "must not be negative",
        ))
    })?;
    Ok(Json(state.manager.update_progress(id, page).await?))
}

pub async fn change_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<StatusRequest>,
) -> Result<Json<BookResponse>, ApiError> {
    let id = parse_book_id(&id)?;
    Ok(Json(state.manager.change_status(id, request.status).await?))
}

pub async fn attach_author(
    State(state): State<AppState>,
    Path((id, author_id)): Path<(String, String)>,
) -> Result<Json<BookResponse>, ApiError> {
    let id = parse_book_id(&id)?;
    let author_id = parse_author_id(&author_id)?;
    Ok(Json(state.manager.attach_author(id, author_id).await?))
}

pub async fn detach_author(
    State(state): State<AppState>,
    Path((id, author_id)): Path<(String, String)>,
) -> Result<Json<BookResponse>, ApiError> {
    let id = parse_book_id(&id)?;
    let author_id = parse_author_id(&author_id)?;
    Ok(Json(state.manager.detach_author(id, author_id).await?))
}

pub async fn add_genre(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<AddGenreRequest>,
) -> Result<(StatusCode, Json<GenreResponse>), ApiError> {
    let id = parse_book_id(&id)?;
    let genre = state.manager.add_genre_to_book(id, &request.name).await?;
    Ok((StatusCode::CREATED, Json(genre)))
}

pub async fn remove_genre(
    State(state): State<AppState>,
    Path((id, genre_id)): Path<(String, String)>,
) -> Result<Json<BookResponse>, ApiError> {
    let id = parse_book_id(&id)?;
    let genre_id = parse_genre_id(&genre_id)?;
    Ok(Json(state.manager.remove_genre_from_book(id, genre_id).await?))
}
