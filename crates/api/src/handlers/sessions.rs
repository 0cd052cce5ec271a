//! Reading session endpoints

use crate::error::ApiError;
use crate::handlers::{parse_book_id, parse_session_id};
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use readstack_library::{NewSession, SessionResponse};

pub async fn list_sessions(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<SessionResponse>>, ApiError> {
    let id = parse_book_id(&id)?;
    Ok(Json(state.manager.list_sessions(id).await?))
}

pub async fn start_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<NewSession>,
) -> Result<(StatusCode, Json<SessionResponse>), ApiError> {
    let id = parse_book_id(&id)?;
    let session = state.manager.start_session(id, request).await?;
    Ok((StatusCode::CREATED, Json(session)))
}

pub async fn end_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionResponse>, ApiError> {
    let id = parse_session_id(&id)?;
    Ok(Json(state.manager.end_session(id).await?))
}
