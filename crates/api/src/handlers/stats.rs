//! Analytics endpoints; all read-only

use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::Json;
use readstack_core::{DashboardSummary, GenrePopularity, MoodStatistics, YearlyProgress};

pub async fn dashboard(
    State(state): State<AppState>,
) -> Result<Json<DashboardSummary>, ApiError> {
    Ok(Json(state.manager.dashboard().await?))
}

pub async fn yearly_history(
    State(state): State<AppState>,
) -> Result<Json<Vec<YearlyProgress>>, ApiError> {
    Ok(Json(state.manager.yearly_history().await?))
}

pub async fn yearly_progress(
    State(state): State<AppState>,
    Path(year): Path<i32>,
) -> Result<Json<YearlyProgress>, ApiError> {
    Ok(Json(state.manager.yearly_progress(year).await?))
}

pub async fn genre_popularity(
    State(state): State<AppState>,
) -> Result<Json<Vec<GenrePopularity>>, ApiError> {
    Ok(Json(state.manager.genre_popularity().await?))
}

pub async fn mood_statistics(
    State(state): State<AppState>,
) -> Result<Json<Vec<MoodStatistics>>, ApiError> {
    Ok(Json(state.manager.mood_statistics().await?))
}
