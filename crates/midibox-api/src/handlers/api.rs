//! JSON endpoints.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Serialize;
use serde_json::json;

use midibox_core::MidiFile;

use crate::{error::ApiError, handlers::index::GenreQuery, AppState};

#[derive(Debug, Serialize)]
pub struct FileList {
    pub files: Vec<MidiFile>,
    pub total: usize,
}

/// Liveness plus a catalog round trip.
pub async fn health(State(state): State<AppState>) -> Result<Json<serde_json::Value>, ApiError> {
    let files = state.gateway.catalog().count().await?;
    Ok(Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "files": files,
    })))
}

/// `GET /api/v1/files?genre=`
pub async fn list_files(
    State(state): State<AppState>,
    Query(query): Query<GenreQuery>,
) -> Result<Json<FileList>, ApiError> {
    let files = state.gateway.catalog().list(&query.filter()).await?;
    Ok(Json(FileList {
        total: files.len(),
        files,
    }))
}

/// `GET /api/v1/genres`
pub async fn list_genres(State(state): State<AppState>) -> Result<Json<Vec<String>>, ApiError> {
    let genres = state.gateway.catalog().distinct_genres().await?;
    Ok(Json(genres))
}
