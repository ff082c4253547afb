use axum::{
    extract::{Query, State},
    response::Html,
};
use serde::Deserialize;

use midibox_core::GenreFilter;

use crate::{error::ApiError, render::render_index, AppState};

#[derive(Debug, Default, Deserialize)]
pub struct GenreQuery {
    pub genre: Option<String>,
}

impl GenreQuery {
    pub fn filter(&self) -> GenreFilter {
        GenreFilter::from_param(self.genre.as_deref())
    }
}

/// Listing page, optionally filtered by `?genre=`.
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<GenreQuery>,
) -> Result<Html<String>, ApiError> {
    let listing = state.gateway.listing(query.filter()).await?;
    Ok(Html(render_index(&listing, state.genre_required)))
}
