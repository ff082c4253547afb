use axum::{
    extract::{Path, State},
    http::{header, HeaderValue},
    response::{IntoResponse, Redirect, Response},
};
use tracing::debug;

use crate::{error::ApiError, AppState};

/// Serve a stored file as an attachment.
///
/// Ids that are not integers, do not resolve, or whose file is gone all
/// redirect to the listing page.
pub async fn download(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Response, ApiError> {
    let Ok(id) = raw_id.parse::<i32>() else {
        debug!(subsystem = "api", op = "download", id = %raw_id, "Non-numeric id");
        return Ok(Redirect::to("/").into_response());
    };

    let Some(served) = state.gateway.serve(id).await? else {
        return Ok(Redirect::to("/").into_response());
    };

    let content_type = HeaderValue::from_static(served.content_type);
    let disposition =
        HeaderValue::from_str(&format!("attachment; filename=\"{}\"", served.record.filename))
            .map_err(|e| ApiError::Internal(format!("invalid Content-Disposition: {}", e)))?;

    Ok((
        [
            (header::CONTENT_TYPE, content_type),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        served.data,
    )
        .into_response())
}
