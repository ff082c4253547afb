use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    response::Redirect,
};
use tracing::debug;

use midibox_core::UploadRejection;

use crate::{error::ApiError, forms::UploadForm, AppState};

/// Accept the upload form.
///
/// Every outcome except a store or disk failure ends in a redirect to the
/// listing page. Rejected input creates neither a file nor a record. A body
/// that is not `multipart/form-data` at all carries no file part and is
/// treated the same way.
pub async fn upload(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Redirect, ApiError> {
    let command = match multipart {
        Ok(multipart) => UploadForm::from_multipart(multipart)
            .await?
            .into_command(state.genre_required),
        Err(rejection) => {
            debug!(
                subsystem = "api",
                op = "upload",
                error = %rejection,
                "Upload body is not multipart"
            );
            Err(UploadRejection::MissingFile)
        }
    };

    match command {
        Ok(cmd) => {
            state.gateway.accept(cmd).await?;
        }
        Err(rejection) => {
            debug!(
                subsystem = "api",
                op = "upload",
                reason = %rejection,
                "Upload rejected"
            );
        }
    }

    Ok(Redirect::to("/"))
}
