//! Multipart decoding for the upload form.

use axum::extract::Multipart;
use tracing::trace;

use midibox_core::{UploadCommand, UploadRejection};

use crate::error::ApiError;

/// Raw upload form fields, before validation.
#[derive(Debug, Default)]
pub struct UploadForm {
    /// `None` when the request carried no `file` part at all.
    pub file: Option<FilePart>,
    pub genre: Option<String>,
}

#[derive(Debug)]
pub struct FilePart {
    /// Client-supplied name, empty when the browser sent no file.
    pub filename: String,
    pub data: Vec<u8>,
}

impl UploadForm {
    /// Drain a multipart body. Unknown fields are skipped; a repeated field
    /// keeps its last value.
    pub async fn from_multipart(mut multipart: Multipart) -> Result<Self, ApiError> {
        let mut form = UploadForm::default();

        while let Some(field) = multipart.next_field().await? {
            let name = field.name().map(str::to_string);
            match name.as_deref() {
                Some("file") => {
                    let filename = field.file_name().unwrap_or_default().to_string();
                    let data = field.bytes().await?.to_vec();
                    trace!(filename = %filename, size = data.len(), "upload: file part");
                    form.file = Some(FilePart { filename, data });
                }
                Some("genre") => {
                    form.genre = Some(field.text().await?);
                }
                other => {
                    trace!(field = ?other, "upload: ignoring field");
                }
            }
        }

        Ok(form)
    }

    /// Validate into a storable command.
    pub fn into_command(self, genre_required: bool) -> Result<UploadCommand, UploadRejection> {
        let file = self.file.ok_or(UploadRejection::MissingFile)?;
        UploadCommand::parse(
            &file.filename,
            self.genre.as_deref(),
            file.data,
            genre_required,
        )
    }
}
