//! Typed upload command.
//!
//! Raw form input is decoded into an [`UploadCommand`] before anything is
//! written. A command that exists is always safe to store: its filename is
//! sanitized and its genre satisfies the configured genre policy.

use thiserror::Error;

use crate::defaults::MAX_GENRE_LEN;
use crate::file_safety::sanitize_filename;
use crate::models::CreateMidiFileRequest;

/// Why an upload was turned away. None of these create a file or a record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadRejection {
    #[error("no file part in the request")]
    MissingFile,

    #[error("no file selected")]
    EmptyFilename,

    #[error("filename {0:?} has no usable characters")]
    UnusableFilename(String),

    #[error("no genre chosen")]
    MissingGenre,

    #[error("genre is longer than {} characters", MAX_GENRE_LEN)]
    GenreTooLong,
}

/// A validated upload, ready for the file gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadCommand {
    /// Sanitized on-disk name.
    pub filename: String,
    /// Trimmed genre, `None` only when genre-aware mode is off.
    pub genre: Option<String>,
    pub data: Vec<u8>,
}

impl UploadCommand {
    /// Validate raw form input.
    ///
    /// `genre_required` selects genre-aware mode: when set, an absent or blank
    /// genre rejects the upload; otherwise it is stored as untagged.
    pub fn parse(
        raw_filename: &str,
        genre: Option<&str>,
        data: Vec<u8>,
        genre_required: bool,
    ) -> Result<Self, UploadRejection> {
        if raw_filename.is_empty() {
            return Err(UploadRejection::EmptyFilename);
        }

        let genre = genre.map(str::trim).filter(|g| !g.is_empty());
        match genre {
            None if genre_required => return Err(UploadRejection::MissingGenre),
            Some(g) if g.chars().count() > MAX_GENRE_LEN => {
                return Err(UploadRejection::GenreTooLong)
            }
            _ => {}
        }

        let filename = sanitize_filename(raw_filename)
            .ok_or_else(|| UploadRejection::UnusableFilename(raw_filename.to_string()))?;

        Ok(Self {
            filename,
            genre: genre.map(str::to_string),
            data,
        })
    }

    /// Catalog insert request for this upload.
    pub fn to_create_request(&self) -> CreateMidiFileRequest {
        CreateMidiFileRequest::new(self.filename.clone(), self.genre.clone())
    }
}
