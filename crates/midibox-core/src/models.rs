//! Catalog data model.

use serde::{Deserialize, Serialize};

/// A catalogued upload: one row of `midi_file`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MidiFile {
    /// Auto-assigned, monotonically increasing primary key.
    pub id: i32,
    /// Sanitized on-disk name inside the content directory.
    pub filename: String,
    /// Genre tag. `None` only for uploads accepted with genre-aware mode off.
    pub genre: Option<String>,
}

impl MidiFile {
    /// Genre for display, empty when untagged.
    pub fn genre_label(&self) -> &str {
        self.genre.as_deref().unwrap_or("")
    }
}

/// Request for creating a new catalog record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateMidiFileRequest {
    pub filename: String,
    pub genre: Option<String>,
}

impl CreateMidiFileRequest {
    pub fn new(filename: impl Into<String>, genre: Option<String>) -> Self {
        Self {
            filename: filename.into(),
            genre,
        }
    }
}

/// Genre filter parsed from a listing request.
///
/// An empty or whitespace-only value means "no filter", matching how the
/// index page submits its select box when "All" is chosen.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum GenreFilter {
    #[default]
    All,
    Exact(String),
}

impl GenreFilter {
    pub fn from_param(param: Option<&str>) -> Self {
        match param {
            Some(g) if !g.trim().is_empty() => GenreFilter::Exact(g.to_string()),
            _ => GenreFilter::All,
        }
    }

    pub fn selected(&self) -> Option<&str> {
        match self {
            GenreFilter::All => None,
            GenreFilter::Exact(g) => Some(g.as_str()),
        }
    }
}
