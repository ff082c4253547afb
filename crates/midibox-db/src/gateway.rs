//! File gateway: the upload and download workflow over catalog + storage.
//!
//! Upload is a two-step protocol with no shared transaction:
//!
//! 1. write the bytes into the content directory,
//! 2. insert the catalog row.
//!
//! A failure after step 1 leaves an orphaned file with no row. That is the
//! accepted partial-failure mode; a row never points at a file that was not
//! written. Two uploads with the same sanitized name share one file on disk
//! and the later write wins, while both rows keep pointing at it.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};

use midibox_core::{
    detect_content_type, CatalogRepository, GenreFilter, MidiFile, Result, UploadCommand,
};

use crate::file_storage::StorageBackend;

/// A stored file resolved for download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServedFile {
    pub record: MidiFile,
    pub content_type: &'static str,
    pub data: Vec<u8>,
}

/// Result of rendering the index: matching records plus every known genre.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing {
    pub files: Vec<MidiFile>,
    pub genres: Vec<String>,
    pub filter: GenreFilter,
}

#[derive(Clone)]
pub struct FileGateway {
    catalog: Arc<dyn CatalogRepository>,
    storage: Arc<dyn StorageBackend>,
}

impl FileGateway {
    pub fn new(catalog: Arc<dyn CatalogRepository>, storage: Arc<dyn StorageBackend>) -> Self {
        Self { catalog, storage }
    }

    pub fn catalog(&self) -> &Arc<dyn CatalogRepository> {
        &self.catalog
    }

    /// Store a validated upload: write the file, then insert the record.
    pub async fn accept(&self, cmd: UploadCommand) -> Result<MidiFile> {
        let start = Instant::now();
        let size = cmd.data.len();

        self.storage.write(&cmd.filename, &cmd.data).await?;

        let id = self
            .catalog
            .create(cmd.to_create_request())
            .await
            .map_err(|e| {
                warn!(
                    subsystem = "storage",
                    component = "gateway",
                    op = "accept",
                    filename = %cmd.filename,
                    error = %e,
                    "File written but catalog insert failed; file is orphaned"
                );
                e
            })?;

        info!(
            subsystem = "storage",
            component = "gateway",
            op = "accept",
            file_id = id,
            filename = %cmd.filename,
            genre = cmd.genre.as_deref().unwrap_or(""),
            size,
            duration_ms = start.elapsed().as_millis() as u64,
            "Upload stored"
        );

        Ok(MidiFile {
            id,
            filename: cmd.filename,
            genre: cmd.genre,
        })
    }

    /// Resolve `id` and read its bytes.
    ///
    /// `Ok(None)` when the id has no record or the record's file is gone.
    pub async fn serve(&self, id: i32) -> Result<Option<ServedFile>> {
        let Some(record) = self.catalog.get_by_id(id).await? else {
            debug!(file_id = id, "gateway: unknown id");
            return Ok(None);
        };

        if !self.storage.exists(&record.filename).await? {
            warn!(
                subsystem = "storage",
                component = "gateway",
                op = "serve",
                file_id = id,
                filename = %record.filename,
                "Catalog row points at a missing file"
            );
            return Ok(None);
        }

        let data = self.storage.read(&record.filename).await?;
        let content_type = detect_content_type(&record.filename, &data);
        debug!(file_id = id, filename = %record.filename, size = data.len(), "gateway: serve");

        Ok(Some(ServedFile {
            record,
            content_type,
            data,
        }))
    }

    /// Records matching `filter` and the distinct genre set.
    pub async fn listing(&self, filter: GenreFilter) -> Result<Listing> {
        let files = self.catalog.list(&filter).await?;
        let genres = self.catalog.distinct_genres().await?;
        Ok(Listing {
            files,
            genres,
            filter,
        })
    }
}
