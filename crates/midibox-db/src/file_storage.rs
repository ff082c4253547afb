//! Flat content directory for uploaded file bytes.
//!
//! Every stored object is addressed by a single sanitized filename. There are
//! no subdirectories and no content addressing: a second upload with the same
//! sanitized name replaces the first (last write wins).
//!
//! ## Example
//!
//! ```rust,ignore
//! use midibox_db::file_storage::{FilesystemBackend, StorageBackend};
//!
//! let backend = FilesystemBackend::new("uploads");
//! backend.ensure_dir().await?;
//! backend.write("song1.mid", &data).await?;
//! let bytes = backend.read("song1.mid").await?;
//! ```

use std::path::{Component, Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use midibox_core::{Error, Result};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

/// Distinguishes temp files of concurrent writes to the same name.
static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Storage backend trait for different storage implementations.
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Write data under `name`, replacing anything already there.
    async fn write(&self, name: &str, data: &[u8]) -> Result<()>;

    /// Read the data stored under `name`.
    async fn read(&self, name: &str) -> Result<Vec<u8>>;

    /// Check if data exists under `name`.
    async fn exists(&self, name: &str) -> Result<bool>;
}

/// Filesystem storage backend rooted at the content directory.
pub struct FilesystemBackend {
    base_path: PathBuf,
}

impl FilesystemBackend {
    /// Create a new filesystem backend with the given base directory.
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Resolve `name` inside the content directory.
    ///
    /// Only a single plain component is accepted. Sanitized names always pass;
    /// anything else (`..`, absolute paths, nested paths) is refused before
    /// the filesystem is touched.
    fn full_path(&self, name: &str) -> Result<PathBuf> {
        let mut components = Path::new(name).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(part)), None) if !name.contains(['/', '\\']) => {
                Ok(self.base_path.join(part))
            }
            _ => Err(Error::InvalidInput(format!(
                "storage name {:?} is not a plain file name",
                name
            ))),
        }
    }

    /// Create the content directory if it does not exist yet.
    pub async fn ensure_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.base_path).await?;
        info!(
            subsystem = "storage",
            component = "filesystem",
            path = %self.base_path.display(),
            "Content directory ready"
        );
        Ok(())
    }

    /// Validate that the storage backend can write, read, and delete files.
    ///
    /// Run at startup to catch permission errors or a missing mount early.
    pub async fn validate(&self) -> std::result::Result<(), String> {
        let probe = self.base_path.join(".health-check");

        let data = b"storage-health-check";
        fs::write(&probe, data)
            .await
            .map_err(|e| format!("write({:?}): {}", probe, e))?;

        let read_data = fs::read(&probe)
            .await
            .map_err(|e| format!("read({:?}): {}", probe, e))?;
        if read_data != data {
            return Err("read-back mismatch".to_string());
        }

        fs::remove_file(&probe)
            .await
            .map_err(|e| format!("remove_file({:?}): {}", probe, e))?;

        Ok(())
    }
}

#[async_trait]
impl StorageBackend for FilesystemBackend {
    async fn write(&self, name: &str, data: &[u8]) -> Result<()> {
        let full_path = self.full_path(name)?;
        debug!(filename = %name, full_path = %full_path.display(), size = data.len(), "file_storage: write");

        // Atomic write: temp file + rename, so readers never see a partial file
        let seq = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
        let temp_path = self.base_path.join(format!(".{}.{}.tmp", name, seq));
        let mut file = fs::File::create(&temp_path).await.map_err(|e| {
            warn!(temp_path = %temp_path.display(), error = %e, "file_storage: File::create failed");
            e
        })?;

        let staged = async {
            file.write_all(data).await?;
            file.sync_all().await?;
            drop(file);
            fs::rename(&temp_path, &full_path).await
        }
        .await;

        if let Err(e) = staged {
            warn!(
                temp_path = %temp_path.display(),
                full_path = %full_path.display(),
                error = %e,
                "file_storage: write failed, removing temp file"
            );
            fs::remove_file(&temp_path).await.ok();
            return Err(e.into());
        }

        // rw-r--r--, never executable
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&full_path, std::fs::Permissions::from_mode(0o644)).await?;
        }

        Ok(())
    }

    async fn read(&self, name: &str) -> Result<Vec<u8>> {
        let full_path = self.full_path(name)?;
        Ok(fs::read(full_path).await?)
    }

    async fn exists(&self, name: &str) -> Result<bool> {
        let full_path = self.full_path(name)?;
        Ok(fs::try_exists(full_path).await?)
    }
}
