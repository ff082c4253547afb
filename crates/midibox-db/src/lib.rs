//! # midibox-db
//!
//! PostgreSQL catalog and filesystem storage for midibox.
//!
//! This crate provides:
//! - Connection pool management
//! - `PgCatalogRepository`, the Postgres `CatalogRepository`
//! - `MemoryCatalogRepository`, a process-local `CatalogRepository`
//! - `FilesystemBackend`, the flat content directory
//! - `FileGateway`, the write-then-insert upload workflow and id-based download
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use midibox_db::{Database, FileGateway, FilesystemBackend};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::connect("postgres://localhost/midibox").await?;
//!     let gateway = FileGateway::new(
//!         Arc::new(db.catalog.clone()),
//!         Arc::new(FilesystemBackend::new("uploads")),
//!     );
//!     let listing = gateway.listing(Default::default()).await?;
//!     println!("{} files", listing.files.len());
//!     db.close().await;
//!     Ok(())
//! }
//! ```
pub mod catalog;
pub mod file_storage;
pub mod gateway;
pub mod memory;
pub mod pool;

// Test fixtures for integration tests
// Note: Always compiled so integration tests (in tests/) can use DEFAULT_TEST_DATABASE_URL
pub mod test_fixtures;

// Re-export core types
pub use midibox_core::*;

pub use catalog::PgCatalogRepository;
pub use file_storage::{FilesystemBackend, StorageBackend};
pub use gateway::{FileGateway, Listing, ServedFile};
pub use memory::MemoryCatalogRepository;
pub use pool::{log_pool_metrics, open_pool, PoolConfig};

/// Database handle: the pool plus the repositories built on it.
///
/// Constructed once at startup and closed on shutdown; handlers receive it
/// through application state, never through a global.
#[derive(Clone)]
pub struct Database {
    /// The underlying connection pool.
    pub pool: sqlx::Pool<sqlx::Postgres>,
    /// File catalog repository.
    pub catalog: PgCatalogRepository,
}

impl Database {
    /// Create a new Database instance from a connection pool.
    pub fn new(pool: sqlx::Pool<sqlx::Postgres>) -> Self {
        Self {
            catalog: PgCatalogRepository::new(pool.clone()),
            pool,
        }
    }

    /// Create a new Database instance by connecting to the given URL.
    pub async fn connect(url: &str) -> Result<Self> {
        let pool = open_pool(url, &PoolConfig::default()).await?;
        Ok(Self::new(pool))
    }

    /// Create with custom pool configuration.
    pub async fn connect_with_config(url: &str, config: PoolConfig) -> Result<Self> {
        let pool = open_pool(url, &config).await?;
        Ok(Self::new(pool))
    }

    /// Run pending migrations.
    #[cfg(feature = "migrations")]
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("../../migrations")
            .run(&self.pool)
            .await
            .map_err(|e| Error::Database(sqlx::Error::Migrate(Box::new(e))))?;
        Ok(())
    }

    /// Get the underlying connection pool.
    pub fn pool(&self) -> &sqlx::Pool<sqlx::Postgres> {
        &self.pool
    }

    /// Close every pooled connection. Pending queries finish first.
    pub async fn close(&self) {
        log_pool_metrics(&self.pool);
        self.pool.close().await;
    }
}
