//! Centralized default constants for midibox.
//!
//! All crates reference these constants instead of defining their own magic
//! numbers. Column limits must match `migrations/`.

// =============================================================================
// CATALOG
// =============================================================================

/// Maximum length of a stored filename (`midi_file.filename VARCHAR(100)`).
pub const MAX_FILENAME_LEN: usize = 100;

/// Maximum length of a genre tag (`midi_file.genre VARCHAR(50)`).
pub const MAX_GENRE_LEN: usize = 50;

// =============================================================================
// STORAGE
// =============================================================================

/// Content directory used when `UPLOAD_FOLDER` is unset.
pub const UPLOAD_FOLDER: &str = "uploads";

/// Request body limit for uploads (16 MiB).
pub const MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

// =============================================================================
// SERVER
// =============================================================================

/// Bind host.
pub const HOST: &str = "0.0.0.0";

/// Bind port.
pub const PORT: u16 = 3000;

/// Default `RUST_LOG` filter for the API binary.
pub const LOG_FILTER: &str = "midibox_api=debug,midibox_db=debug,tower_http=debug";

// =============================================================================
// DATABASE
// =============================================================================

/// Database name used when composing a URL from `POSTGRES_*` variables.
pub const POSTGRES_DB: &str = "midibox";

/// Postgres user used when composing a URL from `POSTGRES_*` variables.
pub const POSTGRES_USER: &str = "postgres";

/// Postgres host used when composing a URL from `POSTGRES_*` variables.
pub const POSTGRES_HOST: &str = "localhost";

/// Postgres port used when composing a URL from `POSTGRES_*` variables.
pub const POSTGRES_PORT: u16 = 5432;

/// Pool ceiling (`DB_MAX_CONNECTIONS`).
pub const DB_MAX_CONNECTIONS: u32 = 10;

/// Connections kept open while idle (`DB_MIN_CONNECTIONS`).
pub const DB_MIN_CONNECTIONS: u32 = 1;

/// Seconds a request waits for a pooled connection (`DB_ACQUIRE_TIMEOUT_SECS`).
pub const DB_ACQUIRE_TIMEOUT_SECS: u64 = 30;

/// Seconds before an idle connection is closed (`DB_IDLE_TIMEOUT_SECS`, 0 keeps them).
pub const DB_IDLE_TIMEOUT_SECS: u64 = 600;
