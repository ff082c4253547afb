//! Server configuration.
//!
//! Everything the server needs from the environment is read once at startup
//! into [`AppConfig`]. Unparseable numbers and flags fall back to defaults.
//!
//! | Variable | Default |
//! |----------|---------|
//! | `DATABASE_URL` | composed from `POSTGRES_*` |
//! | `POSTGRES_USER` / `POSTGRES_PASSWORD` / `POSTGRES_HOST` / `POSTGRES_PORT` / `POSTGRES_DB` | `postgres` / empty / `localhost` / `5432` / `midibox` |
//! | `CATALOG_BACKEND` | `postgres` (`memory` keeps the catalog in process) |
//! | `UPLOAD_FOLDER` | `uploads` |
//! | `HOST` / `PORT` | `0.0.0.0` / `3000` |
//! | `GENRE_REQUIRED` | `true` |
//! | `MAX_UPLOAD_BYTES` | 16 MiB |
//! | `DB_MAX_CONNECTIONS` / `DB_MIN_CONNECTIONS` | 10 / 1 |
//! | `DB_ACQUIRE_TIMEOUT_SECS` / `DB_IDLE_TIMEOUT_SECS` | 30 / 600 (0 keeps idle connections) |
//! | `LOG_FORMAT` / `LOG_FILE` / `LOG_ANSI` | `text` / stdout / auto |

use std::path::PathBuf;

use midibox_core::defaults;
use midibox_db::PoolConfig;

/// Where catalog rows live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogBackend {
    Postgres,
    Memory,
}

/// Log output settings, consumed by `main` when building the subscriber.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// "json" or "text".
    pub format: String,
    /// Optional log file path (daily rotation).
    pub file: Option<String>,
    /// Explicit ANSI override, auto-detected when `None`.
    pub ansi: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub database_url: String,
    pub catalog_backend: CatalogBackend,
    pub upload_folder: PathBuf,
    pub host: String,
    pub port: u16,
    pub genre_required: bool,
    pub max_upload_bytes: usize,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
    pub db_idle_timeout_secs: u64,
    pub log: LogConfig,
}

impl AppConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL")
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| compose_database_url(&lookup));

        let catalog_backend = match lookup("CATALOG_BACKEND").as_deref() {
            Some("memory") => CatalogBackend::Memory,
            _ => CatalogBackend::Postgres,
        };

        Self {
            database_url,
            catalog_backend,
            upload_folder: lookup("UPLOAD_FOLDER")
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| defaults::UPLOAD_FOLDER.to_string())
                .into(),
            host: lookup("HOST").unwrap_or_else(|| defaults::HOST.to_string()),
            port: parse_or(lookup("PORT"), defaults::PORT),
            genre_required: lookup("GENRE_REQUIRED")
                .map(|v| parse_flag(&v))
                .unwrap_or(true),
            max_upload_bytes: parse_or(lookup("MAX_UPLOAD_BYTES"), defaults::MAX_UPLOAD_BYTES),
            db_max_connections: parse_or(lookup("DB_MAX_CONNECTIONS"), defaults::DB_MAX_CONNECTIONS),
            db_min_connections: parse_or(lookup("DB_MIN_CONNECTIONS"), defaults::DB_MIN_CONNECTIONS),
            db_acquire_timeout_secs: parse_or(
                lookup("DB_ACQUIRE_TIMEOUT_SECS"),
                defaults::DB_ACQUIRE_TIMEOUT_SECS,
            ),
            db_idle_timeout_secs: parse_or(
                lookup("DB_IDLE_TIMEOUT_SECS"),
                defaults::DB_IDLE_TIMEOUT_SECS,
            ),
            log: LogConfig {
                format: lookup("LOG_FORMAT").unwrap_or_else(|| "text".to_string()),
                file: lookup("LOG_FILE"),
                ansi: lookup("LOG_ANSI").map(|v| parse_flag(&v)),
            },
        }
    }

    /// `host:port` for the listener.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Pool settings for the Postgres catalog.
    pub fn pool_config(&self) -> PoolConfig {
        PoolConfig::new()
            .max_connections(self.db_max_connections)
            .min_connections(self.db_min_connections)
            .acquire_timeout_secs(self.db_acquire_timeout_secs)
            .idle_timeout_secs(self.db_idle_timeout_secs)
    }

    /// Connection string with any password masked, for logging.
    pub fn redacted_database_url(&self) -> String {
        match (self.database_url.find("://"), self.database_url.rfind('@')) {
            (Some(scheme_end), Some(at)) if at > scheme_end => {
                let credentials = &self.database_url[scheme_end + 3..at];
                match credentials.split_once(':') {
                    Some((user, _)) => format!(
                        "{}{}:***{}",
                        &self.database_url[..scheme_end + 3],
                        user,
                        &self.database_url[at..]
                    ),
                    None => self.database_url.clone(),
                }
            }
            _ => self.database_url.clone(),
        }
    }
}

fn compose_database_url<F>(lookup: &F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    let user = lookup("POSTGRES_USER").unwrap_or_else(|| defaults::POSTGRES_USER.to_string());
    let password = lookup("POSTGRES_PASSWORD").unwrap_or_default();
    let host = lookup("POSTGRES_HOST").unwrap_or_else(|| defaults::POSTGRES_HOST.to_string());
    let port: u16 = parse_or(lookup("POSTGRES_PORT"), defaults::POSTGRES_PORT);
    let db = lookup("POSTGRES_DB").unwrap_or_else(|| defaults::POSTGRES_DB.to_string());

    let credentials = if password.is_empty() {
        urlencoding::encode(&user).into_owned()
    } else {
        format!(
            "{}:{}",
            urlencoding::encode(&user),
            urlencoding::encode(&password)
        )
    };

    format!("postgres://{}@{}:{}/{}", credentials, host, port, db)
}

fn parse_or<T: std::str::FromStr>(value: Option<String>, default: T) -> T {
    value.and_then(|v| v.trim().parse().ok()).unwrap_or(default)
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
