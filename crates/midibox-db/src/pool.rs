//! Catalog database connection pool.
//!
//! Every knob on [`PoolConfig`] is fed from server configuration
//! (`DB_MAX_CONNECTIONS`, `DB_MIN_CONNECTIONS`, `DB_ACQUIRE_TIMEOUT_SECS`,
//! `DB_IDLE_TIMEOUT_SECS`).

use std::time::{Duration, Instant};

use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::{debug, info, warn};

use midibox_core::{defaults, Error, Result};

/// Sizing and timeouts for the catalog pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolConfig {
    pub max_connections: u32,
    pub min_connections: u32,
    /// How long a request waits for a free connection before failing.
    pub acquire_timeout: Duration,
    /// `None` keeps idle connections open indefinitely.
    pub idle_timeout: Option<Duration>,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_connections: defaults::DB_MAX_CONNECTIONS,
            min_connections: defaults::DB_MIN_CONNECTIONS,
            acquire_timeout: Duration::from_secs(defaults::DB_ACQUIRE_TIMEOUT_SECS),
            idle_timeout: Some(Duration::from_secs(defaults::DB_IDLE_TIMEOUT_SECS)),
        }
    }
}

impl PoolConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_connections(mut self, n: u32) -> Self {
        self.max_connections = n.max(1);
        self
    }

    /// Clamped to `max_connections`.
    pub fn min_connections(mut self, n: u32) -> Self {
        self.min_connections = n;
        self
    }

    pub fn acquire_timeout_secs(mut self, secs: u64) -> Self {
        self.acquire_timeout = Duration::from_secs(secs);
        self
    }

    /// Zero disables idle reaping.
    pub fn idle_timeout_secs(mut self, secs: u64) -> Self {
        self.idle_timeout = (secs > 0).then(|| Duration::from_secs(secs));
        self
    }

    /// sqlx options for this configuration.
    pub fn options(&self) -> PgPoolOptions {
        PgPoolOptions::new()
            .max_connections(self.max_connections)
            .min_connections(self.min_connections.min(self.max_connections))
            .acquire_timeout(self.acquire_timeout)
            .idle_timeout(self.idle_timeout)
    }
}

/// Connect a pool to `database_url`.
///
/// An unreachable server comes back as `Error::Database`; startup treats it
/// as fatal.
pub async fn open_pool(database_url: &str, config: &PoolConfig) -> Result<PgPool> {
    let start = Instant::now();

    let pool = config
        .options()
        .connect(database_url)
        .await
        .map_err(|e| {
            warn!(
                subsystem = "database",
                component = "pool",
                op = "connect",
                error = %e,
                "Could not reach catalog database"
            );
            Error::Database(e)
        })?;

    info!(
        subsystem = "database",
        component = "pool",
        op = "connect",
        max_connections = config.max_connections,
        acquire_timeout_secs = config.acquire_timeout.as_secs(),
        pool_size = pool.size(),
        duration_ms = start.elapsed().as_millis() as u64,
        "Catalog pool ready"
    );
    Ok(pool)
}

/// Log pool occupancy; warns when every connection is checked out.
pub fn log_pool_metrics(pool: &PgPool) {
    let size = pool.size();
    let idle = pool.num_idle();

    if idle == 0 && size > 0 {
        warn!(subsystem = "database", component = "pool", pool_size = size, "No idle connections");
    } else {
        debug!(subsystem = "database", component = "pool", pool_size = size, pool_idle = idle, "Pool metrics");
    }
}
