//! midibox-api binary: wires configuration, logging, the catalog and the
//! content directory into the HTTP server.

use std::net::SocketAddr;
use std::sync::Arc;

use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use midibox_api::{build_router, AppConfig, AppState, CatalogBackend, LogConfig};
use midibox_core::{defaults, CatalogRepository};
use midibox_db::{Database, FileGateway, FilesystemBackend, MemoryCatalogRepository};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env();
    let _file_guard = init_logging(&config.log);

    // Content directory
    let storage = FilesystemBackend::new(&config.upload_folder);
    storage.ensure_dir().await?;
    if let Err(e) = storage.validate().await {
        warn!(
            subsystem = "storage",
            path = %config.upload_folder.display(),
            error = %e,
            "Upload folder failed validation; uploads will fail"
        );
    }

    // Catalog
    let (catalog, db): (Arc<dyn CatalogRepository>, Option<Database>) =
        match config.catalog_backend {
            CatalogBackend::Postgres => {
                info!(
                    subsystem = "database",
                    url = %config.redacted_database_url(),
                    "Connecting to catalog database"
                );
                let db =
                    Database::connect_with_config(&config.database_url, config.pool_config())
                        .await?;
                db.migrate().await?;
                info!(subsystem = "database", "Migrations applied");
                (Arc::new(db.catalog.clone()), Some(db))
            }
            CatalogBackend::Memory => {
                warn!(
                    subsystem = "database",
                    "Using in-memory catalog; records are lost on shutdown"
                );
                (Arc::new(MemoryCatalogRepository::new()), None)
            }
        };

    let gateway = FileGateway::new(catalog, Arc::new(storage));
    let state = AppState::new(gateway, config.genre_required);
    let app = build_router(state, config.max_upload_bytes);

    let addr: SocketAddr = config.bind_addr().parse()?;
    info!(
        %addr,
        upload_folder = %config.upload_folder.display(),
        genre_required = config.genre_required,
        max_upload_bytes = config.max_upload_bytes,
        "Starting server"
    );
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    if let Some(db) = db {
        db.close().await;
        info!(subsystem = "database", "Connection pool closed");
    }

    Ok(())
}

/// Resolves on Ctrl-C, or SIGTERM on unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("Shutdown signal received");
}

/// Install the global subscriber.
///
/// `RUST_LOG` selects levels; `LOG_FORMAT`, `LOG_FILE` and `LOG_ANSI` select
/// the output. The returned guard must live as long as file logging should.
fn init_logging(log: &LogConfig) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| defaults::LOG_FILTER.into());

    let registry = tracing_subscriber::registry().with(env_filter);

    let guard = if let Some(ref path) = log.file {
        let file_dir = std::path::Path::new(path)
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(std::path::Path::new("."));
        let file_name = std::path::Path::new(path)
            .file_name()
            .and_then(|f| f.to_str())
            .unwrap_or("midibox-api.log");
        let file_appender = tracing_appender::rolling::daily(file_dir, file_name);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        if log.format == "json" {
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(non_blocking),
                )
                .init();
        } else {
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(log.ansi.unwrap_or(false)); // no ANSI in files
            registry.with(layer).init();
        }
        Some(guard)
    } else {
        if log.format == "json" {
            registry
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        } else {
            let mut layer = tracing_subscriber::fmt::layer();
            if let Some(ansi) = log.ansi {
                layer = layer.with_ansi(ansi);
            }
            registry.with(layer).init();
        }
        None
    };

    info!(
        log_format = %log.format,
        log_file = log.file.as_deref().unwrap_or("(stdout)"),
        "Logging initialized"
    );

    guard
}
