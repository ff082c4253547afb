//! # midibox-api
//!
//! HTTP surface for midibox: the upload form and listing page, file
//! download by id, plus a small JSON API and a health check.
//!
//! The router is built from [`AppState`] alone so integration tests can run
//! it against an in-process catalog and a temporary content directory.

pub mod config;
pub mod error;
pub mod forms;
pub mod handlers;
pub mod render;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::{
    catch_panic::CatchPanicLayer,
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
    trace::TraceLayer,
};
use uuid::Uuid;

use midibox_db::FileGateway;

pub use config::{AppConfig, CatalogBackend, LogConfig};
pub use error::ApiError;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub gateway: FileGateway,
    /// Genre-aware mode: uploads without a genre are turned away.
    pub genre_required: bool,
}

impl AppState {
    pub fn new(gateway: FileGateway, genre_required: bool) -> Self {
        Self {
            gateway,
            genre_required,
        }
    }
}

/// Generates time-ordered UUIDv7 request correlation IDs.
#[derive(Clone, Default)]
pub struct MakeRequestUuidV7;

impl MakeRequestId for MakeRequestUuidV7 {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        let id = Uuid::now_v7().to_string().parse().ok()?;
        Some(RequestId::new(id))
    }
}

/// Build the full application router.
///
/// `max_upload_bytes` caps every request body, the multipart upload included.
pub fn build_router(state: AppState, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/", get(handlers::index::index))
        .route("/upload", post(handlers::upload::upload))
        .route("/download/:id", get(handlers::download::download))
        .route("/health", get(handlers::api::health))
        .route("/api/v1/files", get(handlers::api::list_files))
        .route("/api/v1/genres", get(handlers::api::list_genres))
        .layer(CatchPanicLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(RequestBodyLimitLayer::new(max_upload_bytes))
        .with_state(state)
}
