//! HTTP upload service for spacestore.
//!
//! Exposes `POST /upload`, which stores a multipart `file` field under the
//! directory of the tenant owning the request's `X-API-Key` and extracts
//! ZIP and TAR archives in place, and `GET /health` for liveness probes.
//!
//! # Examples
//!
//! ```no_run
//! use spacestore_core::KeyMap;
//! use spacestore_server::AppState;
//! use spacestore_server::router;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let keys = KeyMap::load("api_keys.json")?;
//! let app = router(AppState::new(keys, "uploads"), 10 * 1024 * 1024);
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod auth;
pub mod error;
pub mod upload;

use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use axum::routing::post;
use spacestore_core::KeyMap;
use tower_http::trace::TraceLayer;

pub use auth::Tenant;
pub use error::UploadError;

/// Tracing target for rejected credentials and hostile archives.
pub const SECURITY_TARGET: &str = "spacestore::security";

/// Shared, read-only state for all request handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// API key to tenant mapping, fixed at startup.
    pub keys: Arc<KeyMap>,
    /// Directory holding one subdirectory per tenant.
    pub uploads_root: Arc<PathBuf>,
}

impl AppState {
    /// Creates the state from a loaded key map and the uploads root.
    pub fn new(keys: KeyMap, uploads_root: impl Into<PathBuf>) -> Self {
        Self {
            keys: Arc::new(keys),
            uploads_root: Arc::new(uploads_root.into()),
        }
    }
}

/// Builds the service router.
///
/// `max_upload_size` bounds the request body in bytes.
pub fn router(state: AppState, max_upload_size: usize) -> Router {
    Router::new()
        .route("/upload", post(upload::upload))
        .route("/health", get(health))
        .layer(DefaultBodyLimit::max(max_upload_size))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}
