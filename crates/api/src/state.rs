use std::sync::Arc;

use smcd_cloud::MediaStore;
use smcd_events::Mailer;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: smcd_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Blob storage for uploaded files.
    pub media: Arc<dyn MediaStore>,
    /// SMTP mailer; `None` when `SMTP_HOST` is not configured.
    pub mailer: Option<Arc<Mailer>>,
}
