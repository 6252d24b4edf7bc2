//! Route definitions for the `/test` diagnostics resource.

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::diagnostics;
use crate::state::AppState;

/// Routes mounted at `/test`.
///
/// ```text
/// GET    /health        -> health (public)
/// POST   /upload        -> upload (super admin, multipart)
/// POST   /send-email    -> send_email (super admin)
/// DELETE /delete-file   -> delete_file (super admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(diagnostics::health))
        .route("/upload", post(diagnostics::upload))
        .route("/send-email", post(diagnostics::send_email))
        .route("/delete-file", delete(diagnostics::delete_file))
}
