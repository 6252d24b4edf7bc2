//! Route definitions for the `/eposters` resource.

use axum::routing::{delete, get, post, put};
use axum::Router;

use crate::handlers::eposters;
use crate::state::AppState;

/// Routes mounted at `/eposters`.
///
/// ```text
/// POST   /upload                   -> upload (public, multipart)
/// GET    /public                   -> list_public (public)
/// GET    /public/{id}              -> get_public (public, counts a view)
/// POST   /{id}/increment-download  -> increment_download (public)
/// GET    /{id}/download            -> download (public)
/// GET    /admin                    -> list_admin (staff)
/// GET    /admin/{id}               -> get_admin (staff)
/// PUT    /{id}/approve             -> approve (staff)
/// PUT    /{id}/reject              -> reject (staff)
/// DELETE /{id}                     -> delete (staff)
/// GET    /stats                    -> stats (staff)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/upload", post(eposters::upload))
        .route("/public", get(eposters::list_public))
        .route("/public/{id}", get(eposters::get_public))
        .route("/admin", get(eposters::list_admin))
        .route("/admin/{id}", get(eposters::get_admin))
        .route("/stats", get(eposters::stats))
        .route("/{id}", delete(eposters::delete))
        .route("/{id}/increment-download", post(eposters::increment_download))
        .route("/{id}/download", get(eposters::download))
        .route("/{id}/approve", put(eposters::approve))
        .route("/{id}/reject", put(eposters::reject))
}
