//! Route definitions for the `/documents` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::documents;
use crate::state::AppState;

/// Routes mounted at `/documents`.
///
/// ```text
/// POST   /upload          -> upload (staff, multipart)
/// GET    /public          -> list_public (public)
/// GET    /types           -> types (public)
/// GET    /stats           -> stats (staff)
/// GET    /                -> list (staff)
/// GET    /{id}            -> get_by_id (public)
/// PUT    /{id}            -> update (staff, multipart)
/// DELETE /{id}            -> delete (staff)
/// GET    /{id}/download   -> download (public)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/upload", post(documents::upload))
        .route("/public", get(documents::list_public))
        .route("/types", get(documents::types))
        .route("/stats", get(documents::stats))
        .route("/", get(documents::list))
        .route(
            "/{id}",
            get(documents::get_by_id)
                .put(documents::update)
                .delete(documents::delete),
        )
        .route("/{id}/download", get(documents::download))
}
