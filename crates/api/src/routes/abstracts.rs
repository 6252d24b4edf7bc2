//! Route definitions for the `/abstracts` resource.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::abstracts;
use crate::state::AppState;

/// Routes mounted at `/abstracts`.
///
/// ```text
/// POST   /submit              -> submit (public)
/// GET    /options             -> options (public)
/// GET    /reference/{numero}  -> get_by_reference (public)
/// GET    /                    -> list (staff)
/// GET    /stats               -> stats (staff)
/// GET    /export              -> export (staff)
/// GET    /{id}                -> get_by_id (staff)
/// DELETE /{id}                -> delete (super admin)
/// PUT    /{id}/status         -> update_status (staff)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/submit", post(abstracts::submit))
        .route("/options", get(abstracts::options))
        .route("/reference/{numero}", get(abstracts::get_by_reference))
        .route("/", get(abstracts::list))
        .route("/stats", get(abstracts::stats))
        .route("/export", get(abstracts::export))
        .route(
            "/{id}",
            get(abstracts::get_by_id).delete(abstracts::delete),
        )
        .route("/{id}/status", put(abstracts::update_status))
}
