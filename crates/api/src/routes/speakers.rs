//! Route definitions for the `/speakers` resource.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::speakers;
use crate::state::AppState;

/// Routes mounted at `/speakers`.
///
/// ```text
/// GET    /             -> list_public (public)
/// POST   /             -> create (staff, multipart)
/// GET    /filters      -> filters (public)
/// GET    /president    -> president (public)
/// GET    /admin        -> list_admin (staff)
/// GET    /admin/{id}   -> get_admin (staff)
/// PUT    /reorder      -> reorder (staff)
/// GET    /stats        -> stats (staff)
/// GET    /{id}         -> get_by_id (public)
/// PUT    /{id}         -> update (staff, multipart)
/// DELETE /{id}         -> delete (staff)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(speakers::list_public).post(speakers::create))
        .route("/filters", get(speakers::filters))
        .route("/president", get(speakers::president))
        .route("/admin", get(speakers::list_admin))
        .route("/admin/{id}", get(speakers::get_admin))
        .route("/reorder", put(speakers::reorder))
        .route("/stats", get(speakers::stats))
        .route(
            "/{id}",
            get(speakers::get_by_id)
                .put(speakers::update)
                .delete(speakers::delete),
        )
}
