//! Route definitions for the `/sponsors` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::sponsors;
use crate::state::AppState;

/// Routes mounted at `/sponsors`.
///
/// ```text
/// GET    /             -> list_public (public, grouped by tier)
/// POST   /             -> create (staff, multipart)
/// GET    /all          -> list_all (staff)
/// GET    /stats        -> stats (staff)
/// GET    /niveaux      -> niveaux (public)
/// GET    /{id}         -> get_by_id (public)
/// PUT    /{id}         -> update (staff, multipart)
/// DELETE /{id}         -> delete (staff)
/// POST   /{id}/click   -> click (public)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(sponsors::list_public).post(sponsors::create))
        .route("/all", get(sponsors::list_all))
        .route("/stats", get(sponsors::stats))
        .route("/niveaux", get(sponsors::niveaux))
        .route(
            "/{id}",
            get(sponsors::get_by_id)
                .put(sponsors::update)
                .delete(sponsors::delete),
        )
        .route("/{id}/click", post(sponsors::click))
}
