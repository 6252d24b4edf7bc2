//! Route definitions for the `/contenu` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::contenu;
use crate::state::AppState;

/// Routes mounted at `/contenu`.
///
/// ```text
/// GET /        -> list (public)
/// GET /{cle}   -> get_by_key (public)
/// PUT /{cle}   -> upsert (super admin, multipart)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(contenu::list))
        .route("/{cle}", get(contenu::get_by_key).put(contenu::upsert))
}
