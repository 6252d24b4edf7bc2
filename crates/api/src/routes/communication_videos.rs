//! Route definitions for the `/videos` resource (communication videos).

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::communication_videos as videos;
use crate::state::AppState;

/// Routes mounted at `/videos`.
///
/// ```text
/// POST   /upload                        -> upload (public, multipart)
/// POST   /upload-url                    -> upload_url (public)
/// GET    /public                        -> list_public (public)
/// POST   /{id}/incrementer-vues         -> increment_views (public)
/// POST   /{id}/incrementer-telechargements -> increment_downloads (public)
/// GET    /admin/all                     -> list_admin (staff)
/// GET    /admin/{id}                    -> get_admin (staff)
/// DELETE /admin/{id}                    -> delete (staff)
/// POST   /admin/{id}/approuver          -> approve (staff)
/// POST   /admin/{id}/rejeter            -> reject (staff)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/upload", post(videos::upload))
        .route("/upload-url", post(videos::upload_url))
        .route("/public", get(videos::list_public))
        .route("/{id}/incrementer-vues", post(videos::increment_views))
        .route(
            "/{id}/incrementer-telechargements",
            post(videos::increment_downloads),
        )
        .route("/admin/all", get(videos::list_admin))
        .route(
            "/admin/{id}",
            get(videos::get_admin).delete(videos::delete),
        )
        .route("/admin/{id}/approuver", post(videos::approve))
        .route("/admin/{id}/rejeter", post(videos::reject))
}
