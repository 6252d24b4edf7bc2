//! Route definitions for the video gallery (rooms, chapters, videos).
//!
//! Unlike the other resources these routes carry their full paths and are
//! merged into the API router, since public and admin endpoints share the
//! same handlers modules but live under different prefixes.

use axum::routing::{get, patch, post, put};
use axum::Router;

use crate::handlers::{chapters, rooms, videos};
use crate::state::AppState;

/// Gallery routes.
///
/// Sibling segments share one parameter name, so `{id}` under
/// `/admin/rooms` is also the room id of its chapter routes.
///
/// ```text
/// GET    /public/rooms                          -> rooms::list_public
/// GET    /public/rooms/{slug}                   -> rooms::get_public
/// GET    /public/rooms/{slug}/chapters          -> chapters::list_public_by_room
/// GET    /public/chapters/{slug}                -> chapters::get_public
/// GET    /public/chapters/{slug}/videos         -> videos::list_public_by_chapter
/// GET    /public/videos/popular                 -> videos::popular
/// GET    /public/videos/recent                  -> videos::recent
/// GET    /public/videos/search                  -> videos::search
/// GET    /public/videos/{key}                   -> videos::get_public (slug)
/// POST   /public/videos/{key}/view              -> videos::record_view (id)
///
/// GET    /admin/rooms                           -> rooms::list_admin
/// POST   /admin/rooms                           -> rooms::create
/// PUT    /admin/rooms/reorder                   -> rooms::reorder
/// GET    /admin/rooms/{id}                      -> rooms::get_admin
/// PUT    /admin/rooms/{id}                      -> rooms::update
/// DELETE /admin/rooms/{id}                      -> rooms::delete
/// PATCH  /admin/rooms/{id}/toggle               -> rooms::toggle
/// GET    /admin/rooms/{id}/chapters             -> chapters::list_admin_by_room
/// PUT    /admin/rooms/{id}/chapters/reorder     -> chapters::reorder
///
/// POST   /admin/chapters                        -> chapters::create
/// GET    /admin/chapters/{id}                   -> chapters::get_admin
/// PUT    /admin/chapters/{id}                   -> chapters::update
/// DELETE /admin/chapters/{id}                   -> chapters::delete
/// PATCH  /admin/chapters/{id}/move              -> chapters::move_to_room
/// GET    /admin/chapters/{id}/videos            -> videos::list_admin_by_chapter
/// PUT    /admin/chapters/{id}/videos/reorder    -> videos::reorder
///
/// POST   /admin/videos                          -> videos::create
/// GET    /admin/videos/stats                    -> videos::stats
/// GET    /admin/videos/{id}                     -> videos::get_admin
/// PUT    /admin/videos/{id}                     -> videos::update
/// DELETE /admin/videos/{id}                     -> videos::delete
/// PUT    /admin/videos/{id}/thumbnail           -> videos::replace_thumbnail
/// PATCH  /admin/videos/{id}/publish             -> videos::publish
/// PATCH  /admin/videos/{id}/unpublish           -> videos::unpublish
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        // Public
        .route("/public/rooms", get(rooms::list_public))
        .route("/public/rooms/{slug}", get(rooms::get_public))
        .route(
            "/public/rooms/{slug}/chapters",
            get(chapters::list_public_by_room),
        )
        .route("/public/chapters/{slug}", get(chapters::get_public))
        .route(
            "/public/chapters/{slug}/videos",
            get(videos::list_public_by_chapter),
        )
        .route("/public/videos/popular", get(videos::popular))
        .route("/public/videos/recent", get(videos::recent))
        .route("/public/videos/search", get(videos::search))
        .route("/public/videos/{key}", get(videos::get_public))
        .route("/public/videos/{key}/view", post(videos::record_view))
        // Rooms
        .route(
            "/admin/rooms",
            get(rooms::list_admin).post(rooms::create),
        )
        .route("/admin/rooms/reorder", put(rooms::reorder))
        .route(
            "/admin/rooms/{id}",
            get(rooms::get_admin)
                .put(rooms::update)
                .delete(rooms::delete),
        )
        .route("/admin/rooms/{id}/toggle", patch(rooms::toggle))
        .route(
            "/admin/rooms/{id}/chapters",
            get(chapters::list_admin_by_room),
        )
        .route(
            "/admin/rooms/{id}/chapters/reorder",
            put(chapters::reorder),
        )
        // Chapters
        .route("/admin/chapters", post(chapters::create))
        .route(
            "/admin/chapters/{id}",
            get(chapters::get_admin)
                .put(chapters::update)
                .delete(chapters::delete),
        )
        .route("/admin/chapters/{id}/move", patch(chapters::move_to_room))
        .route(
            "/admin/chapters/{id}/videos",
            get(videos::list_admin_by_chapter),
        )
        .route(
            "/admin/chapters/{id}/videos/reorder",
            put(videos::reorder),
        )
        // Videos
        .route("/admin/videos", post(videos::create))
        .route("/admin/videos/stats", get(videos::stats))
        .route(
            "/admin/videos/{id}",
            get(videos::get_admin)
                .put(videos::update)
                .delete(videos::delete),
        )
        .route(
            "/admin/videos/{id}/thumbnail",
            put(videos::replace_thumbnail),
        )
        .route("/admin/videos/{id}/publish", patch(videos::publish))
        .route("/admin/videos/{id}/unpublish", patch(videos::unpublish))
}
