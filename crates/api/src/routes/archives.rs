//! Route definitions for the `/archives` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::archives;
use crate::state::AppState;

/// Routes mounted at `/archives`.
///
/// The `{id}` segment is read as the year by `GET` and as the row id by
/// `PUT` / `DELETE`.
///
/// ```text
/// GET    /       -> list (public)
/// POST   /       -> create (super admin, multipart)
/// GET    /{id}   -> get_by_year (public)
/// PUT    /{id}   -> update (super admin, multipart)
/// DELETE /{id}   -> delete (super admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(archives::list).post(archives::create))
        .route(
            "/{id}",
            get(archives::get_by_year)
                .put(archives::update)
                .delete(archives::delete),
        )
}
