//! Route definitions for the `/public` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::public;
use crate::state::AppState;

/// Routes mounted at `/public`. The gallery's `/public/...` paths are
/// merged separately.
///
/// ```text
/// GET  /info      -> info (public)
/// POST /contact   -> contact (public)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/info", get(public::info))
        .route("/contact", post(public::contact))
}
