//! Route definitions for the `/newsletter` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::newsletter;
use crate::state::AppState;

/// Routes mounted at `/newsletter`.
///
/// ```text
/// POST /subscribe            -> subscribe (public)
/// GET  /unsubscribe/{token}  -> unsubscribe (public)
/// GET  /subscribers          -> subscribers (staff)
/// GET  /stats                -> stats (staff)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/subscribe", post(newsletter::subscribe))
        .route("/unsubscribe/{token}", get(newsletter::unsubscribe))
        .route("/subscribers", get(newsletter::subscribers))
        .route("/stats", get(newsletter::stats))
}
