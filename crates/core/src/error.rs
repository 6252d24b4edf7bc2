//! Domain errors shared by every crate. The API layer maps each variant to
//! an HTTP status; messages in `Validation`, `Conflict`, `Unauthorized` and
//! `Forbidden` are shown to the client as-is, so they are written in French.

use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("{entity} not found (id {id})")]
    NotFound { entity: &'static str, id: DbId },

    /// Lookup by a natural key: slug, reference number, year, token.
    #[error("{entity} not found ({key})")]
    NotFoundKey { entity: &'static str, key: String },

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Logged server-side; the client only sees a generic message.
    #[error("internal error: {0}")]
    Internal(String),
}
