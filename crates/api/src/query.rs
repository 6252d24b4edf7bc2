//! Shared query parameter types for API handlers.
//!
//! Common query structs that appear across multiple handler modules are
//! extracted here to avoid duplication.

use serde::Deserialize;

/// Generic pagination parameters (`?limit=&offset=`).
///
/// Values are clamped in the handler via `clamp_limit` / `clamp_offset`.
#[derive(Debug, Deserialize)]
pub struct PaginationParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// `?annee=` filter.
#[derive(Debug, Default, Deserialize)]
pub struct YearParams {
    pub annee: Option<i32>,
}

/// `?limit=` for top-N listings.
#[derive(Debug, Deserialize)]
pub struct LimitParams {
    pub limit: Option<i64>,
}

/// `{ commentaires? }` body of moderation actions.
#[derive(Debug, Default, Deserialize)]
pub struct ModerationInput {
    pub commentaires: Option<String>,
}
