//! Request handlers, one submodule per resource.
//!
//! Handlers extract the caller, state, path/query parameters and body, delegate
//! to the matching repository in `smcd_db` and map errors via [`AppError`].
//!
//! [`AppError`]: crate::error::AppError

pub mod abstracts;
pub mod archives;
pub mod auth;
pub mod chapters;
pub mod communication_videos;
pub mod contenu;
pub mod diagnostics;
pub mod documents;
pub mod eposters;
pub mod newsletter;
pub mod public;
pub mod rooms;
pub mod speakers;
pub mod sponsors;
pub mod videos;
