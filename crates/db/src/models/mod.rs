//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for patches
//! - Where responses carry computed fields, a `...View` wrapper built with
//!   `From<Row>`

pub mod abstract_submission;
pub mod archive;
pub mod chapter;
pub mod communication_video;
pub mod contenu;
pub mod document;
pub mod eposter;
pub mod newsletter;
pub mod room;
pub mod speaker;
pub mod sponsor;
pub mod stats;
pub mod user;
pub mod video;
