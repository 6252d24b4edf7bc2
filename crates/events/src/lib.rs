//! Outbound notifications for the congress platform.
//!
//! - [`delivery::email::Mailer`] sends messages over SMTP.
//! - [`templates`] renders the subject and bodies of every notification the
//!   platform sends (submission receipts, moderation decisions, newsletter,
//!   contact form).

pub mod delivery;
pub mod templates;

pub use delivery::email::{EmailConfig, EmailError, Mailer};
pub use templates::Email;
