//! Best-effort side effects: notification emails and blob cleanup.
//!
//! Failures here are logged and never surface to the client.

use smcd_cloud::{MediaKind, MediaStore};
use smcd_events::Email;

use crate::state::AppState;

/// Send `email` to `to` on a background task.
pub fn send_email(state: &AppState, to: &str, email: Email) {
    let Some(mailer) = state.mailer.clone() else {
        tracing::warn!(to, subject = %email.subject, "SMTP not configured, email skipped");
        return;
    };

    let to = to.to_string();
    tokio::spawn(async move {
        if let Err(e) = mailer.send(&to, &email).await {
            tracing::error!(error = %e, to = %to, subject = %email.subject, "Failed to send email");
        }
    });
}

/// Delete a stored blob, logging instead of failing.
pub async fn discard_media(media: &dyn MediaStore, public_id: Option<&str>, kind: MediaKind) {
    let Some(public_id) = public_id.filter(|id| !id.is_empty()) else {
        return;
    };
    match media.delete(public_id, kind).await {
        Ok(true) => tracing::info!(public_id, "Media deleted"),
        Ok(false) => tracing::warn!(public_id, "Media not found in store"),
        Err(e) => tracing::warn!(error = %e, public_id, "Failed to delete media"),
    }
}
