//! Public congress information and the contact form (`/public`).

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use smcd_core::types::CURRENT_CONGRESS_YEAR;
use smcd_events::templates::{contact_ack, contact_forward, ContactMessage};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::response::{DataResponse, MessageResponse};
use crate::state::AppState;

const SEND_FAILURE: &str = "Erreur lors de l'envoi du message";

#[derive(Debug, Serialize)]
pub struct CongressInfo {
    pub nom: &'static str,
    pub organisateur: &'static str,
    pub lieu: &'static str,
    pub dates: &'static str,
    pub annee: i32,
    pub contact: String,
    pub soumissions_ouvertes: bool,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ContactRequest {
    #[validate(length(min = 1, max = 100, message = "Le nom est obligatoire"))]
    pub nom: String,
    #[validate(email(message = "Email invalide"))]
    pub email: String,
    #[validate(length(min = 1, max = 200, message = "Le sujet est obligatoire"))]
    pub sujet: String,
    #[validate(length(min = 1, max = 5000, message = "Le message est obligatoire"))]
    pub message: String,
}

/// GET /api/public/info
pub async fn info(State(state): State<AppState>) -> Json<DataResponse<CongressInfo>> {
    Json(DataResponse {
        data: CongressInfo {
            nom: "Congrès National de Chirurgie Digestive 2026",
            organisateur: "Société Marocaine de Chirurgie Digestive (SMCD)",
            lieu: "Casablanca, Maroc",
            dates: "À confirmer",
            annee: CURRENT_CONGRESS_YEAR,
            contact: state.config.contact_email.clone(),
            soumissions_ouvertes: true,
        },
    })
}

/// POST /api/public/contact
///
/// Forwards the message to the congress inbox, then acknowledges the
/// sender. Unlike other notifications the outcome is reported to the
/// client.
pub async fn contact(
    State(state): State<AppState>,
    Json(input): Json<ContactRequest>,
) -> AppResult<Json<MessageResponse>> {
    input.validate()?;

    let Some(mailer) = state.mailer.as_ref() else {
        tracing::error!("Contact form used while SMTP is not configured");
        return Err(AppError::InternalError(SEND_FAILURE.into()));
    };

    let message = ContactMessage {
        nom: &input.nom,
        email: &input.email,
        sujet: &input.sujet,
        message: &input.message,
    };

    let delivery = async {
        mailer
            .send(&state.config.contact_email, &contact_forward(&message))
            .await?;
        mailer.send(&input.email, &contact_ack(&message)).await
    };
    if let Err(e) = delivery.await {
        tracing::error!(error = %e, from = %input.email, "Failed to deliver contact message");
        return Err(AppError::InternalError(SEND_FAILURE.into()));
    }

    tracing::info!(from = %input.email, sujet = %input.sujet, "Contact message forwarded");
    Ok(Json(MessageResponse::new(
        "Votre message a été envoyé avec succès. Nous vous répondrons rapidement.",
    )))
}
