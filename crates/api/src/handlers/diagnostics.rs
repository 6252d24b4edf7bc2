//! Health and operator diagnostics (`/test`).

use axum::extract::{Multipart, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use smcd_cloud::{MediaKind, StoredMedia};
use smcd_core::error::CoreError;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireSuperAdmin;
use crate::response::{DataResponse, MessageResponse};
use crate::state::AppState;
use crate::upload::UploadForm;

const DEFAULT_TEST_FOLDER: &str = "test";

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub database: bool,
    pub media_backend: &'static str,
    pub email_configured: bool,
}

#[derive(Debug, Deserialize, Validate)]
pub struct TestEmailRequest {
    #[validate(email(message = "Email invalide"))]
    pub to: String,
    #[validate(length(min = 1, message = "Le sujet est obligatoire"))]
    pub subject: String,
    pub body: String,
}

#[derive(Debug, Deserialize)]
pub struct DeleteFileParams {
    pub public_id: String,
    pub kind: Option<String>,
}

fn media_kind(value: Option<&str>) -> MediaKind {
    match value.map(str::to_ascii_lowercase).as_deref() {
        Some("image") => MediaKind::Image,
        Some("video") => MediaKind::Video,
        Some("raw") => MediaKind::Raw,
        _ => MediaKind::Auto,
    }
}

/// GET /health and GET /api/test/health
///
/// `status` is `UP` when the database answers, `DOWN` otherwise.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let database = smcd_db::health_check(&state.pool).await.is_ok();
    Json(HealthResponse {
        status: if database { "UP" } else { "DOWN" },
        version: env!("CARGO_PKG_VERSION"),
        database,
        media_backend: state.media.backend(),
        email_configured: state.mailer.is_some(),
    })
}

/// POST /api/test/upload
///
/// Multipart `file` and optional `folder`.
pub async fn upload(
    RequireSuperAdmin(user): RequireSuperAdmin,
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<Json<DataResponse<StoredMedia>>> {
    let mut form = UploadForm::read(multipart).await?;
    let file = form
        .take_file("file")
        .filter(|f| !f.is_empty())
        .ok_or_else(|| AppError::BadRequest("Le fichier est vide".into()))?;
    let folder = form
        .text("folder")
        .unwrap_or_else(|| DEFAULT_TEST_FOLDER.to_string());

    let stored = state.media.upload(&file, &folder, MediaKind::Auto).await?;
    tracing::info!(public_id = %stored.public_id, by = user.user_id, "Diagnostic upload");
    Ok(Json(DataResponse { data: stored }))
}

/// POST /api/test/send-email
pub async fn send_email(
    RequireSuperAdmin(user): RequireSuperAdmin,
    State(state): State<AppState>,
    Json(input): Json<TestEmailRequest>,
) -> AppResult<Json<MessageResponse>> {
    input.validate()?;
    let mailer = state.mailer.as_ref().ok_or_else(|| {
        AppError::InternalError("Le service d'email n'est pas configuré".into())
    })?;

    mailer
        .send_text(&input.to, &input.subject, &input.body)
        .await
        .map_err(|e| AppError::InternalError(format!("Erreur lors de l'envoi de l'email : {e}")))?;

    tracing::info!(to = %input.to, by = user.user_id, "Diagnostic email sent");
    Ok(Json(MessageResponse::new("Email envoyé avec succès")))
}

/// DELETE /api/test/delete-file?public_id=&kind=
pub async fn delete_file(
    RequireSuperAdmin(user): RequireSuperAdmin,
    State(state): State<AppState>,
    Query(params): Query<DeleteFileParams>,
) -> AppResult<Json<MessageResponse>> {
    let deleted = state
        .media
        .delete(&params.public_id, media_kind(params.kind.as_deref()))
        .await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFoundKey {
            entity: "Fichier",
            key: params.public_id,
        }));
    }

    tracing::info!(public_id = %params.public_id, by = user.user_id, "Diagnostic delete");
    Ok(Json(MessageResponse::new("Fichier supprimé avec succès")))
}
