//! Handlers for author-submitted communication videos (`/videos`).
//!
//! Submissions are public and land as `EN_ATTENTE`; staff approve or reject
//! them before they show up in the public listing.

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use smcd_cloud::MediaKind;
use smcd_core::catalog::{Rubrique, StatutModeration};
use smcd_core::error::CoreError;
use smcd_core::types::{DbId, CURRENT_CONGRESS_YEAR};
use smcd_core::upload::{video_format_from_content_type, video_format_from_url, COMMUNICATION_VIDEO};
use smcd_db::models::communication_video::{CommunicationVideoView, CreateCommunicationVideo};
use smcd_db::repositories::CommunicationVideoRepo;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireStaff;
use crate::notify::discard_media;
use crate::query::{ModerationInput, YearParams};
use crate::response::{DataResponse, MessageResponse};
use crate::state::AppState;
use crate::upload::UploadForm;

const UPLOAD_FOLDER: &str = "communications-videos/2026";

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Vidéo de communication",
        id,
    })
}

/// JSON body of `POST /videos/upload-url`, for videos already hosted
/// elsewhere.
#[derive(Debug, Deserialize, Validate)]
pub struct SubmitVideoUrlRequest {
    #[validate(length(min = 1, max = 100, message = "Le nom de l'auteur est obligatoire"))]
    pub nom_auteur: String,
    #[validate(length(min = 1, max = 100, message = "Le prénom de l'auteur est obligatoire"))]
    pub prenom_auteur: String,
    #[validate(email(message = "Email invalide"))]
    pub email_auteur: String,
    #[validate(length(min = 1, max = 300, message = "Le titre est obligatoire"))]
    pub titre: String,
    pub description: Option<String>,
    pub rubrique: Option<String>,
    pub video_url: Option<String>,
}

fn parse_rubrique(value: Option<&str>) -> AppResult<Option<String>> {
    match value {
        Some(code) => Ok(Some(code.parse::<Rubrique>()?.as_str().to_string())),
        None => Ok(None),
    }
}

/// POST /api/videos/upload
pub async fn upload(
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<DataResponse<CommunicationVideoView>>)> {
    let mut form = UploadForm::read(multipart).await?;
    let nom_auteur = form.required("nom_auteur", "Le nom de l'auteur est obligatoire")?;
    let prenom_auteur = form.required("prenom_auteur", "Le prénom de l'auteur est obligatoire")?;
    let email_auteur = form.required("email_auteur", "L'email est obligatoire")?;
    let titre = form.required("titre", "Le titre est obligatoire")?;
    let rubrique = parse_rubrique(form.text("rubrique").as_deref())?;
    let file = form.take_checked("file", &COMMUNICATION_VIDEO, "Le fichier est vide")?;

    let stored = state
        .media
        .upload(&file, UPLOAD_FOLDER, MediaKind::Video)
        .await?;

    let input = CreateCommunicationVideo {
        nom_auteur,
        prenom_auteur,
        email_auteur,
        titre,
        description: form.text("description"),
        rubrique,
        video_url: stored.url,
        video_public_id: Some(stored.public_id),
        taille_fichier: file.len() as i64,
        format: video_format_from_content_type(file.content_type.as_deref()).to_string(),
        duree: stored.duration_secs,
        annee: CURRENT_CONGRESS_YEAR,
    };
    let video = CommunicationVideoRepo::create(&state.pool, &input).await?;

    tracing::info!(video_id = video.id, size = file.len(), "Communication video uploaded");
    Ok((StatusCode::CREATED, Json(DataResponse { data: video.into() })))
}

/// POST /api/videos/upload-url
///
/// The size is unknown and stored as 0; the format comes from the URL.
pub async fn upload_url(
    State(state): State<AppState>,
    Json(input): Json<SubmitVideoUrlRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<CommunicationVideoView>>)> {
    let video_url = input
        .video_url
        .as_deref()
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .ok_or_else(|| AppError::BadRequest("L'URL de la vidéo est requise".into()))?
        .to_string();
    input.validate()?;

    let create = CreateCommunicationVideo {
        format: video_format_from_url(&video_url).to_string(),
        rubrique: parse_rubrique(input.rubrique.as_deref())?,
        nom_auteur: input.nom_auteur,
        prenom_auteur: input.prenom_auteur,
        email_auteur: input.email_auteur,
        titre: input.titre,
        description: input.description,
        video_url,
        video_public_id: None,
        taille_fichier: 0,
        duree: None,
        annee: CURRENT_CONGRESS_YEAR,
    };
    let video = CommunicationVideoRepo::create(&state.pool, &create).await?;

    tracing::info!(video_id = video.id, "Communication video submitted by URL");
    Ok((StatusCode::CREATED, Json(DataResponse { data: video.into() })))
}

/// GET /api/videos/public?annee
pub async fn list_public(
    State(state): State<AppState>,
    Query(params): Query<YearParams>,
) -> AppResult<Json<DataResponse<Vec<CommunicationVideoView>>>> {
    let videos = CommunicationVideoRepo::list_approved(&state.pool, params.annee).await?;
    Ok(Json(DataResponse {
        data: videos.into_iter().map(CommunicationVideoView::from).collect(),
    }))
}

/// POST /api/videos/{id}/incrementer-vues
pub async fn increment_views(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<MessageResponse>> {
    if !CommunicationVideoRepo::increment_views(&state.pool, id).await? {
        return Err(not_found(id));
    }
    Ok(Json(MessageResponse::new("Vue enregistrée")))
}

/// POST /api/videos/{id}/incrementer-telechargements
pub async fn increment_downloads(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<MessageResponse>> {
    if !CommunicationVideoRepo::increment_downloads(&state.pool, id).await? {
        return Err(not_found(id));
    }
    Ok(Json(MessageResponse::new("Téléchargement enregistré")))
}

/// GET /api/videos/admin/all
pub async fn list_admin(
    RequireStaff(_user): RequireStaff,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<CommunicationVideoView>>>> {
    let videos = CommunicationVideoRepo::list_all(&state.pool).await?;
    Ok(Json(DataResponse {
        data: videos.into_iter().map(CommunicationVideoView::from).collect(),
    }))
}

/// GET /api/videos/admin/{id}
pub async fn get_admin(
    RequireStaff(_user): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<CommunicationVideoView>>> {
    let video = CommunicationVideoRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: video.into() }))
}

async fn moderate(
    state: &AppState,
    id: DbId,
    statut: StatutModeration,
    commentaires: Option<&str>,
    user_id: DbId,
) -> AppResult<Json<DataResponse<CommunicationVideoView>>> {
    let video = CommunicationVideoRepo::moderate(&state.pool, id, statut.as_str(), commentaires)
        .await?
        .ok_or_else(|| not_found(id))?;
    tracing::info!(
        video_id = id,
        statut = statut.as_str(),
        moderated_by = user_id,
        "Communication video moderated",
    );
    Ok(Json(DataResponse { data: video.into() }))
}

/// POST /api/videos/admin/{id}/approuver
pub async fn approve(
    RequireStaff(user): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    body: Option<Json<ModerationInput>>,
) -> AppResult<Json<DataResponse<CommunicationVideoView>>> {
    let input = body.map(|Json(b)| b).unwrap_or_default();
    moderate(
        &state,
        id,
        StatutModeration::Approuve,
        input.commentaires.as_deref(),
        user.user_id,
    )
    .await
}

/// POST /api/videos/admin/{id}/rejeter
pub async fn reject(
    RequireStaff(user): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    body: Option<Json<ModerationInput>>,
) -> AppResult<Json<DataResponse<CommunicationVideoView>>> {
    let input = body.map(|Json(b)| b).unwrap_or_default();
    moderate(
        &state,
        id,
        StatutModeration::Rejete,
        input.commentaires.as_deref(),
        user.user_id,
    )
    .await
}

/// DELETE /api/videos/admin/{id}
pub async fn delete(
    RequireStaff(user): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let video = CommunicationVideoRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    CommunicationVideoRepo::delete(&state.pool, id).await?;
    discard_media(
        state.media.as_ref(),
        video.video_public_id.as_deref(),
        MediaKind::Video,
    )
    .await;

    tracing::info!(video_id = id, deleted_by = user.user_id, "Communication video deleted");
    Ok(StatusCode::NO_CONTENT)
}
