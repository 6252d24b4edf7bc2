//! Handlers for the `/speakers` resource.

use std::collections::BTreeMap;

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use smcd_cloud::MediaKind;
use smcd_core::error::CoreError;
use smcd_core::search::like_pattern;
use smcd_core::types::{DbId, CURRENT_CONGRESS_YEAR};
use smcd_core::upload::{SPEAKER_CV, SPEAKER_PHOTO};
use smcd_db::models::speaker::{
    CreateSpeaker, Speaker, SpeakerFields, SpeakerFilter, SpeakerMedia, SpeakerView,
};
use smcd_db::models::stats::counts_to_map;
use smcd_db::repositories::SpeakerRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireStaff;
use crate::notify::discard_media;
use crate::query::YearParams;
use crate::response::{DataResponse, MessageResponse};
use crate::state::AppState;
use crate::upload::UploadForm;

const PHOTO_FOLDER: &str = "speakers/photos";
const CV_FOLDER: &str = "speakers/cv";

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Intervenant",
        id,
    })
}

fn views(speakers: Vec<Speaker>) -> Vec<SpeakerView> {
    speakers.into_iter().map(SpeakerView::from).collect()
}

#[derive(Debug, Deserialize)]
pub struct PublicParams {
    pub annee: Option<i32>,
    pub featured: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct AdminParams {
    pub annee: Option<i32>,
    pub pays: Option<String>,
    pub specialite: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SpeakerFilters {
    pub pays: Vec<String>,
    pub specialites: Vec<String>,
    pub annees: Vec<i32>,
}

#[derive(Debug, Serialize)]
pub struct SpeakerStats {
    pub annee: i32,
    pub total: i64,
    pub featured: i64,
    pub par_pays: BTreeMap<String, i64>,
    pub par_specialite: BTreeMap<String, i64>,
}

/// Read every optional text field of a speaker form.
fn speaker_fields(form: &UploadForm) -> AppResult<SpeakerFields> {
    Ok(SpeakerFields {
        titre: form.text("titre"),
        nom: form.text("nom"),
        prenom: form.text("prenom"),
        specialite: form.text("specialite"),
        institution: form.text("institution"),
        pays: form.text("pays"),
        ville: form.text("ville"),
        bio_courte_fr: form.text("bio_courte_fr"),
        bio_complete_fr: form.text("bio_complete_fr"),
        bio_courte_en: form.text("bio_courte_en"),
        bio_complete_en: form.text("bio_complete_en"),
        email: form.text("email"),
        telephone: form.text("telephone"),
        site_web: form.text("site_web"),
        linkedin_url: form.text("linkedin_url"),
        research_gate_url: form.text("research_gate_url"),
        ordre: form.parse("ordre")?,
        featured: form.flag("featured")?,
        is_president: form.flag("is_president")?,
        message_president: form.text("message_president"),
        annee: form.parse("annee")?,
    })
}

// ---------------------------------------------------------------------------
// Public
// ---------------------------------------------------------------------------

/// GET /api/speakers?annee&featured
pub async fn list_public(
    State(state): State<AppState>,
    Query(params): Query<PublicParams>,
) -> AppResult<Json<DataResponse<Vec<SpeakerView>>>> {
    let annee = params.annee.unwrap_or(CURRENT_CONGRESS_YEAR);
    let speakers =
        SpeakerRepo::list_public(&state.pool, annee, params.featured.unwrap_or(false)).await?;
    Ok(Json(DataResponse { data: views(speakers) }))
}

/// GET /api/speakers/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<SpeakerView>>> {
    let speaker = SpeakerRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: speaker.into() }))
}

/// GET /api/speakers/filters
pub async fn filters(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<SpeakerFilters>>> {
    Ok(Json(DataResponse {
        data: SpeakerFilters {
            pays: SpeakerRepo::distinct_pays(&state.pool).await?,
            specialites: SpeakerRepo::distinct_specialites(&state.pool).await?,
            annees: SpeakerRepo::distinct_annees(&state.pool).await?,
        },
    }))
}

/// GET /api/speakers/president?annee=2026
pub async fn president(
    State(state): State<AppState>,
    Query(params): Query<YearParams>,
) -> AppResult<Json<DataResponse<SpeakerView>>> {
    let annee = params.annee.unwrap_or(CURRENT_CONGRESS_YEAR);
    let speaker = SpeakerRepo::find_president(&state.pool, annee)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFoundKey {
                entity: "Président",
                key: annee.to_string(),
            })
        })?;
    Ok(Json(DataResponse { data: speaker.into() }))
}

// ---------------------------------------------------------------------------
// Admin
// ---------------------------------------------------------------------------

/// GET /api/speakers/admin?annee&pays&specialite
pub async fn list_admin(
    RequireStaff(_user): RequireStaff,
    State(state): State<AppState>,
    Query(params): Query<AdminParams>,
) -> AppResult<Json<DataResponse<Vec<SpeakerView>>>> {
    let filter = SpeakerFilter {
        annee: params.annee,
        pays: params.pays.filter(|p| !p.trim().is_empty()),
        specialite: params.specialite.as_deref().and_then(like_pattern),
        featured: None,
    };
    let speakers = SpeakerRepo::list(&state.pool, &filter).await?;
    Ok(Json(DataResponse { data: views(speakers) }))
}

/// GET /api/speakers/admin/{id}
pub async fn get_admin(
    RequireStaff(_user): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<SpeakerView>>> {
    let speaker = SpeakerRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: speaker.into() }))
}

/// POST /api/speakers
///
/// Multipart with a required `photo` and an optional `cv`.
pub async fn create(
    RequireStaff(user): RequireStaff,
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<DataResponse<SpeakerView>>)> {
    let mut form = UploadForm::read(multipart).await?;
    let nom = form.required("nom", "Le nom est obligatoire")?;
    let prenom = form.required("prenom", "Le prénom est obligatoire")?;
    let photo = form.take_checked("photo", &SPEAKER_PHOTO, "La photo est obligatoire")?;
    let cv = form.take_optional("cv", &SPEAKER_CV)?;
    let fields = speaker_fields(&form)?;
    let annee = fields.annee.unwrap_or(CURRENT_CONGRESS_YEAR);

    let stored_photo = state
        .media
        .upload(&photo, PHOTO_FOLDER, MediaKind::Image)
        .await?;
    let stored_cv = match &cv {
        Some(file) => Some(state.media.upload(file, CV_FOLDER, MediaKind::Raw).await?),
        None => None,
    };

    let ordre = match fields.ordre {
        Some(ordre) => ordre,
        None => SpeakerRepo::next_order(&state.pool, annee).await?,
    };
    let input = CreateSpeaker {
        nom,
        prenom,
        annee,
        ordre,
        photo_url: stored_photo.url,
        photo_public_id: Some(stored_photo.public_id),
        cv_url: stored_cv.as_ref().map(|c| c.url.clone()),
        cv_public_id: stored_cv.map(|c| c.public_id),
        fields,
    };
    let speaker = SpeakerRepo::create(&state.pool, &input).await?;

    tracing::info!(speaker_id = speaker.id, annee, created_by = user.user_id, "Speaker created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: speaker.into() })))
}

/// PUT /api/speakers/{id}
///
/// Partial multipart update. New `photo` / `cv` files replace the stored
/// ones. Both are uploaded before the row is written; if either upload
/// fails nothing changes.
pub async fn update(
    RequireStaff(user): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    multipart: Multipart,
) -> AppResult<Json<DataResponse<SpeakerView>>> {
    let current = SpeakerRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    let mut form = UploadForm::read(multipart).await?;
    let photo = form.take_optional("photo", &SPEAKER_PHOTO)?;
    let cv = form.take_optional("cv", &SPEAKER_CV)?;
    let fields = speaker_fields(&form)?;

    let stored_photo = match &photo {
        Some(file) => Some(state.media.upload(file, PHOTO_FOLDER, MediaKind::Image).await?),
        None => None,
    };
    let stored_cv = match &cv {
        Some(file) => match state.media.upload(file, CV_FOLDER, MediaKind::Raw).await {
            Ok(stored) => Some(stored),
            Err(e) => {
                discard_media(
                    state.media.as_ref(),
                    stored_photo.as_ref().map(|p| p.public_id.as_str()),
                    MediaKind::Image,
                )
                .await;
                return Err(e.into());
            }
        },
        None => None,
    };

    let media = SpeakerMedia {
        photo_url: stored_photo.as_ref().map(|p| p.url.clone()),
        photo_public_id: stored_photo.as_ref().map(|p| p.public_id.clone()),
        cv_url: stored_cv.as_ref().map(|c| c.url.clone()),
        cv_public_id: stored_cv.as_ref().map(|c| c.public_id.clone()),
    };
    let speaker = SpeakerRepo::update(&state.pool, id, &fields, &media)
        .await?
        .ok_or_else(|| not_found(id))?;

    if stored_photo.is_some() {
        discard_media(
            state.media.as_ref(),
            current.photo_public_id.as_deref(),
            MediaKind::Image,
        )
        .await;
    }
    if stored_cv.is_some() {
        discard_media(
            state.media.as_ref(),
            current.cv_public_id.as_deref(),
            MediaKind::Raw,
        )
        .await;
    }

    tracing::info!(speaker_id = id, updated_by = user.user_id, "Speaker updated");
    Ok(Json(DataResponse { data: speaker.into() }))
}

/// DELETE /api/speakers/{id}
pub async fn delete(
    RequireStaff(user): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let speaker = SpeakerRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    SpeakerRepo::delete(&state.pool, id).await?;
    discard_media(
        state.media.as_ref(),
        speaker.photo_public_id.as_deref(),
        MediaKind::Image,
    )
    .await;
    discard_media(
        state.media.as_ref(),
        speaker.cv_public_id.as_deref(),
        MediaKind::Raw,
    )
    .await;

    tracing::info!(speaker_id = id, deleted_by = user.user_id, "Speaker deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /api/speakers/reorder
pub async fn reorder(
    RequireStaff(_user): RequireStaff,
    State(state): State<AppState>,
    Json(ids): Json<Vec<DbId>>,
) -> AppResult<Json<MessageResponse>> {
    let moved = SpeakerRepo::reorder(&state.pool, &ids).await?;
    tracing::info!(moved, "Speakers reordered");
    Ok(Json(MessageResponse::new("Ordre des intervenants mis à jour")))
}

/// GET /api/speakers/stats?annee
pub async fn stats(
    RequireStaff(_user): RequireStaff,
    State(state): State<AppState>,
    Query(params): Query<YearParams>,
) -> AppResult<Json<DataResponse<SpeakerStats>>> {
    let annee = params.annee.unwrap_or(CURRENT_CONGRESS_YEAR);
    let identity = |k: &str| k.to_string();
    Ok(Json(DataResponse {
        data: SpeakerStats {
            annee,
            total: SpeakerRepo::count_in_year(&state.pool, annee).await?,
            featured: SpeakerRepo::count_featured_in_year(&state.pool, annee).await?,
            par_pays: counts_to_map(SpeakerRepo::count_by_pays(&state.pool, annee).await?, identity),
            par_specialite: counts_to_map(
                SpeakerRepo::count_by_specialite(&state.pool, annee).await?,
                identity,
            ),
        },
    }))
}
