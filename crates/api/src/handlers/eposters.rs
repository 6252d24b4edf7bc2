//! Handlers for the `/eposters` resource.

use std::collections::BTreeMap;

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use smcd_cloud::MediaKind;
use smcd_core::catalog::{Rubrique, StatutModeration};
use smcd_core::error::CoreError;
use smcd_core::format::format_storage_total;
use smcd_core::types::{DbId, CURRENT_CONGRESS_YEAR};
use smcd_core::upload::EPOSTER;
use smcd_db::models::eposter::{CreateEposter, Eposter, EposterFilter, EposterView};
use smcd_db::models::stats::counts_to_map;
use smcd_db::repositories::EposterRepo;
use smcd_events::templates::{eposter_approved, eposter_received, eposter_rejected, EposterNotice};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireStaff;
use crate::notify::{discard_media, send_email};
use crate::query::ModerationInput;
use crate::response::{DataResponse, DownloadLink, MessageResponse};
use crate::state::AppState;
use crate::upload::UploadForm;

const UPLOAD_FOLDER: &str = "eposters/2026";

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "E-poster",
        id,
    })
}

fn notice(eposter: &Eposter) -> EposterNotice<'_> {
    EposterNotice {
        nom: &eposter.nom_auteur,
        prenom: &eposter.prenom_auteur,
        titre: &eposter.titre,
        nom_fichier: eposter.nom_fichier_original.as_deref(),
        date_upload: eposter.date_upload,
        commentaires: eposter.commentaires_admin.as_deref(),
    }
}

/// File name offered to the browser; uploads without one fall back to
/// `eposter-{id}.pdf`.
fn download_name(id: DbId, original: Option<String>) -> String {
    original
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| format!("eposter-{id}.pdf"))
}

fn views(eposters: Vec<Eposter>) -> Vec<EposterView> {
    eposters.into_iter().map(EposterView::from).collect()
}

#[derive(Debug, Deserialize)]
pub struct PublicParams {
    pub annee: Option<i32>,
    pub rubrique: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AdminParams {
    pub statut: Option<String>,
    pub annee: Option<i32>,
    pub rubrique: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RejectInput {
    pub raison: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct EposterStats {
    pub total: i64,
    pub en_attente: i64,
    pub approuves: i64,
    pub rejetes: i64,
    pub par_annee: BTreeMap<String, i64>,
    pub par_rubrique: BTreeMap<String, i64>,
    pub taille_totale: String,
}

/// POST /api/eposters/upload
///
/// Public multipart upload of a PowerPoint file. The author receives a
/// confirmation email.
pub async fn upload(
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<DataResponse<EposterView>>)> {
    let mut form = UploadForm::read(multipart).await?;
    let nom_auteur = form.required("nom_auteur", "Le nom de l'auteur est obligatoire")?;
    let prenom_auteur = form.required("prenom_auteur", "Le prénom de l'auteur est obligatoire")?;
    let email_auteur = form.required("email_auteur", "L'email est obligatoire")?;
    let titre = form.required("titre", "Le titre est obligatoire")?;
    let rubrique = form
        .parse::<Rubrique>("rubrique")?
        .map(|r| r.as_str().to_string());
    let file = form.take_checked("file", &EPOSTER, "Le fichier est vide")?;

    let stored = state.media.upload(&file, UPLOAD_FOLDER, MediaKind::Raw).await?;

    let input = CreateEposter {
        nom_auteur,
        prenom_auteur,
        email_auteur,
        titre,
        fichier_url: stored.url,
        fichier_public_id: Some(stored.public_id),
        taille_fichier: file.len() as i64,
        nom_fichier_original: file.filename.clone(),
        rubrique,
        annee: CURRENT_CONGRESS_YEAR,
    };
    let eposter = EposterRepo::create(&state.pool, &input).await?;

    tracing::info!(eposter_id = eposter.id, size = file.len(), "E-poster uploaded");
    send_email(&state, &eposter.email_auteur, eposter_received(&notice(&eposter)));

    Ok((StatusCode::CREATED, Json(DataResponse { data: eposter.into() })))
}

/// GET /api/eposters/public?annee&rubrique
pub async fn list_public(
    State(state): State<AppState>,
    Query(params): Query<PublicParams>,
) -> AppResult<Json<DataResponse<Vec<EposterView>>>> {
    let filter = EposterFilter {
        statut: Some(StatutModeration::Approuve.as_str().to_string()),
        annee: params.annee,
        rubrique: Rubrique::parse_filter(params.rubrique.as_deref())
            .map(|r| r.as_str().to_string()),
    };
    let eposters = EposterRepo::list(&state.pool, &filter).await?;
    Ok(Json(DataResponse { data: views(eposters) }))
}

/// GET /api/eposters/public/{id}
///
/// Approved e-posters only. Each fetch counts as a view.
pub async fn get_public(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<EposterView>>> {
    EposterRepo::find_approved(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    EposterRepo::increment_views(&state.pool, id).await?;

    let eposter = EposterRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: eposter.into() }))
}

/// POST /api/eposters/{id}/increment-download
pub async fn increment_download(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<MessageResponse>> {
    if !EposterRepo::increment_downloads(&state.pool, id).await? {
        return Err(not_found(id));
    }
    Ok(Json(MessageResponse::new("Téléchargement enregistré")))
}

/// GET /api/eposters/{id}/download
pub async fn download(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<DownloadLink>>> {
    let eposter = EposterRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    EposterRepo::increment_downloads(&state.pool, id).await?;

    Ok(Json(DataResponse {
        data: DownloadLink {
            url: eposter.fichier_url,
            nom_fichier: Some(download_name(id, eposter.nom_fichier_original)),
        },
    }))
}

/// GET /api/eposters/admin?statut&annee&rubrique
pub async fn list_admin(
    RequireStaff(_user): RequireStaff,
    State(state): State<AppState>,
    Query(params): Query<AdminParams>,
) -> AppResult<Json<DataResponse<Vec<EposterView>>>> {
    let filter = EposterFilter {
        statut: StatutModeration::parse_filter(params.statut.as_deref())
            .map(|s| s.as_str().to_string()),
        annee: params.annee,
        rubrique: Rubrique::parse_filter(params.rubrique.as_deref())
            .map(|r| r.as_str().to_string()),
    };
    let eposters = EposterRepo::list(&state.pool, &filter).await?;
    Ok(Json(DataResponse { data: views(eposters) }))
}

/// GET /api/eposters/admin/{id}
pub async fn get_admin(
    RequireStaff(_user): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<EposterView>>> {
    let eposter = EposterRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: eposter.into() }))
}

/// PUT /api/eposters/{id}/approve
pub async fn approve(
    RequireStaff(user): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    body: Option<Json<ModerationInput>>,
) -> AppResult<Json<DataResponse<EposterView>>> {
    let input = body.map(|Json(b)| b).unwrap_or_default();
    let eposter = EposterRepo::moderate(
        &state.pool,
        id,
        StatutModeration::Approuve.as_str(),
        input.commentaires.as_deref(),
    )
    .await?
    .ok_or_else(|| not_found(id))?;

    tracing::info!(eposter_id = id, moderated_by = user.user_id, "E-poster approved");
    send_email(&state, &eposter.email_auteur, eposter_approved(&notice(&eposter)));
    Ok(Json(DataResponse { data: eposter.into() }))
}

/// PUT /api/eposters/{id}/reject
pub async fn reject(
    RequireStaff(user): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    body: Option<Json<RejectInput>>,
) -> AppResult<Json<DataResponse<EposterView>>> {
    let input = body.map(|Json(b)| b).unwrap_or_default();
    let eposter = EposterRepo::moderate(
        &state.pool,
        id,
        StatutModeration::Rejete.as_str(),
        input.raison.as_deref(),
    )
    .await?
    .ok_or_else(|| not_found(id))?;

    tracing::info!(eposter_id = id, moderated_by = user.user_id, "E-poster rejected");
    send_email(&state, &eposter.email_auteur, eposter_rejected(&notice(&eposter)));
    Ok(Json(DataResponse { data: eposter.into() }))
}

/// DELETE /api/eposters/{id}
pub async fn delete(
    RequireStaff(user): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let eposter = EposterRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    EposterRepo::delete(&state.pool, id).await?;
    discard_media(
        state.media.as_ref(),
        eposter.fichier_public_id.as_deref(),
        MediaKind::Raw,
    )
    .await;

    tracing::info!(eposter_id = id, deleted_by = user.user_id, "E-poster deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/eposters/stats
pub async fn stats(
    RequireStaff(_user): RequireStaff,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<EposterStats>>> {
    let totals = EposterRepo::totals(&state.pool).await?;
    let par_annee = counts_to_map(EposterRepo::count_by_annee(&state.pool).await?, |k| {
        k.to_string()
    });
    let mut par_rubrique = counts_to_map(
        EposterRepo::count_approved_by_rubrique(&state.pool).await?,
        Rubrique::label_of,
    );
    par_rubrique.retain(|_, count| *count > 0);

    Ok(Json(DataResponse {
        data: EposterStats {
            total: totals.total,
            en_attente: totals.en_attente,
            approuves: totals.approuves,
            rejetes: totals.rejetes,
            par_annee,
            par_rubrique,
            taille_totale: format_storage_total(totals.taille_totale),
        },
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn download_name_keeps_the_uploaded_name() {
        assert_eq!(
            download_name(7, Some("poster-hepatique.pptx".into())),
            "poster-hepatique.pptx"
        );
    }

    #[test]
    fn download_name_falls_back_to_the_id() {
        assert_eq!(download_name(7, None), "eposter-7.pdf");
        assert_eq!(download_name(12, Some("  ".into())), "eposter-12.pdf");
    }
}
