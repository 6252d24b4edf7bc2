//! Handlers for the `/abstracts` resource.
//!
//! Submission is public; review, export and statistics are staff-only.
//! Deletion is a soft delete reserved to super admins.

use std::collections::BTreeMap;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use smcd_cloud::{MediaFile, MediaKind};
use smcd_core::abstract_sheet::{render_abstract_docx, AbstractSheet};
use smcd_core::catalog::{CodeOption, Rubrique, StatutSoumission, TypeCommunication};
use smcd_core::docx::DOCX_CONTENT_TYPE;
use smcd_core::error::CoreError;
use smcd_core::reference::{abstract_file_stem, format_reference};
use smcd_core::search::{clamp_limit, clamp_offset, like_pattern, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
use smcd_core::types::{DbId, CURRENT_CONGRESS_YEAR};
use smcd_db::models::abstract_submission::{
    AbstractFilter, AbstractSubmission, AbstractView, CreateAbstract,
};
use smcd_db::models::stats::counts_to_map;
use smcd_db::repositories::AbstractRepo;
use smcd_events::templates::{abstract_confirmation, abstract_status, AbstractNotice};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{RequireStaff, RequireSuperAdmin};
use crate::notify::{discard_media, send_email};
use crate::response::{DataResponse, Page};
use crate::state::AppState;

/// Days covered by the daily submission histogram.
const DAILY_WINDOW_DAYS: i64 = 30;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /abstracts/submit`.
#[derive(Debug, Deserialize, Validate)]
pub struct SubmitAbstractRequest {
    #[validate(length(min = 1, max = 100, message = "Le nom est obligatoire"))]
    pub nom: String,
    #[validate(length(min = 1, max = 100, message = "Le prénom est obligatoire"))]
    pub prenom: String,
    #[validate(email(message = "L'email doit être valide"))]
    pub email: String,
    #[validate(length(max = 20, message = "Le téléphone ne doit pas dépasser 20 caractères"))]
    pub telephone: Option<String>,
    #[validate(length(min = 1, max = 500, message = "Les auteurs sont obligatoires"))]
    pub auteurs: String,
    #[validate(length(min = 1, max = 300, message = "L'affiliation est obligatoire"))]
    pub affiliation: String,
    #[serde(alias = "type")]
    pub type_communication: String,
    pub url_video: Option<String>,
    pub rubrique: String,
    #[validate(length(min = 1, max = 300, message = "Le titre est obligatoire"))]
    pub titre: String,
    #[validate(length(max = 500, message = "Les mots-clés ne doivent pas dépasser 500 caractères"))]
    pub mots_cles: Option<String>,
    #[validate(length(min = 50, message = "L'introduction doit contenir au moins 50 caractères"))]
    pub introduction: String,
    #[validate(length(
        min = 50,
        message = "Le matériel et méthodes doit contenir au moins 50 caractères"
    ))]
    pub materiel_methodes: String,
    #[validate(length(min = 50, message = "Les résultats doivent contenir au moins 50 caractères"))]
    pub resultats: String,
    #[validate(length(min = 50, message = "La discussion doit contenir au moins 50 caractères"))]
    pub discussion: String,
    #[validate(length(min = 50, message = "La conclusion doit contenir au moins 50 caractères"))]
    pub conclusion: String,
    #[serde(alias = "references")]
    pub bibliography: Option<String>,
}

/// Query parameters for `GET /abstracts`.
#[derive(Debug, Deserialize)]
pub struct AbstractListParams {
    pub statut: Option<String>,
    pub rubrique: Option<String>,
    pub date_debut: Option<NaiveDate>,
    pub date_fin: Option<NaiveDate>,
    pub search: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Query parameters for `GET /abstracts/export`.
#[derive(Debug, Deserialize)]
pub struct ExportParams {
    pub statut: Option<String>,
    pub rubrique: Option<String>,
}

/// Request body for `PUT /abstracts/{id}/status`.
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub statut: String,
    pub commentaires: Option<String>,
    #[serde(default = "default_true")]
    pub envoyer_email: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Serialize)]
pub struct AbstractOptions {
    pub rubriques: Vec<CodeOption>,
    pub types: Vec<CodeOption>,
    pub statuts: Vec<CodeOption>,
}

#[derive(Debug, Serialize)]
pub struct AbstractStats {
    pub total: i64,
    pub en_attente: i64,
    pub en_revision: i64,
    pub acceptes: i64,
    pub refuses: i64,
    pub par_rubrique: BTreeMap<String, i64>,
    pub par_type: BTreeMap<String, i64>,
    pub soumissions_par_jour: BTreeMap<String, i64>,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Abstract",
        id,
    })
}

fn blank_to_none(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn notice(submission: &AbstractSubmission) -> AbstractNotice<'_> {
    AbstractNotice {
        nom: &submission.nom,
        prenom: &submission.prenom,
        numero_reference: &submission.numero_reference,
        titre: &submission.titre,
        rubrique: &submission.rubrique,
        type_communication: &submission.type_communication,
        date_soumission: submission.date_soumission,
        statut: &submission.statut,
        commentaires: submission.commentaires_comite.as_deref(),
    }
}

fn sheet(submission: &AbstractSubmission) -> AbstractSheet<'_> {
    AbstractSheet {
        nom: &submission.nom,
        prenom: &submission.prenom,
        email: &submission.email,
        telephone: submission.telephone.as_deref(),
        auteurs: &submission.auteurs,
        affiliation: &submission.affiliation,
        rubrique: &submission.rubrique,
        type_communication: &submission.type_communication,
        numero_reference: &submission.numero_reference,
        date_soumission: submission.date_soumission,
        statut: &submission.statut,
        titre: &submission.titre,
        mots_cles: submission.mots_cles.as_deref(),
        introduction: &submission.introduction,
        materiel_methodes: &submission.materiel_methodes,
        resultats: &submission.resultats,
        discussion: &submission.discussion,
        conclusion: &submission.conclusion,
        bibliography: submission.bibliography.as_deref(),
    }
}

/// Render the Word export, upload it and record its location on the row.
async fn attach_word_file(
    state: &AppState,
    submission: &mut AbstractSubmission,
) -> Result<(), String> {
    let bytes = render_abstract_docx(&sheet(submission)).map_err(|e| e.to_string())?;
    let stem = abstract_file_stem(&submission.numero_reference, &submission.titre);
    let file = MediaFile::new(
        bytes,
        Some(format!("{stem}.docx")),
        Some(DOCX_CONTENT_TYPE.to_string()),
    );

    let folder = format!("abstracts/{CURRENT_CONGRESS_YEAR}");
    let stored = state
        .media
        .upload_named(&file, &folder, MediaKind::Raw, &stem)
        .await
        .map_err(|e| e.to_string())?;

    AbstractRepo::set_word_file(&state.pool, submission.id, &stored.url, &stored.public_id)
        .await
        .map_err(|e| e.to_string())?;

    submission.word_file_url = Some(stored.url);
    submission.word_file_public_id = Some(stored.public_id);
    Ok(())
}

fn status_filter(statut: Option<&str>, rubrique: Option<&str>) -> AbstractFilter {
    AbstractFilter {
        statut: StatutSoumission::parse_filter(statut).map(|s| s.as_str().to_string()),
        rubrique: Rubrique::parse_filter(rubrique).map(|r| r.as_str().to_string()),
        ..Default::default()
    }
}

// ---------------------------------------------------------------------------
// Public handlers
// ---------------------------------------------------------------------------

/// POST /api/abstracts/submit
///
/// Store a submission under a fresh `SMCD2026-NNN` reference. The Word
/// export and the confirmation email are best-effort.
pub async fn submit(
    State(state): State<AppState>,
    Json(input): Json<SubmitAbstractRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<AbstractView>>)> {
    input.validate()?;
    let type_communication: TypeCommunication = input.type_communication.parse()?;
    let rubrique: Rubrique = input.rubrique.parse()?;

    let sequence = AbstractRepo::next_reference_number(&state.pool).await?;
    let create = CreateAbstract {
        nom: input.nom.trim().to_string(),
        prenom: input.prenom.trim().to_string(),
        email: input.email.trim().to_lowercase(),
        telephone: blank_to_none(input.telephone),
        auteurs: input.auteurs.trim().to_string(),
        affiliation: input.affiliation.trim().to_string(),
        type_communication: type_communication.as_str().to_string(),
        url_video: blank_to_none(input.url_video),
        rubrique: rubrique.as_str().to_string(),
        titre: input.titre.trim().to_string(),
        mots_cles: blank_to_none(input.mots_cles),
        introduction: input.introduction,
        materiel_methodes: input.materiel_methodes,
        resultats: input.resultats,
        discussion: input.discussion,
        conclusion: input.conclusion,
        bibliography: blank_to_none(input.bibliography),
        numero_reference: format_reference(sequence),
    };

    let mut submission = AbstractRepo::create(&state.pool, &create).await?;
    tracing::info!(
        abstract_id = submission.id,
        reference = %submission.numero_reference,
        "Abstract submitted"
    );

    if let Err(e) = attach_word_file(&state, &mut submission).await {
        tracing::error!(abstract_id = submission.id, error = %e, "Word export failed");
    }

    send_email(&state, &submission.email, abstract_confirmation(&notice(&submission)));

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: AbstractView::from(submission),
        }),
    ))
}

/// GET /api/abstracts/options
pub async fn options() -> Json<DataResponse<AbstractOptions>> {
    Json(DataResponse {
        data: AbstractOptions {
            rubriques: Rubrique::options(),
            types: TypeCommunication::options(),
            statuts: StatutSoumission::options(),
        },
    })
}

/// GET /api/abstracts/reference/{numero}
pub async fn get_by_reference(
    State(state): State<AppState>,
    Path(numero): Path<String>,
) -> AppResult<Json<DataResponse<AbstractView>>> {
    let submission = AbstractRepo::find_by_reference(&state.pool, numero.trim())
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFoundKey {
                entity: "Abstract",
                key: numero.clone(),
            })
        })?;
    Ok(Json(DataResponse {
        data: submission.into(),
    }))
}

// ---------------------------------------------------------------------------
// Staff handlers
// ---------------------------------------------------------------------------

/// GET /api/abstracts
pub async fn list(
    RequireStaff(_user): RequireStaff,
    State(state): State<AppState>,
    Query(params): Query<AbstractListParams>,
) -> AppResult<Json<DataResponse<Page<AbstractView>>>> {
    let mut filter = status_filter(params.statut.as_deref(), params.rubrique.as_deref());
    filter.date_debut = params.date_debut;
    filter.date_fin = params.date_fin;
    filter.search = params.search.as_deref().and_then(like_pattern);

    let limit = clamp_limit(params.limit, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT);
    let offset = clamp_offset(params.offset);

    let items = AbstractRepo::list(&state.pool, &filter, limit, offset).await?;
    let total = AbstractRepo::count(&state.pool, &filter).await?;

    Ok(Json(DataResponse {
        data: Page {
            items: items.into_iter().map(AbstractView::from).collect(),
            total,
            limit,
            offset,
        },
    }))
}

/// GET /api/abstracts/{id}
pub async fn get_by_id(
    RequireStaff(_user): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<AbstractView>>> {
    let submission = AbstractRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse {
        data: submission.into(),
    }))
}

/// PUT /api/abstracts/{id}/status
pub async fn update_status(
    RequireStaff(user): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateStatusRequest>,
) -> AppResult<Json<DataResponse<AbstractView>>> {
    let statut: StatutSoumission = input.statut.parse()?;
    let commentaires = blank_to_none(input.commentaires);

    let submission =
        AbstractRepo::update_status(&state.pool, id, statut.as_str(), commentaires.as_deref())
            .await?
            .ok_or_else(|| not_found(id))?;

    tracing::info!(
        abstract_id = id,
        statut = %statut,
        reviewer_id = user.user_id,
        "Abstract status updated"
    );

    if input.envoyer_email {
        send_email(&state, &submission.email, abstract_status(&notice(&submission)));
    }

    Ok(Json(DataResponse {
        data: submission.into(),
    }))
}

/// GET /api/abstracts/stats
pub async fn stats(
    RequireStaff(_user): RequireStaff,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<AbstractStats>>> {
    let by_statut = AbstractRepo::count_by_statut(&state.pool).await?;
    let statut_count = |code: StatutSoumission| {
        by_statut
            .iter()
            .filter(|row| row.key == code.as_str())
            .map(|row| row.count)
            .sum::<i64>()
    };

    let since = Utc::now() - Duration::days(DAILY_WINDOW_DAYS);
    let soumissions_par_jour = AbstractRepo::daily_counts(&state.pool, since)
        .await?
        .into_iter()
        .map(|(day, count)| (day.format("%Y-%m-%d").to_string(), count))
        .collect();

    let data = AbstractStats {
        total: by_statut.iter().map(|row| row.count).sum(),
        en_attente: statut_count(StatutSoumission::EnAttente),
        en_revision: statut_count(StatutSoumission::EnRevision),
        acceptes: statut_count(StatutSoumission::Accepte),
        refuses: statut_count(StatutSoumission::Refuse),
        par_rubrique: counts_to_map(
            AbstractRepo::count_by_rubrique(&state.pool).await?,
            Rubrique::label_of,
        ),
        par_type: counts_to_map(
            AbstractRepo::count_by_type(&state.pool).await?,
            TypeCommunication::label_of,
        ),
        soumissions_par_jour,
    };

    Ok(Json(DataResponse { data }))
}

/// GET /api/abstracts/export
pub async fn export(
    RequireStaff(_user): RequireStaff,
    State(state): State<AppState>,
    Query(params): Query<ExportParams>,
) -> AppResult<Json<DataResponse<Vec<AbstractView>>>> {
    let filter = status_filter(params.statut.as_deref(), params.rubrique.as_deref());
    let rows = AbstractRepo::list_all(&state.pool, &filter).await?;
    Ok(Json(DataResponse {
        data: rows.into_iter().map(AbstractView::from).collect(),
    }))
}

/// DELETE /api/abstracts/{id}
///
/// Soft delete; the Word export is removed from storage.
pub async fn delete(
    RequireSuperAdmin(user): RequireSuperAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let submission = AbstractRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    if !AbstractRepo::soft_delete(&state.pool, id).await? {
        return Err(not_found(id));
    }

    discard_media(
        state.media.as_ref(),
        submission.word_file_public_id.as_deref(),
        MediaKind::Raw,
    )
    .await;

    tracing::info!(abstract_id = id, deleted_by = user.user_id, "Abstract deleted");
    Ok(StatusCode::NO_CONTENT)
}
