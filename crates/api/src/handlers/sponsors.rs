//! Handlers for the `/sponsors` resource.

use std::collections::BTreeMap;

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use smcd_cloud::MediaKind;
use smcd_core::catalog::NiveauSponsor;
use smcd_core::error::CoreError;
use smcd_core::types::{DbId, CURRENT_CONGRESS_YEAR};
use smcd_core::upload::IMAGE;
use smcd_db::models::sponsor::{CreateSponsor, Sponsor, SponsorView, UpdateSponsor};
use smcd_db::models::stats::counts_to_map;
use smcd_db::repositories::{SlugRepo, SlugTable, SponsorRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireStaff;
use crate::notify::discard_media;
use crate::query::YearParams;
use crate::response::{DataResponse, MessageResponse};
use crate::state::AppState;
use crate::upload::UploadForm;

const LOGO_FOLDER: &str = "sponsors";

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Sponsor",
        id,
    })
}

/// Sponsors of one tier, as listed on the public page.
#[derive(Debug, Serialize)]
pub struct SponsorTier {
    pub niveau: &'static str,
    pub nom: &'static str,
    pub couleur: &'static str,
    pub priorite: i32,
    pub sponsors: Vec<SponsorView>,
}

#[derive(Debug, Serialize)]
pub struct NiveauInfo {
    pub value: &'static str,
    pub nom: &'static str,
    pub couleur: &'static str,
    pub priorite: i32,
}

#[derive(Debug, Serialize)]
pub struct SponsorStats {
    pub total_actifs: i64,
    pub par_niveau: BTreeMap<String, i64>,
}

/// Group sponsors by tier, most prominent tier first. Empty tiers are
/// omitted and the input order is kept inside each tier.
pub fn group_by_tier(sponsors: Vec<Sponsor>) -> Vec<SponsorTier> {
    let mut tiers: Vec<SponsorTier> = NiveauSponsor::ALL
        .iter()
        .map(|&niveau| SponsorTier {
            niveau: niveau.as_str(),
            nom: niveau.label(),
            couleur: niveau.color(),
            priorite: niveau.priority(),
            sponsors: Vec::new(),
        })
        .collect();

    for sponsor in sponsors {
        let Ok(niveau) = sponsor.niveau.parse::<NiveauSponsor>() else {
            tracing::warn!(sponsor_id = sponsor.id, niveau = %sponsor.niveau, "Unknown sponsor tier");
            continue;
        };
        if let Some(tier) = tiers.iter_mut().find(|t| t.niveau == niveau.as_str()) {
            tier.sponsors.push(sponsor.into());
        }
    }

    tiers.retain(|t| !t.sponsors.is_empty());
    tiers.sort_by_key(|t| t.priorite);
    tiers
}

/// POST /api/sponsors
pub async fn create(
    RequireStaff(user): RequireStaff,
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<DataResponse<SponsorView>>)> {
    let mut form = UploadForm::read(multipart).await?;
    let nom = form.required("nom", "Le nom du sponsor est obligatoire")?;
    let niveau = form
        .parse::<NiveauSponsor>("niveau")?
        .unwrap_or(NiveauSponsor::Bronze);
    let annee = form.parse("annee")?.unwrap_or(CURRENT_CONGRESS_YEAR);
    let logo = form.take_checked("logo", &IMAGE, "Le logo est obligatoire")?;

    let stored = state.media.upload(&logo, LOGO_FOLDER, MediaKind::Image).await?;

    let ordre = match form.parse::<i32>("ordre")? {
        Some(ordre) => ordre,
        None => SponsorRepo::next_order(&state.pool, annee, niveau.as_str()).await?,
    };
    let input = CreateSponsor {
        slug: SlugRepo::unique_slug(&state.pool, SlugTable::Sponsors, &nom, None).await?,
        nom,
        nom_court: form.text("nom_court"),
        logo_url: stored.url,
        logo_public_id: Some(stored.public_id),
        description: form.text("description"),
        description_courte: form.text("description_courte"),
        niveau: niveau.as_str().to_string(),
        categorie: form.text("categorie"),
        annee,
        site_web: form.text("site_web"),
        email: form.text("email"),
        telephone: form.text("telephone"),
        ordre,
        active: form.flag("active")?.unwrap_or(true),
    };
    let sponsor = SponsorRepo::create(&state.pool, &input).await?;

    tracing::info!(
        sponsor_id = sponsor.id,
        niveau = %sponsor.niveau,
        created_by = user.user_id,
        "Sponsor created",
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: sponsor.into() })))
}

/// GET /api/sponsors?annee=2026
pub async fn list_public(
    State(state): State<AppState>,
    Query(params): Query<YearParams>,
) -> AppResult<Json<DataResponse<Vec<SponsorTier>>>> {
    let annee = params.annee.unwrap_or(CURRENT_CONGRESS_YEAR);
    let sponsors = SponsorRepo::list_active(&state.pool, annee).await?;
    Ok(Json(DataResponse {
        data: group_by_tier(sponsors),
    }))
}

/// GET /api/sponsors/all?annee
pub async fn list_all(
    RequireStaff(_user): RequireStaff,
    State(state): State<AppState>,
    Query(params): Query<YearParams>,
) -> AppResult<Json<DataResponse<Vec<SponsorView>>>> {
    let sponsors = SponsorRepo::list_all(&state.pool, params.annee).await?;
    Ok(Json(DataResponse {
        data: sponsors.into_iter().map(SponsorView::from).collect(),
    }))
}

/// GET /api/sponsors/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<SponsorView>>> {
    let sponsor = SponsorRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: sponsor.into() }))
}

/// PUT /api/sponsors/{id}
///
/// A new logo is stored before any field is written, so a failed upload
/// leaves the sponsor unchanged.
pub async fn update(
    RequireStaff(user): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    multipart: Multipart,
) -> AppResult<Json<DataResponse<SponsorView>>> {
    let current = SponsorRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    let mut form = UploadForm::read(multipart).await?;
    let logo = form.take_optional("logo", &IMAGE)?;

    let nom = form.text("nom");
    let slug = match &nom {
        Some(nom) if *nom != current.nom => {
            Some(SlugRepo::unique_slug(&state.pool, SlugTable::Sponsors, nom, Some(id)).await?)
        }
        _ => None,
    };
    let niveau = form
        .parse::<NiveauSponsor>("niveau")?
        .map(|n| n.as_str().to_string());
    let annee = form.parse("annee")?;
    let ordre = form.parse("ordre")?;
    let active = form.flag("active")?;

    let stored = match &logo {
        Some(file) => Some(state.media.upload(file, LOGO_FOLDER, MediaKind::Image).await?),
        None => None,
    };
    let patch = UpdateSponsor {
        nom,
        nom_court: form.text("nom_court"),
        slug,
        description: form.text("description"),
        description_courte: form.text("description_courte"),
        niveau,
        categorie: form.text("categorie"),
        annee,
        site_web: form.text("site_web"),
        email: form.text("email"),
        telephone: form.text("telephone"),
        ordre,
        active,
        logo_url: stored.as_ref().map(|s| s.url.clone()),
        logo_public_id: stored.as_ref().map(|s| s.public_id.clone()),
    };
    let sponsor = SponsorRepo::update(&state.pool, id, &patch)
        .await?
        .ok_or_else(|| not_found(id))?;

    if stored.is_some() {
        discard_media(
            state.media.as_ref(),
            current.logo_public_id.as_deref(),
            MediaKind::Image,
        )
        .await;
    }

    tracing::info!(sponsor_id = id, updated_by = user.user_id, "Sponsor updated");
    Ok(Json(DataResponse { data: sponsor.into() }))
}

/// DELETE /api/sponsors/{id}
pub async fn delete(
    RequireStaff(user): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let sponsor = SponsorRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    SponsorRepo::delete(&state.pool, id).await?;
    discard_media(
        state.media.as_ref(),
        sponsor.logo_public_id.as_deref(),
        MediaKind::Image,
    )
    .await;

    tracing::info!(sponsor_id = id, deleted_by = user.user_id, "Sponsor deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/sponsors/{id}/click
pub async fn click(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<MessageResponse>> {
    if !SponsorRepo::increment_clicks(&state.pool, id).await? {
        return Err(not_found(id));
    }
    Ok(Json(MessageResponse::new("Clic enregistré")))
}

/// GET /api/sponsors/stats
pub async fn stats(
    RequireStaff(_user): RequireStaff,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<SponsorStats>>> {
    Ok(Json(DataResponse {
        data: SponsorStats {
            total_actifs: SponsorRepo::count_active(&state.pool).await?,
            par_niveau: counts_to_map(
                SponsorRepo::count_by_niveau(&state.pool).await?,
                NiveauSponsor::label_of,
            ),
        },
    }))
}

/// GET /api/sponsors/niveaux
pub async fn niveaux() -> Json<DataResponse<Vec<NiveauInfo>>> {
    let data = NiveauSponsor::ALL
        .iter()
        .map(|&niveau| NiveauInfo {
            value: niveau.as_str(),
            nom: niveau.label(),
            couleur: niveau.color(),
            priorite: niveau.priority(),
        })
        .collect();
    Json(DataResponse { data })
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn sponsor(id: DbId, niveau: &str) -> Sponsor {
        Sponsor {
            id,
            nom: format!("Sponsor {id}"),
            nom_court: None,
            slug: format!("sponsor-{id}"),
            logo_url: "http://localhost/logo.png".into(),
            logo_public_id: None,
            description: None,
            description_courte: None,
            niveau: niveau.into(),
            categorie: None,
            annee: 2026,
            site_web: None,
            email: None,
            telephone: None,
            ordre: 0,
            active: true,
            nombre_clics: 0,
            date_partenariat: Utc::now(),
            date_modification: Utc::now(),
        }
    }

    #[test]
    fn tiers_follow_priority_and_skip_empty() {
        let tiers = group_by_tier(vec![
            sponsor(1, "BRONZE"),
            sponsor(2, "PLATINE"),
            sponsor(3, "BRONZE"),
        ]);
        let names: Vec<_> = tiers.iter().map(|t| t.nom).collect();
        assert_eq!(names, vec!["Platine", "Bronze"]);
        let bronze_ids: Vec<_> = tiers[1].sponsors.iter().map(|s| s.sponsor.id).collect();
        assert_eq!(bronze_ids, vec![1, 3]);
    }

    #[test]
    fn unknown_tiers_are_dropped() {
        assert!(group_by_tier(vec![sponsor(1, "DIAMANT")]).is_empty());
    }
}
