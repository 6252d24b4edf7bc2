//! Handlers for keyed static page content (`/contenu`).

use axum::extract::{Multipart, Path, State};
use axum::Json;
use smcd_cloud::MediaKind;
use smcd_core::error::CoreError;
use smcd_core::upload::IMAGE;
use smcd_db::models::contenu::{ContenuStatique, UpsertContenu};
use smcd_db::repositories::ContenuRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireSuperAdmin;
use crate::notify::discard_media;
use crate::response::DataResponse;
use crate::state::AppState;
use crate::upload::UploadForm;

const IMAGE_FOLDER: &str = "contenu";

/// GET /api/contenu/{cle}
pub async fn get_by_key(
    State(state): State<AppState>,
    Path(cle): Path<String>,
) -> AppResult<Json<DataResponse<ContenuStatique>>> {
    let contenu = ContenuRepo::find_by_key(&state.pool, &cle)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFoundKey {
                entity: "Contenu",
                key: cle.clone(),
            })
        })?;
    Ok(Json(DataResponse { data: contenu }))
}

/// GET /api/contenu
pub async fn list(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<ContenuStatique>>>> {
    Ok(Json(DataResponse {
        data: ContenuRepo::list(&state.pool).await?,
    }))
}

/// PUT /api/contenu/{cle}
///
/// Creates the key when missing. A new `image` replaces the stored one.
pub async fn upsert(
    RequireSuperAdmin(user): RequireSuperAdmin,
    State(state): State<AppState>,
    Path(cle): Path<String>,
    multipart: Multipart,
) -> AppResult<Json<DataResponse<ContenuStatique>>> {
    let mut form = UploadForm::read(multipart).await?;
    let image = form.take_optional("image", &IMAGE)?;

    let previous = ContenuRepo::find_by_key(&state.pool, &cle).await?;

    let stored = match &image {
        Some(file) => Some(state.media.upload(file, IMAGE_FOLDER, MediaKind::Image).await?),
        None => None,
    };

    let input = UpsertContenu {
        titre_fr: form.text("titre_fr"),
        titre_en: form.text("titre_en"),
        contenu_fr: form.text("contenu_fr"),
        contenu_en: form.text("contenu_en"),
        image_url: stored.as_ref().map(|s| s.url.clone()),
        image_public_id: stored.as_ref().map(|s| s.public_id.clone()),
        modifie_par: Some(user.email.clone()),
    };
    let contenu = ContenuRepo::upsert(&state.pool, &cle, &input).await?;

    if stored.is_some() {
        let old = previous.and_then(|p| p.image_public_id);
        discard_media(state.media.as_ref(), old.as_deref(), MediaKind::Image).await;
    }

    tracing::info!(cle = %cle, modified_by = %user.email, "Static content updated");
    Ok(Json(DataResponse { data: contenu }))
}
