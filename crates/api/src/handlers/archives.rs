//! Handlers for the `/archives` resource (past congress editions).

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::Json;
use smcd_cloud::MediaKind;
use smcd_core::error::CoreError;
use smcd_core::types::DbId;
use smcd_core::upload::IMAGE;
use smcd_db::models::archive::{Archive, ArchiveFields};
use smcd_db::repositories::ArchiveRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireSuperAdmin;
use crate::notify::discard_media;
use crate::response::DataResponse;
use crate::state::AppState;
use crate::upload::UploadForm;

const IMAGE_FOLDER: &str = "archives";

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Archive",
        id,
    })
}

/// Read the archive fields from a form. `current` supplies the required
/// values a partial edit leaves out.
fn archive_fields(form: &UploadForm, current: Option<&Archive>) -> AppResult<ArchiveFields> {
    let annee = match (form.parse::<i32>("annee")?, current) {
        (Some(annee), _) => annee,
        (None, Some(archive)) => archive.annee,
        (None, None) => {
            return Err(AppError::Core(CoreError::Validation(
                "L'année est obligatoire".into(),
            )))
        }
    };
    let theme = match (form.text("theme"), current) {
        (Some(theme), _) => theme,
        (None, Some(archive)) => archive.theme.clone(),
        (None, None) => form.required("theme", "Le thème est obligatoire")?,
    };
    let lieu = match (form.text("lieu"), current) {
        (Some(lieu), _) => lieu,
        (None, Some(archive)) => archive.lieu.clone(),
        (None, None) => form.required("lieu", "Le lieu est obligatoire")?,
    };

    Ok(ArchiveFields {
        annee,
        theme,
        lieu,
        date_debut: form.parse("date_debut")?,
        date_fin: form.parse("date_fin")?,
        description: form.text("description"),
        url_externe: form.text("url_externe"),
        nombre_participants: form.parse("nombre_participants")?,
        nombre_abstracts: form.parse("nombre_abstracts")?,
    })
}

async fn ensure_year_free(state: &AppState, annee: i32, exclude: Option<DbId>) -> AppResult<()> {
    if let Some(existing) = ArchiveRepo::find_by_year(&state.pool, annee).await? {
        if Some(existing.id) != exclude {
            return Err(AppError::Core(CoreError::Conflict(format!(
                "Une archive existe déjà pour l'année {annee}"
            ))));
        }
    }
    Ok(())
}

/// GET /api/archives
pub async fn list(State(state): State<AppState>) -> AppResult<Json<DataResponse<Vec<Archive>>>> {
    let archives = ArchiveRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: archives }))
}

/// GET /api/archives/{annee}
pub async fn get_by_year(
    State(state): State<AppState>,
    Path(annee): Path<i32>,
) -> AppResult<Json<DataResponse<Archive>>> {
    let archive = ArchiveRepo::find_by_year(&state.pool, annee)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFoundKey {
                entity: "Archive",
                key: annee.to_string(),
            })
        })?;
    Ok(Json(DataResponse { data: archive }))
}

/// POST /api/archives
pub async fn create(
    RequireSuperAdmin(user): RequireSuperAdmin,
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<DataResponse<Archive>>)> {
    let mut form = UploadForm::read(multipart).await?;
    let fields = archive_fields(&form, None)?;
    let image = form.take_optional("image", &IMAGE)?;

    ensure_year_free(&state, fields.annee, None).await?;

    let stored = match image {
        Some(file) => Some(
            state
                .media
                .upload(&file, IMAGE_FOLDER, MediaKind::Image)
                .await?,
        ),
        None => None,
    };

    let archive = ArchiveRepo::create(
        &state.pool,
        &fields,
        stored.as_ref().map(|s| s.url.as_str()),
        stored.as_ref().map(|s| s.public_id.as_str()),
    )
    .await?;

    tracing::info!(archive_id = archive.id, annee = archive.annee, created_by = user.user_id, "Archive created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: archive })))
}

/// PUT /api/archives/{id}
pub async fn update(
    RequireSuperAdmin(user): RequireSuperAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    multipart: Multipart,
) -> AppResult<Json<DataResponse<Archive>>> {
    let current = ArchiveRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    let mut form = UploadForm::read(multipart).await?;
    let fields = archive_fields(&form, Some(&current))?;
    let image = form.take_optional("image", &IMAGE)?;

    if fields.annee != current.annee {
        ensure_year_free(&state, fields.annee, Some(id)).await?;
    }

    let stored = match image {
        Some(file) => Some(
            state
                .media
                .upload(&file, IMAGE_FOLDER, MediaKind::Image)
                .await?,
        ),
        None => None,
    };

    let archive = ArchiveRepo::update(
        &state.pool,
        id,
        &fields,
        stored.as_ref().map(|s| s.url.as_str()),
        stored.as_ref().map(|s| s.public_id.as_str()),
    )
    .await?
    .ok_or_else(|| not_found(id))?;

    if stored.is_some() {
        discard_media(
            state.media.as_ref(),
            current.image_public_id.as_deref(),
            MediaKind::Image,
        )
        .await;
    }

    tracing::info!(archive_id = id, updated_by = user.user_id, "Archive updated");
    Ok(Json(DataResponse { data: archive }))
}

/// DELETE /api/archives/{id}
pub async fn delete(
    RequireSuperAdmin(user): RequireSuperAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let archive = ArchiveRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    ArchiveRepo::delete(&state.pool, id).await?;
    discard_media(
        state.media.as_ref(),
        archive.image_public_id.as_deref(),
        MediaKind::Image,
    )
    .await;

    tracing::info!(archive_id = id, deleted_by = user.user_id, "Archive deleted");
    Ok(StatusCode::NO_CONTENT)
}
