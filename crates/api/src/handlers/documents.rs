//! Handlers for the `/documents` resource (programme, brochures, forms).

use std::collections::BTreeMap;

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use smcd_cloud::{MediaFile, MediaKind, StoredMedia};
use smcd_core::catalog::{CodeOption, TypeDocument, VisibiliteDocument};
use smcd_core::error::CoreError;
use smcd_core::types::{DbId, CURRENT_CONGRESS_YEAR};
use smcd_core::upload::{document_format, DOCUMENT};
use smcd_db::models::document::{CreateDocument, DocumentFile, DocumentView, UpdateDocument};
use smcd_db::models::stats::counts_to_map;
use smcd_db::repositories::{DocumentRepo, SlugRepo, SlugTable};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireStaff;
use crate::notify::discard_media;
use crate::response::{DataResponse, DownloadLink};
use crate::state::AppState;
use crate::upload::UploadForm;

const DEFAULT_LANGUE: &str = "FR";

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Document",
        id,
    })
}

fn file_metadata(file: &MediaFile, stored: StoredMedia) -> DocumentFile {
    DocumentFile {
        fichier_url: stored.url,
        fichier_public_id: Some(stored.public_id),
        taille_fichier: file.len() as i64,
        nom_fichier_original: file.filename.clone(),
        format_fichier: Some(document_format(file.filename.as_deref())),
    }
}

#[derive(Debug, Deserialize)]
pub struct PublicParams {
    #[serde(rename = "type")]
    pub type_document: Option<String>,
    pub annee: Option<i32>,
}

#[derive(Debug, Serialize)]
pub struct DocumentStats {
    pub total_publies: i64,
    pub total_telechargements: i64,
    pub par_type: BTreeMap<String, i64>,
}

/// POST /api/documents/upload
pub async fn upload(
    RequireStaff(user): RequireStaff,
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<DataResponse<DocumentView>>)> {
    let mut form = UploadForm::read(multipart).await?;
    let titre = form.required("titre", "Le titre est obligatoire")?;
    let type_document = form
        .parse::<TypeDocument>("type")?
        .unwrap_or(TypeDocument::Autre);
    let visibilite = form
        .parse::<VisibiliteDocument>("visibilite")?
        .unwrap_or(VisibiliteDocument::Public);
    let annee = form.parse("annee")?.unwrap_or(CURRENT_CONGRESS_YEAR);
    let file = form.take_checked("file", &DOCUMENT, "Le fichier est vide")?;

    let stored = state
        .media
        .upload(&file, &format!("documents/{annee}"), MediaKind::Raw)
        .await?;
    let meta = file_metadata(&file, stored);

    let input = CreateDocument {
        slug: SlugRepo::unique_slug(&state.pool, SlugTable::Documents, &titre, None).await?,
        titre,
        description: form.text("description"),
        description_courte: form.text("description_courte"),
        fichier_url: meta.fichier_url,
        fichier_public_id: meta.fichier_public_id,
        taille_fichier: meta.taille_fichier,
        nom_fichier_original: meta.nom_fichier_original,
        format_fichier: meta.format_fichier,
        type_document: type_document.as_str().to_string(),
        annee,
        langue: form
            .text("langue")
            .unwrap_or_else(|| DEFAULT_LANGUE.to_string()),
        visibilite: visibilite.as_str().to_string(),
        publie: form.flag("publie")?.unwrap_or(true),
        ordre: form.parse("ordre")?.unwrap_or(0),
        featured: form.flag("featured")?.unwrap_or(false),
    };
    let document = DocumentRepo::create(&state.pool, &input).await?;

    tracing::info!(
        document_id = document.id,
        type_document = %document.type_document,
        created_by = user.user_id,
        "Document uploaded",
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: document.into() })))
}

/// GET /api/documents/public?type&annee
///
/// Without filters only `PUBLIC` documents are listed.
pub async fn list_public(
    State(state): State<AppState>,
    Query(params): Query<PublicParams>,
) -> AppResult<Json<DataResponse<Vec<DocumentView>>>> {
    let type_document =
        TypeDocument::parse_filter(params.type_document.as_deref()).map(|t| t.as_str());
    let documents = DocumentRepo::list_public(&state.pool, type_document, params.annee).await?;
    Ok(Json(DataResponse {
        data: documents.into_iter().map(DocumentView::from).collect(),
    }))
}

/// GET /api/documents
pub async fn list(
    RequireStaff(_user): RequireStaff,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<DocumentView>>>> {
    let documents = DocumentRepo::list_all(&state.pool).await?;
    Ok(Json(DataResponse {
        data: documents.into_iter().map(DocumentView::from).collect(),
    }))
}

/// GET /api/documents/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<DocumentView>>> {
    let document = DocumentRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: document.into() }))
}

/// GET /api/documents/{id}/download
pub async fn download(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<DownloadLink>>> {
    let document = DocumentRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    DocumentRepo::increment_downloads(&state.pool, id).await?;

    Ok(Json(DataResponse {
        data: DownloadLink {
            url: document.fichier_url,
            nom_fichier: document.nom_fichier_original,
        },
    }))
}

/// PUT /api/documents/{id}
///
/// Multipart partial update. A new `file` replaces the stored one; it is
/// uploaded before the row is touched.
pub async fn update(
    RequireStaff(user): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    multipart: Multipart,
) -> AppResult<Json<DataResponse<DocumentView>>> {
    let current = DocumentRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    let mut form = UploadForm::read(multipart).await?;
    let file = form.take_optional("file", &DOCUMENT)?;

    let titre = form.text("titre");
    let slug = match &titre {
        Some(titre) if *titre != current.titre => {
            Some(SlugRepo::unique_slug(&state.pool, SlugTable::Documents, titre, Some(id)).await?)
        }
        _ => None,
    };
    let type_document = form
        .parse::<TypeDocument>("type")?
        .map(|t| t.as_str().to_string());
    let annee: Option<i32> = form.parse("annee")?;
    let visibilite = form
        .parse::<VisibiliteDocument>("visibilite")?
        .map(|v| v.as_str().to_string());
    let publie = form.flag("publie")?;
    let ordre = form.parse("ordre")?;
    let featured = form.flag("featured")?;

    let replacement = match &file {
        Some(file) => {
            let folder = format!("documents/{}", annee.unwrap_or(current.annee));
            let stored = state.media.upload(file, &folder, MediaKind::Raw).await?;
            Some(file_metadata(file, stored))
        }
        None => None,
    };
    let patch = UpdateDocument {
        titre,
        slug,
        description: form.text("description"),
        description_courte: form.text("description_courte"),
        type_document,
        annee,
        langue: form.text("langue"),
        visibilite,
        publie,
        ordre,
        featured,
        file: replacement,
    };
    let document = DocumentRepo::update(&state.pool, id, &patch)
        .await?
        .ok_or_else(|| not_found(id))?;

    if patch.file.is_some() {
        discard_media(
            state.media.as_ref(),
            current.fichier_public_id.as_deref(),
            MediaKind::Raw,
        )
        .await;
    }

    tracing::info!(document_id = id, updated_by = user.user_id, "Document updated");
    Ok(Json(DataResponse { data: document.into() }))
}

/// DELETE /api/documents/{id}
pub async fn delete(
    RequireStaff(user): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let document = DocumentRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    DocumentRepo::delete(&state.pool, id).await?;
    discard_media(
        state.media.as_ref(),
        document.fichier_public_id.as_deref(),
        MediaKind::Raw,
    )
    .await;

    tracing::info!(document_id = id, deleted_by = user.user_id, "Document deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/documents/stats
pub async fn stats(
    RequireStaff(_user): RequireStaff,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<DocumentStats>>> {
    let par_type = counts_to_map(
        DocumentRepo::count_published_by_type(&state.pool).await?,
        TypeDocument::label_of,
    );
    Ok(Json(DataResponse {
        data: DocumentStats {
            total_publies: DocumentRepo::count_published(&state.pool).await?,
            total_telechargements: DocumentRepo::total_downloads(&state.pool).await?,
            par_type,
        },
    }))
}

/// GET /api/documents/types
pub async fn types() -> Json<DataResponse<Vec<CodeOption>>> {
    Json(DataResponse {
        data: TypeDocument::options(),
    })
}
