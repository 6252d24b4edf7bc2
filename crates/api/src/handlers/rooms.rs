//! Handlers for gallery rooms, the top level of Room -> Chapter -> Video.

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use smcd_cloud::{MediaFile, MediaKind, StoredMedia};
use smcd_core::error::CoreError;
use smcd_core::types::{DbId, CURRENT_CONGRESS_YEAR};
use smcd_core::upload::IMAGE;
use smcd_db::models::chapter::ChapterView;
use smcd_db::models::room::{CreateRoom, Room, RoomDetail, RoomView, UpdateRoom};
use smcd_db::repositories::{ChapterRepo, RoomRepo, SlugRepo, SlugTable};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireStaff;
use crate::notify::discard_media;
use crate::query::YearParams;
use crate::response::{DataResponse, MessageResponse};
use crate::state::AppState;
use crate::upload::UploadForm;

/// `#RRGGBB`.
const MAX_COLOR_LEN: usize = 7;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "Salle", id })
}

fn check_color(couleur: Option<&str>) -> AppResult<()> {
    match couleur {
        Some(c) if c.chars().count() > MAX_COLOR_LEN => Err(AppError::Core(
            CoreError::Validation("La couleur doit être au format #RRGGBB".into()),
        )),
        _ => Ok(()),
    }
}

/// Upload a room cover. Failures are logged and yield `None`.
async fn upload_cover(state: &AppState, file: &MediaFile, annee: i32) -> Option<StoredMedia> {
    match state
        .media
        .upload(file, &format!("rooms/{annee}"), MediaKind::Image)
        .await
    {
        Ok(stored) => Some(stored),
        Err(e) => {
            tracing::error!(error = %e, "Room image upload failed");
            None
        }
    }
}

async fn room_view(state: &AppState, id: DbId) -> AppResult<RoomView> {
    RoomRepo::find_with_stats(&state.pool, id)
        .await?
        .map(RoomView::from)
        .ok_or_else(|| not_found(id))
}

// ---------------------------------------------------------------------------
// Public
// ---------------------------------------------------------------------------

/// GET /api/public/rooms?annee=2026
pub async fn list_public(
    State(state): State<AppState>,
    Query(params): Query<YearParams>,
) -> AppResult<Json<DataResponse<Vec<RoomView>>>> {
    let annee = params.annee.unwrap_or(CURRENT_CONGRESS_YEAR);
    let rooms = RoomRepo::list_with_stats(&state.pool, Some(annee), true).await?;
    Ok(Json(DataResponse {
        data: rooms.into_iter().map(RoomView::from).collect(),
    }))
}

/// GET /api/public/rooms/{slug}
pub async fn get_public(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<Json<DataResponse<RoomDetail>>> {
    let room = RoomRepo::find_active_by_slug(&state.pool, &slug)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFoundKey {
                entity: "Salle",
                key: slug.clone(),
            })
        })?;

    let chapters = ChapterRepo::list_with_stats_by_room(&state.pool, room.room.id)
        .await?
        .into_iter()
        .map(ChapterView::from)
        .collect();

    Ok(Json(DataResponse {
        data: RoomDetail {
            room: room.into(),
            chapters,
        },
    }))
}

// ---------------------------------------------------------------------------
// Admin
// ---------------------------------------------------------------------------

/// GET /api/admin/rooms?annee
pub async fn list_admin(
    RequireStaff(_user): RequireStaff,
    State(state): State<AppState>,
    Query(params): Query<YearParams>,
) -> AppResult<Json<DataResponse<Vec<RoomView>>>> {
    let rooms = RoomRepo::list_with_stats(&state.pool, params.annee, false).await?;
    Ok(Json(DataResponse {
        data: rooms.into_iter().map(RoomView::from).collect(),
    }))
}

/// GET /api/admin/rooms/{id}
pub async fn get_admin(
    RequireStaff(_user): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<RoomView>>> {
    Ok(Json(DataResponse {
        data: room_view(&state, id).await?,
    }))
}

/// POST /api/admin/rooms
pub async fn create(
    RequireStaff(user): RequireStaff,
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<DataResponse<RoomView>>)> {
    let mut form = UploadForm::read(multipart).await?;
    let nom = form.required("nom", "Le nom de la salle est obligatoire")?;
    let couleur = form.text("couleur");
    check_color(couleur.as_deref())?;
    let annee = form.parse("annee")?.unwrap_or(CURRENT_CONGRESS_YEAR);
    let image = form.take_optional("image", &IMAGE)?;

    let cover = match &image {
        Some(file) => upload_cover(&state, file, annee).await,
        None => None,
    };

    let input = CreateRoom {
        slug: SlugRepo::unique_slug(&state.pool, SlugTable::Rooms, &nom, None).await?,
        nom,
        nom_court: form.text("nom_court"),
        description: form.text("description"),
        description_courte: form.text("description_courte"),
        couleur,
        icone: form.text("icone"),
        annee,
        active: form.flag("active")?.unwrap_or(true),
        ordre_affichage: RoomRepo::next_display_order(&state.pool, annee).await?,
        image_url: cover.as_ref().map(|c| c.url.clone()),
        image_public_id: cover.map(|c| c.public_id),
    };

    let room = RoomRepo::create(&state.pool, &input).await?;
    tracing::info!(room_id = room.id, slug = %room.slug, created_by = user.user_id, "Room created");

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: room_view(&state, room.id).await?,
        }),
    ))
}

/// PUT /api/admin/rooms/{id}
///
/// The slug follows the name; a new image replaces the previous one.
pub async fn update(
    RequireStaff(user): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    multipart: Multipart,
) -> AppResult<Json<DataResponse<RoomView>>> {
    let current = RoomRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    let mut form = UploadForm::read(multipart).await?;
    let couleur = form.text("couleur");
    check_color(couleur.as_deref())?;
    let image = form.take_optional("image", &IMAGE)?;

    let nom = form.text("nom");
    let slug = match &nom {
        Some(nom) if *nom != current.nom => {
            Some(SlugRepo::unique_slug(&state.pool, SlugTable::Rooms, nom, Some(id)).await?)
        }
        _ => None,
    };

    let input = UpdateRoom {
        nom,
        nom_court: form.text("nom_court"),
        slug,
        description: form.text("description"),
        description_courte: form.text("description_courte"),
        couleur,
        icone: form.text("icone"),
        annee: form.parse("annee")?,
        active: form.flag("active")?,
    };
    let room = RoomRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;

    if let Some(file) = &image {
        if let Some(cover) = upload_cover(&state, file, room.annee).await {
            RoomRepo::set_image(&state.pool, id, &cover.url, &cover.public_id).await?;
            discard_media(
                state.media.as_ref(),
                current.image_public_id.as_deref(),
                MediaKind::Image,
            )
            .await;
        }
    }

    tracing::info!(room_id = id, updated_by = user.user_id, "Room updated");
    Ok(Json(DataResponse {
        data: room_view(&state, id).await?,
    }))
}

/// DELETE /api/admin/rooms/{id}
pub async fn delete(
    RequireStaff(user): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let room = RoomRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    if ChapterRepo::count_in_room(&state.pool, id).await? > 0 {
        return Err(AppError::Core(CoreError::Conflict(
            "Impossible de supprimer une salle contenant des chapitres. \
             Supprimez d'abord les chapitres."
                .into(),
        )));
    }

    RoomRepo::delete(&state.pool, id).await?;
    discard_media(
        state.media.as_ref(),
        room.image_public_id.as_deref(),
        MediaKind::Image,
    )
    .await;

    tracing::info!(room_id = id, deleted_by = user.user_id, "Room deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// PATCH /api/admin/rooms/{id}/toggle
pub async fn toggle(
    RequireStaff(_user): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Room>>> {
    let room = RoomRepo::toggle_active(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    tracing::info!(room_id = id, active = room.active, "Room visibility toggled");
    Ok(Json(DataResponse { data: room }))
}

/// PUT /api/admin/rooms/reorder
pub async fn reorder(
    RequireStaff(_user): RequireStaff,
    State(state): State<AppState>,
    Json(ids): Json<Vec<DbId>>,
) -> AppResult<Json<MessageResponse>> {
    let moved = RoomRepo::reorder(&state.pool, &ids).await?;
    tracing::info!(moved, "Rooms reordered");
    Ok(Json(MessageResponse::new("Ordre des salles mis à jour")))
}
