//! Handlers for gallery chapters (sessions inside a room).

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;
use smcd_core::error::CoreError;
use smcd_core::types::DbId;
use smcd_db::models::chapter::{
    Chapter, ChapterDetail, ChapterView, CreateChapter, UpdateChapter,
};
use smcd_db::models::video::VideoView;
use smcd_db::repositories::{ChapterRepo, RoomRepo, SlugRepo, SlugTable, VideoRepo};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireStaff;
use crate::response::{DataResponse, MessageResponse};
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Chapitre",
        id,
    })
}

fn room_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "Salle", id })
}

#[derive(Debug, Deserialize, Validate)]
pub struct ChapterRequest {
    pub room_id: DbId,
    #[validate(length(min = 1, max = 255, message = "Le titre est obligatoire"))]
    pub titre: String,
    pub description: Option<String>,
    #[validate(length(max = 500))]
    pub description_courte: Option<String>,
    pub moderateur: Option<String>,
    pub date_session: Option<NaiveDate>,
    pub heure_debut: Option<NaiveTime>,
    pub heure_fin: Option<NaiveTime>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateChapterRequest {
    #[validate(length(min = 1, max = 255, message = "Le titre ne peut pas être vide"))]
    pub titre: Option<String>,
    pub description: Option<String>,
    #[validate(length(max = 500))]
    pub description_courte: Option<String>,
    pub moderateur: Option<String>,
    pub date_session: Option<NaiveDate>,
    pub heure_debut: Option<NaiveTime>,
    pub heure_fin: Option<NaiveTime>,
}

#[derive(Debug, Deserialize)]
pub struct MoveParams {
    pub new_room_id: DbId,
}

async fn chapter_view(state: &AppState, id: DbId) -> AppResult<ChapterView> {
    ChapterRepo::find_with_stats(&state.pool, id)
        .await?
        .map(ChapterView::from)
        .ok_or_else(|| not_found(id))
}

async fn ensure_room(state: &AppState, room_id: DbId) -> AppResult<()> {
    RoomRepo::find_by_id(&state.pool, room_id)
        .await?
        .map(|_| ())
        .ok_or_else(|| room_not_found(room_id))
}

// ---------------------------------------------------------------------------
// Public
// ---------------------------------------------------------------------------

/// GET /api/public/rooms/{slug}/chapters
pub async fn list_public_by_room(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<Json<DataResponse<Vec<ChapterView>>>> {
    let room = RoomRepo::find_active_by_slug(&state.pool, &slug)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFoundKey {
                entity: "Salle",
                key: slug.clone(),
            })
        })?;

    let chapters = ChapterRepo::list_with_stats_by_room(&state.pool, room.room.id).await?;
    Ok(Json(DataResponse {
        data: chapters.into_iter().map(ChapterView::from).collect(),
    }))
}

/// GET /api/public/chapters/{slug}
pub async fn get_public(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<Json<DataResponse<ChapterDetail>>> {
    let chapter = ChapterRepo::find_with_stats_by_slug(&state.pool, &slug)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFoundKey {
                entity: "Chapitre",
                key: slug.clone(),
            })
        })?;

    let videos = VideoRepo::list_by_chapter(&state.pool, chapter.chapter.id, true)
        .await?
        .into_iter()
        .map(VideoView::from)
        .collect();

    Ok(Json(DataResponse {
        data: ChapterDetail {
            chapter: chapter.into(),
            videos,
        },
    }))
}

// ---------------------------------------------------------------------------
// Admin
// ---------------------------------------------------------------------------

/// GET /api/admin/rooms/{id}/chapters
pub async fn list_admin_by_room(
    RequireStaff(_user): RequireStaff,
    State(state): State<AppState>,
    Path(room_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<ChapterView>>>> {
    ensure_room(&state, room_id).await?;
    let chapters = ChapterRepo::list_with_stats_by_room(&state.pool, room_id).await?;
    Ok(Json(DataResponse {
        data: chapters.into_iter().map(ChapterView::from).collect(),
    }))
}

/// GET /api/admin/chapters/{id}
pub async fn get_admin(
    RequireStaff(_user): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<ChapterView>>> {
    Ok(Json(DataResponse {
        data: chapter_view(&state, id).await?,
    }))
}

/// POST /api/admin/chapters
pub async fn create(
    RequireStaff(user): RequireStaff,
    State(state): State<AppState>,
    Json(input): Json<ChapterRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<ChapterView>>)> {
    input.validate()?;
    ensure_room(&state, input.room_id).await?;

    let create = CreateChapter {
        room_id: input.room_id,
        slug: SlugRepo::unique_slug(&state.pool, SlugTable::Chapters, &input.titre, None).await?,
        titre: input.titre,
        description: input.description,
        description_courte: input.description_courte,
        moderateur: input.moderateur,
        date_session: input.date_session,
        heure_debut: input.heure_debut,
        heure_fin: input.heure_fin,
        ordre: ChapterRepo::next_order(&state.pool, input.room_id).await?,
    };
    let chapter = ChapterRepo::create(&state.pool, &create).await?;

    tracing::info!(
        chapter_id = chapter.id,
        room_id = chapter.room_id,
        created_by = user.user_id,
        "Chapter created",
    );

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: chapter_view(&state, chapter.id).await?,
        }),
    ))
}

/// PUT /api/admin/chapters/{id}
pub async fn update(
    RequireStaff(user): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateChapterRequest>,
) -> AppResult<Json<DataResponse<ChapterView>>> {
    input.validate()?;
    let current = ChapterRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    let slug = match &input.titre {
        Some(titre) if *titre != current.titre => {
            Some(SlugRepo::unique_slug(&state.pool, SlugTable::Chapters, titre, Some(id)).await?)
        }
        _ => None,
    };

    let patch = UpdateChapter {
        titre: input.titre,
        slug,
        description: input.description,
        description_courte: input.description_courte,
        moderateur: input.moderateur,
        date_session: input.date_session,
        heure_debut: input.heure_debut,
        heure_fin: input.heure_fin,
    };
    ChapterRepo::update(&state.pool, id, &patch)
        .await?
        .ok_or_else(|| not_found(id))?;

    tracing::info!(chapter_id = id, updated_by = user.user_id, "Chapter updated");
    Ok(Json(DataResponse {
        data: chapter_view(&state, id).await?,
    }))
}

/// DELETE /api/admin/chapters/{id}
pub async fn delete(
    RequireStaff(user): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    ChapterRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    if VideoRepo::count_in_chapter(&state.pool, id).await? > 0 {
        return Err(AppError::Core(CoreError::Conflict(
            "Impossible de supprimer un chapitre contenant des vidéos. \
             Supprimez d'abord les vidéos."
                .into(),
        )));
    }

    ChapterRepo::delete(&state.pool, id).await?;
    tracing::info!(chapter_id = id, deleted_by = user.user_id, "Chapter deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// PATCH /api/admin/chapters/{id}/move?new_room_id=
///
/// The chapter lands at the end of the target room.
pub async fn move_to_room(
    RequireStaff(user): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Query(params): Query<MoveParams>,
) -> AppResult<Json<DataResponse<Chapter>>> {
    ChapterRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    ensure_room(&state, params.new_room_id).await?;

    let ordre = ChapterRepo::next_order(&state.pool, params.new_room_id).await?;
    let chapter = ChapterRepo::move_to_room(&state.pool, id, params.new_room_id, ordre)
        .await?
        .ok_or_else(|| not_found(id))?;

    tracing::info!(
        chapter_id = id,
        room_id = params.new_room_id,
        moved_by = user.user_id,
        "Chapter moved",
    );
    Ok(Json(DataResponse { data: chapter }))
}

/// PUT /api/admin/rooms/{id}/chapters/reorder
pub async fn reorder(
    RequireStaff(_user): RequireStaff,
    State(state): State<AppState>,
    Path(room_id): Path<DbId>,
    Json(ids): Json<Vec<DbId>>,
) -> AppResult<Json<MessageResponse>> {
    ensure_room(&state, room_id).await?;
    let moved = ChapterRepo::reorder(&state.pool, room_id, &ids).await?;
    tracing::info!(room_id, moved, "Chapters reordered");
    Ok(Json(MessageResponse::new("Ordre des chapitres mis à jour")))
}
