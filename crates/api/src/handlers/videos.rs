//! Handlers for gallery videos.

use std::collections::BTreeMap;

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use smcd_cloud::MediaKind;
use smcd_core::catalog::VisibiliteVideo;
use smcd_core::error::CoreError;
use smcd_core::format::{format_disk_usage, format_total_minutes};
use smcd_core::search::{clamp_limit, like_pattern, DEFAULT_TOP_LIMIT, MAX_TOP_LIMIT};
use smcd_core::types::DbId;
use smcd_core::upload::{video_format_from_content_type, GALLERY_VIDEO, IMAGE};
use smcd_db::models::stats::counts_to_map;
use smcd_db::models::video::{CreateVideo, UpdateVideo, VideoView};
use smcd_db::repositories::{ChapterRepo, RoomRepo, SlugRepo, SlugTable, VideoRepo};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireStaff;
use crate::notify::discard_media;
use crate::query::LimitParams;
use crate::response::{DataResponse, MessageResponse};
use crate::state::AppState;
use crate::upload::UploadForm;

const DEFAULT_LANGUE: &str = "FR";

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "Vidéo", id })
}

fn chapter_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Chapitre",
        id,
    })
}

fn views(videos: Vec<smcd_db::models::video::Video>) -> Vec<VideoView> {
    videos.into_iter().map(VideoView::from).collect()
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateVideoRequest {
    #[validate(length(min = 1, max = 255, message = "Le titre ne peut pas être vide"))]
    pub titre: Option<String>,
    pub description: Option<String>,
    #[validate(length(max = 500))]
    pub description_courte: Option<String>,
    pub intervenant: Option<String>,
    pub co_intervenants: Option<String>,
    pub tags: Option<String>,
    #[validate(length(max = 10))]
    pub langue: Option<String>,
    pub visibilite: Option<String>,
    pub resolution: Option<String>,
    pub sous_titres_url: Option<String>,
}

/// Dashboard figures for the whole gallery.
#[derive(Debug, Serialize)]
pub struct VideoStats {
    pub total_rooms: i64,
    pub total_chapters: i64,
    pub total_videos: i64,
    pub videos_publiees: i64,
    pub videos_brouillon: i64,
    pub total_vues: i64,
    pub duree_totale: String,
    pub espace_disque: String,
    pub par_langue: BTreeMap<String, i64>,
    pub par_visibilite: BTreeMap<String, i64>,
    pub top_videos: Vec<VideoView>,
    pub videos_recentes: Vec<VideoView>,
}

// ---------------------------------------------------------------------------
// Public
// ---------------------------------------------------------------------------

/// GET /api/public/chapters/{slug}/videos
pub async fn list_public_by_chapter(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<Json<DataResponse<Vec<VideoView>>>> {
    let chapter = ChapterRepo::find_with_stats_by_slug(&state.pool, &slug)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFoundKey {
                entity: "Chapitre",
                key: slug.clone(),
            })
        })?;

    let videos = VideoRepo::list_by_chapter(&state.pool, chapter.chapter.id, true).await?;
    Ok(Json(DataResponse { data: views(videos) }))
}

/// GET /api/public/videos/{slug}
pub async fn get_public(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<Json<DataResponse<VideoView>>> {
    let video = VideoRepo::find_published_by_slug(&state.pool, &slug)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFoundKey {
                entity: "Vidéo",
                key: slug.clone(),
            })
        })?;
    Ok(Json(DataResponse { data: video.into() }))
}

/// POST /api/public/videos/{id}/view
pub async fn record_view(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<MessageResponse>> {
    if !VideoRepo::increment_views(&state.pool, id).await? {
        return Err(not_found(id));
    }
    Ok(Json(MessageResponse::new("Vue enregistrée")))
}

/// GET /api/public/videos/popular?limit=10
pub async fn popular(
    State(state): State<AppState>,
    Query(params): Query<LimitParams>,
) -> AppResult<Json<DataResponse<Vec<VideoView>>>> {
    let limit = clamp_limit(params.limit, DEFAULT_TOP_LIMIT, MAX_TOP_LIMIT);
    let videos = VideoRepo::popular(&state.pool, limit).await?;
    Ok(Json(DataResponse { data: views(videos) }))
}

/// GET /api/public/videos/recent?limit=10
pub async fn recent(
    State(state): State<AppState>,
    Query(params): Query<LimitParams>,
) -> AppResult<Json<DataResponse<Vec<VideoView>>>> {
    let limit = clamp_limit(params.limit, DEFAULT_TOP_LIMIT, MAX_TOP_LIMIT);
    let videos = VideoRepo::recent(&state.pool, limit).await?;
    Ok(Json(DataResponse { data: views(videos) }))
}

/// GET /api/public/videos/search?q=
///
/// A blank query returns an empty list.
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<DataResponse<Vec<VideoView>>>> {
    let Some(pattern) = params.q.as_deref().and_then(like_pattern) else {
        return Ok(Json(DataResponse { data: Vec::new() }));
    };
    let limit = clamp_limit(params.limit, MAX_TOP_LIMIT, MAX_TOP_LIMIT);
    let videos = VideoRepo::search_published(&state.pool, &pattern, limit).await?;
    Ok(Json(DataResponse { data: views(videos) }))
}

// ---------------------------------------------------------------------------
// Admin
// ---------------------------------------------------------------------------

/// GET /api/admin/chapters/{id}/videos
pub async fn list_admin_by_chapter(
    RequireStaff(_user): RequireStaff,
    State(state): State<AppState>,
    Path(chapter_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<VideoView>>>> {
    ChapterRepo::find_by_id(&state.pool, chapter_id)
        .await?
        .ok_or_else(|| chapter_not_found(chapter_id))?;
    let videos = VideoRepo::list_by_chapter(&state.pool, chapter_id, false).await?;
    Ok(Json(DataResponse { data: views(videos) }))
}

/// GET /api/admin/videos/{id}
pub async fn get_admin(
    RequireStaff(_user): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<VideoView>>> {
    let video = VideoRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: video.into() }))
}

/// POST /api/admin/videos
///
/// Multipart: `chapter_id`, `titre`, metadata fields, `video` (required)
/// and `thumbnail`. The video starts unpublished at the end of its chapter.
pub async fn create(
    RequireStaff(user): RequireStaff,
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<DataResponse<VideoView>>)> {
    let mut form = UploadForm::read(multipart).await?;
    let chapter_id: DbId = form
        .parse("chapter_id")?
        .ok_or_else(|| AppError::BadRequest("Le chapitre est obligatoire".into()))?;
    let titre = form.required("titre", "Le titre est obligatoire")?;
    let visibilite = form
        .parse::<VisibiliteVideo>("visibilite")?
        .unwrap_or(VisibiliteVideo::Public);
    let file = form.take_checked("video", &GALLERY_VIDEO, "Le fichier vidéo est obligatoire")?;
    let thumbnail = form.take_optional("thumbnail", &IMAGE)?;

    let chapter = ChapterRepo::find_by_id(&state.pool, chapter_id)
        .await?
        .ok_or_else(|| chapter_not_found(chapter_id))?;
    let room = RoomRepo::find_by_id(&state.pool, chapter.room_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::NotFound {
            entity: "Salle",
            id: chapter.room_id,
        }))?;

    let stored = state
        .media
        .upload(&file, &format!("videos/{}", room.annee), MediaKind::Video)
        .await?;

    let thumb = match &thumbnail {
        Some(image) => Some(
            state
                .media
                .upload(
                    image,
                    &format!("videos/{}/thumbnails", room.annee),
                    MediaKind::Image,
                )
                .await?,
        ),
        None => None,
    };

    let input = CreateVideo {
        chapter_id,
        slug: SlugRepo::unique_slug(&state.pool, SlugTable::Videos, &titre, None).await?,
        titre,
        description: form.text("description"),
        description_courte: form.text("description_courte"),
        intervenant: form.text("intervenant"),
        co_intervenants: form.text("co_intervenants"),
        video_url: stored.url,
        video_public_id: Some(stored.public_id),
        thumbnail_url: thumb.as_ref().map(|t| t.url.clone()),
        thumbnail_public_id: thumb.map(|t| t.public_id),
        duree: stored.duration_secs,
        format: Some(video_format_from_content_type(file.content_type.as_deref()).to_string()),
        taille_fichier: Some(file.len() as i64),
        tags: form.text("tags"),
        langue: form
            .text("langue")
            .unwrap_or_else(|| DEFAULT_LANGUE.to_string()),
        visibilite: visibilite.as_str().to_string(),
        ordre: VideoRepo::next_order(&state.pool, chapter_id).await?,
    };
    let video = VideoRepo::create(&state.pool, &input).await?;

    tracing::info!(
        video_id = video.id,
        chapter_id,
        size = file.len(),
        created_by = user.user_id,
        "Gallery video uploaded",
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: video.into() })))
}

/// PUT /api/admin/videos/{id}
pub async fn update(
    RequireStaff(user): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateVideoRequest>,
) -> AppResult<Json<DataResponse<VideoView>>> {
    input.validate()?;
    let current = VideoRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    let visibilite = match input.visibilite.as_deref() {
        Some(v) => Some(v.parse::<VisibiliteVideo>()?.as_str().to_string()),
        None => None,
    };
    let slug = match &input.titre {
        Some(titre) if *titre != current.titre => {
            Some(SlugRepo::unique_slug(&state.pool, SlugTable::Videos, titre, Some(id)).await?)
        }
        _ => None,
    };

    let patch = UpdateVideo {
        titre: input.titre,
        slug,
        description: input.description,
        description_courte: input.description_courte,
        intervenant: input.intervenant,
        co_intervenants: input.co_intervenants,
        tags: input.tags,
        langue: input.langue,
        visibilite,
        resolution: input.resolution,
        sous_titres_url: input.sous_titres_url,
    };
    let video = VideoRepo::update(&state.pool, id, &patch)
        .await?
        .ok_or_else(|| not_found(id))?;

    tracing::info!(video_id = id, updated_by = user.user_id, "Gallery video updated");
    Ok(Json(DataResponse { data: video.into() }))
}

/// PUT /api/admin/videos/{id}/thumbnail
pub async fn replace_thumbnail(
    RequireStaff(user): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    multipart: Multipart,
) -> AppResult<Json<DataResponse<VideoView>>> {
    let current = VideoRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    let mut form = UploadForm::read(multipart).await?;
    let image = form.take_checked("thumbnail", &IMAGE, "La miniature est obligatoire")?;

    let annee = current.date_upload.format("%Y");
    let stored = state
        .media
        .upload(&image, &format!("videos/{annee}/thumbnails"), MediaKind::Image)
        .await?;
    let video = VideoRepo::set_thumbnail(&state.pool, id, &stored.url, &stored.public_id)
        .await?
        .ok_or_else(|| not_found(id))?;

    discard_media(
        state.media.as_ref(),
        current.thumbnail_public_id.as_deref(),
        MediaKind::Image,
    )
    .await;

    tracing::info!(video_id = id, updated_by = user.user_id, "Video thumbnail replaced");
    Ok(Json(DataResponse { data: video.into() }))
}

async fn set_published(
    state: &AppState,
    id: DbId,
    publie: bool,
    user_id: DbId,
) -> AppResult<Json<DataResponse<VideoView>>> {
    let video = VideoRepo::set_published(&state.pool, id, publie)
        .await?
        .ok_or_else(|| not_found(id))?;
    tracing::info!(video_id = id, publie, by = user_id, "Video publication changed");
    Ok(Json(DataResponse { data: video.into() }))
}

/// PATCH /api/admin/videos/{id}/publish
pub async fn publish(
    RequireStaff(user): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<VideoView>>> {
    set_published(&state, id, true, user.user_id).await
}

/// PATCH /api/admin/videos/{id}/unpublish
pub async fn unpublish(
    RequireStaff(user): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<VideoView>>> {
    set_published(&state, id, false, user.user_id).await
}

/// DELETE /api/admin/videos/{id}
pub async fn delete(
    RequireStaff(user): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let video = VideoRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    VideoRepo::delete(&state.pool, id).await?;
    discard_media(
        state.media.as_ref(),
        video.video_public_id.as_deref(),
        MediaKind::Video,
    )
    .await;
    discard_media(
        state.media.as_ref(),
        video.thumbnail_public_id.as_deref(),
        MediaKind::Image,
    )
    .await;

    tracing::info!(video_id = id, deleted_by = user.user_id, "Gallery video deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /api/admin/chapters/{id}/videos/reorder
pub async fn reorder(
    RequireStaff(_user): RequireStaff,
    State(state): State<AppState>,
    Path(chapter_id): Path<DbId>,
    Json(ids): Json<Vec<DbId>>,
) -> AppResult<Json<MessageResponse>> {
    ChapterRepo::find_by_id(&state.pool, chapter_id)
        .await?
        .ok_or_else(|| chapter_not_found(chapter_id))?;
    let moved = VideoRepo::reorder(&state.pool, chapter_id, &ids).await?;
    tracing::info!(chapter_id, moved, "Videos reordered");
    Ok(Json(MessageResponse::new("Ordre des vidéos mis à jour")))
}

/// GET /api/admin/videos/stats
pub async fn stats(
    RequireStaff(_user): RequireStaff,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<VideoStats>>> {
    let totals = VideoRepo::totals(&state.pool).await?;
    let par_langue = counts_to_map(VideoRepo::count_by_langue(&state.pool).await?, |k| {
        k.to_string()
    });
    let par_visibilite = counts_to_map(
        VideoRepo::count_by_visibilite(&state.pool).await?,
        VisibiliteVideo::label_of,
    );
    let top_videos = views(VideoRepo::top_by_views(&state.pool, DEFAULT_TOP_LIMIT).await?);
    let videos_recentes =
        views(VideoRepo::latest_uploads(&state.pool, DEFAULT_TOP_LIMIT).await?);

    Ok(Json(DataResponse {
        data: VideoStats {
            total_rooms: totals.total_rooms,
            total_chapters: totals.total_chapters,
            total_videos: totals.total_videos,
            videos_publiees: totals.videos_publiees,
            videos_brouillon: totals.total_videos - totals.videos_publiees,
            total_vues: totals.total_vues,
            duree_totale: format_total_minutes(totals.duree_totale_secondes / 60),
            espace_disque: format_disk_usage(totals.taille_totale),
            par_langue,
            par_visibilite,
            top_videos,
            videos_recentes,
        },
    }))
}
