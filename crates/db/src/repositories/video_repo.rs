//! Repository for the `videos` table (gallery videos).

use sqlx::PgPool;
use smcd_core::types::DbId;

use crate::models::stats::CountByKey;
use crate::models::video::{CreateVideo, UpdateVideo, Video, VideoTotals};

const COLUMNS: &str = "id, chapter_id, titre, slug, description, description_courte, \
    intervenant, co_intervenants, video_url, video_public_id, thumbnail_url, \
    thumbnail_public_id, duree, format, resolution, taille_fichier, tags, langue, \
    sous_titres_url, visibilite, publie, ordre, nombre_vues, nombre_likes, \
    temps_visionnage_moyen, date_upload, date_publication, date_modification";

pub struct VideoRepo;

impl VideoRepo {
    pub async fn create(pool: &PgPool, input: &CreateVideo) -> Result<Video, sqlx::Error> {
        let query = format!(
            "INSERT INTO videos (chapter_id, titre, slug, description, description_courte,
                intervenant, co_intervenants, video_url, video_public_id, thumbnail_url,
                thumbnail_public_id, duree, format, taille_fichier, tags, langue, visibilite,
                ordre)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16,
                $17, $18)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Video>(&query)
            .bind(input.chapter_id)
            .bind(&input.titre)
            .bind(&input.slug)
            .bind(&input.description)
            .bind(&input.description_courte)
            .bind(&input.intervenant)
            .bind(&input.co_intervenants)
            .bind(&input.video_url)
            .bind(&input.video_public_id)
            .bind(&input.thumbnail_url)
            .bind(&input.thumbnail_public_id)
            .bind(input.duree)
            .bind(&input.format)
            .bind(input.taille_fichier)
            .bind(&input.tags)
            .bind(&input.langue)
            .bind(&input.visibilite)
            .bind(input.ordre)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Video>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM videos WHERE id = $1");
        sqlx::query_as::<_, Video>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_published_by_slug(
        pool: &PgPool,
        slug: &str,
    ) -> Result<Option<Video>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM videos WHERE slug = $1 AND publie = TRUE");
        sqlx::query_as::<_, Video>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    /// Videos of a chapter in display order; drafts included unless
    /// `published_only`.
    pub async fn list_by_chapter(
        pool: &PgPool,
        chapter_id: DbId,
        published_only: bool,
    ) -> Result<Vec<Video>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM videos
             WHERE chapter_id = $1 AND (NOT $2 OR publie = TRUE)
             ORDER BY ordre, id"
        );
        sqlx::query_as::<_, Video>(&query)
            .bind(chapter_id)
            .bind(published_only)
            .fetch_all(pool)
            .await
    }

    /// Most viewed published videos.
    pub async fn popular(pool: &PgPool, limit: i64) -> Result<Vec<Video>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM videos WHERE publie = TRUE
             ORDER BY nombre_vues DESC, id DESC LIMIT $1"
        );
        sqlx::query_as::<_, Video>(&query)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Most recently published videos.
    pub async fn recent(pool: &PgPool, limit: i64) -> Result<Vec<Video>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM videos WHERE publie = TRUE
             ORDER BY date_publication DESC NULLS LAST, date_upload DESC LIMIT $1"
        );
        sqlx::query_as::<_, Video>(&query)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Case-insensitive search among published videos. `pattern` is a
    /// lowercase `LIKE` pattern.
    pub async fn search_published(
        pool: &PgPool,
        pattern: &str,
        limit: i64,
    ) -> Result<Vec<Video>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM videos
             WHERE publie = TRUE
               AND (LOWER(titre) LIKE $1
                    OR LOWER(COALESCE(description, '')) LIKE $1
                    OR LOWER(COALESCE(tags, '')) LIKE $1
                    OR LOWER(COALESCE(intervenant, '')) LIKE $1)
             ORDER BY nombre_vues DESC, id DESC
             LIMIT $2"
        );
        sqlx::query_as::<_, Video>(&query)
            .bind(pattern)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    pub async fn next_order(pool: &PgPool, chapter_id: DbId) -> Result<i32, sqlx::Error> {
        sqlx::query_scalar::<_, i32>(
            "SELECT COALESCE(MAX(ordre), 0) + 1 FROM videos WHERE chapter_id = $1",
        )
        .bind(chapter_id)
        .fetch_one(pool)
        .await
    }

    pub async fn count_in_chapter(pool: &PgPool, chapter_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM videos WHERE chapter_id = $1")
            .bind(chapter_id)
            .fetch_one(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateVideo,
    ) -> Result<Option<Video>, sqlx::Error> {
        let query = format!(
            "UPDATE videos SET
                titre = COALESCE($2, titre),
                slug = COALESCE($3, slug),
                description = COALESCE($4, description),
                description_courte = COALESCE($5, description_courte),
                intervenant = COALESCE($6, intervenant),
                co_intervenants = COALESCE($7, co_intervenants),
                tags = COALESCE($8, tags),
                langue = COALESCE($9, langue),
                visibilite = COALESCE($10, visibilite),
                resolution = COALESCE($11, resolution),
                sous_titres_url = COALESCE($12, sous_titres_url),
                date_modification = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Video>(&query)
            .bind(id)
            .bind(&input.titre)
            .bind(&input.slug)
            .bind(&input.description)
            .bind(&input.description_courte)
            .bind(&input.intervenant)
            .bind(&input.co_intervenants)
            .bind(&input.tags)
            .bind(&input.langue)
            .bind(&input.visibilite)
            .bind(&input.resolution)
            .bind(&input.sous_titres_url)
            .fetch_optional(pool)
            .await
    }

    pub async fn set_thumbnail(
        pool: &PgPool,
        id: DbId,
        url: &str,
        public_id: &str,
    ) -> Result<Option<Video>, sqlx::Error> {
        let query = format!(
            "UPDATE videos SET thumbnail_url = $2, thumbnail_public_id = $3,
                date_modification = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Video>(&query)
            .bind(id)
            .bind(url)
            .bind(public_id)
            .fetch_optional(pool)
            .await
    }

    /// Publish (stamping `date_publication`) or unpublish a video.
    pub async fn set_published(
        pool: &PgPool,
        id: DbId,
        publie: bool,
    ) -> Result<Option<Video>, sqlx::Error> {
        let query = format!(
            "UPDATE videos SET
                publie = $2,
                date_publication = CASE WHEN $2 THEN NOW() ELSE date_publication END,
                date_modification = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Video>(&query)
            .bind(id)
            .bind(publie)
            .fetch_optional(pool)
            .await
    }

    /// Count one view of a published video.
    pub async fn increment_views(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE videos SET nombre_vues = nombre_vues + 1 WHERE id = $1 AND publie = TRUE",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn reorder(
        pool: &PgPool,
        chapter_id: DbId,
        ids: &[DbId],
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE videos v SET ordre = o.position::INT, date_modification = NOW()
             FROM UNNEST($2::BIGINT[]) WITH ORDINALITY AS o(id, position)
             WHERE v.id = o.id AND v.chapter_id = $1",
        )
        .bind(chapter_id)
        .bind(ids)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM videos WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // -- statistics ----------------------------------------------------------

    pub async fn totals(pool: &PgPool) -> Result<VideoTotals, sqlx::Error> {
        sqlx::query_as::<_, VideoTotals>(
            "SELECT
                (SELECT COUNT(*) FROM rooms) AS total_rooms,
                (SELECT COUNT(*) FROM chapters) AS total_chapters,
                COUNT(*) AS total_videos,
                COUNT(*) FILTER (WHERE publie) AS videos_publiees,
                COALESCE(SUM(nombre_vues), 0)::BIGINT AS total_vues,
                COALESCE(SUM(duree), 0)::BIGINT AS duree_totale_secondes,
                COALESCE(SUM(taille_fichier), 0)::BIGINT AS taille_totale
             FROM videos",
        )
        .fetch_one(pool)
        .await
    }

    pub async fn count_by_langue(pool: &PgPool) -> Result<Vec<CountByKey>, sqlx::Error> {
        sqlx::query_as::<_, CountByKey>(
            "SELECT langue AS key, COUNT(*) AS count FROM videos GROUP BY langue ORDER BY langue",
        )
        .fetch_all(pool)
        .await
    }

    pub async fn count_by_visibilite(pool: &PgPool) -> Result<Vec<CountByKey>, sqlx::Error> {
        sqlx::query_as::<_, CountByKey>(
            "SELECT visibilite AS key, COUNT(*) AS count
             FROM videos GROUP BY visibilite ORDER BY visibilite",
        )
        .fetch_all(pool)
        .await
    }

    /// Most viewed videos, drafts included.
    pub async fn top_by_views(pool: &PgPool, limit: i64) -> Result<Vec<Video>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM videos ORDER BY nombre_vues DESC, id DESC LIMIT $1");
        sqlx::query_as::<_, Video>(&query)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Most recently uploaded videos, drafts included.
    pub async fn latest_uploads(pool: &PgPool, limit: i64) -> Result<Vec<Video>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM videos ORDER BY date_upload DESC, id DESC LIMIT $1");
        sqlx::query_as::<_, Video>(&query)
            .bind(limit)
            .fetch_all(pool)
            .await
    }
}
