//! Repository for the `chapters` table.

use sqlx::PgPool;
use smcd_core::types::DbId;

use crate::models::chapter::{Chapter, ChapterWithStats, CreateChapter, UpdateChapter};

const COLUMNS: &str = "id, room_id, titre, slug, description, description_courte, moderateur, \
    date_session, heure_debut, heure_fin, ordre, created_at, updated_at";

const STATS_COLUMNS: &str = "
    (SELECT COUNT(*) FROM videos v WHERE v.chapter_id = chapters.id) AS nombre_videos,
    (SELECT COUNT(*) FROM videos v WHERE v.chapter_id = chapters.id AND v.publie)
        AS nombre_videos_publiees,
    (SELECT COALESCE(SUM(v.duree), 0)::BIGINT FROM videos v WHERE v.chapter_id = chapters.id)
        AS duree_totale_secondes";

pub struct ChapterRepo;

impl ChapterRepo {
    pub async fn create(pool: &PgPool, input: &CreateChapter) -> Result<Chapter, sqlx::Error> {
        let query = format!(
            "INSERT INTO chapters (room_id, titre, slug, description, description_courte,
                moderateur, date_session, heure_debut, heure_fin, ordre)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Chapter>(&query)
            .bind(input.room_id)
            .bind(&input.titre)
            .bind(&input.slug)
            .bind(&input.description)
            .bind(&input.description_courte)
            .bind(&input.moderateur)
            .bind(input.date_session)
            .bind(input.heure_debut)
            .bind(input.heure_fin)
            .bind(input.ordre)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Chapter>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM chapters WHERE id = $1");
        sqlx::query_as::<_, Chapter>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_with_stats(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ChapterWithStats>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS}, {STATS_COLUMNS} FROM chapters WHERE id = $1");
        sqlx::query_as::<_, ChapterWithStats>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_with_stats_by_slug(
        pool: &PgPool,
        slug: &str,
    ) -> Result<Option<ChapterWithStats>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS}, {STATS_COLUMNS} FROM chapters WHERE slug = $1");
        sqlx::query_as::<_, ChapterWithStats>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    /// Chapters of a room in display order.
    pub async fn list_with_stats_by_room(
        pool: &PgPool,
        room_id: DbId,
    ) -> Result<Vec<ChapterWithStats>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS}, {STATS_COLUMNS} FROM chapters
             WHERE room_id = $1
             ORDER BY ordre, id"
        );
        sqlx::query_as::<_, ChapterWithStats>(&query)
            .bind(room_id)
            .fetch_all(pool)
            .await
    }

    pub async fn next_order(pool: &PgPool, room_id: DbId) -> Result<i32, sqlx::Error> {
        sqlx::query_scalar::<_, i32>(
            "SELECT COALESCE(MAX(ordre), 0) + 1 FROM chapters WHERE room_id = $1",
        )
        .bind(room_id)
        .fetch_one(pool)
        .await
    }

    pub async fn count_in_room(pool: &PgPool, room_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM chapters WHERE room_id = $1")
            .bind(room_id)
            .fetch_one(pool)
            .await
    }

    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM chapters")
            .fetch_one(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateChapter,
    ) -> Result<Option<Chapter>, sqlx::Error> {
        let query = format!(
            "UPDATE chapters SET
                titre = COALESCE($2, titre),
                slug = COALESCE($3, slug),
                description = COALESCE($4, description),
                description_courte = COALESCE($5, description_courte),
                moderateur = COALESCE($6, moderateur),
                date_session = COALESCE($7, date_session),
                heure_debut = COALESCE($8, heure_debut),
                heure_fin = COALESCE($9, heure_fin),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Chapter>(&query)
            .bind(id)
            .bind(&input.titre)
            .bind(&input.slug)
            .bind(&input.description)
            .bind(&input.description_courte)
            .bind(&input.moderateur)
            .bind(input.date_session)
            .bind(input.heure_debut)
            .bind(input.heure_fin)
            .fetch_optional(pool)
            .await
    }

    /// Move a chapter to the end of another room.
    pub async fn move_to_room(
        pool: &PgPool,
        id: DbId,
        room_id: DbId,
        ordre: i32,
    ) -> Result<Option<Chapter>, sqlx::Error> {
        let query = format!(
            "UPDATE chapters SET room_id = $2, ordre = $3, updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Chapter>(&query)
            .bind(id)
            .bind(room_id)
            .bind(ordre)
            .fetch_optional(pool)
            .await
    }

    /// Renumber the chapters of `room_id` following `ids`. Ids belonging to
    /// other rooms are skipped.
    pub async fn reorder(pool: &PgPool, room_id: DbId, ids: &[DbId]) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE chapters c SET ordre = o.position::INT, updated_at = NOW()
             FROM UNNEST($2::BIGINT[]) WITH ORDINALITY AS o(id, position)
             WHERE c.id = o.id AND c.room_id = $1",
        )
        .bind(room_id)
        .bind(ids)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM chapters WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
