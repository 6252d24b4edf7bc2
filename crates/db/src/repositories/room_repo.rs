//! Repository for the `rooms` table.

use sqlx::PgPool;
use smcd_core::types::DbId;

use crate::models::room::{CreateRoom, Room, RoomWithStats, UpdateRoom};

const COLUMNS: &str = "id, nom, nom_court, slug, description, description_courte, image_url, \
    image_public_id, couleur, icone, ordre_affichage, annee, active, created_at, updated_at";

/// Aggregates appended to [`COLUMNS`] for [`RoomWithStats`] rows.
const STATS_COLUMNS: &str = "
    (SELECT COUNT(*) FROM chapters c WHERE c.room_id = rooms.id) AS nombre_chapitres,
    (SELECT COUNT(*) FROM videos v JOIN chapters c ON c.id = v.chapter_id
        WHERE c.room_id = rooms.id) AS nombre_videos,
    (SELECT COALESCE(SUM(v.duree), 0)::BIGINT FROM videos v JOIN chapters c ON c.id = v.chapter_id
        WHERE c.room_id = rooms.id) AS duree_totale_secondes";

pub struct RoomRepo;

impl RoomRepo {
    pub async fn create(pool: &PgPool, input: &CreateRoom) -> Result<Room, sqlx::Error> {
        let query = format!(
            "INSERT INTO rooms (nom, nom_court, slug, description, description_courte, couleur,
                icone, annee, active, ordre_affichage, image_url, image_public_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Room>(&query)
            .bind(&input.nom)
            .bind(&input.nom_court)
            .bind(&input.slug)
            .bind(&input.description)
            .bind(&input.description_courte)
            .bind(&input.couleur)
            .bind(&input.icone)
            .bind(input.annee)
            .bind(input.active)
            .bind(input.ordre_affichage)
            .bind(&input.image_url)
            .bind(&input.image_public_id)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Room>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM rooms WHERE id = $1");
        sqlx::query_as::<_, Room>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_with_stats(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<RoomWithStats>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS}, {STATS_COLUMNS} FROM rooms WHERE id = $1");
        sqlx::query_as::<_, RoomWithStats>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Active room by slug, with stats.
    pub async fn find_active_by_slug(
        pool: &PgPool,
        slug: &str,
    ) -> Result<Option<RoomWithStats>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS}, {STATS_COLUMNS} FROM rooms WHERE slug = $1 AND active = TRUE"
        );
        sqlx::query_as::<_, RoomWithStats>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    /// Rooms in display order, optionally restricted to a year and/or to
    /// active rooms.
    pub async fn list_with_stats(
        pool: &PgPool,
        annee: Option<i32>,
        active_only: bool,
    ) -> Result<Vec<RoomWithStats>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS}, {STATS_COLUMNS} FROM rooms
             WHERE ($1::INT IS NULL OR annee = $1)
               AND (NOT $2 OR active = TRUE)
             ORDER BY ordre_affichage, id"
        );
        sqlx::query_as::<_, RoomWithStats>(&query)
            .bind(annee)
            .bind(active_only)
            .fetch_all(pool)
            .await
    }

    /// Display position for a new room of `annee`.
    pub async fn next_display_order(pool: &PgPool, annee: i32) -> Result<i32, sqlx::Error> {
        sqlx::query_scalar::<_, i32>(
            "SELECT COALESCE(MAX(ordre_affichage), 0) + 1 FROM rooms WHERE annee = $1",
        )
        .bind(annee)
        .fetch_one(pool)
        .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateRoom,
    ) -> Result<Option<Room>, sqlx::Error> {
        let query = format!(
            "UPDATE rooms SET
                nom = COALESCE($2, nom),
                nom_court = COALESCE($3, nom_court),
                slug = COALESCE($4, slug),
                description = COALESCE($5, description),
                description_courte = COALESCE($6, description_courte),
                couleur = COALESCE($7, couleur),
                icone = COALESCE($8, icone),
                annee = COALESCE($9, annee),
                active = COALESCE($10, active),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Room>(&query)
            .bind(id)
            .bind(&input.nom)
            .bind(&input.nom_court)
            .bind(&input.slug)
            .bind(&input.description)
            .bind(&input.description_courte)
            .bind(&input.couleur)
            .bind(&input.icone)
            .bind(input.annee)
            .bind(input.active)
            .fetch_optional(pool)
            .await
    }

    pub async fn set_image(
        pool: &PgPool,
        id: DbId,
        url: &str,
        public_id: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE rooms SET image_url = $2, image_public_id = $3, updated_at = NOW()
             WHERE id = $1",
        )
        .bind(id)
        .bind(url)
        .bind(public_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Flip `active`, returning the updated row.
    pub async fn toggle_active(pool: &PgPool, id: DbId) -> Result<Option<Room>, sqlx::Error> {
        let query = format!(
            "UPDATE rooms SET active = NOT active, updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Room>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Set `ordre_affichage` to each id's 1-based position in `ids`.
    /// Unknown ids are skipped. Returns the number of rows moved.
    pub async fn reorder(pool: &PgPool, ids: &[DbId]) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE rooms r SET ordre_affichage = o.position::INT, updated_at = NOW()
             FROM UNNEST($1::BIGINT[]) WITH ORDINALITY AS o(id, position)
             WHERE r.id = o.id",
        )
        .bind(ids)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM rooms WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM rooms")
            .fetch_one(pool)
            .await
    }
}
