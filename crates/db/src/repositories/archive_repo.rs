//! Repository for the `archives` table.

use sqlx::PgPool;
use smcd_core::types::DbId;

use crate::models::archive::{Archive, ArchiveFields};

const COLUMNS: &str = "id, annee, theme, lieu, date_debut, date_fin, description, image_url, \
    image_public_id, url_externe, nombre_participants, nombre_abstracts, created_at, updated_at";

pub struct ArchiveRepo;

impl ArchiveRepo {
    pub async fn create(
        pool: &PgPool,
        fields: &ArchiveFields,
        image_url: Option<&str>,
        image_public_id: Option<&str>,
    ) -> Result<Archive, sqlx::Error> {
        let query = format!(
            "INSERT INTO archives (annee, theme, lieu, date_debut, date_fin, description,
                url_externe, nombre_participants, nombre_abstracts, image_url, image_public_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Archive>(&query)
            .bind(fields.annee)
            .bind(&fields.theme)
            .bind(&fields.lieu)
            .bind(fields.date_debut)
            .bind(fields.date_fin)
            .bind(&fields.description)
            .bind(&fields.url_externe)
            .bind(fields.nombre_participants)
            .bind(fields.nombre_abstracts)
            .bind(image_url)
            .bind(image_public_id)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Archive>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM archives WHERE id = $1");
        sqlx::query_as::<_, Archive>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_year(pool: &PgPool, annee: i32) -> Result<Option<Archive>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM archives WHERE annee = $1");
        sqlx::query_as::<_, Archive>(&query)
            .bind(annee)
            .fetch_optional(pool)
            .await
    }

    /// Most recent edition first.
    pub async fn list(pool: &PgPool) -> Result<Vec<Archive>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM archives ORDER BY annee DESC");
        sqlx::query_as::<_, Archive>(&query).fetch_all(pool).await
    }

    /// Replace every editable field. The image is kept unless new values
    /// are given.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        fields: &ArchiveFields,
        image_url: Option<&str>,
        image_public_id: Option<&str>,
    ) -> Result<Option<Archive>, sqlx::Error> {
        let query = format!(
            "UPDATE archives SET
                annee = $2,
                theme = $3,
                lieu = $4,
                date_debut = $5,
                date_fin = $6,
                description = $7,
                url_externe = $8,
                nombre_participants = $9,
                nombre_abstracts = $10,
                image_url = COALESCE($11, image_url),
                image_public_id = COALESCE($12, image_public_id),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Archive>(&query)
            .bind(id)
            .bind(fields.annee)
            .bind(&fields.theme)
            .bind(&fields.lieu)
            .bind(fields.date_debut)
            .bind(fields.date_fin)
            .bind(&fields.description)
            .bind(&fields.url_externe)
            .bind(fields.nombre_participants)
            .bind(fields.nombre_abstracts)
            .bind(image_url)
            .bind(image_public_id)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM archives WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
