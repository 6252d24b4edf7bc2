//! Repository for the `sponsors` table.

use sqlx::PgPool;
use smcd_core::types::DbId;

use crate::models::sponsor::{CreateSponsor, Sponsor, UpdateSponsor};
use crate::models::stats::CountByKey;

const COLUMNS: &str = "id, nom, nom_court, slug, logo_url, logo_public_id, description, \
    description_courte, niveau, categorie, annee, site_web, email, telephone, ordre, active, \
    nombre_clics, date_partenariat, date_modification";

/// Sponsorship tiers from most to least prominent.
const NIVEAU_PRIORITY: &str = "CASE niveau
    WHEN 'PLATINE' THEN 1 WHEN 'OR' THEN 2 WHEN 'ARGENT' THEN 3
    WHEN 'BRONZE' THEN 4 WHEN 'PARTENAIRE' THEN 5 ELSE 6 END";

pub struct SponsorRepo;

impl SponsorRepo {
    pub async fn create(pool: &PgPool, input: &CreateSponsor) -> Result<Sponsor, sqlx::Error> {
        let query = format!(
            "INSERT INTO sponsors (nom, nom_court, slug, logo_url, logo_public_id, description,
                description_courte, niveau, categorie, annee, site_web, email, telephone,
                ordre, active)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Sponsor>(&query)
            .bind(&input.nom)
            .bind(&input.nom_court)
            .bind(&input.slug)
            .bind(&input.logo_url)
            .bind(&input.logo_public_id)
            .bind(&input.description)
            .bind(&input.description_courte)
            .bind(&input.niveau)
            .bind(&input.categorie)
            .bind(input.annee)
            .bind(&input.site_web)
            .bind(&input.email)
            .bind(&input.telephone)
            .bind(input.ordre)
            .bind(input.active)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Sponsor>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM sponsors WHERE id = $1");
        sqlx::query_as::<_, Sponsor>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Active sponsors of a year, by tier then display order.
    pub async fn list_active(pool: &PgPool, annee: i32) -> Result<Vec<Sponsor>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM sponsors
             WHERE active = TRUE AND annee = $1
             ORDER BY {NIVEAU_PRIORITY}, ordre, id"
        );
        sqlx::query_as::<_, Sponsor>(&query)
            .bind(annee)
            .fetch_all(pool)
            .await
    }

    /// Every sponsor, optionally restricted to one year.
    pub async fn list_all(pool: &PgPool, annee: Option<i32>) -> Result<Vec<Sponsor>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM sponsors
             WHERE ($1::INTEGER IS NULL OR annee = $1)
             ORDER BY annee DESC, {NIVEAU_PRIORITY}, ordre, id"
        );
        sqlx::query_as::<_, Sponsor>(&query)
            .bind(annee)
            .fetch_all(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateSponsor,
    ) -> Result<Option<Sponsor>, sqlx::Error> {
        let query = format!(
            "UPDATE sponsors SET
                nom = COALESCE($2, nom),
                nom_court = COALESCE($3, nom_court),
                slug = COALESCE($4, slug),
                description = COALESCE($5, description),
                description_courte = COALESCE($6, description_courte),
                niveau = COALESCE($7, niveau),
                categorie = COALESCE($8, categorie),
                annee = COALESCE($9, annee),
                site_web = COALESCE($10, site_web),
                email = COALESCE($11, email),
                telephone = COALESCE($12, telephone),
                ordre = COALESCE($13, ordre),
                active = COALESCE($14, active),
                logo_url = COALESCE($15, logo_url),
                logo_public_id = COALESCE($16, logo_public_id),
                date_modification = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Sponsor>(&query)
            .bind(id)
            .bind(&input.nom)
            .bind(&input.nom_court)
            .bind(&input.slug)
            .bind(&input.description)
            .bind(&input.description_courte)
            .bind(&input.niveau)
            .bind(&input.categorie)
            .bind(input.annee)
            .bind(&input.site_web)
            .bind(&input.email)
            .bind(&input.telephone)
            .bind(input.ordre)
            .bind(input.active)
            .bind(&input.logo_url)
            .bind(&input.logo_public_id)
            .fetch_optional(pool)
            .await
    }

    pub async fn increment_clicks(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE sponsors SET nombre_clics = nombre_clics + 1 WHERE id = $1")
                .bind(id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn next_order(pool: &PgPool, annee: i32, niveau: &str) -> Result<i32, sqlx::Error> {
        sqlx::query_scalar::<_, i32>(
            "SELECT COALESCE(MAX(ordre), 0) + 1 FROM sponsors WHERE annee = $1 AND niveau = $2",
        )
        .bind(annee)
        .bind(niveau)
        .fetch_one(pool)
        .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM sponsors WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // -- statistics ----------------------------------------------------------

    pub async fn count_active(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM sponsors WHERE active = TRUE")
            .fetch_one(pool)
            .await
    }

    pub async fn count_by_niveau(pool: &PgPool) -> Result<Vec<CountByKey>, sqlx::Error> {
        sqlx::query_as::<_, CountByKey>(
            "SELECT niveau AS key, COUNT(*) AS count FROM sponsors GROUP BY niveau ORDER BY niveau",
        )
        .fetch_all(pool)
        .await
    }
}
