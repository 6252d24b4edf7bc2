//! Repository for the `eposters` table.

use sqlx::PgPool;
use smcd_core::types::DbId;

use crate::models::eposter::{CreateEposter, Eposter, EposterFilter, EposterTotals};
use crate::models::stats::CountByKey;

const COLUMNS: &str = "id, nom_auteur, prenom_auteur, email_auteur, titre, fichier_url, \
    fichier_public_id, taille_fichier, nom_fichier_original, rubrique, annee, statut, \
    commentaires_admin, date_validation, nombre_telechargements, nombre_vues, date_upload, \
    date_modification";

pub struct EposterRepo;

impl EposterRepo {
    pub async fn create(pool: &PgPool, input: &CreateEposter) -> Result<Eposter, sqlx::Error> {
        let query = format!(
            "INSERT INTO eposters (nom_auteur, prenom_auteur, email_auteur, titre, fichier_url,
                fichier_public_id, taille_fichier, nom_fichier_original, rubrique, annee)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Eposter>(&query)
            .bind(&input.nom_auteur)
            .bind(&input.prenom_auteur)
            .bind(&input.email_auteur)
            .bind(&input.titre)
            .bind(&input.fichier_url)
            .bind(&input.fichier_public_id)
            .bind(input.taille_fichier)
            .bind(&input.nom_fichier_original)
            .bind(&input.rubrique)
            .bind(input.annee)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Eposter>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM eposters WHERE id = $1");
        sqlx::query_as::<_, Eposter>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_approved(pool: &PgPool, id: DbId) -> Result<Option<Eposter>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM eposters WHERE id = $1 AND statut = 'APPROUVE'");
        sqlx::query_as::<_, Eposter>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Filtered listing, newest upload first.
    pub async fn list(pool: &PgPool, filter: &EposterFilter) -> Result<Vec<Eposter>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM eposters
             WHERE ($1::TEXT IS NULL OR statut = $1)
               AND ($2::INTEGER IS NULL OR annee = $2)
               AND ($3::TEXT IS NULL OR rubrique = $3)
             ORDER BY date_upload DESC, id DESC"
        );
        sqlx::query_as::<_, Eposter>(&query)
            .bind(&filter.statut)
            .bind(filter.annee)
            .bind(&filter.rubrique)
            .fetch_all(pool)
            .await
    }

    pub async fn increment_views(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE eposters SET nombre_vues = nombre_vues + 1 WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn increment_downloads(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE eposters SET nombre_telechargements = nombre_telechargements + 1
             WHERE id = $1",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Record a moderation decision (`APPROUVE` or `REJETE`).
    pub async fn moderate(
        pool: &PgPool,
        id: DbId,
        statut: &str,
        commentaires: Option<&str>,
    ) -> Result<Option<Eposter>, sqlx::Error> {
        let query = format!(
            "UPDATE eposters SET
                statut = $2,
                commentaires_admin = COALESCE($3, commentaires_admin),
                date_validation = NOW(),
                date_modification = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Eposter>(&query)
            .bind(id)
            .bind(statut)
            .bind(commentaires)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM eposters WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // -- statistics ----------------------------------------------------------

    pub async fn totals(pool: &PgPool) -> Result<EposterTotals, sqlx::Error> {
        sqlx::query_as::<_, EposterTotals>(
            "SELECT
                COUNT(*) AS total,
                COUNT(*) FILTER (WHERE statut = 'EN_ATTENTE') AS en_attente,
                COUNT(*) FILTER (WHERE statut = 'APPROUVE') AS approuves,
                COUNT(*) FILTER (WHERE statut = 'REJETE') AS rejetes,
                COALESCE(SUM(taille_fichier), 0)::BIGINT AS taille_totale
             FROM eposters",
        )
        .fetch_one(pool)
        .await
    }

    pub async fn count_by_annee(pool: &PgPool) -> Result<Vec<CountByKey>, sqlx::Error> {
        sqlx::query_as::<_, CountByKey>(
            "SELECT annee::TEXT AS key, COUNT(*) AS count
             FROM eposters GROUP BY annee ORDER BY annee",
        )
        .fetch_all(pool)
        .await
    }

    /// Approved e-posters per rubrique; rubrique-less rows are left out.
    pub async fn count_approved_by_rubrique(
        pool: &PgPool,
    ) -> Result<Vec<CountByKey>, sqlx::Error> {
        sqlx::query_as::<_, CountByKey>(
            "SELECT rubrique AS key, COUNT(*) AS count
             FROM eposters
             WHERE statut = 'APPROUVE' AND rubrique IS NOT NULL
             GROUP BY rubrique ORDER BY rubrique",
        )
        .fetch_all(pool)
        .await
    }
}
