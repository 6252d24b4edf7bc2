//! Repository for the `communication_videos` table.

use sqlx::PgPool;
use smcd_core::types::DbId;

use crate::models::communication_video::{CommunicationVideo, CreateCommunicationVideo};

const COLUMNS: &str = "id, nom_auteur, prenom_auteur, email_auteur, titre, description, \
    rubrique, video_url, video_public_id, taille_fichier, format, duree, statut, \
    commentaires_admin, annee, actif, nombre_vues, nombre_telechargements, date_upload, \
    date_modification, date_validation";

pub struct CommunicationVideoRepo;

impl CommunicationVideoRepo {
    pub async fn create(
        pool: &PgPool,
        input: &CreateCommunicationVideo,
    ) -> Result<CommunicationVideo, sqlx::Error> {
        let query = format!(
            "INSERT INTO communication_videos (nom_auteur, prenom_auteur, email_auteur, titre,
                description, rubrique, video_url, video_public_id, taille_fichier, format,
                duree, annee)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CommunicationVideo>(&query)
            .bind(&input.nom_auteur)
            .bind(&input.prenom_auteur)
            .bind(&input.email_auteur)
            .bind(&input.titre)
            .bind(&input.description)
            .bind(&input.rubrique)
            .bind(&input.video_url)
            .bind(&input.video_public_id)
            .bind(input.taille_fichier)
            .bind(&input.format)
            .bind(input.duree)
            .bind(input.annee)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<CommunicationVideo>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM communication_videos WHERE id = $1");
        sqlx::query_as::<_, CommunicationVideo>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Approved and active videos, newest first, optionally for one year.
    pub async fn list_approved(
        pool: &PgPool,
        annee: Option<i32>,
    ) -> Result<Vec<CommunicationVideo>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM communication_videos
             WHERE statut = 'APPROUVE' AND actif = TRUE
               AND ($1::INTEGER IS NULL OR annee = $1)
             ORDER BY date_upload DESC, id DESC"
        );
        sqlx::query_as::<_, CommunicationVideo>(&query)
            .bind(annee)
            .fetch_all(pool)
            .await
    }

    pub async fn list_all(pool: &PgPool) -> Result<Vec<CommunicationVideo>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM communication_videos ORDER BY date_upload DESC, id DESC"
        );
        sqlx::query_as::<_, CommunicationVideo>(&query)
            .fetch_all(pool)
            .await
    }

    pub async fn increment_views(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE communication_videos SET nombre_vues = nombre_vues + 1 WHERE id = $1",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn increment_downloads(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE communication_videos
             SET nombre_telechargements = nombre_telechargements + 1 WHERE id = $1",
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
    ) -> Result<Option<CommunicationVideo>, sqlx::Error> {
        let query = format!(
            "UPDATE communication_videos SET
                statut = $2,
                commentaires_admin = COALESCE($3, commentaires_admin),
                date_validation = NOW(),
                date_modification = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CommunicationVideo>(&query)
            .bind(id)
            .bind(statut)
            .bind(commentaires)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM communication_videos WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
