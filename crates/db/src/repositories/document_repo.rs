//! Repository for the `documents` table.

use sqlx::PgPool;
use smcd_core::types::DbId;

use crate::models::document::{CreateDocument, Document, UpdateDocument};
use crate::models::stats::CountByKey;

const COLUMNS: &str = "id, titre, slug, description, description_courte, fichier_url, \
    fichier_public_id, taille_fichier, nom_fichier_original, format_fichier, type_document, \
    annee, langue, visibilite, publie, ordre, featured, nombre_telechargements, \
    date_publication, date_expiration, date_modification";

pub struct DocumentRepo;

impl DocumentRepo {
    pub async fn create(pool: &PgPool, input: &CreateDocument) -> Result<Document, sqlx::Error> {
        let query = format!(
            "INSERT INTO documents (titre, slug, description, description_courte, fichier_url,
                fichier_public_id, taille_fichier, nom_fichier_original, format_fichier,
                type_document, annee, langue, visibilite, publie, ordre, featured)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Document>(&query)
            .bind(&input.titre)
            .bind(&input.slug)
            .bind(&input.description)
            .bind(&input.description_courte)
            .bind(&input.fichier_url)
            .bind(&input.fichier_public_id)
            .bind(input.taille_fichier)
            .bind(&input.nom_fichier_original)
            .bind(&input.format_fichier)
            .bind(&input.type_document)
            .bind(input.annee)
            .bind(&input.langue)
            .bind(&input.visibilite)
            .bind(input.publie)
            .bind(input.ordre)
            .bind(input.featured)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Document>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM documents WHERE id = $1");
        sqlx::query_as::<_, Document>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Published documents by type and/or year. Without either filter only
    /// `PUBLIC` documents are returned.
    pub async fn list_public(
        pool: &PgPool,
        type_document: Option<&str>,
        annee: Option<i32>,
    ) -> Result<Vec<Document>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM documents
             WHERE publie = TRUE
               AND ($1::TEXT IS NULL OR type_document = $1)
               AND ($2::INTEGER IS NULL OR annee = $2)
               AND ($1::TEXT IS NOT NULL OR $2::INTEGER IS NOT NULL OR visibilite = 'PUBLIC')
             ORDER BY ordre, id"
        );
        sqlx::query_as::<_, Document>(&query)
            .bind(type_document)
            .bind(annee)
            .fetch_all(pool)
            .await
    }

    pub async fn list_all(pool: &PgPool) -> Result<Vec<Document>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM documents ORDER BY date_publication DESC, id DESC"
        );
        sqlx::query_as::<_, Document>(&query).fetch_all(pool).await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateDocument,
    ) -> Result<Option<Document>, sqlx::Error> {
        let file = input.file.as_ref();
        let query = format!(
            "UPDATE documents SET
                titre = COALESCE($2, titre),
                slug = COALESCE($3, slug),
                description = COALESCE($4, description),
                description_courte = COALESCE($5, description_courte),
                type_document = COALESCE($6, type_document),
                annee = COALESCE($7, annee),
                langue = COALESCE($8, langue),
                visibilite = COALESCE($9, visibilite),
                publie = COALESCE($10, publie),
                ordre = COALESCE($11, ordre),
                featured = COALESCE($12, featured),
                fichier_url = COALESCE($13, fichier_url),
                fichier_public_id = CASE WHEN $13 IS NULL THEN fichier_public_id ELSE $14 END,
                taille_fichier = CASE WHEN $13 IS NULL THEN taille_fichier ELSE $15 END,
                nom_fichier_original = CASE WHEN $13 IS NULL THEN nom_fichier_original ELSE $16 END,
                format_fichier = CASE WHEN $13 IS NULL THEN format_fichier ELSE $17 END,
                date_modification = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Document>(&query)
            .bind(id)
            .bind(&input.titre)
            .bind(&input.slug)
            .bind(&input.description)
            .bind(&input.description_courte)
            .bind(&input.type_document)
            .bind(input.annee)
            .bind(&input.langue)
            .bind(&input.visibilite)
            .bind(input.publie)
            .bind(input.ordre)
            .bind(input.featured)
            .bind(file.map(|f| &f.fichier_url))
            .bind(file.and_then(|f| f.fichier_public_id.as_ref()))
            .bind(file.map(|f| f.taille_fichier))
            .bind(file.and_then(|f| f.nom_fichier_original.as_ref()))
            .bind(file.and_then(|f| f.format_fichier.as_ref()))
            .fetch_optional(pool)
            .await
    }

    pub async fn increment_downloads(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE documents SET nombre_telechargements = nombre_telechargements + 1
             WHERE id = $1",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM documents WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // -- statistics ----------------------------------------------------------

    pub async fn count_published(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM documents WHERE publie = TRUE")
            .fetch_one(pool)
            .await
    }

    pub async fn total_downloads(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COALESCE(SUM(nombre_telechargements), 0)::BIGINT FROM documents",
        )
        .fetch_one(pool)
        .await
    }

    /// Published documents per type.
    pub async fn count_published_by_type(pool: &PgPool) -> Result<Vec<CountByKey>, sqlx::Error> {
        sqlx::query_as::<_, CountByKey>(
            "SELECT type_document AS key, COUNT(*) AS count
             FROM documents WHERE publie = TRUE
             GROUP BY type_document ORDER BY type_document",
        )
        .fetch_all(pool)
        .await
    }
}
