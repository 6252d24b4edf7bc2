//! Repository for the `abstracts` table.
//!
//! Deleted abstracts stay in the table with `deleted = true` and are
//! invisible to every query here.

use chrono::NaiveDate;
use sqlx::PgPool;
use smcd_core::types::{DbId, Timestamp};

use crate::models::abstract_submission::{AbstractFilter, AbstractSubmission, CreateAbstract};
use crate::models::stats::CountByKey;

const COLUMNS: &str = "id, nom, prenom, email, telephone, auteurs, affiliation, \
    type_communication, url_video, rubrique, titre, mots_cles, introduction, \
    materiel_methodes, resultats, discussion, conclusion, bibliography, statut, \
    numero_reference, word_file_url, word_file_public_id, commentaires_comite, \
    date_soumission, date_revision, deleted";

/// Shared `WHERE` clause for filtered listings. Binds `$1..$5`.
const FILTER_CLAUSE: &str = "NOT deleted
       AND ($1::TEXT IS NULL OR statut = $1)
       AND ($2::TEXT IS NULL OR rubrique = $2)
       AND ($3::DATE IS NULL OR date_soumission >= $3::DATE)
       AND ($4::DATE IS NULL OR date_soumission < $4::DATE + 1)
       AND ($5::TEXT IS NULL
            OR LOWER(nom) LIKE $5
            OR LOWER(prenom) LIKE $5
            OR LOWER(email) LIKE $5
            OR LOWER(titre) LIKE $5
            OR LOWER(numero_reference) LIKE $5)";

pub struct AbstractRepo;

impl AbstractRepo {
    /// Draw the next value of `abstract_reference_seq`.
    pub async fn next_reference_number(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT nextval('abstract_reference_seq')")
            .fetch_one(pool)
            .await
    }

    pub async fn create(
        pool: &PgPool,
        input: &CreateAbstract,
    ) -> Result<AbstractSubmission, sqlx::Error> {
        let query = format!(
            "INSERT INTO abstracts (nom, prenom, email, telephone, auteurs, affiliation,
                type_communication, url_video, rubrique, titre, mots_cles, introduction,
                materiel_methodes, resultats, discussion, conclusion, bibliography,
                numero_reference)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16,
                $17, $18)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AbstractSubmission>(&query)
            .bind(&input.nom)
            .bind(&input.prenom)
            .bind(&input.email)
            .bind(&input.telephone)
            .bind(&input.auteurs)
            .bind(&input.affiliation)
            .bind(&input.type_communication)
            .bind(&input.url_video)
            .bind(&input.rubrique)
            .bind(&input.titre)
            .bind(&input.mots_cles)
            .bind(&input.introduction)
            .bind(&input.materiel_methodes)
            .bind(&input.resultats)
            .bind(&input.discussion)
            .bind(&input.conclusion)
            .bind(&input.bibliography)
            .bind(&input.numero_reference)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<AbstractSubmission>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM abstracts WHERE id = $1 AND NOT deleted");
        sqlx::query_as::<_, AbstractSubmission>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_reference(
        pool: &PgPool,
        numero_reference: &str,
    ) -> Result<Option<AbstractSubmission>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM abstracts WHERE numero_reference = $1 AND NOT deleted"
        );
        sqlx::query_as::<_, AbstractSubmission>(&query)
            .bind(numero_reference)
            .fetch_optional(pool)
            .await
    }

    /// Attach the generated Word document.
    pub async fn set_word_file(
        pool: &PgPool,
        id: DbId,
        url: &str,
        public_id: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE abstracts SET word_file_url = $2, word_file_public_id = $3 WHERE id = $1",
        )
        .bind(id)
        .bind(url)
        .bind(public_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Record a committee decision. The comment is replaced, so a decision
    /// without one clears the previous comment. Stamps `date_revision`.
    pub async fn update_status(
        pool: &PgPool,
        id: DbId,
        statut: &str,
        commentaires: Option<&str>,
    ) -> Result<Option<AbstractSubmission>, sqlx::Error> {
        let query = format!(
            "UPDATE abstracts SET
                statut = $2,
                commentaires_comite = $3,
                date_revision = NOW()
             WHERE id = $1 AND NOT deleted
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AbstractSubmission>(&query)
            .bind(id)
            .bind(statut)
            .bind(commentaires)
            .fetch_optional(pool)
            .await
    }

    /// One page of abstracts, newest first.
    pub async fn list(
        pool: &PgPool,
        filter: &AbstractFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<AbstractSubmission>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM abstracts
             WHERE {FILTER_CLAUSE}
             ORDER BY date_soumission DESC, id DESC
             LIMIT $6 OFFSET $7"
        );
        sqlx::query_as::<_, AbstractSubmission>(&query)
            .bind(&filter.statut)
            .bind(&filter.rubrique)
            .bind(filter.date_debut)
            .bind(filter.date_fin)
            .bind(&filter.search)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Total rows matching `filter`, ignoring pagination.
    pub async fn count(pool: &PgPool, filter: &AbstractFilter) -> Result<i64, sqlx::Error> {
        let query = format!("SELECT COUNT(*) FROM abstracts WHERE {FILTER_CLAUSE}");
        sqlx::query_scalar::<_, i64>(&query)
            .bind(&filter.statut)
            .bind(&filter.rubrique)
            .bind(filter.date_debut)
            .bind(filter.date_fin)
            .bind(&filter.search)
            .fetch_one(pool)
            .await
    }

    /// Every abstract matching `filter`, for export.
    pub async fn list_all(
        pool: &PgPool,
        filter: &AbstractFilter,
    ) -> Result<Vec<AbstractSubmission>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM abstracts
             WHERE {FILTER_CLAUSE}
             ORDER BY date_soumission DESC, id DESC"
        );
        sqlx::query_as::<_, AbstractSubmission>(&query)
            .bind(&filter.statut)
            .bind(&filter.rubrique)
            .bind(filter.date_debut)
            .bind(filter.date_fin)
            .bind(&filter.search)
            .fetch_all(pool)
            .await
    }

    /// Mark as deleted. Returns `true` if a live row was hidden.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE abstracts SET deleted = TRUE WHERE id = $1 AND NOT deleted")
                .bind(id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    // -- statistics ----------------------------------------------------------

    pub async fn count_by_statut(pool: &PgPool) -> Result<Vec<CountByKey>, sqlx::Error> {
        Self::count_grouped(pool, "statut").await
    }

    pub async fn count_by_rubrique(pool: &PgPool) -> Result<Vec<CountByKey>, sqlx::Error> {
        Self::count_grouped(pool, "rubrique").await
    }

    pub async fn count_by_type(pool: &PgPool) -> Result<Vec<CountByKey>, sqlx::Error> {
        Self::count_grouped(pool, "type_communication").await
    }

    async fn count_grouped(
        pool: &PgPool,
        column: &'static str,
    ) -> Result<Vec<CountByKey>, sqlx::Error> {
        let query = format!(
            "SELECT {column} AS key, COUNT(*) AS count
             FROM abstracts WHERE NOT deleted
             GROUP BY {column} ORDER BY {column}"
        );
        sqlx::query_as::<_, CountByKey>(&query).fetch_all(pool).await
    }

    /// Submissions per calendar day since `since`.
    pub async fn daily_counts(
        pool: &PgPool,
        since: Timestamp,
    ) -> Result<Vec<(NaiveDate, i64)>, sqlx::Error> {
        sqlx::query_as::<_, (NaiveDate, i64)>(
            "SELECT date_soumission::DATE AS day, COUNT(*)
             FROM abstracts
             WHERE NOT deleted AND date_soumission >= $1
             GROUP BY day ORDER BY day",
        )
        .bind(since)
        .fetch_all(pool)
        .await
    }
}
