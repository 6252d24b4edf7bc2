//! Repository for the `speakers` table.

use sqlx::PgPool;
use smcd_core::search::like_pattern;
use smcd_core::types::DbId;

use crate::models::speaker::{CreateSpeaker, Speaker, SpeakerFields, SpeakerFilter, SpeakerMedia};
use crate::models::stats::CountByKey;

const COLUMNS: &str = "id, titre, nom, prenom, specialite, institution, pays, ville, \
    bio_courte_fr, bio_complete_fr, bio_courte_en, bio_complete_en, photo_url, \
    photo_public_id, cv_url, cv_public_id, email, telephone, site_web, linkedin_url, \
    research_gate_url, ordre, featured, is_president, message_president, annee, date_ajout, \
    date_modification";

pub struct SpeakerRepo;

impl SpeakerRepo {
    pub async fn create(pool: &PgPool, input: &CreateSpeaker) -> Result<Speaker, sqlx::Error> {
        let f = &input.fields;
        let query = format!(
            "INSERT INTO speakers (nom, prenom, annee, ordre, photo_url, photo_public_id,
                cv_url, cv_public_id, titre, specialite, institution, pays, ville,
                bio_courte_fr, bio_complete_fr, bio_courte_en, bio_complete_en, email,
                telephone, site_web, linkedin_url, research_gate_url, featured,
                is_president, message_president)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16,
                $17, $18, $19, $20, $21, $22, COALESCE($23, FALSE), COALESCE($24, FALSE), $25)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Speaker>(&query)
            .bind(&input.nom)
            .bind(&input.prenom)
            .bind(input.annee)
            .bind(input.ordre)
            .bind(&input.photo_url)
            .bind(&input.photo_public_id)
            .bind(&input.cv_url)
            .bind(&input.cv_public_id)
            .bind(&f.titre)
            .bind(&f.specialite)
            .bind(&f.institution)
            .bind(&f.pays)
            .bind(&f.ville)
            .bind(&f.bio_courte_fr)
            .bind(&f.bio_complete_fr)
            .bind(&f.bio_courte_en)
            .bind(&f.bio_complete_en)
            .bind(&f.email)
            .bind(&f.telephone)
            .bind(&f.site_web)
            .bind(&f.linkedin_url)
            .bind(&f.research_gate_url)
            .bind(f.featured)
            .bind(f.is_president)
            .bind(&f.message_president)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Speaker>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM speakers WHERE id = $1");
        sqlx::query_as::<_, Speaker>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Speakers of one year in display order, optionally featured only.
    pub async fn list_public(
        pool: &PgPool,
        annee: i32,
        featured_only: bool,
    ) -> Result<Vec<Speaker>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM speakers
             WHERE annee = $1 AND (NOT $2 OR featured = TRUE)
             ORDER BY ordre, id"
        );
        sqlx::query_as::<_, Speaker>(&query)
            .bind(annee)
            .bind(featured_only)
            .fetch_all(pool)
            .await
    }

    /// Admin listing. `specialite` matches as a case-insensitive substring.
    pub async fn list(pool: &PgPool, filter: &SpeakerFilter) -> Result<Vec<Speaker>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM speakers
             WHERE ($1::INTEGER IS NULL OR annee = $1)
               AND ($2::TEXT IS NULL OR pays = $2)
               AND ($3::TEXT IS NULL OR LOWER(COALESCE(specialite, '')) LIKE $3)
               AND ($4::BOOLEAN IS NULL OR featured = $4)
             ORDER BY annee DESC, ordre, id"
        );
        let specialite = filter.specialite.as_deref().and_then(like_pattern);
        sqlx::query_as::<_, Speaker>(&query)
            .bind(filter.annee)
            .bind(&filter.pays)
            .bind(specialite)
            .bind(filter.featured)
            .fetch_all(pool)
            .await
    }

    pub async fn find_president(
        pool: &PgPool,
        annee: i32,
    ) -> Result<Option<Speaker>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM speakers
             WHERE is_president = TRUE AND annee = $1
             ORDER BY date_modification DESC
             LIMIT 1"
        );
        sqlx::query_as::<_, Speaker>(&query)
            .bind(annee)
            .fetch_optional(pool)
            .await
    }

    pub async fn distinct_pays(pool: &PgPool) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar::<_, String>(
            "SELECT DISTINCT pays FROM speakers WHERE pays IS NOT NULL ORDER BY pays",
        )
        .fetch_all(pool)
        .await
    }

    pub async fn distinct_specialites(pool: &PgPool) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar::<_, String>(
            "SELECT DISTINCT specialite FROM speakers
             WHERE specialite IS NOT NULL ORDER BY specialite",
        )
        .fetch_all(pool)
        .await
    }

    /// Years with at least one speaker, most recent first.
    pub async fn distinct_annees(pool: &PgPool) -> Result<Vec<i32>, sqlx::Error> {
        sqlx::query_scalar::<_, i32>("SELECT DISTINCT annee FROM speakers ORDER BY annee DESC")
            .fetch_all(pool)
            .await
    }

    /// Partial update; `None` fields keep their stored value.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        f: &SpeakerFields,
        media: &SpeakerMedia,
    ) -> Result<Option<Speaker>, sqlx::Error> {
        let query = format!(
            "UPDATE speakers SET
                titre = COALESCE($2, titre),
                nom = COALESCE($3, nom),
                prenom = COALESCE($4, prenom),
                specialite = COALESCE($5, specialite),
                institution = COALESCE($6, institution),
                pays = COALESCE($7, pays),
                ville = COALESCE($8, ville),
                bio_courte_fr = COALESCE($9, bio_courte_fr),
                bio_complete_fr = COALESCE($10, bio_complete_fr),
                bio_courte_en = COALESCE($11, bio_courte_en),
                bio_complete_en = COALESCE($12, bio_complete_en),
                email = COALESCE($13, email),
                telephone = COALESCE($14, telephone),
                site_web = COALESCE($15, site_web),
                linkedin_url = COALESCE($16, linkedin_url),
                research_gate_url = COALESCE($17, research_gate_url),
                ordre = COALESCE($18, ordre),
                featured = COALESCE($19, featured),
                is_president = COALESCE($20, is_president),
                message_president = COALESCE($21, message_president),
                annee = COALESCE($22, annee),
                photo_url = COALESCE($23, photo_url),
                photo_public_id = COALESCE($24, photo_public_id),
                cv_url = COALESCE($25, cv_url),
                cv_public_id = COALESCE($26, cv_public_id),
                date_modification = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Speaker>(&query)
            .bind(id)
            .bind(&f.titre)
            .bind(&f.nom)
            .bind(&f.prenom)
            .bind(&f.specialite)
            .bind(&f.institution)
            .bind(&f.pays)
            .bind(&f.ville)
            .bind(&f.bio_courte_fr)
            .bind(&f.bio_complete_fr)
            .bind(&f.bio_courte_en)
            .bind(&f.bio_complete_en)
            .bind(&f.email)
            .bind(&f.telephone)
            .bind(&f.site_web)
            .bind(&f.linkedin_url)
            .bind(&f.research_gate_url)
            .bind(f.ordre)
            .bind(f.featured)
            .bind(f.is_president)
            .bind(&f.message_president)
            .bind(f.annee)
            .bind(&media.photo_url)
            .bind(&media.photo_public_id)
            .bind(&media.cv_url)
            .bind(&media.cv_public_id)
            .fetch_optional(pool)
            .await
    }

    pub async fn next_order(pool: &PgPool, annee: i32) -> Result<i32, sqlx::Error> {
        sqlx::query_scalar::<_, i32>(
            "SELECT COALESCE(MAX(ordre), 0) + 1 FROM speakers WHERE annee = $1",
        )
        .bind(annee)
        .fetch_one(pool)
        .await
    }

    /// Set `ordre` to each id's 1-based position in `ids`.
    pub async fn reorder(pool: &PgPool, ids: &[DbId]) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE speakers s SET ordre = o.position::INT, date_modification = NOW()
             FROM UNNEST($1::BIGINT[]) WITH ORDINALITY AS o(id, position)
             WHERE s.id = o.id",
        )
        .bind(ids)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM speakers WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // -- statistics ----------------------------------------------------------

    pub async fn count_in_year(pool: &PgPool, annee: i32) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM speakers WHERE annee = $1")
            .bind(annee)
            .fetch_one(pool)
            .await
    }

    pub async fn count_featured_in_year(pool: &PgPool, annee: i32) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM speakers WHERE annee = $1 AND featured = TRUE",
        )
        .bind(annee)
        .fetch_one(pool)
        .await
    }

    pub async fn count_by_pays(pool: &PgPool, annee: i32) -> Result<Vec<CountByKey>, sqlx::Error> {
        sqlx::query_as::<_, CountByKey>(
            "SELECT pays AS key, COUNT(*) AS count FROM speakers
             WHERE annee = $1 AND pays IS NOT NULL
             GROUP BY pays ORDER BY COUNT(*) DESC, pays",
        )
        .bind(annee)
        .fetch_all(pool)
        .await
    }

    pub async fn count_by_specialite(
        pool: &PgPool,
        annee: i32,
    ) -> Result<Vec<CountByKey>, sqlx::Error> {
        sqlx::query_as::<_, CountByKey>(
            "SELECT specialite AS key, COUNT(*) AS count FROM speakers
             WHERE annee = $1 AND specialite IS NOT NULL
             GROUP BY specialite ORDER BY COUNT(*) DESC, specialite",
        )
        .bind(annee)
        .fetch_all(pool)
        .await
    }
}
