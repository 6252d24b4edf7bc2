//! Repository for the `contenus_statiques` table.

use sqlx::PgPool;

use crate::models::contenu::{ContenuStatique, UpsertContenu};

const COLUMNS: &str = "id, cle, titre_fr, titre_en, contenu_fr, contenu_en, image_url, \
    image_public_id, date_modification, modifie_par";

pub struct ContenuRepo;

impl ContenuRepo {
    pub async fn find_by_key(
        pool: &PgPool,
        cle: &str,
    ) -> Result<Option<ContenuStatique>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM contenus_statiques WHERE cle = $1");
        sqlx::query_as::<_, ContenuStatique>(&query)
            .bind(cle)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(pool: &PgPool) -> Result<Vec<ContenuStatique>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM contenus_statiques ORDER BY cle");
        sqlx::query_as::<_, ContenuStatique>(&query)
            .fetch_all(pool)
            .await
    }

    /// Insert or update the block stored under `cle`. Absent fields keep
    /// their stored value.
    pub async fn upsert(
        pool: &PgPool,
        cle: &str,
        input: &UpsertContenu,
    ) -> Result<ContenuStatique, sqlx::Error> {
        let query = format!(
            "INSERT INTO contenus_statiques (cle, titre_fr, titre_en, contenu_fr, contenu_en,
                image_url, image_public_id, modifie_par)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             ON CONFLICT ON CONSTRAINT uq_contenus_statiques_cle DO UPDATE SET
                titre_fr = COALESCE(EXCLUDED.titre_fr, contenus_statiques.titre_fr),
                titre_en = COALESCE(EXCLUDED.titre_en, contenus_statiques.titre_en),
                contenu_fr = COALESCE(EXCLUDED.contenu_fr, contenus_statiques.contenu_fr),
                contenu_en = COALESCE(EXCLUDED.contenu_en, contenus_statiques.contenu_en),
                image_url = COALESCE(EXCLUDED.image_url, contenus_statiques.image_url),
                image_public_id =
                    COALESCE(EXCLUDED.image_public_id, contenus_statiques.image_public_id),
                modifie_par = COALESCE(EXCLUDED.modifie_par, contenus_statiques.modifie_par),
                date_modification = NOW()
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ContenuStatique>(&query)
            .bind(cle)
            .bind(&input.titre_fr)
            .bind(&input.titre_en)
            .bind(&input.contenu_fr)
            .bind(&input.contenu_en)
            .bind(&input.image_url)
            .bind(&input.image_public_id)
            .bind(&input.modifie_par)
            .fetch_one(pool)
            .await
    }

    /// Create the block with placeholder text unless the key exists.
    /// Returns `true` when a row was inserted.
    pub async fn insert_default_if_missing(
        pool: &PgPool,
        cle: &str,
        titre: &str,
        contenu: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO contenus_statiques (cle, titre_fr, contenu_fr, titre_en, contenu_en)
             VALUES ($1, $2, $3, $2, $3)
             ON CONFLICT ON CONSTRAINT uq_contenus_statiques_cle DO NOTHING",
        )
        .bind(cle)
        .bind(titre)
        .bind(contenu)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
