//! Unique slug allocation across the slugged tables.

use sqlx::PgPool;
use smcd_core::slug::{slug_candidate, slugify};
use smcd_core::types::DbId;

/// Tables carrying a unique `slug` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlugTable {
    Rooms,
    Chapters,
    Videos,
    Documents,
    Sponsors,
}

impl SlugTable {
    fn table(self) -> &'static str {
        match self {
            SlugTable::Rooms => "rooms",
            SlugTable::Chapters => "chapters",
            SlugTable::Videos => "videos",
            SlugTable::Documents => "documents",
            SlugTable::Sponsors => "sponsors",
        }
    }
}

pub struct SlugRepo;

impl SlugRepo {
    /// Whether `slug` is taken in `table` by a row other than `exclude_id`.
    pub async fn exists(
        pool: &PgPool,
        table: SlugTable,
        slug: &str,
        exclude_id: Option<DbId>,
    ) -> Result<bool, sqlx::Error> {
        let query = format!(
            "SELECT EXISTS(
                SELECT 1 FROM {} WHERE slug = $1 AND ($2::BIGINT IS NULL OR id <> $2)
             )",
            table.table()
        );
        sqlx::query_scalar::<_, bool>(&query)
            .bind(slug)
            .bind(exclude_id)
            .fetch_one(pool)
            .await
    }

    /// Slugify `source` and append `-1`, `-2`, ... until the slug is free.
    ///
    /// `exclude_id` lets a row keep its own slug when it is renamed to a
    /// title that folds to the same text.
    pub async fn unique_slug(
        pool: &PgPool,
        table: SlugTable,
        source: &str,
        exclude_id: Option<DbId>,
    ) -> Result<String, sqlx::Error> {
        let base = slugify(source);
        let mut attempt = 0;
        loop {
            let candidate = slug_candidate(&base, attempt);
            if !Self::exists(pool, table, &candidate, exclude_id).await? {
                return Ok(candidate);
            }
            attempt += 1;
        }
    }
}
