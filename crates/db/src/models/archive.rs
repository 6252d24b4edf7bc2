//! Past congress editions.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use smcd_core::types::{DbId, Timestamp};

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Archive {
    pub id: DbId,
    pub annee: i32,
    pub theme: String,
    pub lieu: String,
    pub date_debut: Option<NaiveDate>,
    pub date_fin: Option<NaiveDate>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub image_public_id: Option<String>,
    pub url_externe: Option<String>,
    pub nombre_participants: Option<i32>,
    pub nombre_abstracts: Option<i32>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Full set of editable fields. Used for both create and replace.
#[derive(Debug, Clone, Deserialize)]
pub struct ArchiveFields {
    pub annee: i32,
    pub theme: String,
    pub lieu: String,
    pub date_debut: Option<NaiveDate>,
    pub date_fin: Option<NaiveDate>,
    pub description: Option<String>,
    pub url_externe: Option<String>,
    pub nombre_participants: Option<i32>,
    pub nombre_abstracts: Option<i32>,
}
