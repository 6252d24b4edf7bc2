//! Keyed bilingual page content.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use smcd_core::types::{DbId, Timestamp};

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ContenuStatique {
    pub id: DbId,
    pub cle: String,
    pub titre_fr: Option<String>,
    pub titre_en: Option<String>,
    pub contenu_fr: Option<String>,
    pub contenu_en: Option<String>,
    pub image_url: Option<String>,
    pub image_public_id: Option<String>,
    pub date_modification: Timestamp,
    pub modifie_par: Option<String>,
}

/// Upsert payload. `None` text fields keep the stored value on update.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpsertContenu {
    pub titre_fr: Option<String>,
    pub titre_en: Option<String>,
    pub contenu_fr: Option<String>,
    pub contenu_en: Option<String>,
    pub image_url: Option<String>,
    pub image_public_id: Option<String>,
    pub modifie_par: Option<String>,
}
