//! Congress sponsors and partners.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use smcd_core::catalog::NiveauSponsor;
use smcd_core::types::{DbId, Timestamp};

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Sponsor {
    pub id: DbId,
    pub nom: String,
    pub nom_court: Option<String>,
    pub slug: String,
    pub logo_url: String,
    pub logo_public_id: Option<String>,
    pub description: Option<String>,
    pub description_courte: Option<String>,
    pub niveau: String,
    pub categorie: Option<String>,
    pub annee: i32,
    pub site_web: Option<String>,
    pub email: Option<String>,
    pub telephone: Option<String>,
    pub ordre: i32,
    pub active: bool,
    pub nombre_clics: i64,
    pub date_partenariat: Timestamp,
    pub date_modification: Timestamp,
}

#[derive(Debug, Clone, Serialize)]
pub struct SponsorView {
    #[serde(flatten)]
    pub sponsor: Sponsor,
    pub niveau_label: String,
    pub niveau_couleur: Option<&'static str>,
}

impl From<Sponsor> for SponsorView {
    fn from(sponsor: Sponsor) -> Self {
        let niveau = sponsor.niveau.parse::<NiveauSponsor>().ok();
        Self {
            niveau_label: NiveauSponsor::label_of(&sponsor.niveau),
            niveau_couleur: niveau.map(NiveauSponsor::color),
            sponsor,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateSponsor {
    pub nom: String,
    pub nom_court: Option<String>,
    pub slug: String,
    pub logo_url: String,
    pub logo_public_id: Option<String>,
    pub description: Option<String>,
    pub description_courte: Option<String>,
    pub niveau: String,
    pub categorie: Option<String>,
    pub annee: i32,
    pub site_web: Option<String>,
    pub email: Option<String>,
    pub telephone: Option<String>,
    pub ordre: i32,
    pub active: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateSponsor {
    pub nom: Option<String>,
    pub nom_court: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub description_courte: Option<String>,
    pub niveau: Option<String>,
    pub categorie: Option<String>,
    pub annee: Option<i32>,
    pub site_web: Option<String>,
    pub email: Option<String>,
    pub telephone: Option<String>,
    pub ordre: Option<i32>,
    pub active: Option<bool>,
    /// Replacement logo, written in the same statement as the fields.
    #[serde(skip)]
    pub logo_url: Option<String>,
    #[serde(skip)]
    pub logo_public_id: Option<String>,
}
