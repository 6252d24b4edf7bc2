//! Invited speakers.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use smcd_core::format::{full_name, localisation};
use smcd_core::types::{DbId, Timestamp};

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Speaker {
    pub id: DbId,
    pub titre: Option<String>,
    pub nom: String,
    pub prenom: String,
    pub specialite: Option<String>,
    pub institution: Option<String>,
    pub pays: Option<String>,
    pub ville: Option<String>,
    pub bio_courte_fr: Option<String>,
    pub bio_complete_fr: Option<String>,
    pub bio_courte_en: Option<String>,
    pub bio_complete_en: Option<String>,
    pub photo_url: String,
    pub photo_public_id: Option<String>,
    pub cv_url: Option<String>,
    pub cv_public_id: Option<String>,
    pub email: Option<String>,
    pub telephone: Option<String>,
    pub site_web: Option<String>,
    pub linkedin_url: Option<String>,
    pub research_gate_url: Option<String>,
    pub ordre: i32,
    pub featured: bool,
    pub is_president: bool,
    pub message_president: Option<String>,
    pub annee: i32,
    pub date_ajout: Timestamp,
    pub date_modification: Timestamp,
}

#[derive(Debug, Clone, Serialize)]
pub struct SpeakerView {
    #[serde(flatten)]
    pub speaker: Speaker,
    pub nom_complet: String,
    pub localisation: String,
}

impl From<Speaker> for SpeakerView {
    fn from(speaker: Speaker) -> Self {
        Self {
            nom_complet: full_name(speaker.titre.as_deref(), &speaker.prenom, &speaker.nom),
            localisation: localisation(speaker.ville.as_deref(), speaker.pays.as_deref()),
            speaker,
        }
    }
}

/// Replacement photo and CV for a partial update. `None` keeps the stored
/// file.
#[derive(Debug, Clone, Default)]
pub struct SpeakerMedia {
    pub photo_url: Option<String>,
    pub photo_public_id: Option<String>,
    pub cv_url: Option<String>,
    pub cv_public_id: Option<String>,
}

/// Text fields shared by create and partial update.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SpeakerFields {
    pub titre: Option<String>,
    pub nom: Option<String>,
    pub prenom: Option<String>,
    pub specialite: Option<String>,
    pub institution: Option<String>,
    pub pays: Option<String>,
    pub ville: Option<String>,
    pub bio_courte_fr: Option<String>,
    pub bio_complete_fr: Option<String>,
    pub bio_courte_en: Option<String>,
    pub bio_complete_en: Option<String>,
    pub email: Option<String>,
    pub telephone: Option<String>,
    pub site_web: Option<String>,
    pub linkedin_url: Option<String>,
    pub research_gate_url: Option<String>,
    pub ordre: Option<i32>,
    pub featured: Option<bool>,
    pub is_president: Option<bool>,
    pub message_president: Option<String>,
    pub annee: Option<i32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateSpeaker {
    pub nom: String,
    pub prenom: String,
    pub annee: i32,
    pub ordre: i32,
    pub photo_url: String,
    pub photo_public_id: Option<String>,
    pub cv_url: Option<String>,
    pub cv_public_id: Option<String>,
    pub fields: SpeakerFields,
}

/// Filters for the admin listing.
#[derive(Debug, Clone, Default)]
pub struct SpeakerFilter {
    pub annee: Option<i32>,
    pub pays: Option<String>,
    pub specialite: Option<String>,
    pub featured: Option<bool>,
}
