//! E-posters: PowerPoint files uploaded by authors, moderated by staff.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use smcd_core::catalog::{Rubrique, StatutModeration};
use smcd_core::format::format_file_size;
use smcd_core::types::{DbId, Timestamp};

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Eposter {
    pub id: DbId,
    pub nom_auteur: String,
    pub prenom_auteur: String,
    pub email_auteur: String,
    pub titre: String,
    pub fichier_url: String,
    pub fichier_public_id: Option<String>,
    pub taille_fichier: i64,
    pub nom_fichier_original: Option<String>,
    pub rubrique: Option<String>,
    pub annee: i32,
    pub statut: String,
    pub commentaires_admin: Option<String>,
    pub date_validation: Option<Timestamp>,
    pub nombre_telechargements: i64,
    pub nombre_vues: i64,
    pub date_upload: Timestamp,
    pub date_modification: Timestamp,
}

#[derive(Debug, Clone, Serialize)]
pub struct EposterView {
    #[serde(flatten)]
    pub eposter: Eposter,
    pub statut_label: String,
    pub rubrique_label: Option<String>,
    pub taille_formatee: String,
}

impl From<Eposter> for EposterView {
    fn from(eposter: Eposter) -> Self {
        Self {
            statut_label: StatutModeration::label_of(&eposter.statut),
            rubrique_label: eposter.rubrique.as_deref().map(Rubrique::label_of),
            taille_formatee: format_file_size(Some(eposter.taille_fichier)),
            eposter,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateEposter {
    pub nom_auteur: String,
    pub prenom_auteur: String,
    pub email_auteur: String,
    pub titre: String,
    pub fichier_url: String,
    pub fichier_public_id: Option<String>,
    pub taille_fichier: i64,
    pub nom_fichier_original: Option<String>,
    pub rubrique: Option<String>,
    pub annee: i32,
}

/// Admin and public listing filters.
#[derive(Debug, Clone, Default)]
pub struct EposterFilter {
    pub statut: Option<String>,
    pub annee: Option<i32>,
    pub rubrique: Option<String>,
}

#[derive(Debug, Clone, FromRow)]
pub struct EposterTotals {
    pub total: i64,
    pub en_attente: i64,
    pub approuves: i64,
    pub rejetes: i64,
    pub taille_totale: i64,
}
