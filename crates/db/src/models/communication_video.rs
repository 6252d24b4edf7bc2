//! Author-submitted presentation videos, moderated before publication.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use smcd_core::catalog::{Rubrique, StatutModeration};
use smcd_core::format::format_size;
use smcd_core::types::{DbId, Timestamp};

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CommunicationVideo {
    pub id: DbId,
    pub nom_auteur: String,
    pub prenom_auteur: String,
    pub email_auteur: String,
    pub titre: String,
    pub description: Option<String>,
    pub rubrique: Option<String>,
    pub video_url: String,
    pub video_public_id: Option<String>,
    pub taille_fichier: i64,
    pub format: String,
    pub duree: Option<i32>,
    pub statut: String,
    pub commentaires_admin: Option<String>,
    pub annee: i32,
    pub actif: bool,
    pub nombre_vues: i64,
    pub nombre_telechargements: i64,
    pub date_upload: Timestamp,
    pub date_modification: Timestamp,
    pub date_validation: Option<Timestamp>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CommunicationVideoView {
    #[serde(flatten)]
    pub video: CommunicationVideo,
    pub statut_label: String,
    pub rubrique_label: Option<String>,
    pub taille_formatee: String,
}

impl From<CommunicationVideo> for CommunicationVideoView {
    fn from(video: CommunicationVideo) -> Self {
        Self {
            statut_label: StatutModeration::label_of(&video.statut),
            rubrique_label: video.rubrique.as_deref().map(Rubrique::label_of),
            taille_formatee: format_size(Some(video.taille_fichier)),
            video,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateCommunicationVideo {
    pub nom_auteur: String,
    pub prenom_auteur: String,
    pub email_auteur: String,
    pub titre: String,
    pub description: Option<String>,
    pub rubrique: Option<String>,
    pub video_url: String,
    pub video_public_id: Option<String>,
    pub taille_fichier: i64,
    pub format: String,
    pub duree: Option<i32>,
    pub annee: i32,
}
