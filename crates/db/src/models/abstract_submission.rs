//! Scientific abstract submissions.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use smcd_core::catalog::{Rubrique, StatutSoumission, TypeCommunication};
use smcd_core::types::{DbId, Timestamp};

/// A row from the `abstracts` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AbstractSubmission {
    pub id: DbId,
    pub nom: String,
    pub prenom: String,
    pub email: String,
    pub telephone: Option<String>,
    pub auteurs: String,
    pub affiliation: String,
    pub type_communication: String,
    pub url_video: Option<String>,
    pub rubrique: String,
    pub titre: String,
    pub mots_cles: Option<String>,
    pub introduction: String,
    pub materiel_methodes: String,
    pub resultats: String,
    pub discussion: String,
    pub conclusion: String,
    pub bibliography: Option<String>,
    pub statut: String,
    pub numero_reference: String,
    pub word_file_url: Option<String>,
    pub word_file_public_id: Option<String>,
    pub commentaires_comite: Option<String>,
    pub date_soumission: Timestamp,
    pub date_revision: Option<Timestamp>,
    #[serde(skip_serializing)]
    pub deleted: bool,
}

/// Abstract with its enum codes resolved to display labels.
#[derive(Debug, Clone, Serialize)]
pub struct AbstractView {
    #[serde(flatten)]
    pub submission: AbstractSubmission,
    pub rubrique_label: String,
    pub type_communication_label: String,
    pub statut_label: String,
}

impl From<AbstractSubmission> for AbstractView {
    fn from(submission: AbstractSubmission) -> Self {
        Self {
            rubrique_label: Rubrique::label_of(&submission.rubrique),
            type_communication_label: TypeCommunication::label_of(&submission.type_communication),
            statut_label: StatutSoumission::label_of(&submission.statut),
            submission,
        }
    }
}

/// Insert payload. Enum fields are already validated codes.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAbstract {
    pub nom: String,
    pub prenom: String,
    pub email: String,
    pub telephone: Option<String>,
    pub auteurs: String,
    pub affiliation: String,
    pub type_communication: String,
    pub url_video: Option<String>,
    pub rubrique: String,
    pub titre: String,
    pub mots_cles: Option<String>,
    pub introduction: String,
    pub materiel_methodes: String,
    pub resultats: String,
    pub discussion: String,
    pub conclusion: String,
    pub bibliography: Option<String>,
    pub numero_reference: String,
}

/// Admin listing filters. `None` fields are not applied.
#[derive(Debug, Clone, Default)]
pub struct AbstractFilter {
    pub statut: Option<String>,
    pub rubrique: Option<String>,
    pub date_debut: Option<NaiveDate>,
    pub date_fin: Option<NaiveDate>,
    /// Already-built lowercase `LIKE` pattern.
    pub search: Option<String>,
}
