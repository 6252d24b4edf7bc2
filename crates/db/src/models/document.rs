//! Downloadable documents (programme, brochures, forms...).

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use smcd_core::catalog::{TypeDocument, VisibiliteDocument};
use smcd_core::format::format_file_size;
use smcd_core::types::{DbId, Timestamp};

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Document {
    pub id: DbId,
    pub titre: String,
    pub slug: String,
    pub description: Option<String>,
    pub description_courte: Option<String>,
    pub fichier_url: String,
    pub fichier_public_id: Option<String>,
    pub taille_fichier: i64,
    pub nom_fichier_original: Option<String>,
    pub format_fichier: Option<String>,
    pub type_document: String,
    pub annee: i32,
    pub langue: String,
    pub visibilite: String,
    pub publie: bool,
    pub ordre: i32,
    pub featured: bool,
    pub nombre_telechargements: i64,
    pub date_publication: Timestamp,
    pub date_expiration: Option<Timestamp>,
    pub date_modification: Timestamp,
}

#[derive(Debug, Clone, Serialize)]
pub struct DocumentView {
    #[serde(flatten)]
    pub document: Document,
    pub type_label: String,
    pub visibilite_label: String,
    pub taille_formatee: String,
}

impl From<Document> for DocumentView {
    fn from(document: Document) -> Self {
        Self {
            type_label: TypeDocument::label_of(&document.type_document),
            visibilite_label: VisibiliteDocument::label_of(&document.visibilite),
            taille_formatee: format_file_size(Some(document.taille_fichier)),
            document,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateDocument {
    pub titre: String,
    pub slug: String,
    pub description: Option<String>,
    pub description_courte: Option<String>,
    pub fichier_url: String,
    pub fichier_public_id: Option<String>,
    pub taille_fichier: i64,
    pub nom_fichier_original: Option<String>,
    pub format_fichier: Option<String>,
    pub type_document: String,
    pub annee: i32,
    pub langue: String,
    pub visibilite: String,
    pub publie: bool,
    pub ordre: i32,
    pub featured: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateDocument {
    pub titre: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub description_courte: Option<String>,
    pub type_document: Option<String>,
    pub annee: Option<i32>,
    pub langue: Option<String>,
    pub visibilite: Option<String>,
    pub publie: Option<bool>,
    pub ordre: Option<i32>,
    pub featured: Option<bool>,
    #[serde(skip)]
    pub file: Option<DocumentFile>,
}

/// Replacement file metadata for a document.
#[derive(Debug, Clone)]
pub struct DocumentFile {
    pub fichier_url: String,
    pub fichier_public_id: Option<String>,
    pub taille_fichier: i64,
    pub nom_fichier_original: Option<String>,
    pub format_fichier: Option<String>,
}
