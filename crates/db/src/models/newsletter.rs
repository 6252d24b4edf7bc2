//! Newsletter subscribers.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use smcd_core::types::{DbId, Timestamp};

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct NewsletterSubscriber {
    pub id: DbId,
    pub email: String,
    pub nom: Option<String>,
    pub prenom: Option<String>,
    pub actif: bool,
    pub origine: Option<String>,
    pub date_inscription: Timestamp,
    pub date_desinscription: Option<Timestamp>,
    #[serde(skip_serializing)]
    pub token_desinscription: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateSubscriber {
    pub email: String,
    pub nom: Option<String>,
    pub prenom: Option<String>,
    pub origine: Option<String>,
}
