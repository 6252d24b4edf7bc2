//! Gallery rooms: top level of the Room -> Chapter -> Video hierarchy.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use smcd_core::format::format_total_minutes;
use smcd_core::types::{DbId, Timestamp};

use super::chapter::ChapterView;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Room {
    pub id: DbId,
    pub nom: String,
    pub nom_court: Option<String>,
    pub slug: String,
    pub description: Option<String>,
    pub description_courte: Option<String>,
    pub image_url: Option<String>,
    pub image_public_id: Option<String>,
    pub couleur: Option<String>,
    pub icone: Option<String>,
    pub ordre_affichage: i32,
    pub annee: i32,
    pub active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Room row joined with aggregate counts over its chapters and videos.
#[derive(Debug, Clone, FromRow)]
pub struct RoomWithStats {
    #[sqlx(flatten)]
    pub room: Room,
    pub nombre_chapitres: i64,
    pub nombre_videos: i64,
    pub duree_totale_secondes: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct RoomView {
    #[serde(flatten)]
    pub room: Room,
    pub nombre_chapitres: i64,
    pub nombre_videos: i64,
    pub duree_totale_minutes: i64,
    pub duree_totale_formatee: String,
}

impl From<RoomWithStats> for RoomView {
    fn from(row: RoomWithStats) -> Self {
        let minutes = row.duree_totale_secondes / 60;
        Self {
            room: row.room,
            nombre_chapitres: row.nombre_chapitres,
            nombre_videos: row.nombre_videos,
            duree_totale_minutes: minutes,
            duree_totale_formatee: format_total_minutes(minutes),
        }
    }
}

/// Public room page: the room and its chapters.
#[derive(Debug, Clone, Serialize)]
pub struct RoomDetail {
    #[serde(flatten)]
    pub room: RoomView,
    pub chapters: Vec<ChapterView>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateRoom {
    pub nom: String,
    pub nom_court: Option<String>,
    pub slug: String,
    pub description: Option<String>,
    pub description_courte: Option<String>,
    pub couleur: Option<String>,
    pub icone: Option<String>,
    pub annee: i32,
    pub active: bool,
    pub ordre_affichage: i32,
    pub image_url: Option<String>,
    pub image_public_id: Option<String>,
}

/// Partial update. `None` fields keep their stored value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateRoom {
    pub nom: Option<String>,
    pub nom_court: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub description_courte: Option<String>,
    pub couleur: Option<String>,
    pub icone: Option<String>,
    pub annee: Option<i32>,
    pub active: Option<bool>,
}
