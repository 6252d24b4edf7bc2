//! Chapters (sessions) inside a gallery room.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use smcd_core::format::session_schedule;
use smcd_core::types::{DbId, Timestamp};

use super::video::VideoView;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Chapter {
    pub id: DbId,
    pub room_id: DbId,
    pub titre: String,
    pub slug: String,
    pub description: Option<String>,
    pub description_courte: Option<String>,
    pub moderateur: Option<String>,
    pub date_session: Option<NaiveDate>,
    pub heure_debut: Option<NaiveTime>,
    pub heure_fin: Option<NaiveTime>,
    pub ordre: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, FromRow)]
pub struct ChapterWithStats {
    #[sqlx(flatten)]
    pub chapter: Chapter,
    pub nombre_videos: i64,
    pub nombre_videos_publiees: i64,
    pub duree_totale_secondes: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChapterView {
    #[serde(flatten)]
    pub chapter: Chapter,
    pub nombre_videos: i64,
    pub nombre_videos_publiees: i64,
    pub duree_totale_minutes: i64,
    pub horaire_session: Option<String>,
}

impl From<ChapterWithStats> for ChapterView {
    fn from(row: ChapterWithStats) -> Self {
        let horaire_session = session_schedule(row.chapter.heure_debut, row.chapter.heure_fin);
        Self {
            chapter: row.chapter,
            nombre_videos: row.nombre_videos,
            nombre_videos_publiees: row.nombre_videos_publiees,
            duree_totale_minutes: row.duree_totale_secondes / 60,
            horaire_session,
        }
    }
}

/// Public chapter page: the chapter and its published videos.
#[derive(Debug, Clone, Serialize)]
pub struct ChapterDetail {
    #[serde(flatten)]
    pub chapter: ChapterView,
    pub videos: Vec<VideoView>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateChapter {
    pub room_id: DbId,
    pub titre: String,
    pub slug: String,
    pub description: Option<String>,
    pub description_courte: Option<String>,
    pub moderateur: Option<String>,
    pub date_session: Option<NaiveDate>,
    pub heure_debut: Option<NaiveTime>,
    pub heure_fin: Option<NaiveTime>,
    pub ordre: i32,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateChapter {
    pub titre: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub description_courte: Option<String>,
    pub moderateur: Option<String>,
    pub date_session: Option<NaiveDate>,
    pub heure_debut: Option<NaiveTime>,
    pub heure_fin: Option<NaiveTime>,
}
