//! Gallery videos, the leaves of the Room -> Chapter -> Video hierarchy.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use smcd_core::catalog::VisibiliteVideo;
use smcd_core::format::{format_clock, format_size, split_tags, streaming_url};
use smcd_core::types::{DbId, Timestamp};

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Video {
    pub id: DbId,
    pub chapter_id: DbId,
    pub titre: String,
    pub slug: String,
    pub description: Option<String>,
    pub description_courte: Option<String>,
    pub intervenant: Option<String>,
    pub co_intervenants: Option<String>,
    pub video_url: String,
    pub video_public_id: Option<String>,
    pub thumbnail_url: Option<String>,
    pub thumbnail_public_id: Option<String>,
    /// Seconds.
    pub duree: Option<i32>,
    pub format: Option<String>,
    pub resolution: Option<String>,
    pub taille_fichier: Option<i64>,
    pub tags: Option<String>,
    pub langue: String,
    pub sous_titres_url: Option<String>,
    pub visibilite: String,
    pub publie: bool,
    pub ordre: i32,
    pub nombre_vues: i64,
    pub nombre_likes: i64,
    pub temps_visionnage_moyen: Option<i32>,
    pub date_upload: Timestamp,
    pub date_publication: Option<Timestamp>,
    pub date_modification: Timestamp,
}

/// Video with its display-ready derived fields.
#[derive(Debug, Clone, Serialize)]
pub struct VideoView {
    #[serde(flatten)]
    pub video: Video,
    pub duree_formatee: String,
    pub taille_formatee: String,
    pub tags_array: Vec<String>,
    pub streaming_url: String,
    pub visibilite_label: String,
    pub visibilite_color: Option<&'static str>,
}

impl From<Video> for VideoView {
    fn from(video: Video) -> Self {
        let visibilite = video.visibilite.parse::<VisibiliteVideo>().ok();
        Self {
            duree_formatee: format_clock(video.duree),
            taille_formatee: format_size(video.taille_fichier),
            tags_array: split_tags(video.tags.as_deref()),
            streaming_url: streaming_url(&video.video_url),
            visibilite_label: VisibiliteVideo::label_of(&video.visibilite),
            visibilite_color: visibilite.map(VisibiliteVideo::color),
            video,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateVideo {
    pub chapter_id: DbId,
    pub titre: String,
    pub slug: String,
    pub description: Option<String>,
    pub description_courte: Option<String>,
    pub intervenant: Option<String>,
    pub co_intervenants: Option<String>,
    pub video_url: String,
    pub video_public_id: Option<String>,
    pub thumbnail_url: Option<String>,
    pub thumbnail_public_id: Option<String>,
    pub duree: Option<i32>,
    pub format: Option<String>,
    pub taille_fichier: Option<i64>,
    pub tags: Option<String>,
    pub langue: String,
    pub visibilite: String,
    pub ordre: i32,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateVideo {
    pub titre: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub description_courte: Option<String>,
    pub intervenant: Option<String>,
    pub co_intervenants: Option<String>,
    pub tags: Option<String>,
    pub langue: Option<String>,
    pub visibilite: Option<String>,
    pub resolution: Option<String>,
    pub sous_titres_url: Option<String>,
}

/// Library-wide totals for the admin dashboard.
#[derive(Debug, Clone, FromRow)]
pub struct VideoTotals {
    pub total_rooms: i64,
    pub total_chapters: i64,
    pub total_videos: i64,
    pub videos_publiees: i64,
    pub total_vues: i64,
    pub duree_totale_secondes: i64,
    pub taille_totale: i64,
}
