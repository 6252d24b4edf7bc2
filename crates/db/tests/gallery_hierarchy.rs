//! Room -> Chapter -> Video repositories against a real database:
//! - aggregate stats on rooms and chapters
//! - publish / view counters
//! - reorder by id list
//! - delete blocked while children exist
//! - slug uniqueness suffixes

use sqlx::PgPool;
use smcd_db::models::chapter::{CreateChapter, UpdateChapter};
use smcd_db::models::room::CreateRoom;
use smcd_db::models::video::CreateVideo;
use smcd_db::repositories::{ChapterRepo, RoomRepo, SlugRepo, SlugTable, VideoRepo};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_room(nom: &str, slug: &str, ordre: i32) -> CreateRoom {
    CreateRoom {
        nom: nom.to_string(),
        nom_court: None,
        slug: slug.to_string(),
        description: None,
        description_courte: None,
        couleur: Some("#1E40AF".to_string()),
        icone: None,
        annee: 2026,
        active: true,
        ordre_affichage: ordre,
        image_url: None,
        image_public_id: None,
    }
}

fn new_chapter(room_id: i64, titre: &str, slug: &str, ordre: i32) -> CreateChapter {
    CreateChapter {
        room_id,
        titre: titre.to_string(),
        slug: slug.to_string(),
        description: None,
        description_courte: None,
        moderateur: None,
        date_session: None,
        heure_debut: None,
        heure_fin: None,
        ordre,
    }
}

fn new_video(chapter_id: i64, slug: &str, duree: i32, ordre: i32) -> CreateVideo {
    CreateVideo {
        chapter_id,
        titre: format!("Vidéo {slug}"),
        slug: slug.to_string(),
        description: None,
        description_courte: None,
        intervenant: Some("Pr. Benali".to_string()),
        co_intervenants: None,
        video_url: format!("https://cdn.example/{slug}.mp4"),
        video_public_id: Some(format!("smcd-congress/videos/2026/{slug}")),
        thumbnail_url: None,
        thumbnail_public_id: None,
        duree: Some(duree),
        format: Some("MP4".to_string()),
        taille_fichier: Some(1024),
        tags: Some("foie, résection".to_string()),
        langue: "FR".to_string(),
        visibilite: "PUBLIC".to_string(),
        ordre,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_room_stats_aggregate_children(pool: PgPool) {
    let room = RoomRepo::create(&pool, &new_room("Salle A", "salle-a", 1)).await.unwrap();
    let ch = ChapterRepo::create(&pool, &new_chapter(room.id, "Foie", "foie", 1))
        .await
        .unwrap();
    VideoRepo::create(&pool, &new_video(ch.id, "v1", 600, 1)).await.unwrap();
    let v2 = VideoRepo::create(&pool, &new_video(ch.id, "v2", 3000, 2)).await.unwrap();
    VideoRepo::set_published(&pool, v2.id, true).await.unwrap();

    let stats = RoomRepo::find_with_stats(&pool, room.id).await.unwrap().unwrap();
    assert_eq!(stats.nombre_chapitres, 1);
    assert_eq!(stats.nombre_videos, 2);
    assert_eq!(stats.duree_totale_secondes, 3600);

    let chapter = ChapterRepo::find_with_stats(&pool, ch.id).await.unwrap().unwrap();
    assert_eq!(chapter.nombre_videos, 2);
    assert_eq!(chapter.nombre_videos_publiees, 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_public_room_listing_hides_inactive(pool: PgPool) {
    let a = RoomRepo::create(&pool, &new_room("A", "a", 1)).await.unwrap();
    RoomRepo::create(&pool, &new_room("B", "b", 2)).await.unwrap();
    RoomRepo::toggle_active(&pool, a.id).await.unwrap();

    let public = RoomRepo::list_with_stats(&pool, Some(2026), true).await.unwrap();
    assert_eq!(public.len(), 1);
    assert_eq!(public[0].room.slug, "b");

    let all = RoomRepo::list_with_stats(&pool, None, false).await.unwrap();
    assert_eq!(all.len(), 2);
    assert!(RoomRepo::find_active_by_slug(&pool, "a").await.unwrap().is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_next_order_and_reorder(pool: PgPool) {
    assert_eq!(RoomRepo::next_display_order(&pool, 2026).await.unwrap(), 1);
    let r1 = RoomRepo::create(&pool, &new_room("R1", "r1", 1)).await.unwrap();
    let r2 = RoomRepo::create(&pool, &new_room("R2", "r2", 2)).await.unwrap();
    assert_eq!(RoomRepo::next_display_order(&pool, 2026).await.unwrap(), 3);

    // Unknown ids are skipped.
    let updated = RoomRepo::reorder(&pool, &[r2.id, 9999, r1.id]).await.unwrap();
    assert_eq!(updated, 2);

    let r1 = RoomRepo::find_by_id(&pool, r1.id).await.unwrap().unwrap();
    let r2 = RoomRepo::find_by_id(&pool, r2.id).await.unwrap().unwrap();
    assert_eq!(r2.ordre_affichage, 1);
    assert_eq!(r1.ordre_affichage, 3);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_chapter_reorder_is_scoped_to_room(pool: PgPool) {
    let a = RoomRepo::create(&pool, &new_room("A", "a", 1)).await.unwrap();
    let b = RoomRepo::create(&pool, &new_room("B", "b", 2)).await.unwrap();
    let c1 = ChapterRepo::create(&pool, &new_chapter(a.id, "C1", "c1", 1)).await.unwrap();
    let c2 = ChapterRepo::create(&pool, &new_chapter(b.id, "C2", "c2", 1)).await.unwrap();

    let updated = ChapterRepo::reorder(&pool, a.id, &[c2.id, c1.id]).await.unwrap();
    assert_eq!(updated, 1);
    let c2 = ChapterRepo::find_by_id(&pool, c2.id).await.unwrap().unwrap();
    assert_eq!(c2.ordre, 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_move_chapter_between_rooms(pool: PgPool) {
    let a = RoomRepo::create(&pool, &new_room("A", "a", 1)).await.unwrap();
    let b = RoomRepo::create(&pool, &new_room("B", "b", 2)).await.unwrap();
    ChapterRepo::create(&pool, &new_chapter(b.id, "Existing", "existing", 1))
        .await
        .unwrap();
    let ch = ChapterRepo::create(&pool, &new_chapter(a.id, "Mobile", "mobile", 1))
        .await
        .unwrap();

    let ordre = ChapterRepo::next_order(&pool, b.id).await.unwrap();
    let moved = ChapterRepo::move_to_room(&pool, ch.id, b.id, ordre)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(moved.room_id, b.id);
    assert_eq!(moved.ordre, 2);
    assert_eq!(ChapterRepo::count_in_room(&pool, a.id).await.unwrap(), 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_chapter_update_keeps_unset_fields(pool: PgPool) {
    let room = RoomRepo::create(&pool, &new_room("A", "a", 1)).await.unwrap();
    let mut input = new_chapter(room.id, "Avant", "avant", 1);
    input.moderateur = Some("Dr. Idrissi".to_string());
    let ch = ChapterRepo::create(&pool, &input).await.unwrap();

    let update = UpdateChapter {
        titre: Some("Après".to_string()),
        slug: Some("apres".to_string()),
        ..Default::default()
    };
    let updated = ChapterRepo::update(&pool, ch.id, &update).await.unwrap().unwrap();
    assert_eq!(updated.titre, "Après");
    assert_eq!(updated.slug, "apres");
    assert_eq!(updated.moderateur.as_deref(), Some("Dr. Idrissi"));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_delete_blocked_by_children(pool: PgPool) {
    let room = RoomRepo::create(&pool, &new_room("A", "a", 1)).await.unwrap();
    let ch = ChapterRepo::create(&pool, &new_chapter(room.id, "C", "c", 1)).await.unwrap();
    VideoRepo::create(&pool, &new_video(ch.id, "v", 10, 1)).await.unwrap();

    let err = ChapterRepo::delete(&pool, ch.id).await.unwrap_err();
    let code = err.as_database_error().and_then(|e| e.code()).unwrap();
    assert_eq!(code, "23503");

    let err = RoomRepo::delete(&pool, room.id).await.unwrap_err();
    assert!(err.as_database_error().is_some());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_publish_and_view_counter(pool: PgPool) {
    let room = RoomRepo::create(&pool, &new_room("A", "a", 1)).await.unwrap();
    let ch = ChapterRepo::create(&pool, &new_chapter(room.id, "C", "c", 1)).await.unwrap();
    let v = VideoRepo::create(&pool, &new_video(ch.id, "v", 10, 1)).await.unwrap();
    assert!(!v.publie);

    // Drafts are not counted nor visible publicly.
    assert!(!VideoRepo::increment_views(&pool, v.id).await.unwrap());
    assert!(VideoRepo::find_published_by_slug(&pool, "v").await.unwrap().is_none());

    let published = VideoRepo::set_published(&pool, v.id, true).await.unwrap().unwrap();
    assert!(published.publie);
    assert!(published.date_publication.is_some());

    assert!(VideoRepo::increment_views(&pool, v.id).await.unwrap());
    assert!(VideoRepo::increment_views(&pool, v.id).await.unwrap());
    let v = VideoRepo::find_by_id(&pool, v.id).await.unwrap().unwrap();
    assert_eq!(v.nombre_vues, 2);

    let unpublished = VideoRepo::set_published(&pool, v.id, false).await.unwrap().unwrap();
    assert!(!unpublished.publie);
    assert_eq!(unpublished.date_publication, published.date_publication);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_search_and_totals(pool: PgPool) {
    let room = RoomRepo::create(&pool, &new_room("A", "a", 1)).await.unwrap();
    let ch = ChapterRepo::create(&pool, &new_chapter(room.id, "C", "c", 1)).await.unwrap();
    let v1 = VideoRepo::create(&pool, &new_video(ch.id, "hepatectomie", 60, 1)).await.unwrap();
    VideoRepo::create(&pool, &new_video(ch.id, "brouillon", 60, 2)).await.unwrap();
    VideoRepo::set_published(&pool, v1.id, true).await.unwrap();

    let hits = VideoRepo::search_published(&pool, "%résection%", 10).await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, v1.id);

    let totals = VideoRepo::totals(&pool).await.unwrap();
    assert_eq!(totals.total_rooms, 1);
    assert_eq!(totals.total_chapters, 1);
    assert_eq!(totals.total_videos, 2);
    assert_eq!(totals.videos_publiees, 1);
    assert_eq!(totals.duree_totale_secondes, 120);
    assert_eq!(totals.taille_totale, 2048);

    let langues = VideoRepo::count_by_langue(&pool).await.unwrap();
    assert_eq!(langues.len(), 1);
    assert_eq!(langues[0].key, "FR");
    assert_eq!(langues[0].count, 2);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_unique_slug_appends_suffix(pool: PgPool) {
    RoomRepo::create(&pool, &new_room("Salle Ibn Sina", "salle-ibn-sina", 1))
        .await
        .unwrap();

    let slug = SlugRepo::unique_slug(&pool, SlugTable::Rooms, "Salle Ibn Sina", None)
        .await
        .unwrap();
    assert_eq!(slug, "salle-ibn-sina-1");

    let dup = RoomRepo::create(&pool, &new_room("Salle Ibn Sina", &slug, 2)).await.unwrap();
    let next = SlugRepo::unique_slug(&pool, SlugTable::Rooms, "Salle Ibn Sina", None)
        .await
        .unwrap();
    assert_eq!(next, "salle-ibn-sina-2");

    // A row keeps its own slug when renamed to the same text.
    let own = SlugRepo::unique_slug(&pool, SlugTable::Rooms, "Salle Ibn Sina 1", Some(dup.id))
        .await
        .unwrap();
    assert_eq!(own, "salle-ibn-sina-1");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_duplicate_slug_violates_named_constraint(pool: PgPool) {
    RoomRepo::create(&pool, &new_room("A", "dup", 1)).await.unwrap();
    let err = RoomRepo::create(&pool, &new_room("B", "dup", 2)).await.unwrap_err();
    let db_err = err.as_database_error().unwrap();
    assert_eq!(db_err.code().as_deref(), Some("23505"));
    assert_eq!(db_err.constraint(), Some("uq_rooms_slug"));
}
