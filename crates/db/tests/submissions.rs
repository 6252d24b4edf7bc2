//! Abstracts, e-posters and communication videos: reference numbers,
//! filtering, moderation and soft delete.

use sqlx::PgPool;
use smcd_core::reference::format_reference;
use smcd_db::models::abstract_submission::{AbstractFilter, CreateAbstract};
use smcd_db::models::communication_video::CreateCommunicationVideo;
use smcd_db::models::eposter::{CreateEposter, EposterFilter};
use smcd_db::models::newsletter::CreateSubscriber;
use smcd_db::repositories::{AbstractRepo, CommunicationVideoRepo, EposterRepo, NewsletterRepo};

fn new_abstract(reference: &str, nom: &str, rubrique: &str) -> CreateAbstract {
    CreateAbstract {
        nom: nom.to_string(),
        prenom: "Amina".to_string(),
        email: format!("{}@example.ma", nom.to_lowercase()),
        telephone: None,
        auteurs: "A. Auteur".to_string(),
        affiliation: "CHU Ibn Rochd".to_string(),
        type_communication: "COMMUNICATION_ORALE".to_string(),
        url_video: None,
        rubrique: rubrique.to_string(),
        titre: format!("Étude de {nom}"),
        mots_cles: None,
        introduction: "i".to_string(),
        materiel_methodes: "m".to_string(),
        resultats: "r".to_string(),
        discussion: "d".to_string(),
        conclusion: "c".to_string(),
        bibliography: None,
        numero_reference: reference.to_string(),
    }
}

async fn submit(pool: &PgPool, nom: &str, rubrique: &str) -> i64 {
    let n = AbstractRepo::next_reference_number(pool).await.unwrap();
    AbstractRepo::create(pool, &new_abstract(&format_reference(n), nom, rubrique))
        .await
        .unwrap()
        .id
}

fn new_eposter(titre: &str, rubrique: Option<&str>) -> CreateEposter {
    CreateEposter {
        nom_auteur: "Tazi".to_string(),
        prenom_auteur: "Karim".to_string(),
        email_auteur: "karim@example.ma".to_string(),
        titre: titre.to_string(),
        fichier_url: "https://cdn.example/poster.pptx".to_string(),
        fichier_public_id: Some("smcd-congress/eposters/2026/poster".to_string()),
        taille_fichier: 2048,
        nom_fichier_original: Some("poster.pptx".to_string()),
        rubrique: rubrique.map(str::to_string),
        annee: 2026,
    }
}

#[sqlx::test(migrations = "./migrations")]
async fn test_reference_numbers_are_sequential(pool: PgPool) {
    let a = AbstractRepo::next_reference_number(&pool).await.unwrap();
    let b = AbstractRepo::next_reference_number(&pool).await.unwrap();
    assert_eq!(b, a + 1);
    assert_eq!(format_reference(a), "SMCD2026-001");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_defaults_and_lookup_by_reference(pool: PgPool) {
    let id = submit(&pool, "Alaoui", "CHIRURGIE_COLORECTALE").await;
    let row = AbstractRepo::find_by_id(&pool, id).await.unwrap().unwrap();
    assert_eq!(row.statut, "EN_ATTENTE");
    assert!(row.date_revision.is_none());

    let found = AbstractRepo::find_by_reference(&pool, &row.numero_reference)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.id, id);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_filters_and_search(pool: PgPool) {
    submit(&pool, "Alaoui", "CHIRURGIE_COLORECTALE").await;
    let b = submit(&pool, "Bennani", "CHIRURGIE_PANCREATIQUE").await;
    submit(&pool, "Chraibi", "CHIRURGIE_COLORECTALE").await;
    AbstractRepo::update_status(&pool, b, "ACCEPTE", Some("Bravo")).await.unwrap();

    let by_rubrique = AbstractFilter {
        rubrique: Some("CHIRURGIE_COLORECTALE".to_string()),
        ..Default::default()
    };
    assert_eq!(AbstractRepo::count(&pool, &by_rubrique).await.unwrap(), 2);

    let by_statut = AbstractFilter {
        statut: Some("ACCEPTE".to_string()),
        ..Default::default()
    };
    let accepted = AbstractRepo::list(&pool, &by_statut, 20, 0).await.unwrap();
    assert_eq!(accepted.len(), 1);
    assert_eq!(accepted[0].commentaires_comite.as_deref(), Some("Bravo"));
    assert!(accepted[0].date_revision.is_some());

    let search = AbstractFilter {
        search: Some("%chraibi%".to_string()),
        ..Default::default()
    };
    let hits = AbstractRepo::list(&pool, &search, 20, 0).await.unwrap();
    assert_eq!(hits.len(), 1);

    let page = AbstractRepo::list(&pool, &AbstractFilter::default(), 2, 2).await.unwrap();
    assert_eq!(page.len(), 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_soft_delete_hides_everywhere(pool: PgPool) {
    let id = submit(&pool, "Alaoui", "CHIRURGIE_COLORECTALE").await;
    let reference = AbstractRepo::find_by_id(&pool, id)
        .await
        .unwrap()
        .unwrap()
        .numero_reference;

    assert!(AbstractRepo::soft_delete(&pool, id).await.unwrap());
    assert!(!AbstractRepo::soft_delete(&pool, id).await.unwrap());

    assert!(AbstractRepo::find_by_id(&pool, id).await.unwrap().is_none());
    assert!(AbstractRepo::find_by_reference(&pool, &reference).await.unwrap().is_none());
    assert_eq!(AbstractRepo::count(&pool, &AbstractFilter::default()).await.unwrap(), 0);
    assert!(AbstractRepo::count_by_statut(&pool).await.unwrap().is_empty());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_grouped_and_daily_counts(pool: PgPool) {
    submit(&pool, "Alaoui", "CHIRURGIE_COLORECTALE").await;
    submit(&pool, "Bennani", "CHIRURGIE_COLORECTALE").await;

    let by_rubrique = AbstractRepo::count_by_rubrique(&pool).await.unwrap();
    assert_eq!(by_rubrique.len(), 1);
    assert_eq!(by_rubrique[0].count, 2);

    let since = chrono::Utc::now() - chrono::Duration::days(30);
    let daily = AbstractRepo::daily_counts(&pool, since).await.unwrap();
    assert_eq!(daily.iter().map(|(_, n)| n).sum::<i64>(), 2);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_eposter_moderation_flow(pool: PgPool) {
    let p1 = EposterRepo::create(&pool, &new_eposter("P1", Some("CHIRURGIE_BARIATRIQUE")))
        .await
        .unwrap();
    let p2 = EposterRepo::create(&pool, &new_eposter("P2", None)).await.unwrap();
    assert_eq!(p1.statut, "EN_ATTENTE");
    assert!(EposterRepo::find_approved(&pool, p1.id).await.unwrap().is_none());

    let approved = EposterRepo::moderate(&pool, p1.id, "APPROUVE", Some("OK"))
        .await
        .unwrap()
        .unwrap();
    assert!(approved.date_validation.is_some());
    EposterRepo::moderate(&pool, p2.id, "REJETE", None).await.unwrap();

    let public = EposterRepo::list(
        &pool,
        &EposterFilter {
            statut: Some("APPROUVE".to_string()),
            annee: Some(2026),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(public.len(), 1);

    assert!(EposterRepo::increment_downloads(&pool, p1.id).await.unwrap());
    assert!(EposterRepo::increment_views(&pool, p1.id).await.unwrap());
    let p1 = EposterRepo::find_approved(&pool, p1.id).await.unwrap().unwrap();
    assert_eq!(p1.nombre_telechargements, 1);
    assert_eq!(p1.nombre_vues, 1);

    let totals = EposterRepo::totals(&pool).await.unwrap();
    assert_eq!(totals.total, 2);
    assert_eq!(totals.approuves, 1);
    assert_eq!(totals.rejetes, 1);
    assert_eq!(totals.en_attente, 0);
    assert_eq!(totals.taille_totale, 4096);

    let par_rubrique = EposterRepo::count_approved_by_rubrique(&pool).await.unwrap();
    assert_eq!(par_rubrique.len(), 1);
    assert_eq!(par_rubrique[0].key, "CHIRURGIE_BARIATRIQUE");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_communication_video_public_listing(pool: PgPool) {
    let input = CreateCommunicationVideo {
        nom_auteur: "Tazi".to_string(),
        prenom_auteur: "Karim".to_string(),
        email_auteur: "karim@example.ma".to_string(),
        titre: "Technique".to_string(),
        description: None,
        rubrique: None,
        video_url: "https://cdn.example/talk.mp4".to_string(),
        video_public_id: None,
        taille_fichier: 0,
        format: "MP4".to_string(),
        duree: None,
        annee: 2026,
    };
    let video = CommunicationVideoRepo::create(&pool, &input).await.unwrap();
    assert!(CommunicationVideoRepo::list_approved(&pool, None).await.unwrap().is_empty());

    CommunicationVideoRepo::moderate(&pool, video.id, "APPROUVE", None)
        .await
        .unwrap();
    assert_eq!(
        CommunicationVideoRepo::list_approved(&pool, Some(2026)).await.unwrap().len(),
        1
    );
    assert!(CommunicationVideoRepo::list_approved(&pool, Some(2025))
        .await
        .unwrap()
        .is_empty());

    assert!(CommunicationVideoRepo::increment_views(&pool, video.id).await.unwrap());
    assert!(!CommunicationVideoRepo::increment_views(&pool, 9999).await.unwrap());
    assert!(CommunicationVideoRepo::delete(&pool, video.id).await.unwrap());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_newsletter_unsubscribe_and_reactivate(pool: PgPool) {
    let input = CreateSubscriber {
        email: " Lecteur@Example.ma ".to_string(),
        nom: None,
        prenom: None,
        origine: Some("footer".to_string()),
    };
    let subscriber = NewsletterRepo::create(&pool, &input).await.unwrap();
    assert_eq!(subscriber.email, "lecteur@example.ma");
    assert!(subscriber.actif);

    // Email uniqueness is case-insensitive through the lowercased column.
    let duplicate = NewsletterRepo::create(&pool, &input).await;
    assert!(duplicate.is_err());

    let week_ago = chrono::Utc::now() - chrono::Duration::days(7);
    assert_eq!(NewsletterRepo::count_new_since(&pool, week_ago).await.unwrap(), 1);

    let gone = NewsletterRepo::unsubscribe(&pool, &subscriber.token_desinscription)
        .await
        .unwrap()
        .expect("known token");
    assert!(!gone.actif);
    assert!(gone.date_desinscription.is_some());
    assert_eq!(NewsletterRepo::count_active(&pool).await.unwrap(), 0);
    assert!(NewsletterRepo::unsubscribe(&pool, "inconnu").await.unwrap().is_none());

    let back = NewsletterRepo::reactivate(&pool, subscriber.id)
        .await
        .unwrap()
        .expect("existing subscriber");
    assert!(back.actif);
    assert_eq!(back.token_desinscription, subscriber.token_desinscription);
    assert_eq!(NewsletterRepo::list_active(&pool).await.unwrap().len(), 1);
}
