//! HTTP-level tests for participant submissions: communication videos,
//! e-posters, documents and the newsletter.

mod common;

use std::sync::Arc;

use axum::http::{Method, StatusCode};
use common::{
    delete_auth, expect_json, get, get_auth, post_empty, post_json, post_json_auth,
    post_multipart, put_auth, send_multipart, Multipart, RejectingStore,
};
use smcd_cloud::MediaKind;
use smcd_db::repositories::NewsletterRepo;
use sqlx::PgPool;

fn author_form() -> Multipart {
    Multipart::new()
        .text("nom_auteur", "Alaoui")
        .text("prenom_auteur", "Amina")
        .text("email_auteur", "amina@example.ma")
        .text("titre", "Hépatectomie droite")
        .text("rubrique", "CHIRURGIE_HEPATO_BILIAIRE")
}

// ---------------------------------------------------------------------------
// Communication videos
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn video_link_submission_waits_for_moderation(pool: PgPool) {
    let token = common::moderator_token(&pool).await;
    let app = common::build_test_app(pool);

    let body = serde_json::json!({
        "nom_auteur": "Alaoui",
        "prenom_auteur": "Amina",
        "email_auteur": "amina@example.ma",
        "titre": "Cholécystectomie difficile",
        "video_url": "https://cdn.example.ma/cholecystectomie.webm",
    });
    let created = expect_json(
        post_json(app.clone(), "/api/videos/upload-url", body).await,
        StatusCode::CREATED,
    )
    .await;
    let video = &created["data"];
    assert_eq!(video["statut"], "EN_ATTENTE");
    assert_eq!(video["taille_fichier"], 0);
    assert_eq!(video["format"], "WebM");

    let public = expect_json(get(app.clone(), "/api/videos/public").await, StatusCode::OK).await;
    assert!(public["data"].as_array().unwrap().is_empty());

    let approved = post_json_auth(
        app.clone(),
        &format!("/api/videos/admin/{}/approuver", video["id"]),
        serde_json::json!({ "commentaires": "Validée" }),
        &token,
    )
    .await;
    let json = expect_json(approved, StatusCode::OK).await;
    assert_eq!(json["data"]["statut"], "APPROUVE");
    assert_eq!(json["data"]["commentaires_admin"], "Validée");

    let public = expect_json(get(app, "/api/videos/public").await, StatusCode::OK).await;
    assert_eq!(public["data"].as_array().unwrap().len(), 1);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn video_link_submission_requires_a_url(pool: PgPool) {
    let app = common::build_test_app(pool);

    let body = serde_json::json!({
        "nom_auteur": "Alaoui",
        "prenom_auteur": "Amina",
        "email_auteur": "amina@example.ma",
        "titre": "Sans lien",
        "video_url": "  ",
    });
    let json = expect_json(
        post_json(app, "/api/videos/upload-url", body).await,
        StatusCode::BAD_REQUEST,
    )
    .await;
    assert_eq!(json["error"], "L'URL de la vidéo est requise");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn video_file_submission_and_rejection_without_body(pool: PgPool) {
    let token = common::moderator_token(&pool).await;
    let app = common::build_test_app(pool);

    let form = author_form().file("file", "cas.mp4", "video/mp4", b"fake mp4 bytes");
    let created = expect_json(
        post_multipart(app.clone(), "/api/videos/upload", form, None).await,
        StatusCode::CREATED,
    )
    .await;
    let id = created["data"]["id"].clone();
    assert_eq!(created["data"]["taille_fichier"], 14);

    let anonymous = post_empty(app.clone(), &format!("/api/videos/admin/{id}/rejeter")).await;
    assert_eq!(anonymous.status(), StatusCode::UNAUTHORIZED);

    let rejected = post_json_auth(
        app.clone(),
        &format!("/api/videos/admin/{id}/rejeter"),
        serde_json::json!({}),
        &token,
    )
    .await;
    let json = expect_json(rejected, StatusCode::OK).await;
    assert_eq!(json["data"]["statut"], "REJETE");
    assert!(json["data"]["commentaires_admin"].is_null());

    let views = post_empty(app.clone(), &format!("/api/videos/{id}/incrementer-vues")).await;
    assert_eq!(views.status(), StatusCode::OK);

    let deleted = delete_auth(app.clone(), &format!("/api/videos/admin/{id}"), &token).await;
    assert_eq!(deleted.status(), StatusCode::NO_CONTENT);

    let missing = post_empty(app, &format!("/api/videos/{id}/incrementer-vues")).await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// E-posters
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn eposter_must_be_a_presentation(pool: PgPool) {
    let app = common::build_test_app(pool);

    let form = author_form().file("file", "poster.pdf", "application/pdf", b"%PDF-1.4");
    let response = post_multipart(app, "/api/eposters/upload", form, None).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn eposter_lifecycle(pool: PgPool) {
    let token = common::moderator_token(&pool).await;
    let app = common::build_test_app(pool);

    let form = author_form().file(
        "file",
        "poster.pptx",
        "application/vnd.openxmlformats-officedocument.presentationml.presentation",
        b"PK fake pptx",
    );
    let created = expect_json(
        post_multipart(app.clone(), "/api/eposters/upload", form, None).await,
        StatusCode::CREATED,
    )
    .await;
    let id = created["data"]["id"].clone();
    assert_eq!(created["data"]["statut"], "EN_ATTENTE");
    assert_eq!(created["data"]["nom_fichier_original"], "poster.pptx");

    // Pending e-posters are not public.
    let hidden = get(app.clone(), &format!("/api/eposters/public/{id}")).await;
    assert_eq!(hidden.status(), StatusCode::NOT_FOUND);

    let approved = put_auth(app.clone(), &format!("/api/eposters/{id}/approve"), &token).await;
    assert_eq!(approved.status(), StatusCode::OK);

    let shown = expect_json(
        get(app.clone(), &format!("/api/eposters/public/{id}")).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(shown["data"]["nombre_vues"], 1);

    let link = expect_json(
        get(app.clone(), &format!("/api/eposters/{id}/download")).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(link["data"]["nom_fichier"], "poster.pptx");

    let stats = expect_json(
        get_auth(app, "/api/eposters/stats", &token).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(stats["data"]["total"], 1);
    assert_eq!(stats["data"]["approuves"], 1);
    assert_eq!(stats["data"]["par_annee"]["2026"], 1);
    assert_eq!(stats["data"]["par_rubrique"]["Chirurgie hépato-biliaire"], 1);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn eposter_rejection_records_the_reason(pool: PgPool) {
    let token = common::moderator_token(&pool).await;
    let app = common::build_test_app(pool);

    let form = author_form().file("file", "poster.ppt", "application/vnd.ms-powerpoint", b"ppt");
    let created = expect_json(
        post_multipart(app.clone(), "/api/eposters/upload", form, None).await,
        StatusCode::CREATED,
    )
    .await;
    let id = created["data"]["id"].clone();

    let response = common::put_json_auth(
        app.clone(),
        &format!("/api/eposters/{id}/reject"),
        serde_json::json!({ "raison": "Hors thème" }),
        &token,
    )
    .await;
    let json = expect_json(response, StatusCode::OK).await;
    assert_eq!(json["data"]["statut"], "REJETE");
    assert_eq!(json["data"]["commentaires_admin"], "Hors thème");

    let listed = expect_json(
        get_auth(app, "/api/eposters/admin?statut=REJETE", &token).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(listed["data"].as_array().unwrap().len(), 1);
}

// ---------------------------------------------------------------------------
// Documents
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn document_upload_defaults_and_download_count(pool: PgPool) {
    let token = common::moderator_token(&pool).await;
    let app = common::build_test_app(pool);

    let form = Multipart::new()
        .text("titre", "Programme scientifique")
        .text("type", "PROGRAMME")
        .file("file", "programme.pdf", "application/pdf", b"%PDF-1.4 programme");
    let created = expect_json(
        post_multipart(app.clone(), "/api/documents/upload", form, Some(&token)).await,
        StatusCode::CREATED,
    )
    .await;
    let doc = &created["data"];
    assert_eq!(doc["slug"], "programme-scientifique");
    assert_eq!(doc["type_document"], "PROGRAMME");
    assert_eq!(doc["visibilite"], "PUBLIC");
    assert_eq!(doc["langue"], "FR");
    assert_eq!(doc["publie"], true);
    assert_eq!(doc["format_fichier"], "PDF");

    let public = expect_json(
        get(app.clone(), "/api/documents/public?type=PROGRAMME").await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(public["data"].as_array().unwrap().len(), 1);

    let id = doc["id"].clone();
    let link = expect_json(
        get(app.clone(), &format!("/api/documents/{id}/download")).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(link["data"]["nom_fichier"], "programme.pdf");

    let fetched = expect_json(
        get(app, &format!("/api/documents/{id}")).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(fetched["data"]["nombre_telechargements"], 1);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn unpublished_documents_are_not_public(pool: PgPool) {
    let token = common::moderator_token(&pool).await;
    let app = common::build_test_app(pool);

    let form = Multipart::new()
        .text("titre", "Brouillon")
        .text("publie", "false")
        .file("file", "brouillon.docx", "application/octet-stream", b"docx");
    let created = expect_json(
        post_multipart(app.clone(), "/api/documents/upload", form, Some(&token)).await,
        StatusCode::CREATED,
    )
    .await;
    assert_eq!(created["data"]["type_document"], "AUTRE");

    let public = expect_json(get(app.clone(), "/api/documents/public").await, StatusCode::OK).await;
    assert!(public["data"].as_array().unwrap().is_empty());

    // Publishing via a partial update.
    let form = Multipart::new().text("publie", "true");
    let response = send_multipart(
        app.clone(),
        Method::PUT,
        &format!("/api/documents/{}", created["data"]["id"]),
        form,
        Some(&token),
    )
    .await;
    let json = expect_json(response, StatusCode::OK).await;
    assert_eq!(json["data"]["publie"], true);
    assert_eq!(json["data"]["titre"], "Brouillon");

    let public = expect_json(get(app, "/api/documents/public").await, StatusCode::OK).await;
    assert_eq!(public["data"].as_array().unwrap().len(), 1);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn document_file_replacement_updates_metadata(pool: PgPool) {
    let token = common::moderator_token(&pool).await;
    let app = common::build_test_app(pool);

    let form = Multipart::new()
        .text("titre", "Programme scientifique")
        .file("file", "programme.pdf", "application/pdf", b"%PDF-1.4 programme");
    let created = expect_json(
        post_multipart(app.clone(), "/api/documents/upload", form, Some(&token)).await,
        StatusCode::CREATED,
    )
    .await;

    let form = Multipart::new()
        .text("titre", "Programme définitif")
        .file("file", "programme-final.docx", "application/octet-stream", b"docx final");
    let response = send_multipart(
        app,
        Method::PUT,
        &format!("/api/documents/{}", created["data"]["id"]),
        form,
        Some(&token),
    )
    .await;
    let json = expect_json(response, StatusCode::OK).await;
    assert_eq!(json["data"]["slug"], "programme-definitif");
    assert_eq!(json["data"]["nom_fichier_original"], "programme-final.docx");
    assert_eq!(json["data"]["format_fichier"], "DOCX");
    assert_eq!(json["data"]["taille_fichier"], 10);
    assert_ne!(json["data"]["fichier_url"], created["data"]["fichier_url"]);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn failed_file_upload_leaves_the_document_untouched(pool: PgPool) {
    let token = common::moderator_token(&pool).await;
    let app = common::build_test_app(pool.clone());

    let form = Multipart::new()
        .text("titre", "Programme scientifique")
        .file("file", "programme.pdf", "application/pdf", b"%PDF-1.4 programme");
    let created = expect_json(
        post_multipart(app.clone(), "/api/documents/upload", form, Some(&token)).await,
        StatusCode::CREATED,
    )
    .await;
    let uri = format!("/api/documents/{}", created["data"]["id"]);

    let failing =
        common::build_test_app_with_media(pool, Arc::new(RejectingStore::new(MediaKind::Raw)));
    let form = Multipart::new()
        .text("titre", "Programme définitif")
        .text("publie", "false")
        .file("file", "programme-final.pdf", "application/pdf", b"%PDF-1.4 final");
    let response = send_multipart(failing, Method::PUT, &uri, form, Some(&token)).await;
    let json = expect_json(response, StatusCode::INTERNAL_SERVER_ERROR).await;
    assert_eq!(json["code"], "MEDIA_ERROR");

    let stored = expect_json(get(app, &uri).await, StatusCode::OK).await;
    assert_eq!(stored["data"]["titre"], "Programme scientifique");
    assert_eq!(stored["data"]["slug"], "programme-scientifique");
    assert_eq!(stored["data"]["publie"], true);
    assert_eq!(stored["data"]["fichier_url"], created["data"]["fichier_url"]);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn document_types_are_listed(pool: PgPool) {
    let app = common::build_test_app(pool);

    let json = expect_json(get(app, "/api/documents/types").await, StatusCode::OK).await;
    let types = json["data"].as_array().unwrap();
    assert_eq!(types.len(), 8);
    assert!(types.iter().any(|t| t["value"] == "LIVRE_RESUMES"));
}

// ---------------------------------------------------------------------------
// Newsletter
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn newsletter_subscription_lifecycle(pool: PgPool) {
    let token = common::moderator_token(&pool).await;
    let app = common::build_test_app(pool.clone());
    let body = serde_json::json!({ "email": "lecteur@example.ma", "origine": "footer" });

    let created = post_json(app.clone(), "/api/newsletter/subscribe", body.clone()).await;
    assert_eq!(created.status(), StatusCode::CREATED);

    let duplicate = post_json(app.clone(), "/api/newsletter/subscribe", body.clone()).await;
    assert_eq!(duplicate.status(), StatusCode::CONFLICT);

    let subscriber = NewsletterRepo::find_by_email(&pool, "lecteur@example.ma")
        .await
        .unwrap()
        .expect("subscriber row");
    let unsubscribed = get(
        app.clone(),
        &format!("/api/newsletter/unsubscribe/{}", subscriber.token_desinscription),
    )
    .await;
    assert_eq!(unsubscribed.status(), StatusCode::OK);

    let stats = expect_json(
        get_auth(app.clone(), "/api/newsletter/stats", &token).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(stats["data"]["total_actifs"], 0);

    let reactivated = post_json(app.clone(), "/api/newsletter/subscribe", body).await;
    let json = expect_json(reactivated, StatusCode::OK).await;
    assert_eq!(json["message"], "Votre inscription a été réactivée");

    let listed = expect_json(
        get_auth(app, "/api/newsletter/subscribers", &token).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(listed["data"][0]["email"], "lecteur@example.ma");
    assert!(listed["data"][0].get("token_desinscription").is_none());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn unknown_unsubscribe_token_is_not_found(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/api/newsletter/unsubscribe/inconnu").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
