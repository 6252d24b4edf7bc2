//! HTTP-level tests for the congress directory: speakers, sponsors,
//! archives, static content and public information.

mod common;

use std::sync::Arc;

use axum::http::{Method, StatusCode};
use common::{
    delete_auth, expect_json, get, get_auth, post_empty, post_json, post_multipart,
    send_multipart, Multipart, RejectingStore,
};
use smcd_cloud::MediaKind;
use sqlx::PgPool;

const PNG: &[u8] = b"\x89PNG\r\n\x1a\nfake";

async fn create_speaker(
    app: axum::Router,
    token: &str,
    nom: &str,
    extra: &[(&str, &str)],
) -> serde_json::Value {
    let mut form = Multipart::new().text("nom", nom).text("prenom", "Youssef");
    for (name, value) in extra {
        form = form.text(name, value);
    }
    let form = form.file("photo", "portrait.png", "image/png", PNG);
    let response = post_multipart(app, "/api/speakers", form, Some(token)).await;
    expect_json(response, StatusCode::CREATED).await["data"].clone()
}

async fn create_sponsor(
    app: axum::Router,
    token: &str,
    nom: &str,
    niveau: &str,
) -> serde_json::Value {
    let form = Multipart::new()
        .text("nom", nom)
        .text("niveau", niveau)
        .file("logo", "logo.png", "image/png", PNG);
    let response = post_multipart(app, "/api/sponsors", form, Some(token)).await;
    expect_json(response, StatusCode::CREATED).await["data"].clone()
}

// ---------------------------------------------------------------------------
// Speakers
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn speaker_creation_fills_derived_fields(pool: PgPool) {
    let token = common::moderator_token(&pool).await;
    let app = common::build_test_app(pool);

    let first = create_speaker(
        app.clone(),
        &token,
        "Tazi",
        &[("titre", "Pr"), ("ville", "Rabat"), ("pays", "Maroc")],
    )
    .await;
    let second = create_speaker(app, &token, "Idrissi", &[]).await;

    assert_eq!(first["nom_complet"], "Pr Youssef Tazi");
    assert_eq!(first["localisation"], "Rabat, Maroc");
    assert_eq!(first["annee"], 2026);
    assert_eq!(first["ordre"], 1);
    assert_eq!(second["ordre"], 2);
    assert!(first["photo_url"].as_str().unwrap().contains("/speakers/photos/"));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn speaker_requires_a_photo(pool: PgPool) {
    let token = common::moderator_token(&pool).await;
    let app = common::build_test_app(pool);

    let form = Multipart::new().text("nom", "Tazi").text("prenom", "Youssef");
    let json = expect_json(
        post_multipart(app, "/api/speakers", form, Some(&token)).await,
        StatusCode::BAD_REQUEST,
    )
    .await;
    assert_eq!(json["error"], "La photo est obligatoire");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn featured_filter_and_president(pool: PgPool) {
    let token = common::moderator_token(&pool).await;
    let app = common::build_test_app(pool);

    create_speaker(app.clone(), &token, "Tazi", &[("featured", "true")]).await;
    create_speaker(
        app.clone(),
        &token,
        "Berrada",
        &[("is_president", "true"), ("message_president", "Bienvenue")],
    )
    .await;

    let all = expect_json(get(app.clone(), "/api/speakers").await, StatusCode::OK).await;
    assert_eq!(all["data"].as_array().unwrap().len(), 2);

    let featured = expect_json(
        get(app.clone(), "/api/speakers?featured=true").await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(featured["data"].as_array().unwrap().len(), 1);
    assert_eq!(featured["data"][0]["nom"], "Tazi");

    let president = expect_json(
        get(app.clone(), "/api/speakers/president").await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(president["data"]["message_president"], "Bienvenue");

    let none = get(app, "/api/speakers/president?annee=2019").await;
    assert_eq!(none.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn speaker_partial_update_keeps_other_fields(pool: PgPool) {
    let token = common::moderator_token(&pool).await;
    let app = common::build_test_app(pool);
    let speaker = create_speaker(app.clone(), &token, "Tazi", &[("pays", "Maroc")]).await;

    let form = Multipart::new().text("institution", "CHU Avicenne");
    let response = send_multipart(
        app.clone(),
        Method::PUT,
        &format!("/api/speakers/{}", speaker["id"]),
        form,
        Some(&token),
    )
    .await;
    let json = expect_json(response, StatusCode::OK).await;
    assert_eq!(json["data"]["institution"], "CHU Avicenne");
    assert_eq!(json["data"]["pays"], "Maroc");
    assert_eq!(json["data"]["photo_url"], speaker["photo_url"]);

    let filters = expect_json(get(app, "/api/speakers/filters").await, StatusCode::OK).await;
    assert_eq!(filters["data"]["pays"], serde_json::json!(["Maroc"]));
    assert_eq!(filters["data"]["annees"], serde_json::json!([2026]));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn failed_cv_upload_leaves_the_speaker_untouched(pool: PgPool) {
    let token = common::moderator_token(&pool).await;
    let app = common::build_test_app(pool.clone());
    let speaker =
        create_speaker(app.clone(), &token, "Tazi", &[("institution", "CHU Ibn Sina")]).await;
    let uri = format!("/api/speakers/{}", speaker["id"]);

    let failing =
        common::build_test_app_with_media(pool, Arc::new(RejectingStore::new(MediaKind::Raw)));
    let form = Multipart::new()
        .text("institution", "CHU Avicenne")
        .file("photo", "nouveau.png", "image/png", PNG)
        .file("cv", "cv.pdf", "application/pdf", b"%PDF-1.4 cv");
    let response = send_multipart(failing, Method::PUT, &uri, form, Some(&token)).await;
    let json = expect_json(response, StatusCode::INTERNAL_SERVER_ERROR).await;
    assert_eq!(json["code"], "MEDIA_ERROR");

    let stored = expect_json(get(app, &uri).await, StatusCode::OK).await;
    assert_eq!(stored["data"]["institution"], "CHU Ibn Sina");
    assert_eq!(stored["data"]["photo_url"], speaker["photo_url"]);
    assert!(stored["data"]["cv_url"].is_null());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn speaker_reorder_and_delete(pool: PgPool) {
    let token = common::moderator_token(&pool).await;
    let app = common::build_test_app(pool);
    let a = create_speaker(app.clone(), &token, "Alami", &[]).await;
    let b = create_speaker(app.clone(), &token, "Bennis", &[]).await;

    let response = common::put_json_auth(
        app.clone(),
        "/api/speakers/reorder",
        serde_json::json!([b["id"], a["id"]]),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let listed = expect_json(get(app.clone(), "/api/speakers").await, StatusCode::OK).await;
    assert_eq!(listed["data"][0]["nom"], "Bennis");

    let uri = format!("/api/speakers/{}", a["id"]);
    let deleted = delete_auth(app.clone(), &uri, &token).await;
    assert_eq!(deleted.status(), StatusCode::NO_CONTENT);
    let gone = get(app.clone(), &uri).await;
    assert_eq!(gone.status(), StatusCode::NOT_FOUND);

    let stats = expect_json(
        get_auth(app, "/api/speakers/stats", &token).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(stats["data"]["total"], 1);
}

// ---------------------------------------------------------------------------
// Sponsors
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn public_sponsors_are_grouped_by_tier(pool: PgPool) {
    let token = common::moderator_token(&pool).await;
    let app = common::build_test_app(pool);

    create_sponsor(app.clone(), &token, "Laboratoire Atlas", "BRONZE").await;
    let platine = create_sponsor(app.clone(), &token, "MedTech Maroc", "PLATINE").await;
    assert_eq!(platine["slug"], "medtech-maroc");

    let json = expect_json(get(app, "/api/sponsors").await, StatusCode::OK).await;
    let tiers = json["data"].as_array().unwrap();
    assert_eq!(tiers.len(), 2);
    assert_eq!(tiers[0]["niveau"], "PLATINE");
    assert_eq!(tiers[0]["sponsors"][0]["nom"], "MedTech Maroc");
    assert_eq!(tiers[1]["niveau"], "BRONZE");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn inactive_sponsors_are_hidden(pool: PgPool) {
    let token = common::moderator_token(&pool).await;
    let app = common::build_test_app(pool);
    let sponsor = create_sponsor(app.clone(), &token, "Laboratoire Atlas", "OR").await;

    let form = Multipart::new().text("active", "false");
    let response = send_multipart(
        app.clone(),
        Method::PUT,
        &format!("/api/sponsors/{}", sponsor["id"]),
        form,
        Some(&token),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let public = expect_json(get(app.clone(), "/api/sponsors").await, StatusCode::OK).await;
    assert!(public["data"].as_array().unwrap().is_empty());

    let all = expect_json(
        get_auth(app, "/api/sponsors/all", &token).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(all["data"].as_array().unwrap().len(), 1);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn failed_logo_upload_leaves_the_sponsor_untouched(pool: PgPool) {
    let token = common::moderator_token(&pool).await;
    let app = common::build_test_app(pool.clone());
    let sponsor = create_sponsor(app.clone(), &token, "Laboratoire Atlas", "OR").await;
    let uri = format!("/api/sponsors/{}", sponsor["id"]);

    let failing =
        common::build_test_app_with_media(pool, Arc::new(RejectingStore::new(MediaKind::Image)));
    let form = Multipart::new()
        .text("nom", "Renamed Pharma")
        .file("logo", "nouveau.png", "image/png", PNG);
    let response = send_multipart(failing, Method::PUT, &uri, form, Some(&token)).await;
    let json = expect_json(response, StatusCode::INTERNAL_SERVER_ERROR).await;
    assert_eq!(json["code"], "MEDIA_ERROR");

    let stored = expect_json(get(app, &uri).await, StatusCode::OK).await;
    assert_eq!(stored["data"]["nom"], "Laboratoire Atlas");
    assert_eq!(stored["data"]["slug"], "laboratoire-atlas");
    assert_eq!(stored["data"]["logo_url"], sponsor["logo_url"]);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn sponsor_clicks_are_counted(pool: PgPool) {
    let token = common::moderator_token(&pool).await;
    let app = common::build_test_app(pool);
    let sponsor = create_sponsor(app.clone(), &token, "Laboratoire Atlas", "ARGENT").await;
    let id = sponsor["id"].clone();

    let clicked = post_empty(app.clone(), &format!("/api/sponsors/{id}/click")).await;
    assert_eq!(clicked.status(), StatusCode::OK);

    let json = expect_json(
        get(app.clone(), &format!("/api/sponsors/{id}")).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(json["data"]["nombre_clics"], 1);

    let missing = post_empty(app, "/api/sponsors/999999/click").await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn sponsor_tiers_are_listed(pool: PgPool) {
    let app = common::build_test_app(pool);

    let json = expect_json(get(app, "/api/sponsors/niveaux").await, StatusCode::OK).await;
    let tiers = json["data"].as_array().unwrap();
    assert_eq!(tiers.len(), 5);
    assert_eq!(tiers[0]["value"], "PLATINE");
    assert_eq!(tiers[1]["couleur"], "#FFD700");
}

// ---------------------------------------------------------------------------
// Archives
// ---------------------------------------------------------------------------

fn archive_form(annee: &str) -> Multipart {
    Multipart::new()
        .text("annee", annee)
        .text("theme", "Chirurgie mini-invasive")
        .text("lieu", "Marrakech")
        .text("date_debut", "2024-05-10")
}

#[sqlx::test(migrations = "../db/migrations")]
async fn archives_are_keyed_by_year(pool: PgPool) {
    let token = common::admin_token(&pool).await;
    let app = common::build_test_app(pool);

    let created = expect_json(
        post_multipart(app.clone(), "/api/archives", archive_form("2024"), Some(&token)).await,
        StatusCode::CREATED,
    )
    .await;
    assert_eq!(created["data"]["date_debut"], "2024-05-10");

    let duplicate =
        post_multipart(app.clone(), "/api/archives", archive_form("2024"), Some(&token)).await;
    assert_eq!(duplicate.status(), StatusCode::CONFLICT);

    let found = expect_json(get(app.clone(), "/api/archives/2024").await, StatusCode::OK).await;
    assert_eq!(found["data"]["lieu"], "Marrakech");

    let missing = get(app, "/api/archives/2010").await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn archive_update_keeps_required_fields(pool: PgPool) {
    let token = common::admin_token(&pool).await;
    let app = common::build_test_app(pool);
    let created = expect_json(
        post_multipart(app.clone(), "/api/archives", archive_form("2023"), Some(&token)).await,
        StatusCode::CREATED,
    )
    .await;
    let id = created["data"]["id"].clone();

    let form = Multipart::new().text("nombre_participants", "850");
    let response = send_multipart(
        app.clone(),
        Method::PUT,
        &format!("/api/archives/{id}"),
        form,
        Some(&token),
    )
    .await;
    let json = expect_json(response, StatusCode::OK).await;
    assert_eq!(json["data"]["nombre_participants"], 850);
    assert_eq!(json["data"]["theme"], "Chirurgie mini-invasive");
    assert_eq!(json["data"]["annee"], 2023);

    let deleted = delete_auth(app, &format!("/api/archives/{id}"), &token).await;
    assert_eq!(deleted.status(), StatusCode::NO_CONTENT);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn archive_management_is_super_admin_only(pool: PgPool) {
    let token = common::moderator_token(&pool).await;
    let app = common::build_test_app(pool);

    let response = post_multipart(app, "/api/archives", archive_form("2022"), Some(&token)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

// ---------------------------------------------------------------------------
// Static content
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn content_upsert_merges_fields(pool: PgPool) {
    let token = common::admin_token(&pool).await;
    let app = common::build_test_app(pool);

    let missing = get(app.clone(), "/api/contenu/apropos").await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);

    let form = Multipart::new()
        .text("titre_fr", "À propos")
        .text("contenu_fr", "La SMCD réunit les chirurgiens digestifs.");
    let created = send_multipart(
        app.clone(),
        Method::PUT,
        "/api/contenu/apropos",
        form,
        Some(&token),
    )
    .await;
    let json = expect_json(created, StatusCode::OK).await;
    assert_eq!(json["data"]["modifie_par"], "admin@test.ma");

    let form = Multipart::new().text("titre_en", "About");
    let updated = send_multipart(
        app.clone(),
        Method::PUT,
        "/api/contenu/apropos",
        form,
        Some(&token),
    )
    .await;
    let json = expect_json(updated, StatusCode::OK).await;
    assert_eq!(json["data"]["titre_fr"], "À propos");
    assert_eq!(json["data"]["titre_en"], "About");

    let listed = expect_json(get(app, "/api/contenu").await, StatusCode::OK).await;
    assert_eq!(listed["data"].as_array().unwrap().len(), 1);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn content_edit_requires_super_admin(pool: PgPool) {
    let token = common::moderator_token(&pool).await;
    let app = common::build_test_app(pool);

    let form = Multipart::new().text("titre_fr", "À propos");
    let response = send_multipart(app, Method::PUT, "/api/contenu/apropos", form, Some(&token)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

// ---------------------------------------------------------------------------
// Public information
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn congress_info_uses_configured_contact(pool: PgPool) {
    let app = common::build_test_app(pool);

    let json = expect_json(get(app, "/api/public/info").await, StatusCode::OK).await;
    assert_eq!(json["data"]["annee"], 2026);
    assert_eq!(json["data"]["contact"], "contact@smcd.ma");
    assert_eq!(json["data"]["soumissions_ouvertes"], true);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn contact_form_reports_missing_mailer(pool: PgPool) {
    let app = common::build_test_app(pool);
    let body = serde_json::json!({
        "nom": "Amina",
        "email": "amina@example.ma",
        "sujet": "Inscription",
        "message": "Bonjour, comment s'inscrire ?",
    });

    let json = expect_json(
        post_json(app, "/api/public/contact", body).await,
        StatusCode::INTERNAL_SERVER_ERROR,
    )
    .await;
    assert_eq!(json["error"], "Erreur lors de l'envoi du message");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn contact_form_validates_input(pool: PgPool) {
    let app = common::build_test_app(pool);
    let body = serde_json::json!({
        "nom": "Amina",
        "email": "pas-un-email",
        "sujet": "Inscription",
        "message": "Bonjour",
    });

    let json = expect_json(
        post_json(app, "/api/public/contact", body).await,
        StatusCode::BAD_REQUEST,
    )
    .await;
    assert_eq!(json["errors"]["email"], "Email invalide");
}
