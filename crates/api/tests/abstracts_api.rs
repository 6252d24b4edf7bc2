//! HTTP-level tests for abstract submission and review.

mod common;

use axum::http::StatusCode;
use common::{delete_auth, expect_json, get, get_auth, post_json, put_json_auth};
use sqlx::PgPool;

fn paragraph(topic: &str) -> String {
    format!("{topic} : texte suffisamment long pour satisfaire la longueur minimale exigée.")
}

fn submission(email: &str, rubrique: &str) -> serde_json::Value {
    serde_json::json!({
        "nom": "Alaoui",
        "prenom": "Amina",
        "email": email,
        "auteurs": "A. Alaoui, K. Bennani",
        "affiliation": "CHU Ibn Rochd, Casablanca",
        "type": "COMMUNICATION_ORALE",
        "rubrique": rubrique,
        "titre": "Résection colique laparoscopique",
        "mots_cles": "côlon, laparoscopie",
        "introduction": paragraph("Introduction"),
        "materiel_methodes": paragraph("Méthodes"),
        "resultats": paragraph("Résultats"),
        "discussion": paragraph("Discussion"),
        "conclusion": paragraph("Conclusion"),
        "references": "",
    })
}

async fn submit(app: axum::Router, email: &str, rubrique: &str) -> serde_json::Value {
    let response = post_json(app, "/api/abstracts/submit", submission(email, rubrique)).await;
    expect_json(response, StatusCode::CREATED).await["data"].clone()
}

// ---------------------------------------------------------------------------
// Public
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn submission_gets_a_sequential_reference(pool: PgPool) {
    let app = common::build_test_app(pool);

    let first = submit(app.clone(), "Amina@Example.ma", "CHIRURGIE_COLORECTALE").await;
    let second = submit(app, "karim@example.ma", "CHIRURGIE_BARIATRIQUE").await;

    assert_eq!(first["numero_reference"], "SMCD2026-001");
    assert_eq!(second["numero_reference"], "SMCD2026-002");
    assert_eq!(first["email"], "amina@example.ma");
    assert_eq!(first["statut"], "EN_ATTENTE");
    assert_eq!(first["statut_label"], "En attente de révision");
    assert_eq!(first["rubrique_label"], "Chirurgie colorectale");
    assert!(first["bibliography"].is_null(), "blank references are stored as null");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn submission_stores_a_word_export(pool: PgPool) {
    let app = common::build_test_app(pool);

    let data = submit(app, "amina@example.ma", "CHIRURGIE_COLORECTALE").await;
    let url = data["word_file_url"].as_str().expect("word export url");
    assert!(url.ends_with(".docx"), "unexpected url {url}");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn short_sections_are_rejected(pool: PgPool) {
    let app = common::build_test_app(pool);

    let mut body = submission("amina@example.ma", "CHIRURGIE_COLORECTALE");
    body["introduction"] = serde_json::json!("Trop court");
    let json = expect_json(
        post_json(app, "/api/abstracts/submit", body).await,
        StatusCode::BAD_REQUEST,
    )
    .await;
    assert_eq!(
        json["errors"]["introduction"],
        "L'introduction doit contenir au moins 50 caractères"
    );
}

#[sqlx::test(migrations = "../db/migrations")]
async fn unknown_rubrique_is_rejected(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = post_json(
        app,
        "/api/abstracts/submit",
        submission("amina@example.ma", "CARDIOLOGIE"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn lookup_by_reference(pool: PgPool) {
    let app = common::build_test_app(pool);
    submit(app.clone(), "amina@example.ma", "CHIRURGIE_COLORECTALE").await;

    let found = get(app.clone(), "/api/abstracts/reference/SMCD2026-001").await;
    let json = expect_json(found, StatusCode::OK).await;
    assert_eq!(json["data"]["titre"], "Résection colique laparoscopique");

    let missing = get(app, "/api/abstracts/reference/SMCD2026-999").await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn options_list_every_catalog(pool: PgPool) {
    let app = common::build_test_app(pool);

    let json = expect_json(get(app, "/api/abstracts/options").await, StatusCode::OK).await;
    let rubriques = json["data"]["rubriques"].as_array().unwrap();
    assert_eq!(rubriques.len(), 10);
    assert_eq!(json["data"]["types"].as_array().unwrap().len(), 3);
    assert_eq!(json["data"]["statuts"].as_array().unwrap().len(), 4);
    assert!(rubriques
        .iter()
        .any(|o| o["value"] == "CHIRURGIE_ROBOTIQUE" && o["label"] == "Chirurgie robotique"));
}

// ---------------------------------------------------------------------------
// Staff
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn listing_requires_staff(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/api/abstracts").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn listing_filters_and_paginates(pool: PgPool) {
    let token = common::moderator_token(&pool).await;
    let app = common::build_test_app(pool);
    submit(app.clone(), "a@example.ma", "CHIRURGIE_COLORECTALE").await;
    submit(app.clone(), "b@example.ma", "CHIRURGIE_COLORECTALE").await;
    submit(app.clone(), "c@example.ma", "CHIRURGIE_BARIATRIQUE").await;

    let all = get_auth(app.clone(), "/api/abstracts?limit=2", &token).await;
    let json = expect_json(all, StatusCode::OK).await;
    assert_eq!(json["data"]["total"], 3);
    assert_eq!(json["data"]["items"].as_array().unwrap().len(), 2);

    let filtered = get_auth(
        app,
        "/api/abstracts?rubrique=CHIRURGIE_BARIATRIQUE",
        &token,
    )
    .await;
    let json = expect_json(filtered, StatusCode::OK).await;
    assert_eq!(json["data"]["total"], 1);
    assert_eq!(json["data"]["items"][0]["email"], "c@example.ma");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn status_update_and_stats(pool: PgPool) {
    let token = common::moderator_token(&pool).await;
    let app = common::build_test_app(pool);
    let first = submit(app.clone(), "a@example.ma", "CHIRURGIE_COLORECTALE").await;
    submit(app.clone(), "b@example.ma", "CHIRURGIE_BARIATRIQUE").await;
    let id = first["id"].as_i64().unwrap();

    let response = put_json_auth(
        app.clone(),
        &format!("/api/abstracts/{id}/status"),
        serde_json::json!({ "statut": "ACCEPTE", "commentaires": "Très bon travail" }),
        &token,
    )
    .await;
    let json = expect_json(response, StatusCode::OK).await;
    assert_eq!(json["data"]["statut"], "ACCEPTE");
    assert_eq!(json["data"]["commentaires_comite"], "Très bon travail");

    let stats = expect_json(
        get_auth(app, "/api/abstracts/stats", &token).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(stats["data"]["total"], 2);
    assert_eq!(stats["data"]["acceptes"], 1);
    assert_eq!(stats["data"]["en_attente"], 1);
    assert_eq!(stats["data"]["par_rubrique"]["Chirurgie colorectale"], 1);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn new_decision_without_comment_clears_the_previous_one(pool: PgPool) {
    let token = common::moderator_token(&pool).await;
    let app = common::build_test_app(pool);
    let first = submit(app.clone(), "a@example.ma", "CHIRURGIE_COLORECTALE").await;
    let uri = format!("/api/abstracts/{}/status", first["id"]);

    let revision = put_json_auth(
        app.clone(),
        &uri,
        serde_json::json!({
            "statut": "EN_REVISION",
            "commentaires": "Préciser la méthodologie",
        }),
        &token,
    )
    .await;
    let json = expect_json(revision, StatusCode::OK).await;
    assert_eq!(json["data"]["commentaires_comite"], "Préciser la méthodologie");

    let accepted = put_json_auth(
        app,
        &uri,
        serde_json::json!({ "statut": "ACCEPTE" }),
        &token,
    )
    .await;
    let json = expect_json(accepted, StatusCode::OK).await;
    assert_eq!(json["data"]["statut"], "ACCEPTE");
    assert!(json["data"]["commentaires_comite"].is_null());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn export_returns_every_matching_live_abstract(pool: PgPool) {
    let moderator = common::moderator_token(&pool).await;
    let admin = common::admin_token(&pool).await;
    let app = common::build_test_app(pool);
    submit(app.clone(), "a@example.ma", "CHIRURGIE_COLORECTALE").await;
    let removed = submit(app.clone(), "b@example.ma", "CHIRURGIE_COLORECTALE").await;
    submit(app.clone(), "c@example.ma", "CHIRURGIE_BARIATRIQUE").await;

    let removed_uri = format!("/api/abstracts/{}", removed["id"]);
    let deleted = delete_auth(app.clone(), &removed_uri, &admin).await;
    assert_eq!(deleted.status(), StatusCode::NO_CONTENT);

    let anonymous = get(app.clone(), "/api/abstracts/export").await;
    assert_eq!(anonymous.status(), StatusCode::UNAUTHORIZED);

    let all = expect_json(
        get_auth(app.clone(), "/api/abstracts/export", &moderator).await,
        StatusCode::OK,
    )
    .await;
    let emails: Vec<&str> = all["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|row| row["email"].as_str().unwrap())
        .collect();
    assert_eq!(emails.len(), 2);
    assert!(!emails.contains(&"b@example.ma"));

    let filtered = expect_json(
        get_auth(
            app,
            "/api/abstracts/export?rubrique=CHIRURGIE_COLORECTALE",
            &moderator,
        )
        .await,
        StatusCode::OK,
    )
    .await;
    let rows = filtered["data"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["email"], "a@example.ma");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn invalid_status_is_rejected(pool: PgPool) {
    let token = common::moderator_token(&pool).await;
    let app = common::build_test_app(pool);
    let first = submit(app.clone(), "a@example.ma", "CHIRURGIE_COLORECTALE").await;
    let id = first["id"].as_i64().unwrap();

    let response = put_json_auth(
        app,
        &format!("/api/abstracts/{id}/status"),
        serde_json::json!({ "statut": "PUBLIE" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn deletion_is_super_admin_only_and_hides_the_abstract(pool: PgPool) {
    let moderator = common::moderator_token(&pool).await;
    let admin = common::admin_token(&pool).await;
    let app = common::build_test_app(pool);
    let first = submit(app.clone(), "a@example.ma", "CHIRURGIE_COLORECTALE").await;
    let uri = format!("/api/abstracts/{}", first["id"]);

    let forbidden = delete_auth(app.clone(), &uri, &moderator).await;
    assert_eq!(forbidden.status(), StatusCode::FORBIDDEN);

    let deleted = delete_auth(app.clone(), &uri, &admin).await;
    assert_eq!(deleted.status(), StatusCode::NO_CONTENT);

    let gone = get_auth(app.clone(), &uri, &admin).await;
    assert_eq!(gone.status(), StatusCode::NOT_FOUND);

    let again = delete_auth(app, &uri, &admin).await;
    assert_eq!(again.status(), StatusCode::NOT_FOUND);
}
