#![allow(dead_code)]

use std::sync::{Arc, LazyLock};

use axum::body::Body;
use axum::http::{Method, Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tempfile::TempDir;
use tower::ServiceExt;

use smcd_api::auth::jwt::{generate_access_token, JwtConfig};
use smcd_api::auth::password::hash_password;
use smcd_api::config::ServerConfig;
use smcd_api::router::build_app_router;
use smcd_api::state::AppState;
use async_trait::async_trait;
use smcd_cloud::{
    LocalStore, MediaConfig, MediaError, MediaFile, MediaKind, MediaStore, StoredMedia,
};
use smcd_core::roles::{ROLE_MODERATEUR, ROLE_SUPER_ADMIN};
use smcd_db::models::user::CreateUser;
use smcd_db::repositories::UserRepo;

/// Uploads from every test land in one scratch directory for the process.
static MEDIA_ROOT: LazyLock<TempDir> =
    LazyLock::new(|| TempDir::new().expect("temp media dir should be creatable"));

pub const MEDIA_PUBLIC_URL: &str = "/media";
pub const TEST_PASSWORD: &str = "test_password_123!";

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:3000` as CORS origin (matching the dev default)
/// and a 30-second request timeout.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3000".to_string()],
        request_timeout_secs: 30,
        max_upload_bytes: 10 * 1024 * 1024,
        frontend_url: "http://localhost:3000".to_string(),
        contact_email: "contact@smcd.ma".to_string(),
        admin_email: "admin@smcd.ma".to_string(),
        admin_password: "Admin123!".to_string(),
        jwt: JwtConfig {
            secret: "test-secret-do-not-use-in-production".to_string(),
            expiry_mins: 60,
        },
        media: MediaConfig::Local {
            root: MEDIA_ROOT.path().to_path_buf(),
            public_url: MEDIA_PUBLIC_URL.to_string(),
        },
    }
}

/// Build the full application router with the production middleware stack,
/// a local media store and no mailer.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with_media(pool, Arc::new(local_store()))
}

/// Same as [`build_test_app`] with a caller-supplied media store.
pub fn build_test_app_with_media(pool: PgPool, media: Arc<dyn MediaStore>) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        media,
        mailer: None,
    };
    build_app_router(state, &config)
}

pub fn local_store() -> LocalStore {
    LocalStore::new(MEDIA_ROOT.path(), MEDIA_PUBLIC_URL)
}

/// Local store that refuses every upload of one media kind, as an
/// unreachable media service would.
pub struct RejectingStore {
    inner: LocalStore,
    rejected: MediaKind,
}

impl RejectingStore {
    pub fn new(rejected: MediaKind) -> Self {
        Self {
            inner: local_store(),
            rejected,
        }
    }
}

#[async_trait]
impl MediaStore for RejectingStore {
    fn backend(&self) -> &'static str {
        "rejecting"
    }

    async fn put(
        &self,
        file: &MediaFile,
        folder: &str,
        kind: MediaKind,
        public_id: Option<&str>,
    ) -> Result<StoredMedia, MediaError> {
        if kind == self.rejected {
            return Err(MediaError::Rejected {
                status: 503,
                message: "media service unavailable".to_string(),
            });
        }
        self.inner.put(file, folder, kind, public_id).await
    }

    async fn delete(&self, public_id: &str, kind: MediaKind) -> Result<bool, MediaError> {
        self.inner.delete(public_id, kind).await
    }
}

// ---------------------------------------------------------------------------
// Users and tokens
// ---------------------------------------------------------------------------

/// Insert a back-office account with [`TEST_PASSWORD`].
pub async fn create_user(pool: &PgPool, email: &str, role: &str) -> smcd_db::models::user::User {
    let input = CreateUser {
        email: email.to_string(),
        password_hash: hash_password(TEST_PASSWORD).expect("hashing should succeed"),
        nom: "Test".to_string(),
        prenom: "Utilisateur".to_string(),
        role: role.to_string(),
    };
    UserRepo::create(pool, &input)
        .await
        .expect("user creation should succeed")
}

async fn token_for(pool: &PgPool, email: &str, role: &str) -> String {
    let user = create_user(pool, email, role).await;
    generate_access_token(user.id, &user.email, &user.role, &test_config().jwt)
        .expect("token generation should succeed")
}

/// Bearer token of a freshly created super admin.
pub async fn admin_token(pool: &PgPool) -> String {
    token_for(pool, "admin@test.ma", ROLE_SUPER_ADMIN).await
}

/// Bearer token of a freshly created moderator.
pub async fn moderator_token(pool: &PgPool) -> String {
    token_for(pool, "moderateur@test.ma", ROLE_MODERATEUR).await
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("request should build");
    app.oneshot(request).await.expect("request should succeed")
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_empty(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::POST, uri, None, None).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::POST, uri, None, Some(body)).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, Method::PUT, uri, Some(token), Some(body)).await
}

pub async fn put_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::PUT, uri, Some(token), None).await
}

pub async fn patch_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::PATCH, uri, Some(token), None).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, Some(token), None).await
}

// ---------------------------------------------------------------------------
// Multipart
// ---------------------------------------------------------------------------

const BOUNDARY: &str = "----smcd-test-boundary";

/// Minimal `multipart/form-data` body builder.
#[derive(Default)]
pub struct Multipart {
    body: Vec<u8>,
}

impl Multipart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
        self
    }

    pub fn file(mut self, name: &str, filename: &str, content_type: &str, bytes: &[u8]) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(bytes);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    fn finish(mut self) -> Vec<u8> {
        self.body
            .extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        self.body
    }
}

pub async fn send_multipart(
    app: Router,
    method: Method,
    uri: &str,
    form: Multipart,
    token: Option<&str>,
) -> Response<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(
            "Content-Type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        );
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }
    let request = builder
        .body(Body::from(form.finish()))
        .expect("request should build");
    app.oneshot(request).await.expect("request should succeed")
}

pub async fn post_multipart(
    app: Router,
    uri: &str,
    form: Multipart,
    token: Option<&str>,
) -> Response<Body> {
    send_multipart(app, Method::POST, uri, form, token).await
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should be readable")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be valid JSON")
}

/// Assert the status and return the parsed body.
pub async fn expect_json(response: Response<Body>, status: StatusCode) -> serde_json::Value {
    assert_eq!(response.status(), status);
    body_json(response).await
}
