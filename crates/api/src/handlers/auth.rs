//! Handlers for the `/auth` resource (login, register, me, logout).

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use smcd_core::error::CoreError;
use smcd_core::roles::is_valid_role;
use smcd_db::models::user::{CreateUser, UserInfo};
use smcd_db::repositories::UserRepo;
use validator::Validate;

use crate::auth::jwt::generate_access_token;
use crate::auth::password::{hash_password, validate_password_strength, verify_password, MIN_PASSWORD_LENGTH};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireSuperAdmin;
use crate::response::MessageResponse;
use crate::state::AppState;

const BAD_CREDENTIALS: &str = "Email ou mot de passe incorrect";

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Email invalide"))]
    pub email: String,
    #[validate(length(min = 1, message = "Le mot de passe est obligatoire"))]
    pub password: String,
}

/// Successful login response.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    #[serde(rename = "type")]
    pub token_type: &'static str,
    pub email: String,
    pub nom: String,
    pub prenom: String,
    pub role: String,
    pub message: &'static str,
}

/// Request body for `POST /auth/register`.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email(message = "Email invalide"))]
    pub email: String,
    #[validate(length(min = 8, message = "Le mot de passe doit contenir au moins 8 caractères"))]
    pub password: String,
    #[validate(length(min = 1, message = "Le nom est obligatoire"))]
    pub nom: String,
    #[validate(length(min = 1, message = "Le prénom est obligatoire"))]
    pub prenom: String,
    pub role: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/auth/login
///
/// Authenticate with email + password. Inactive accounts are refused with
/// the same message as a wrong password.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    input.validate()?;

    let unauthorized = || AppError::Core(CoreError::Unauthorized(BAD_CREDENTIALS.into()));

    let user = UserRepo::find_by_email(&state.pool, input.email.trim())
        .await?
        .ok_or_else(unauthorized)?;

    if !user.active {
        tracing::warn!(user_id = user.id, "Login attempt on inactive account");
        return Err(unauthorized());
    }

    let valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification failed: {e}")))?;
    if !valid {
        tracing::warn!(user_id = user.id, "Failed login attempt");
        return Err(unauthorized());
    }

    let token = generate_access_token(user.id, &user.email, &user.role, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation failed: {e}")))?;

    tracing::info!(user_id = user.id, role = %user.role, "User logged in");

    Ok(Json(LoginResponse {
        token,
        token_type: "Bearer",
        email: user.email,
        nom: user.nom,
        prenom: user.prenom,
        role: user.role,
        message: "Connexion réussie",
    }))
}

/// POST /api/auth/register
///
/// Create a back-office account. Super admin only.
pub async fn register(
    RequireSuperAdmin(admin): RequireSuperAdmin,
    State(state): State<AppState>,
    Json(input): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<UserInfo>)> {
    input.validate()?;
    validate_password_strength(&input.password, MIN_PASSWORD_LENGTH)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let role = input.role.trim().to_uppercase();
    if !is_valid_role(&role) {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Rôle invalide : {}",
            input.role
        ))));
    }

    let email = input.email.trim().to_lowercase();
    if UserRepo::find_by_email(&state.pool, &email).await?.is_some() {
        return Err(AppError::Core(CoreError::Conflict(
            "Un utilisateur avec cet email existe déjà".into(),
        )));
    }

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing failed: {e}")))?;

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            email,
            password_hash,
            nom: input.nom.trim().to_string(),
            prenom: input.prenom.trim().to_string(),
            role,
        },
    )
    .await?;

    tracing::info!(user_id = user.id, created_by = admin.user_id, role = %user.role, "User registered");

    Ok((StatusCode::CREATED, Json(UserInfo::from(user))))
}

/// GET /api/auth/me
pub async fn me(auth: AuthUser, State(state): State<AppState>) -> AppResult<Json<UserInfo>> {
    let user = UserRepo::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Utilisateur",
            id: auth.user_id,
        }))?;
    Ok(Json(UserInfo::from(user)))
}

/// POST /api/auth/logout
///
/// Tokens are stateless; the client discards its copy.
pub async fn logout(auth: AuthUser) -> Json<MessageResponse> {
    tracing::info!(user_id = auth.user_id, "User logged out");
    Json(MessageResponse::new("Déconnexion réussie"))
}
