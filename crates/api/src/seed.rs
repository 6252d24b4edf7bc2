//! Startup data: bootstrap super-admin account and default page content.

use smcd_core::format::title_from_key;
use smcd_core::roles::ROLE_SUPER_ADMIN;
use smcd_db::models::user::CreateUser;
use smcd_db::repositories::{ContenuRepo, UserRepo};
use smcd_db::DbPool;

use crate::auth::password::hash_password;
use crate::error::{AppError, AppResult};

/// Page keys that must always exist in `contenus_statiques`.
pub const DEFAULT_CONTENT_KEYS: &[&str] = &[
    "mot_president",
    "a_propos",
    "mission",
    "vision",
    "valeurs",
    "histoire",
    "comite_organisation",
    "comite_scientifique",
    "mentions_legales",
    "politique_confidentialite",
    "cgu",
];

const PLACEHOLDER_CONTENT: &str = "<p>Contenu à définir...</p>";

/// Create the super-admin account unless a user with that email exists.
/// Returns `true` when the account was created.
pub async fn seed_admin(pool: &DbPool, email: &str, password: &str) -> AppResult<bool> {
    if UserRepo::find_by_email(pool, email).await?.is_some() {
        return Ok(false);
    }

    let password_hash =
        hash_password(password).map_err(|e| AppError::InternalError(e.to_string()))?;
    let user = UserRepo::create(
        pool,
        &CreateUser {
            email: email.to_string(),
            password_hash,
            nom: "Admin".into(),
            prenom: "SMCD".into(),
            role: ROLE_SUPER_ADMIN.into(),
        },
    )
    .await?;

    tracing::info!(user_id = user.id, email, "Bootstrap super admin created");
    Ok(true)
}

/// Insert placeholder rows for missing default keys. Returns how many were added.
pub async fn seed_default_content(pool: &DbPool) -> Result<usize, sqlx::Error> {
    let mut created = 0;
    for key in DEFAULT_CONTENT_KEYS {
        if ContenuRepo::insert_default_if_missing(pool, key, &title_from_key(key), PLACEHOLDER_CONTENT)
            .await?
        {
            created += 1;
        }
    }
    if created > 0 {
        tracing::info!(created, "Default static content seeded");
    }
    Ok(created)
}
