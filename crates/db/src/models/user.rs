//! Back-office user accounts.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use smcd_core::types::{DbId, Timestamp};

/// Full row from the `users` table.
///
/// Holds the password hash, so it is never serialized. Use [`UserInfo`] for
/// API output.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub email: String,
    pub password_hash: String,
    pub nom: String,
    pub prenom: String,
    pub role: String,
    pub active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Safe user representation for API responses.
#[derive(Debug, Clone, Serialize)]
pub struct UserInfo {
    pub id: DbId,
    pub email: String,
    pub nom: String,
    pub prenom: String,
    pub role: String,
    pub active: bool,
}

impl From<User> for UserInfo {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            nom: user.nom,
            prenom: user.prenom,
            role: user.role,
            active: user.active,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateUser {
    pub email: String,
    pub password_hash: String,
    pub nom: String,
    pub prenom: String,
    pub role: String,
}
