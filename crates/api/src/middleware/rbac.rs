//! Role-based access control (RBAC) extractors.
//!
//! Each extractor wraps [`AuthUser`] and rejects requests whose role does not
//! meet the minimum requirement.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use smcd_core::error::CoreError;
use smcd_core::roles::{is_staff, is_super_admin};

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Requires `SUPER_ADMIN` or `ADMIN`. Rejects with 403 Forbidden otherwise.
///
/// ```ignore
/// async fn admin_only(RequireSuperAdmin(user): RequireSuperAdmin) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
pub struct RequireSuperAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireSuperAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !is_super_admin(&user.role) {
            return Err(AppError::Core(CoreError::Forbidden(
                "Accès réservé au super administrateur".into(),
            )));
        }
        Ok(RequireSuperAdmin(user))
    }
}

/// Requires any staff role (`SUPER_ADMIN`, `ADMIN` or `MODERATEUR`).
pub struct RequireStaff(pub AuthUser);

impl FromRequestParts<AppState> for RequireStaff {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !is_staff(&user.role) {
            return Err(AppError::Core(CoreError::Forbidden(
                "Accès réservé à l'équipe d'administration".into(),
            )));
        }
        Ok(RequireStaff(user))
    }
}
