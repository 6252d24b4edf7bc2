//! Authentication and authorization middleware extractors.
//!
//! - [`auth::AuthUser`] -- Extracts the authenticated user from a JWT Bearer token.
//! - [`rbac::RequireStaff`] -- Requires any back-office role.
//! - [`rbac::RequireSuperAdmin`] -- Requires `SUPER_ADMIN` (or its `ADMIN` alias).

pub mod auth;
pub mod rbac;
