//! Well-known role name constants.
//!
//! These must match the values stored in `users.role`.

pub const ROLE_SUPER_ADMIN: &str = "SUPER_ADMIN";
/// Legacy alias accepted wherever `SUPER_ADMIN` is.
pub const ROLE_ADMIN: &str = "ADMIN";
pub const ROLE_MODERATEUR: &str = "MODERATEUR";

/// Every role a user account may hold.
pub const VALID_ROLES: &[&str] = &[ROLE_SUPER_ADMIN, ROLE_ADMIN, ROLE_MODERATEUR];

/// Full administrative rights (user management, deletions, content edits).
pub fn is_super_admin(role: &str) -> bool {
    role == ROLE_SUPER_ADMIN || role == ROLE_ADMIN
}

/// Any back-office role: moderators and super admins.
pub fn is_staff(role: &str) -> bool {
    is_super_admin(role) || role == ROLE_MODERATEUR
}

pub fn is_valid_role(role: &str) -> bool {
    VALID_ROLES.contains(&role)
}
