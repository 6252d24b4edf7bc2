//! Authentication primitives.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`jwt`] -- stateless HS256 access tokens.

pub mod jwt;
pub mod password;
