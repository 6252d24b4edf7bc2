//! Staff account passwords: Argon2id hashes stored as PHC strings.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{Error, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

/// Minimum accepted password length, in characters.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Hash `password` with a fresh random salt.
pub fn hash_password(password: &str) -> Result<String, Error> {
    let salt = SaltString::generate(&mut OsRng);
    Ok(Argon2::default()
        .hash_password(password.as_bytes(), &salt)?
        .to_string())
}

/// `Ok(false)` on a mismatch; `Err` only when `stored` is not a valid PHC
/// string.
pub fn verify_password(password: &str, stored: &str) -> Result<bool, Error> {
    let parsed = PasswordHash::new(stored)?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(Error::Password) => Ok(false),
        Err(e) => Err(e),
    }
}

/// Length is counted in characters so accented passwords are not
/// penalised.
pub fn validate_password_strength(password: &str, min_length: usize) -> Result<(), String> {
    if password.chars().count() < min_length {
        return Err(format!(
            "Le mot de passe doit contenir au moins {min_length} caractères"
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_round_trips_for_the_right_password_only() {
        let hash = hash_password("Congres-SMCD-2026").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("Congres-SMCD-2026", &hash).unwrap());
        assert!(!verify_password("Congres-SMCD-2025", &hash).unwrap());
    }

    #[test]
    fn salts_differ_between_hashes() {
        assert_ne!(hash_password("Admin123!").unwrap(), hash_password("Admin123!").unwrap());
    }

    #[test]
    fn corrupt_stored_hash_is_an_error() {
        assert!(verify_password("Admin123!", "not-a-phc-string").is_err());
    }

    #[test]
    fn minimum_length_counts_characters() {
        let err = validate_password_strength("court", MIN_PASSWORD_LENGTH).unwrap_err();
        assert!(err.contains("au moins 8 caractères"));
        assert!(validate_password_strength("éàçèùâêî", MIN_PASSWORD_LENGTH).is_ok());
    }
}
