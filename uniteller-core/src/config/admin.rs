//! Admin API authentication.

use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use password_hash::{SaltString, rand_core::OsRng};

/// Admin configuration holding the argon2 PHC string of the admin secret.
#[derive(Debug, Clone)]
pub struct AdminConfig {
    pub secret_hash: String,
}

impl AdminConfig {
    pub fn new(secret_hash: String) -> Self {
        Self { secret_hash }
    }

    /// Hash a plaintext secret with a fresh salt.
    pub fn hash_secret(plaintext: &str) -> Result<String, argon2::password_hash::Error> {
        let salt = SaltString::generate(&mut OsRng);
        Ok(Argon2::default()
            .hash_password(plaintext.as_bytes(), &salt)?
            .to_string())
    }

    /// Whether `value` is already an argon2 PHC string rather than plaintext.
    pub fn is_hashed(value: &str) -> bool {
        PasswordHash::new(value).is_ok_and(|h| h.algorithm.as_str().starts_with("argon2"))
    }

    /// Verify the `Uniteller-Admin-Authorization` header value.
    ///
    /// An unparsable stored hash never matches.
    pub fn verify_secret(&self, plaintext: &str) -> bool {
        let Ok(parsed_hash) = PasswordHash::new(&self.secret_hash) else {
            return false;
        };

        Argon2::default()
            .verify_password(plaintext.as_bytes(), &parsed_hash)
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hashed_secret_verifies() {
        let hash = AdminConfig::hash_secret("uniteller-admin").unwrap();
        assert!(AdminConfig::is_hashed(&hash));

        let admin = AdminConfig::new(hash);
        assert!(admin.verify_secret("uniteller-admin"));
        assert!(!admin.verify_secret("uniteller-admim"));
    }

    #[test]
    fn each_hash_gets_a_fresh_salt() {
        let first = AdminConfig::hash_secret("uniteller-admin").unwrap();
        let second = AdminConfig::hash_secret("uniteller-admin").unwrap();
        assert_ne!(first, second);
        assert!(AdminConfig::new(second).verify_secret("uniteller-admin"));
    }

    #[test]
    fn plaintext_is_not_a_hash() {
        assert!(!AdminConfig::is_hashed("change-me"));
        assert!(!AdminConfig::new("change-me".into()).verify_secret("change-me"));
    }
}
