use argon2::{
    Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version,
    password_hash::{SaltString, rand_core::OsRng},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HashError {
    #[error("invalid argon2 parameters: {0}")]
    Params(String),

    #[error("password hashing failed: {0}")]
    Hash(String),
}

/// Argon2id password hasher with tunable cost.
#[derive(Clone)]
pub struct CredentialHasher {
    argon2: Argon2<'static>,
    /// Digest of a throwaway password, verified against when the account is
    /// unknown so both login failures take the same time.
    dummy_digest: String,
}

impl CredentialHasher {
    pub fn new(memory_kib: u32, iterations: u32, parallelism: u32) -> Result<Self, HashError> {
        let params = Params::new(memory_kib, iterations, parallelism, None)
            .map_err(|e| HashError::Params(e.to_string()))?;
        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

        let mut hasher = Self {
            argon2,
            dummy_digest: String::new(),
        };
        hasher.dummy_digest = hasher.hash("quill-dummy-credential")?;
        Ok(hasher)
    }

    /// Hash with a fresh random salt; the result is a self-describing PHC string.
    pub fn hash(&self, password: &str) -> Result<String, HashError> {
        let salt = SaltString::generate(&mut OsRng);
        let digest = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| HashError::Hash(e.to_string()))?;
        Ok(digest.to_string())
    }

    /// A malformed digest verifies as `false`, same as a wrong password.
    pub fn verify(&self, digest: &str, password: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(digest) else {
            return false;
        };
        self.argon2
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    }

    pub fn verify_dummy(&self, password: &str) {
        let _ = self.verify(&self.dummy_digest, password);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cheap_hasher() -> CredentialHasher {
        CredentialHasher::new(Params::MIN_M_COST, 1, 1).unwrap()
    }

    #[test]
    fn hash_then_verify() {
        let hasher = cheap_hasher();
        let digest = hasher.hash("longenough1").unwrap();

        assert_ne!(digest, "longenough1");
        assert!(digest.starts_with("$argon2id$"));
        assert!(hasher.verify(&digest, "longenough1"));
        assert!(!hasher.verify(&digest, "longenough2"));
    }

    #[test]
    fn same_password_gets_distinct_salts() {
        let hasher = cheap_hasher();
        let a = hasher.hash("longenough1").unwrap();
        let b = hasher.hash("longenough1").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn malformed_digest_is_plain_mismatch() {
        let hasher = cheap_hasher();
        assert!(!hasher.verify("not-a-phc-string", "longenough1"));
        assert!(!hasher.verify("", ""));
    }

    #[test]
    fn rejects_out_of_range_params() {
        assert!(matches!(
            CredentialHasher::new(1, 1, 1),
            Err(HashError::Params(_))
        ));
    }
}
