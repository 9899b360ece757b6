//! Argon2id credential hashing.
//!
//! Digests are self-describing PHC strings
//! (`$argon2id$v=19$m=..,t=..,p=..$<salt>$<hash>`), so a digest produced
//! under older parameters keeps verifying after the configuration changes.
//!
//! SECURITY: neither the secret nor the digest ever appears in error output.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};

use botforge_core::service::credential::CredentialHasher;
use botforge_types::config::CredentialConfig;
use botforge_types::error::CredentialError;

/// Salted Argon2id hasher for account and bot passwords.
#[derive(Clone)]
pub struct Argon2CredentialHasher {
    argon2: Argon2<'static>,
}

impl Argon2CredentialHasher {
    /// Build a hasher with the configured work factor.
    pub fn new(config: &CredentialConfig) -> Result<Self, CredentialError> {
        let params = Params::new(config.memory_kib, config.iterations, config.parallelism, None)
            .map_err(|e| CredentialError::InvalidParams(e.to_string()))?;
        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }
}

impl CredentialHasher for Argon2CredentialHasher {
    fn hash(&self, secret: &str) -> Result<String, CredentialError> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2
            .hash_password(secret.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|_| CredentialError::HashingFailed)
    }

    fn verify(&self, secret: &str, digest: &str) -> bool {
        // Unparsable digests (including legacy bcrypt `$2a$` strings) fail closed.
        let Ok(parsed) = PasswordHash::new(digest) else {
            return false;
        };
        self.argon2
            .verify_password(secret.as_bytes(), &parsed)
            .is_ok()
    }
}
