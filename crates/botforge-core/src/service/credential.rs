//! CredentialHasher trait for one-way secret digests.
//!
//! Defined in botforge-core so services can hash and verify account and bot
//! passwords without coupling to a specific algorithm. The
//! `Argon2CredentialHasher` adapter lives in botforge-infra.

use botforge_types::error::CredentialError;

/// One-way hashing and verification of secrets.
///
/// There is no way to recover a secret from its digest.
pub trait CredentialHasher: Send + Sync {
    /// Hash `secret` with a fresh random salt. Two calls with the same input
    /// produce different digests.
    fn hash(&self, secret: &str) -> Result<String, CredentialError>;

    /// Check `secret` against `digest` in constant time.
    ///
    /// Must return `false` (never panic or error) for malformed, truncated,
    /// or otherwise unrecognized digests.
    fn verify(&self, secret: &str, digest: &str) -> bool;
}
