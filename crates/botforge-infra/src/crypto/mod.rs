//! Cryptographic operations for Botforge.
//!
//! - `credential`: Argon2id hashing for account and bot passwords

pub mod credential;
