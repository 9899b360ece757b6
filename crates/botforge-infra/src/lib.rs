//! Infrastructure layer for Botforge.
//!
//! Contains implementations of the ports defined in `botforge-core`:
//! the SQLite durable store, the Argon2id credential hasher, the HTTP
//! knowledge client, plus configuration and filesystem helpers.

pub mod config;
pub mod crypto;
pub mod filesystem;
pub mod knowledge;
pub mod sqlite;
