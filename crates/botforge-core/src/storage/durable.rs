//! Durable key store trait.
//!
//! The persistence boundary is a handful of named keys, each holding one
//! opaque string value that is always read and written whole. There is no
//! partial-field update API.

use botforge_types::error::RepositoryError;

/// Key holding the serialized aggregate (all accounts and their bots).
pub const AGGREGATE_KEY: &str = "bot_data";

/// Key holding the bare email of the active session.
pub const SESSION_KEY: &str = "logged_user";

/// Whole-value persistent storage keyed by name.
///
/// Uses RPITIT (native async fn in traits, Rust 2024 edition).
/// Implementations live in botforge-infra.
pub trait DurableStore: Send + Sync {
    /// Read the value under `key`. Returns None if nothing was ever written.
    fn read(
        &self,
        key: &str,
    ) -> impl std::future::Future<Output = Result<Option<String>, RepositoryError>> + Send;

    /// Replace the value under `key` in one call.
    fn write(
        &self,
        key: &str,
        value: &str,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Remove `key`. No-op if it does not exist.
    fn remove(
        &self,
        key: &str,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;
}
