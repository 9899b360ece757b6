//! Session pointer persistence.
//!
//! The active session is the bare email of the logged-in account, stored
//! whole under [`SESSION_KEY`]. It has no expiry; it changes only on login,
//! logout, or a full reset.

use botforge_types::error::PersistenceError;
use botforge_types::session::Session;

use crate::storage::durable::{DurableStore, SESSION_KEY};

/// Reads and writes the active-session pointer.
#[derive(Clone)]
pub struct SessionStore<K: DurableStore> {
    store: K,
}

impl<K: DurableStore> SessionStore<K> {
    pub fn new(store: K) -> Self {
        Self { store }
    }

    /// The currently authenticated account, if any.
    pub async fn current_user(&self) -> Result<Option<Session>, PersistenceError> {
        let email = self.store.read(SESSION_KEY).await?;
        Ok(email.filter(|e| !e.is_empty()).map(Session::new))
    }

    /// Record `email` as the active session.
    pub async fn login(&self, email: &str) -> Result<Session, PersistenceError> {
        self.store.write(SESSION_KEY, email).await?;
        Ok(Session::new(email))
    }

    /// Clear the active session.
    pub async fn logout(&self) -> Result<(), PersistenceError> {
        self.store.remove(SESSION_KEY).await?;
        Ok(())
    }
}
