//! Aggregate repository: load/save of the single persisted root.

use botforge_types::account::Aggregate;
use botforge_types::error::PersistenceError;

use crate::storage::durable::{AGGREGATE_KEY, DurableStore};

use super::schema;

/// Repository trait for the persisted aggregate.
///
/// There are no partial writes: `save` replaces the whole stored
/// representation, and concurrent load→mutate→save cycles are
/// last-writer-wins.
pub trait AggregateRepository: Send + Sync {
    /// Load the aggregate, or an empty one if nothing was persisted yet.
    fn load(&self) -> impl std::future::Future<Output = Result<Aggregate, PersistenceError>> + Send;

    /// Overwrite the persisted aggregate.
    fn save(
        &self,
        aggregate: &Aggregate,
    ) -> impl std::future::Future<Output = Result<(), PersistenceError>> + Send;

    /// Drop everything (full-store reset).
    fn clear(&self) -> impl std::future::Future<Output = Result<(), PersistenceError>> + Send;
}

/// [`AggregateRepository`] storing the versioned JSON envelope under
/// [`AGGREGATE_KEY`] of a [`DurableStore`].
#[derive(Clone)]
pub struct KeyedAggregateRepository<K: DurableStore> {
    store: K,
}

impl<K: DurableStore> KeyedAggregateRepository<K> {
    pub fn new(store: K) -> Self {
        Self { store }
    }
}

impl<K: DurableStore> AggregateRepository for KeyedAggregateRepository<K> {
    async fn load(&self) -> Result<Aggregate, PersistenceError> {
        match self.store.read(AGGREGATE_KEY).await? {
            Some(payload) => {
                let aggregate = schema::decode(&payload)?;
                tracing::debug!(
                    accounts = aggregate.users.len(),
                    bots = aggregate.bot_count(),
                    "loaded aggregate"
                );
                Ok(aggregate)
            }
            None => {
                tracing::debug!("no aggregate persisted yet, starting empty");
                Ok(Aggregate::default())
            }
        }
    }

    async fn save(&self, aggregate: &Aggregate) -> Result<(), PersistenceError> {
        let payload = schema::encode(aggregate)?;
        self.store.write(AGGREGATE_KEY, &payload).await?;
        tracing::debug!(bytes = payload.len(), "saved aggregate");
        Ok(())
    }

    async fn clear(&self) -> Result<(), PersistenceError> {
        self.store.remove(AGGREGATE_KEY).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MemoryDurableStore;
    use botforge_types::account::Account;

    #[tokio::test]
    async fn test_load_empty_store_returns_empty_aggregate() {
        let repo = KeyedAggregateRepository::new(MemoryDurableStore::default());
        let aggregate = repo.load().await.unwrap();
        assert!(aggregate.users.is_empty());
    }

    #[tokio::test]
    async fn test_save_of_unmodified_load_is_byte_idempotent() {
        let store = MemoryDurableStore::default();
        let repo = KeyedAggregateRepository::new(store.clone());

        let mut aggregate = Aggregate::default();
        aggregate
            .users
            .push(Account::materialize("a@example.com", &chrono::Utc::now()));
        repo.save(&aggregate).await.unwrap();
        let first = store.raw(AGGREGATE_KEY).unwrap();

        let loaded = repo.load().await.unwrap();
        repo.save(&loaded).await.unwrap();
        assert_eq!(store.raw(AGGREGATE_KEY).unwrap(), first);
    }

    #[tokio::test]
    async fn test_malformed_payload_is_reported_and_left_untouched() {
        let store = MemoryDurableStore::default();
        store.put_raw(AGGREGATE_KEY, "{\"users\": oops");
        let repo = KeyedAggregateRepository::new(store.clone());

        let err = repo.load().await.unwrap_err();
        assert!(matches!(err, PersistenceError::Malformed(_)));
        assert_eq!(store.raw(AGGREGATE_KEY).unwrap(), "{\"users\": oops");
    }

    #[tokio::test]
    async fn test_last_writer_wins() {
        let store = MemoryDurableStore::default();
        let repo = KeyedAggregateRepository::new(store);
        let now = chrono::Utc::now();

        // Two independent readers of the same starting state.
        let mut a = repo.load().await.unwrap();
        let mut b = repo.load().await.unwrap();

        a.users.push(Account::materialize("a@example.com", &now));
        repo.save(&a).await.unwrap();

        b.users.push(Account::materialize("b@example.com", &now));
        repo.save(&b).await.unwrap();

        let stored = repo.load().await.unwrap();
        let emails: Vec<_> = stored.users.iter().map(|u| u.email.as_str()).collect();
        assert_eq!(emails, vec!["b@example.com"]);
    }

    #[tokio::test]
    async fn test_clear_removes_payload() {
        let store = MemoryDurableStore::default();
        let repo = KeyedAggregateRepository::new(store.clone());
        repo.save(&Aggregate::default()).await.unwrap();
        repo.clear().await.unwrap();
        assert!(store.raw(AGGREGATE_KEY).is_none());
    }
}
