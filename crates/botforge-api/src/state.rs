//! Application state wiring all services together.
//!
//! Services are generic over store/hasher/ingestor traits; AppState pins
//! them to the concrete infra implementations.

use std::path::PathBuf;
use std::sync::Arc;

use botforge_core::repository::aggregate::KeyedAggregateRepository;
use botforge_core::service::account::AccountService;
use botforge_core::service::bot::BotLifecycle;
use botforge_core::service::session::SessionStore;
use botforge_infra::config::load_config;
use botforge_infra::crypto::credential::Argon2CredentialHasher;
use botforge_infra::filesystem::resolve_data_dir;
use botforge_infra::knowledge::http::HttpKnowledgeClient;
use botforge_infra::sqlite::durable::SqliteDurableStore;
use botforge_infra::sqlite::pool::{DatabasePool, database_url};
use botforge_types::config::BotforgeConfig;
use botforge_types::session::Session;

/// Concrete type aliases for the service generics pinned to infra implementations.
pub type ConcreteAggregateRepository = KeyedAggregateRepository<SqliteDurableStore>;

pub type ConcreteAccountService =
    AccountService<ConcreteAggregateRepository, Argon2CredentialHasher, SqliteDurableStore>;

pub type ConcreteBotLifecycle =
    BotLifecycle<ConcreteAggregateRepository, Argon2CredentialHasher, HttpKnowledgeClient>;

/// Shared application state holding all services.
#[derive(Clone)]
pub struct AppState {
    pub account_service: Arc<ConcreteAccountService>,
    pub bot_lifecycle: Arc<ConcreteBotLifecycle>,
    pub config: BotforgeConfig,
    pub data_dir: PathBuf,
}

impl AppState {
    /// Initialize the application state: load config, open the DB, wire services.
    pub async fn init() -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();
        tokio::fs::create_dir_all(&data_dir).await?;

        let config = load_config(&data_dir).await;
        tracing::debug!(data_dir = %data_dir.display(), "initializing state");

        let pool = DatabasePool::new(&database_url(&data_dir)).await?;
        let store = SqliteDurableStore::new(pool);
        let repo = KeyedAggregateRepository::new(store.clone());
        let hasher = Argon2CredentialHasher::new(&config.credentials)?;
        let ingestor = HttpKnowledgeClient::new(&config.knowledge)?;

        let account_service =
            AccountService::new(repo.clone(), hasher.clone(), SessionStore::new(store));
        let bot_lifecycle = BotLifecycle::new(
            repo,
            hasher,
            ingestor,
            config.access.max_unlock_attempts,
        );

        Ok(Self {
            account_service: Arc::new(account_service),
            bot_lifecycle: Arc::new(bot_lifecycle),
            config,
            data_dir,
        })
    }

    /// The logged-in account, or an error telling the operator to log in.
    pub async fn require_session(&self) -> anyhow::Result<Session> {
        Ok(self.account_service.require_session().await?)
    }
}
