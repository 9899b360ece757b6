//! Account service: signup, login, logout, and full-store reset.

use chrono::Utc;
use secrecy::ExposeSecret;

use botforge_types::account::{Account, AccountId, RegisterRequest};
use botforge_types::error::{AccountError, AuthError, ValidationError};
use botforge_types::session::Session;

use crate::repository::aggregate::AggregateRepository;
use crate::service::credential::CredentialHasher;
use crate::service::session::SessionStore;
use crate::storage::durable::DurableStore;

/// Service orchestrating account authentication against the aggregate.
///
/// Generic over repository, hasher, and session medium to maintain clean
/// architecture -- botforge-core never depends on botforge-infra.
pub struct AccountService<R: AggregateRepository, H: CredentialHasher, K: DurableStore> {
    repo: R,
    hasher: H,
    sessions: SessionStore<K>,
}

impl<R: AggregateRepository, H: CredentialHasher, K: DurableStore> AccountService<R, H, K> {
    pub fn new(repo: R, hasher: H, sessions: SessionStore<K>) -> Self {
        Self {
            repo,
            hasher,
            sessions,
        }
    }

    /// Register a new account.
    ///
    /// Requires a non-empty email and password, matching password
    /// confirmation, and an email not already present in the aggregate.
    pub async fn register(&self, request: RegisterRequest) -> Result<Account, AccountError> {
        let email = request.email.trim().to_string();
        if email.is_empty() {
            return Err(ValidationError::MissingField("email").into());
        }
        let password = request.password.expose_secret();
        if password.is_empty() {
            return Err(ValidationError::MissingField("password").into());
        }
        if password != request.confirm_password.expose_secret() {
            return Err(ValidationError::PasswordMismatch.into());
        }

        let mut aggregate = self.repo.load().await?;
        if aggregate.account(&email).is_some() {
            return Err(ValidationError::EmailTaken(email).into());
        }

        let now = Utc::now();
        let account = Account {
            id: AccountId::from_created_at(&now),
            name: request.name.trim().to_string(),
            email,
            password_hash: Some(self.hasher.hash(password)?),
            bots: Vec::new(),
        };
        aggregate.users.push(account.clone());
        self.repo.save(&aggregate).await?;

        tracing::info!(email = %account.email, "account registered");
        Ok(account)
    }

    /// Verify the account password and record the session pointer.
    ///
    /// Accounts without a password hash (materialized by bot creation) and
    /// digests the hasher cannot parse are rejected, never retried.
    pub async fn login(&self, email: &str, password: &str) -> Result<Session, AccountError> {
        let email = email.trim();
        let aggregate = self.repo.load().await?;

        let digest = aggregate
            .account(email)
            .and_then(|a| a.password_hash.as_deref())
            .ok_or(AuthError::AccountNotFound)?;

        if !self.hasher.verify(password, digest) {
            tracing::warn!(email, "login rejected");
            return Err(AuthError::InvalidCredentials.into());
        }

        let session = self.sessions.login(email).await?;
        tracing::info!(email, "logged in");
        Ok(session)
    }

    pub async fn logout(&self) -> Result<(), AccountError> {
        self.sessions.logout().await?;
        Ok(())
    }

    /// The active session, if any.
    pub async fn whoami(&self) -> Result<Option<Session>, AccountError> {
        Ok(self.sessions.current_user().await?)
    }

    /// The active session, or `AuthError::NotLoggedIn`.
    pub async fn require_session(&self) -> Result<Session, AccountError> {
        self.whoami()
            .await?
            .ok_or_else(|| AuthError::NotLoggedIn.into())
    }

    /// Full-store reset: drops every account, every bot, and the session.
    pub async fn reset(&self) -> Result<(), AccountError> {
        self.repo.clear().await?;
        self.sessions.logout().await?;
        tracing::info!("store reset");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::aggregate::KeyedAggregateRepository;
    use crate::storage::durable::{AGGREGATE_KEY, SESSION_KEY};
    use crate::testing::{FakeHasher, MemoryDurableStore};
    use secrecy::SecretString;

    type TestService = AccountService<
        KeyedAggregateRepository<MemoryDurableStore>,
        FakeHasher,
        MemoryDurableStore,
    >;

    fn service(store: &MemoryDurableStore) -> TestService {
        AccountService::new(
            KeyedAggregateRepository::new(store.clone()),
            FakeHasher::default(),
            SessionStore::new(store.clone()),
        )
    }

    fn signup(email: &str, password: &str, confirm: &str) -> RegisterRequest {
        RegisterRequest {
            name: "Ada".to_string(),
            email: email.to_string(),
            password: SecretString::from(password),
            confirm_password: SecretString::from(confirm),
        }
    }

    #[tokio::test]
    async fn test_register_stores_hash_not_plaintext() {
        let store = MemoryDurableStore::default();
        let svc = service(&store);
        let account = svc
            .register(signup("ada@example.com", "hunter2", "hunter2"))
            .await
            .unwrap();

        let hash = account.password_hash.unwrap();
        assert_ne!(hash, "hunter2");
        assert!(!store.raw(AGGREGATE_KEY).unwrap().contains("hunter2"));
    }

    #[tokio::test]
    async fn test_register_rejects_mismatch_and_duplicates() {
        let store = MemoryDurableStore::default();
        let svc = service(&store);

        let err = svc
            .register(signup("ada@example.com", "a", "b"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AccountError::Validation(ValidationError::PasswordMismatch)
        ));
        assert!(store.raw(AGGREGATE_KEY).is_none());

        svc.register(signup("ada@example.com", "a", "a")).await.unwrap();
        let err = svc
            .register(signup("ada@example.com", "c", "c"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AccountError::Validation(ValidationError::EmailTaken(_))
        ));
    }

    #[tokio::test]
    async fn test_login_sets_session_pointer() {
        let store = MemoryDurableStore::default();
        let svc = service(&store);
        svc.register(signup("ada@example.com", "pw", "pw")).await.unwrap();

        let session = svc.login("ada@example.com", "pw").await.unwrap();
        assert_eq!(session.email(), "ada@example.com");
        assert_eq!(store.raw(SESSION_KEY).as_deref(), Some("ada@example.com"));
    }

    #[tokio::test]
    async fn test_login_wrong_password_leaves_session_untouched() {
        let store = MemoryDurableStore::default();
        let svc = service(&store);
        svc.register(signup("ada@example.com", "pw", "pw")).await.unwrap();

        let err = svc.login("ada@example.com", "nope").await.unwrap_err();
        assert!(matches!(err, AccountError::Auth(AuthError::InvalidCredentials)));
        assert!(store.raw(SESSION_KEY).is_none());
    }

    #[tokio::test]
    async fn test_login_with_legacy_digest_fails_closed() {
        let store = MemoryDurableStore::default();
        store.put_raw(
            AGGREGATE_KEY,
            r#"{"users":[{"id":1,"name":"Old","email":"old@example.com","password":"$2a$10$legacylegacylegacylega","bots":[]}]}"#,
        );
        let svc = service(&store);
        let err = svc.login("old@example.com", "whatever").await.unwrap_err();
        assert!(matches!(err, AccountError::Auth(AuthError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_login_unknown_or_passwordless_account() {
        let store = MemoryDurableStore::default();
        store.put_raw(
            AGGREGATE_KEY,
            r#"{"schemaVersion":1,"users":[{"id":1,"name":"","email":"lazy@example.com","passwordHash":null,"bots":[]}]}"#,
        );
        let svc = service(&store);
        for email in ["lazy@example.com", "ghost@example.com"] {
            let err = svc.login(email, "pw").await.unwrap_err();
            assert!(matches!(err, AccountError::Auth(AuthError::AccountNotFound)));
        }
    }

    #[tokio::test]
    async fn test_require_session_and_reset() {
        let store = MemoryDurableStore::default();
        let svc = service(&store);
        assert!(matches!(
            svc.require_session().await.unwrap_err(),
            AccountError::Auth(AuthError::NotLoggedIn)
        ));

        svc.register(signup("ada@example.com", "pw", "pw")).await.unwrap();
        svc.login("ada@example.com", "pw").await.unwrap();
        assert!(svc.require_session().await.is_ok());

        svc.reset().await.unwrap();
        assert!(store.raw(AGGREGATE_KEY).is_none());
        assert!(svc.whoami().await.unwrap().is_none());
    }
}
