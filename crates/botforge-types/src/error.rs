use thiserror::Error;

use crate::knowledge::KnowledgeSync;

/// Missing or mismatched input. Raised before any state is touched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("passwords do not match")]
    PasswordMismatch,

    #[error("email '{0}' is already registered")]
    EmailTaken(String),

    #[error("provide training text or a PDF file")]
    NoKnowledgeSupplied,

    #[error("file '{0}' must be a PDF")]
    NotAPdf(String),
}

/// Credential mismatch at login or bot unlock.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("account not found")]
    AccountNotFound,

    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("incorrect bot password")]
    IncorrectBotPassword,

    #[error("too many failed unlock attempts ({attempts}); reopen the bot to try again")]
    TooManyAttempts { attempts: u32 },

    #[error("bot is locked; unlock it first")]
    BotLocked,

    #[error("not logged in")]
    NotLoggedIn,
}

/// A call to the knowledge ingestion/query collaborator failed.
///
/// `Rejected` displays the collaborator's `detail` verbatim, or a generic
/// status-coded message when it sent none.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IngestionError {
    #[error("{detail}")]
    Rejected { status: u16, detail: String },

    #[error("knowledge service unreachable: {0}")]
    Transport(String),

    #[error("unexpected response from knowledge service: {0}")]
    Decode(String),
}

impl IngestionError {
    /// Build a rejection from an HTTP status and an optional `detail` message.
    pub fn rejected(status: u16, detail: Option<String>) -> Self {
        let detail = detail
            .filter(|d| !d.trim().is_empty())
            .unwrap_or_else(|| format!("Server error: {status}"));
        Self::Rejected { status, detail }
    }
}

/// The persisted aggregate could not be read or written.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("persisted data is malformed: {0}")]
    Malformed(String),

    #[error("persisted data has schema version {found}, newest supported is {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },

    #[error("storage error: {0}")]
    Storage(#[from] RepositoryError),

    #[error("failed to serialize aggregate: {0}")]
    Serialize(String),
}

/// Credential hashing failed (never raised by verification, which fails closed).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CredentialError {
    #[error("invalid hashing parameters: {0}")]
    InvalidParams(String),

    #[error("hashing failed")]
    HashingFailed,
}

/// Errors from account operations (signup, login, session).
#[derive(Debug, Error)]
pub enum AccountError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Credential(#[from] CredentialError),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

/// Errors from bot lifecycle operations.
#[derive(Debug, Error)]
pub enum BotError {
    #[error("bot not found")]
    NotFound,

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    /// An ingestion step failed. `progress` records which steps completed
    /// before the failure; those side effects are not rolled back.
    #[error("{source}")]
    Ingestion {
        source: IngestionError,
        progress: KnowledgeSync,
    },

    /// A knowledge query failed. Nothing was mutated.
    #[error("{0}")]
    Query(#[source] IngestionError),

    #[error(transparent)]
    Credential(#[from] CredentialError),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

/// Errors from the durable key-value medium (used by trait definitions in botforge-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),
}
