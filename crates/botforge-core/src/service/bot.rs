//! Bot lifecycle service.
//!
//! Orchestrates creation, listing, unlocking, knowledge updates, and
//! confirmed deletion of bots owned by the session's account. Every mutating
//! operation is a whole-aggregate load → mutate → save cycle.

use chrono::Utc;
use secrecy::ExposeSecret;

use botforge_types::bot::{Bot, BotId, CreateBotRequest, delete_confirmation_phrase};
use botforge_types::error::{BotError, ValidationError};
use botforge_types::knowledge::{Answer, KnowledgeSync, KnowledgeUpdate, PdfUpload};
use botforge_types::session::Session;

use crate::knowledge::ingestor::KnowledgeIngestor;
use crate::knowledge::saga::KnowledgeSaga;
use crate::repository::aggregate::AggregateRepository;
use crate::service::access::BotView;
use crate::service::credential::CredentialHasher;

/// A freshly created bot and the ingestion run that preceded it.
#[derive(Debug, Clone)]
pub struct CreatedBot {
    pub bot: Bot,
    pub knowledge: KnowledgeSync,
}

/// Result of a delete request.
#[derive(Debug, Clone, PartialEq)]
pub enum DeleteOutcome {
    /// The confirmation matched; the bot was removed and the aggregate saved.
    Deleted(Bot),
    /// The typed confirmation did not match. Nothing changed.
    NotConfirmed,
}

/// Service orchestrating the bot lifecycle.
///
/// Generic over repository, hasher, and ingestion collaborator to maintain
/// clean architecture -- botforge-core never depends on botforge-infra.
pub struct BotLifecycle<R: AggregateRepository, H: CredentialHasher, I: KnowledgeIngestor> {
    repo: R,
    hasher: H,
    ingestor: I,
    max_unlock_attempts: u32,
}

impl<R: AggregateRepository, H: CredentialHasher, I: KnowledgeIngestor> BotLifecycle<R, H, I> {
    /// `max_unlock_attempts == 0` disables unlock throttling.
    pub fn new(repo: R, hasher: H, ingestor: I, max_unlock_attempts: u32) -> Self {
        Self {
            repo,
            hasher,
            ingestor,
            max_unlock_attempts,
        }
    }

    /// Create a bot for the session's account.
    ///
    /// 1. Validates company, bot password (and its confirmation), website
    /// 2. Loads the aggregate, materializing the owner's account if absent
    /// 3. Hashes the bot password
    /// 4. Ingests training text, then the PDF
    /// 5. Assigns an id, appends, and persists
    ///
    /// Any ingestion failure aborts before step 5 with nothing persisted.
    /// Ingestion that already completed is not rolled back; the returned
    /// `BotError::Ingestion` carries which steps ran.
    pub async fn create(
        &self,
        session: &Session,
        request: CreateBotRequest,
    ) -> Result<CreatedBot, BotError> {
        let bot_password = request.bot_password.expose_secret();
        check_bot_credentials(
            &request.company,
            bot_password,
            request.confirm_password.expose_secret(),
        )?;
        let company = request.company.trim().to_string();
        let website = request.website.trim().to_string();
        if website.is_empty() {
            return Err(ValidationError::MissingField("website").into());
        }
        check_pdf(request.pdf_file.as_ref())?;

        // Load before ingesting so an unreadable store fails without side effects.
        let mut aggregate = self.repo.load().await?;
        let bot_password_hash = self.hasher.hash(bot_password)?;

        let mut saga = KnowledgeSaga::new(KnowledgeUpdate {
            text: request.knowledge_text,
            pdf_file: request.pdf_file,
        });
        if let Err(source) = saga.run(&self.ingestor).await {
            return Err(BotError::Ingestion {
                source,
                progress: saga.status().clone(),
            });
        }

        let now = Utc::now();
        let owner = aggregate.account_or_materialize(session.email(), &now);
        let bot = Bot {
            id: owner.next_bot_id(&now),
            company,
            bot_password_hash,
            website,
            user_type: request.user_type,
            created_at: now,
        };
        owner.bots.push(bot.clone());
        self.repo.save(&aggregate).await?;

        tracing::info!(bot_id = %bot.id, company = %bot.company, "bot created");
        Ok(CreatedBot {
            bot,
            knowledge: saga.status().clone(),
        })
    }

    /// The session account's bots in insertion order. Empty if no account exists.
    pub async fn list(&self, session: &Session) -> Result<Vec<Bot>, BotError> {
        let aggregate = self.repo.load().await?;
        Ok(aggregate
            .account(session.email())
            .map(|a| a.bots.clone())
            .unwrap_or_default())
    }

    pub async fn get(&self, session: &Session, id: BotId) -> Result<Bot, BotError> {
        let aggregate = self.repo.load().await?;
        aggregate
            .account(session.email())
            .and_then(|a| a.bot(id))
            .cloned()
            .ok_or(BotError::NotFound)
    }

    /// Open a bot for management. The view always starts locked.
    pub async fn open(&self, session: &Session, id: BotId) -> Result<BotView, BotError> {
        let bot = self.get(session, id).await?;
        Ok(BotView::open(bot, self.max_unlock_attempts))
    }

    /// Check a supplied bot password against the stored digest.
    pub fn unlock(&self, bot: &Bot, supplied: &str) -> bool {
        self.hasher.verify(supplied, &bot.bot_password_hash)
    }

    /// Attempt to unlock `view`, honoring its failed-attempt budget.
    pub fn unlock_view(&self, view: &mut BotView, supplied: &str) -> Result<(), BotError> {
        if view.is_unlocked() {
            return Ok(());
        }
        view.check_throttle()?;
        let verified = self.unlock(view.bot(), supplied);
        view.record_attempt(verified)?;
        tracing::info!(bot_id = %view.bot().id, "bot unlocked");
        Ok(())
    }

    /// Validate a knowledge update and plan its ingestion run.
    pub fn plan_knowledge_update(&self, update: KnowledgeUpdate) -> Result<KnowledgeSaga, BotError> {
        let update = update.normalized();
        if update.is_empty() {
            return Err(ValidationError::NoKnowledgeSupplied.into());
        }
        check_pdf(update.pdf_file.as_ref())?;
        Ok(KnowledgeSaga::new(update))
    }

    /// Run (or resume) a planned knowledge update for an unlocked bot.
    ///
    /// On failure the saga keeps its recorded progress; calling this again
    /// with the same saga resumes from the failed step.
    pub async fn sync_knowledge(
        &self,
        view: &BotView,
        saga: &mut KnowledgeSaga,
    ) -> Result<KnowledgeSync, BotError> {
        let bot = view.unlocked_bot()?;
        match saga.run(&self.ingestor).await {
            Ok(()) => {
                tracing::info!(bot_id = %bot.id, "knowledge updated");
                Ok(saga.status().clone())
            }
            Err(source) => Err(BotError::Ingestion {
                source,
                progress: saga.status().clone(),
            }),
        }
    }

    /// Plan and run a knowledge update in one call.
    pub async fn update_knowledge(
        &self,
        view: &BotView,
        update: KnowledgeUpdate,
    ) -> Result<KnowledgeSync, BotError> {
        view.unlocked_bot()?;
        let mut saga = self.plan_knowledge_update(update)?;
        self.sync_knowledge(view, &mut saga).await
    }

    /// Delete a bot after an exact `DELETE <company>` confirmation.
    ///
    /// A mismatched phrase is a no-op that persists nothing.
    pub async fn delete(
        &self,
        session: &Session,
        id: BotId,
        typed_confirmation: &str,
    ) -> Result<DeleteOutcome, BotError> {
        let mut aggregate = self.repo.load().await?;
        let owner = aggregate
            .account_mut(session.email())
            .ok_or(BotError::NotFound)?;
        let company = owner.bot(id).ok_or(BotError::NotFound)?.company.clone();

        if typed_confirmation != delete_confirmation_phrase(&company) {
            tracing::debug!(bot_id = %id, "delete not confirmed");
            return Ok(DeleteOutcome::NotConfirmed);
        }

        let removed = owner.remove_bot(id).ok_or(BotError::NotFound)?;
        self.repo.save(&aggregate).await?;
        tracing::info!(bot_id = %id, company = %company, "bot deleted");
        Ok(DeleteOutcome::Deleted(removed))
    }

    /// Forward a question to the knowledge collaborator.
    pub async fn ask(&self, question: &str) -> Result<Answer, BotError> {
        let question = question.trim();
        if question.is_empty() {
            return Err(ValidationError::MissingField("question").into());
        }
        self.ingestor.ask(question).await.map_err(BotError::Query)
    }
}

/// First half of bot creation: a company name and a confirmed bot password.
///
/// Lets an interactive caller reject bad credentials before asking for the
/// website and training material.
pub fn check_bot_credentials(
    company: &str,
    bot_password: &str,
    confirm_password: &str,
) -> Result<(), ValidationError> {
    if company.trim().is_empty() {
        return Err(ValidationError::MissingField("company name"));
    }
    if bot_password.is_empty() {
        return Err(ValidationError::MissingField("bot password"));
    }
    if bot_password != confirm_password {
        return Err(ValidationError::PasswordMismatch);
    }
    Ok(())
}

fn check_pdf(file: Option<&PdfUpload>) -> Result<(), ValidationError> {
    match file {
        Some(f) if !f.has_pdf_extension() => Err(ValidationError::NotAPdf(f.file_name.clone())),
        _ => Ok(()),
    }
}
