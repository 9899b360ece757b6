//! Per-view bot access state.
//!
//! Opening a bot yields a [`BotView`] in the `Locked` state. The only
//! transition is `Locked → Unlocked` on a correct bot password. Nothing here
//! is persisted: opening the bot again starts from `Locked` with a fresh
//! attempt counter.

use std::fmt;

use botforge_types::bot::Bot;
use botforge_types::error::AuthError;

/// Access state of a bot view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BotAccess {
    Locked,
    Unlocked,
}

impl fmt::Display for BotAccess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BotAccess::Locked => write!(f, "locked"),
            BotAccess::Unlocked => write!(f, "unlocked"),
        }
    }
}

/// A bot opened for management.
#[derive(Debug, Clone)]
pub struct BotView {
    bot: Bot,
    access: BotAccess,
    failed_attempts: u32,
    max_attempts: u32,
}

impl BotView {
    /// Open `bot` locked. `max_attempts == 0` disables throttling.
    pub fn open(bot: Bot, max_attempts: u32) -> Self {
        Self {
            bot,
            access: BotAccess::Locked,
            failed_attempts: 0,
            max_attempts,
        }
    }

    pub fn bot(&self) -> &Bot {
        &self.bot
    }

    pub fn access(&self) -> BotAccess {
        self.access
    }

    pub fn is_unlocked(&self) -> bool {
        self.access == BotAccess::Unlocked
    }

    pub fn failed_attempts(&self) -> u32 {
        self.failed_attempts
    }

    /// The bot, only once unlocked.
    pub fn unlocked_bot(&self) -> Result<&Bot, AuthError> {
        match self.access {
            BotAccess::Unlocked => Ok(&self.bot),
            BotAccess::Locked => Err(AuthError::BotLocked),
        }
    }

    /// Refuse further attempts once the failure budget is spent.
    pub(crate) fn check_throttle(&self) -> Result<(), AuthError> {
        if self.max_attempts > 0 && self.failed_attempts >= self.max_attempts {
            return Err(AuthError::TooManyAttempts {
                attempts: self.failed_attempts,
            });
        }
        Ok(())
    }

    /// Apply the result of a password check.
    pub(crate) fn record_attempt(&mut self, verified: bool) -> Result<(), AuthError> {
        if verified {
            self.access = BotAccess::Unlocked;
            return Ok(());
        }
        self.failed_attempts += 1;
        tracing::warn!(
            bot_id = %self.bot.id,
            failed_attempts = self.failed_attempts,
            "bot unlock rejected"
        );
        Err(AuthError::IncorrectBotPassword)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use botforge_types::bot::{BotId, UserType};

    fn view(max: u32) -> BotView {
        BotView::open(
            Bot {
                id: BotId(1),
                company: "Acme".to_string(),
                bot_password_hash: "digest".to_string(),
                website: "w".to_string(),
                user_type: UserType::Business,
                created_at: chrono::Utc::now(),
            },
            max,
        )
    }

    #[test]
    fn test_opens_locked() {
        let v = view(5);
        assert_eq!(v.access(), BotAccess::Locked);
        assert_eq!(v.unlocked_bot().unwrap_err(), AuthError::BotLocked);
    }

    #[test]
    fn test_failed_attempt_stays_locked() {
        let mut v = view(5);
        assert_eq!(
            v.record_attempt(false).unwrap_err(),
            AuthError::IncorrectBotPassword
        );
        assert_eq!(v.access(), BotAccess::Locked);
        assert_eq!(v.failed_attempts(), 1);
    }

    #[test]
    fn test_successful_attempt_unlocks() {
        let mut v = view(5);
        v.record_attempt(true).unwrap();
        assert!(v.is_unlocked());
        assert_eq!(v.unlocked_bot().unwrap().company, "Acme");
    }

    #[test]
    fn test_throttle_after_budget_spent() {
        let mut v = view(2);
        let _ = v.record_attempt(false);
        assert!(v.check_throttle().is_ok());
        let _ = v.record_attempt(false);
        assert_eq!(
            v.check_throttle().unwrap_err(),
            AuthError::TooManyAttempts { attempts: 2 }
        );
    }

    #[test]
    fn test_zero_budget_never_throttles() {
        let mut v = view(0);
        for _ in 0..50 {
            let _ = v.record_attempt(false);
        }
        assert!(v.check_throttle().is_ok());
    }
}
