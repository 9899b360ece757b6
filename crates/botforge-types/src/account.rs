//! Accounts and the persisted aggregate that owns them.

use chrono::{DateTime, Utc};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use std::fmt;

use crate::bot::{Bot, BotId};

/// Identifier for an account, derived from its creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(pub i64);

impl AccountId {
    pub fn from_created_at(created_at: &DateTime<Utc>) -> Self {
        Self(created_at.timestamp_millis())
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A registered operator identity.
///
/// `password_hash` is `None` for accounts that were materialized lazily by
/// creating a bot under an email that never signed up. Such accounts can own
/// bots but cannot log in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: AccountId,
    #[serde(default)]
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub password_hash: Option<String>,
    #[serde(default)]
    pub bots: Vec<Bot>,
}

impl Account {
    /// Account created implicitly when the first bot is added for `email`.
    pub fn materialize(email: &str, now: &DateTime<Utc>) -> Self {
        Self {
            id: AccountId::from_created_at(now),
            name: String::new(),
            email: email.to_string(),
            password_hash: None,
            bots: Vec::new(),
        }
    }

    pub fn bot(&self, id: BotId) -> Option<&Bot> {
        self.bots.iter().find(|b| b.id == id)
    }

    /// Next creation-time-derived bot id that is unique within this account.
    ///
    /// Starts at `now` in milliseconds and steps forward past any id already
    /// taken, so two bots created within the same millisecond still differ.
    pub fn next_bot_id(&self, now: &DateTime<Utc>) -> BotId {
        let mut candidate = BotId::from_created_at(now);
        while self.bot(candidate).is_some() {
            candidate = BotId(candidate.0 + 1);
        }
        candidate
    }

    /// Remove the bot with `id`. Returns the removed bot, leaving siblings in order.
    pub fn remove_bot(&mut self, id: BotId) -> Option<Bot> {
        let idx = self.bots.iter().position(|b| b.id == id)?;
        Some(self.bots.remove(idx))
    }
}

/// The entire persisted application state: every account and its bots.
///
/// Always loaded and saved as one unit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Aggregate {
    pub users: Vec<Account>,
}

impl Aggregate {
    pub fn account(&self, email: &str) -> Option<&Account> {
        self.users.iter().find(|u| u.email == email)
    }

    pub fn account_mut(&mut self, email: &str) -> Option<&mut Account> {
        self.users.iter_mut().find(|u| u.email == email)
    }

    /// Return the account for `email`, appending a passwordless one if absent.
    pub fn account_or_materialize(&mut self, email: &str, now: &DateTime<Utc>) -> &mut Account {
        match self.users.iter().position(|u| u.email == email) {
            Some(idx) => &mut self.users[idx],
            None => {
                self.users.push(Account::materialize(email, now));
                let last = self.users.len() - 1;
                &mut self.users[last]
            }
        }
    }

    pub fn bot_count(&self) -> usize {
        self.users.iter().map(|u| u.bots.len()).sum()
    }
}

/// Signup input.
#[derive(Debug)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: SecretString,
    pub confirm_password: SecretString,
}
