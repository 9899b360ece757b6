use chrono::{DateTime, Utc};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

use crate::knowledge::PdfUpload;

/// Identifier for a bot, derived from its creation time (milliseconds since
/// the Unix epoch).
///
/// Unique within the owning account's bot sequence only. Two accounts may
/// hold bots with the same id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BotId(pub i64);

impl BotId {
    /// Derive an id from a creation timestamp.
    pub fn from_created_at(created_at: &DateTime<Utc>) -> Self {
        Self(created_at.timestamp_millis())
    }
}

impl fmt::Display for BotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for BotId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.trim().parse()?))
    }
}

/// A bot profile owned by an account.
///
/// The bot's access credential is independent of the owner's login
/// credential. Only the one-way digest is ever stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bot {
    pub id: BotId,
    /// Company (display) name. Also the subject of the delete confirmation phrase.
    pub company: String,
    /// One-way digest of the bot access password.
    pub bot_password_hash: String,
    pub website: String,
    pub user_type: UserType,
    pub created_at: DateTime<Utc>,
}

/// Audience segment a bot serves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserType {
    #[default]
    Business,
    Individual,
}

impl fmt::Display for UserType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserType::Business => write!(f, "Business"),
            UserType::Individual => write!(f, "Individual"),
        }
    }
}

impl FromStr for UserType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "business" => Ok(UserType::Business),
            "individual" => Ok(UserType::Individual),
            other => Err(format!("invalid user type: '{other}'")),
        }
    }
}

/// Input for the two-phase bot creation wizard.
///
/// Phase one carries the credential (`company`, `bot_password`,
/// `confirm_password`); phase two carries the knowledge (`website`,
/// `user_type`, optional training text and PDF).
#[derive(Debug)]
pub struct CreateBotRequest {
    pub company: String,
    pub bot_password: SecretString,
    pub confirm_password: SecretString,
    pub website: String,
    pub user_type: UserType,
    pub knowledge_text: Option<String>,
    pub pdf_file: Option<PdfUpload>,
}

/// The exact phrase an operator must type to delete a bot.
///
/// # Examples
///
/// ```
/// use botforge_types::bot::delete_confirmation_phrase;
///
/// assert_eq!(delete_confirmation_phrase("Acme Co"), "DELETE Acme Co");
/// ```
pub fn delete_confirmation_phrase(company: &str) -> String {
    format!("DELETE {company}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_bot_id_from_created_at() {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        assert_eq!(BotId::from_created_at(&at).0, at.timestamp_millis());
    }

    #[test]
    fn test_bot_id_parse() {
        let id: BotId = " 1709294400000 ".parse().unwrap();
        assert_eq!(id, BotId(1_709_294_400_000));
        assert!("abc".parse::<BotId>().is_err());
    }

    #[test]
    fn test_user_type_parse_is_case_insensitive() {
        assert_eq!("business".parse::<UserType>().unwrap(), UserType::Business);
        assert_eq!("INDIVIDUAL".parse::<UserType>().unwrap(), UserType::Individual);
        assert!("enterprise".parse::<UserType>().is_err());
    }

    #[test]
    fn test_bot_serializes_camel_case() {
        let bot = Bot {
            id: BotId(42),
            company: "Acme".to_string(),
            bot_password_hash: "$argon2id$stub".to_string(),
            website: "https://acme.test".to_string(),
            user_type: UserType::Individual,
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        };
        let json = serde_json::to_value(&bot).unwrap();
        assert_eq!(json["id"], 42);
        assert_eq!(json["botPasswordHash"], "$argon2id$stub");
        assert_eq!(json["userType"], "Individual");
        assert!(json.get("createdAt").is_some());
    }

    #[test]
    fn test_delete_confirmation_phrase_is_exact() {
        assert_eq!(delete_confirmation_phrase("Acme"), "DELETE Acme");
        assert_ne!(delete_confirmation_phrase("Acme Co"), "DELETE Acme");
    }
}
