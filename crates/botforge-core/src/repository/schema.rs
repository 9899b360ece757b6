//! Versioned wire format of the persisted aggregate.
//!
//! Current shape (`schemaVersion` 1):
//!
//! ```json
//! {"schemaVersion":1,"users":[{"id":..,"name":..,"email":..,"passwordHash":..,"bots":[..]}]}
//! ```
//!
//! Payloads without `schemaVersion` are the unversioned legacy shape
//! `{"users":[{"email":..,"password":..,"bots":[{"botPass":..}]}]}` and are
//! migrated on decode. Legacy stores could hold the same bot id twice under
//! one owner; the later copies get the next free id. Anything else is
//! reported, never replaced by an empty aggregate.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use botforge_types::account::{Account, AccountId, Aggregate};
use botforge_types::bot::{Bot, BotId, UserType};
use botforge_types::error::PersistenceError;

/// Newest schema version this build reads and the only one it writes.
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EnvelopeRef<'a> {
    schema_version: u32,
    users: &'a [Account],
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct EnvelopeV1 {
    users: Vec<Account>,
}

#[derive(Deserialize)]
struct LegacyAggregate {
    #[serde(default)]
    users: Vec<LegacyUser>,
}

#[derive(Deserialize)]
struct LegacyUser {
    #[serde(default)]
    id: Option<i64>,
    #[serde(default)]
    name: Option<String>,
    email: String,
    #[serde(default)]
    password: Option<String>,
    #[serde(default)]
    bots: Vec<LegacyBot>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacyBot {
    id: i64,
    company: String,
    bot_pass: String,
    #[serde(default)]
    website: String,
    #[serde(default)]
    user_type: Option<UserType>,
    created_at: DateTime<Utc>,
}

/// Serialize an aggregate into the current envelope.
///
/// Output is deterministic: encoding a decoded current-version payload
/// reproduces it byte for byte.
pub fn encode(aggregate: &Aggregate) -> Result<String, PersistenceError> {
    let envelope = EnvelopeRef {
        schema_version: CURRENT_SCHEMA_VERSION,
        users: &aggregate.users,
    };
    serde_json::to_string(&envelope).map_err(|e| PersistenceError::Serialize(e.to_string()))
}

/// Parse a stored payload, migrating older shapes to the current model.
pub fn decode(payload: &str) -> Result<Aggregate, PersistenceError> {
    let value: Value =
        serde_json::from_str(payload).map_err(|e| PersistenceError::Malformed(e.to_string()))?;

    // A stored literal `null` means "nothing saved", same as a missing key.
    if value.is_null() {
        return Ok(Aggregate::default());
    }

    let Some(object) = value.as_object() else {
        return Err(PersistenceError::Malformed(
            "expected a JSON object at the top level".to_string(),
        ));
    };

    let aggregate = match object.get("schemaVersion") {
        None => migrate_legacy(value)?,
        Some(version) => {
            let version = version.as_u64().ok_or_else(|| {
                PersistenceError::Malformed("schemaVersion is not an unsigned integer".to_string())
            })?;
            match version {
                1 => {
                    let envelope: EnvelopeV1 = serde_json::from_value(value)
                        .map_err(|e| PersistenceError::Malformed(e.to_string()))?;
                    Aggregate {
                        users: envelope.users,
                    }
                }
                v if v > u64::from(CURRENT_SCHEMA_VERSION) => {
                    return Err(PersistenceError::UnsupportedVersion {
                        found: u32::try_from(v).unwrap_or(u32::MAX),
                        supported: CURRENT_SCHEMA_VERSION,
                    });
                }
                v => {
                    return Err(PersistenceError::Malformed(format!(
                        "unknown schema version {v}"
                    )));
                }
            }
        }
    };

    check_invariants(&aggregate)?;
    Ok(aggregate)
}

/// Legacy payloads carry `password`/`botPass` fields and may contain
/// lazily-created users with neither `id` nor `name`.
fn migrate_legacy(value: Value) -> Result<Aggregate, PersistenceError> {
    if value.get("users").is_none() {
        return Err(PersistenceError::Malformed(
            "missing 'users' and 'schemaVersion'".to_string(),
        ));
    }
    let legacy: LegacyAggregate = serde_json::from_value(value)
        .map_err(|e| PersistenceError::Malformed(format!("legacy payload: {e}")))?;

    let users = legacy
        .users
        .into_iter()
        .map(|user| {
            let mut bots: Vec<Bot> = user
                .bots
                .into_iter()
                .map(|bot| Bot {
                    id: BotId(bot.id),
                    company: bot.company,
                    bot_password_hash: bot.bot_pass,
                    website: bot.website,
                    user_type: bot.user_type.unwrap_or_default(),
                    created_at: bot.created_at,
                })
                .collect();
            renumber_duplicate_bots(&user.email, &mut bots);
            Account {
                id: AccountId(user.id.unwrap_or_default()),
                name: user.name.unwrap_or_default(),
                email: user.email,
                password_hash: user.password,
                bots,
            }
        })
        .collect();

    tracing::info!("migrated unversioned aggregate to schema version {CURRENT_SCHEMA_VERSION}");
    Ok(Aggregate { users })
}

/// Keep the first bot with a given id and move later ones to the next id not
/// used anywhere in the owner's list.
fn renumber_duplicate_bots(owner: &str, bots: &mut [Bot]) {
    let mut taken: HashSet<BotId> = bots.iter().map(|b| b.id).collect();
    let mut seen = HashSet::new();
    for bot in bots.iter_mut() {
        if seen.insert(bot.id) {
            continue;
        }
        let mut candidate = BotId(bot.id.0 + 1);
        while taken.contains(&candidate) {
            candidate = BotId(candidate.0 + 1);
        }
        tracing::warn!(owner, from = %bot.id, to = %candidate, "renumbered duplicate legacy bot id");
        bot.id = candidate;
        taken.insert(candidate);
        seen.insert(candidate);
    }
}

/// Email unique across accounts; bot id unique within each account.
fn check_invariants(aggregate: &Aggregate) -> Result<(), PersistenceError> {
    let mut emails = HashSet::new();
    for account in &aggregate.users {
        if !emails.insert(account.email.as_str()) {
            return Err(PersistenceError::Malformed(format!(
                "duplicate account email '{}'",
                account.email
            )));
        }
        let mut ids = HashSet::new();
        for bot in &account.bots {
            if !ids.insert(bot.id) {
                return Err(PersistenceError::Malformed(format!(
                    "duplicate bot id {} for '{}'",
                    bot.id, account.email
                )));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample() -> Aggregate {
        Aggregate {
            users: vec![Account {
                id: AccountId(1_700_000_000_000),
                name: "Ada".to_string(),
                email: "ada@example.com".to_string(),
                password_hash: Some("$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA".to_string()),
                bots: vec![Bot {
                    id: BotId(1_700_000_000_123),
                    company: "Acme Co".to_string(),
                    bot_password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$Ym90".to_string(),
                    website: "https://acme.test".to_string(),
                    user_type: UserType::Business,
                    created_at: Utc.timestamp_millis_opt(1_700_000_000_123).unwrap(),
                }],
            }],
        }
    }

    #[test]
    fn test_encode_is_stable_across_decode() {
        let encoded = encode(&sample()).unwrap();
        let reencoded = encode(&decode(&encoded).unwrap()).unwrap();
        assert_eq!(encoded, reencoded);
        assert!(encoded.starts_with(r#"{"schemaVersion":1,"users":["#));
    }

    #[test]
    fn test_decode_legacy_payload() {
        let legacy = r#"{"users":[
            {"id":1700000000000,"name":"Ada","email":"ada@example.com","password":"$2a$10$abcdefghijklmnopqrstuv","bots":[
                {"id":1700000000123,"company":"Acme Co","botPass":"$2a$10$zyxwvutsrqponmlkjihgfe","website":"https://acme.test","userType":"Individual","createdAt":"2023-11-14T22:13:20.123Z"}
            ]},
            {"email":"lazy@example.com","bots":[]}
        ]}"#;
        let aggregate = decode(legacy).unwrap();
        assert_eq!(aggregate.users.len(), 2);

        let ada = &aggregate.users[0];
        assert_eq!(ada.password_hash.as_deref(), Some("$2a$10$abcdefghijklmnopqrstuv"));
        assert_eq!(ada.bots[0].bot_password_hash, "$2a$10$zyxwvutsrqponmlkjihgfe");
        assert_eq!(ada.bots[0].user_type, UserType::Individual);
        assert_eq!(ada.bots[0].created_at.timestamp_millis(), 1_700_000_000_123);

        let lazy = &aggregate.users[1];
        assert_eq!(lazy.id, AccountId(0));
        assert!(lazy.password_hash.is_none());
    }

    #[test]
    fn test_decode_null_is_empty() {
        assert_eq!(decode("null").unwrap(), Aggregate::default());
    }

    #[test]
    fn test_decode_garbage_is_malformed() {
        let err = decode("{not json").unwrap_err();
        assert!(matches!(err, PersistenceError::Malformed(_)));

        let err = decode("[1,2,3]").unwrap_err();
        assert!(matches!(err, PersistenceError::Malformed(_)));

        let err = decode(r#"{"accounts":[]}"#).unwrap_err();
        assert!(matches!(err, PersistenceError::Malformed(_)));
    }

    #[test]
    fn test_decode_future_version_is_unsupported() {
        let err = decode(r#"{"schemaVersion":7,"users":[]}"#).unwrap_err();
        assert!(matches!(
            err,
            PersistenceError::UnsupportedVersion {
                found: 7,
                supported: 1
            }
        ));
    }

    #[test]
    fn test_decode_rejects_duplicate_emails() {
        let payload = r#"{"schemaVersion":1,"users":[
            {"id":1,"name":"","email":"a@example.com","passwordHash":null,"bots":[]},
            {"id":2,"name":"","email":"a@example.com","passwordHash":null,"bots":[]}
        ]}"#;
        assert!(matches!(
            decode(payload).unwrap_err(),
            PersistenceError::Malformed(_)
        ));
    }

    #[test]
    fn test_decode_rejects_duplicate_bot_ids_within_owner() {
        let mut aggregate = sample();
        let dup = aggregate.users[0].bots[0].clone();
        aggregate.users[0].bots.push(dup);
        let payload = encode(&aggregate).unwrap();
        assert!(matches!(
            decode(&payload).unwrap_err(),
            PersistenceError::Malformed(_)
        ));
    }

    #[test]
    fn test_legacy_duplicate_bot_ids_are_renumbered() {
        let legacy = r#"{"users":[{"email":"ada@example.com","bots":[
            {"id":10,"company":"A","botPass":"h1","createdAt":"2023-11-14T22:13:20.010Z"},
            {"id":10,"company":"B","botPass":"h2","createdAt":"2023-11-14T22:13:20.010Z"},
            {"id":11,"company":"C","botPass":"h3","createdAt":"2023-11-14T22:13:20.011Z"},
            {"id":10,"company":"D","botPass":"h4","createdAt":"2023-11-14T22:13:20.010Z"}
        ]}]}"#;
        let aggregate = decode(legacy).unwrap();
        let ids: Vec<i64> = aggregate.users[0].bots.iter().map(|b| b.id.0).collect();
        assert_eq!(ids, vec![10, 12, 11, 13]);
        assert_eq!(aggregate.users[0].bots[1].company, "B");
    }

    #[test]
    fn test_same_bot_id_under_different_owners_is_allowed() {
        let mut aggregate = sample();
        let mut other = aggregate.users[0].clone();
        other.email = "bob@example.com".to_string();
        aggregate.users.push(other);
        let payload = encode(&aggregate).unwrap();
        assert_eq!(decode(&payload).unwrap().users.len(), 2);
    }
}
