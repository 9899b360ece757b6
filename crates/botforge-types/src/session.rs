use serde::{Deserialize, Serialize};

use std::fmt;

/// The authenticated account an operation acts on behalf of.
///
/// Identity is the bare email string: no token, no expiry, no revocation.
/// Passed explicitly into every lifecycle call instead of being read from
/// ambient state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    email: String,
}

impl Session {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
        }
    }

    pub fn email(&self) -> &str {
        &self.email
    }
}

impl fmt::Display for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.email)
    }
}
