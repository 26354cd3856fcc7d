//! Action namespaces and the flattened-string codec.
//!
//! Permissions carry an ordered list of actions that all belong to one
//! namespace: database operations (`db:*`) or authentication operations
//! (`ath:*`). Both storage backends persist the list as a single
//! comma-delimited string with no type tag; the namespace is recovered on
//! decode by matching the first token against each namespace's value set.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Delimiter used in the persisted flattened form.
pub const ACTION_DELIMITER: char = ',';

/// Database operation actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DatabaseAction {
    #[serde(rename = "db:read")]
    Read,
    #[serde(rename = "db:write")]
    Write,
    #[serde(rename = "db:update")]
    Update,
    #[serde(rename = "db:delete")]
    Delete,
}

impl DatabaseAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            DatabaseAction::Read => "db:read",
            DatabaseAction::Write => "db:write",
            DatabaseAction::Update => "db:update",
            DatabaseAction::Delete => "db:delete",
        }
    }

    fn parse(token: &str) -> Option<Self> {
        match token {
            "db:read" => Some(DatabaseAction::Read),
            "db:write" => Some(DatabaseAction::Write),
            "db:update" => Some(DatabaseAction::Update),
            "db:delete" => Some(DatabaseAction::Delete),
            _ => None,
        }
    }
}

/// Authentication operation actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuthenticationAction {
    #[serde(rename = "ath:verify")]
    Verify,
    #[serde(rename = "ath:change_password")]
    ChangePassword,
    #[serde(rename = "ath:update_password")]
    ResetPassword,
    #[serde(rename = "ath:create_user")]
    CreateUser,
}

impl AuthenticationAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthenticationAction::Verify => "ath:verify",
            AuthenticationAction::ChangePassword => "ath:change_password",
            AuthenticationAction::ResetPassword => "ath:update_password",
            AuthenticationAction::CreateUser => "ath:create_user",
        }
    }

    fn parse(token: &str) -> Option<Self> {
        match token {
            "ath:verify" => Some(AuthenticationAction::Verify),
            "ath:change_password" => Some(AuthenticationAction::ChangePassword),
            "ath:update_password" => Some(AuthenticationAction::ResetPassword),
            "ath:create_user" => Some(AuthenticationAction::CreateUser),
            _ => None,
        }
    }
}

/// A namespace-homogeneous, ordered action list.
///
/// Mixing namespaces is unrepresentable here, so homogeneity is enforced at
/// encode time by construction. Serializes as a flat array of wire strings
/// (`["db:read", "db:write"]`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ActionList {
    Database(Vec<DatabaseAction>),
    Authentication(Vec<AuthenticationAction>),
}

/// Raised when a persisted action string does not map to a known namespace.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot map persisted action list to a known namespace: {raw}")]
pub struct ConversionError {
    /// The offending persisted string, unmodified.
    pub raw: String,
}

impl ActionList {
    pub fn len(&self) -> usize {
        match self {
            ActionList::Database(actions) => actions.len(),
            ActionList::Authentication(actions) => actions.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Flatten to the persisted delimited form, preserving order.
    pub fn encode(&self) -> String {
        let tokens: Vec<&str> = match self {
            ActionList::Database(actions) => actions.iter().map(|a| a.as_str()).collect(),
            ActionList::Authentication(actions) => actions.iter().map(|a| a.as_str()).collect(),
        };
        tokens.join(&ACTION_DELIMITER.to_string())
    }

    /// Rebuild the typed list from the persisted delimited form.
    ///
    /// The first token selects the namespace; every following token must parse
    /// within it. The original implementation cast the tail unchecked, which
    /// let a mixed list slip through decode; here the whole string is rejected
    /// instead.
    pub fn decode(raw: &str) -> Result<Self, ConversionError> {
        let error = || ConversionError { raw: raw.to_string() };
        let mut tokens = raw.split(ACTION_DELIMITER);
        let first = tokens.next().ok_or_else(error)?;

        if let Some(action) = DatabaseAction::parse(first) {
            let mut actions = vec![action];
            for token in tokens {
                actions.push(DatabaseAction::parse(token).ok_or_else(error)?);
            }
            Ok(ActionList::Database(actions))
        } else if let Some(action) = AuthenticationAction::parse(first) {
            let mut actions = vec![action];
            for token in tokens {
                actions.push(AuthenticationAction::parse(token).ok_or_else(error)?);
            }
            Ok(ActionList::Authentication(actions))
        } else {
            Err(error())
        }
    }
}
