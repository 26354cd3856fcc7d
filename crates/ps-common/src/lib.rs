//! PermStore shared domain model.
//!
//! Value types for RBAC policy data. These carry no behavior beyond
//! serialization and the action codec; persistence lives in `ps-store`.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod action;
pub mod logging;

pub use action::{ActionList, AuthenticationAction, ConversionError, DatabaseAction};

/// UUID identifier of a role.
pub type RoleId = Uuid;

/// UUID identifier of a permission.
pub type PermissionId = Uuid;

/// Polarity of a permission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Effect {
    Allow,
    Deny,
}

impl Effect {
    pub fn as_str(&self) -> &'static str {
        match self {
            Effect::Allow => "Allow",
            Effect::Deny => "Deny",
        }
    }

    /// Parse the persisted form. Anything but the two known strings means the
    /// stored row is corrupt, reported as a conversion failure.
    pub fn parse(raw: &str) -> Result<Self, ConversionError> {
        match raw {
            "Allow" => Ok(Effect::Allow),
            "Deny" => Ok(Effect::Deny),
            _ => Err(ConversionError { raw: raw.to_string() }),
        }
    }
}

/// An access rule: an effect applied to a namespaced action list on a resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Permission {
    pub id: PermissionId,
    pub name: String,
    pub effect: Effect,
    /// Non-empty, namespace-homogeneous ordered action list.
    pub action: ActionList,
    pub resource: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A named bundle of permission associations.
///
/// Permissions are held by association, not ownership: the catalog entries are
/// shared between roles, and `permissions` never contains duplicate ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    pub id: RoleId,
    pub name: String,
    pub permissions: Vec<Permission>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn effect_parse_round_trip() {
        assert_eq!(Effect::parse("Allow").unwrap(), Effect::Allow);
        assert_eq!(Effect::parse("Deny").unwrap(), Effect::Deny);
        assert_eq!(Effect::Allow.as_str(), "Allow");
    }

    #[test]
    fn effect_parse_rejects_unknown() {
        let err = Effect::parse("Maybe").unwrap_err();
        assert_eq!(err.raw, "Maybe");
    }

    #[test]
    fn permission_serializes_camel_case() {
        let permission = Permission {
            id: Uuid::nil(),
            name: "Permission 1".to_string(),
            effect: Effect::Allow,
            action: ActionList::Database(vec![DatabaseAction::Read]),
            resource: "Database1".to_string(),
            description: None,
        };
        let json = serde_json::to_value(&permission).unwrap();
        assert_eq!(json["effect"], "Allow");
        assert_eq!(json["action"], serde_json::json!(["db:read"]));
        assert!(json.get("description").is_none());
    }
}
