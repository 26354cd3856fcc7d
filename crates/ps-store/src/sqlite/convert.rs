//! Entity/domain conversion for the embedded backend.

use crate::error::Result;
use ps_common::{ActionList, Effect, Permission};
use sea_orm::Set;

use super::entities::permission;

/// Rebuild a typed domain permission from its persisted entity, decoding the
/// flattened action list and the effect string.
pub(crate) fn permission_to_domain(model: permission::Model) -> Result<Permission> {
    Ok(Permission {
        id: model.id,
        name: model.name,
        effect: Effect::parse(&model.effect)?,
        action: ActionList::decode(&model.action)?,
        resource: model.resource,
        description: model.description,
    })
}

/// Flatten a domain permission into its persisted entity form.
pub(crate) fn permission_to_model(permission: &Permission) -> permission::ActiveModel {
    permission::ActiveModel {
        id: Set(permission.id),
        name: Set(permission.name.clone()),
        effect: Set(permission.effect.as_str().to_string()),
        action: Set(permission.action.encode()),
        resource: Set(permission.resource.clone()),
        description: Set(permission.description.clone()),
    }
}
