//! Thin service layer over the storage contract.

use crate::error::Result;
use crate::store::RoleStore;
use ps_common::{Permission, Role, RoleId};
use std::sync::Arc;
use tracing::instrument;

/// Pass-through orchestrator. Holds whichever backend was selected at process
/// startup; no caching, no retries, those belong to callers.
pub struct RoleService {
    store: Arc<dyn RoleStore>,
}

impl RoleService {
    pub fn new(store: Arc<dyn RoleStore>) -> Self {
        Self { store }
    }

    #[instrument(skip(self))]
    pub async fn get_roles(&self) -> Result<Vec<Role>> {
        self.store.get_roles().await
    }

    #[instrument(skip(self))]
    pub async fn get_permissions(&self) -> Result<Vec<Permission>> {
        self.store.get_permissions().await
    }

    #[instrument(skip(self, permissions), fields(desired = permissions.len()))]
    pub async fn set_permissions_for_role(
        &self,
        role_id: RoleId,
        permissions: &[Permission],
    ) -> Result<Role> {
        self.store.set_permissions_for_role(role_id, permissions).await
    }
}
