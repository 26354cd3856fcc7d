//! The `RoleStore` contract both backends implement.

use crate::error::Result;
use async_trait::async_trait;
use ps_common::{Permission, Role, RoleId};

/// Backend-agnostic storage contract for RBAC policy data.
///
/// One implementation is chosen at process startup and held fixed for the
/// process lifetime; consumers receive it as an explicit `Arc<dyn RoleStore>`.
/// Roles and permissions themselves are created externally (seeding); the
/// store only manages which role-permission associations exist.
#[async_trait]
pub trait RoleStore: Send + Sync {
    /// Every role with its fully resolved permission list. A role with no
    /// associations yields an empty list, never an absent one.
    async fn get_roles(&self) -> Result<Vec<Role>>;

    /// The full permission catalog.
    async fn get_permissions(&self) -> Result<Vec<Permission>>;

    /// Atomically replace the role's associated permission set with the ids of
    /// `desired`. Only the `id` field of each permission is authoritative;
    /// full objects are accepted because callers already hold them.
    ///
    /// Within one transaction: verifies the role exists (`RoleNotFound`),
    /// verifies every desired id against the catalog collecting all missing
    /// ids (`InvalidPermission`), then inserts the missing associations
    /// idempotently and deletes the ones no longer desired. Any failure rolls
    /// the whole transaction back. After commit the role is reloaded and
    /// returned; absence at that point is `Server`.
    async fn set_permissions_for_role(
        &self,
        role_id: RoleId,
        desired: &[Permission],
    ) -> Result<Role>;
}
