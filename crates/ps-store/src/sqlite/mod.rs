//! Embedded SQLite `RoleStore` implementation over sea-orm.
//!
//! Same contract as the relational backend, but persistence goes through
//! mapped entities and the ORM's transaction scope: dropping an uncommitted
//! transaction rolls back all entity mutations.

use crate::error::{Result, StoreError};
use crate::store::RoleStore;
use async_trait::async_trait;
use ps_common::{Permission, Role, RoleId};
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter, Schema, Set,
    TransactionTrait,
};
use std::collections::HashSet;
use tracing::{debug, info};
use uuid::Uuid;

mod convert;
pub mod entities;

use entities::{permission, role, role_permission};

/// Embedded (in-process) role store backed by SQLite through sea-orm.
pub struct SqliteRoleStore {
    db: DatabaseConnection,
}

impl SqliteRoleStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Load one role with its resolved permission list, through any
    /// connection-like handle (pool or open transaction).
    async fn load_role<C: ConnectionTrait>(db: &C, role_id: RoleId) -> Result<Option<Role>> {
        let Some(role) = role::Entity::find_by_id(role_id).one(db).await? else {
            return Ok(None);
        };

        let links = role_permission::Entity::find()
            .filter(role_permission::Column::RoleId.eq(role_id))
            .find_also_related(permission::Entity)
            .all(db)
            .await?;

        let mut permissions = Vec::with_capacity(links.len());
        for (link, permission) in links {
            // The FK guarantees the permission row exists while the link does.
            let permission = permission.ok_or_else(|| {
                StoreError::Server(format!(
                    "association ({}, {}) references a missing permission",
                    link.role_id, link.permission_id
                ))
            })?;
            permissions.push(convert::permission_to_domain(permission)?);
        }

        Ok(Some(Role {
            id: role.id,
            name: role.name,
            permissions,
        }))
    }

    // ========================================================================
    // Provisioning glue (outside the RoleStore contract)
    // ========================================================================

    /// Create tables from the entity definitions if they do not exist.
    pub async fn init_schema(&self) -> Result<()> {
        let backend = self.db.get_database_backend();
        let schema = Schema::new(backend);

        let mut statements = [
            schema.create_table_from_entity(role::Entity),
            schema.create_table_from_entity(permission::Entity),
            schema.create_table_from_entity(role_permission::Entity),
        ];
        for statement in &mut statements {
            statement.if_not_exists();
            self.db.execute(backend.build(&*statement)).await?;
        }

        info!("Initialized SQLite RBAC schema");
        Ok(())
    }

    /// Seed/test helper. Idempotent on the primary key.
    pub async fn insert_role(&self, id: RoleId, name: &str) -> Result<()> {
        role::Entity::insert(role::ActiveModel {
            id: Set(id),
            name: Set(name.to_string()),
        })
        .on_conflict(OnConflict::column(role::Column::Id).do_nothing().to_owned())
        .exec_without_returning(&self.db)
        .await?;
        Ok(())
    }

    /// Seed/test helper. Idempotent on the primary key.
    pub async fn insert_permission(&self, permission: &Permission) -> Result<()> {
        permission::Entity::insert(convert::permission_to_model(permission))
            .on_conflict(
                OnConflict::column(permission::Column::Id)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl RoleStore for SqliteRoleStore {
    async fn get_roles(&self) -> Result<Vec<Role>> {
        let role_models = role::Entity::find().all(&self.db).await?;

        let links = role_permission::Entity::find()
            .find_also_related(permission::Entity)
            .all(&self.db)
            .await?;

        let mut permissions_by_role: std::collections::HashMap<Uuid, Vec<Permission>> =
            std::collections::HashMap::new();
        for (link, permission) in links {
            let permission = permission.ok_or_else(|| {
                StoreError::Server(format!(
                    "association ({}, {}) references a missing permission",
                    link.role_id, link.permission_id
                ))
            })?;
            permissions_by_role
                .entry(link.role_id)
                .or_default()
                .push(convert::permission_to_domain(permission)?);
        }

        let roles: Vec<Role> = role_models
            .into_iter()
            .map(|model| Role {
                permissions: permissions_by_role.remove(&model.id).unwrap_or_default(),
                id: model.id,
                name: model.name,
            })
            .collect();

        debug!(count = roles.len(), "Fetched roles");
        Ok(roles)
    }

    async fn get_permissions(&self) -> Result<Vec<Permission>> {
        let models = permission::Entity::find().all(&self.db).await?;
        models.into_iter().map(convert::permission_to_domain).collect()
    }

    async fn set_permissions_for_role(
        &self,
        role_id: RoleId,
        desired: &[Permission],
    ) -> Result<Role> {
        let desired_ids: Vec<Uuid> = desired.iter().map(|p| p.id).collect();

        // Early returns drop the uncommitted transaction, rolling back all
        // entity mutations.
        let txn = self.db.begin().await?;

        if role::Entity::find_by_id(role_id).one(&txn).await?.is_none() {
            return Err(StoreError::RoleNotFound { id: role_id });
        }

        let known: HashSet<Uuid> = permission::Entity::find()
            .filter(permission::Column::Id.is_in(desired_ids.clone()))
            .all(&txn)
            .await?
            .into_iter()
            .map(|p| p.id)
            .collect();

        let mut seen: HashSet<Uuid> = HashSet::new();
        let missing: Vec<Uuid> = desired_ids
            .iter()
            .filter(|id| !known.contains(id) && seen.insert(**id))
            .copied()
            .collect();
        if !missing.is_empty() {
            return Err(StoreError::InvalidPermission { missing });
        }

        let current: HashSet<Uuid> = role_permission::Entity::find()
            .filter(role_permission::Column::RoleId.eq(role_id))
            .all(&txn)
            .await?
            .into_iter()
            .map(|link| link.permission_id)
            .collect();

        let desired_set: HashSet<Uuid> = desired_ids.iter().copied().collect();

        let mut queued: HashSet<Uuid> = HashSet::new();
        let to_insert: Vec<role_permission::ActiveModel> = desired_ids
            .iter()
            .filter(|id| !current.contains(id) && queued.insert(**id))
            .map(|id| role_permission::ActiveModel {
                role_id: Set(role_id),
                permission_id: Set(*id),
            })
            .collect();
        if !to_insert.is_empty() {
            // Concurrent writers may have created the same rows; the composite
            // key absorbs the duplicates.
            role_permission::Entity::insert_many(to_insert)
                .on_conflict(
                    OnConflict::columns([
                        role_permission::Column::RoleId,
                        role_permission::Column::PermissionId,
                    ])
                    .do_nothing()
                    .to_owned(),
                )
                .exec_without_returning(&txn)
                .await?;
        }

        let to_remove: Vec<Uuid> = current
            .iter()
            .filter(|id| !desired_set.contains(id))
            .copied()
            .collect();
        if !to_remove.is_empty() {
            role_permission::Entity::delete_many()
                .filter(role_permission::Column::RoleId.eq(role_id))
                .filter(role_permission::Column::PermissionId.is_in(to_remove))
                .exec(&txn)
                .await?;
        }

        txn.commit().await?;

        debug!(
            role_id = %role_id,
            desired = desired_set.len(),
            "Reconciled role permissions"
        );

        // The role passed the existence check, so absence here means it was
        // deleted concurrently after commit.
        Self::load_role(&self.db, role_id).await?.ok_or_else(|| {
            StoreError::Server(format!("role {role_id} disappeared after reconciliation"))
        })
    }
}
