//! PostgreSQL `RoleStore` implementation.
//!
//! Direct parameterized queries over a `PgPool`. Reconciliation runs inside an
//! explicit sqlx transaction; batch existence checks use uuid-array
//! parameters. Each query maps into a typed row struct, no dynamic field
//! sniffing.

use crate::error::{Result, StoreError};
use crate::store::RoleStore;
use async_trait::async_trait;
use indexmap::IndexMap;
use ps_common::{ActionList, Effect, Permission, Role, RoleId};
use sqlx::PgPool;
use tracing::{debug, info};
use uuid::Uuid;

/// PostgreSQL-backed role store.
pub struct PgRoleStore {
    pool: PgPool,
}

/// One row of the role/permission left join. Permission columns are null for
/// roles with no associations.
#[derive(sqlx::FromRow)]
struct RoleJoinRow {
    id: Uuid,
    name: String,
    permission_id: Option<Uuid>,
    permission_name: Option<String>,
    effect: Option<String>,
    action: Option<String>,
    resource: Option<String>,
    description: Option<String>,
}

#[derive(sqlx::FromRow)]
struct PermissionRow {
    id: Uuid,
    name: String,
    effect: String,
    action: String,
    resource: String,
    description: Option<String>,
}

impl PermissionRow {
    fn into_domain(self) -> Result<Permission> {
        Ok(Permission {
            id: self.id,
            name: self.name,
            effect: Effect::parse(&self.effect)?,
            action: ActionList::decode(&self.action)?,
            resource: self.resource,
            description: self.description,
        })
    }
}

const ROLE_JOIN_QUERY: &str = "\
    SELECT r.id, r.name, \
           p.id AS permission_id, p.name AS permission_name, \
           p.effect, p.action, p.resource, p.description \
    FROM role r \
    LEFT JOIN role_permission rp ON r.id = rp.role_id \
    LEFT JOIN permission p ON rp.permission_id = p.id";

impl PgRoleStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Fold join rows into roles, keyed by role id in first-encounter order.
    fn fold_roles(rows: Vec<RoleJoinRow>) -> Result<Vec<Role>> {
        let mut roles: IndexMap<Uuid, Role> = IndexMap::new();

        for row in rows {
            let role = roles.entry(row.id).or_insert_with(|| Role {
                id: row.id,
                name: row.name.clone(),
                permissions: Vec::new(),
            });

            if let Some(permission_id) = row.permission_id {
                let effect = row.effect.unwrap_or_default();
                let action = row.action.unwrap_or_default();
                role.permissions.push(Permission {
                    id: permission_id,
                    name: row.permission_name.unwrap_or_default(),
                    effect: Effect::parse(&effect)?,
                    action: ActionList::decode(&action)?,
                    resource: row.resource.unwrap_or_default(),
                    description: row.description,
                });
            }
        }

        Ok(roles.into_values().collect())
    }

    async fn role_by_id(&self, role_id: RoleId) -> Result<Option<Role>> {
        let query = format!("{ROLE_JOIN_QUERY} WHERE r.id = $1");
        let rows: Vec<RoleJoinRow> = sqlx::query_as(&query)
            .bind(role_id)
            .fetch_all(&self.pool)
            .await?;

        if rows.is_empty() {
            return Ok(None);
        }
        Ok(Self::fold_roles(rows)?.into_iter().next())
    }

    // ========================================================================
    // Provisioning glue (outside the RoleStore contract)
    // ========================================================================

    /// Create tables if they do not exist.
    pub async fn init_schema(&self) -> Result<()> {
        let statements = [
            "CREATE TABLE IF NOT EXISTS role (
                id UUID PRIMARY KEY,
                name TEXT NOT NULL
            )",
            "CREATE TABLE IF NOT EXISTS permission (
                id UUID PRIMARY KEY,
                name TEXT NOT NULL,
                effect TEXT NOT NULL,
                action TEXT NOT NULL,
                resource TEXT NOT NULL,
                description TEXT
            )",
            "CREATE TABLE IF NOT EXISTS role_permission (
                role_id UUID NOT NULL REFERENCES role(id) ON DELETE CASCADE,
                permission_id UUID NOT NULL REFERENCES permission(id) ON DELETE CASCADE,
                PRIMARY KEY (role_id, permission_id)
            )",
        ];

        for statement in statements {
            sqlx::query(statement).execute(&self.pool).await?;
        }

        info!("Initialized PostgreSQL RBAC schema");
        Ok(())
    }

    /// Seed/test helper. Idempotent on the primary key.
    pub async fn insert_role(&self, id: RoleId, name: &str) -> Result<()> {
        sqlx::query("INSERT INTO role (id, name) VALUES ($1, $2) ON CONFLICT DO NOTHING")
            .bind(id)
            .bind(name)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Seed/test helper. Idempotent on the primary key.
    pub async fn insert_permission(&self, permission: &Permission) -> Result<()> {
        sqlx::query(
            "INSERT INTO permission (id, name, effect, action, resource, description) \
             VALUES ($1, $2, $3, $4, $5, $6) ON CONFLICT DO NOTHING",
        )
        .bind(permission.id)
        .bind(&permission.name)
        .bind(permission.effect.as_str())
        .bind(permission.action.encode())
        .bind(&permission.resource)
        .bind(&permission.description)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl RoleStore for PgRoleStore {
    async fn get_roles(&self) -> Result<Vec<Role>> {
        let rows: Vec<RoleJoinRow> = sqlx::query_as(ROLE_JOIN_QUERY)
            .fetch_all(&self.pool)
            .await?;

        let roles = Self::fold_roles(rows)?;
        debug!(count = roles.len(), "Fetched roles");
        Ok(roles)
    }

    async fn get_permissions(&self) -> Result<Vec<Permission>> {
        let rows: Vec<PermissionRow> =
            sqlx::query_as("SELECT id, name, effect, action, resource, description FROM permission")
                .fetch_all(&self.pool)
                .await?;

        rows.into_iter().map(PermissionRow::into_domain).collect()
    }

    async fn set_permissions_for_role(
        &self,
        role_id: RoleId,
        desired: &[Permission],
    ) -> Result<Role> {
        let desired_ids: Vec<Uuid> = desired.iter().map(|p| p.id).collect();

        // Dropping the transaction without commit rolls everything back, so
        // every early return below leaves the association table untouched.
        let mut tx = self.pool.begin().await?;

        let exists: Option<Uuid> = sqlx::query_scalar("SELECT id FROM role WHERE id = $1")
            .bind(role_id)
            .fetch_optional(&mut *tx)
            .await?;
        if exists.is_none() {
            return Err(StoreError::RoleNotFound { id: role_id });
        }

        let missing: Vec<Uuid> = sqlx::query_scalar(
            "SELECT unnest($1::uuid[]) \
             EXCEPT \
             SELECT id FROM permission WHERE id = ANY($1::uuid[])",
        )
        .bind(&desired_ids)
        .fetch_all(&mut *tx)
        .await?;
        if !missing.is_empty() {
            return Err(StoreError::InvalidPermission { missing });
        }

        // Desired-but-absent rows; duplicates are absorbed by the composite key.
        sqlx::query(
            "INSERT INTO role_permission (role_id, permission_id) \
             SELECT $1, unnest($2::uuid[]) \
             ON CONFLICT DO NOTHING",
        )
        .bind(role_id)
        .bind(&desired_ids)
        .execute(&mut *tx)
        .await?;

        // Currently-linked rows no longer desired.
        sqlx::query(
            "DELETE FROM role_permission \
             WHERE role_id = $1 AND permission_id <> ALL($2::uuid[])",
        )
        .bind(role_id)
        .bind(&desired_ids)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        debug!(
            role_id = %role_id,
            desired = desired_ids.len(),
            "Reconciled role permissions"
        );

        // The role passed the existence check, so absence here means it was
        // deleted concurrently after commit.
        self.role_by_id(role_id).await?.ok_or_else(|| {
            StoreError::Server(format!("role {role_id} disappeared after reconciliation"))
        })
    }
}
