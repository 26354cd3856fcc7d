//! PermStore provisioning binary.
//!
//! Loads configuration, connects the selected backend exactly once,
//! creates the RBAC schema, and seeds the demo catalog. The store handle is
//! created here and passed on explicitly; there is no global singleton.

use anyhow::Result;
use ps_config::{AppConfig, BackendKind, ConfigLoader};
use ps_store::{seed, PgRoleStore, RoleService, RoleStore, SqliteRoleStore};
use sea_orm::{ConnectOptions, Database};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    ps_common::logging::init_logging();

    let config = ConfigLoader::new().load()?;
    info!(backend = ?config.backend, "Starting PermStore seeding");

    let store: Arc<dyn RoleStore> = match config.backend {
        BackendKind::Postgres => Arc::new(seed_postgres(&config).await?),
        BackendKind::Sqlite => Arc::new(seed_sqlite(&config).await?),
    };

    // Read back through the service the way callers will.
    let service = RoleService::new(store);
    let roles = service.get_roles().await?;
    let permissions = service.get_permissions().await?;
    info!(
        roles = roles.len(),
        permissions = permissions.len(),
        "Seeding complete"
    );

    Ok(())
}

async fn seed_postgres(config: &AppConfig) -> Result<PgRoleStore> {
    let pool = PgPoolOptions::new()
        .max_connections(config.postgres.max_connections)
        .connect(&config.postgres.url)
        .await?;

    let store = PgRoleStore::new(pool);
    store.init_schema().await?;
    for (id, name) in seed::demo_roles() {
        store.insert_role(id, name).await?;
    }
    for permission in seed::demo_permissions() {
        store.insert_permission(&permission).await?;
    }
    Ok(store)
}

async fn seed_sqlite(config: &AppConfig) -> Result<SqliteRoleStore> {
    let mut options = ConnectOptions::new(config.sqlite.url.clone());
    options.max_connections(1);
    let db = Database::connect(options).await?;

    let store = SqliteRoleStore::new(db);
    store.init_schema().await?;
    for (id, name) in seed::demo_roles() {
        store.insert_role(id, name).await?;
    }
    for permission in seed::demo_permissions() {
        store.insert_permission(&permission).await?;
    }
    Ok(store)
}
