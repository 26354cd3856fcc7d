//! Reconciliation property tests against PostgreSQL.
//!
//! Ignored by default; run with a live database:
//! `DATABASE_URL=postgres://... cargo test -p ps-store -- --ignored`

#![cfg(feature = "postgres")]

use ps_common::Permission;
use ps_store::seed;
use ps_store::{PgRoleStore, RoleStore, StoreError};
use sqlx::postgres::PgPoolOptions;
use std::collections::HashSet;
use uuid::Uuid;

/// Each test seeds its own roles so runs can share one database.
async fn connect_store() -> PgRoleStore {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for postgres tests");
    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&url)
        .await
        .unwrap();

    let store = PgRoleStore::new(pool);
    store.init_schema().await.unwrap();
    for permission in seed::demo_permissions() {
        store.insert_permission(&permission).await.unwrap();
    }
    store
}

async fn fresh_role(store: &PgRoleStore, name: &str) -> Uuid {
    let id = Uuid::new_v4();
    store.insert_role(id, name).await.unwrap();
    id
}

fn ids(permissions: &[Permission]) -> HashSet<Uuid> {
    permissions.iter().map(|p| p.id).collect()
}

async fn assigned_ids(store: &PgRoleStore, role_id: Uuid) -> HashSet<Uuid> {
    let roles = store.get_roles().await.unwrap();
    let role = roles.into_iter().find(|r| r.id == role_id).unwrap();
    ids(&role.permissions)
}

#[tokio::test]
#[ignore]
async fn exact_replacement_and_idempotence() {
    let store = connect_store().await;
    let catalog = seed::demo_permissions();
    let role_id = fresh_role(&store, "pg-exact").await;

    store
        .set_permissions_for_role(role_id, &catalog[..3])
        .await
        .unwrap();
    let first = store
        .set_permissions_for_role(role_id, &catalog[2..6])
        .await
        .unwrap();
    let second = store
        .set_permissions_for_role(role_id, &catalog[2..6])
        .await
        .unwrap();

    assert_eq!(first, second);
    assert_eq!(ids(&first.permissions), ids(&catalog[2..6]));
    assert_eq!(assigned_ids(&store, role_id).await, ids(&catalog[2..6]));
}

#[tokio::test]
#[ignore]
async fn empty_set_clears_all_associations() {
    let store = connect_store().await;
    let catalog = seed::demo_permissions();
    let role_id = fresh_role(&store, "pg-clear").await;

    store
        .set_permissions_for_role(role_id, &catalog[..4])
        .await
        .unwrap();
    let role = store.set_permissions_for_role(role_id, &[]).await.unwrap();

    assert!(role.permissions.is_empty());
    assert!(assigned_ids(&store, role_id).await.is_empty());
}

#[tokio::test]
#[ignore]
async fn missing_permissions_reported_completely_with_no_partial_effect() {
    let store = connect_store().await;
    let catalog = seed::demo_permissions();
    let role_id = fresh_role(&store, "pg-missing").await;

    store
        .set_permissions_for_role(role_id, &catalog[..2])
        .await
        .unwrap();

    let mut ghost_a = catalog[0].clone();
    ghost_a.id = Uuid::new_v4();
    let mut ghost_b = catalog[1].clone();
    ghost_b.id = Uuid::new_v4();
    let desired = vec![catalog[4].clone(), ghost_a.clone(), ghost_b.clone()];

    let err = store
        .set_permissions_for_role(role_id, &desired)
        .await
        .unwrap_err();
    match err {
        StoreError::InvalidPermission { missing } => {
            let missing: HashSet<Uuid> = missing.into_iter().collect();
            assert_eq!(missing, HashSet::from([ghost_a.id, ghost_b.id]));
        }
        other => panic!("expected InvalidPermission, got {other:?}"),
    }

    assert_eq!(assigned_ids(&store, role_id).await, ids(&catalog[..2]));
}

#[tokio::test]
#[ignore]
async fn unknown_role_fails_with_role_not_found() {
    let store = connect_store().await;
    let catalog = seed::demo_permissions();
    let unknown = Uuid::new_v4();

    let err = store
        .set_permissions_for_role(unknown, &catalog[..1])
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::RoleNotFound { id } if id == unknown));
}

#[tokio::test]
#[ignore]
async fn catalog_round_trips_through_typed_rows() {
    let store = connect_store().await;

    let fetched = store.get_permissions().await.unwrap();
    let fetched_by_id: std::collections::HashMap<Uuid, Permission> =
        fetched.into_iter().map(|p| (p.id, p)).collect();

    for expected in seed::demo_permissions() {
        assert_eq!(fetched_by_id.get(&expected.id), Some(&expected));
    }
}
