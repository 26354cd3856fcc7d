//! Reconciliation property tests against the embedded backend.

#![cfg(feature = "sqlite")]

use ps_common::Permission;
use ps_store::seed::{self, ROLE_ADMINISTRATOR, ROLE_AUDITOR, ROLE_USER};
use ps_store::{RoleStore, SqliteRoleStore, StoreError};
use sea_orm::{ConnectOptions, Database};
use std::collections::HashSet;
use uuid::Uuid;

async fn seeded_store() -> SqliteRoleStore {
    let mut options = ConnectOptions::new("sqlite::memory:".to_owned());
    options.max_connections(1).min_connections(1);
    let db = Database::connect(options).await.unwrap();

    let store = SqliteRoleStore::new(db);
    store.init_schema().await.unwrap();

    for (id, name) in seed::demo_roles() {
        store.insert_role(id, name).await.unwrap();
    }
    for permission in seed::demo_permissions() {
        store.insert_permission(&permission).await.unwrap();
    }
    store
}

fn catalog() -> Vec<Permission> {
    seed::demo_permissions()
}

fn ids(permissions: &[Permission]) -> HashSet<Uuid> {
    permissions.iter().map(|p| p.id).collect()
}

async fn assigned_ids(store: &SqliteRoleStore, role_id: Uuid) -> HashSet<Uuid> {
    let roles = store.get_roles().await.unwrap();
    let role = roles.into_iter().find(|r| r.id == role_id).unwrap();
    ids(&role.permissions)
}

#[tokio::test]
async fn roles_without_associations_have_empty_permission_lists() {
    let store = seeded_store().await;

    let roles = store.get_roles().await.unwrap();
    assert_eq!(roles.len(), 3);
    for role in &roles {
        assert!(role.permissions.is_empty());
    }
}

#[tokio::test]
async fn returns_full_permission_catalog() {
    let store = seeded_store().await;

    let permissions = store.get_permissions().await.unwrap();
    assert_eq!(ids(&permissions), ids(&catalog()));
}

#[tokio::test]
async fn assigns_permissions_to_role() {
    let store = seeded_store().await;
    let catalog = catalog();

    let role = store
        .set_permissions_for_role(ROLE_USER, &catalog[..1])
        .await
        .unwrap();

    assert_eq!(role.id, ROLE_USER);
    assert_eq!(role.name, "User");
    assert_eq!(ids(&role.permissions), ids(&catalog[..1]));
    // the returned permission is fully resolved, not just an id
    assert_eq!(role.permissions[0], catalog[0]);
}

#[tokio::test]
async fn replaces_previous_assignment_exactly() {
    let store = seeded_store().await;
    let catalog = catalog();

    store
        .set_permissions_for_role(ROLE_USER, &catalog[..3])
        .await
        .unwrap();
    let role = store
        .set_permissions_for_role(ROLE_USER, &catalog[2..5])
        .await
        .unwrap();

    assert_eq!(ids(&role.permissions), ids(&catalog[2..5]));
    assert_eq!(assigned_ids(&store, ROLE_USER).await, ids(&catalog[2..5]));
}

#[tokio::test]
async fn reconcile_is_idempotent() {
    let store = seeded_store().await;
    let catalog = catalog();

    let first = store
        .set_permissions_for_role(ROLE_ADMINISTRATOR, &catalog[..4])
        .await
        .unwrap();
    let second = store
        .set_permissions_for_role(ROLE_ADMINISTRATOR, &catalog[..4])
        .await
        .unwrap();

    assert_eq!(first, second);
    assert_eq!(
        assigned_ids(&store, ROLE_ADMINISTRATOR).await,
        ids(&catalog[..4])
    );
}

#[tokio::test]
async fn empty_set_clears_all_associations() {
    let store = seeded_store().await;
    let catalog = catalog();

    store
        .set_permissions_for_role(ROLE_AUDITOR, &catalog[..5])
        .await
        .unwrap();
    let role = store
        .set_permissions_for_role(ROLE_AUDITOR, &[])
        .await
        .unwrap();

    assert!(role.permissions.is_empty());
    assert!(assigned_ids(&store, ROLE_AUDITOR).await.is_empty());
}

#[tokio::test]
async fn missing_permissions_are_reported_completely() {
    let store = seeded_store().await;
    let mut desired = catalog();

    let mut ghost_a = desired[0].clone();
    ghost_a.id = Uuid::new_v4();
    let mut ghost_b = desired[1].clone();
    ghost_b.id = Uuid::new_v4();
    desired.truncate(2);
    desired.push(ghost_a.clone());
    desired.push(ghost_b.clone());

    let err = store
        .set_permissions_for_role(ROLE_USER, &desired)
        .await
        .unwrap_err();

    match err {
        StoreError::InvalidPermission { missing } => {
            let missing: HashSet<Uuid> = missing.into_iter().collect();
            assert_eq!(missing, HashSet::from([ghost_a.id, ghost_b.id]));
        }
        other => panic!("expected InvalidPermission, got {other:?}"),
    }
}

#[tokio::test]
async fn failed_referential_check_has_no_partial_effect() {
    let store = seeded_store().await;
    let catalog = catalog();

    store
        .set_permissions_for_role(ROLE_USER, &catalog[..2])
        .await
        .unwrap();

    let mut ghost = catalog[5].clone();
    ghost.id = Uuid::new_v4();
    let desired = vec![catalog[3].clone(), ghost];

    let err = store
        .set_permissions_for_role(ROLE_USER, &desired)
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::InvalidPermission { .. }));

    // prior associations survive untouched
    assert_eq!(assigned_ids(&store, ROLE_USER).await, ids(&catalog[..2]));
}

#[tokio::test]
async fn unknown_role_fails_without_side_effects() {
    let store = seeded_store().await;
    let catalog = catalog();
    let unknown = Uuid::new_v4();

    let err = store
        .set_permissions_for_role(unknown, &catalog[..1])
        .await
        .unwrap_err();
    match err {
        StoreError::RoleNotFound { id } => assert_eq!(id, unknown),
        other => panic!("expected RoleNotFound, got {other:?}"),
    }

    for role in store.get_roles().await.unwrap() {
        assert!(role.permissions.is_empty());
    }
}

#[tokio::test]
async fn duplicate_desired_ids_collapse_to_one_association() {
    let store = seeded_store().await;
    let catalog = catalog();

    let desired = vec![catalog[0].clone(), catalog[0].clone(), catalog[1].clone()];
    let role = store
        .set_permissions_for_role(ROLE_USER, &desired)
        .await
        .unwrap();

    assert_eq!(role.permissions.len(), 2);
    assert_eq!(ids(&role.permissions), ids(&catalog[..2]));
}

#[tokio::test]
async fn reconciling_one_role_leaves_others_alone() {
    let store = seeded_store().await;
    let catalog = catalog();

    store
        .set_permissions_for_role(ROLE_USER, &catalog[..2])
        .await
        .unwrap();
    store
        .set_permissions_for_role(ROLE_ADMINISTRATOR, &catalog[2..4])
        .await
        .unwrap();
    store
        .set_permissions_for_role(ROLE_USER, &[])
        .await
        .unwrap();

    assert_eq!(
        assigned_ids(&store, ROLE_ADMINISTRATOR).await,
        ids(&catalog[2..4])
    );
}
