//! PermStore storage layer.
//!
//! One `RoleStore` contract, two interchangeable backends: PostgreSQL through
//! raw sqlx queries with explicit transactions, and embedded SQLite through
//! sea-orm mapped entities. The backend is selected once at process startup
//! and passed to consumers as an explicit `Arc<dyn RoleStore>`.

pub mod error;
pub mod seed;
pub mod service;
pub mod store;

#[cfg(feature = "postgres")]
pub mod postgres;
#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use error::{Result, StoreError};
pub use service::RoleService;
pub use store::RoleStore;

#[cfg(feature = "postgres")]
pub use postgres::PgRoleStore;
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteRoleStore;
