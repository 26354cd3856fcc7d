//! Storage error taxonomy.

use ps_common::{ConversionError, PermissionId, RoleId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    /// Target role id absent from the role table at validation time.
    #[error("role {id} not found")]
    RoleNotFound { id: RoleId },

    /// One or more desired permission ids absent from the catalog. Carries
    /// every missing id, not just the first.
    #[error("unknown permission ids: {}", format_ids(missing))]
    InvalidPermission { missing: Vec<PermissionId> },

    /// Persisted action string does not map to any known namespace.
    #[error(transparent)]
    Conversion(#[from] ConversionError),

    /// The underlying engine rejected an operation.
    #[error("query failed: {0}")]
    Query(String),

    /// An invariant the store relies on was violated after the fact, e.g. a
    /// role vanished between commit and reload. Concurrency or infrastructure
    /// anomaly, never a caller mistake.
    #[error("store invariant violated: {0}")]
    Server(String),
}

fn format_ids(ids: &[PermissionId]) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(feature = "postgres")]
impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        StoreError::Query(err.to_string())
    }
}

#[cfg(feature = "sqlite")]
impl From<sea_orm::DbErr> for StoreError {
    fn from(err: sea_orm::DbErr) -> Self {
        StoreError::Query(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
