//! Mapped entities for the embedded backend.
//!
//! The role-permission association is a plain composite-key entity resolved by
//! explicit join, not a traversable object graph.

pub mod permission;
pub mod role;
pub mod role_permission;
