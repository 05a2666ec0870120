//! # Organizations API surface
//!
//! Core abstractions for talking to the cloud provider's account-grouping
//! (Organizations) service from fleetpool controllers.
//!
//! The validation core never holds a concrete provider client; it works
//! against the capability traits defined here:
//!
//! - [`OrgTreeService`](traits::OrgTreeService) - parent lookups and account
//!   re-parenting in the OU tree
//! - [`AccountTagService`](traits::AccountTagService) - account tag reads
//!
//! ## Crate Organization
//!
//! - [`ids`] - Type-safe identifiers (`AccountId`, `OrgUnitId`)
//! - [`error`] - Error types with transient/permanent classification
//! - [`traits`] - Collaborator capability traits

pub mod error;
pub mod ids;
pub mod traits;

/// Prelude module for convenient imports.
///
/// ```
/// use fleetpool_org::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{OrgApiError, OrgResult};
    pub use crate::ids::{AccountId, OrgUnitId};
    pub use crate::traits::{AccountTagService, OrgTreeService};
}

// Re-export async_trait for trait implementors
pub use async_trait::async_trait;
