//! Organizations API collaborator traits
//!
//! Capability-based trait definitions for the external services the
//! validation core talks to. Implementations wrap an authenticated provider
//! client; the core only ever sees these contracts.

use async_trait::async_trait;
use std::collections::HashMap;

use crate::error::OrgResult;
use crate::ids::{AccountId, OrgUnitId};

/// Capability for navigating and mutating the organization tree.
///
/// The tree is strictly hierarchical: every node has at most one parent and
/// a node with no parent is a root.
#[async_trait]
pub trait OrgTreeService: Send + Sync {
    /// List the immediate parents of a node.
    ///
    /// `child_id` may name an account or an OU. Under normal operation the
    /// result holds zero entries (the node is a root) or exactly one; more
    /// than one indicates corrupted provider data and is surfaced as a
    /// fault by callers.
    async fn list_parents(&self, child_id: &str) -> OrgResult<Vec<OrgUnitId>>;

    /// Move an account from one OU to another.
    ///
    /// A single state-mutating call. The provider rejects the request if
    /// `from` is not the account's current parent.
    async fn reparent(
        &self,
        account: &AccountId,
        from: &OrgUnitId,
        to: &OrgUnitId,
    ) -> OrgResult<()>;
}

/// Capability for reading the tags attached to an account.
#[async_trait]
pub trait AccountTagService: Send + Sync {
    /// Fetch the full tag set for an account.
    ///
    /// Always fetched fresh from the provider; callers must not cache the
    /// result across reconciliations.
    async fn list_tags(&self, account: &AccountId) -> OrgResult<HashMap<String, String>>;
}
