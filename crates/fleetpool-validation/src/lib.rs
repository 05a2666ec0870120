//! # Account validation core
//!
//! Enforces organizational placement and ownership-tagging policy on cloud
//! accounts managed by the fleetpool controller. Each reconciliation
//! verifies that an account sits directly under the designated pool OU
//! (relocating it when the relocation gate is enabled), then verifies the
//! account's `owner` tag names the managing shard, and hands a requeue
//! decision back to the invoking framework.
//!
//! All external state lives behind the collaborator traits from
//! [`fleetpool_org`] plus the [`AccountStore`](account::AccountStore) and
//! [`ConfigSource`](config::ConfigSource) traits defined here; the core
//! itself holds no locks and mutates nothing but the shared feature gates.
//!
//! ## Crate Organization
//!
//! - [`account`] - Account entity and read-only store access
//! - [`config`] - Configuration source, sticky feature gates, per-run snapshot
//! - [`ancestry`] - Bounded upward walk through the organization tree
//! - [`placement`] - Pool membership check and gated account mover
//! - [`tags`] - Ownership-tag validation
//! - [`outcome`] - Classified failures and requeue mapping
//! - [`reconciler`] - The orchestrating [`AccountValidator`](reconciler::AccountValidator)

pub mod account;
pub mod ancestry;
pub mod config;
pub mod outcome;
pub mod placement;
pub mod reconciler;
pub mod tags;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::account::{Account, AccountRequest, AccountStore};
    pub use crate::ancestry::{walk_ancestors, AncestryError, MAX_ANCESTRY_DEPTH};
    pub use crate::config::{ConfigSource, FeatureGates, RunConfig};
    pub use crate::outcome::{
        requeue_for, PlacementOutcome, RequeueDecision, ValidationFailure, MOVE_RETRY_WAIT,
    };
    pub use crate::placement::{is_in_pool_ou, move_to_pool};
    pub use crate::reconciler::AccountValidator;
    pub use crate::tags::{validate_owner_tag, OWNER_TAG_KEY};
}
