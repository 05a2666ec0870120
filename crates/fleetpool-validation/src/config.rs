//! Controller configuration and feature gates.
//!
//! Configuration is a flat key-value map fetched from an external source at
//! the start of every reconciliation. The two feature gates are sticky:
//! they keep their last known value when a key is absent or unparseable,
//! and both start disabled.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{info, warn};

use fleetpool_org::error::OrgResult;
use fleetpool_org::ids::OrgUnitId;

/// Config key holding the pool OU identifier.
pub const KEY_POOL_OU: &str = "root";
/// Config key gating account relocation.
pub const KEY_FEATURE_MOVE: &str = "feature.validation_move_account";
/// Config key gating owner-tag repair.
pub const KEY_FEATURE_TAG: &str = "feature.validation_tag_account";
/// Config key holding this controller instance's ownership identity.
pub const KEY_SHARD_NAME: &str = "shard-name";

/// External source of controller configuration.
#[async_trait]
pub trait ConfigSource: Send + Sync {
    /// Fetch the current configuration map.
    async fn fetch(&self) -> OrgResult<HashMap<String, String>>;
}

/// Process-wide feature gates, shared across concurrent reconciliations.
///
/// Both gates default to disabled. `apply` is called once per
/// reconciliation with the freshly fetched config map; a missing or
/// malformed key leaves the respective gate at its previous value rather
/// than failing the run.
#[derive(Debug, Default)]
pub struct FeatureGates {
    move_account: AtomicBool,
    tag_account: AtomicBool,
}

impl FeatureGates {
    /// Create gates in their default (disabled) state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether account relocation is enabled.
    pub fn move_enabled(&self) -> bool {
        self.move_account.load(Ordering::SeqCst)
    }

    /// Whether owner-tag repair is enabled.
    pub fn tag_fix_enabled(&self) -> bool {
        self.tag_account.load(Ordering::SeqCst)
    }

    /// Update both gates from a config map, keeping previous values where
    /// a key is absent or does not parse as a boolean.
    pub fn apply(&self, config: &HashMap<String, String>) {
        Self::apply_gate(config, KEY_FEATURE_MOVE, &self.move_account);
        Self::apply_gate(config, KEY_FEATURE_TAG, &self.tag_account);

        info!(
            move_enabled = self.move_enabled(),
            tag_fix_enabled = self.tag_fix_enabled(),
            "feature gates applied"
        );
    }

    fn apply_gate(config: &HashMap<String, String>, key: &str, gate: &AtomicBool) {
        match config.get(key).map(|v| v.parse::<bool>()) {
            Some(Ok(enabled)) => gate.store(enabled, Ordering::SeqCst),
            Some(Err(_)) | None => {
                warn!(key, "feature flag missing or unparseable, keeping previous value");
            }
        }
    }
}

/// Per-invocation configuration snapshot threaded into the orchestrator.
///
/// Derived once per reconciliation so concurrent runs each see a coherent
/// view even while the shared gates are being updated.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// The OU under which pool-managed accounts must directly reside.
    pub pool_ou: OrgUnitId,
    /// Ownership identity of this controller instance.
    pub shard: String,
    /// Whether out-of-place accounts are actually moved (false = dry run).
    pub move_enabled: bool,
    /// Whether owner-tag repair is enabled. Observed but not acted upon;
    /// repair is reserved future behavior.
    pub tag_fix_enabled: bool,
}

impl RunConfig {
    /// Build the snapshot for one reconciliation from a fetched config map
    /// and the current gate state.
    ///
    /// Returns `None` when the pool OU key is absent: without a target OU
    /// there is nothing meaningful to validate against, so the run is
    /// treated like a failed configuration fetch. A missing shard name is
    /// tolerated (the tag check then reports the discrepancy).
    pub fn from_map(config: &HashMap<String, String>, gates: &FeatureGates) -> Option<Self> {
        let pool_ou = match config.get(KEY_POOL_OU) {
            Some(id) if !id.is_empty() => OrgUnitId::new(id.clone()),
            _ => {
                warn!(key = KEY_POOL_OU, "pool OU missing from configuration");
                return None;
            }
        };

        let shard = match config.get(KEY_SHARD_NAME) {
            Some(name) => name.clone(),
            None => {
                warn!(key = KEY_SHARD_NAME, "shard name missing from configuration");
                String::new()
            }
        };

        Some(Self {
            pool_ou,
            shard,
            move_enabled: gates.move_enabled(),
            tag_fix_enabled: gates.tag_fix_enabled(),
        })
    }
}
