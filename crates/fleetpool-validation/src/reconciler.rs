//! Reconciling orchestrator for account validation.
//!
//! One reconciliation processes a single account end-to-end:
//! fetch account and configuration, check pool placement (moving the
//! account when out of place and the relocation gate allows it), then
//! check the ownership tag. Each stage can short-circuit the rest with a
//! classified failure, and every terminal classification maps to a requeue
//! decision for the invoking framework.

use std::sync::Arc;
use tracing::{error, info, warn};

use fleetpool_org::ids::AccountId;
use fleetpool_org::traits::{AccountTagService, OrgTreeService};

use crate::account::{Account, AccountRequest, AccountStore};
use crate::config::{ConfigSource, FeatureGates, RunConfig};
use crate::outcome::{requeue_for, PlacementOutcome, RequeueDecision, ValidationFailure};
use crate::placement::{is_in_pool_ou, move_to_pool};
use crate::tags::validate_owner_tag;

/// Validates that managed accounts sit under the pool OU and carry the
/// owning shard's ownership tag.
///
/// Holds no per-account state; the surrounding framework may run
/// reconciliations for different accounts concurrently against one
/// validator instance.
pub struct AccountValidator {
    tree: Arc<dyn OrgTreeService>,
    tags: Arc<dyn AccountTagService>,
    store: Arc<dyn AccountStore>,
    config: Arc<dyn ConfigSource>,
    gates: FeatureGates,
}

impl AccountValidator {
    /// Create a validator over the given collaborators. Feature gates
    /// start disabled and follow the configuration from the first
    /// reconciliation on.
    pub fn new(
        tree: Arc<dyn OrgTreeService>,
        tags: Arc<dyn AccountTagService>,
        store: Arc<dyn AccountStore>,
        config: Arc<dyn ConfigSource>,
    ) -> Self {
        Self {
            tree,
            tags,
            store,
            config,
            gates: FeatureGates::new(),
        }
    }

    /// Run one reconciliation for the account named by `request`.
    pub async fn reconcile(&self, request: &AccountRequest) -> RequeueDecision {
        let account = match self.store.get_account(request).await {
            Ok(Some(account)) => account,
            Ok(None) => {
                error!(request = %request, "account to validate does not exist");
                return RequeueDecision::Done;
            }
            Err(err) => {
                error!(request = %request, error = %err, "could not retrieve account to validate");
                return RequeueDecision::Done;
            }
        };

        let config_map = match self.config.fetch().await {
            Ok(map) => map,
            Err(err) => {
                error!(request = %request, error = %err, "could not retrieve controller configuration");
                return RequeueDecision::retry_after_backoff();
            }
        };
        self.gates.apply(&config_map);
        let Some(run) = RunConfig::from_map(&config_map, &self.gates) else {
            return RequeueDecision::retry_after_backoff();
        };

        match self.validate_placement(&account, &run).await {
            Ok(PlacementOutcome::AlreadyInPool) => {
                info!(request = %request, pool_ou = %run.pool_ou, "account is already in the pool OU");
            }
            Ok(PlacementOutcome::Moved) => {
                info!(request = %request, pool_ou = %run.pool_ou, "account placement reconciled");
            }
            Err(failure) => {
                warn!(request = %request, failure = %failure, "placement validation failed");
                return requeue_for(&failure);
            }
        }

        let cloud_id = account.cloud_id.clone().unwrap_or_else(|| AccountId::new(""));
        match validate_owner_tag(&*self.tags, &cloud_id, &run.shard, run.tag_fix_enabled).await {
            Ok(()) => {
                info!(request = %request, shard = %run.shard, "owner tag is correct");
                RequeueDecision::Done
            }
            Err(failure) => {
                warn!(request = %request, failure = %failure, "owner tag validation failed");
                requeue_for(&failure)
            }
        }
    }

    /// Start -> OU-Check -> (Move)? stage of the run.
    ///
    /// Self-supplied and pool-owned accounts are out of scope and rejected
    /// before any tree traffic.
    async fn validate_placement(
        &self,
        account: &Account,
        run: &RunConfig,
    ) -> Result<PlacementOutcome, ValidationFailure> {
        if account.is_byoc() {
            info!(request = %account.request, "will not validate a bring-your-own-cloud account");
            return Err(ValidationFailure::invalid(
                "account is bring-your-own-cloud",
            ));
        }
        if account.is_owned_by_account_pool() {
            info!(request = %account.request, "will not validate an account owned by an account pool");
            return Err(ValidationFailure::invalid(
                "account is owned by an account pool",
            ));
        }

        if is_in_pool_ou(&*self.tree, account, &run.pool_ou).await {
            return Ok(PlacementOutcome::AlreadyInPool);
        }

        info!(request = %account.request, pool_ou = %run.pool_ou, "account is not in the pool OU, it will be moved");
        let cloud_id = account.cloud_id.clone().unwrap_or_else(|| AccountId::new(""));
        move_to_pool(&*self.tree, &cloud_id, &run.pool_ou, run.move_enabled)
            .await
            .map_err(|source| ValidationFailure::MoveFailed { source })?;
        Ok(PlacementOutcome::Moved)
    }
}
