//! Pool placement: membership check and gated account relocation.

use tracing::{info, warn};

use fleetpool_org::error::{OrgApiError, OrgResult};
use fleetpool_org::ids::{AccountId, OrgUnitId};
use fleetpool_org::traits::OrgTreeService;

use crate::account::Account;
use crate::ancestry::walk_ancestors;

/// Check whether an account sits directly under the pool OU.
///
/// Only a direct child of the pool OU counts: the walk must terminate at
/// the pool OU after exactly one hop. Deeper nesting under the pool OU is
/// not compliant and triggers a move. Membership is advisory - walker
/// errors and root-reached walks both report "not in pool" rather than
/// failing the run.
pub async fn is_in_pool_ou(
    tree: &dyn OrgTreeService,
    account: &Account,
    pool_ou: &OrgUnitId,
) -> bool {
    let Some(cloud_id) = &account.cloud_id else {
        return false;
    };
    if cloud_id.is_empty() {
        return false;
    }

    match walk_ancestors(tree, cloud_id.as_str(), |ancestor| ancestor == pool_ou).await {
        Ok(path) => path.len() == 1,
        Err(err) => {
            warn!(account = %cloud_id, error = %err, "ancestry walk failed, treating account as not in pool");
            false
        }
    }
}

/// Move an account under the target OU, or log the intended move when the
/// relocation gate is disabled.
///
/// At most one state-mutating call is issued. Re-invoking after a
/// successful move is harmless: the next membership check finds the account
/// correctly parented and the move is skipped.
pub async fn move_to_pool(
    tree: &dyn OrgTreeService,
    account_id: &AccountId,
    target_ou: &OrgUnitId,
    enabled: bool,
) -> OrgResult<()> {
    let parents = tree.list_parents(account_id.as_str()).await.map_err(|err| {
        warn!(account = %account_id, error = %err, "cannot find current parent for account");
        err
    })?;
    let Some(old_ou) = parents.first() else {
        return Err(OrgApiError::parent_not_found(account_id.as_str()));
    };

    if enabled {
        info!(account = %account_id, old_ou = %old_ou, new_ou = %target_ou, "moving account to pool OU");
        tree.reparent(account_id, old_ou, target_ou)
            .await
            .map_err(|err| {
                warn!(account = %account_id, new_ou = %target_ou, error = %err, "could not move account to pool OU");
                err
            })?;
    } else {
        info!(account = %account_id, old_ou = %old_ou, new_ou = %target_ou, "not moving account to pool OU (dry run)");
    }
    Ok(())
}
