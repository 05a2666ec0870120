//! Ownership-tag validation.
//!
//! Every managed account must carry an `owner` tag naming the shard that
//! manages it. The validator classifies violations; it does not repair
//! them. The tag-fix gate is threaded through for that future behavior and
//! is currently only observed.

use tracing::debug;

use fleetpool_org::ids::AccountId;
use fleetpool_org::traits::AccountTagService;

use crate::outcome::ValidationFailure;

/// Tag key recording which shard owns an account.
pub const OWNER_TAG_KEY: &str = "owner";

/// Check that the account carries an `owner` tag matching `expected_owner`.
///
/// The tag set is fetched in full on every call so the check always sees
/// current provider state.
pub async fn validate_owner_tag(
    tags: &dyn AccountTagService,
    account_id: &AccountId,
    expected_owner: &str,
    fix_enabled: bool,
) -> Result<(), ValidationFailure> {
    debug!(account = %account_id, fix_enabled, "validating owner tag");

    let tag_set = tags
        .list_tags(account_id)
        .await
        .map_err(|source| ValidationFailure::Api { source })?;

    match tag_set.get(OWNER_TAG_KEY) {
        Some(owner) if owner == expected_owner => Ok(()),
        Some(owner) => Err(ValidationFailure::IncorrectOwnerTag {
            expected: expected_owner.to_string(),
            found: owner.clone(),
        }),
        None => Err(ValidationFailure::MissingTag),
    }
}
