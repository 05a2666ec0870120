//! Classified validation outcomes and their requeue mapping.
//!
//! Every terminal classification of a reconciliation maps to a requeue
//! decision handed back to the invoking framework. Outcomes live only for
//! the duration of one run; nothing here is persisted.

use std::time::Duration;
use thiserror::Error;

use fleetpool_org::error::OrgApiError;

/// Backoff applied before retrying a failed move or configuration fetch.
pub const MOVE_RETRY_WAIT: Duration = Duration::from_secs(5 * 60);

/// Classified failure of a validation run, checked by kind.
#[derive(Debug, Error)]
pub enum ValidationFailure {
    /// The account is out of scope for pool placement (BYOC or already
    /// owned by an account pool). Not a fault; validation simply does not
    /// apply.
    #[error("account is out of scope for validation: {reason}")]
    InvalidAccount { reason: String },

    /// The relocation into the pool OU failed at the provider.
    #[error("account move failed")]
    MoveFailed {
        #[source]
        source: OrgApiError,
    },

    /// The account carries no `owner` tag.
    #[error("account is not tagged with an owner")]
    MissingTag,

    /// The account's `owner` tag names a different shard.
    #[error("account owner tag is {found}, expected {expected}")]
    IncorrectOwnerTag { expected: String, found: String },

    /// Infrastructure fault outside the policy taxonomy (fetch failures
    /// and the like). Logged and terminal for the run.
    #[error("organizations api error")]
    Api {
        #[source]
        source: OrgApiError,
    },
}

impl ValidationFailure {
    /// Convenience constructor for out-of-scope accounts.
    pub fn invalid(reason: impl Into<String>) -> Self {
        ValidationFailure::InvalidAccount {
            reason: reason.into(),
        }
    }
}

/// Successful result of a placement validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementOutcome {
    /// The account already sits directly under the pool OU.
    AlreadyInPool,
    /// The account was out of place and a move was issued (or simulated
    /// under a disabled relocation gate).
    Moved,
}

/// Requeue decision returned to the invoking controller framework.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequeueDecision {
    /// Terminal for now; the framework will not re-run validation absent a
    /// new trigger.
    Done,
    /// Re-run validation after the given backoff.
    After(Duration),
}

impl RequeueDecision {
    /// Decision retrying after the standard move/config backoff window.
    pub fn retry_after_backoff() -> Self {
        RequeueDecision::After(MOVE_RETRY_WAIT)
    }

    /// Whether this decision schedules another run.
    pub fn is_requeue(&self) -> bool {
        matches!(self, RequeueDecision::After(_))
    }
}

/// Map a classified failure to its requeue decision.
///
/// Only a failed move earns a retry: the placement may succeed once the
/// provider recovers. Tag violations are not auto-corrected and
/// out-of-scope accounts never become eligible, so neither requeues.
pub fn requeue_for(failure: &ValidationFailure) -> RequeueDecision {
    match failure {
        ValidationFailure::MoveFailed { .. } => RequeueDecision::retry_after_backoff(),
        ValidationFailure::InvalidAccount { .. }
        | ValidationFailure::MissingTag
        | ValidationFailure::IncorrectOwnerTag { .. }
        | ValidationFailure::Api { .. } => RequeueDecision::Done,
    }
}
