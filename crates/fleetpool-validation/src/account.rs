//! Account entity and store access.
//!
//! Accounts are created and updated by an external controller store; this
//! crate only reads them.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

use fleetpool_org::error::OrgResult;
use fleetpool_org::ids::AccountId;

/// Namespaced key identifying an account resource in the store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccountRequest {
    /// Namespace the account resource lives in.
    pub namespace: String,
    /// Name of the account resource.
    pub name: String,
}

impl AccountRequest {
    /// Create a request key.
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for AccountRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}

/// A cloud account under fleet management.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    /// Store key of the resource.
    pub request: AccountRequest,
    /// Provider-assigned account identifier. None until the account has
    /// been claimed at the provider.
    pub cloud_id: Option<AccountId>,
    /// Bring-your-own-cloud: the account is supplied and owned externally.
    pub byoc: bool,
    /// The account currently belongs to a shared account pool.
    pub owned_by_pool: bool,
}

impl Account {
    /// Create an account record.
    pub fn new(request: AccountRequest, cloud_id: Option<AccountId>) -> Self {
        Self {
            request,
            cloud_id,
            byoc: false,
            owned_by_pool: false,
        }
    }

    /// Mark the account as bring-your-own-cloud.
    #[must_use]
    pub fn with_byoc(mut self, byoc: bool) -> Self {
        self.byoc = byoc;
        self
    }

    /// Mark the account as owned by a shared account pool.
    #[must_use]
    pub fn with_pool_ownership(mut self, owned: bool) -> Self {
        self.owned_by_pool = owned;
        self
    }

    /// Whether this is an externally-owned (bring-your-own-cloud) account.
    pub fn is_byoc(&self) -> bool {
        self.byoc
    }

    /// Whether this account is owned by a shared account pool.
    pub fn is_owned_by_account_pool(&self) -> bool {
        self.owned_by_pool
    }
}

/// Read-only access to account resources.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Fetch an account by its namespaced request key.
    ///
    /// Returns `Ok(None)` when no such resource exists; absence is a
    /// non-retryable condition for the caller.
    async fn get_account(&self, request: &AccountRequest) -> OrgResult<Option<Account>>;
}
