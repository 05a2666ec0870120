//! Account validation reconciliation tests
//!
//! End-to-end coverage of the `AccountValidator` over manual mock
//! collaborators:
//! - pool membership (one-hop rule, disjoint subtrees)
//! - gated account relocation and its failure path
//! - ownership-tag classification
//! - out-of-scope accounts and configuration faults
//! - requeue decisions for every terminal classification

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use fleetpool_org::error::{OrgApiError, OrgResult};
use fleetpool_org::ids::{AccountId, OrgUnitId};
use fleetpool_org::traits::{AccountTagService, OrgTreeService};
use fleetpool_validation::account::{Account, AccountRequest, AccountStore};
use fleetpool_validation::config::{
    ConfigSource, KEY_FEATURE_MOVE, KEY_POOL_OU, KEY_SHARD_NAME,
};
use fleetpool_validation::outcome::RequeueDecision;
use fleetpool_validation::reconciler::AccountValidator;

// =============================================================================
// Manual mock collaborators
// =============================================================================

/// In-memory organization: parent links plus per-account tags, with call
/// counters and configurable reparent failure.
struct TestOrg {
    parents: Mutex<HashMap<String, Vec<String>>>,
    tags: HashMap<String, String>,
    list_parents_calls: AtomicUsize,
    reparent_calls: AtomicUsize,
    list_tags_calls: AtomicUsize,
    fail_reparent: AtomicBool,
}

impl TestOrg {
    fn new(edges: &[(&str, &str)], tags: &[(&str, &str)]) -> Self {
        let mut parents: HashMap<String, Vec<String>> = HashMap::new();
        for (child, parent) in edges {
            parents
                .entry(child.to_string())
                .or_default()
                .push(parent.to_string());
        }
        Self {
            parents: Mutex::new(parents),
            tags: tags
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            list_parents_calls: AtomicUsize::new(0),
            reparent_calls: AtomicUsize::new(0),
            list_tags_calls: AtomicUsize::new(0),
            fail_reparent: AtomicBool::new(false),
        }
    }

    fn with_reparent_error(self) -> Self {
        self.fail_reparent.store(true, Ordering::SeqCst);
        self
    }

    fn reparent_calls(&self) -> usize {
        self.reparent_calls.load(Ordering::SeqCst)
    }

    fn list_tags_calls(&self) -> usize {
        self.list_tags_calls.load(Ordering::SeqCst)
    }

    fn list_parents_calls(&self) -> usize {
        self.list_parents_calls.load(Ordering::SeqCst)
    }

    fn parent_of(&self, child: &str) -> Option<String> {
        self.parents
            .lock()
            .unwrap()
            .get(child)
            .and_then(|p| p.first().cloned())
    }
}

#[async_trait]
impl OrgTreeService for TestOrg {
    async fn list_parents(&self, child_id: &str) -> OrgResult<Vec<OrgUnitId>> {
        self.list_parents_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .parents
            .lock()
            .unwrap()
            .get(child_id)
            .map(|ids| ids.iter().map(|id| OrgUnitId::new(id.as_str())).collect())
            .unwrap_or_default())
    }

    async fn reparent(
        &self,
        account: &AccountId,
        _from: &OrgUnitId,
        to: &OrgUnitId,
    ) -> OrgResult<()> {
        self.reparent_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_reparent.load(Ordering::SeqCst) {
            return Err(OrgApiError::AccessDenied {
                operation: "reparent".to_string(),
            });
        }
        self.parents
            .lock()
            .unwrap()
            .insert(account.as_str().to_string(), vec![to.as_str().to_string()]);
        Ok(())
    }
}

#[async_trait]
impl AccountTagService for TestOrg {
    async fn list_tags(&self, _account: &AccountId) -> OrgResult<HashMap<String, String>> {
        self.list_tags_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.tags.clone())
    }
}

struct TestStore {
    account: Option<Account>,
}

#[async_trait]
impl AccountStore for TestStore {
    async fn get_account(&self, _request: &AccountRequest) -> OrgResult<Option<Account>> {
        Ok(self.account.clone())
    }
}

struct TestConfig {
    map: HashMap<String, String>,
    fail: bool,
}

impl TestConfig {
    fn new(entries: &[(&str, &str)]) -> Self {
        Self {
            map: entries
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            fail: false,
        }
    }

    fn failing() -> Self {
        Self {
            map: HashMap::new(),
            fail: true,
        }
    }
}

#[async_trait]
impl ConfigSource for TestConfig {
    async fn fetch(&self) -> OrgResult<HashMap<String, String>> {
        if self.fail {
            return Err(OrgApiError::connection_failed("config store unreachable"));
        }
        Ok(self.map.clone())
    }
}

// =============================================================================
// Fixture helpers
// =============================================================================

fn request() -> AccountRequest {
    AccountRequest::new("fleet-accounts", "account-0042")
}

fn managed_account(cloud_id: &str) -> Account {
    Account::new(request(), Some(AccountId::new(cloud_id)))
}

fn validator(
    org: Arc<TestOrg>,
    account: Option<Account>,
    config: TestConfig,
) -> AccountValidator {
    AccountValidator::new(
        org.clone(),
        org,
        Arc::new(TestStore { account }),
        Arc::new(config),
    )
}

fn base_config(move_enabled: bool) -> TestConfig {
    TestConfig::new(&[
        (KEY_POOL_OU, "ou-2"),
        (KEY_SHARD_NAME, "shard-1"),
        (KEY_FEATURE_MOVE, if move_enabled { "true" } else { "false" }),
    ])
}

// =============================================================================
// Scenarios
// =============================================================================

#[tokio::test]
async fn account_in_pool_skips_move_and_passes_tag_check() {
    // Chain A -> OU2 -> OU1 (root), pool OU = OU2.
    let org = Arc::new(TestOrg::new(
        &[("111122223333", "ou-2"), ("ou-2", "ou-1")],
        &[("owner", "shard-1")],
    ));
    let v = validator(org.clone(), Some(managed_account("111122223333")), base_config(true));

    let decision = v.reconcile(&request()).await;

    assert_eq!(decision, RequeueDecision::Done);
    assert_eq!(org.reparent_calls(), 0);
    assert_eq!(org.list_tags_calls(), 1);
}

#[tokio::test]
async fn out_of_place_account_is_moved_once_then_tag_checked() {
    // Chain B -> OU9 -> OU1 (root), pool OU = OU2, relocation enabled.
    let org = Arc::new(TestOrg::new(
        &[("111122223333", "ou-9"), ("ou-9", "ou-1")],
        &[("owner", "shard-1")],
    ));
    let v = validator(org.clone(), Some(managed_account("111122223333")), base_config(true));

    let decision = v.reconcile(&request()).await;

    assert_eq!(decision, RequeueDecision::Done);
    assert_eq!(org.reparent_calls(), 1);
    assert_eq!(org.parent_of("111122223333").as_deref(), Some("ou-2"));
    assert_eq!(org.list_tags_calls(), 1);
}

#[tokio::test]
async fn second_reconciliation_after_move_finds_account_in_place() {
    let org = Arc::new(TestOrg::new(
        &[("111122223333", "ou-9"), ("ou-9", "ou-1"), ("ou-2", "ou-1")],
        &[("owner", "shard-1")],
    ));
    let v = validator(org.clone(), Some(managed_account("111122223333")), base_config(true));

    v.reconcile(&request()).await;
    assert_eq!(org.reparent_calls(), 1);

    // The account now sits under ou-2; no further move is issued.
    v.reconcile(&request()).await;
    assert_eq!(org.reparent_calls(), 1);
}

#[tokio::test]
async fn disabled_relocation_gate_never_reparents() {
    let org = Arc::new(TestOrg::new(
        &[("111122223333", "ou-9"), ("ou-9", "ou-1")],
        &[("owner", "shard-1")],
    ));
    let v = validator(org.clone(), Some(managed_account("111122223333")), base_config(false));

    let decision = v.reconcile(&request()).await;

    assert_eq!(decision, RequeueDecision::Done);
    assert_eq!(org.reparent_calls(), 0);
    // Dry run still proceeds to the tag check.
    assert_eq!(org.list_tags_calls(), 1);
}

#[tokio::test]
async fn deeply_nested_account_counts_as_out_of_place() {
    // Still under ou-2, but two hops away: the one-hop rule triggers a move.
    let org = Arc::new(TestOrg::new(
        &[
            ("111122223333", "ou-nested"),
            ("ou-nested", "ou-2"),
            ("ou-2", "ou-1"),
        ],
        &[("owner", "shard-1")],
    ));
    let v = validator(org.clone(), Some(managed_account("111122223333")), base_config(true));

    v.reconcile(&request()).await;

    assert_eq!(org.reparent_calls(), 1);
    assert_eq!(org.parent_of("111122223333").as_deref(), Some("ou-2"));
}

#[tokio::test]
async fn failed_move_requeues_after_backoff_and_skips_tag_check() {
    let org = Arc::new(
        TestOrg::new(
            &[("111122223333", "ou-9"), ("ou-9", "ou-1")],
            &[("owner", "shard-1")],
        )
        .with_reparent_error(),
    );
    let v = validator(org.clone(), Some(managed_account("111122223333")), base_config(true));

    let decision = v.reconcile(&request()).await;

    assert_eq!(
        decision,
        RequeueDecision::After(Duration::from_secs(5 * 60))
    );
    assert_eq!(org.reparent_calls(), 1);
    assert_eq!(org.list_tags_calls(), 0);
}

#[tokio::test]
async fn missing_owner_tag_is_terminal_without_requeue() {
    let org = Arc::new(TestOrg::new(
        &[("111122223333", "ou-2"), ("ou-2", "ou-1")],
        &[("team", "x")],
    ));
    let v = validator(org.clone(), Some(managed_account("111122223333")), base_config(true));

    let decision = v.reconcile(&request()).await;

    assert_eq!(decision, RequeueDecision::Done);
    assert_eq!(org.list_tags_calls(), 1);
}

#[tokio::test]
async fn incorrect_owner_tag_is_terminal_without_requeue() {
    let org = Arc::new(TestOrg::new(
        &[("111122223333", "ou-2"), ("ou-2", "ou-1")],
        &[("owner", "shard-2")],
    ));
    let v = validator(org.clone(), Some(managed_account("111122223333")), base_config(true));

    let decision = v.reconcile(&request()).await;

    assert_eq!(decision, RequeueDecision::Done);
}

#[tokio::test]
async fn byoc_account_is_rejected_before_any_org_traffic() {
    let org = Arc::new(TestOrg::new(&[], &[]));
    let account = managed_account("111122223333").with_byoc(true);
    let v = validator(org.clone(), Some(account), base_config(true));

    let decision = v.reconcile(&request()).await;

    assert_eq!(decision, RequeueDecision::Done);
    assert_eq!(org.list_parents_calls(), 0);
    assert_eq!(org.list_tags_calls(), 0);
}

#[tokio::test]
async fn pool_owned_account_is_rejected_before_any_org_traffic() {
    let org = Arc::new(TestOrg::new(&[], &[]));
    let account = managed_account("111122223333").with_pool_ownership(true);
    let v = validator(org.clone(), Some(account), base_config(true));

    let decision = v.reconcile(&request()).await;

    assert_eq!(decision, RequeueDecision::Done);
    assert_eq!(org.list_parents_calls(), 0);
    assert_eq!(org.list_tags_calls(), 0);
}

#[tokio::test]
async fn missing_account_is_terminal_without_requeue() {
    let org = Arc::new(TestOrg::new(&[], &[]));
    let v = validator(org.clone(), None, base_config(true));

    let decision = v.reconcile(&request()).await;

    assert_eq!(decision, RequeueDecision::Done);
    assert_eq!(org.list_parents_calls(), 0);
}

#[tokio::test]
async fn config_fetch_failure_requeues_after_backoff() {
    let org = Arc::new(TestOrg::new(
        &[("111122223333", "ou-2")],
        &[("owner", "shard-1")],
    ));
    let v = validator(
        org.clone(),
        Some(managed_account("111122223333")),
        TestConfig::failing(),
    );

    let decision = v.reconcile(&request()).await;

    assert_eq!(
        decision,
        RequeueDecision::After(Duration::from_secs(5 * 60))
    );
    assert_eq!(org.list_parents_calls(), 0);
}

#[tokio::test]
async fn missing_pool_ou_key_requeues_after_backoff() {
    let org = Arc::new(TestOrg::new(
        &[("111122223333", "ou-2")],
        &[("owner", "shard-1")],
    ));
    let v = validator(
        org.clone(),
        Some(managed_account("111122223333")),
        TestConfig::new(&[(KEY_SHARD_NAME, "shard-1")]),
    );

    let decision = v.reconcile(&request()).await;

    assert_eq!(
        decision,
        RequeueDecision::After(Duration::from_secs(5 * 60))
    );
    assert_eq!(org.list_parents_calls(), 0);
}

#[tokio::test]
async fn disjoint_subtree_account_triggers_a_move() {
    // The walk from the account exhausts at a root that is not the pool OU.
    let org = Arc::new(TestOrg::new(
        &[
            ("111122223333", "ou-9"),
            ("ou-9", "r-other"),
            ("ou-2", "r-root"),
        ],
        &[("owner", "shard-1")],
    ));
    let v = validator(org.clone(), Some(managed_account("111122223333")), base_config(true));

    v.reconcile(&request()).await;

    assert_eq!(org.reparent_calls(), 1);
    assert_eq!(org.parent_of("111122223333").as_deref(), Some("ou-2"));
}

#[tokio::test]
async fn account_without_cloud_id_cannot_be_placed_and_requeues() {
    // No provider identifier: membership is false and the mover cannot find
    // a current parent, which classifies as a failed move.
    let org = Arc::new(TestOrg::new(&[], &[]));
    let account = Account::new(request(), None);
    let v = validator(org.clone(), Some(account), base_config(true));

    let decision = v.reconcile(&request()).await;

    assert_eq!(
        decision,
        RequeueDecision::After(Duration::from_secs(5 * 60))
    );
    assert_eq!(org.reparent_calls(), 0);
    assert_eq!(org.list_tags_calls(), 0);
}
