//! Ancestry traversal through the organization tree.
//!
//! Walks "get-parent" links upward from a node, accumulating the visited
//! ancestors, until a stopping predicate matches or a root is reached. The
//! walk is an explicit bounded loop; a cyclic or otherwise malformed tree
//! trips the hop guard instead of looping forever.

use thiserror::Error;
use tracing::{info, warn};

use fleetpool_org::error::OrgApiError;
use fleetpool_org::ids::OrgUnitId;
use fleetpool_org::traits::OrgTreeService;

/// Maximum number of upward hops before the walk is abandoned.
///
/// Providers cap OU nesting at single digits; anything near this limit
/// means the tree data is malformed.
pub const MAX_ANCESTRY_DEPTH: usize = 20;

/// Failure while walking the ancestry of a node.
#[derive(Debug, Error)]
pub enum AncestryError {
    /// A hop reported more than one parent. A well-formed tree yields at
    /// most one parent per lookup; this is a data-consistency fault and
    /// the walk is aborted.
    #[error("{count} parents found for node {node}, expected at most 1")]
    MultipleParents { node: String, count: usize },

    /// The hop guard tripped before the predicate matched or a root was
    /// reached, pointing at a cycle or runaway nesting.
    #[error("ancestry walk exceeded {limit} hops")]
    DepthExceeded { limit: usize },

    /// The tree service call itself failed.
    #[error(transparent)]
    Api(#[from] OrgApiError),
}

/// Walk parent links upward from `start_id` until `stop` matches.
///
/// Returns the ordered ancestor path, nearest parent first. Reaching a root
/// (zero parents) without a predicate match is a legitimate terminal case,
/// e.g. disjoint subtrees, and returns the accumulated path as-is. When the
/// predicate matches, the matching ancestor is the last path entry.
pub async fn walk_ancestors<F>(
    tree: &dyn OrgTreeService,
    start_id: &str,
    stop: F,
) -> Result<Vec<OrgUnitId>, AncestryError>
where
    F: Fn(&OrgUnitId) -> bool,
{
    let mut path: Vec<OrgUnitId> = Vec::new();
    let mut current = start_id.to_string();

    loop {
        if path.len() >= MAX_ANCESTRY_DEPTH {
            warn!(start = start_id, limit = MAX_ANCESTRY_DEPTH, "ancestry hop guard tripped");
            return Err(AncestryError::DepthExceeded {
                limit: MAX_ANCESTRY_DEPTH,
            });
        }

        let parents = tree.list_parents(&current).await?;
        match parents.as_slice() {
            [] => {
                info!(
                    start = start_id,
                    path = ?path,
                    "reached a root without matching the predicate, likely disjoint subtrees"
                );
                return Ok(path);
            }
            [parent] => {
                path.push(parent.clone());
                if stop(parent) {
                    return Ok(path);
                }
                current = parent.as_str().to_string();
            }
            many => {
                let count = many.len();
                warn!(node = %current, count, "more than one parent returned for a node");
                return Err(AncestryError::MultipleParents {
                    node: current,
                    count,
                });
            }
        }
    }
}
