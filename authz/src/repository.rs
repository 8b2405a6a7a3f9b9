//! Capability surface the engine requires from its host repository.
//!
//! Nodes are addressed by path; the engine never holds node handles and never
//! owns node lifetime. Parent/child relationships are resolved through
//! [`ContentTree`] on every step of a walk.
//!
//! # Concurrency contract
//!
//! The engine performs an unsynchronized read-modify-write of a node's ACL:
//! it reads the current policy, computes the new entry set in memory and
//! writes it back with [`AccessControlManager::set_policy`]. Two concurrent
//! mutations of the same path can lose one writer's update. Hosts (or their
//! callers) that need strict consistency must serialize operations per path,
//! for example with a per-path lock or a versioned write in `set_policy`.

use crate::types::{AccessControlList, Privilege};
use thiserror::Error;

/// Failures reported by a host repository.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Node not found: {0}")]
    NodeNotFound(String),

    #[error("Malformed path: {0}")]
    InvalidPath(String),

    /// The node exposes neither an applicable nor an applied policy.
    #[error("No access control policy available for node: {0}")]
    NoPolicyCandidate(String),

    #[error("Repository storage error: {0}")]
    Storage(String),
}

pub type RepositoryResult<T> = std::result::Result<T, RepositoryError>;

/// Tree navigation by path.
pub trait ContentTree {
    /// Path of the repository root node.
    fn root_path(&self) -> &str;

    /// Parent path, or `None` for the root.
    fn parent(&self, path: &str) -> RepositoryResult<Option<String>>;

    /// Child paths in repository order.
    fn children(&self, path: &str) -> RepositoryResult<Vec<String>>;

    /// Primary node type name.
    fn node_type(&self, path: &str) -> RepositoryResult<String>;
}

/// Access-control capability keyed by node path.
pub trait AccessControlManager {
    /// Policies that could be bound to the node but are not yet.
    fn applicable_policies(&self, path: &str) -> RepositoryResult<Vec<AccessControlList>>;

    /// Policies currently bound to the node.
    fn applied_policies(&self, path: &str) -> RepositoryResult<Vec<AccessControlList>>;

    /// Binds (or replaces) the node's policy.
    fn set_policy(&self, path: &str, acl: &AccessControlList) -> RepositoryResult<()>;

    /// Unbinds a policy previously returned by `applied_policies`.
    fn remove_policy(&self, path: &str, acl: &AccessControlList) -> RepositoryResult<()>;

    /// Looks up a privilege descriptor; `Ok(None)` when the name is unknown.
    fn privilege_from_name(&self, name: &str) -> RepositoryResult<Option<Privilege>>;
}

/// Everything the engine needs from a host.
pub trait ContentRepository: ContentTree + AccessControlManager {}

impl<T: ContentTree + AccessControlManager + ?Sized> ContentRepository for T {}

/// Opaque node-type predicate used by recursive operations.
pub type NodeTypeFilter<'a> = dyn Fn(&str) -> bool + 'a;

/// Filter matching nodes whose type is exactly `node_type`.
pub fn of_type(node_type: &str) -> impl Fn(&str) -> bool + '_ {
    move |candidate| candidate == node_type
}
