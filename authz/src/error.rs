//! Error types for access-control propagation.
//!
//! None of these errors are retried inside the engine. Multi-node operations
//! stop at the first error and leave already-processed nodes in their new
//! state; callers that need atomicity must snapshot and restore externally.

use crate::repository::RepositoryError;
use std::fmt;
use thiserror::Error;

/// The operation that was being attempted when a repository call failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AclOperation {
    Grant,
    Revoke,
    Clear,
    Resolve,
}

impl fmt::Display for AclOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Grant => "grant",
            Self::Revoke => "revoke",
            Self::Clear => "clear",
            Self::Resolve => "resolve",
        };
        f.write_str(name)
    }
}

/// Errors that can occur while granting, revoking or clearing privileges.
#[derive(Debug, Error)]
pub enum AuthzError {
    /// Any failure reported by the host repository.
    #[error(
        "Failed to {operation} privilege(s) {privileges:?} on node {}: {source}",
        .path.as_deref().unwrap_or("<none>")
    )]
    RepositoryAccess {
        path: Option<String>,
        operation: AclOperation,
        privileges: Vec<String>,
        #[source]
        source: RepositoryError,
    },

    /// The declared ancestor is not an ancestor of the start node.
    #[error("Node {target} is not in the hierarchy of node {start}")]
    InvalidHierarchy { start: String, target: String },

    /// The repository has no descriptor for a privilege name.
    #[error("Unknown privilege: {0}")]
    UnknownPrivilege(String),

    /// No entry in the ACL can modify access control.
    #[error("ACL would result in a frozen access control state (principals: {principals:?})")]
    FrozenAcl { principals: Vec<String> },

    /// Settings could not be loaded or are invalid.
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl AuthzError {
    pub(crate) fn repository_access<S: AsRef<str>>(
        path: Option<&str>,
        operation: AclOperation,
        privileges: &[S],
        source: RepositoryError,
    ) -> Self {
        Self::RepositoryAccess {
            path: path.map(str::to_string),
            operation,
            privileges: privileges.iter().map(|p| p.as_ref().to_string()).collect(),
            source,
        }
    }

    /// Attaches a node path to a repository error that was raised without one.
    pub fn at_path(self, node: &str) -> Self {
        match self {
            Self::RepositoryAccess {
                path: None,
                operation,
                privileges,
                source,
            } => Self::RepositoryAccess {
                path: Some(node.to_string()),
                operation,
                privileges,
                source,
            },
            other => other,
        }
    }
}

/// A specialized Result type for access-control operations.
pub type Result<T> = std::result::Result<T, AuthzError>;
