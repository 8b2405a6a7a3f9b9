//! Hierarchical access-control propagation for content repositories.
//!
//! This crate grants, revokes and clears privileges for principals on the
//! nodes of a tree-structured repository, either on a single node, along the
//! path from a node up to one of its ancestors, or across a whole subtree.
//! Grants are unions, revokes are differences, and aggregate privileges are
//! resolved through the repository's privilege descriptors.
//!
//! # Architecture Overview
//!
//! Components, leaves first:
//!
//! 1. **Privilege resolution** ([`privilege`]) maps names to descriptors and
//!    answers implication questions, directly or through aggregates
//! 2. **Entry management** (`AuthzEngine::grant`, `revoke`, `clear`) mutates
//!    the ACL of one node for one principal
//! 3. **Hierarchy walks** (`grant_along_path`, ...) apply an entry operation
//!    between a node and a declared ancestor
//! 4. **Recursive application** (`grant_recursive`, ...) apply an entry
//!    operation to every descendant matching a node-type filter
//! 5. **Consistency guard** ([`guard`]) rejects ACLs that no principal could
//!    ever amend again
//!
//! The host repository is reached only through the traits in [`repository`].
//!
//! # Invariants
//!
//! - At most one entry per principal per ACL; principals are normalized to
//!   their canonical name-only form before entries are composed
//! - An entry's privilege set is never empty; revoking the last privilege
//!   deletes the entry
//! - A newly populated ACL always starts with a full-privilege entry for the
//!   administrator, so it is never created in a frozen state
//!
//! # Example
//!
//! ```rust,ignore
//! use authz::{AuthzEngine, privilege::names};
//!
//! let engine = AuthzEngine::new(&repository);
//! let changed = engine.grant_along_path("/a/b/c", "user1", "/a", &[names::WRITE])?;
//! ```

pub mod config;
pub mod entry;
pub mod error;
pub mod guard;
pub mod hierarchy;
pub mod privilege;
pub mod recursive;
pub mod repository;
pub mod types;

pub use config::AuthzSettings;
pub use error::{AclOperation, AuthzError, Result};
pub use guard::validate_not_frozen;
pub use repository::{
    of_type, AccessControlManager, ContentRepository, ContentTree, NodeTypeFilter,
    RepositoryError, RepositoryResult,
};
pub use types::{AccessControlEntry, AccessControlList, Principal, PrincipalName, Privilege};

/// Applies access-control changes to the nodes of a host repository.
///
/// The engine borrows the repository for its lifetime and keeps no state of
/// its own besides [`AuthzSettings`]. All operations run synchronously on the
/// calling thread.
pub struct AuthzEngine<'r, R: ?Sized> {
    repository: &'r R,
    settings: AuthzSettings,
}

impl<'r, R: ContentRepository + ?Sized> AuthzEngine<'r, R> {
    /// Creates an engine with default settings.
    pub fn new(repository: &'r R) -> Self {
        Self::with_settings(repository, AuthzSettings::default())
    }

    pub fn with_settings(repository: &'r R, settings: AuthzSettings) -> Self {
        Self {
            repository,
            settings,
        }
    }

    pub fn settings(&self) -> &AuthzSettings {
        &self.settings
    }

    pub fn repository(&self) -> &'r R {
        self.repository
    }

    /// Resolves privilege names through the repository.
    pub fn resolve_privileges<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<Privilege>> {
        privilege::resolve(self.repository, names)
    }
}
