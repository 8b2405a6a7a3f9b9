//! Shared fixtures for the engine integration tests.

#![allow(dead_code)]

use authz::{
    AccessControlList, AccessControlManager, ContentTree, Privilege, RepositoryError,
    RepositoryResult,
};
use content::MemoryRepository;
use std::sync::Mutex;

/// `/a/b/c` plus an unrelated `/x`.
pub fn chain() -> MemoryRepository {
    let repository = MemoryRepository::new();
    repository.add_path("/a", "tba:folder").unwrap();
    repository.add_path("/a/b", "tba:folder").unwrap();
    repository.add_path("/a/b/c", "tba:feed").unwrap();
    repository.add_path("/x", "tba:folder").unwrap();
    repository
}

/// A category with feeds and a few nodes that are not feeds.
///
/// ```text
/// /feeds            tba:category
/// /feeds/f1         tba:feed
/// /feeds/f1/tmp     tba:temp
/// /feeds/f1/v1      tba:feed
/// /feeds/f2         tba:feed
/// /feeds/notes      tba:folder
/// ```
pub fn feeds() -> MemoryRepository {
    let repository = MemoryRepository::new();
    repository.add_path("/feeds", "tba:category").unwrap();
    repository.add_path("/feeds/f1", "tba:feed").unwrap();
    repository.add_path("/feeds/f1/tmp", "tba:temp").unwrap();
    repository.add_path("/feeds/f1/v1", "tba:feed").unwrap();
    repository.add_path("/feeds/f2", "tba:feed").unwrap();
    repository.add_path("/feeds/notes", "tba:folder").unwrap();
    repository
}

/// Entry view of a node's ACL: `(principal, privilege names)` in order.
pub fn entries(repository: &MemoryRepository, path: &str) -> Vec<(String, Vec<String>)> {
    repository
        .policy(path)
        .unwrap()
        .map(|acl| {
            acl.entries()
                .iter()
                .map(|entry| {
                    (
                        entry.principal().name().to_string(),
                        entry
                            .privilege_names()
                            .into_iter()
                            .map(str::to_string)
                            .collect(),
                    )
                })
                .collect()
        })
        .unwrap_or_default()
}

pub fn entry(principal: &str, privileges: &[&str]) -> (String, Vec<String>) {
    (
        principal.to_string(),
        privileges.iter().map(|p| p.to_string()).collect(),
    )
}

/// Wraps a [`MemoryRepository`], recording policy writes and injecting failures.
pub struct RecordingRepository {
    pub inner: MemoryRepository,
    writes: Mutex<Vec<String>>,
    fail_on: Option<String>,
    hide_policies: bool,
}

impl RecordingRepository {
    pub fn new(inner: MemoryRepository) -> Self {
        Self {
            inner,
            writes: Mutex::new(Vec::new()),
            fail_on: None,
            hide_policies: false,
        }
    }

    /// Policy writes and removals on `path` fail with a storage error.
    pub fn failing_on(mut self, path: &str) -> Self {
        self.fail_on = Some(path.to_string());
        self
    }

    /// Report neither applicable nor applied policies for any node.
    pub fn without_policies(mut self) -> Self {
        self.hide_policies = true;
        self
    }

    /// Paths written or cleared, in call order.
    pub fn writes(&self) -> Vec<String> {
        self.writes.lock().unwrap().clone()
    }

    fn record(&self, path: &str) -> RepositoryResult<()> {
        if self.fail_on.as_deref() == Some(path) {
            return Err(RepositoryError::Storage(format!("write rejected for {}", path)));
        }
        self.writes.lock().unwrap().push(path.to_string());
        Ok(())
    }
}

impl ContentTree for RecordingRepository {
    fn root_path(&self) -> &str {
        self.inner.root_path()
    }

    fn parent(&self, path: &str) -> RepositoryResult<Option<String>> {
        self.inner.parent(path)
    }

    fn children(&self, path: &str) -> RepositoryResult<Vec<String>> {
        self.inner.children(path)
    }

    fn node_type(&self, path: &str) -> RepositoryResult<String> {
        self.inner.node_type(path)
    }
}

impl AccessControlManager for RecordingRepository {
    fn applicable_policies(&self, path: &str) -> RepositoryResult<Vec<AccessControlList>> {
        if self.hide_policies {
            return Ok(Vec::new());
        }
        self.inner.applicable_policies(path)
    }

    fn applied_policies(&self, path: &str) -> RepositoryResult<Vec<AccessControlList>> {
        if self.hide_policies {
            return Ok(Vec::new());
        }
        self.inner.applied_policies(path)
    }

    fn set_policy(&self, path: &str, acl: &AccessControlList) -> RepositoryResult<()> {
        self.record(path)?;
        self.inner.set_policy(path, acl)
    }

    fn remove_policy(&self, path: &str, acl: &AccessControlList) -> RepositoryResult<()> {
        self.record(path)?;
        self.inner.remove_policy(path, acl)
    }

    fn privilege_from_name(&self, name: &str) -> RepositoryResult<Option<Privilege>> {
        self.inner.privilege_from_name(name)
    }
}
