//! Apply entry operations along the path from a node up to one of its ancestors.
//!
//! Grants are applied ancestor-first: the path is collected bottom-up and the
//! operation runs while unwinding it, so every ancestor already carries the
//! grant when its descendants receive it. Revokes and clears run while
//! walking upward (leaf-first). Both families are order-insensitive for the
//! final state; the order only determines which node an error surfaces on.
//!
//! Because revokes and clears are applied during the walk, an invalid target
//! is detected only after every node below the root has been processed.
//! Those changes are not undone.

use crate::error::{AclOperation, AuthzError, Result};
use crate::repository::{ContentRepository, RepositoryError};
use crate::types::PrincipalName;
use crate::AuthzEngine;
use tracing::info;

impl<R: ContentRepository + ?Sized> AuthzEngine<'_, R> {
    /// Grants the named privileges on every node from `start` up to `target`, inclusive.
    ///
    /// Returns `true` if at least one node changed. Fails with
    /// [`AuthzError::InvalidHierarchy`] before touching any node when
    /// `target` is not an ancestor of (or equal to) `start`.
    pub fn grant_along_path<P, S>(
        &self,
        start: &str,
        principal: &P,
        target: &str,
        names: &[S],
    ) -> Result<bool>
    where
        P: PrincipalName + ?Sized,
        S: AsRef<str>,
    {
        let root = self.repository.root_path();
        let mut stack: Vec<String> = Vec::new();
        let mut current = start.to_string();

        while current != target && current != root {
            let parent = self.parent_of(&current, AclOperation::Grant, names)?;
            stack.push(current);
            current = parent;
        }

        if current == root && target != root {
            return Err(invalid_hierarchy(start, target));
        }
        stack.push(current);

        let privileges = self
            .resolve_privileges(names)
            .map_err(|e| e.at_path(start))?;

        let mut changed = false;
        while let Some(path) = stack.pop() {
            changed |= self.grant(&path, principal, &privileges)?;
        }

        info!(
            "Granted privileges to {} from {} up to {} (changed: {})",
            principal.name(),
            start,
            target,
            changed
        );
        Ok(changed)
    }

    /// Revokes the named privileges on every node from `start` up to `target`, inclusive.
    pub fn revoke_along_path<P, S>(
        &self,
        start: &str,
        principal: &P,
        target: &str,
        names: &[S],
    ) -> Result<bool>
    where
        P: PrincipalName + ?Sized,
        S: AsRef<str>,
    {
        let privileges = self
            .resolve_privileges(names)
            .map_err(|e| e.at_path(start))?;

        let changed = self.walk_upward(start, target, AclOperation::Revoke, names, |path| {
            self.revoke(path, principal, &privileges)
        })?;

        info!(
            "Revoked privileges from {} from {} up to {} (changed: {})",
            principal.name(),
            start,
            target,
            changed
        );
        Ok(changed)
    }

    /// Removes every policy from the nodes between `start` and `target`, inclusive.
    pub fn clear_along_path(&self, start: &str, target: &str) -> Result<bool> {
        let changed = self.walk_upward(start, target, AclOperation::Clear, &[] as &[&str], |path| {
            self.clear(path)
        })?;

        info!("Cleared policies from {} up to {} (changed: {})", start, target, changed);
        Ok(changed)
    }

    /// Applies `apply` to each node while climbing from `start` to `target`.
    fn walk_upward<S, F>(
        &self,
        start: &str,
        target: &str,
        operation: AclOperation,
        names: &[S],
        mut apply: F,
    ) -> Result<bool>
    where
        S: AsRef<str>,
        F: FnMut(&str) -> Result<bool>,
    {
        let root = self.repository.root_path();
        let mut changed = false;
        let mut current = start.to_string();

        while current != target && current != root {
            changed |= apply(&current)?;
            current = self.parent_of(&current, operation, names)?;
        }

        if current == root && target != root {
            return Err(invalid_hierarchy(start, target));
        }

        changed |= apply(&current)?;
        Ok(changed)
    }

    /// Parent of a non-root node; a missing parent means the path is detached.
    fn parent_of<S: AsRef<str>>(
        &self,
        path: &str,
        operation: AclOperation,
        names: &[S],
    ) -> Result<String> {
        let access = |source| AuthzError::repository_access(Some(path), operation, names, source);

        self.repository
            .parent(path)
            .map_err(access)?
            .ok_or_else(|| access(RepositoryError::InvalidPath(path.to_string())))
    }
}

fn invalid_hierarchy(start: &str, target: &str) -> AuthzError {
    AuthzError::InvalidHierarchy {
        start: start.to_string(),
        target: target.to_string(),
    }
}
