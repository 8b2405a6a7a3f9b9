//! Apply entry operations to a node and every matching descendant.
//!
//! Only children accepted by the node-type filter are descended into; the
//! starting node itself is always processed. Grants run pre-order (a node
//! before its children). Revokes and clears run post-order so that a node
//! never loses its own entry while descendants below it still hold theirs.

use crate::error::{AclOperation, AuthzError, Result};
use crate::repository::{ContentRepository, NodeTypeFilter};
use crate::types::{Principal, PrincipalName, Privilege};
use crate::AuthzEngine;
use tracing::info;

impl<R: ContentRepository + ?Sized> AuthzEngine<'_, R> {
    /// Grants the named privileges on `path` and every matching descendant.
    pub fn grant_recursive<P, S>(
        &self,
        path: &str,
        filter: &NodeTypeFilter<'_>,
        principal: &P,
        names: &[S],
    ) -> Result<bool>
    where
        P: PrincipalName + ?Sized,
        S: AsRef<str>,
    {
        if names.is_empty() {
            return Ok(false);
        }

        let privileges = self.resolve_privileges(names).map_err(|e| e.at_path(path))?;
        let principal = Principal::canonical(principal);
        let changed = self.grant_subtree(path, filter, &principal, &privileges)?;

        info!(
            "Granted privileges to {} across tree {} (changed: {})",
            principal, path, changed
        );
        Ok(changed)
    }

    /// Revokes the named privileges from every matching descendant, then from `path`.
    pub fn revoke_recursive<P, S>(
        &self,
        path: &str,
        filter: &NodeTypeFilter<'_>,
        principal: &P,
        names: &[S],
    ) -> Result<bool>
    where
        P: PrincipalName + ?Sized,
        S: AsRef<str>,
    {
        if names.is_empty() {
            return Ok(false);
        }

        let privileges = self.resolve_privileges(names).map_err(|e| e.at_path(path))?;
        let principal = Principal::canonical(principal);
        let changed = self.revoke_subtree(path, filter, &principal, &privileges)?;

        info!(
            "Revoked privileges from {} across tree {} (changed: {})",
            principal, path, changed
        );
        Ok(changed)
    }

    /// Clears every matching descendant, then `path` itself.
    pub fn clear_recursive(&self, path: &str, filter: &NodeTypeFilter<'_>) -> Result<bool> {
        let changed = self.clear_subtree(path, filter)?;
        info!("Cleared policies across tree {} (changed: {})", path, changed);
        Ok(changed)
    }

    fn grant_subtree(
        &self,
        path: &str,
        filter: &NodeTypeFilter<'_>,
        principal: &Principal,
        privileges: &[Privilege],
    ) -> Result<bool> {
        let mut changed = self.grant(path, principal, privileges)?;

        for child in self.matching_children(path, filter, AclOperation::Grant, privileges)? {
            changed |= self.grant_subtree(&child, filter, principal, privileges)?;
        }

        Ok(changed)
    }

    fn revoke_subtree(
        &self,
        path: &str,
        filter: &NodeTypeFilter<'_>,
        principal: &Principal,
        privileges: &[Privilege],
    ) -> Result<bool> {
        let mut changed = false;

        for child in self.matching_children(path, filter, AclOperation::Revoke, privileges)? {
            changed |= self.revoke_subtree(&child, filter, principal, privileges)?;
        }

        changed |= self.revoke(path, principal, privileges)?;
        Ok(changed)
    }

    fn clear_subtree(&self, path: &str, filter: &NodeTypeFilter<'_>) -> Result<bool> {
        let mut changed = false;

        for child in self.matching_children(path, filter, AclOperation::Clear, &[] as &[&str])? {
            changed |= self.clear_subtree(&child, filter)?;
        }

        changed |= self.clear(path)?;
        Ok(changed)
    }

    fn matching_children<S: AsRef<str>>(
        &self,
        path: &str,
        filter: &NodeTypeFilter<'_>,
        operation: AclOperation,
        names: &[S],
    ) -> Result<Vec<String>> {
        let access = |source| AuthzError::repository_access(Some(path), operation, names, source);

        let mut matching = Vec::new();
        for child in self.repository.children(path).map_err(access)? {
            let node_type = self.repository.node_type(&child).map_err(access)?;
            if filter(&node_type) {
                matching.push(child);
            }
        }
        Ok(matching)
    }
}
