//! Grant, revoke and clear privileges for one principal on one node.

use crate::error::{AclOperation, AuthzError, Result};
use crate::guard;
use crate::repository::{ContentRepository, RepositoryError, RepositoryResult};
use crate::types::{AccessControlEntry, AccessControlList, Principal, PrincipalName, Privilege};
use crate::AuthzEngine;
use tracing::{debug, warn};

impl<R: ContentRepository + ?Sized> AuthzEngine<'_, R> {
    /// Adds `privileges` to the principal's entry on `path`.
    ///
    /// An empty privilege set is a no-op. When the node's ACL has no entries
    /// yet, it is first seeded with the full privilege for the administrator.
    /// Returns whether the entry set changed, which includes the case where
    /// only the administrator seed was added.
    pub fn grant<P: PrincipalName + ?Sized>(
        &self,
        path: &str,
        principal: &P,
        privileges: &[Privilege],
    ) -> Result<bool> {
        if privileges.is_empty() {
            return Ok(false);
        }

        let access =
            |source| AuthzError::repository_access(Some(path), AclOperation::Grant, privileges, source);

        let mut acl = self.acl_candidate(path).map_err(access)?;
        let mut changed = false;

        if acl.is_empty() {
            let all = self
                .resolve_privileges(&[self.settings.all_privilege.as_str()])
                .map_err(|e| e.at_path(path))?;
            changed |= acl.add_entry(Principal::new(&self.settings.admin_principal), &all);
            debug!(
                "Seeded ACL on {} with {} for {}",
                path, self.settings.all_privilege, self.settings.admin_principal
            );
        }

        let principal = Principal::canonical(principal);
        changed |= acl.add_entry(principal.clone(), privileges);

        self.check_consistency(path, &acl)?;
        self.repository.set_policy(path, &acl).map_err(access)?;

        debug!(
            "Granted {:?} to {} on {} (changed: {})",
            names_of(privileges),
            principal,
            path,
            changed
        );
        Ok(changed)
    }

    /// Resolves `names` and grants them; empty names never touch the repository.
    pub fn grant_named<P, S>(&self, path: &str, principal: &P, names: &[S]) -> Result<bool>
    where
        P: PrincipalName + ?Sized,
        S: AsRef<str>,
    {
        if names.is_empty() {
            return Ok(false);
        }
        let privileges = self.resolve_privileges(names).map_err(|e| e.at_path(path))?;
        self.grant(path, principal, &privileges)
    }

    /// Removes exactly `privileges` from the principal's entry on `path`.
    ///
    /// Every entry held by the principal is processed, so duplicates left
    /// behind by non-canonical writes are reduced as well. An entry reduced
    /// to nothing is deleted. The ACL is written back only when something was
    /// removed. A node without an applied policy has nothing to revoke.
    pub fn revoke<P: PrincipalName + ?Sized>(
        &self,
        path: &str,
        principal: &P,
        privileges: &[Privilege],
    ) -> Result<bool> {
        if privileges.is_empty() {
            return Ok(false);
        }

        let access =
            |source| AuthzError::repository_access(Some(path), AclOperation::Revoke, privileges, source);

        let Some(policy) = self
            .repository
            .applied_policies(path)
            .map_err(access)?
            .into_iter()
            .next()
        else {
            return Ok(false);
        };

        let principal = Principal::canonical(principal);
        let mut acl = policy.clone();
        let mut changed = false;

        for entry in policy
            .entries()
            .iter()
            .filter(|entry| entry.principal() == &principal)
        {
            let remaining: Vec<Privilege> = entry
                .privileges()
                .iter()
                .filter(|held| !privileges.contains(held))
                .cloned()
                .collect();

            if remaining.len() != entry.privileges().len() {
                acl.remove_entry(entry);
                if !remaining.is_empty() {
                    acl.push_entry(AccessControlEntry::new(entry.principal().clone(), remaining));
                }
                changed = true;
            }
        }

        if changed {
            self.check_consistency(path, &acl)?;
            self.repository.set_policy(path, &acl).map_err(access)?;
        }

        debug!(
            "Revoked {:?} from {} on {} (changed: {})",
            names_of(privileges),
            principal,
            path,
            changed
        );
        Ok(changed)
    }

    /// Resolves `names` and revokes them; empty names never touch the repository.
    pub fn revoke_named<P, S>(&self, path: &str, principal: &P, names: &[S]) -> Result<bool>
    where
        P: PrincipalName + ?Sized,
        S: AsRef<str>,
    {
        if names.is_empty() {
            return Ok(false);
        }
        let privileges = self.resolve_privileges(names).map_err(|e| e.at_path(path))?;
        self.revoke(path, principal, &privileges)
    }

    /// Removes every policy bound to `path`. Returns `true` iff one existed.
    pub fn clear(&self, path: &str) -> Result<bool> {
        let access = |source| {
            AuthzError::repository_access(Some(path), AclOperation::Clear, &[] as &[&str], source)
        };

        let policies = self.repository.applied_policies(path).map_err(access)?;
        if policies.is_empty() {
            return Ok(false);
        }

        for policy in &policies {
            self.repository.remove_policy(path, policy).map_err(access)?;
        }

        debug!("Cleared {} polic(ies) from {}", policies.len(), path);
        Ok(true)
    }

    /// Validates `acl` against the configured modify-access-control privilege.
    pub fn validate_not_frozen(&self, acl: &AccessControlList) -> Result<()> {
        guard::validate_not_frozen(acl, &self.settings.modify_access_control_privilege)
    }

    /// The first applicable policy, else the first applied one.
    fn acl_candidate(&self, path: &str) -> RepositoryResult<AccessControlList> {
        if let Some(acl) = self.repository.applicable_policies(path)?.into_iter().next() {
            return Ok(acl);
        }

        self.repository
            .applied_policies(path)?
            .into_iter()
            .next()
            .ok_or_else(|| RepositoryError::NoPolicyCandidate(path.to_string()))
    }

    fn check_consistency(&self, path: &str, acl: &AccessControlList) -> Result<()> {
        if !self.settings.enforce_consistency {
            return Ok(());
        }

        self.validate_not_frozen(acl).inspect_err(|_| {
            warn!("Rejected ACL update on {}: no entry can modify access control", path);
        })
    }
}

fn names_of(privileges: &[Privilege]) -> Vec<&str> {
    privileges.iter().map(Privilege::name).collect()
}
