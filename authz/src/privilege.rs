//! Privilege resolution and implication.

use crate::error::{AclOperation, AuthzError, Result};
use crate::repository::AccessControlManager;
use crate::types::Privilege;
use tracing::debug;

/// Well-known privilege names understood by JCR-style repositories.
pub mod names {
    pub const READ: &str = "jcr:read";
    pub const MODIFY_PROPERTIES: &str = "jcr:modifyProperties";
    pub const ADD_CHILD_NODES: &str = "jcr:addChildNodes";
    pub const REMOVE_NODE: &str = "jcr:removeNode";
    pub const REMOVE_CHILD_NODES: &str = "jcr:removeChildNodes";
    pub const WRITE: &str = "jcr:write";
    pub const READ_ACCESS_CONTROL: &str = "jcr:readAccessControl";
    pub const MODIFY_ACCESS_CONTROL: &str = "jcr:modifyAccessControl";
    pub const LOCK_MANAGEMENT: &str = "jcr:lockManagement";
    pub const VERSION_MANAGEMENT: &str = "jcr:versionManagement";
    pub const NODE_TYPE_MANAGEMENT: &str = "jcr:nodeTypeManagement";
    pub const RETENTION_MANAGEMENT: &str = "jcr:retentionManagement";
    pub const LIFECYCLE_MANAGEMENT: &str = "jcr:lifecycleManagement";
    pub const ALL: &str = "jcr:all";
}

/// Translates privilege names into the repository's descriptors.
///
/// Fails with [`AuthzError::UnknownPrivilege`] on the first name the
/// repository does not know. Repository failures carry no node path; callers
/// acting on a node attach it with [`AuthzError::at_path`].
pub fn resolve<R, S>(repository: &R, names: &[S]) -> Result<Vec<Privilege>>
where
    R: AccessControlManager + ?Sized,
    S: AsRef<str>,
{
    let mut privileges = Vec::with_capacity(names.len());

    for name in names {
        let name = name.as_ref();
        let privilege = repository
            .privilege_from_name(name)
            .map_err(|source| {
                AuthzError::repository_access(None, AclOperation::Resolve, names, source)
            })?
            .ok_or_else(|| AuthzError::UnknownPrivilege(name.to_string()))?;
        privileges.push(privilege);
    }

    debug!("Resolved {} privilege name(s)", privileges.len());
    Ok(privileges)
}

/// Tests if `privilege` implies the named privilege, directly or as an aggregate.
///
/// Aggregates are acyclic by repository contract, so the recursion is bounded
/// by the depth of the aggregate hierarchy.
pub fn implies(privilege: &Privilege, name: &str) -> bool {
    if privilege.name() == name {
        true
    } else if privilege.is_aggregate() {
        implies_any(privilege.aggregate_privileges(), name)
    } else {
        false
    }
}

/// Tests if any of `privileges` implies the named privilege.
pub fn implies_any(privileges: &[Privilege], name: &str) -> bool {
    privileges.iter().any(|privilege| implies(privilege, name))
}
