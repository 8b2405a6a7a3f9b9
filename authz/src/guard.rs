//! Frozen-state detection for access control lists.
//!
//! A non-empty ACL in which no entry grants the modify-access-control
//! privilege can never be amended again. The guard is opt-in: call
//! [`validate_not_frozen`] after a write, or enable
//! `AuthzSettings::enforce_consistency` to have the engine validate every
//! ACL before writing it back.

use crate::error::{AuthzError, Result};
use crate::types::AccessControlList;

/// Fails with [`AuthzError::FrozenAcl`] when no entry implies `modify_privilege`.
///
/// An ACL without entries is not considered frozen: nothing has been
/// restricted on it yet.
pub fn validate_not_frozen(acl: &AccessControlList, modify_privilege: &str) -> Result<()> {
    if acl.is_empty() || acl.entries().iter().any(|entry| entry.grants(modify_privilege)) {
        return Ok(());
    }

    Err(AuthzError::FrozenAcl {
        principals: acl
            .entries()
            .iter()
            .map(|entry| entry.principal().name().to_string())
            .collect(),
    })
}
