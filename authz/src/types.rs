//! Core access-control types: principals, privileges, entries and lists.
//!
//! # Identity
//!
//! Host repositories are free to represent identities however they like
//! (user principals, group principals, plain names). Stored entries, however,
//! are always read back with a plain name-only principal, so two
//! representations with the same name must be treated as one identity. The
//! engine therefore converts every incoming [`PrincipalName`] into the
//! canonical [`Principal`] before it composes or compares entries.
//!
//! # Privileges
//!
//! A [`Privilege`] is either simple or an aggregate of constituent
//! privileges. Privileges compare and hash by name only; two descriptors with
//! the same name are the same capability regardless of how much of the
//! aggregate tree they carry.

use crate::privilege;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Anything a host repository uses to represent an identity.
pub trait PrincipalName {
    /// The name that uniquely identifies this principal.
    fn name(&self) -> &str;
}

impl PrincipalName for str {
    fn name(&self) -> &str {
        self
    }
}

impl PrincipalName for String {
    fn name(&self) -> &str {
        self.as_str()
    }
}

/// Canonical, name-only principal used inside every access control entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Principal {
    name: String,
}

impl Principal {
    /// Creates a principal with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Normalizes any host representation into the canonical form.
    pub fn canonical<P: PrincipalName + ?Sized>(principal: &P) -> Self {
        Self::new(principal.name())
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl PrincipalName for Principal {
    fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// A named capability, possibly aggregating other privileges.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Privilege {
    name: String,
    /// `None` for simple privileges; `Some` (possibly empty) for aggregates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    aggregates: Option<Vec<Privilege>>,
}

impl Privilege {
    /// Creates a simple (non-aggregate) privilege.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            aggregates: None,
        }
    }

    /// Creates an aggregate privilege from its constituents.
    pub fn aggregate(name: impl Into<String>, constituents: Vec<Privilege>) -> Self {
        Self {
            name: name.into(),
            aggregates: Some(constituents),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_aggregate(&self) -> bool {
        self.aggregates.is_some()
    }

    /// Direct constituents of an aggregate; empty for simple privileges.
    pub fn aggregate_privileges(&self) -> &[Privilege] {
        self.aggregates.as_deref().unwrap_or_default()
    }

    /// Whether this privilege grants `name`, directly or through aggregation.
    pub fn implies(&self, name: &str) -> bool {
        privilege::implies(self, name)
    }
}

impl PartialEq for Privilege {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Privilege {}

impl Hash for Privilege {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl AsRef<str> for Privilege {
    fn as_ref(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Privilege {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// One principal and the privileges it holds on a node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessControlEntry {
    principal: Principal,
    privileges: Vec<Privilege>,
}

impl AccessControlEntry {
    /// Creates an entry, dropping duplicate privileges while keeping order.
    pub fn new(principal: Principal, privileges: Vec<Privilege>) -> Self {
        let mut unique: Vec<Privilege> = Vec::with_capacity(privileges.len());
        for privilege in privileges {
            if !unique.contains(&privilege) {
                unique.push(privilege);
            }
        }
        Self {
            principal,
            privileges: unique,
        }
    }

    pub fn principal(&self) -> &Principal {
        &self.principal
    }

    pub fn privileges(&self) -> &[Privilege] {
        &self.privileges
    }

    pub fn privilege_names(&self) -> Vec<&str> {
        self.privileges.iter().map(Privilege::name).collect()
    }

    /// Whether any privilege of this entry implies `name`.
    pub fn grants(&self, name: &str) -> bool {
        privilege::implies_any(&self.privileges, name)
    }
}

/// Ordered entries attached to a single node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessControlList {
    entries: Vec<AccessControlEntry>,
}

impl AccessControlList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a list from already composed entries, as read back from storage.
    pub fn from_entries(entries: Vec<AccessControlEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[AccessControlEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// First entry held by the principal with the given name.
    pub fn entry_for(&self, principal: &str) -> Option<&AccessControlEntry> {
        self.entries
            .iter()
            .find(|entry| entry.principal.name() == principal)
    }

    /// Merges `privileges` into the principal's entry, creating it if needed.
    ///
    /// Returns `true` when the list changed. Granting privileges the
    /// principal already holds, or an empty set, leaves the list untouched.
    pub fn add_entry(&mut self, principal: Principal, privileges: &[Privilege]) -> bool {
        if privileges.is_empty() {
            return false;
        }

        match self
            .entries
            .iter_mut()
            .find(|entry| entry.principal == principal)
        {
            Some(entry) => {
                let mut changed = false;
                for privilege in privileges {
                    if !entry.privileges.contains(privilege) {
                        entry.privileges.push(privilege.clone());
                        changed = true;
                    }
                }
                changed
            }
            None => {
                self.entries
                    .push(AccessControlEntry::new(principal, privileges.to_vec()));
                true
            }
        }
    }

    /// Removes the first entry equal to `entry`. Returns whether one was found.
    pub fn remove_entry(&mut self, entry: &AccessControlEntry) -> bool {
        match self.entries.iter().position(|candidate| candidate == entry) {
            Some(index) => {
                self.entries.remove(index);
                true
            }
            None => false,
        }
    }

    /// Appends an entry without merging into an existing one.
    pub(crate) fn push_entry(&mut self, entry: AccessControlEntry) {
        self.entries.push(entry);
    }
}
