//! Host principal representations
//!
//! The repository stores entries with the engine's canonical principal, so a
//! user or group written through either type below reads back as a plain
//! name. Both types normalize to the same canonical principal as the name
//! itself.

use authz::PrincipalName;
use serde::{Deserialize, Serialize};

/// An authenticated user, identified by username
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UsernamePrincipal {
    username: String,
}

impl UsernamePrincipal {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
        }
    }
}

impl PrincipalName for UsernamePrincipal {
    fn name(&self) -> &str {
        &self.username
    }
}

/// A group of users, identified by group name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GroupPrincipal {
    group: String,
    /// Optional human-readable title; not part of the identity
    #[serde(default, skip_serializing_if = "Option::is_none")]
    title: Option<String>,
}

impl GroupPrincipal {
    pub fn new(group: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            title: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }
}

impl PrincipalName for GroupPrincipal {
    fn name(&self) -> &str {
        &self.group
    }
}
