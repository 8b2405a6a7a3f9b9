//! YAML repository fixtures
//!
//! A fixture seeds a [`MemoryRepository`] with custom privileges, nodes and
//! their access control lists:
//!
//! ```yaml
//! privileges:
//!   - name: tba:accessFeed
//!   - name: tba:editFeed
//!     aggregates: [tba:accessFeed, jcr:write]
//! nodes:
//!   - path: /metadata
//!     type: tba:folder
//!   - path: /metadata/feeds
//!     type: tba:category
//!     acl:
//!       - principal: admin
//!         privileges: [jcr:all]
//!       - principal: analysts
//!         privileges: [tba:accessFeed]
//! ```
//!
//! Nodes may be listed in any order; parents are created before children.
//! Fixtures are read-only seeds; nothing is ever written back to them.

use crate::error::ContentError;
use crate::repository::MemoryRepository;
use crate::utils::{depth, normalize_path};
use authz::{AccessControlList, AccessControlManager, Principal, Privilege};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

/// A custom privilege; `aggregates` makes it an aggregate of existing privileges
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrivilegeDefinition {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggregates: Option<Vec<String>>,
}

/// One access control entry of a node definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryDefinition {
    pub principal: String,
    pub privileges: Vec<String>,
}

/// A node and its optional access control list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeDefinition {
    pub path: String,
    #[serde(rename = "type")]
    pub node_type: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub acl: Vec<EntryDefinition>,
}

/// Declarative description of a repository
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryFixture {
    #[serde(default)]
    pub privileges: Vec<PrivilegeDefinition>,
    #[serde(default)]
    pub nodes: Vec<NodeDefinition>,
}

impl RepositoryFixture {
    /// Parse a fixture from YAML content
    pub fn from_yaml(content: &str) -> Result<Self, ContentError> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Load a fixture from a YAML file
    pub fn from_file(path: &Path) -> Result<Self, ContentError> {
        debug!("Loading repository fixture from: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Build a repository from this fixture
    pub fn load(&self) -> Result<MemoryRepository, ContentError> {
        let repository = MemoryRepository::new();

        for definition in &self.privileges {
            match &definition.aggregates {
                Some(constituents) => {
                    let constituents: Vec<&str> = constituents.iter().map(String::as_str).collect();
                    repository.register_aggregate(&definition.name, &constituents)?;
                }
                None => {
                    repository.register_privilege(&definition.name)?;
                }
            }
        }

        let mut nodes = self
            .nodes
            .iter()
            .map(|node| Ok((normalize_path(&node.path)?, node)))
            .collect::<Result<Vec<_>, ContentError>>()?;
        nodes.sort_by_key(|(path, _)| depth(path));

        for (path, node) in &nodes {
            repository.add_path(path, &node.node_type)?;
        }

        for (path, node) in &nodes {
            if node.acl.is_empty() {
                continue;
            }
            let acl = build_acl(&repository, path, &node.acl)?;
            repository.set_policy(path, &acl)?;
        }

        info!(
            "Loaded fixture with {} node(s) and {} custom privilege(s)",
            nodes.len(),
            self.privileges.len()
        );
        Ok(repository)
    }
}

fn build_acl(
    repository: &MemoryRepository,
    path: &str,
    entries: &[EntryDefinition],
) -> Result<AccessControlList, ContentError> {
    let mut acl = AccessControlList::new();

    for entry in entries {
        if entry.privileges.is_empty() {
            return Err(ContentError::Fixture(format!(
                "Entry for '{}' on {} has no privileges",
                entry.principal, path
            )));
        }

        let privileges = entry
            .privileges
            .iter()
            .map(|name| {
                repository
                    .privilege_from_name(name)?
                    .ok_or_else(|| ContentError::UnknownPrivilege(name.clone()))
            })
            .collect::<Result<Vec<Privilege>, ContentError>>()?;

        acl.add_entry(Principal::new(&entry.principal), &privileges);
    }

    Ok(acl)
}
