//! In-memory content repository
//!
//! Nodes live in an arena keyed by path. Each node holds at most one access
//! control list; a node without one exposes a single empty applicable policy,
//! a node with one exposes it as its only applied policy.
//!
//! Every capability call takes the arena lock independently, so a
//! read-modify-write issued through the engine is not atomic. Callers that
//! mutate the same path from several threads must serialize those calls.

use crate::error::ContentError;
use crate::privileges::standard_privileges;
use crate::utils::{join_path, normalize_path, split_path, validate_name, ROOT_PATH};
use authz::{
    AccessControlList, AccessControlManager, ContentTree, Privilege, RepositoryError,
    RepositoryResult,
};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, info};

/// Node type of the repository root
pub const ROOT_TYPE: &str = "rep:root";

#[derive(Debug, Clone)]
struct NodeRecord {
    node_type: String,
    parent: Option<String>,
    children: Vec<String>,
    policy: Option<AccessControlList>,
}

impl NodeRecord {
    fn new(node_type: &str, parent: Option<String>) -> Self {
        Self {
            node_type: node_type.to_string(),
            parent,
            children: Vec::new(),
            policy: None,
        }
    }
}

/// One entry of an [`AclSnapshot`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntrySnapshot {
    pub principal: String,
    pub privileges: Vec<String>,
}

/// Flattened view of one node's access control list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AclSnapshot {
    pub path: String,
    pub node_type: String,
    pub entries: Vec<EntrySnapshot>,
}

impl AclSnapshot {
    fn new(path: &str, node_type: &str, acl: &AccessControlList) -> Self {
        Self {
            path: path.to_string(),
            node_type: node_type.to_string(),
            entries: acl
                .entries()
                .iter()
                .map(|entry| EntrySnapshot {
                    principal: entry.principal().name().to_string(),
                    privileges: entry
                        .privilege_names()
                        .into_iter()
                        .map(str::to_string)
                        .collect(),
                })
                .collect(),
        }
    }
}

/// Tree of nodes with access control lists, held entirely in memory
#[derive(Debug)]
pub struct MemoryRepository {
    nodes: RwLock<BTreeMap<String, NodeRecord>>,
    privileges: RwLock<HashMap<String, Privilege>>,
}

impl MemoryRepository {
    /// Create a repository containing only the root node and the standard privileges
    pub fn new() -> Self {
        let mut nodes = BTreeMap::new();
        nodes.insert(ROOT_PATH.to_string(), NodeRecord::new(ROOT_TYPE, None));

        let privileges = standard_privileges()
            .into_iter()
            .map(|privilege| (privilege.name().to_string(), privilege))
            .collect();

        Self {
            nodes: RwLock::new(nodes),
            privileges: RwLock::new(privileges),
        }
    }

    /// Add a child node named `name` under `parent`, returning its path
    pub fn add_node(&self, parent: &str, name: &str, node_type: &str) -> Result<String, ContentError> {
        validate_name(name)?;
        let parent = normalize_path(parent)?;
        let path = join_path(&parent, name);

        let mut nodes = self.write_nodes()?;
        if nodes.contains_key(&path) {
            return Err(ContentError::DuplicateNode(path));
        }
        let parent_record = nodes
            .get_mut(&parent)
            .ok_or_else(|| ContentError::NodeNotFound(parent.clone()))?;
        parent_record.children.push(path.clone());
        nodes.insert(path.clone(), NodeRecord::new(node_type, Some(parent)));

        debug!("Added node {} ({})", path, node_type);
        Ok(path)
    }

    /// Add a node at an absolute path whose parent already exists
    pub fn add_path(&self, path: &str, node_type: &str) -> Result<String, ContentError> {
        let path = normalize_path(path)?;
        let (parent, name) = split_path(&path)
            .ok_or_else(|| ContentError::DuplicateNode(ROOT_PATH.to_string()))?;
        self.add_node(parent, name, node_type)
    }

    /// Register a simple privilege
    pub fn register_privilege(&self, name: &str) -> Result<Privilege, ContentError> {
        self.insert_privilege(Privilege::new(name))
    }

    /// Register an aggregate privilege from already registered constituents
    ///
    /// Constituents must exist before the aggregate, which keeps the
    /// aggregate hierarchy acyclic.
    pub fn register_aggregate(
        &self,
        name: &str,
        constituents: &[&str],
    ) -> Result<Privilege, ContentError> {
        let resolved = {
            let privileges = self.read_privileges()?;
            constituents
                .iter()
                .map(|constituent| {
                    privileges
                        .get(*constituent)
                        .cloned()
                        .ok_or_else(|| ContentError::UnknownPrivilege(constituent.to_string()))
                })
                .collect::<Result<Vec<_>, _>>()?
        };
        self.insert_privilege(Privilege::aggregate(name, resolved))
    }

    fn insert_privilege(&self, privilege: Privilege) -> Result<Privilege, ContentError> {
        let mut privileges = self
            .privileges
            .write()
            .map_err(|_| poisoned())?;
        if privileges.contains_key(privilege.name()) {
            return Err(ContentError::DuplicatePrivilege(privilege.name().to_string()));
        }
        privileges.insert(privilege.name().to_string(), privilege.clone());
        info!("Registered privilege {}", privilege);
        Ok(privilege)
    }

    /// Whether a node exists at `path`
    pub fn contains(&self, path: &str) -> bool {
        self.read_nodes()
            .map(|nodes| nodes.contains_key(path))
            .unwrap_or(false)
    }

    /// All node paths in lexical order
    pub fn paths(&self) -> RepositoryResult<Vec<String>> {
        Ok(self.read_nodes()?.keys().cloned().collect())
    }

    /// The access control list currently bound to `path`, if any
    pub fn policy(&self, path: &str) -> RepositoryResult<Option<AccessControlList>> {
        let nodes = self.read_nodes()?;
        Ok(record(&nodes, path)?.policy.clone())
    }

    /// Snapshot of every bound access control list, ordered by path
    pub fn snapshot(&self) -> RepositoryResult<Vec<AclSnapshot>> {
        let nodes = self.read_nodes()?;
        Ok(nodes
            .iter()
            .filter_map(|(path, record)| {
                record
                    .policy
                    .as_ref()
                    .map(|acl| AclSnapshot::new(path, &record.node_type, acl))
            })
            .collect())
    }

    fn read_nodes(&self) -> RepositoryResult<RwLockReadGuard<'_, BTreeMap<String, NodeRecord>>> {
        self.nodes.read().map_err(|_| storage_poisoned())
    }

    fn write_nodes(&self) -> RepositoryResult<RwLockWriteGuard<'_, BTreeMap<String, NodeRecord>>> {
        self.nodes.write().map_err(|_| storage_poisoned())
    }

    fn read_privileges(&self) -> RepositoryResult<RwLockReadGuard<'_, HashMap<String, Privilege>>> {
        self.privileges.read().map_err(|_| storage_poisoned())
    }
}

impl Default for MemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentTree for MemoryRepository {
    fn root_path(&self) -> &str {
        ROOT_PATH
    }

    fn parent(&self, path: &str) -> RepositoryResult<Option<String>> {
        let nodes = self.read_nodes()?;
        Ok(record(&nodes, path)?.parent.clone())
    }

    fn children(&self, path: &str) -> RepositoryResult<Vec<String>> {
        let nodes = self.read_nodes()?;
        Ok(record(&nodes, path)?.children.clone())
    }

    fn node_type(&self, path: &str) -> RepositoryResult<String> {
        let nodes = self.read_nodes()?;
        Ok(record(&nodes, path)?.node_type.clone())
    }
}

impl AccessControlManager for MemoryRepository {
    fn applicable_policies(&self, path: &str) -> RepositoryResult<Vec<AccessControlList>> {
        let nodes = self.read_nodes()?;
        Ok(match record(&nodes, path)?.policy {
            Some(_) => Vec::new(),
            None => vec![AccessControlList::new()],
        })
    }

    fn applied_policies(&self, path: &str) -> RepositoryResult<Vec<AccessControlList>> {
        let nodes = self.read_nodes()?;
        Ok(record(&nodes, path)?.policy.iter().cloned().collect())
    }

    fn set_policy(&self, path: &str, acl: &AccessControlList) -> RepositoryResult<()> {
        let mut nodes = self.write_nodes()?;
        let record = nodes
            .get_mut(path)
            .ok_or_else(|| RepositoryError::NodeNotFound(path.to_string()))?;
        record.policy = Some(acl.clone());
        Ok(())
    }

    fn remove_policy(&self, path: &str, acl: &AccessControlList) -> RepositoryResult<()> {
        let mut nodes = self.write_nodes()?;
        let record = nodes
            .get_mut(path)
            .ok_or_else(|| RepositoryError::NodeNotFound(path.to_string()))?;

        match &record.policy {
            Some(bound) if bound == acl => {
                record.policy = None;
                Ok(())
            }
            _ => Err(RepositoryError::Storage(format!(
                "Policy is not bound to node {}",
                path
            ))),
        }
    }

    fn privilege_from_name(&self, name: &str) -> RepositoryResult<Option<Privilege>> {
        Ok(self.read_privileges()?.get(name).cloned())
    }
}

fn record<'a>(
    nodes: &'a BTreeMap<String, NodeRecord>,
    path: &str,
) -> RepositoryResult<&'a NodeRecord> {
    nodes
        .get(path)
        .ok_or_else(|| RepositoryError::NodeNotFound(path.to_string()))
}

fn storage_poisoned() -> RepositoryError {
    RepositoryError::Storage("repository lock poisoned".to_string())
}

fn poisoned() -> ContentError {
    ContentError::Repository(storage_poisoned())
}
