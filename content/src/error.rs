//! Error types for the in-memory content repository

use authz::RepositoryError;
use thiserror::Error;

/// Errors that can occur while building or loading a content repository
#[derive(Error, Debug)]
pub enum ContentError {
    /// A path is not absolute or contains empty/relative segments
    #[error("Invalid node path: {0}")]
    InvalidPath(String),

    /// The referenced node does not exist
    #[error("Node not found: {0}")]
    NodeNotFound(String),

    /// A node already exists at the path
    #[error("Node already exists: {0}")]
    DuplicateNode(String),

    /// A privilege name is not registered
    #[error("Unknown privilege: {0}")]
    UnknownPrivilege(String),

    /// A privilege with the same name is already registered
    #[error("Privilege already registered: {0}")]
    DuplicatePrivilege(String),

    /// Fixture content is structurally valid YAML but semantically wrong
    #[error("Invalid fixture: {0}")]
    Fixture(String),

    /// YAML parsing errors
    #[error("YAML parsing error: {0}")]
    YamlParsing(#[from] serde_yaml::Error),

    /// File system errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Errors surfaced through the repository capability interface
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
