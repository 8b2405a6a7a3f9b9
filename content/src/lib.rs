//! # Content Crate
//!
//! In-memory content repository for the access-control engine. It provides
//! the host side of the `authz` capability interface:
//!
//! - A tree of typed nodes addressed by absolute path
//! - At most one access control list per node, with applicable/applied policy semantics
//! - The standard JCR-style privilege catalogue plus custom (aggregate) privileges
//! - Host principal types that normalize to the engine's canonical principal
//! - YAML fixtures for seeding a repository, and snapshots for reporting
//!
//! ## Usage
//!
//! ```rust
//! use authz::{AuthzEngine, privilege::names};
//! use content::MemoryRepository;
//!
//! let repository = MemoryRepository::new();
//! repository.add_path("/a", "tba:folder").unwrap();
//! repository.add_path("/a/b", "tba:feed").unwrap();
//!
//! let engine = AuthzEngine::new(&repository);
//! let changed = engine
//!     .grant_along_path("/a/b", "user1", "/a", &[names::READ])
//!     .unwrap();
//! assert!(changed);
//! ```

pub mod error;
pub mod fixture;
pub mod principal;
pub mod privileges;
pub mod repository;
pub mod utils;

// Re-export commonly used items at the crate root
pub use error::ContentError;
pub use fixture::RepositoryFixture;
pub use principal::{GroupPrincipal, UsernamePrincipal};
pub use privileges::standard_privileges;
pub use repository::{AclSnapshot, EntrySnapshot, MemoryRepository, ROOT_TYPE};

/// Result type for content operations
pub type Result<T> = std::result::Result<T, ContentError>;
