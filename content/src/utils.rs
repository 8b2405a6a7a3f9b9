//! Path helpers for repository node addressing
//!
//! Paths are absolute, `/`-separated and never end with a slash (except the
//! root itself, which is `/`).

use crate::error::ContentError;

/// Path of the repository root node
pub const ROOT_PATH: &str = "/";

/// Validate a single node name
///
/// Names may not be empty, may not contain `/`, and may not be `.` or `..`.
pub fn validate_name(name: &str) -> Result<(), ContentError> {
    if name.is_empty() || name == "." || name == ".." || name.contains('/') {
        return Err(ContentError::InvalidPath(format!(
            "'{}' is not a valid node name",
            name
        )));
    }
    Ok(())
}

/// Normalize and validate an absolute path
///
/// A single trailing slash is tolerated and removed.
///
/// # Example
///
/// ```rust
/// use content::utils::normalize_path;
///
/// assert_eq!(normalize_path("/metadata/feeds/").unwrap(), "/metadata/feeds");
/// assert!(normalize_path("metadata").is_err());
/// ```
pub fn normalize_path(path: &str) -> Result<String, ContentError> {
    if !path.starts_with('/') {
        return Err(ContentError::InvalidPath(format!("'{}' is not absolute", path)));
    }
    if path == ROOT_PATH {
        return Ok(ROOT_PATH.to_string());
    }

    let trimmed = path.strip_suffix('/').unwrap_or(path);
    for segment in trimmed[1..].split('/') {
        validate_name(segment)
            .map_err(|_| ContentError::InvalidPath(format!("'{}' has an invalid segment", path)))?;
    }
    Ok(trimmed.to_string())
}

/// Join a child name onto a parent path
pub fn join_path(parent: &str, name: &str) -> String {
    if parent == ROOT_PATH {
        format!("/{}", name)
    } else {
        format!("{}/{}", parent, name)
    }
}

/// Split a normalized, non-root path into its parent path and name
pub fn split_path(path: &str) -> Option<(&str, &str)> {
    if path == ROOT_PATH {
        return None;
    }
    let index = path.rfind('/')?;
    let parent = if index == 0 { ROOT_PATH } else { &path[..index] };
    Some((parent, &path[index + 1..]))
}

/// Number of segments below the root
pub fn depth(path: &str) -> usize {
    if path == ROOT_PATH {
        0
    } else {
        path.matches('/').count()
    }
}
