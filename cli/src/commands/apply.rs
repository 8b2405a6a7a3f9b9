use crate::commands::show::{load_repository, print_acls_text};
use anyhow::{Context, Result};
use authz::{of_type, AuthzEngine, AuthzSettings};
use colored::*;
use content::MemoryRepository;
use serde_json::json;
use std::path::PathBuf;
use tracing::info;

/// Which nodes an operation reaches, starting from the request path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    /// Only the node itself
    Node,
    /// Every node up to and including an ancestor
    Ancestors { target: String },
    /// The node and every descendant of the given type
    Tree { node_type: String },
}

/// A propagation request against a fixture
#[derive(Debug, Clone)]
pub struct Request {
    pub fixture: PathBuf,
    pub path: String,
    pub scope: Scope,
    pub format: String,
}

/// Grant privileges to a principal and print the resulting ACLs
pub fn grant(
    request: &Request,
    principal: &str,
    privileges: &[String],
    settings: AuthzSettings,
) -> Result<()> {
    let repository = load_repository(&request.fixture)?;
    let engine = AuthzEngine::with_settings(&repository, settings);

    let changed = match &request.scope {
        Scope::Node => engine.grant_named(&request.path, principal, privileges),
        Scope::Ancestors { target } => {
            engine.grant_along_path(&request.path, principal, target, privileges)
        }
        Scope::Tree { node_type } => {
            engine.grant_recursive(&request.path, &of_type(node_type), principal, privileges)
        }
    }
    .with_context(|| format!("Failed to grant privileges to '{}'", principal))?;

    report("grant", request, changed, &repository)
}

/// Revoke privileges from a principal and print the resulting ACLs
pub fn revoke(
    request: &Request,
    principal: &str,
    privileges: &[String],
    settings: AuthzSettings,
) -> Result<()> {
    let repository = load_repository(&request.fixture)?;
    let engine = AuthzEngine::with_settings(&repository, settings);

    let changed = match &request.scope {
        Scope::Node => engine.revoke_named(&request.path, principal, privileges),
        Scope::Ancestors { target } => {
            engine.revoke_along_path(&request.path, principal, target, privileges)
        }
        Scope::Tree { node_type } => {
            engine.revoke_recursive(&request.path, &of_type(node_type), principal, privileges)
        }
    }
    .with_context(|| format!("Failed to revoke privileges from '{}'", principal))?;

    report("revoke", request, changed, &repository)
}

/// Remove every policy in scope and print the remaining ACLs
pub fn clear(request: &Request, settings: AuthzSettings) -> Result<()> {
    let repository = load_repository(&request.fixture)?;
    let engine = AuthzEngine::with_settings(&repository, settings);

    let changed = match &request.scope {
        Scope::Node => engine.clear(&request.path),
        Scope::Ancestors { target } => engine.clear_along_path(&request.path, target),
        Scope::Tree { node_type } => engine.clear_recursive(&request.path, &of_type(node_type)),
    }
    .with_context(|| format!("Failed to clear policies from {}", request.path))?;

    report("clear", request, changed, &repository)
}

fn report(
    operation: &str,
    request: &Request,
    changed: bool,
    repository: &MemoryRepository,
) -> Result<()> {
    info!("{} on {} finished (changed: {})", operation, request.path, changed);
    let acls = repository.snapshot()?;

    match request.format.as_str() {
        "json" => {
            let output = json!({
                "timestamp": chrono::Utc::now().to_rfc3339(),
                "operation": operation,
                "path": request.path,
                "changed": changed,
                "acls": acls,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        _ => {
            println!("{}", format!("=== {} {} ===", operation.to_uppercase(), request.path).bold());
            println!();
            let changed_display = if changed {
                "yes".green().bold()
            } else {
                "no".yellow().bold()
            };
            println!("Changed: {}", changed_display);
            println!();
            print_acls_text(&acls);
        }
    }

    Ok(())
}
