use anyhow::{anyhow, Context, Result};
use colored::*;
use content::{AclSnapshot, MemoryRepository, RepositoryFixture};
use serde_json::json;
use std::path::Path;

/// Print the access control lists of a fixture, optionally limited to a subtree
pub fn execute(fixture: &Path, path: Option<&str>, format: &str) -> Result<()> {
    let repository = load_repository(fixture)?;

    if let Some(path) = path {
        if !repository.contains(path) {
            return Err(anyhow!("Node '{}' not found in fixture", path));
        }
    }

    let acls: Vec<AclSnapshot> = repository
        .snapshot()?
        .into_iter()
        .filter(|acl| path.map_or(true, |root| is_within(&acl.path, root)))
        .collect();

    let report = json!({
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "fixture": fixture.display().to_string(),
        "acls": acls,
    });

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&report)?),
        _ => {
            println!("{}", "=== Access Control Lists ===".bold());
            println!();
            print_acls_text(&acls);
        }
    }

    Ok(())
}

/// Load a fixture file into a fresh in-memory repository
pub fn load_repository(fixture: &Path) -> Result<MemoryRepository> {
    let definition = RepositoryFixture::from_file(fixture)
        .with_context(|| format!("Failed to read fixture {}", fixture.display()))?;
    definition
        .load()
        .with_context(|| format!("Failed to load fixture {}", fixture.display()))
}

/// Print ACL snapshots in a formatted text output
pub fn print_acls_text(acls: &[AclSnapshot]) {
    if acls.is_empty() {
        println!("{}", "No access control lists".yellow());
        return;
    }

    for acl in acls {
        println!("{} ({})", acl.path.cyan().bold(), acl.node_type);
        if acl.entries.is_empty() {
            println!("  {}", "(empty)".white());
        }
        for entry in &acl.entries {
            println!("  {}: {}", entry.principal.green(), entry.privileges.join(", "));
        }
        println!();
    }

    println!("{}", format!("Total ACLs: {}", acls.len()).green());
}

/// Whether `path` is `root` or one of its descendants
fn is_within(path: &str, root: &str) -> bool {
    root == "/"
        || path == root
        || path
            .strip_prefix(root)
            .is_some_and(|rest| rest.starts_with('/'))
}
