use crate::commands::show::load_repository;
use anyhow::{bail, Result};
use authz::{validate_not_frozen, AuthzError, AuthzSettings};
use colored::*;
use serde_json::json;
use std::path::Path;
use tracing::{debug, warn};

/// Run the frozen-state check against every ACL in a fixture
///
/// Fails when at least one ACL has no entry able to modify access control.
pub fn execute(fixture: &Path, format: &str, settings: &AuthzSettings) -> Result<()> {
    let repository = load_repository(fixture)?;

    let mut results = Vec::new();
    for path in repository.paths()? {
        let Some(acl) = repository.policy(&path)? else {
            continue;
        };

        let status = match validate_not_frozen(&acl, &settings.modify_access_control_privilege) {
            Ok(()) => {
                debug!("ACL on {} can be amended", path);
                json!({ "path": path, "status": "ok" })
            }
            Err(AuthzError::FrozenAcl { principals }) => {
                warn!("ACL on {} is frozen", path);
                json!({ "path": path, "status": "frozen", "principals": principals })
            }
            Err(e) => return Err(e.into()),
        };
        results.push(status);
    }

    let frozen = results
        .iter()
        .filter(|result| result["status"] == "frozen")
        .count();

    match format {
        "json" => {
            let output = json!({
                "timestamp": chrono::Utc::now().to_rfc3339(),
                "privilege": settings.modify_access_control_privilege,
                "checked": results.len(),
                "frozen": frozen,
                "acls": results,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        _ => print_results_text(&results, frozen),
    }

    if frozen > 0 {
        bail!("{} frozen access control list(s) found", frozen);
    }
    Ok(())
}

fn print_results_text(results: &[serde_json::Value], frozen: usize) {
    println!("{}", "=== Access Control Consistency ===".bold());
    println!();

    for result in results {
        let path = result["path"].as_str().unwrap_or("?");
        if result["status"] == "frozen" {
            let principals = result["principals"]
                .as_array()
                .map(|names| {
                    names
                        .iter()
                        .filter_map(|name| name.as_str())
                        .collect::<Vec<_>>()
                        .join(", ")
                })
                .unwrap_or_default();
            println!("{} {} (frozen: {})", "✗".red(), path.bold(), principals);
        } else {
            println!("{} {}", "✓".green(), path.bold());
        }
    }

    println!();
    let summary = format!("Checked: {}, frozen: {}", results.len(), frozen);
    if frozen > 0 {
        println!("{}", summary.red());
    } else {
        println!("{}", summary.green());
    }
}
