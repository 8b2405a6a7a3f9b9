use crate::utils::env_paths::{get_environment, EnvPaths};
use anyhow::{Context, Result};
use authz::AuthzSettings;
use std::path::Path;
use tracing::debug;

/// Resolve engine settings for this invocation
///
/// An explicit `--config` file must exist. Otherwise the configuration
/// directory is searched for the current environment's file, and defaults
/// apply when there is none. Environment overrides are applied last.
pub fn load(explicit: Option<&Path>) -> Result<AuthzSettings> {
    let settings = match explicit {
        Some(path) => AuthzSettings::from_file(path)
            .with_context(|| format!("Failed to load settings from {}", path.display()))?,
        None => {
            let env_paths = EnvPaths::load()?;
            match env_paths.authz_config_file(&get_environment()) {
                Some(path) => AuthzSettings::from_file(&path)
                    .with_context(|| format!("Failed to load settings from {}", path.display()))?,
                None => {
                    debug!(
                        "No access control settings under {}, using defaults",
                        env_paths.configuration_path.display()
                    );
                    AuthzSettings::default()
                }
            }
        }
    };

    settings
        .with_env_overrides()
        .context("Invalid access control settings override")
}
