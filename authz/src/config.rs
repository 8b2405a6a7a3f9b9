//! Engine settings.
//!
//! Settings live in a configuration document with the same layout as the
//! other configuration files of the system:
//!
//! ```yaml
//! id: authz
//! name: Access Control
//! provider: authz
//! version: 1.0.0
//! values:
//!   admin_principal: admin
//!   all_privilege: "jcr:all"
//!   modify_access_control_privilege: "jcr:modifyAccessControl"
//!   enforce_consistency: false
//! ```
//!
//! Missing values fall back to [`AuthzSettings::default`]. Environment
//! variables (`AUTHZ_ADMIN_PRINCIPAL`, `AUTHZ_ALL_PRIVILEGE`,
//! `AUTHZ_MODIFY_ACL_PRIVILEGE`, `AUTHZ_ENFORCE_CONSISTENCY`) override file
//! values when applied with [`AuthzSettings::with_env_overrides`].

use crate::error::{AuthzError, Result};
use crate::privilege::names;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Identifier the configuration document must carry.
pub const CONFIGURATION_ID: &str = "authz";

pub const ENV_ADMIN_PRINCIPAL: &str = "AUTHZ_ADMIN_PRINCIPAL";
pub const ENV_ALL_PRIVILEGE: &str = "AUTHZ_ALL_PRIVILEGE";
pub const ENV_MODIFY_ACL_PRIVILEGE: &str = "AUTHZ_MODIFY_ACL_PRIVILEGE";
pub const ENV_ENFORCE_CONSISTENCY: &str = "AUTHZ_ENFORCE_CONSISTENCY";

/// Tunables of the access-control engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthzSettings {
    /// Identity seeded with the full privilege into every new ACL.
    pub admin_principal: String,
    /// Privilege granted to the administrator seed entry.
    pub all_privilege: String,
    /// Privilege an ACL must retain somewhere to avoid a frozen state.
    pub modify_access_control_privilege: String,
    /// Validate every ACL before writing it back and reject frozen results.
    pub enforce_consistency: bool,
}

impl Default for AuthzSettings {
    fn default() -> Self {
        Self {
            admin_principal: "admin".to_string(),
            all_privilege: names::ALL.to_string(),
            modify_access_control_privilege: names::MODIFY_ACCESS_CONTROL.to_string(),
            enforce_consistency: false,
        }
    }
}

/// Only the fields the engine checks; `name`, `description` and `version`
/// are accepted and ignored.
#[derive(Debug, Deserialize)]
struct ConfigurationDocument {
    id: String,
    provider: String,
    #[serde(default)]
    values: AuthzSettings,
}

impl AuthzSettings {
    /// Parses settings from a configuration document.
    pub fn from_yaml(content: &str) -> Result<Self> {
        let document: ConfigurationDocument = serde_yaml::from_str(content)
            .map_err(|e| AuthzError::Configuration(format!("Failed to parse YAML: {}", e)))?;

        if document.id != CONFIGURATION_ID {
            return Err(AuthzError::Configuration(format!(
                "Expected configuration id '{}', found '{}'",
                CONFIGURATION_ID, document.id
            )));
        }
        if document.provider.is_empty() {
            return Err(AuthzError::Configuration(
                "Configuration provider cannot be empty".to_string(),
            ));
        }

        let settings = document.values;
        settings.validate()?;
        Ok(settings)
    }

    /// Loads settings from a configuration file.
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading access control settings from: {:?}", path);
        let content = std::fs::read_to_string(path)
            .map_err(|e| AuthzError::Configuration(format!("Failed to read {:?}: {}", path, e)))?;
        Self::from_yaml(&content)
    }

    /// Applies overrides from the process environment.
    pub fn with_env_overrides(self) -> Result<Self> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Applies overrides from an arbitrary key lookup.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(ENV_ADMIN_PRINCIPAL) {
            self.admin_principal = value;
        }
        if let Some(value) = lookup(ENV_ALL_PRIVILEGE) {
            self.all_privilege = value;
        }
        if let Some(value) = lookup(ENV_MODIFY_ACL_PRIVILEGE) {
            self.modify_access_control_privilege = value;
        }
        if let Some(value) = lookup(ENV_ENFORCE_CONSISTENCY) {
            self.enforce_consistency = parse_flag(ENV_ENFORCE_CONSISTENCY, &value)?;
        }

        self.validate()?;
        Ok(self)
    }

    /// Rejects settings with empty names.
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("admin_principal", &self.admin_principal),
            ("all_privilege", &self.all_privilege),
            (
                "modify_access_control_privilege",
                &self.modify_access_control_privilege,
            ),
        ];

        for (key, value) in required {
            if value.trim().is_empty() {
                return Err(AuthzError::Configuration(format!(
                    "'{}' cannot be empty",
                    key
                )));
            }
        }
        Ok(())
    }
}

fn parse_flag(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(AuthzError::Configuration(format!(
            "Invalid boolean for {}: {}",
            key, other
        ))),
    }
}
