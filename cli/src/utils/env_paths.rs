use anyhow::{Context, Result};
use std::env;
use std::path::{Path, PathBuf};

/// Environment-based path configuration
#[derive(Debug, Clone)]
pub struct EnvPaths {
    pub configuration_path: PathBuf,
}

impl EnvPaths {
    /// Load paths from environment variables with defaults
    pub fn load() -> Result<Self> {
        Self::load_with_base(None)
    }

    /// Load paths from environment variables with an optional base directory
    /// This is primarily for testing purposes
    pub fn load_with_base(base_dir: Option<PathBuf>) -> Result<Self> {
        let base = if let Some(base) = base_dir {
            base
        } else {
            // Try to load .env file if it exists in current directory
            if let Ok(env_path) = env::current_dir() {
                let env_file = env_path.join(".env");
                if env_file.exists() {
                    dotenv::from_path(&env_file).ok();
                }
            }
            env::current_dir().context("Failed to get current directory")?
        };

        Ok(Self {
            configuration_path: Self::get_path_from_env("CONFIGURATION_PATH", "./config", &base)?,
        })
    }

    /// Get a path from environment variable or use default
    fn get_path_from_env(var_name: &str, default: &str, base_dir: &Path) -> Result<PathBuf> {
        let path_str = env::var(var_name).unwrap_or_else(|_| default.to_string());
        let path = PathBuf::from(path_str);

        // If the path is relative, make it relative to the base directory
        if path.is_relative() {
            Ok(base_dir.join(path))
        } else {
            Ok(path)
        }
    }

    /// The access control settings file for `environment`, if one exists
    ///
    /// `config.authz.<environment>.yaml` wins over `config.authz.yaml`.
    pub fn authz_config_file(&self, environment: &str) -> Option<PathBuf> {
        [
            format!("config.authz.{}.yaml", environment),
            "config.authz.yaml".to_string(),
        ]
        .into_iter()
        .map(|name| self.configuration_path.join(name))
        .find(|path| path.is_file())
    }
}

/// Get the current environment (dev, staging, production)
pub fn get_environment() -> String {
    env::var("ENVIRONMENT")
        .unwrap_or_else(|_| env::var("APP_ENV").unwrap_or_else(|_| "dev".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::Mutex;
    use tempfile::TempDir;

    // Use a mutex to ensure tests don't interfere with each other's environment variables
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    #[test]
    fn test_env_paths_with_defaults() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::remove_var("CONFIGURATION_PATH");

        let paths = EnvPaths::load().unwrap();
        assert!(paths.configuration_path.ends_with("config"));
    }

    #[test]
    fn test_env_paths_with_relative_env_var() {
        let _guard = ENV_MUTEX.lock().unwrap();
        let temp_dir = TempDir::new().unwrap();

        env::set_var("CONFIGURATION_PATH", "./custom_config");
        let paths = EnvPaths::load_with_base(Some(temp_dir.path().to_path_buf())).unwrap();
        env::remove_var("CONFIGURATION_PATH");

        assert_eq!(paths.configuration_path, temp_dir.path().join("./custom_config"));
    }

    #[test]
    fn test_env_paths_with_absolute_env_var() {
        let _guard = ENV_MUTEX.lock().unwrap();
        let temp_dir = TempDir::new().unwrap();
        let custom = temp_dir.path().join("custom_config");

        env::set_var("CONFIGURATION_PATH", custom.to_str().unwrap());
        let paths = EnvPaths::load_with_base(Some(PathBuf::from("/elsewhere"))).unwrap();
        env::remove_var("CONFIGURATION_PATH");

        // When an absolute path is provided, it should be used as-is
        assert_eq!(paths.configuration_path, custom);
    }

    #[test]
    fn test_authz_config_file_prefers_environment_file() {
        let temp_dir = TempDir::new().unwrap();
        let paths = EnvPaths {
            configuration_path: temp_dir.path().to_path_buf(),
        };
        assert_eq!(paths.authz_config_file("dev"), None);

        fs::write(temp_dir.path().join("config.authz.yaml"), "id: authz").unwrap();
        assert_eq!(
            paths.authz_config_file("dev"),
            Some(temp_dir.path().join("config.authz.yaml"))
        );

        fs::write(temp_dir.path().join("config.authz.dev.yaml"), "id: authz").unwrap();
        assert_eq!(
            paths.authz_config_file("dev"),
            Some(temp_dir.path().join("config.authz.dev.yaml"))
        );
        assert_eq!(
            paths.authz_config_file("production"),
            Some(temp_dir.path().join("config.authz.yaml"))
        );
    }

    #[test]
    fn test_get_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();

        env::remove_var("ENVIRONMENT");
        env::remove_var("APP_ENV");
        assert_eq!(get_environment(), "dev");

        env::set_var("APP_ENV", "staging");
        assert_eq!(get_environment(), "staging");

        env::set_var("ENVIRONMENT", "production");
        assert_eq!(get_environment(), "production");

        env::remove_var("ENVIRONMENT");
        env::remove_var("APP_ENV");
    }
}
