//! Configuration loading and environment variable interpolation

use crate::error::{Error, Result};
use regex::Regex;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use super::Config;

pub const CONFIG_FILENAME: &str = "marketplace.toml";

/// Load configuration from marketplace.toml
pub fn load_config() -> Result<Config> {
    let config_path = find_config_file()?;
    load_config_from_path(&config_path)
}

/// Load configuration, falling back to defaults when no file exists
pub fn load_config_or_default() -> Result<Config> {
    match load_config() {
        Ok(config) => Ok(config),
        Err(Error::ConfigNotFound) => {
            tracing::warn!("{} not found, using default configuration", CONFIG_FILENAME);
            Ok(Config::default())
        }
        Err(e) => Err(e),
    }
}

/// Load configuration from a specific path
pub fn load_config_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path).map_err(|_| Error::ConfigNotFound)?;
    let content = interpolate_env_vars(&content)?;
    let config: Config = toml::from_str(&content)?;
    tracing::debug!("Loaded configuration from {}", path.display());
    Ok(config)
}

/// Find the configuration file, searching upward from current directory
fn find_config_file() -> Result<PathBuf> {
    let mut current = env::current_dir().map_err(|e| Error::Config(e.to_string()))?;

    loop {
        let config_path = current.join(CONFIG_FILENAME);
        if config_path.exists() {
            return Ok(config_path);
        }

        if !current.pop() {
            return Err(Error::ConfigNotFound);
        }
    }
}

/// Interpolate environment variables in the format ${VAR_NAME} or ${VAR_NAME:-default}
fn interpolate_env_vars(content: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)(?::-([^}]*))?\}")
        .map_err(|e| Error::Config(format!("Invalid interpolation pattern: {}", e)))?;

    Ok(re
        .replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            let default = caps.get(2).map(|m| m.as_str()).unwrap_or("");

            env::var(var_name).unwrap_or_else(|_| default.to_string())
        })
        .to_string())
}

/// Write the default configuration file, refusing to overwrite an existing one
pub fn write_default_config(path: &Path) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    fs::write(path, default_config_content())?;
    Ok(true)
}

/// Generate a default configuration file content
pub fn default_config_content() -> &'static str {
    r#"# Marketplace Configuration

[server]
host = "${MARKETPLACE_HOST:-127.0.0.1}"
port = 8000

[database]
url = "${DATABASE_URL:-sqlite://marketplace.db}"
max_connections = 5

[auth]
session_cookie = "sessionid"
session_idle_minutes = 30
bcrypt_cost = 12
# Anonymous users hitting login-required pages are sent here
login_url = "/join/"
login_redirect = "/"
logout_redirect = "/"
"#
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_env_interpolation() {
        env::set_var("MARKETPLACE_TEST_VAR", "hello");
        let content = "value = \"${MARKETPLACE_TEST_VAR}\"";
        let result = interpolate_env_vars(content).unwrap();
        assert_eq!(result, "value = \"hello\"");
        env::remove_var("MARKETPLACE_TEST_VAR");
    }

    #[test]
    fn test_env_interpolation_with_default() {
        let content = "value = \"${NONEXISTENT_VAR:-default_value}\"";
        let result = interpolate_env_vars(content).unwrap();
        assert_eq!(result, "value = \"default_value\"");
    }

    #[test]
    fn test_default_content_parses() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        assert!(write_default_config(&path).unwrap());
        assert!(!write_default_config(&path).unwrap());

        let config = load_config_from_path(&path).unwrap();
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.auth.login_url, "/join/");
        assert_eq!(config.auth.login_redirect, "/");
        assert_eq!(config.auth.logout_redirect, "/");
    }

    #[test]
    fn test_partial_config_takes_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        fs::write(&path, "[server]\nport = 9100\n").unwrap();

        let config = load_config_from_path(&path).unwrap();
        assert_eq!(config.server.port, 9100);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.auth.session_cookie, "sessionid");
        assert_eq!(config.database.url, "sqlite://marketplace.db");
    }

    #[test]
    fn test_missing_file_is_config_not_found() {
        let dir = TempDir::new().unwrap();
        let result = load_config_from_path(&dir.path().join("nope.toml"));
        assert!(matches!(result, Err(Error::ConfigNotFound)));
    }
}
