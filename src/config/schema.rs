//! Configuration schema definitions

use serde::{Deserialize, Serialize};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub auth: AuthConfig,
}

/// Server configuration for the HTTP listener
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Relational store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite connection URL, e.g. `sqlite://marketplace.db` or `sqlite::memory:`
    #[serde(default = "default_database_url")]
    pub url: String,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_database_url() -> String {
    "sqlite://marketplace.db".to_string()
}

fn default_max_connections() -> u32 {
    5
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            max_connections: default_max_connections(),
        }
    }
}

impl DatabaseConfig {
    /// In-memory database, used by tests and `--memory` runs
    pub fn in_memory() -> Self {
        Self {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
        }
    }

    pub fn is_in_memory(&self) -> bool {
        self.url.contains(":memory:") || self.url.contains("mode=memory")
    }
}

/// Session and credential settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Name of the cookie carrying the session id
    #[serde(default = "default_session_cookie")]
    pub session_cookie: String,

    /// Idle minutes before a session expires
    #[serde(default = "default_session_idle_minutes")]
    pub session_idle_minutes: i64,

    #[serde(default = "default_bcrypt_cost")]
    pub bcrypt_cost: u32,

    /// Where anonymous users are sent for login-required pages
    #[serde(default = "default_login_url")]
    pub login_url: String,

    #[serde(default = "default_home")]
    pub login_redirect: String,

    #[serde(default = "default_home")]
    pub logout_redirect: String,
}

fn default_session_cookie() -> String {
    "sessionid".to_string()
}

fn default_session_idle_minutes() -> i64 {
    30
}

fn default_bcrypt_cost() -> u32 {
    bcrypt::DEFAULT_COST
}

fn default_login_url() -> String {
    "/join/".to_string()
}

fn default_home() -> String {
    "/".to_string()
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            session_cookie: default_session_cookie(),
            session_idle_minutes: default_session_idle_minutes(),
            bcrypt_cost: default_bcrypt_cost(),
            login_url: default_login_url(),
            login_redirect: default_home(),
            logout_redirect: default_home(),
        }
    }
}

impl Config {
    /// Configuration for an in-memory instance with cheap password hashing
    pub fn for_tests() -> Self {
        Self {
            server: ServerConfig::default(),
            database: DatabaseConfig::in_memory(),
            auth: AuthConfig {
                bcrypt_cost: 4,
                ..AuthConfig::default()
            },
        }
    }

    /// Address the server binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
