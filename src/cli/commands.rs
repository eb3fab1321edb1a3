//! CLI command implementations

use anyhow::Result;
use std::path::{Path, PathBuf};

use crate::cli::{error, info, success, warn};
use crate::config::{self, loader::CONFIG_FILENAME, Config};
use crate::db::Database;

/// Initialize a new marketplace.toml configuration file
pub async fn init() -> Result<()> {
    let config_path = Path::new(CONFIG_FILENAME);

    if !config::loader::write_default_config(config_path)? {
        warn(&format!("{} already exists", CONFIG_FILENAME));
        return Ok(());
    }

    success(&format!("Created {}", CONFIG_FILENAME));
    info("Run 'marketplace migrate' to create the database, then 'marketplace serve'");

    Ok(())
}

/// Create the database schema
pub async fn migrate(config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config(config_path.as_deref())?;

    match Database::open(&config.database).await {
        Ok(db) => {
            db.close().await;
            success(&format!("Database ready at {}", config.database.url));
            Ok(())
        }
        Err(e) => {
            error(&format!("Failed to prepare database: {}", e));
            Err(e.into())
        }
    }
}

/// Start the web server
pub async fn serve(config_path: Option<PathBuf>, host: Option<String>, port: Option<u16>) -> Result<()> {
    let mut config = load_config(config_path.as_deref())?;
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    info(&format!("Starting server at http://{}", config.bind_address()));

    crate::api::run_server(config).await?;
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    let config = match path {
        Some(path) => config::load_config_from_path(path)?,
        None => config::load_config_or_default()?,
    };
    Ok(config)
}
