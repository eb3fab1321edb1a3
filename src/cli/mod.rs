//! CLI interface for Marketplace

pub mod commands;
mod output;

pub use output::*;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "marketplace")]
#[command(version)]
#[command(about = "Job marketplace for clients and freelancers", long_about = None)]
pub struct Cli {
    /// Path to marketplace.toml (searched upward from the current directory by default)
    #[arg(short, long, global = true, env = "MARKETPLACE_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a default marketplace.toml in the current directory
    Init,

    /// Create the database schema
    Migrate,

    /// Start the web server
    Serve {
        /// Host to bind to (overrides the config file)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides the config file)
        #[arg(short, long)]
        port: Option<u16>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_serve_overrides() {
        let cli = Cli::try_parse_from(["marketplace", "serve", "--host", "0.0.0.0", "-p", "9000"])
            .unwrap();
        match cli.command {
            Commands::Serve { host, port } => {
                assert_eq!(host.as_deref(), Some("0.0.0.0"));
                assert_eq!(port, Some(9000));
            }
            _ => panic!("expected serve"),
        }
    }

    #[test]
    fn test_global_config_flag() {
        let cli = Cli::try_parse_from(["marketplace", "migrate", "--config", "/tmp/m.toml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/m.toml")));
        assert!(matches!(cli.command, Commands::Migrate));
    }

    #[test]
    fn test_unknown_command_rejected() {
        assert!(Cli::try_parse_from(["marketplace", "deploy"]).is_err());
    }
}
