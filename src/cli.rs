use clap::{Parser, Subcommand};
use matserve::config::ServerConfig;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "matserve")]
#[command(author, version, about = "Serve and upload material images backed by a blob store")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP server
    Start {
        /// Host to bind to (overrides [server].host)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides [server].port)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Validate configuration file
    Validate {
        /// Config file to validate (uses default lookup if not specified)
        #[arg(id = "validate_config", value_name = "CONFIG")]
        config: Option<PathBuf>,
    },

    /// Display version information
    Version,
}

/// Apply `start` flags over the loaded `[server]` section.
pub fn override_server(server: &mut ServerConfig, host: Option<String>, port: Option<u16>) {
    if let Some(host) = host {
        server.host = host;
    }
    if let Some(port) = port {
        server.port = port;
    }
}
