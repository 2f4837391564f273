mod cli;

use matserve::{config, server};

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};

async fn start_server(
    host: Option<String>,
    port: Option<u16>,
    config_path: Option<&std::path::Path>,
) -> Result<()> {
    let mut config = config::load_config_or_default(config_path)?;
    cli::override_server(&mut config.server, host, port);

    tracing::info!("Starting matserve");
    tracing::info!(
        "Blob store: {} (images: '{}', thumbnails: '{}')",
        config.storage.base_url(),
        config.storage.image_container,
        config.storage.thumbnail_container
    );

    server::start_server(config).await
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "matserve=trace,matserve_common=debug,tower_http=debug".to_string()
        } else {
            "matserve=debug,tower_http=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .init();

    match cli.command {
        Commands::Start { host, port } => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(start_server(host, port, cli.config.as_deref()))
        }
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("matserve {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn validate_config(path: Option<&std::path::Path>) -> Result<()> {
    let config = match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            config::load_config(p)?
        }
        None => {
            println!("No config file specified, using default lookup");
            config::load_config_or_default(None)?
        }
    };

    println!("✓ Configuration is valid");
    println!("  Server: {}:{}", config.server.host, config.server.port);
    println!("  Storage URL: {}", config.storage.base_url());
    println!("  Image container: {}", config.storage.image_container);
    println!("  Thumbnail container: {}", config.storage.thumbnail_container);
    println!("  Placeholder: {}", config.storage.placeholder);

    if let Err(e) = config.storage.require_images() {
        println!("✗ Image serving will fail: {}", e);
    }
    if let Err(e) = config.storage.require_thumbnails() {
        println!("✗ Thumbnail listing will fail: {}", e);
    }

    Ok(())
}
