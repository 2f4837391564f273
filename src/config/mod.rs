mod types;

pub use types::*;

use anyhow::{Context, Result};
use std::path::Path;

/// Environment variable overriding `[storage].url`.
pub const ENV_STORAGE_URL: &str = "MATSERVE_STORAGE_URL";
/// Environment variable overriding `[storage].image_container`.
pub const ENV_IMAGE_CONTAINER: &str = "MATSERVE_IMAGE_CONTAINER";
/// Environment variable overriding `[storage].thumbnail_container`.
pub const ENV_THUMBNAIL_CONTAINER: &str = "MATSERVE_THUMBNAIL_CONTAINER";

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let mut config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    apply_env_overrides(&mut config);
    validate_config(&config)?;

    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    let default_paths = [
        "./matserve.toml",
        "~/.config/matserve/config.toml",
        "/etc/matserve/config.toml",
    ];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            return load_config(path);
        }
    }

    let mut config = Config::default();
    apply_env_overrides(&mut config);
    validate_config(&config)?;
    Ok(config)
}

fn apply_env_overrides(config: &mut Config) {
    let overrides = [
        (ENV_STORAGE_URL, &mut config.storage.url),
        (ENV_IMAGE_CONTAINER, &mut config.storage.image_container),
        (ENV_THUMBNAIL_CONTAINER, &mut config.storage.thumbnail_container),
    ];
    for (var, field) in overrides {
        if let Ok(value) = std::env::var(var) {
            *field = value;
        }
    }
}

/// Validate configuration
///
/// Missing storage settings only warn here: the retrieval and upload paths
/// report them per request.
pub fn validate_config(config: &Config) -> Result<()> {
    if config.server.port == 0 {
        anyhow::bail!("Server port cannot be 0");
    }

    let storage = &config.storage;
    if !storage.base_url().is_empty() {
        let url = reqwest::Url::parse(storage.base_url())
            .with_context(|| format!("Invalid storage URL: {}", storage.url))?;
        if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
            anyhow::bail!("Storage URL must be an absolute http(s) URL: {}", storage.url);
        }
    }

    if storage.placeholder.trim().is_empty() || storage.placeholder.contains('/') {
        anyhow::bail!(
            "Placeholder must be a plain object name: '{}'",
            storage.placeholder
        );
    }

    if storage.probe_timeout_ms == 0 || storage.fetch_timeout_secs == 0 {
        anyhow::bail!("Storage timeouts must be greater than 0");
    }

    if let Err(e) = storage.require_images() {
        tracing::warn!("{}", e);
    }

    Ok(())
}
