use serde::{Deserialize, Serialize};
use std::time::Duration;

use matserve_common::{Error, Result};

/// Object served when the requested material image is missing.
pub const DEFAULT_PLACEHOLDER: &str = "small-material.png";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Location of the blob store and its containers.
///
/// Empty strings are accepted at load time; the request paths that need a
/// value report it as a configuration error.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    /// Base URL of the blob store, e.g. `https://account.blob.core.windows.net`
    #[serde(default)]
    pub url: String,

    /// Container holding uploaded and material images
    #[serde(default)]
    pub image_container: String,

    /// Container holding generated thumbnails
    #[serde(default)]
    pub thumbnail_container: String,

    /// Object name of the fallback image inside the image container
    #[serde(default = "default_placeholder")]
    pub placeholder: String,

    /// Availability probe timeout in milliseconds (default: 1200)
    #[serde(default = "default_probe_timeout_ms")]
    pub probe_timeout_ms: u64,

    /// Image fetch timeout in seconds (default: 30)
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,
}

fn default_placeholder() -> String {
    DEFAULT_PLACEHOLDER.to_string()
}
fn default_probe_timeout_ms() -> u64 {
    1200
}
fn default_fetch_timeout_secs() -> u64 {
    30
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            image_container: String::new(),
            thumbnail_container: String::new(),
            placeholder: default_placeholder(),
            probe_timeout_ms: default_probe_timeout_ms(),
            fetch_timeout_secs: default_fetch_timeout_secs(),
        }
    }
}

impl StorageConfig {
    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.url.trim().trim_end_matches('/')
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    /// Check that the store URL and image container are set.
    pub fn require_images(&self) -> Result<()> {
        if self.base_url().is_empty() {
            return Err(Error::configuration(
                "storage URL is not set; add [storage].url to the config file",
            ));
        }
        if self.image_container.trim().is_empty() {
            return Err(Error::configuration(
                "please provide a name for the image container in the blob storage",
            ));
        }
        Ok(())
    }

    /// Check that thumbnails can be listed.
    pub fn require_thumbnails(&self) -> Result<()> {
        self.require_images()?;
        if self.thumbnail_container.trim().is_empty() {
            return Err(Error::configuration(
                "please provide a name for the thumbnail container in the blob storage",
            ));
        }
        Ok(())
    }

    pub fn has_thumbnails(&self) -> bool {
        !self.thumbnail_container.trim().is_empty()
    }
}
