use reqwest::Client;

use crate::config::StorageConfig;

use super::{client_with_timeout, ImageLocation};

/// HEAD-probes candidate image URLs and falls back to the placeholder.
#[derive(Clone)]
pub struct AvailabilityChecker {
    client: Client,
    placeholder: String,
}

impl AvailabilityChecker {
    pub fn new(storage: &StorageConfig) -> Self {
        Self {
            client: client_with_timeout(storage.probe_timeout()),
            placeholder: storage.placeholder.clone(),
        }
    }

    /// Return `candidate` if it answers a HEAD with a success status,
    /// otherwise the placeholder in the same container.
    ///
    /// A single probe, no retries.
    pub async fn resolve(&self, candidate: ImageLocation) -> ImageLocation {
        match self.client.head(candidate.url().clone()).send().await {
            Ok(response) if response.status().is_success() => {
                tracing::debug!("Image available at {}", candidate);
                candidate
            }
            Ok(response) => {
                tracing::warn!(
                    "Image probe for {} returned {}, serving placeholder",
                    candidate,
                    response.status()
                );
                candidate.sibling(&self.placeholder)
            }
            Err(e) => {
                tracing::warn!(
                    "Image probe for {} failed ({}), serving placeholder",
                    candidate,
                    e
                );
                candidate.sibling(&self.placeholder)
            }
        }
    }
}
