use bytes::Bytes;
use reqwest::Client;

use matserve_common::{Error, Result};

use crate::config::StorageConfig;

use super::{client_with_timeout, ImageLocation};

/// Downloads whole objects from the blob store.
#[derive(Clone)]
pub struct ImageFetcher {
    client: Client,
}

impl ImageFetcher {
    pub fn new(storage: &StorageConfig) -> Self {
        Self {
            client: client_with_timeout(storage.fetch_timeout()),
        }
    }

    /// GET the object and buffer its body.
    ///
    /// Network errors, timeouts and non-success statuses all come back as
    /// [`Error::UnavailableImage`]. No retries.
    pub async fn fetch(&self, location: &ImageLocation) -> Result<Bytes> {
        let unavailable = |reason: String| Error::unavailable(location.as_str(), reason);

        let response = self
            .client
            .get(location.url().clone())
            .send()
            .await
            .map_err(|e| unavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(unavailable(format!("status {}", status)));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| unavailable(format!("failed to read body: {}", e)))?;

        tracing::debug!("Fetched {} bytes from {}", bytes.len(), location);
        Ok(bytes)
    }
}
