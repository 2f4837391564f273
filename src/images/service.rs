//! Retrieval pipeline: Resolve -> Fetch -> Decode -> Encode.

use matserve_common::{Error, MaterialCode, Result};

use super::codec::{self, Rendition};
use crate::blob::{AvailabilityChecker, ImageFetcher, ImageLocation};
use crate::config::StorageConfig;

/// Serves material images out of the blob store.
///
/// Holds no per-request state; the storage configuration is fixed at
/// construction.
pub struct ImageService {
    storage: StorageConfig,
    checker: AvailabilityChecker,
    fetcher: ImageFetcher,
}

impl ImageService {
    /// Create a new `ImageService` with clients built from `storage`.
    pub fn new(storage: &StorageConfig) -> Self {
        Self {
            storage: storage.clone(),
            checker: AvailabilityChecker::new(storage),
            fetcher: ImageFetcher::new(storage),
        }
    }

    /// Location of the image for `code`, after the availability probe.
    ///
    /// Missing or unreachable objects resolve to the placeholder.
    pub async fn locate(&self, code: &MaterialCode) -> Result<ImageLocation> {
        let candidate = ImageLocation::for_material(&self.storage, code)?;
        Ok(self.checker.resolve(candidate).await)
    }

    /// Run the whole pipeline for one material.
    ///
    /// # Errors
    ///
    /// * [`Error::Configuration`] - storage URL or container missing
    /// * [`Error::UnavailableImage`] - neither the object nor the placeholder could be fetched
    /// * [`Error::Decode`] - the fetched bytes are not an image
    /// * [`Error::Encode`] - re-encoding failed
    pub async fn render(&self, code: &MaterialCode) -> Result<Rendition> {
        let location = self.locate(code).await?;
        let bytes = self.fetcher.fetch(&location).await?;
        let file_name = location.object_key().to_string();

        // Decoding and encoding are CPU-bound.
        let rendition = tokio::task::spawn_blocking(move || {
            let decoded = codec::decode(&bytes, file_name)?;
            codec::classify(decoded)
        })
        .await
        .map_err(|e| Error::internal(format!("image task failed: {}", e)))??;

        match &rendition {
            Rendition::Encoded(image) => tracing::debug!(
                "Rendered {} as {} ({} bytes)",
                code,
                image.content_type(),
                image.len()
            ),
            Rendition::Unsupported(format) => {
                tracing::warn!("Image for {} has unsupported format {}", code, format)
            }
        }

        Ok(rendition)
    }
}
