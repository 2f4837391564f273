//! Access to the remote blob store.
//!
//! The retrieval pipeline only needs URL-addressable HEAD and GET on stored
//! objects ([`AvailabilityChecker`], [`ImageFetcher`]). Uploads and thumbnail
//! listing go through the [`BlobStore`] trait.

mod checker;
mod fetcher;
mod location;
mod store;

pub use checker::AvailabilityChecker;
pub use fetcher::ImageFetcher;
pub use location::ImageLocation;
pub use store::{BlobStore, HttpBlobStore};

use reqwest::Client;
use std::time::Duration;

/// Build a client with the given request timeout, falling back to the default client.
fn client_with_timeout(timeout: Duration) -> Client {
    Client::builder().timeout(timeout).build().unwrap_or_else(|e| {
        tracing::warn!("Failed to build HTTP client with timeout: {}", e);
        Client::new()
    })
}
