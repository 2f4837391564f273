use bytes::Bytes;
use reqwest::Client;

use matserve_common::{Error, Result};

use crate::config::StorageConfig;

use super::{client_with_timeout, ImageLocation};

/// Write and list side of the blob store.
#[async_trait::async_trait]
pub trait BlobStore: Send + Sync {
    /// Store `data` as `name` in the image container.
    async fn put_object(&self, name: &str, data: Bytes, content_type: &str) -> Result<()>;

    /// URLs of every object in the thumbnail container, in listing order.
    async fn list_thumbnail_urls(&self) -> Result<Vec<String>>;
}

/// Blob store reached over its REST interface.
///
/// Objects are written with `PUT {base}/{container}/{name}` and containers
/// are enumerated with the `restype=container&comp=list` XML listing.
pub struct HttpBlobStore {
    client: Client,
    storage: StorageConfig,
}

impl HttpBlobStore {
    pub fn new(storage: &StorageConfig) -> Self {
        Self {
            client: client_with_timeout(storage.fetch_timeout()),
            storage: storage.clone(),
        }
    }

    async fn list_page(&self, container_url: &str, marker: Option<&str>) -> Result<String> {
        let mut request = self
            .client
            .get(container_url)
            .query(&[("restype", "container"), ("comp", "list")]);
        if let Some(marker) = marker {
            request = request.query(&[("marker", marker)]);
        }

        let response = request
            .send()
            .await
            .map_err(|e| Error::storage(format!("failed to list {}: {}", container_url, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::storage(format!(
                "listing {} returned {}",
                container_url, status
            )));
        }

        response
            .text()
            .await
            .map_err(|e| Error::storage(format!("failed to read listing: {}", e)))
    }
}

#[async_trait::async_trait]
impl BlobStore for HttpBlobStore {
    async fn put_object(&self, name: &str, data: Bytes, content_type: &str) -> Result<()> {
        self.storage.require_images()?;
        let location = ImageLocation::new(
            self.storage.base_url(),
            &self.storage.image_container,
            name,
        )?;

        let size = data.len();
        let response = self
            .client
            .put(location.url().clone())
            .header("x-ms-blob-type", "BlockBlob")
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(data)
            .send()
            .await
            .map_err(|e| Error::storage(format!("failed to upload {}: {}", name, e)))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(Error::storage(format!(
                "upload of {} returned {}: {}",
                name, status, detail
            )));
        }

        tracing::info!("Uploaded {} ({} bytes) to {}", name, size, location);
        Ok(())
    }

    async fn list_thumbnail_urls(&self) -> Result<Vec<String>> {
        self.storage.require_thumbnails()?;
        let base = self.storage.base_url();
        let container = &self.storage.thumbnail_container;
        let container_url = format!("{}/{}", base, container.trim_matches('/'));

        let mut urls = Vec::new();
        let mut marker: Option<String> = None;
        loop {
            let page = self.list_page(&container_url, marker.as_deref()).await?;
            let listing = parse_listing(&page)?;
            for name in &listing.names {
                let location = ImageLocation::new(base, container, name)?;
                urls.push(location.as_str().to_string());
            }

            match listing.next_marker {
                Some(next) if marker.as_deref() == Some(next.as_str()) => {
                    tracing::warn!(
                        "Listing of {} repeated marker {}, stopping",
                        container_url,
                        next
                    );
                    break;
                }
                Some(next) => marker = Some(next),
                None => break,
            }
        }

        tracing::debug!("Listed {} thumbnails from {}", urls.len(), container_url);
        Ok(urls)
    }
}

/// Blob names and continuation marker from one listing page.
#[derive(Debug, Default, PartialEq)]
struct Listing {
    names: Vec<String>,
    next_marker: Option<String>,
}

/// Read `Blobs/Blob/Name` and `NextMarker` from an `EnumerationResults` page.
fn parse_listing(xml: &str) -> Result<Listing> {
    let doc = roxmltree::Document::parse(xml)
        .map_err(|e| Error::storage(format!("malformed container listing: {}", e)))?;

    let names = doc
        .descendants()
        .filter(|n| n.has_tag_name("Blob"))
        .filter(|n| n.parent().is_some_and(|p| p.has_tag_name("Blobs")))
        .filter_map(|blob| blob.children().find(|c| c.has_tag_name("Name")))
        .filter_map(|name| name.text())
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect();

    let next_marker = doc
        .descendants()
        .find(|n| n.has_tag_name("NextMarker"))
        .and_then(|n| n.text())
        .map(|m| m.trim().to_string())
        .filter(|m| !m.is_empty());

    Ok(Listing { names, next_marker })
}
