use reqwest::Url;
use std::fmt;

use matserve_common::{Error, MaterialCode, Result};

use crate::config::StorageConfig;

/// Absolute URL of one object: `{base}/{container}/{object_key}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageLocation {
    url: Url,
    object_key: String,
}

impl ImageLocation {
    /// Join the parts, percent-encoding `object_key` as one path segment.
    pub fn new(base_url: &str, container: &str, object_key: &str) -> Result<Self> {
        let raw = format!(
            "{}/{}",
            base_url.trim_end_matches('/'),
            container.trim_matches('/')
        );
        let mut url = Url::parse(&raw)
            .map_err(|e| Error::configuration(format!("invalid image URL '{}': {}", raw, e)))?;
        if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
            return Err(Error::configuration(format!(
                "image URL '{}' is not an absolute http(s) URL",
                raw
            )));
        }
        url.path_segments_mut()
            .map_err(|_| Error::configuration(format!("image URL '{}' has no path", raw)))?
            .push(object_key);

        Ok(Self {
            url,
            object_key: object_key.to_string(),
        })
    }

    /// Location of a material's image in the image container.
    pub fn for_material(storage: &StorageConfig, code: &MaterialCode) -> Result<Self> {
        storage.require_images()?;
        Self::new(
            storage.base_url(),
            &storage.image_container,
            &code.object_key(),
        )
    }

    /// Another object in the same container.
    pub fn sibling(&self, object_key: &str) -> Self {
        let mut url = self.url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop().push(object_key);
        }
        Self {
            url,
            object_key: object_key.to_string(),
        }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }

    pub fn object_key(&self) -> &str {
        &self.object_key
    }
}

impl fmt::Display for ImageLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.url.as_str())
    }
}
