//! Validation and storage of uploaded image files.

use bytes::Bytes;
use serde::Serialize;
use std::path::Path;

use matserve_common::{Error, Result};

use crate::blob::BlobStore;
use crate::config::StorageConfig;

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif"];

/// One file received in an upload request.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub data: Bytes,
}

impl UploadedFile {
    /// True if the declared content type or the file extension names an image.
    pub fn is_image(&self) -> bool {
        let by_type = self
            .content_type
            .as_deref()
            .is_some_and(|ct| ct.to_ascii_lowercase().contains("image"));

        let by_extension = Path::new(&self.file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                IMAGE_EXTENSIONS
                    .iter()
                    .any(|known| ext.eq_ignore_ascii_case(known))
            });

        by_type || by_extension
    }

    fn content_type_or_default(&self) -> &str {
        self.content_type
            .as_deref()
            .unwrap_or("application/octet-stream")
    }
}

/// Result of storing a batch of uploads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UploadSummary {
    pub uploaded: usize,
    pub skipped_empty: usize,
}

/// Last path component of a client-supplied file name.
pub fn base_name(raw: &str) -> String {
    raw.rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim()
        .to_string()
}

/// Store every file in order.
///
/// Stops at the first file that has no base name or is not an image.
/// Zero-length files are skipped. Fails when nothing ended up in the store.
pub async fn store_uploads(
    store: &dyn BlobStore,
    storage: &StorageConfig,
    files: Vec<UploadedFile>,
) -> Result<UploadSummary> {
    if files.is_empty() {
        return Err(Error::invalid_input("No files received from the upload"));
    }

    storage.require_images()?;

    let mut summary = UploadSummary {
        uploaded: 0,
        skipped_empty: 0,
    };

    for file in files {
        if file.file_name.is_empty() {
            return Err(Error::invalid_input(
                "uploaded file name has no usable base name",
            ));
        }
        if !file.is_image() {
            return Err(Error::UnsupportedMediaType(format!(
                "'{}' is not an image",
                file.file_name
            )));
        }
        if file.data.is_empty() {
            tracing::debug!("Skipping empty upload {}", file.file_name);
            summary.skipped_empty += 1;
            continue;
        }

        let content_type = file.content_type_or_default().to_string();
        store
            .put_object(&file.file_name, file.data, &content_type)
            .await?;
        summary.uploaded += 1;
    }

    if summary.uploaded == 0 {
        return Err(Error::invalid_input(
            "Look like the image couldnt upload to the storage",
        ));
    }

    Ok(summary)
}
