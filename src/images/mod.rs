//! Image retrieval, normalization and upload.
//!
//! [`ImageService`] runs the retrieval pipeline: locate the material's object,
//! probe it (falling back to the placeholder), fetch, decode and re-encode.
//! [`uploads`] validates uploaded files and hands them to the blob store.

pub mod codec;
mod service;
pub mod uploads;

pub use codec::{DecodedImage, EncodedImage, OutputFormat, Rendition};
pub use service::ImageService;
