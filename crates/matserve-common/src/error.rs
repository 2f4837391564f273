//! Error type for the image retrieval pipeline.
//!
//! Every failure a request can hit is one of these variants. Route handlers
//! turn them into responses using [`Error::http_status`] and [`Error::code`].

/// Unified error type for matserve.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Storage URL or container name is missing.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Request data failed validation.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// An upload part is not an image.
    #[error("Unsupported media type: {0}")]
    UnsupportedMediaType(String),

    /// The remote image (and the placeholder) could not be fetched.
    #[error("Image unavailable at {url}: {reason}")]
    UnavailableImage {
        /// URL the fetch was attempted against.
        url: String,
        /// Why the fetch failed.
        reason: String,
    },

    /// Fetched bytes are not a recognized image encoding.
    #[error("Decode error: {0}")]
    Decode(String),

    /// Decoded image is neither PNG nor JPEG.
    #[error("Unsupported image format: {0}")]
    UnsupportedFormat(String),

    /// Re-encoding the image failed.
    #[error("Encode error: {0}")]
    Encode(String),

    /// The blob store rejected a put or list operation.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Catch-all for unexpected internal errors.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Map this error to an HTTP status code.
    pub fn http_status(&self) -> u16 {
        match self {
            Error::Configuration(_) => 400,
            Error::InvalidInput(_) => 400,
            Error::UnsupportedMediaType(_) => 415,
            Error::UnavailableImage { .. } => 503,
            Error::Decode(_) => 502,
            Error::UnsupportedFormat(_) => 404,
            Error::Encode(_) => 500,
            Error::Storage(_) => 502,
            Error::Internal(_) => 500,
        }
    }

    /// Stable machine-readable tag for response bodies.
    pub fn code(&self) -> &'static str {
        match self {
            Error::Configuration(_) => "configuration_error",
            Error::InvalidInput(_) => "invalid_input",
            Error::UnsupportedMediaType(_) => "unsupported_media_type",
            Error::UnavailableImage { .. } => "image_unavailable",
            Error::Decode(_) => "decode_error",
            Error::UnsupportedFormat(_) => "unsupported_format",
            Error::Encode(_) => "encode_error",
            Error::Storage(_) => "storage_error",
            Error::Internal(_) => "internal_error",
        }
    }

    /// Create a new Configuration error.
    pub fn configuration<S: Into<String>>(msg: S) -> Self {
        Self::Configuration(msg.into())
    }

    /// Create a new InvalidInput error.
    pub fn invalid_input<S: Into<String>>(msg: S) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create an UnavailableImage error for `url`.
    pub fn unavailable<U: Into<String>, R: Into<String>>(url: U, reason: R) -> Self {
        Self::UnavailableImage {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Create a new Decode error.
    pub fn decode<S: Into<String>>(msg: S) -> Self {
        Self::Decode(msg.into())
    }

    /// Create an UnsupportedFormat error naming the detected format.
    pub fn unsupported_format<S: Into<String>>(format: S) -> Self {
        Self::UnsupportedFormat(format.into())
    }

    /// Create a new Storage error.
    pub fn storage<S: Into<String>>(msg: S) -> Self {
        Self::Storage(msg.into())
    }

    /// Create a new Internal error.
    pub fn internal<S: Into<String>>(msg: S) -> Self {
        Self::Internal(msg.into())
    }
}

/// Result type alias using the common Error type.
pub type Result<T> = std::result::Result<T, Error>;
