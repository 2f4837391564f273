//! Identifiers and tags shared across matserve.

use std::fmt;

use crate::error::{Error, Result};

/// Extension appended to a material code to form its object key.
pub const MATERIAL_EXTENSION: &str = "jpeg";

/// Logical identifier of a material image.
///
/// Must be non-empty and usable as a single URL path segment. The code is
/// kept exactly as given; surrounding whitespace is rejected, not trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MaterialCode(String);

impl MaterialCode {
    /// Validate a raw material code.
    pub fn parse(raw: &str) -> Result<Self> {
        if raw.trim().is_empty() {
            return Err(Error::invalid_input("material code must not be empty"));
        }
        if raw.trim() != raw {
            return Err(Error::invalid_input(format!(
                "material code '{}' has surrounding whitespace",
                raw
            )));
        }
        if raw.contains(['/', '\\', '?', '#']) {
            return Err(Error::invalid_input(format!(
                "material code '{}' is not a valid path segment",
                raw
            )));
        }
        Ok(Self(raw.to_string()))
    }

    /// Name of the blob holding this material's image.
    pub fn object_key(&self) -> String {
        format!("{}.{}", self.0, MATERIAL_EXTENSION)
    }

    /// The raw code.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MaterialCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Format detected when decoding fetched bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SourceFormat {
    Png,
    Jpeg,
    /// Any other decodable format, by lowercase name (e.g. "bmp").
    Other(String),
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Png => write!(f, "png"),
            Self::Jpeg => write!(f, "jpeg"),
            Self::Other(name) => write!(f, "{}", name),
        }
    }
}
