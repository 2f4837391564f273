//! Decoding fetched bytes and re-encoding them to PNG or JPEG.
//!
//! The output format always mirrors the detected source format; there is no
//! transcoding between PNG and JPEG. Any other source format is reported as
//! [`Rendition::Unsupported`].

use std::borrow::Cow;
use std::io::Cursor;

use image::{DynamicImage, ImageFormat, ImageReader};
use matserve_common::{Error, Result, SourceFormat};

/// Formats the codec can write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Png,
    Jpeg,
}

impl OutputFormat {
    /// MIME type for responses carrying this encoding.
    pub fn content_type(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
        }
    }

    fn image_format(self) -> ImageFormat {
        match self {
            Self::Png => ImageFormat::Png,
            Self::Jpeg => ImageFormat::Jpeg,
        }
    }

    /// Output format matching a source format, if it is one we render.
    pub fn for_source(format: &SourceFormat) -> Option<Self> {
        match format {
            SourceFormat::Png => Some(Self::Png),
            SourceFormat::Jpeg => Some(Self::Jpeg),
            SourceFormat::Other(_) => None,
        }
    }
}

/// An image decoded in memory, tagged with the format it was stored in.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    pub image: DynamicImage,
    pub format: SourceFormat,
    /// Object key the bytes came from.
    pub file_name: String,
}

/// Encoded bytes ready to be framed into a response.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedImage {
    pub bytes: Vec<u8>,
    pub format: OutputFormat,
    pub file_name: String,
}

impl EncodedImage {
    pub fn content_type(&self) -> &'static str {
        self.format.content_type()
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Outcome of the shared decode, encode and classify step.
#[derive(Debug, Clone, PartialEq)]
pub enum Rendition {
    Encoded(EncodedImage),
    /// The source decoded fine but is neither PNG nor JPEG.
    Unsupported(SourceFormat),
}

/// Sniff the format from the magic bytes and decode.
pub fn decode(bytes: &[u8], file_name: impl Into<String>) -> Result<DecodedImage> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| Error::decode(format!("failed to read image header: {}", e)))?;

    let detected = reader
        .format()
        .ok_or_else(|| Error::decode("bytes are not a recognized image encoding"))?;

    let image = reader
        .decode()
        .map_err(|e| Error::decode(format!("failed to decode {:?} image: {}", detected, e)))?;

    Ok(DecodedImage {
        image,
        format: source_format(detected),
        file_name: file_name.into(),
    })
}

/// Serialize the image as PNG or JPEG.
pub fn encode(decoded: &DecodedImage, format: OutputFormat) -> Result<Vec<u8>> {
    let image = match format {
        OutputFormat::Png => Cow::Borrowed(&decoded.image),
        OutputFormat::Jpeg => jpeg_compatible(&decoded.image),
    };

    let mut buf = Cursor::new(Vec::new());
    image
        .write_to(&mut buf, format.image_format())
        .map_err(|e| Error::Encode(format!("failed to encode {:?}: {}", format, e)))?;
    Ok(buf.into_inner())
}

/// Re-encode in the source's own format, or report it unsupported.
pub fn classify(decoded: DecodedImage) -> Result<Rendition> {
    let Some(format) = OutputFormat::for_source(&decoded.format) else {
        return Ok(Rendition::Unsupported(decoded.format));
    };

    let bytes = encode(&decoded, format)?;
    Ok(Rendition::Encoded(EncodedImage {
        bytes,
        format,
        file_name: decoded.file_name,
    }))
}

fn source_format(format: ImageFormat) -> SourceFormat {
    match format {
        ImageFormat::Png => SourceFormat::Png,
        ImageFormat::Jpeg => SourceFormat::Jpeg,
        other => SourceFormat::Other(
            other
                .extensions_str()
                .first()
                .map(|ext| ext.to_string())
                .unwrap_or_else(|| format!("{:?}", other).to_lowercase()),
        ),
    }
}

// The JPEG encoder takes 8-bit gray or RGB only.
fn jpeg_compatible(image: &DynamicImage) -> Cow<'_, DynamicImage> {
    match image {
        DynamicImage::ImageRgb8(_) | DynamicImage::ImageLuma8(_) => Cow::Borrowed(image),
        other => Cow::Owned(DynamicImage::ImageRgb8(other.to_rgb8())),
    }
}
