//! Base64-encoded images.

use ::image::ImageFormat;
use base64::Engine;
use base64::alphabet;
use base64::engine::DecodePaddingMode;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig, STANDARD};
use bytes::Bytes;
use serde_json::Value;

use super::{FromConfig, Transform, first_string};
use crate::UrlConfig;

/// Decoder that accepts both padded and unpadded input.
const LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// An encoded image and its sniffed format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    bytes: Bytes,
    format: ImageFormat,
}

impl Image {
    /// Wrap encoded image bytes, or `None` if the format is not recognized.
    #[must_use]
    pub fn from_bytes(bytes: impl Into<Bytes>) -> Option<Self> {
        let bytes = bytes.into();
        let format = ::image::guess_format(&bytes).ok()?;
        Some(Self { bytes, format })
    }

    /// The encoded bytes.
    #[must_use]
    pub const fn bytes(&self) -> &Bytes {
        &self.bytes
    }

    /// The image format.
    #[must_use]
    pub const fn format(&self) -> ImageFormat {
        self.format
    }

    /// The MIME type of the image format.
    #[must_use]
    pub fn mime_type(&self) -> &'static str {
        self.format.to_mime_type()
    }
}

/// Images delivered as base64 strings.
///
/// A `data:<mime>;base64,` prefix is stripped and characters outside the
/// base64 alphabet (line breaks, spaces) are ignored. Decoding fails if the
/// bytes are not a recognized image.
#[derive(Debug, Clone, Copy, Default)]
pub struct Base64Image;

impl Base64Image {
    fn decode_str(encoded: &str) -> Option<Image> {
        let encoded = match encoded.trim_start().strip_prefix("data:") {
            Some(data_url) => data_url.split_once(',').map(|(_, data)| data)?,
            None => encoded,
        };
        let cleaned: String = encoded
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '/' | '='))
            .collect();
        let bytes = LENIENT.decode(cleaned).ok()?;
        Image::from_bytes(bytes)
    }
}

impl Transform for Base64Image {
    type Value = Image;

    fn decode(&self, raw: Option<&Value>) -> Option<Image> {
        first_string(raw).and_then(Self::decode_str)
    }

    fn encode(&self, value: Option<&Image>) -> Option<Value> {
        value.map(|image| Value::String(STANDARD.encode(image.bytes())))
    }
}

impl FromConfig for Base64Image {
    fn from_config(_config: &UrlConfig) -> Self {
        Self
    }
}
