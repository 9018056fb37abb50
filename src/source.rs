//! Source URL decoding
//!
//! The path segments left over after the directives encode the source image
//! URL and an optional output extension, in one of two forms:
//!
//! ```text
//! /plain/https://example.com/images/cat.jpg@webp
//! /aHR0cHM6Ly9leGFtcGxlLmNvbS9pbWFnZXMvY2F0LmpwZw.webp
//! ```
//!
//! Plain URLs are percent-decoded. Encoded URLs are unpadded base64url and
//! may be split across several segments.

use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;

use crate::constants::PLAIN_URL_TOKEN;
use crate::options::OptionError;

/// Lenient base64url: padding optional, non-canonical trailing bits accepted
const URL_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// Decoded source URL plus the extension requested after it, if any
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedSource {
    pub url: String,
    pub extension: Option<String>,
}

/// Turns the trailing path segments into a source URL
pub trait SourceDecoder: Send + Sync {
    fn decode(&self, segments: &[&str]) -> Result<DecodedSource, OptionError>;
}

/// Plain and base64url decoding with an optional base URL prefix
#[derive(Debug, Clone, Default)]
pub struct DefaultSourceDecoder {
    base_url: String,
}

impl DefaultSourceDecoder {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    /// Split `encoded` into URL and extension on `delimiter`
    fn split_extension<'a>(
        encoded: &'a str,
        delimiter: char,
    ) -> Result<(&'a str, Option<String>), OptionError> {
        let mut parts = encoded.split(delimiter);
        let url = parts.next().unwrap_or_default();
        let extension = parts.next().filter(|ext| !ext.is_empty()).map(str::to_string);

        if parts.next().is_some() {
            return Err(OptionError::InvalidSource(format!(
                "Multiple formats are specified: {}",
                encoded
            )));
        }

        if url.is_empty() {
            return Err(OptionError::InvalidSource("Image URL is empty".to_string()));
        }

        Ok((url, extension))
    }

    fn decode_plain(&self, segments: &[&str]) -> Result<DecodedSource, OptionError> {
        let encoded = segments.join("/");
        let (url, extension) = Self::split_extension(&encoded, '@')?;

        let unescaped = urlencoding::decode(url).map_err(|_| {
            OptionError::InvalidSource(format!("Invalid url encoding: {}", encoded))
        })?;

        Ok(DecodedSource {
            url: format!("{}{}", self.base_url, unescaped),
            extension,
        })
    }

    fn decode_base64(&self, segments: &[&str]) -> Result<DecodedSource, OptionError> {
        let encoded = segments.concat();
        let (url, extension) = Self::split_extension(&encoded, '.')?;

        let invalid = || OptionError::InvalidSource(format!("Invalid url encoding: {}", encoded));

        let bytes = URL_ENGINE
            .decode(url.trim_end_matches('='))
            .map_err(|_| invalid())?;
        let decoded = String::from_utf8(bytes).map_err(|_| invalid())?;

        Ok(DecodedSource {
            url: format!("{}{}", self.base_url, decoded),
            extension,
        })
    }
}

impl SourceDecoder for DefaultSourceDecoder {
    fn decode(&self, segments: &[&str]) -> Result<DecodedSource, OptionError> {
        match segments {
            [] => Err(OptionError::InvalidSource("Image URL is empty".to_string())),
            [token] if *token == PLAIN_URL_TOKEN => {
                Err(OptionError::InvalidSource("Image URL is empty".to_string()))
            }
            [token, rest @ ..] if *token == PLAIN_URL_TOKEN => self.decode_plain(rest),
            _ => self.decode_base64(segments),
        }
    }
}
