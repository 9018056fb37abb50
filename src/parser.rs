//! Request path parsing
//!
//! `PathParser` is built once at startup and shared by all requests. It owns
//! the baseline options, the preset dictionary, the source decoder and the
//! signature verifier; each call to `parse_path` works on its own copy of
//! the baseline.
//!
//! Two path layouts are supported, selected by `processing.only_presets`:
//!
//! ```text
//! options mode:       /rs:fill:300:200/q:80/plain/https://example.com/img.jpg
//! presets-only mode:  /thumb:sharp/plain/https://example.com/img.jpg
//! ```

use http::HeaderMap;
use serde::Serialize;

use crate::config::{Config, ProcessingConfig};
use crate::error::RequestError;
use crate::options::{
    apply_options, apply_presets, default_options, handlers, parse_url_options, OptionError,
    Presets, ProcessingOptions,
};
use crate::signature::SignatureVerifier;
use crate::source::{DecodedSource, DefaultSourceDecoder, SourceDecoder};

/// Successful parse result
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParsedPath {
    pub options: ProcessingOptions,
    pub source_url: String,
}

/// Turns request paths into processing options
pub struct PathParser {
    config: ProcessingConfig,
    baseline: ProcessingOptions,
    presets: Presets,
    decoder: Box<dyn SourceDecoder>,
    verifier: SignatureVerifier,
}

impl std::fmt::Debug for PathParser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PathParser")
            .field("only_presets", &self.config.only_presets)
            .field("presets", &self.presets.len())
            .field("signing", &self.verifier.is_enabled())
            .finish()
    }
}

impl PathParser {
    /// Build the parser from configuration.
    ///
    /// Loads and validates presets and decodes signing keys, so a bad config
    /// fails here rather than on the first request.
    pub fn new(config: &Config) -> Result<Self, String> {
        let processing = config.processing.clone();
        let baseline = ProcessingOptions::baseline(&processing);

        let presets = processing.load_presets()?;
        presets.validate(&baseline).map_err(|e| e.to_string())?;

        if processing.only_presets && presets.is_empty() {
            return Err("Presets-only mode requires at least one preset".to_string());
        }

        let verifier = SignatureVerifier::from_config(&config.security)?;
        let decoder = Box::new(DefaultSourceDecoder::new(processing.base_url.clone()));

        tracing::debug!(
            presets = presets.len(),
            only_presets = processing.only_presets,
            signing = verifier.is_enabled(),
            "Path parser initialized"
        );

        Ok(Self {
            config: processing,
            baseline,
            presets,
            decoder,
            verifier,
        })
    }

    /// Replace the source URL decoder
    pub fn with_decoder<D: SourceDecoder + 'static>(mut self, decoder: D) -> Self {
        self.decoder = Box::new(decoder);
        self
    }

    pub fn baseline(&self) -> &ProcessingOptions {
        &self.baseline
    }

    pub fn presets(&self) -> &Presets {
        &self.presets
    }

    pub fn processing_config(&self) -> &ProcessingConfig {
        &self.config
    }

    /// Parse an unsigned path
    pub fn parse_path(&self, path: &str, headers: &HeaderMap) -> Result<ParsedPath, RequestError> {
        if path.is_empty() || path == "/" {
            return Err(RequestError::empty_path(path));
        }

        let segments: Vec<&str> = path.strip_prefix('/').unwrap_or(path).split('/').collect();

        let result = if self.config.only_presets {
            self.parse_presets_path(&segments, headers)
        } else {
            self.parse_options_path(&segments, headers)
        };

        match result {
            Ok(parsed) => {
                tracing::debug!(
                    path = %path,
                    source_url = %parsed.source_url,
                    used_presets = ?parsed.options.used_presets,
                    "Parsed request path"
                );
                Ok(parsed)
            }
            Err(err) => {
                tracing::debug!(path = %path, error = %err, "Failed to parse request path");
                Err(RequestError::from(err))
            }
        }
    }

    /// Parse a path whose first segment is a signature over the rest
    pub fn parse_signed_path(
        &self,
        path: &str,
        headers: &HeaderMap,
    ) -> Result<ParsedPath, RequestError> {
        let trimmed = path.strip_prefix('/').unwrap_or(path);

        let (signature, rest) = match trimmed.split_once('/') {
            Some((signature, rest)) if !rest.is_empty() => (signature, rest),
            _ => return Err(RequestError::empty_path(path)),
        };

        let unsigned = format!("/{}", rest);
        self.verifier.verify(signature, &unsigned)?;

        self.parse_path(&unsigned, headers)
    }

    fn parse_options_path(
        &self,
        segments: &[&str],
        headers: &HeaderMap,
    ) -> Result<ParsedPath, OptionError> {
        let mut po = default_options(&self.baseline, &self.config, &self.presets, headers)?;

        let (options, url_segments) = parse_url_options(segments, &self.config.arguments_separator);
        apply_options(&mut po, &self.presets, &options)?;

        let source = self.decoder.decode(url_segments)?;
        Self::finish(po, source)
    }

    fn parse_presets_path(
        &self,
        segments: &[&str],
        headers: &HeaderMap,
    ) -> Result<ParsedPath, OptionError> {
        let mut po = default_options(&self.baseline, &self.config, &self.presets, headers)?;

        let (first, url_segments) = segments
            .split_first()
            .ok_or_else(|| OptionError::InvalidSource("Image URL is empty".to_string()))?;

        let names: Vec<String> = first
            .split(self.config.arguments_separator.as_str())
            .map(str::to_string)
            .collect();
        apply_presets(&mut po, &self.presets, &names)?;

        let source = self.decoder.decode(url_segments)?;
        Self::finish(po, source)
    }

    /// Trailing extension overrides any format set by directives
    fn finish(mut po: ProcessingOptions, source: DecodedSource) -> Result<ParsedPath, OptionError> {
        if let Some(extension) = source.extension {
            handlers::apply_format(&mut po, &[extension])?;
        }

        Ok(ParsedPath {
            options: po,
            source_url: source.url,
        })
    }
}
