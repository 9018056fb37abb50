//! Per-request default options
//!
//! Copies the baseline, overlays hints derived from request headers
//! (content negotiation and client hints), then applies the `default`
//! preset when one is configured.

use http::header::ACCEPT;
use http::HeaderMap;

use super::error::OptionError;
use super::presets::{apply_presets, Presets};
use super::processing::ProcessingOptions;
use super::types::ImageType;
use crate::config::ProcessingConfig;
use crate::constants::{DEFAULT_PRESET_NAME, MAX_CLIENT_HINT_DPR};

const VIEWPORT_WIDTH_HEADER: &str = "viewport-width";
const WIDTH_HEADER: &str = "width";
const DPR_HEADER: &str = "dpr";

/// Whether the Accept header mentions the MIME type of `format` anywhere.
///
/// This is a plain substring match: `q` parameters and wildcards are not
/// interpreted.
fn accepts(accept: &str, format: ImageType) -> bool {
    accept.contains(format.mime())
}

fn header_str<'h>(headers: &'h HeaderMap, name: &str) -> Option<&'h str> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

/// Overlay content negotiation flags and client hints onto `po`
pub fn apply_request_hints(
    po: &mut ProcessingOptions,
    config: &ProcessingConfig,
    headers: &HeaderMap,
) {
    if let Some(accept) = headers.get(ACCEPT).and_then(|value| value.to_str().ok()) {
        if accepts(accept, ImageType::Webp) {
            po.prefer_webp = config.enable_webp_detection || config.enforce_webp;
            po.enforce_webp = config.enforce_webp;
        }

        if accepts(accept, ImageType::Avif) {
            po.prefer_avif = config.enable_avif_detection || config.enforce_avif;
            po.enforce_avif = config.enforce_avif;
        }
    }

    if !config.enable_client_hints {
        return;
    }

    // Width wins over Viewport-Width when both are present
    for name in [VIEWPORT_WIDTH_HEADER, WIDTH_HEADER] {
        if let Some(width) = header_str(headers, name).and_then(|v| v.parse::<u32>().ok()) {
            po.width = width;
        }
    }

    if let Some(dpr) = header_str(headers, DPR_HEADER).and_then(|v| v.parse::<f64>().ok()) {
        if dpr > 0.0 && dpr <= MAX_CLIENT_HINT_DPR {
            po.dpr = dpr;
        }
    }
}

/// Build the starting options for one request.
///
/// `baseline` is cloned, never mutated.
pub fn default_options(
    baseline: &ProcessingOptions,
    config: &ProcessingConfig,
    presets: &Presets,
    headers: &HeaderMap,
) -> Result<ProcessingOptions, OptionError> {
    let mut po = baseline.clone();

    apply_request_hints(&mut po, config, headers);

    if presets.contains(DEFAULT_PRESET_NAME) {
        apply_presets(&mut po, presets, &[DEFAULT_PRESET_NAME.to_string()])?;
    }

    Ok(po)
}
