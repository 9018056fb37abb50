//! The processing options aggregate
//!
//! One `ProcessingOptions` value is produced per request. It starts as a copy
//! of the process-wide baseline (built once from configuration) and is then
//! mutated in place by directive handlers.

use serde::Serialize;

use super::types::{Color, GravityType, ImageType, ResizeType};
use crate::config::ProcessingConfig;
use crate::constants::{DEFAULT_DPR, DEFAULT_TRIM_THRESHOLD, DEFAULT_WATERMARK_OPACITY};

/// Anchor type plus optional offsets
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct GravityOptions {
    #[serde(rename = "type")]
    pub gravity_type: GravityType,
    pub x: f64,
    pub y: f64,
}

impl GravityOptions {
    pub fn new(gravity_type: GravityType) -> Self {
        Self {
            gravity_type,
            x: 0.0,
            y: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct ExtendOptions {
    pub enabled: bool,
    pub gravity: GravityOptions,
}

/// Crop area; a zero dimension means unconstrained
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct CropOptions {
    pub width: f64,
    pub height: f64,
    pub gravity: GravityOptions,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct PaddingOptions {
    pub enabled: bool,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
    pub left: u32,
}

impl PaddingOptions {
    pub fn is_empty(&self) -> bool {
        self.top == 0 && self.right == 0 && self.bottom == 0 && self.left == 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrimOptions {
    pub enabled: bool,
    pub threshold: f64,
    /// Detect the background color automatically
    pub smart: bool,
    pub color: Color,
    pub equal_hor: bool,
    pub equal_ver: bool,
}

impl Default for TrimOptions {
    fn default() -> Self {
        Self {
            enabled: false,
            threshold: DEFAULT_TRIM_THRESHOLD,
            smart: true,
            color: Color::default(),
            equal_hor: false,
            equal_ver: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WatermarkOptions {
    pub enabled: bool,
    pub opacity: f64,
    pub replicate: bool,
    pub gravity: GravityOptions,
    pub scale: f64,
}

impl Default for WatermarkOptions {
    fn default() -> Self {
        Self {
            enabled: false,
            opacity: DEFAULT_WATERMARK_OPACITY,
            replicate: false,
            gravity: GravityOptions::default(),
            scale: 0.0,
        }
    }
}

/// Fully-populated processing instructions for one request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessingOptions {
    // === Geometry ===
    pub resizing_type: ResizeType,
    pub width: u32,
    pub height: u32,
    pub min_width: u32,
    pub min_height: u32,
    pub dpr: f64,
    pub gravity: GravityOptions,
    pub enlarge: bool,
    pub extend: ExtendOptions,
    pub crop: CropOptions,
    pub padding: PaddingOptions,
    pub trim: TrimOptions,
    /// Degrees, always a multiple of 90
    pub rotate: i32,

    // === Output ===
    /// `None` lets the pipeline pick the format
    pub format: Option<ImageType>,
    /// 0 means "use the configured quality"
    pub quality: u8,
    /// 0 means unconstrained
    pub max_bytes: u64,
    pub flatten: bool,
    pub background: Color,
    pub blur: f64,
    pub sharpen: f64,
    pub strip_metadata: bool,
    pub strip_color_profile: bool,
    pub auto_rotate: bool,

    pub watermark: WatermarkOptions,

    // === Content negotiation ===
    pub prefer_webp: bool,
    pub enforce_webp: bool,
    pub prefer_avif: bool,
    pub enforce_avif: bool,

    // === Bookkeeping ===
    pub skip_processing_formats: Vec<ImageType>,
    pub cache_buster: String,
    pub filename: String,
    /// Presets applied so far, in application order
    pub used_presets: Vec<String>,
}

impl ProcessingOptions {
    /// Build the baseline options from configuration.
    ///
    /// Called once at startup; requests clone the result.
    pub fn baseline(config: &ProcessingConfig) -> Self {
        Self {
            resizing_type: ResizeType::Fit,
            width: 0,
            height: 0,
            min_width: 0,
            min_height: 0,
            dpr: DEFAULT_DPR,
            gravity: GravityOptions::default(),
            enlarge: false,
            extend: ExtendOptions::default(),
            crop: CropOptions::default(),
            padding: PaddingOptions::default(),
            trim: TrimOptions::default(),
            rotate: 0,
            format: None,
            quality: 0,
            max_bytes: 0,
            flatten: false,
            background: Color::WHITE,
            blur: 0.0,
            sharpen: 0.0,
            strip_metadata: config.strip_metadata,
            strip_color_profile: config.strip_color_profile,
            auto_rotate: config.auto_rotate,
            watermark: WatermarkOptions::default(),
            prefer_webp: false,
            enforce_webp: false,
            prefer_avif: false,
            enforce_avif: false,
            skip_processing_formats: config.skip_processing_formats.clone(),
            cache_buster: String::new(),
            filename: String::new(),
            used_presets: Vec::new(),
        }
    }

    /// Quality to encode with: explicit value, then per-format override, then default
    pub fn effective_quality(&self, config: &ProcessingConfig) -> u8 {
        if self.quality > 0 {
            return self.quality;
        }

        self.format
            .and_then(|format| config.format_quality.get(&format).copied())
            .filter(|q| *q > 0)
            .unwrap_or(config.quality)
    }

    pub fn is_preset_used(&self, name: &str) -> bool {
        self.used_presets.iter().any(|used| used == name)
    }
}

impl Default for ProcessingOptions {
    fn default() -> Self {
        Self::baseline(&ProcessingConfig::default())
    }
}
