// Configuration module

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use crate::constants::{DEFAULT_ARGUMENTS_SEPARATOR, DEFAULT_QUALITY, DEFAULT_SIGNATURE_SIZE};
use crate::options::{ImageType, Presets, ProcessingOptions};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub processing: ProcessingConfig,
    #[serde(default)]
    pub security: SecurityConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_quality() -> u8 {
    DEFAULT_QUALITY
}

fn default_true() -> bool {
    true
}

fn default_arguments_separator() -> String {
    DEFAULT_ARGUMENTS_SEPARATOR.to_string()
}

fn default_signature_size() -> usize {
    DEFAULT_SIGNATURE_SIZE
}

/// Defaults and switches consumed while parsing request paths
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingConfig {
    /// Quality used when neither the request nor `format_quality` sets one
    #[serde(default = "default_quality")]
    pub quality: u8,

    /// Per-format quality overrides
    #[serde(default)]
    pub format_quality: HashMap<ImageType, u8>,

    #[serde(default = "default_true")]
    pub strip_metadata: bool,

    #[serde(default = "default_true")]
    pub strip_color_profile: bool,

    #[serde(default = "default_true")]
    pub auto_rotate: bool,

    /// Formats passed through without processing
    #[serde(default)]
    pub skip_processing_formats: Vec<ImageType>,

    /// Prefer WebP when the client accepts it
    #[serde(default)]
    pub enable_webp_detection: bool,

    /// Always convert to WebP when the client accepts it
    #[serde(default)]
    pub enforce_webp: bool,

    #[serde(default)]
    pub enable_avif_detection: bool,

    #[serde(default)]
    pub enforce_avif: bool,

    /// Honor `Viewport-Width`, `Width` and `DPR` request headers
    #[serde(default)]
    pub enable_client_hints: bool,

    /// Path carries a preset list instead of directives
    #[serde(default)]
    pub only_presets: bool,

    /// Separator between a directive name and its arguments
    #[serde(default = "default_arguments_separator")]
    pub arguments_separator: String,

    /// Prefix prepended to every decoded source URL
    #[serde(default)]
    pub base_url: String,

    /// Preset definitions, `name=directive/directive`
    #[serde(default)]
    pub presets: Vec<String>,

    /// Optional file with one preset definition per line
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub presets_path: Option<String>,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            quality: DEFAULT_QUALITY,
            format_quality: HashMap::new(),
            strip_metadata: true,
            strip_color_profile: true,
            auto_rotate: true,
            skip_processing_formats: Vec::new(),
            enable_webp_detection: false,
            enforce_webp: false,
            enable_avif_detection: false,
            enforce_avif: false,
            enable_client_hints: false,
            only_presets: false,
            arguments_separator: DEFAULT_ARGUMENTS_SEPARATOR.to_string(),
            base_url: String::new(),
            presets: Vec::new(),
            presets_path: None,
        }
    }
}

impl ProcessingConfig {
    /// Build the preset dictionary from inline definitions and `presets_path`
    pub fn load_presets(&self) -> Result<Presets, String> {
        let mut presets = Presets::from_lines(&self.presets, &self.arguments_separator)
            .map_err(|e| e.to_string())?;

        if let Some(path) = &self.presets_path {
            presets
                .load_file(path, &self.arguments_separator)
                .map_err(|e| e.to_string())?;
        }

        Ok(presets)
    }
}

/// Request path signing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    /// Hex-encoded HMAC keys; signing is disabled when empty
    #[serde(default)]
    pub keys: Vec<String>,

    /// Hex-encoded salts, paired with `keys` by position
    #[serde(default)]
    pub salts: Vec<String>,

    /// Number of leading HMAC bytes carried in the signature
    #[serde(default = "default_signature_size")]
    pub signature_size: usize,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            keys: Vec::new(),
            salts: Vec::new(),
            signature_size: DEFAULT_SIGNATURE_SIZE,
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Json,
    Pretty,
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive; `RUST_LOG` takes precedence
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::Json,
        }
    }
}

impl Config {
    pub fn from_yaml_with_env(yaml: &str) -> Result<Self, String> {
        // Replace ${VAR_NAME} with environment variable values
        let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").map_err(|e| e.to_string())?;

        // First, check that all referenced environment variables exist
        for caps in re.captures_iter(yaml) {
            let var_name = &caps[1];
            std::env::var(var_name).map_err(|_| {
                format!(
                    "Environment variable '{}' is referenced but not set",
                    var_name
                )
            })?;
        }

        let substituted = re.replace_all(yaml, |caps: &regex::Captures| {
            std::env::var(&caps[1]).unwrap_or_default()
        });

        serde_yaml::from_str(&substituted).map_err(|e| e.to_string())
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let yaml = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {}", e))?;
        Self::from_yaml_with_env(&yaml)
    }

    pub fn validate(&self) -> Result<(), String> {
        let processing = &self.processing;

        if !(1..=100).contains(&processing.quality) {
            return Err(format!(
                "Quality must be between 1 and 100, got {}",
                processing.quality
            ));
        }

        for (format, quality) in &processing.format_quality {
            if !(1..=100).contains(quality) {
                return Err(format!(
                    "Quality for format '{}' must be between 1 and 100, got {}",
                    format, quality
                ));
            }
        }

        if processing.arguments_separator.is_empty() {
            return Err("Arguments separator cannot be empty".to_string());
        }

        if processing.arguments_separator.contains('/') {
            return Err(format!(
                "Arguments separator '{}' cannot contain '/'",
                processing.arguments_separator
            ));
        }

        let presets = processing.load_presets()?;

        if processing.only_presets && presets.is_empty() {
            return Err("only_presets is enabled but no presets are defined".to_string());
        }

        presets
            .validate(&ProcessingOptions::baseline(processing))
            .map_err(|e| e.to_string())?;

        let security = &self.security;

        if security.keys.len() != security.salts.len() {
            return Err(format!(
                "Number of signing keys ({}) and salts ({}) must match",
                security.keys.len(),
                security.salts.len()
            ));
        }

        for (kind, values) in [("key", &security.keys), ("salt", &security.salts)] {
            for (idx, value) in values.iter().enumerate() {
                if hex::decode(value).is_err() {
                    return Err(format!(
                        "Signing {} at index {} is not valid hex",
                        kind, idx
                    ));
                }
            }
        }

        if security.signature_size == 0 || security.signature_size > DEFAULT_SIGNATURE_SIZE {
            return Err(format!(
                "Signature size must be between 1 and {}, got {}",
                DEFAULT_SIGNATURE_SIZE, security.signature_size
            ));
        }

        Ok(())
    }
}
