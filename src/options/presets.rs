//! Named presets and their recursive resolution
//!
//! A preset is a named list of directives defined in configuration, written
//! the same way as the directive part of a request path:
//!
//! ```text
//! thumbnail=rs:fill:150:150/q:70
//! sharp=sharpen:0.7/pr:thumbnail
//! ```
//!
//! Presets may reference other presets. A preset that was already applied
//! while processing the current request is skipped with a warning.

use std::collections::BTreeMap;
use std::path::Path;

use thiserror::Error;

use super::directive::{apply_options, parse_url_options, UrlOption};
use super::error::OptionError;
use super::processing::ProcessingOptions;

/// Errors raised while loading the preset dictionary
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PresetError {
    #[error("Invalid preset string: {0}")]
    InvalidString(String),

    #[error("Empty preset name: {0}")]
    EmptyName(String),

    #[error("Empty preset value: {0}")]
    EmptyValue(String),

    #[error("Invalid preset value: {0}")]
    InvalidValue(String),

    #[error("Error in preset `{name}`: {source}")]
    Invalid { name: String, source: OptionError },

    #[error("Failed to read presets file: {0}")]
    Io(String),
}

/// Preset name → directive list
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Presets {
    presets: BTreeMap<String, Vec<UrlOption>>,
}

impl Presets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse one `name=directive/directive` definition into the dictionary.
    ///
    /// Blank lines and `#` comments are ignored. A later definition with the
    /// same name replaces the earlier one.
    pub fn parse_line(&mut self, line: &str, separator: &str) -> Result<(), PresetError> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(());
        }

        let mut parts = line.split('=');
        let (name, value) = match (parts.next(), parts.next(), parts.next()) {
            (Some(name), Some(value), None) => (name.trim(), value.trim()),
            _ => return Err(PresetError::InvalidString(line.to_string())),
        };

        if name.is_empty() {
            return Err(PresetError::EmptyName(line.to_string()));
        }

        if value.is_empty() {
            return Err(PresetError::EmptyValue(line.to_string()));
        }

        let segments: Vec<&str> = value.split('/').collect();
        let (options, rest) = parse_url_options(&segments, separator);
        if !rest.is_empty() {
            return Err(PresetError::InvalidValue(line.to_string()));
        }

        self.presets.insert(name.to_string(), options);
        Ok(())
    }

    pub fn from_lines<I, S>(lines: I, separator: &str) -> Result<Self, PresetError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut presets = Self::new();
        for line in lines {
            presets.parse_line(line.as_ref(), separator)?;
        }
        Ok(presets)
    }

    /// Load additional definitions from a file, one per line
    pub fn load_file<P: AsRef<Path>>(&mut self, path: P, separator: &str) -> Result<(), PresetError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| PresetError::Io(format!("{}: {}", path.as_ref().display(), e)))?;

        for line in content.lines() {
            self.parse_line(line, separator)?;
        }

        Ok(())
    }

    pub fn insert(&mut self, name: impl Into<String>, options: Vec<UrlOption>) {
        self.presets.insert(name.into(), options);
    }

    pub fn get(&self, name: &str) -> Option<&[UrlOption]> {
        self.presets.get(name).map(Vec::as_slice)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.presets.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.presets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.presets.keys().map(String::as_str)
    }

    /// Apply every preset to a fresh copy of `baseline` so broken presets
    /// fail at startup instead of on the first request that uses them
    pub fn validate(&self, baseline: &ProcessingOptions) -> Result<(), PresetError> {
        for (name, options) in &self.presets {
            let mut po = baseline.clone();
            po.used_presets.push(name.clone());
            apply_options(&mut po, self, options).map_err(|source| PresetError::Invalid {
                name: name.clone(),
                source,
            })?;
        }

        Ok(())
    }
}

/// Resolve `names` in order against the dictionary.
///
/// Unknown names fail. A name already recorded in `po.used_presets` is
/// skipped, which is what stops `a → b → a` chains from looping.
pub fn apply_presets(
    po: &mut ProcessingOptions,
    presets: &Presets,
    names: &[String],
) -> Result<(), OptionError> {
    for name in names {
        let options = presets
            .get(name)
            .ok_or_else(|| OptionError::UnknownPreset(name.clone()))?;

        if po.is_preset_used(name) {
            tracing::warn!(
                preset = %name,
                used_presets = ?po.used_presets,
                "Recursive preset usage is detected: {}",
                name
            );
            continue;
        }

        po.used_presets.push(name.clone());
        apply_options(po, presets, options)?;
    }

    Ok(())
}
