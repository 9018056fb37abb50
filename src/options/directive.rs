//! Directive names, path segment parsing, and dispatch
//!
//! Directives appear in the request path as `name:arg1:arg2:...` segments.
//! Every canonical name and its short alias resolve to the same `Directive`
//! through a lookup table built once per process.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use super::error::OptionError;
use super::handlers;
use super::presets::{apply_presets, Presets};
use super::processing::ProcessingOptions;

/// Every supported directive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Directive {
    Resize,
    Size,
    ResizingType,
    Width,
    Height,
    MinWidth,
    MinHeight,
    Dpr,
    Enlarge,
    Extend,
    Gravity,
    Crop,
    Trim,
    Padding,
    AutoRotate,
    Rotate,
    Background,
    Blur,
    Sharpen,
    Watermark,
    StripMetadata,
    StripColorProfile,
    Quality,
    MaxBytes,
    Format,
    SkipProcessing,
    CacheBuster,
    Expires,
    Filename,
    Preset,
}

/// Accepted names, canonical first
const DIRECTIVE_NAMES: &[(Directive, &[&str])] = &[
    (Directive::Resize, &["resize", "rs"]),
    (Directive::Size, &["size", "s"]),
    (Directive::ResizingType, &["resizing_type", "rt"]),
    (Directive::Width, &["width", "w"]),
    (Directive::Height, &["height", "h"]),
    (Directive::MinWidth, &["min-width", "mw"]),
    (Directive::MinHeight, &["min-height", "mh"]),
    (Directive::Dpr, &["dpr"]),
    (Directive::Enlarge, &["enlarge", "el"]),
    (Directive::Extend, &["extend", "ex"]),
    (Directive::Gravity, &["gravity", "g"]),
    (Directive::Crop, &["crop", "c"]),
    (Directive::Trim, &["trim", "t"]),
    (Directive::Padding, &["padding", "pd"]),
    (Directive::AutoRotate, &["auto_rotate", "ar"]),
    (Directive::Rotate, &["rotate", "rot"]),
    (Directive::Background, &["background", "bg"]),
    (Directive::Blur, &["blur", "bl"]),
    (Directive::Sharpen, &["sharpen", "sh"]),
    (Directive::Watermark, &["watermark", "wm"]),
    (Directive::StripMetadata, &["strip_metadata", "sm"]),
    (Directive::StripColorProfile, &["strip_color_profile", "scp"]),
    (Directive::Quality, &["quality", "q"]),
    (Directive::MaxBytes, &["max_bytes", "mb"]),
    (Directive::Format, &["format", "f", "ext"]),
    (Directive::SkipProcessing, &["skip_processing", "skp"]),
    (Directive::CacheBuster, &["cachebuster", "cb"]),
    (Directive::Expires, &["expires", "exp"]),
    (Directive::Filename, &["filename", "fn"]),
    (Directive::Preset, &["preset", "pr"]),
];

static DIRECTIVE_TABLE: OnceLock<HashMap<&'static str, Directive>> = OnceLock::new();

fn directive_table() -> &'static HashMap<&'static str, Directive> {
    DIRECTIVE_TABLE.get_or_init(|| {
        DIRECTIVE_NAMES
            .iter()
            .flat_map(|(directive, names)| names.iter().map(move |name| (*name, *directive)))
            .collect()
    })
}

impl Directive {
    pub fn from_name(name: &str) -> Option<Self> {
        directive_table().get(name).copied()
    }

    /// Canonical (long) name
    pub fn name(&self) -> &'static str {
        self.names()[0]
    }

    /// Canonical name followed by its aliases
    pub fn names(&self) -> &'static [&'static str] {
        DIRECTIVE_NAMES
            .iter()
            .find(|(directive, _)| directive == self)
            .map(|(_, names)| *names)
            .unwrap_or(&[])
    }

    pub fn all() -> impl Iterator<Item = Directive> {
        DIRECTIVE_NAMES.iter().map(|(directive, _)| *directive)
    }
}

impl FromStr for Directive {
    type Err = OptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Directive::from_name(s).ok_or_else(|| OptionError::UnknownOption(s.to_string()))
    }
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One `name:args...` segment as it appeared in the path or a preset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlOption {
    pub name: String,
    pub args: Vec<String>,
}

impl UrlOption {
    pub fn new(name: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            name: name.into(),
            args,
        }
    }

    /// Split a segment on `separator`; `None` when it carries no arguments
    pub fn parse_segment(segment: &str, separator: &str) -> Option<Self> {
        let mut parts = segment.split(separator);
        let name = parts.next()?;
        let args: Vec<String> = parts.map(str::to_string).collect();

        if args.is_empty() {
            return None;
        }

        Some(Self::new(name, args))
    }
}

/// Split leading directive segments from the rest of the path.
///
/// Parsing stops at the first segment that contains no separator; that
/// segment and everything after it belong to the source URL.
pub fn parse_url_options<'s, 'a>(
    segments: &'s [&'a str],
    separator: &str,
) -> (Vec<UrlOption>, &'s [&'a str]) {
    let mut options = Vec::with_capacity(segments.len());

    for (index, segment) in segments.iter().enumerate() {
        match UrlOption::parse_segment(segment, separator) {
            Some(option) => options.push(option),
            None => return (options, &segments[index..]),
        }
    }

    (options, &[])
}

/// Apply one directive by name
pub fn apply_option(
    po: &mut ProcessingOptions,
    presets: &Presets,
    name: &str,
    args: &[String],
) -> Result<(), OptionError> {
    let directive: Directive = name.parse()?;

    tracing::debug!(directive = directive.name(), args = ?args, "Applying processing option");

    match directive {
        Directive::Resize => handlers::apply_resize(po, args),
        Directive::Size => handlers::apply_size(po, args),
        Directive::ResizingType => handlers::apply_resizing_type(po, args),
        Directive::Width => handlers::apply_width(po, args),
        Directive::Height => handlers::apply_height(po, args),
        Directive::MinWidth => handlers::apply_min_width(po, args),
        Directive::MinHeight => handlers::apply_min_height(po, args),
        Directive::Dpr => handlers::apply_dpr(po, args),
        Directive::Enlarge => handlers::apply_enlarge(po, args),
        Directive::Extend => handlers::apply_extend(po, args),
        Directive::Gravity => handlers::apply_gravity(po, args),
        Directive::Crop => handlers::apply_crop(po, args),
        Directive::Trim => handlers::apply_trim(po, args),
        Directive::Padding => handlers::apply_padding(po, args),
        Directive::AutoRotate => handlers::apply_auto_rotate(po, args),
        Directive::Rotate => handlers::apply_rotate(po, args),
        Directive::Background => handlers::apply_background(po, args),
        Directive::Blur => handlers::apply_blur(po, args),
        Directive::Sharpen => handlers::apply_sharpen(po, args),
        Directive::Watermark => handlers::apply_watermark(po, args),
        Directive::StripMetadata => handlers::apply_strip_metadata(po, args),
        Directive::StripColorProfile => handlers::apply_strip_color_profile(po, args),
        Directive::Quality => handlers::apply_quality(po, args),
        Directive::MaxBytes => handlers::apply_max_bytes(po, args),
        Directive::Format => handlers::apply_format(po, args),
        Directive::SkipProcessing => handlers::apply_skip_processing(po, args),
        Directive::CacheBuster => handlers::apply_cache_buster(po, args),
        Directive::Expires => handlers::apply_expires(po, args),
        Directive::Filename => handlers::apply_filename(po, args),
        Directive::Preset => apply_presets(po, presets, args),
    }
}

/// Apply directives in order; later ones override earlier ones field by field
pub fn apply_options(
    po: &mut ProcessingOptions,
    presets: &Presets,
    options: &[UrlOption],
) -> Result<(), OptionError> {
    for option in options {
        apply_option(po, presets, &option.name, &option.args)?;
    }

    Ok(())
}
