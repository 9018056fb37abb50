//! Enumerations and small value types used by processing options

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::OptionError;

/// How the image is fitted into the requested width and height
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResizeType {
    /// Scale to fit within dimensions, preserving aspect ratio
    #[default]
    Fit,
    /// Scale and crop to fill dimensions exactly
    Fill,
    /// Like `Fill`, but never upscales the crop area
    FillDown,
    /// Stretch to dimensions, ignoring aspect ratio
    Force,
    /// `Fill` or `Fit` depending on source and target orientation
    Auto,
}

impl ResizeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fit => "fit",
            Self::Fill => "fill",
            Self::FillDown => "fill-down",
            Self::Force => "force",
            Self::Auto => "auto",
        }
    }
}

impl FromStr for ResizeType {
    type Err = OptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fit" => Ok(ResizeType::Fit),
            "fill" => Ok(ResizeType::Fill),
            "fill-down" => Ok(ResizeType::FillDown),
            "force" => Ok(ResizeType::Force),
            "auto" => Ok(ResizeType::Auto),
            _ => Err(OptionError::invalid_value("resize type", s)),
        }
    }
}

/// Anchor used by gravity, crop, extend and watermark placement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GravityType {
    #[default]
    Center,
    North,
    East,
    South,
    West,
    NorthEast,
    NorthWest,
    SouthEast,
    SouthWest,
    /// Content-aware placement
    Smart,
    /// Explicit relative point given by X/Y offsets
    FocusPoint,
}

impl GravityType {
    /// Short token used in request paths
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Center => "ce",
            Self::North => "no",
            Self::East => "ea",
            Self::South => "so",
            Self::West => "we",
            Self::NorthEast => "noea",
            Self::NorthWest => "nowe",
            Self::SouthEast => "soea",
            Self::SouthWest => "sowe",
            Self::Smart => "sm",
            Self::FocusPoint => "fp",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Center => "center",
            Self::North => "north",
            Self::East => "east",
            Self::South => "south",
            Self::West => "west",
            Self::NorthEast => "north-east",
            Self::NorthWest => "north-west",
            Self::SouthEast => "south-east",
            Self::SouthWest => "south-west",
            Self::Smart => "smart",
            Self::FocusPoint => "focus point",
        }
    }

    /// Offset validity for this gravity type. Center accepts any value.
    pub fn accepts_offset(&self, offset: f64) -> bool {
        match self {
            Self::Center => true,
            Self::FocusPoint => (0.0..=1.0).contains(&offset),
            _ => offset >= 0.0,
        }
    }
}

impl FromStr for GravityType {
    type Err = OptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ce" => Ok(GravityType::Center),
            "no" => Ok(GravityType::North),
            "ea" => Ok(GravityType::East),
            "so" => Ok(GravityType::South),
            "we" => Ok(GravityType::West),
            "noea" => Ok(GravityType::NorthEast),
            "nowe" => Ok(GravityType::NorthWest),
            "soea" => Ok(GravityType::SouthEast),
            "sowe" => Ok(GravityType::SouthWest),
            "sm" => Ok(GravityType::Smart),
            "fp" => Ok(GravityType::FocusPoint),
            _ => Err(OptionError::invalid_value("gravity", s)),
        }
    }
}

/// Image formats known to the service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageType {
    #[serde(alias = "jpg")]
    Jpeg,
    Png,
    Webp,
    Gif,
    Ico,
    Svg,
    Heic,
    Avif,
    Bmp,
    Tiff,
}

impl ImageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Jpeg => "jpeg",
            Self::Png => "png",
            Self::Webp => "webp",
            Self::Gif => "gif",
            Self::Ico => "ico",
            Self::Svg => "svg",
            Self::Heic => "heic",
            Self::Avif => "avif",
            Self::Bmp => "bmp",
            Self::Tiff => "tiff",
        }
    }

    pub fn mime(&self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Webp => "image/webp",
            Self::Gif => "image/gif",
            Self::Ico => "image/x-icon",
            Self::Svg => "image/svg+xml",
            Self::Heic => "image/heif",
            Self::Avif => "image/avif",
            Self::Bmp => "image/bmp",
            Self::Tiff => "image/tiff",
        }
    }
}

impl fmt::Display for ImageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ImageType {
    type Err = OptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "jpeg" | "jpg" => Ok(ImageType::Jpeg),
            "png" => Ok(ImageType::Png),
            "webp" => Ok(ImageType::Webp),
            "gif" => Ok(ImageType::Gif),
            "ico" => Ok(ImageType::Ico),
            "svg" => Ok(ImageType::Svg),
            "heic" => Ok(ImageType::Heic),
            "avif" => Ok(ImageType::Avif),
            "bmp" => Ok(ImageType::Bmp),
            "tiff" => Ok(ImageType::Tiff),
            _ => Err(OptionError::UnknownFormat(s.to_string())),
        }
    }
}

/// RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Color = Color {
        r: 255,
        g: 255,
        b: 255,
    };

    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `rgb` or `rrggbb` hex notation (no leading `#`)
    pub fn from_hex(hex: &str) -> Result<Self, ColorParseError> {
        let digits: Option<Vec<u8>> = hex
            .chars()
            .map(|c| c.to_digit(16).map(|d| d as u8))
            .collect();

        match digits.as_deref() {
            // Each short digit expands to a repeated pair, e.g. `f` -> `ff`
            Some(&[r, g, b]) => Ok(Self::new(r * 17, g * 17, b * 17)),
            Some(&[r1, r0, g1, g0, b1, b0]) => {
                Ok(Self::new((r1 << 4) | r0, (g1 << 4) | g0, (b1 << 4) | b0))
            }
            _ => Err(ColorParseError(hex.to_string())),
        }
    }
}

/// Hex color did not match `rgb` / `rrggbb`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorParseError(pub String);

impl fmt::Display for ColorParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid hex color: {}", self.0)
    }
}

impl std::error::Error for ColorParseError {}
