//! Processing options
//!
//! Turns the directive part of a request path into a validated
//! `ProcessingOptions` value:
//!
//! ```text
//! /rs:fill:300:200:1/g:sm/q:80/plain/https://example.com/img.jpg
//!  ^^^^^^^^^^^^^^^^^ ^^^^ ^^^^ source URL (see `crate::source`)
//!  directives, applied left to right
//! ```
//!
//! Scalar validators live in `scalar`, one handler per directive in
//! `handlers`, name lookup and dispatch in `directive`, and preset
//! expansion in `presets`.

pub mod defaults;
pub mod directive;
pub mod error;
pub mod handlers;
pub mod presets;
pub mod processing;
pub mod scalar;
pub mod types;

pub use defaults::{apply_request_hints, default_options};
pub use directive::{apply_option, apply_options, parse_url_options, Directive, UrlOption};
pub use error::OptionError;
pub use presets::{apply_presets, PresetError, Presets};
pub use processing::{
    CropOptions, ExtendOptions, GravityOptions, PaddingOptions, ProcessingOptions, TrimOptions,
    WatermarkOptions,
};
pub use types::{Color, GravityType, ImageType, ResizeType};
