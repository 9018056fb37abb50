// Constants module - centralized default values for configuration
//
// This module defines all default values used throughout the codebase.
// Using constants instead of magic numbers keeps the defaults in one place.

// =============================================================================
// Output defaults
// =============================================================================

/// Default output quality when neither the request nor a per-format override sets one
pub const DEFAULT_QUALITY: u8 = 80;

/// Default trim threshold
pub const DEFAULT_TRIM_THRESHOLD: f64 = 10.0;

/// Default device pixel ratio
pub const DEFAULT_DPR: f64 = 1.0;

/// Default watermark opacity
pub const DEFAULT_WATERMARK_OPACITY: f64 = 1.0;

// =============================================================================
// Request parsing
// =============================================================================

/// Upper bound (inclusive) for a `DPR` client hint
pub const MAX_CLIENT_HINT_DPR: f64 = 8.0;

/// Default separator between a directive name and its arguments
pub const DEFAULT_ARGUMENTS_SEPARATOR: &str = ":";

/// Marker segment that introduces a plain (non-encoded) source URL
pub const PLAIN_URL_TOKEN: &str = "plain";

/// Watermark position token meaning "tile the watermark"
pub const WATERMARK_REPLICATE_TOKEN: &str = "re";

/// Name of the preset applied to every request when it exists
pub const DEFAULT_PRESET_NAME: &str = "default";

// =============================================================================
// Security defaults
// =============================================================================

/// Default (and maximum) signature size in bytes, the full HMAC-SHA256 output
pub const DEFAULT_SIGNATURE_SIZE: usize = 32;

// =============================================================================
// Error responses
// =============================================================================

/// Public message returned for any path that fails to parse
pub const INVALID_URL_PUBLIC_MESSAGE: &str = "Invalid URL";

/// Public message returned for signature failures
pub const FORBIDDEN_PUBLIC_MESSAGE: &str = "Forbidden";
