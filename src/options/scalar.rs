//! Scalar validators
//!
//! Each function turns one raw path token into a typed, range-checked value.
//! Errors name the field and carry the offending token.

use super::error::OptionError;
use super::types::Color;

/// Parse a boolean flag.
///
/// Accepts `1 t T TRUE true True 0 f F FALSE false False`. Anything else is
/// logged and treated as `false` rather than failing the request.
pub fn parse_bool(token: &str) -> bool {
    match token {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => true,
        "0" | "f" | "F" | "FALSE" | "false" | "False" => false,
        _ => {
            tracing::warn!(
                value = %token,
                "`{}` is not a valid boolean value. Treated as false",
                token
            );
            false
        }
    }
}

/// Non-negative integer pixel dimension
pub fn parse_dimension(field: &'static str, token: &str) -> Result<u32, OptionError> {
    token
        .parse::<u32>()
        .map_err(|_| OptionError::invalid_value(field, token))
}

fn parse_finite(field: &'static str, token: &str) -> Result<f64, OptionError> {
    token
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| OptionError::invalid_value(field, token))
}

/// Float that must be strictly greater than zero (device pixel ratio)
pub fn parse_positive_float(field: &'static str, token: &str) -> Result<f64, OptionError> {
    match parse_finite(field, token)? {
        v if v > 0.0 => Ok(v),
        _ => Err(OptionError::invalid_value(field, token)),
    }
}

/// Float that must be zero or greater
pub fn parse_non_negative_float(field: &'static str, token: &str) -> Result<f64, OptionError> {
    match parse_finite(field, token)? {
        v if v >= 0.0 => Ok(v),
        _ => Err(OptionError::invalid_value(field, token)),
    }
}

/// Float in `[0, 1]` (opacity)
pub fn parse_unit_float(field: &'static str, token: &str) -> Result<f64, OptionError> {
    match parse_finite(field, token)? {
        v if (0.0..=1.0).contains(&v) => Ok(v),
        _ => Err(OptionError::invalid_value(field, token)),
    }
}

/// Signed integer, no range restriction
pub fn parse_int(field: &'static str, token: &str) -> Result<i64, OptionError> {
    token
        .parse::<i64>()
        .map_err(|_| OptionError::invalid_value(field, token))
}

/// Rotation angle, any integer multiple of 90
pub fn parse_rotation(token: &str) -> Result<i32, OptionError> {
    match token.parse::<i32>() {
        Ok(angle) if angle % 90 == 0 => Ok(angle),
        _ => Err(OptionError::invalid_value("rotation angle", token)),
    }
}

/// Quality in `0..=100`, where 0 means "use the configured default"
pub fn parse_quality(token: &str) -> Result<u8, OptionError> {
    match token.parse::<u8>() {
        Ok(q) if q <= 100 => Ok(q),
        _ => Err(OptionError::invalid_value("quality", token)),
    }
}

/// Single 0..=255 color channel
pub fn parse_channel(field: &'static str, token: &str) -> Result<u8, OptionError> {
    token
        .parse::<u8>()
        .map_err(|_| OptionError::invalid_value(field, token))
}

/// Hex color (`rgb` or `rrggbb`)
pub fn parse_color(field: &'static str, token: &str) -> Result<Color, OptionError> {
    Color::from_hex(token).map_err(|_| OptionError::invalid_value(field, token))
}
