//! Directive handlers
//!
//! One function per directive. Each enforces its arity ceiling, validates
//! tokens with the scalar validators, and mutates the options in place.
//! Handlers are only reached through the dispatcher in `directive.rs`.

use chrono::Utc;

use super::error::OptionError;
use super::processing::{GravityOptions, ProcessingOptions};
use super::scalar::{
    parse_bool, parse_channel, parse_color, parse_dimension, parse_int, parse_non_negative_float,
    parse_positive_float, parse_quality, parse_rotation, parse_unit_float,
};
use super::types::{GravityType, ImageType, ResizeType};
use crate::constants::WATERMARK_REPLICATE_TOKEN;

type HandlerResult = Result<(), OptionError>;

/// The only argument of a single-argument directive
fn single_arg<'a>(option: &'static str, args: &'a [String]) -> Result<&'a str, OptionError> {
    match args {
        [arg] => Ok(arg.as_str()),
        _ => Err(OptionError::invalid_args(option, args)),
    }
}

/// Token at `index` if present and non-empty
fn non_empty(args: &[String], index: usize) -> Option<&str> {
    args.get(index)
        .map(String::as_str)
        .filter(|arg| !arg.is_empty())
}

fn parse_gravity_offset(
    field: &'static str,
    gravity_type: GravityType,
    token: &str,
) -> Result<f64, OptionError> {
    token
        .parse::<f64>()
        .ok()
        .filter(|offset| offset.is_finite() && gravity_type.accepts_offset(*offset))
        .ok_or_else(|| OptionError::invalid_value(field, token))
}

/// Shared gravity parser: `type[:x[:y]]`.
///
/// Smart gravity takes no offsets, focus point takes exactly two.
pub fn parse_gravity(gravity: &mut GravityOptions, args: &[String]) -> HandlerResult {
    let invalid = || OptionError::invalid_args("gravity", args);

    let (type_token, offsets) = match args {
        [type_token, offsets @ ..] if offsets.len() <= 2 => (type_token, offsets),
        _ => return Err(invalid()),
    };

    let gravity_type: GravityType = type_token.parse()?;
    let arity_ok = match gravity_type {
        GravityType::Smart => offsets.is_empty(),
        GravityType::FocusPoint => offsets.len() == 2,
        _ => true,
    };
    if !arity_ok {
        return Err(invalid());
    }

    let x = offsets
        .first()
        .map(|x| parse_gravity_offset("gravity X", gravity_type, x))
        .transpose()?;
    let y = offsets
        .get(1)
        .map(|y| parse_gravity_offset("gravity Y", gravity_type, y))
        .transpose()?;

    // Commit only once every token is valid
    gravity.gravity_type = gravity_type;
    if let Some(x) = x {
        gravity.x = x;
    }
    if let Some(y) = y {
        gravity.y = y;
    }

    Ok(())
}

// === Geometry ===

pub fn apply_width(po: &mut ProcessingOptions, args: &[String]) -> HandlerResult {
    po.width = parse_dimension("width", single_arg("width", args)?)?;
    Ok(())
}

pub fn apply_height(po: &mut ProcessingOptions, args: &[String]) -> HandlerResult {
    po.height = parse_dimension("height", single_arg("height", args)?)?;
    Ok(())
}

pub fn apply_min_width(po: &mut ProcessingOptions, args: &[String]) -> HandlerResult {
    po.min_width = parse_dimension("min width", single_arg("min width", args)?)?;
    Ok(())
}

pub fn apply_min_height(po: &mut ProcessingOptions, args: &[String]) -> HandlerResult {
    po.min_height = parse_dimension("min height", single_arg("min height", args)?)?;
    Ok(())
}

pub fn apply_enlarge(po: &mut ProcessingOptions, args: &[String]) -> HandlerResult {
    po.enlarge = parse_bool(single_arg("enlarge", args)?);
    Ok(())
}

pub fn apply_extend(po: &mut ProcessingOptions, args: &[String]) -> HandlerResult {
    if args.is_empty() || args.len() > 4 {
        return Err(OptionError::invalid_args("extend", args));
    }

    po.extend.enabled = parse_bool(&args[0]);

    if args.len() > 1 {
        parse_gravity(&mut po.extend.gravity, &args[1..])?;

        if po.extend.gravity.gravity_type == GravityType::Smart {
            return Err(OptionError::UnsupportedGravity {
                option: "extend",
                gravity: GravityType::Smart.name(),
            });
        }
    }

    Ok(())
}

/// `size:width:height:enlarge:extend[:gravity...]`, every slot optional
pub fn apply_size(po: &mut ProcessingOptions, args: &[String]) -> HandlerResult {
    if args.len() > 7 {
        return Err(OptionError::invalid_args("size", args));
    }

    if non_empty(args, 0).is_some() {
        apply_width(po, &args[0..1])?;
    }

    if non_empty(args, 1).is_some() {
        apply_height(po, &args[1..2])?;
    }

    if non_empty(args, 2).is_some() {
        apply_enlarge(po, &args[2..3])?;
    }

    if non_empty(args, 3).is_some() {
        apply_extend(po, &args[3..])?;
    }

    Ok(())
}

pub fn apply_resizing_type(po: &mut ProcessingOptions, args: &[String]) -> HandlerResult {
    po.resizing_type = single_arg("resizing type", args)?.parse::<ResizeType>()?;
    Ok(())
}

/// `resize:type:width:height:enlarge:extend[:gravity...]`
pub fn apply_resize(po: &mut ProcessingOptions, args: &[String]) -> HandlerResult {
    if args.is_empty() || args.len() > 8 {
        return Err(OptionError::invalid_args("resize", args));
    }

    if non_empty(args, 0).is_some() {
        apply_resizing_type(po, &args[0..1])?;
    }

    if args.len() > 1 {
        apply_size(po, &args[1..])?;
    }

    Ok(())
}

pub fn apply_dpr(po: &mut ProcessingOptions, args: &[String]) -> HandlerResult {
    po.dpr = parse_positive_float("dpr", single_arg("dpr", args)?)?;
    Ok(())
}

pub fn apply_gravity(po: &mut ProcessingOptions, args: &[String]) -> HandlerResult {
    parse_gravity(&mut po.gravity, args)
}

/// `crop:width[:height[:gravity...]]`
pub fn apply_crop(po: &mut ProcessingOptions, args: &[String]) -> HandlerResult {
    if args.is_empty() || args.len() > 5 {
        return Err(OptionError::invalid_args("crop", args));
    }

    po.crop.width = parse_non_negative_float("crop width", &args[0])?;

    if let Some(height) = args.get(1) {
        po.crop.height = parse_non_negative_float("crop height", height)?;
    }

    if args.len() > 2 {
        parse_gravity(&mut po.crop.gravity, &args[2..])?;
    }

    Ok(())
}

/// CSS-style shorthand: `top[:right[:bottom[:left]]]`.
///
/// Top fills every side, right fills left; empty tokens keep the cascaded value.
/// All-zero padding disables the feature.
pub fn apply_padding(po: &mut ProcessingOptions, args: &[String]) -> HandlerResult {
    if args.is_empty() || args.len() > 4 {
        return Err(OptionError::invalid_args("padding", args));
    }

    let padding = &mut po.padding;
    padding.enabled = true;

    if let Some(all) = non_empty(args, 0) {
        padding.top = parse_dimension("padding top (+all)", all)?;
        padding.right = padding.top;
        padding.bottom = padding.top;
        padding.left = padding.top;
    }

    if let Some(horizontal) = non_empty(args, 1) {
        padding.right = parse_dimension("padding right (+left)", horizontal)?;
        padding.left = padding.right;
    }

    if let Some(bottom) = non_empty(args, 2) {
        padding.bottom = parse_dimension("padding bottom", bottom)?;
    }

    if let Some(left) = non_empty(args, 3) {
        padding.left = parse_dimension("padding left", left)?;
    }

    if padding.is_empty() {
        padding.enabled = false;
    }

    Ok(())
}

/// `trim:threshold[:color[:equal_hor[:equal_ver]]]`
pub fn apply_trim(po: &mut ProcessingOptions, args: &[String]) -> HandlerResult {
    if args.is_empty() || args.len() > 4 {
        return Err(OptionError::invalid_args("trim", args));
    }

    let trim = &mut po.trim;
    trim.threshold = parse_non_negative_float("trim threshold", &args[0])?;
    trim.enabled = true;

    if let Some(color) = non_empty(args, 1) {
        trim.color = parse_color("trim color", color)?;
        trim.smart = false;
    }

    if let Some(equal_hor) = non_empty(args, 2) {
        trim.equal_hor = parse_bool(equal_hor);
    }

    if let Some(equal_ver) = non_empty(args, 3) {
        trim.equal_ver = parse_bool(equal_ver);
    }

    Ok(())
}

pub fn apply_rotate(po: &mut ProcessingOptions, args: &[String]) -> HandlerResult {
    po.rotate = parse_rotation(single_arg("rotate", args)?)?;
    Ok(())
}

pub fn apply_auto_rotate(po: &mut ProcessingOptions, args: &[String]) -> HandlerResult {
    po.auto_rotate = parse_bool(single_arg("auto rotate", args)?);
    Ok(())
}

// === Output ===

pub fn apply_quality(po: &mut ProcessingOptions, args: &[String]) -> HandlerResult {
    po.quality = parse_quality(single_arg("quality", args)?)?;
    Ok(())
}

pub fn apply_max_bytes(po: &mut ProcessingOptions, args: &[String]) -> HandlerResult {
    let token = single_arg("max_bytes", args)?;
    po.max_bytes = token
        .parse::<u64>()
        .map_err(|_| OptionError::invalid_value("max_bytes", token))?;
    Ok(())
}

/// Overloaded by arity: `bg:` disables flatten, `bg:rrggbb` and `bg:r:g:b` enable it
pub fn apply_background(po: &mut ProcessingOptions, args: &[String]) -> HandlerResult {
    match args {
        [hex] if hex.is_empty() => {
            po.flatten = false;
        }
        [hex] => {
            po.background = parse_color("background argument", hex)?;
            po.flatten = true;
        }
        [r, g, b] => {
            po.flatten = true;
            po.background.r = parse_channel("background red channel", r)?;
            po.background.g = parse_channel("background green channel", g)?;
            po.background.b = parse_channel("background blue channel", b)?;
        }
        _ => return Err(OptionError::invalid_args("background", args)),
    }

    Ok(())
}

pub fn apply_blur(po: &mut ProcessingOptions, args: &[String]) -> HandlerResult {
    po.blur = parse_non_negative_float("blur", single_arg("blur", args)?)?;
    Ok(())
}

pub fn apply_sharpen(po: &mut ProcessingOptions, args: &[String]) -> HandlerResult {
    po.sharpen = parse_non_negative_float("sharpen", single_arg("sharpen", args)?)?;
    Ok(())
}

/// `watermark:opacity[:position[:x[:y[:scale]]]]`
///
/// Position is either the replicate marker or a gravity type other than
/// smart and focus point. Offsets are plain integers.
pub fn apply_watermark(po: &mut ProcessingOptions, args: &[String]) -> HandlerResult {
    if args.is_empty() || args.len() > 7 {
        return Err(OptionError::invalid_args("watermark", args));
    }

    let watermark = &mut po.watermark;
    watermark.opacity = parse_unit_float("watermark opacity", &args[0])?;
    watermark.enabled = watermark.opacity > 0.0;

    if let Some(position) = non_empty(args, 1) {
        if position == WATERMARK_REPLICATE_TOKEN {
            watermark.replicate = true;
        } else {
            match position.parse::<GravityType>() {
                Ok(GravityType::Smart | GravityType::FocusPoint) | Err(_) => {
                    return Err(OptionError::invalid_value("watermark position", position));
                }
                Ok(gravity_type) => watermark.gravity.gravity_type = gravity_type,
            }
        }
    }

    if let Some(x) = non_empty(args, 2) {
        watermark.gravity.x = parse_int("watermark X offset", x)? as f64;
    }

    if let Some(y) = non_empty(args, 3) {
        watermark.gravity.y = parse_int("watermark Y offset", y)? as f64;
    }

    if let Some(scale) = non_empty(args, 4) {
        watermark.scale = parse_non_negative_float("watermark scale", scale)?;
    }

    Ok(())
}

pub fn apply_strip_metadata(po: &mut ProcessingOptions, args: &[String]) -> HandlerResult {
    po.strip_metadata = parse_bool(single_arg("strip metadata", args)?);
    Ok(())
}

pub fn apply_strip_color_profile(po: &mut ProcessingOptions, args: &[String]) -> HandlerResult {
    po.strip_color_profile = parse_bool(single_arg("strip color profile", args)?);
    Ok(())
}

pub fn apply_format(po: &mut ProcessingOptions, args: &[String]) -> HandlerResult {
    po.format = Some(single_arg("format", args)?.parse::<ImageType>()?);
    Ok(())
}

// === Handling ===

/// Appends to the list inherited from configuration; never replaces it
pub fn apply_skip_processing(po: &mut ProcessingOptions, args: &[String]) -> HandlerResult {
    for format in args {
        let image_type = format.parse::<ImageType>()?;
        po.skip_processing_formats.push(image_type);
    }

    Ok(())
}

pub fn apply_cache_buster(po: &mut ProcessingOptions, args: &[String]) -> HandlerResult {
    po.cache_buster = single_arg("cache buster", args)?.to_string();
    Ok(())
}

pub fn apply_filename(po: &mut ProcessingOptions, args: &[String]) -> HandlerResult {
    po.filename = single_arg("filename", args)?.to_string();
    Ok(())
}

pub fn apply_expires(_po: &mut ProcessingOptions, args: &[String]) -> HandlerResult {
    check_expires(args, Utc::now().timestamp())
}

/// Zero disables the check; a positive timestamp at or before `now` is expired
fn check_expires(args: &[String], now: i64) -> HandlerResult {
    let timestamp = parse_int("expires argument", single_arg("expires", args)?)?;

    if timestamp > 0 && timestamp <= now {
        return Err(OptionError::Expired);
    }

    Ok(())
}
