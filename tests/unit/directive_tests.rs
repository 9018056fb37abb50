// Directive dispatch tests: validators and handlers reached by name

use imgpath::options::{
    apply_option, Color, Directive, GravityType, OptionError, Presets, ProcessingOptions,
};
use rstest::rstest;

fn apply(name: &str, args: &[&str]) -> Result<ProcessingOptions, OptionError> {
    let mut po = ProcessingOptions::default();
    let args: Vec<String> = args.iter().map(|a| a.to_string()).collect();
    apply_option(&mut po, &Presets::new(), name, &args)?;
    Ok(po)
}

#[rstest]
#[case("w", 0)]
#[case("width", 1)]
#[case("h", 4096)]
#[case("mw", 320)]
#[case("min-height", 12)]
fn test_dimension_accepts_non_negative(#[case] name: &str, #[case] value: u32) {
    let po = apply(name, &[&value.to_string()]).unwrap();
    let actual = match Directive::from_name(name).unwrap() {
        Directive::Width => po.width,
        Directive::Height => po.height,
        Directive::MinWidth => po.min_width,
        Directive::MinHeight => po.min_height,
        other => panic!("unexpected directive {}", other),
    };
    assert_eq!(actual, value);
}

#[rstest]
#[case("w", "-1")]
#[case("h", "abc")]
#[case("mw", "1.5")]
#[case("mh", "")]
fn test_dimension_rejects_invalid(#[case] name: &str, #[case] token: &str) {
    assert!(matches!(
        apply(name, &[token]),
        Err(OptionError::InvalidValue { .. })
    ));
}

#[test]
fn test_single_argument_arity() {
    let err = apply("w", &["1", "2"]).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Invalid width arguments: [\"1\", \"2\"]"
    );
}

#[rstest]
#[case(&["sm", "1"])]
#[case(&["fp", "0.5"])]
#[case(&["fp"])]
#[case(&["fp", "1.5", "0.5"])]
#[case(&["no", "-1"])]
#[case(&["soea", "0", "-3"])]
#[case(&["middle"])]
fn test_gravity_rejects(#[case] args: &[&str]) {
    assert!(apply("g", args).is_err());
}

#[test]
fn test_gravity_accepts() {
    let po = apply("g", &["ce", "-10", "-20"]).unwrap();
    assert_eq!(po.gravity.gravity_type, GravityType::Center);
    assert_eq!(po.gravity.x, -10.0);

    let po = apply("g", &["fp", "0.25", "1"]).unwrap();
    assert_eq!(po.gravity.gravity_type, GravityType::FocusPoint);
    assert_eq!((po.gravity.x, po.gravity.y), (0.25, 1.0));

    let po = apply("g", &["we", "15"]).unwrap();
    assert_eq!(po.gravity.gravity_type, GravityType::West);
    assert_eq!(po.gravity.x, 15.0);
}

#[test]
fn test_extend_rejects_smart_gravity() {
    let err = apply("ex", &["1", "sm"]).unwrap_err();
    assert_eq!(err.to_string(), "extend doesn't support smart gravity");

    let po = apply("ex", &["true", "so", "5", "6"]).unwrap();
    assert!(po.extend.enabled);
    assert_eq!(po.extend.gravity.gravity_type, GravityType::South);
}

#[test]
fn test_crop() {
    let po = apply("c", &["100"]).unwrap();
    assert_eq!(po.crop.width, 100.0);
    assert_eq!(po.crop.height, 0.0);

    let po = apply("crop", &["100", "50", "nowe"]).unwrap();
    assert_eq!(po.crop.height, 50.0);
    assert_eq!(po.crop.gravity.gravity_type, GravityType::NorthWest);

    assert!(apply("c", &["-1"]).is_err());
    assert!(apply("c", &["1", "2", "fp", "0.5", "0.5", "x"]).is_err());
}

#[rstest]
#[case(&["10"], (10, 10, 10, 10), true)]
#[case(&["10", "20"], (10, 20, 10, 20), true)]
#[case(&["10", "20", "30"], (10, 20, 30, 20), true)]
#[case(&["1", "2", "3", "4"], (1, 2, 3, 4), true)]
#[case(&["", "5"], (0, 5, 0, 5), true)]
#[case(&["0", "0", "0", "0"], (0, 0, 0, 0), false)]
#[case(&["0"], (0, 0, 0, 0), false)]
fn test_padding_cascade(
    #[case] args: &[&str],
    #[case] sides: (u32, u32, u32, u32),
    #[case] enabled: bool,
) {
    let po = apply("pd", args).unwrap();
    let padding = po.padding;
    assert_eq!(
        (padding.top, padding.right, padding.bottom, padding.left),
        sides
    );
    assert_eq!(padding.enabled, enabled);
}

#[test]
fn test_background() {
    let po = apply("bg", &[""]).unwrap();
    assert!(!po.flatten);

    let hex = apply("bg", &["ff0000"]).unwrap();
    assert!(hex.flatten);
    assert_eq!(hex.background, Color::new(255, 0, 0));

    let rgb = apply("background", &["255", "0", "0"]).unwrap();
    assert!(rgb.flatten);
    assert_eq!(rgb.background, hex.background);

    assert!(matches!(
        apply("bg", &["1", "2"]),
        Err(OptionError::InvalidArguments { .. })
    ));
    assert!(apply("bg", &["256", "0", "0"]).is_err());
    assert!(apply("bg", &["zzzzzz"]).is_err());
}

#[test]
fn test_trim() {
    let po = apply("t", &["12.5"]).unwrap();
    assert!(po.trim.enabled);
    assert!(po.trim.smart);
    assert_eq!(po.trim.threshold, 12.5);

    let po = apply("trim", &["0", "fff", "1", "0"]).unwrap();
    assert!(!po.trim.smart);
    assert_eq!(po.trim.color, Color::WHITE);
    assert!(po.trim.equal_hor);
    assert!(!po.trim.equal_ver);

    assert!(apply("t", &["-1"]).is_err());
}

#[test]
fn test_watermark() {
    let po = apply("wm", &["0.5", "re", "10", "-10", "0.2"]).unwrap();
    assert!(po.watermark.enabled);
    assert!(po.watermark.replicate);
    assert_eq!(po.watermark.gravity.y, -10.0);
    assert_eq!(po.watermark.scale, 0.2);

    let po = apply("wm", &["0"]).unwrap();
    assert!(!po.watermark.enabled);

    assert!(apply("wm", &["1.5"]).is_err());
    assert!(apply("wm", &["1", "sm"]).is_err());
    assert!(apply("wm", &["1", "fp"]).is_err());
    assert!(apply("wm", &["1", "ce", "1.5"]).is_err());
}

#[rstest]
#[case("rot", "90", 90)]
#[case("rotate", "-270", -270)]
#[case("rot", "0", 0)]
fn test_rotate(#[case] name: &str, #[case] token: &str, #[case] expected: i32) {
    assert_eq!(apply(name, &[token]).unwrap().rotate, expected);
}

#[test]
fn test_rotate_rejects_non_right_angles() {
    assert!(apply("rot", &["45"]).is_err());
}

#[rstest]
#[case("dpr", "0")]
#[case("dpr", "-1")]
#[case("q", "101")]
#[case("bl", "-0.1")]
#[case("sh", "nan")]
#[case("mb", "-5")]
fn test_scalar_bounds(#[case] name: &str, #[case] token: &str) {
    assert!(apply(name, &[token]).is_err());
}

#[test]
fn test_format_and_bookkeeping() {
    let po = apply("ext", &["jpg"]).unwrap();
    assert_eq!(po.format.map(|f| f.as_str()), Some("jpeg"));

    assert_eq!(
        apply("f", &["tga"]).unwrap_err(),
        OptionError::UnknownFormat("tga".to_string())
    );

    assert_eq!(apply("cb", &["v2"]).unwrap().cache_buster, "v2");
    assert_eq!(apply("fn", &["cat"]).unwrap().filename, "cat");
}

#[test]
fn test_unknown_directive() {
    assert_eq!(
        apply("zoom", &["2"]).unwrap_err().to_string(),
        "Unknown processing option: zoom"
    );
}

#[test]
fn test_every_alias_dispatches_to_its_directive() {
    for directive in Directive::all() {
        for name in directive.names() {
            assert_eq!(Directive::from_name(name), Some(directive), "alias {}", name);
        }
    }
}
