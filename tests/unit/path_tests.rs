// Path parser tests: both request modes, source decoding, header overlays

use http::{HeaderMap, HeaderValue};
use imgpath::config::{Config, ProcessingConfig};
use imgpath::options::{GravityType, ImageType, ProcessingOptions, ResizeType};
use imgpath::PathParser;

fn parser_with(processing: ProcessingConfig) -> PathParser {
    let config = Config {
        processing,
        ..Default::default()
    };
    PathParser::new(&config).expect("Failed to build parser")
}

fn parser() -> PathParser {
    parser_with(ProcessingConfig::default())
}

fn no_headers() -> HeaderMap {
    HeaderMap::new()
}

#[test]
fn test_resize_gravity_quality_plain_url() {
    let parsed = parser()
        .parse_path(
            "/resize:fill:300:200:1/gravity:sm/q:80/plain/https://example.com/img.jpg",
            &no_headers(),
        )
        .unwrap();

    assert_eq!(parsed.options.resizing_type, ResizeType::Fill);
    assert_eq!(parsed.options.width, 300);
    assert_eq!(parsed.options.height, 200);
    assert!(parsed.options.enlarge);
    assert_eq!(parsed.options.gravity.gravity_type, GravityType::Smart);
    assert_eq!(parsed.options.quality, 80);
    assert_eq!(parsed.source_url, "https://example.com/img.jpg");
}

#[test]
fn test_aliases_and_canonical_names_agree() {
    let parser = parser();
    let short = parser
        .parse_path("/rs:fit:10:20/g:no/bl:1.5/sh:0.3/plain/a.jpg", &no_headers())
        .unwrap();
    let long = parser
        .parse_path(
            "/resize:fit:10:20/gravity:no/blur:1.5/sharpen:0.3/plain/a.jpg",
            &no_headers(),
        )
        .unwrap();

    assert_eq!(short, long);
}

#[test]
fn test_later_directives_override_earlier() {
    let parsed = parser()
        .parse_path("/w:100/q:50/w:200/plain/a.jpg", &no_headers())
        .unwrap();
    assert_eq!(parsed.options.width, 200);
    assert_eq!(parsed.options.quality, 50);
}

#[test]
fn test_no_directives_yields_baseline() {
    let parser = parser();
    let parsed = parser.parse_path("/plain/a.jpg", &no_headers()).unwrap();
    assert_eq!(&parsed.options, parser.baseline());
    assert_eq!(parsed.options, ProcessingOptions::default());
}

#[test]
fn test_no_directives_yields_baseline_plus_header_overlays() {
    let parser = parser_with(ProcessingConfig {
        enable_webp_detection: true,
        enable_client_hints: true,
        ..Default::default()
    });

    let mut headers = HeaderMap::new();
    headers.insert("accept", HeaderValue::from_static("image/webp,*/*"));
    headers.insert("width", HeaderValue::from_static("640"));
    headers.insert("dpr", HeaderValue::from_static("2"));

    let parsed = parser.parse_path("/plain/a.jpg", &headers).unwrap();

    let mut expected = parser.baseline().clone();
    expected.prefer_webp = true;
    expected.width = 640;
    expected.dpr = 2.0;
    assert_eq!(parsed.options, expected);
}

#[test]
fn test_base64_source_with_extension() {
    // "https://example.com/img.jpg"
    let parsed = parser()
        .parse_path(
            "/w:100/aHR0cHM6Ly9leGFtcGxl/LmNvbS9pbWcuanBn.png",
            &no_headers(),
        )
        .unwrap();

    assert_eq!(parsed.source_url, "https://example.com/img.jpg");
    assert_eq!(parsed.options.format, Some(ImageType::Png));
}

#[test]
fn test_base_url_is_prepended() {
    let parser = parser_with(ProcessingConfig {
        base_url: "s3://images/".to_string(),
        ..Default::default()
    });
    let parsed = parser.parse_path("/plain/cats/tabby.jpg", &no_headers()).unwrap();
    assert_eq!(parsed.source_url, "s3://images/cats/tabby.jpg");
}

#[test]
fn test_failures_are_uniform_not_found() {
    let parser = parser();

    for path in [
        "/w:-1/plain/a.jpg",
        "/bg:1:2/plain/a.jpg",
        "/g:sm:0.5/plain/a.jpg",
        "/pr:missing/plain/a.jpg",
        "/unknown:1/plain/a.jpg",
        "/w:100/plain/",
        "/plain/a.jpg@png@webp",
        "/w:100/plain",
    ] {
        let err = parser.parse_path(path, &no_headers()).unwrap_err();
        assert_eq!(err.to_http_status(), 404, "path {}", path);
        assert_eq!(err.public_message(), "Invalid URL", "path {}", path);
    }
}

#[test]
fn test_expired_url_is_distinct() {
    let parser = parser();

    let err = parser
        .parse_path("/exp:1000/plain/a.jpg", &no_headers())
        .unwrap_err();
    assert!(err.is_expired());
    assert_eq!(err.to_http_status(), 404);

    let err = parser
        .parse_path("/w:abc/plain/a.jpg", &no_headers())
        .unwrap_err();
    assert!(!err.is_expired());

    assert!(parser.parse_path("/exp:0/plain/a.jpg", &no_headers()).is_ok());
    assert!(parser
        .parse_path("/exp:99999999999/plain/a.jpg", &no_headers())
        .is_ok());
}

#[test]
fn test_huge_blur_stays_finite() {
    let parsed = parser()
        .parse_path("/bl:1e300/sh:1e300/plain/a.jpg", &no_headers())
        .unwrap();
    assert!(parsed.options.blur.is_finite());
    assert!(parsed.options.sharpen.is_finite());
}

#[test]
fn test_garbage_boolean_does_not_abort() {
    let parsed = parser()
        .parse_path("/el:maybe/sm:nope/plain/a.jpg", &no_headers())
        .unwrap();
    assert!(!parsed.options.enlarge);
    assert!(!parsed.options.strip_metadata);
}

#[test]
fn test_skip_processing_appends_to_configured_list() {
    let parser = parser_with(ProcessingConfig {
        skip_processing_formats: vec![ImageType::Svg],
        ..Default::default()
    });
    let parsed = parser
        .parse_path("/skp:gif:webp/plain/a.gif", &no_headers())
        .unwrap();
    assert_eq!(
        parsed.options.skip_processing_formats,
        vec![ImageType::Svg, ImageType::Gif, ImageType::Webp]
    );
}

#[test]
fn test_default_preset_applies_before_directives() {
    let parser = parser_with(ProcessingConfig {
        presets: vec!["default=q:60/w:50".to_string()],
        ..Default::default()
    });

    let parsed = parser.parse_path("/w:70/plain/a.jpg", &no_headers()).unwrap();
    assert_eq!(parsed.options.quality, 60);
    assert_eq!(parsed.options.width, 70);
    assert_eq!(parsed.options.used_presets, vec!["default".to_string()]);
}

#[test]
fn test_presets_only_mode() {
    let parser = parser_with(ProcessingConfig {
        only_presets: true,
        presets: vec![
            "small=rs:fit:100:100".to_string(),
            "sharp=sh:0.5/pr:small".to_string(),
        ],
        ..Default::default()
    });

    let parsed = parser
        .parse_path("/sharp/plain/https://example.com/a.png@webp", &no_headers())
        .unwrap();
    assert_eq!(parsed.options.width, 100);
    assert_eq!(parsed.options.sharpen, 0.5);
    assert_eq!(parsed.options.format, Some(ImageType::Webp));
    assert_eq!(parsed.source_url, "https://example.com/a.png");

    let err = parser
        .parse_path("/nope/plain/a.png", &no_headers())
        .unwrap_err();
    assert_eq!(err.message(), "Unknown preset: nope");
}

#[test]
fn test_effective_quality_uses_format_override() {
    let processing = ProcessingConfig {
        quality: 85,
        format_quality: [(ImageType::Webp, 70)].into_iter().collect(),
        ..Default::default()
    };
    let parser = parser_with(processing.clone());

    let parsed = parser.parse_path("/plain/a.jpg@webp", &no_headers()).unwrap();
    assert_eq!(parsed.options.effective_quality(&processing), 70);

    let parsed = parser.parse_path("/plain/a.jpg@png", &no_headers()).unwrap();
    assert_eq!(parsed.options.effective_quality(&processing), 85);

    let parsed = parser
        .parse_path("/q:40/plain/a.jpg@webp", &no_headers())
        .unwrap();
    assert_eq!(parsed.options.effective_quality(&processing), 40);
}

#[test]
fn test_parsed_path_serializes_to_json() {
    let parsed = parser()
        .parse_path("/rt:fill-down/g:fp:0.3:0.7/f:avif/plain/a.jpg", &no_headers())
        .unwrap();
    let json = serde_json::to_value(&parsed).unwrap();

    assert_eq!(json["source_url"], "a.jpg");
    assert_eq!(json["options"]["format"], "avif");
    assert_eq!(json["options"]["gravity"]["x"], 0.3);
}
