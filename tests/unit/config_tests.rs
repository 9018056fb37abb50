// Configuration loading and validation tests

use imgpath::config::{Config, LogFormat};
use imgpath::options::ImageType;
use imgpath::PathParser;

#[test]
fn test_minimal_yaml_uses_defaults() {
    let config = Config::from_yaml_with_env("{}").unwrap();

    assert_eq!(config.processing.quality, 80);
    assert_eq!(config.processing.arguments_separator, ":");
    assert!(config.processing.strip_metadata);
    assert!(config.security.keys.is_empty());
    assert_eq!(config.security.signature_size, 32);
    assert_eq!(config.logging.format, LogFormat::Json);
    assert!(config.validate().is_ok());
}

#[test]
fn test_full_yaml() {
    let yaml = r#"
processing:
  quality: 75
  format_quality:
    webp: 70
    avif: 50
  skip_processing_formats: [svg, gif]
  enable_webp_detection: true
  enable_client_hints: true
  presets:
    - "thumb=rs:fill:100:100/q:70"
    - "default=strip_metadata:0"
security:
  keys: ["736563726574"]
  salts: ["68656c6c6f"]
  signature_size: 16
logging:
  level: debug
  format: pretty
"#;
    let config = Config::from_yaml_with_env(yaml).unwrap();
    config.validate().unwrap();

    assert_eq!(config.processing.format_quality.get(&ImageType::Webp), Some(&70));
    assert_eq!(
        config.processing.skip_processing_formats,
        vec![ImageType::Svg, ImageType::Gif]
    );
    assert_eq!(config.security.signature_size, 16);
    assert_eq!(config.logging.format, LogFormat::Pretty);

    let parser = PathParser::new(&config).unwrap();
    assert_eq!(parser.presets().len(), 2);
    assert!(parser.baseline().strip_metadata);

    let parsed = parser
        .parse_path("/plain/a.jpg", &http::HeaderMap::new())
        .unwrap();
    assert!(!parsed.options.strip_metadata);
    assert_eq!(parsed.options.used_presets, vec!["default".to_string()]);
}

#[test]
fn test_missing_env_var_is_reported() {
    let yaml = "processing:\n  base_url: ${IMGPATH_UNSET_VARIABLE_FOR_TEST}\n";
    let err = Config::from_yaml_with_env(yaml).unwrap_err();
    assert!(err.contains("IMGPATH_UNSET_VARIABLE_FOR_TEST"));
}

#[test]
fn test_validation_errors() {
    let cases = [
        "processing:\n  quality: 0\n",
        "processing:\n  quality: 101\n",
        "processing:\n  format_quality: {png: 0}\n",
        "processing:\n  arguments_separator: \"\"\n",
        "processing:\n  only_presets: true\n",
        "processing:\n  presets: [\"broken=w:-1\"]\n",
        "processing:\n  presets: [\"noequals\"]\n",
        "security:\n  keys: [\"aa\"]\n",
        "security:\n  keys: [\"xyz\"]\n  salts: [\"aa\"]\n",
        "security:\n  signature_size: 0\n",
        "security:\n  signature_size: 33\n",
    ];

    for yaml in cases {
        let config = Config::from_yaml_with_env(yaml).unwrap();
        assert!(config.validate().is_err(), "expected failure for {:?}", yaml);
    }
}

#[test]
fn test_from_file_with_presets_path() {
    let dir = tempfile::tempdir().unwrap();
    let presets_path = dir.path().join("presets.txt");
    std::fs::write(&presets_path, "small=w:32\n").unwrap();

    let config_path = dir.path().join("config.yaml");
    std::fs::write(
        &config_path,
        format!(
            "processing:\n  only_presets: true\n  presets_path: {}\n",
            presets_path.display()
        ),
    )
    .unwrap();

    let config = Config::from_file(&config_path).unwrap();
    config.validate().unwrap();

    let parser = PathParser::new(&config).unwrap();
    let parsed = parser
        .parse_path("/small/plain/a.jpg", &http::HeaderMap::new())
        .unwrap();
    assert_eq!(parsed.options.width, 32);
}

#[test]
fn test_from_file_missing() {
    let err = Config::from_file("/nonexistent/imgpath.yaml").unwrap_err();
    assert!(err.starts_with("Failed to read config file"));
}
