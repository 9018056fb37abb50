use anyhow::{anyhow, Context, Result};
use clap::Parser;
use http::{HeaderMap, HeaderName, HeaderValue};
use std::path::PathBuf;

use imgpath::config::Config;
use imgpath::PathParser;

/// imgpath - parse an image request path and print the resulting processing options
#[derive(Parser, Debug)]
#[command(name = "imgpath")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file; built-in defaults are used when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Request header as "Name: value" (repeatable)
    #[arg(short = 'H', long = "header")]
    headers: Vec<String>,

    /// Treat the first path segment as a signature
    #[arg(long)]
    signed: bool,

    /// Validate configuration and exit
    #[arg(long)]
    test: bool,

    /// Request path, e.g. /rs:fill:300:200/plain/https://example.com/img.jpg
    path: Option<String>,
}

fn parse_headers(raw: &[String]) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();

    for header in raw {
        let (name, value) = header
            .split_once(':')
            .ok_or_else(|| anyhow!("Header must look like \"Name: value\": {}", header))?;

        let name = HeaderName::from_bytes(name.trim().as_bytes())
            .with_context(|| format!("Invalid header name in {:?}", header))?;
        let value = HeaderValue::from_str(value.trim())
            .with_context(|| format!("Invalid header value in {:?}", header))?;

        headers.append(name, value);
    }

    Ok(headers)
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => Config::from_file(path).map_err(|e| anyhow!(e))?,
        None => Config::default(),
    };

    imgpath::logging::init_subscriber(&config.logging)
        .map_err(|e| anyhow!("Failed to initialize logging subsystem: {}", e))?;

    config
        .validate()
        .map_err(|e| anyhow!("Invalid configuration: {}", e))?;

    let parser = PathParser::new(&config).map_err(|e| anyhow!(e))?;

    tracing::info!(
        config_file = ?args.config,
        presets = parser.presets().len(),
        only_presets = config.processing.only_presets,
        "Configuration loaded successfully"
    );

    if args.test {
        println!("Configuration OK");
        return Ok(());
    }

    let path = args
        .path
        .as_deref()
        .ok_or_else(|| anyhow!("A request path is required"))?;
    let headers = parse_headers(&args.headers)?;

    let result = if args.signed {
        parser.parse_signed_path(path, &headers)
    } else {
        parser.parse_path(path, &headers)
    };

    let parsed = result.map_err(|e| {
        tracing::warn!(path = %path, error = %e, "Rejected request path");
        anyhow!("{} {}: {}", e.to_http_status(), e.public_message(), e)
    })?;

    let output = serde_json::json!({
        "source_url": parsed.source_url,
        "effective_quality": parsed.options.effective_quality(parser.processing_config()),
        "options": parsed.options,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}
