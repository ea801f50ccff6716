//! loggermax CLI - emit one leveled entry from the command line.
//!
//! ```text
//! loggermax info "cache warmed"
//! loggermax data "settings: " '{"ttl": 30}' --debug
//! loggermax error "upstream closed" --short-stack
//! ```

#![forbid(unsafe_code)]

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser};
use serde_json::Value;

use loggermax::{Level, LogOptions, Logger, LoggerConfig, Payload};

/// Emit a leveled, styled console entry to stderr.
#[derive(Parser, Debug)]
#[command(name = "loggermax")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Level: log, info, warn, error, data, shout, track, loaded.
    #[arg(value_parser = parse_level)]
    level: Level,

    /// Label, or a JSON object/array to log on its own.
    prepend: String,

    /// Optional message; JSON objects and arrays are structured.
    message: Option<String>,

    /// Turn the debug flag on (gated levels are silent without it).
    #[arg(long, short = 'd', action = ArgAction::SetTrue)]
    debug: bool,

    /// Show the full stack instead of the caller label.
    #[arg(long, conflicts_with = "short_stack")]
    full_stack: bool,

    /// Show only the caller label (useful for `error`).
    #[arg(long)]
    short_stack: bool,

    /// Pretty-print structured payloads inline.
    #[arg(long, conflicts_with = "no_expand")]
    expand: bool,

    /// Keep structured payloads compact (useful for `data`).
    #[arg(long)]
    no_expand: bool,

    /// Disable styling.
    #[arg(long)]
    plain: bool,

    /// TOML config file.
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,
}

fn parse_level(name: &str) -> Result<Level, String> {
    Level::from_name(name).ok_or_else(|| {
        format!(
            "unknown level '{name}' \
             (expected log, info, warn, error, data, shout, track, loaded)"
        )
    })
}

/// Objects and arrays become structured values; anything else stays text.
fn parse_structured(text: &str) -> Option<Value> {
    match serde_json::from_str::<Value>(text) {
        Ok(value @ (Value::Object(_) | Value::Array(_))) => Some(value),
        _ => None,
    }
}

fn build_payload(prepend: &str, message: Option<&str>) -> Payload {
    match message {
        None => match parse_structured(prepend) {
            Some(value) => Payload::Structured(value),
            None => Payload::Text(prepend.to_string()),
        },
        Some(message) => match parse_structured(message) {
            Some(value) => Payload::TextWithStructured(prepend.to_string(), value),
            None => Payload::TextWithText(prepend.to_string(), message.to_string()),
        },
    }
}

fn build_options(cli: &Cli) -> LogOptions {
    let mut options = LogOptions::new();
    if cli.full_stack {
        options = options.full_stack(true);
    } else if cli.short_stack {
        options = options.full_stack(false);
    }
    if cli.expand {
        options = options.expand(true);
    } else if cli.no_expand {
        options = options.expand(false);
    }
    options
}

fn load_config(cli: &Cli) -> Result<LoggerConfig, loggermax::ConfigError> {
    let mut config = match &cli.config {
        Some(path) => LoggerConfig::from_file(path)?,
        None => LoggerConfig::default(),
    };
    config.apply_env();
    if cli.debug {
        config.debug = true;
    }
    if cli.plain {
        config.force_plain = true;
    }
    Ok(config)
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("loggermax: {err}");
            return ExitCode::from(2);
        }
    };

    let logger = Logger::from_config(&config);
    let payload = build_payload(&cli.prepend, cli.message.as_deref());
    logger.emit(cli.level, payload, build_options(&cli));

    ExitCode::SUCCESS
}
