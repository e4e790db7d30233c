use std::path::PathBuf;

use clap::{Args, Parser, builder::BoolishValueParser};
use serde_json::Value;

/// Command-line arguments for the `resolver-cache-key` binary.
#[derive(Debug, Parser)]
#[command(
    name = "resolver-cache-key",
    version,
    about = "Calculate resolver result cache keys from key factors"
)]
pub struct CliArgs {
    /// Optional path to a configuration file.
    #[arg(
        long = "config-file",
        env = "RESOLVER_CACHE_KEY_CONFIG_FILE",
        value_name = "PATH"
    )]
    pub config_file: Option<PathBuf>,

    /// Parent resolver data as a JSON document.
    #[arg(long = "parent-data", value_name = "JSON", value_parser = parse_json)]
    pub parent_data: Option<Value>,

    #[command(flatten)]
    pub overrides: KeyOverrides,
}

#[derive(Debug, Args, Default, Clone)]
pub struct KeyOverrides {
    /// Add a static factor.
    #[arg(long = "factor", value_name = "NAME=VALUE", value_parser = parse_key_value)]
    pub factors: Vec<(String, String)>,

    /// Set a request context attribute.
    #[arg(long = "context", value_name = "ATTRIBUTE=VALUE", value_parser = parse_key_value)]
    pub context: Vec<(String, String)>,

    /// Add a factor read from a context attribute.
    #[arg(
        long = "context-factor",
        value_name = "NAME=ATTRIBUTE",
        value_parser = parse_key_value
    )]
    pub context_factors: Vec<(String, String)>,

    /// Add a factor read from a field of the parent resolver data.
    #[arg(long = "parent-field", value_name = "NAME=FIELD", value_parser = parse_key_value)]
    pub parent_fields: Vec<(String, String)>,

    /// Override the per-provider timeout.
    #[arg(long = "provider-timeout-ms", value_name = "MS")]
    pub provider_timeout_ms: Option<u64>,

    /// Override the base log level (trace|debug|info|warn|error).
    #[arg(long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Toggle JSON logging.
    #[arg(
        long = "log-json",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new()
    )]
    pub log_json: Option<bool>,
}

fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got `{raw}`"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing key in `{raw}`"));
    }
    Ok((key.to_string(), value.to_string()))
}

fn parse_json(raw: &str) -> Result<Value, String> {
    serde_json::from_str(raw).map_err(|err| format!("invalid JSON: {err}"))
}
