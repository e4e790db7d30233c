//! Configuration layer: typed settings with layered precedence (file → env → CLI).

use std::{collections::BTreeMap, str::FromStr};

use clap::Parser;
use config::{Config, Environment, File};
use serde::Deserialize;
use thiserror::Error;
use tracing::level_filters::LevelFilter;

use crate::cache::CalculatorConfig;

mod cli;

pub use cli::{CliArgs, KeyOverrides};

const DEFAULT_CONFIG_BASENAME: &str = "config/default";
const LOCAL_CONFIG_BASENAME: &str = "resolver-cache-key";
const ENV_PREFIX: &str = "RESOLVER_CACHE_KEY";
const DEFAULT_PROVIDER_TIMEOUT_MS: u64 = 250;

/// Fully-resolved settings after precedence resolution and validation.
#[derive(Debug, Clone)]
pub struct Settings {
    pub logging: LoggingSettings,
    pub calculator: CalculatorConfig,
    pub factors: FactorSettings,
}

#[derive(Debug, Clone)]
pub struct LoggingSettings {
    pub level: LevelFilter,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy)]
pub enum LogFormat {
    Json,
    Compact,
}

/// Factors assembled by the command-line tool, keyed by factor name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FactorSettings {
    /// Factor name → fixed value.
    pub static_values: BTreeMap<String, String>,
    /// Context attribute → value.
    pub context: BTreeMap<String, String>,
    /// Factor name → context attribute it reads.
    pub context_attributes: BTreeMap<String, String>,
    /// Factor name → parent resolver data field it reads.
    pub parent_fields: BTreeMap<String, String>,
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to build configuration: {0}")]
    Build(#[from] config::ConfigError),
    #[error("invalid configuration for `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

impl LoadError {
    fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            reason: reason.into(),
        }
    }
}

/// Load settings using the configured precedence (file → environment → CLI).
pub fn load(cli: &CliArgs) -> Result<Settings, LoadError> {
    let mut builder = Config::builder()
        .add_source(File::with_name(DEFAULT_CONFIG_BASENAME).required(false))
        .add_source(File::with_name(LOCAL_CONFIG_BASENAME).required(false));

    if let Some(path) = cli.config_file.as_ref() {
        builder = builder.add_source(File::from(path.as_path()).required(true));
    }

    builder = builder.add_source(Environment::with_prefix(ENV_PREFIX).separator("__"));

    let mut raw: RawSettings = builder.build()?.try_deserialize()?;
    raw.apply_overrides(&cli.overrides);

    Settings::from_raw(raw)
}

/// Resolve configuration using the supplied CLI arguments, returning both for downstream use.
pub fn load_with_cli() -> Result<(CliArgs, Settings), LoadError> {
    let args = CliArgs::parse();
    let settings = load(&args)?;
    Ok((args, settings))
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSettings {
    logging: RawLoggingSettings,
    calculator: RawCalculatorSettings,
    factors: RawFactorSettings,
}

impl RawSettings {
    fn apply_overrides(&mut self, overrides: &KeyOverrides) {
        if let Some(level) = overrides.log_level.as_ref() {
            self.logging.level = Some(level.clone());
        }
        if let Some(json) = overrides.log_json {
            self.logging.json = Some(json);
        }
        if let Some(timeout) = overrides.provider_timeout_ms {
            self.calculator.provider_timeout_ms = Some(timeout);
        }

        self.factors
            .static_values
            .extend(overrides.factors.iter().cloned());
        self.factors.context.extend(overrides.context.iter().cloned());
        self.factors
            .context_attributes
            .extend(overrides.context_factors.iter().cloned());
        self.factors
            .parent_fields
            .extend(overrides.parent_fields.iter().cloned());
    }
}

impl Settings {
    fn from_raw(raw: RawSettings) -> Result<Self, LoadError> {
        let RawSettings {
            logging,
            calculator,
            factors,
        } = raw;

        let logging = build_logging_settings(logging)?;
        let calculator = build_calculator_config(calculator)?;
        let factors = build_factor_settings(factors)?;

        Ok(Self {
            logging,
            calculator,
            factors,
        })
    }
}

fn build_logging_settings(logging: RawLoggingSettings) -> Result<LoggingSettings, LoadError> {
    let level = match logging.level {
        Some(level) => LevelFilter::from_str(level.as_str()).map_err(|err| {
            LoadError::invalid("logging.level", format!("failed to parse: {err}"))
        })?,
        None => LevelFilter::WARN,
    };

    let format = if logging.json.unwrap_or(false) {
        LogFormat::Json
    } else {
        LogFormat::Compact
    };

    Ok(LoggingSettings { level, format })
}

fn build_calculator_config(
    calculator: RawCalculatorSettings,
) -> Result<CalculatorConfig, LoadError> {
    let provider_timeout_ms = calculator
        .provider_timeout_ms
        .unwrap_or(DEFAULT_PROVIDER_TIMEOUT_MS);
    if provider_timeout_ms == 0 {
        return Err(LoadError::invalid(
            "calculator.provider_timeout_ms",
            "must be greater than zero",
        ));
    }

    Ok(CalculatorConfig {
        provider_timeout_ms,
    })
}

fn build_factor_settings(factors: RawFactorSettings) -> Result<FactorSettings, LoadError> {
    let RawFactorSettings {
        static_values,
        context,
        context_attributes,
        parent_fields,
    } = factors;

    let mut declared: BTreeMap<&str, &'static str> = BTreeMap::new();
    for (key, names) in [
        ("factors.static", &static_values),
        ("factors.context_attributes", &context_attributes),
        ("factors.parent_fields", &parent_fields),
    ] {
        for (name, target) in names {
            if name.trim().is_empty() {
                return Err(LoadError::invalid(key, "factor names must not be empty"));
            }
            if key != "factors.static" && target.trim().is_empty() {
                return Err(LoadError::invalid(
                    key,
                    format!("factor `{name}` must name a non-empty source"),
                ));
            }
            if let Some(previous) = declared.insert(name.as_str(), key) {
                return Err(LoadError::invalid(
                    key,
                    format!("factor `{name}` is already declared in `{previous}`"),
                ));
            }
        }
    }

    Ok(FactorSettings {
        static_values,
        context,
        context_attributes,
        parent_fields,
    })
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawLoggingSettings {
    level: Option<String>,
    json: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawCalculatorSettings {
    provider_timeout_ms: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawFactorSettings {
    #[serde(rename = "static")]
    static_values: BTreeMap<String, String>,
    context: BTreeMap<String, String>,
    context_attributes: BTreeMap<String, String>,
    parent_fields: BTreeMap<String, String>,
}

#[cfg(test)]
mod tests;
