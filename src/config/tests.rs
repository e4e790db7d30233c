use std::io::Write;

use serial_test::serial;

use super::*;

#[test]
fn cli_overrides_take_highest_precedence() {
    let mut raw = RawSettings::default();
    raw.calculator.provider_timeout_ms = Some(1_000);
    raw.logging.level = Some("info".to_string());

    let overrides = KeyOverrides {
        provider_timeout_ms: Some(40),
        log_level: Some("debug".to_string()),
        ..Default::default()
    };

    raw.apply_overrides(&overrides);
    let settings = Settings::from_raw(raw).expect("valid settings");

    assert_eq!(settings.calculator.provider_timeout_ms, 40);
    assert_eq!(settings.logging.level, LevelFilter::DEBUG);
}

#[test]
fn defaults_are_applied() {
    let settings = Settings::from_raw(RawSettings::default()).expect("valid settings");

    assert_eq!(settings.calculator, CalculatorConfig::default());
    assert_eq!(settings.logging.level, LevelFilter::WARN);
    assert!(matches!(settings.logging.format, LogFormat::Compact));
    assert_eq!(settings.factors, FactorSettings::default());
}

#[test]
fn cli_json_logging_enforces_format() {
    let mut raw = RawSettings::default();
    let overrides = KeyOverrides {
        log_json: Some(true),
        ..Default::default()
    };

    raw.apply_overrides(&overrides);
    let settings = Settings::from_raw(raw).expect("valid settings");

    assert!(matches!(settings.logging.format, LogFormat::Json));
}

#[test]
fn zero_provider_timeout_is_rejected() {
    let mut raw = RawSettings::default();
    raw.calculator.provider_timeout_ms = Some(0);

    let err = Settings::from_raw(raw).unwrap_err();
    assert!(matches!(
        err,
        LoadError::Invalid {
            key: "calculator.provider_timeout_ms",
            ..
        }
    ));
}

#[test]
fn invalid_log_level_is_rejected() {
    let mut raw = RawSettings::default();
    raw.logging.level = Some("loud".to_string());

    let err = Settings::from_raw(raw).unwrap_err();
    assert!(matches!(
        err,
        LoadError::Invalid {
            key: "logging.level",
            ..
        }
    ));
}

#[test]
fn cli_factors_extend_configured_ones() {
    let mut raw = RawSettings::default();
    raw.factors
        .static_values
        .insert("store".to_string(), "default".to_string());

    let args = CliArgs::parse_from([
        "resolver-cache-key",
        "--factor",
        "store=fr",
        "--factor",
        "scope=website_1",
        "--context",
        "currency_code=EUR",
        "--context-factor",
        "currency=currency_code",
        "--parent-field",
        "parent_id=model_id",
    ]);
    raw.apply_overrides(&args.overrides);
    let settings = Settings::from_raw(raw).expect("valid settings");

    assert_eq!(settings.factors.static_values["store"], "fr");
    assert_eq!(settings.factors.static_values["scope"], "website_1");
    assert_eq!(settings.factors.context["currency_code"], "EUR");
    assert_eq!(
        settings.factors.context_attributes["currency"],
        "currency_code"
    );
    assert_eq!(settings.factors.parent_fields["parent_id"], "model_id");
}

#[test]
fn factor_names_must_be_unique_across_kinds() {
    let mut raw = RawSettings::default();
    raw.factors
        .static_values
        .insert("store".to_string(), "default".to_string());
    raw.factors
        .context_attributes
        .insert("store".to_string(), "store_code".to_string());

    let err = Settings::from_raw(raw).unwrap_err();
    assert_eq!(
        err.to_string(),
        "invalid configuration for `factors.context_attributes`: factor `store` is already declared in `factors.static`"
    );
}

#[test]
fn parent_fields_require_a_field_name() {
    let mut raw = RawSettings::default();
    raw.factors
        .parent_fields
        .insert("parent_id".to_string(), " ".to_string());

    assert!(Settings::from_raw(raw).is_err());
}

#[test]
fn parse_parent_data_and_key_values() {
    let args = CliArgs::parse_from([
        "resolver-cache-key",
        "--parent-data",
        r#"{"object_id": 123}"#,
        "--factor",
        "label=a=b",
    ]);

    assert_eq!(args.parent_data, Some(serde_json::json!({"object_id": 123})));
    assert_eq!(
        args.overrides.factors,
        [("label".to_string(), "a=b".to_string())]
    );
}

#[test]
fn malformed_key_values_are_rejected() {
    assert!(CliArgs::try_parse_from(["resolver-cache-key", "--factor", "novalue"]).is_err());
    assert!(CliArgs::try_parse_from(["resolver-cache-key", "--factor", "=value"]).is_err());
    assert!(CliArgs::try_parse_from(["resolver-cache-key", "--parent-data", "{"]).is_err());
}

#[test]
#[serial]
fn loads_file_then_environment() {
    let mut file = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .expect("temp config file");
    writeln!(
        file,
        r#"
[logging]
level = "info"

[calculator]
provider_timeout_ms = 500

[factors.static]
store = "default"

[factors.parent_fields]
parent_id = "model_id"
"#
    )
    .expect("write config");

    // SAFETY: tests touching the process environment run serially.
    unsafe {
        std::env::set_var("RESOLVER_CACHE_KEY__CALCULATOR__PROVIDER_TIMEOUT_MS", "75");
    }
    let args = CliArgs::parse_from([
        "resolver-cache-key",
        "--config-file",
        file.path().to_str().expect("utf-8 path"),
    ]);
    let result = load(&args);
    unsafe {
        std::env::remove_var("RESOLVER_CACHE_KEY__CALCULATOR__PROVIDER_TIMEOUT_MS");
    }

    let settings = result.expect("settings load");
    assert_eq!(settings.logging.level, LevelFilter::INFO);
    assert_eq!(settings.calculator.provider_timeout_ms, 75);
    assert_eq!(settings.factors.static_values["store"], "default");
    assert_eq!(settings.factors.parent_fields["parent_id"], "model_id");
}

#[test]
#[serial]
fn missing_explicit_config_file_is_an_error() {
    let args = CliArgs::parse_from([
        "resolver-cache-key",
        "--config-file",
        "/nonexistent/resolver-cache-key.toml",
    ]);
    assert!(matches!(load(&args), Err(LoadError::Build(_))));
}
