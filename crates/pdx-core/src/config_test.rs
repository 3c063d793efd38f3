use std::collections::HashMap;
use std::env::VarError;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

#[test]
fn parse_environment_known_values() {
    assert_eq!(
        parse_environment("development").unwrap(),
        Environment::Development
    );
    assert_eq!(parse_environment("test").unwrap(), Environment::Test);
    assert_eq!(
        parse_environment("production").unwrap(),
        Environment::Production
    );
}

#[test]
fn parse_environment_unknown_fails() {
    let err = parse_environment("staging").unwrap_err();
    assert!(matches!(err, ConfigError::InvalidEnvVar { ref var, .. } if var == "PDX_ENV"));
}

#[test]
fn build_app_config_defaults_with_empty_env() {
    let map = HashMap::new();
    let cfg = build_app_config(lookup_from_map(&map)).expect("defaults are valid");
    assert_eq!(cfg.env, Environment::Development);
    assert_eq!(cfg.bind_addr.to_string(), "0.0.0.0:3000");
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.fetch_timeout_secs, 30);
    assert_eq!(cfg.fetch_user_agent, DEFAULT_FETCH_USER_AGENT);
    assert_eq!(cfg.model, "gpt-4o-2024-08-06");
    assert_eq!(cfg.model_base_url, "https://api.openai.com/v1");
    assert_eq!(cfg.model_timeout_secs, 120);
}

#[test]
fn build_app_config_applies_overrides() {
    let mut map = HashMap::new();
    map.insert("PDX_ENV", "production");
    map.insert("PDX_BIND_ADDR", "127.0.0.1:8080");
    map.insert("PDX_MODEL", "gpt-4o-mini");
    map.insert("PDX_MODEL_BASE_URL", "http://localhost:9000/v1");
    map.insert("PDX_FETCH_TIMEOUT_SECS", "5");
    map.insert("PDX_FETCH_USER_AGENT", "custom-agent/2.0");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.env, Environment::Production);
    assert_eq!(cfg.bind_addr.to_string(), "127.0.0.1:8080");
    assert_eq!(cfg.model, "gpt-4o-mini");
    assert_eq!(cfg.model_base_url, "http://localhost:9000/v1");
    assert_eq!(cfg.fetch_timeout_secs, 5);
    assert_eq!(cfg.fetch_user_agent, "custom-agent/2.0");
}

#[test]
fn build_app_config_fails_with_invalid_bind_addr() {
    let mut map = HashMap::new();
    map.insert("PDX_BIND_ADDR", "not-a-socket-addr");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "PDX_BIND_ADDR"),
        "expected InvalidEnvVar(PDX_BIND_ADDR), got: {result:?}"
    );
}

#[test]
fn build_app_config_fails_with_non_numeric_timeout() {
    let mut map = HashMap::new();
    map.insert("PDX_MODEL_TIMEOUT_SECS", "not-a-number");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "PDX_MODEL_TIMEOUT_SECS"),
        "expected InvalidEnvVar(PDX_MODEL_TIMEOUT_SECS), got: {result:?}"
    );
}

#[test]
fn build_app_config_rejects_zero_timeout() {
    let mut map = HashMap::new();
    map.insert("PDX_FETCH_TIMEOUT_SECS", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "PDX_FETCH_TIMEOUT_SECS"),
        "expected InvalidEnvVar(PDX_FETCH_TIMEOUT_SECS), got: {result:?}"
    );
}

#[test]
fn build_app_config_rejects_blank_model() {
    let mut map = HashMap::new();
    map.insert("PDX_MODEL", "   ");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "PDX_MODEL"),
        "expected InvalidEnvVar(PDX_MODEL), got: {result:?}"
    );
}

#[test]
fn build_app_config_rejects_non_http_model_base_url() {
    let mut map = HashMap::new();
    map.insert("PDX_MODEL_BASE_URL", "ftp://models.example.com");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "PDX_MODEL_BASE_URL"),
        "expected InvalidEnvVar(PDX_MODEL_BASE_URL), got: {result:?}"
    );
}
