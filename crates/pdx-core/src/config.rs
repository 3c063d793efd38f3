use std::net::SocketAddr;

use crate::app_config::{AppConfig, Environment, DEFAULT_FETCH_USER_AGENT};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        or_default(var, default)
            .parse::<SocketAddr>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_secs = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let secs = or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))?;
        if secs == 0 {
            return Err(invalid(var, "must be greater than zero".to_string()));
        }
        Ok(secs)
    };

    let non_empty = |var: &str, default: &str| -> Result<String, ConfigError> {
        let value = or_default(var, default).trim().to_string();
        if value.is_empty() {
            return Err(invalid(var, "must not be empty".to_string()));
        }
        Ok(value)
    };

    let env = parse_environment(&or_default("PDX_ENV", "development"))?;
    let bind_addr = parse_addr("PDX_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("PDX_LOG_LEVEL", "info");

    let fetch_timeout_secs = parse_secs("PDX_FETCH_TIMEOUT_SECS", "30")?;
    let fetch_user_agent = non_empty("PDX_FETCH_USER_AGENT", DEFAULT_FETCH_USER_AGENT)?;

    let model = non_empty("PDX_MODEL", "gpt-4o-2024-08-06")?;
    let model_base_url = non_empty("PDX_MODEL_BASE_URL", "https://api.openai.com/v1")?;
    if !model_base_url.starts_with("http://") && !model_base_url.starts_with("https://") {
        return Err(invalid(
            "PDX_MODEL_BASE_URL",
            format!("expected an http(s) URL, got \"{model_base_url}\""),
        ));
    }
    let model_timeout_secs = parse_secs("PDX_MODEL_TIMEOUT_SECS", "120")?;

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        fetch_timeout_secs,
        fetch_user_agent,
        model,
        model_base_url,
        model_timeout_secs,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "PDX_ENV".to_string(),
            reason: format!("expected development, test, or production; got \"{other}\""),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
