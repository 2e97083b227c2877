use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
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
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let endpoint_url = require("DALIL_ENDPOINT_URL")?;
    if !(endpoint_url.starts_with("http://") || endpoint_url.starts_with("https://")) {
        return Err(ConfigError::InvalidEnvVar {
            var: "DALIL_ENDPOINT_URL".to_string(),
            reason: "must be an http(s) URL".to_string(),
        });
    }

    let env = parse_environment(&or_default("DALIL_ENV", "development"))?;
    let log_level = or_default("DALIL_LOG_LEVEL", "info");
    let cache_dir = PathBuf::from(or_default("DALIL_CACHE_DIR", "./.dalil"));

    let fetch_timeout_secs = parse_u64("DALIL_FETCH_TIMEOUT_SECS", "10")?;
    if fetch_timeout_secs == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "DALIL_FETCH_TIMEOUT_SECS".to_string(),
            reason: "must be greater than zero".to_string(),
        });
    }
    let fetch_max_retries = parse_u32("DALIL_FETCH_MAX_RETRIES", "1")?;
    let fetch_retry_delay_ms = parse_u64("DALIL_FETCH_RETRY_DELAY_MS", "1500")?;
    let user_agent = or_default("DALIL_USER_AGENT", "dalil/0.1 (directory-sync)");

    let country_code = or_default("DALIL_COUNTRY_CODE", "20")
        .trim()
        .trim_start_matches('+')
        .to_string();
    if country_code.is_empty() || !country_code.chars().all(|c| c.is_ascii_digit()) {
        return Err(ConfigError::InvalidEnvVar {
            var: "DALIL_COUNTRY_CODE".to_string(),
            reason: format!("expected digits, got '{country_code}'"),
        });
    }

    let search_debounce_ms = parse_u64("DALIL_SEARCH_DEBOUNCE_MS", "200")?;

    Ok(AppConfig {
        endpoint_url,
        env,
        log_level,
        cache_dir,
        fetch_timeout_secs,
        fetch_max_retries,
        fetch_retry_delay_ms,
        user_agent,
        country_code,
        search_debounce_ms,
    })
}

/// Parse a string into an `Environment` variant.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidEnvVar`] for anything other than
/// `development`, `test` or `production`.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "DALIL_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
