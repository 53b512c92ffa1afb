use crate::app_config::{AppConfig, Environment};
use crate::map_picker::MAX_ZOOM;
use crate::model::Coordinate;
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
/// Every variable has a default, so an empty environment yields a working
/// development configuration pointed at a local backend.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
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

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_coordinate = |var: &str, default: &str| -> Result<Coordinate, ConfigError> {
        or_default(var, default)
            .parse::<Coordinate>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let env = parse_environment(&or_default("CITYGUIDE_ENV", "development"));
    let log_level = or_default("CITYGUIDE_LOG_LEVEL", "info");

    let api_base_url = or_default("CITYGUIDE_API_BASE_URL", "http://127.0.0.1:8000");
    if !(api_base_url.starts_with("http://") || api_base_url.starts_with("https://")) {
        return Err(invalid(
            "CITYGUIDE_API_BASE_URL",
            format!("expected an http(s) URL, got '{api_base_url}'"),
        ));
    }

    let request_timeout_secs = parse_u64("CITYGUIDE_REQUEST_TIMEOUT_SECS", "10")?;
    if request_timeout_secs == 0 {
        return Err(invalid(
            "CITYGUIDE_REQUEST_TIMEOUT_SECS",
            "must be greater than zero".to_string(),
        ));
    }

    let user_agent = or_default("CITYGUIDE_USER_AGENT", "cityguide/0.1 (location-catalog)");
    let max_retries = parse_u32("CITYGUIDE_MAX_RETRIES", "2")?;
    let retry_backoff_base_ms = parse_u64("CITYGUIDE_RETRY_BACKOFF_BASE_MS", "250")?;

    let city_center = parse_coordinate("CITYGUIDE_CITY_CENTER", "48.016011,37.802773")?;
    let user_position = parse_coordinate("CITYGUIDE_USER_POSITION", "47.993370,37.815420")?;

    let map_zoom = or_default("CITYGUIDE_MAP_ZOOM", "15")
        .parse::<u8>()
        .map_err(|e| invalid("CITYGUIDE_MAP_ZOOM", e.to_string()))?;
    if map_zoom > MAX_ZOOM {
        return Err(invalid(
            "CITYGUIDE_MAP_ZOOM",
            format!("must be at most {MAX_ZOOM}"),
        ));
    }

    Ok(AppConfig {
        env,
        log_level,
        api_base_url,
        request_timeout_secs,
        user_agent,
        max_retries,
        retry_backoff_base_ms,
        city_center,
        map_zoom,
        user_position,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
