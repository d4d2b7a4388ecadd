use std::env;
use std::time::Duration;

use crate::error::{AppError, AppResult};

pub const API_URL_VAR: &str = "HELPDESK_API_URL";
pub const TIMEOUT_VAR: &str = "HELPDESK_TIMEOUT_SECS";
pub const DEFAULT_API_URL: &str = "http://localhost:8000";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_url: String,
    pub request_timeout: Duration,
}

impl AppConfig {
    /// Loads from the process environment. An explicit `api_url_override`
    /// (the `--api-url` flag) wins over `HELPDESK_API_URL`.
    pub fn load(api_url_override: Option<String>) -> AppResult<Self> {
        Self::from_lookup(api_url_override, |key| env::var(key).ok())
    }

    pub fn from_lookup<F>(api_url_override: Option<String>, lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url = match api_url_override.or_else(|| lookup(API_URL_VAR)) {
            Some(url) => normalize_api_url(&url)?,
            None => DEFAULT_API_URL.to_string(),
        };

        let request_timeout = match lookup(TIMEOUT_VAR) {
            Some(raw) => {
                let secs = raw.trim().parse::<u64>().map_err(|_| {
                    AppError::Configuration(format!("{TIMEOUT_VAR} must be a number of seconds"))
                })?;
                Duration::from_secs(secs)
            }
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        Ok(Self {
            api_url,
            request_timeout,
        })
    }
}

fn normalize_api_url(raw: &str) -> AppResult<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(AppError::Configuration(
            "API base URL must not be empty".to_string(),
        ));
    }
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(AppError::Configuration(format!(
            "API base URL must start with http:// or https://, got '{trimmed}'"
        )));
    }
    Ok(trimmed.to_string())
}
