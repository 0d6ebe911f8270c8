use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;
use url::Url;

use crate::app::state::AnswerPolicy;

pub const BACKEND_URL_ENV: &str = "AGENTIC_BACKEND_URL";
pub const CONNECT_TIMEOUT_ENV: &str = "AGENTIC_CONNECT_TIMEOUT_MS";
pub const REQUEST_TIMEOUT_ENV: &str = "AGENTIC_REQUEST_TIMEOUT_MS";
pub const CONFIRM_POLICY_ENV: &str = "AGENTIC_CONFIRM_POLICY";
pub const LOG_FILTER_ENV: &str = "AGENTIC_LOG";
pub const LOG_FILE_ENV: &str = "AGENTIC_LOG_FILE";

const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{key}: invalid url `{value}`: {source}")]
    InvalidUrl {
        key: &'static str,
        value: String,
        #[source]
        source: url::ParseError,
    },
    #[error("{key}: unsupported scheme `{scheme}` (expected http or https)")]
    UnsupportedScheme { key: &'static str, scheme: String },
    #[error("{key}: expected a positive number of milliseconds, got `{value}`")]
    InvalidTimeout { key: &'static str, value: String },
    #[error("{key}: expected `strict` or `lenient`, got `{value}`")]
    InvalidPolicy { key: &'static str, value: String },
    #[error("{key}: invalid log filter `{value}`: {source}")]
    InvalidLogFilter {
        key: &'static str,
        value: String,
        #[source]
        source: ParseError,
    },
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub backend_url: Url,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub confirm_policy: AnswerPolicy,
    pub log_filter: String,
    pub log_file: Option<PathBuf>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let backend_url = parse_backend_url(
            read(BACKEND_URL_ENV)
                .as_deref()
                .unwrap_or(DEFAULT_BACKEND_URL),
        )?;
        let connect_timeout = match read(CONNECT_TIMEOUT_ENV) {
            Some(value) => parse_timeout(CONNECT_TIMEOUT_ENV, value)?,
            None => DEFAULT_CONNECT_TIMEOUT,
        };
        let request_timeout = match read(REQUEST_TIMEOUT_ENV) {
            Some(value) => parse_timeout(REQUEST_TIMEOUT_ENV, value)?,
            None => DEFAULT_REQUEST_TIMEOUT,
        };
        let confirm_policy = match read(CONFIRM_POLICY_ENV) {
            Some(value) => value
                .parse::<AnswerPolicy>()
                .map_err(|value| ConfigError::InvalidPolicy {
                    key: CONFIRM_POLICY_ENV,
                    value,
                })?,
            None => AnswerPolicy::default(),
        };

        let log_filter = read(LOG_FILTER_ENV).unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());
        if let Err(source) = EnvFilter::try_new(&log_filter) {
            return Err(ConfigError::InvalidLogFilter {
                key: LOG_FILTER_ENV,
                value: log_filter,
                source,
            });
        }

        Ok(Self {
            backend_url,
            connect_timeout,
            request_timeout,
            confirm_policy,
            log_filter,
            log_file: read(LOG_FILE_ENV).map(PathBuf::from),
        })
    }
}

fn parse_backend_url(value: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(value).map_err(|source| ConfigError::InvalidUrl {
        key: BACKEND_URL_ENV,
        value: value.to_string(),
        source,
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(ConfigError::UnsupportedScheme {
            key: BACKEND_URL_ENV,
            scheme: scheme.to_string(),
        }),
    }
}

fn parse_timeout(key: &'static str, value: String) -> Result<Duration, ConfigError> {
    match value.parse::<u64>() {
        Ok(ms) if ms > 0 => Ok(Duration::from_millis(ms)),
        _ => Err(ConfigError::InvalidTimeout { key, value }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let values: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        AppConfig::from_lookup(|key| values.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = config_from(&[]).expect("defaults are valid");
        assert_eq!(config.backend_url.as_str(), "http://localhost:8000/");
        assert_eq!(config.connect_timeout, Duration::from_secs(10));
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.confirm_policy, AnswerPolicy::Strict);
        assert_eq!(config.log_filter, "info");
        assert!(config.log_file.is_none());
    }

    #[test]
    fn overrides_are_read() {
        let config = config_from(&[
            (BACKEND_URL_ENV, "https://agent.example.com/base"),
            (CONNECT_TIMEOUT_ENV, "2500"),
            (REQUEST_TIMEOUT_ENV, " 750 "),
            (CONFIRM_POLICY_ENV, "lenient"),
            (LOG_FILTER_ENV, "agentic_tui=debug"),
            (LOG_FILE_ENV, "/tmp/agentic.log"),
        ])
        .expect("valid overrides");
        assert_eq!(config.backend_url.scheme(), "https");
        assert_eq!(config.connect_timeout, Duration::from_millis(2500));
        assert_eq!(config.request_timeout, Duration::from_millis(750));
        assert_eq!(config.confirm_policy, AnswerPolicy::Lenient);
        assert_eq!(config.log_filter, "agentic_tui=debug");
        assert_eq!(config.log_file, Some(PathBuf::from("/tmp/agentic.log")));
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let config = config_from(&[(BACKEND_URL_ENV, "  "), (CONNECT_TIMEOUT_ENV, "")])
            .expect("blank values are ignored");
        assert_eq!(config.backend_url.host_str(), Some("localhost"));
        assert_eq!(config.connect_timeout, Duration::from_secs(10));
    }

    #[test]
    fn rejects_invalid_values() {
        assert!(matches!(
            config_from(&[(BACKEND_URL_ENV, "ws://localhost:8000")]),
            Err(ConfigError::UnsupportedScheme { .. })
        ));
        assert!(matches!(
            config_from(&[(BACKEND_URL_ENV, "not a url")]),
            Err(ConfigError::InvalidUrl { .. })
        ));
        assert!(matches!(
            config_from(&[(REQUEST_TIMEOUT_ENV, "0")]),
            Err(ConfigError::InvalidTimeout { .. })
        ));
        assert!(matches!(
            config_from(&[(CONFIRM_POLICY_ENV, "maybe")]),
            Err(ConfigError::InvalidPolicy { .. })
        ));
        assert!(matches!(
            config_from(&[(LOG_FILTER_ENV, "agentic_tui=loudest")]),
            Err(ConfigError::InvalidLogFilter { .. })
        ));
    }
}
