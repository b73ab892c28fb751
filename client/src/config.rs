//! Client settings loaded via OrthoConfig.
//!
//! Values layer as defaults, then configuration file, then `MENTORSHIP_*`
//! environment variables, then explicit command-line overrides.

use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;

use crate::outbound::http::{ApiToken, HttpClientConfig};

const DEFAULT_API_BASE_URL: &str = "http://localhost:8080/api";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const MIN_TIMEOUT_SECS: u64 = 1;
const MAX_TIMEOUT_SECS: u64 = 300;

/// Errors raised while turning settings into an HTTP client configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("api base url `{url}` is invalid: {message}")]
    InvalidBaseUrl { url: String, message: String },
    #[error("api base url `{url}` must use http or https")]
    UnsupportedScheme { url: String },
}

/// Connection settings for the matching API.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "MENTORSHIP")]
pub struct ClientSettings {
    /// Base URL of the matching API.
    pub api_base_url: Option<String>,
    /// Bearer token sent with every call.
    pub api_token: Option<String>,
    /// Per-call timeout in seconds.
    #[ortho_config(default = 30)]
    pub timeout_secs: u64,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            api_base_url: None,
            api_token: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Values given explicitly on the command line; these win over every layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsOverrides {
    pub api_base_url: Option<String>,
    pub api_token: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl ClientSettings {
    /// Apply command-line overrides on top of the loaded layers.
    #[must_use]
    pub fn with_overrides(self, overrides: SettingsOverrides) -> Self {
        Self {
            api_base_url: overrides.api_base_url.or(self.api_base_url),
            api_token: overrides.api_token.or(self.api_token),
            timeout_secs: overrides.timeout_secs.unwrap_or(self.timeout_secs),
        }
    }

    /// Configured base URL, falling back to the local development API.
    pub fn api_base_url(&self) -> &str {
        self.api_base_url.as_deref().unwrap_or(DEFAULT_API_BASE_URL)
    }

    /// Timeout clamped to a sane range.
    pub fn timeout(&self) -> Duration {
        let secs = self.timeout_secs.clamp(MIN_TIMEOUT_SECS, MAX_TIMEOUT_SECS);
        Duration::from_secs(secs)
    }

    /// Validate the settings into adapter configuration.
    pub fn http_client_config(&self) -> Result<HttpClientConfig, ConfigError> {
        let raw = self.api_base_url().trim();
        let base_url = Url::parse(raw).map_err(|error| ConfigError::InvalidBaseUrl {
            url: raw.to_owned(),
            message: error.to_string(),
        })?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(ConfigError::UnsupportedScheme {
                url: raw.to_owned(),
            });
        }
        Ok(HttpClientConfig {
            base_url,
            token: self.api_token.as_deref().and_then(ApiToken::new),
            timeout: self.timeout(),
        })
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for client configuration parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    fn load_from_empty_args() -> ClientSettings {
        ClientSettings::load_from_iter([OsString::from("match-requests")])
            .expect("config should load")
    }

    #[rstest]
    fn defaults_apply_when_nothing_is_set() {
        let _guard = lock_env([
            ("MENTORSHIP_API_BASE_URL", None::<String>),
            ("MENTORSHIP_API_TOKEN", None::<String>),
            ("MENTORSHIP_TIMEOUT_SECS", None::<String>),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(settings.api_base_url(), DEFAULT_API_BASE_URL);
        assert_eq!(settings.timeout(), Duration::from_secs(30));

        let config = settings.http_client_config().expect("valid defaults");
        assert_eq!(config.base_url.as_str(), "http://localhost:8080/api");
        assert!(config.token.is_none());
    }

    #[rstest]
    fn command_line_overrides_apply_over_loaded_defaults() {
        let _guard = lock_env([
            ("MENTORSHIP_API_BASE_URL", None::<String>),
            ("MENTORSHIP_API_TOKEN", None::<String>),
            ("MENTORSHIP_TIMEOUT_SECS", None::<String>),
        ]);

        let settings = load_from_empty_args().with_overrides(SettingsOverrides {
            api_base_url: Some("https://cli.example.com/api".to_owned()),
            api_token: None,
            timeout_secs: None,
        });
        assert_eq!(settings.api_base_url(), "https://cli.example.com/api");
        assert_eq!(settings.timeout(), Duration::from_secs(DEFAULT_TIMEOUT_SECS));
    }

    #[rstest]
    fn partial_environment_keeps_the_default_timeout() {
        let _guard = lock_env([
            ("MENTORSHIP_API_BASE_URL", None::<String>),
            ("MENTORSHIP_API_TOKEN", Some("only-token".to_owned())),
            ("MENTORSHIP_TIMEOUT_SECS", None::<String>),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(settings.api_token.as_deref(), Some("only-token"));
        assert_eq!(settings.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            (
                "MENTORSHIP_API_BASE_URL",
                Some("https://match.example.com/api".to_owned()),
            ),
            ("MENTORSHIP_API_TOKEN", Some("s3cr3t".to_owned())),
            ("MENTORSHIP_TIMEOUT_SECS", Some("12".to_owned())),
        ]);

        let config = load_from_empty_args()
            .http_client_config()
            .expect("valid settings");
        assert_eq!(config.base_url.as_str(), "https://match.example.com/api");
        assert_eq!(config.token.as_ref().map(ApiToken::expose), Some("s3cr3t"));
        assert_eq!(config.timeout, Duration::from_secs(12));
    }

    #[rstest]
    fn command_line_overrides_win() {
        let settings = ClientSettings {
            api_base_url: Some("http://from-env/api".to_owned()),
            api_token: Some("env-token".to_owned()),
            timeout_secs: 10,
        }
        .with_overrides(SettingsOverrides {
            api_base_url: Some("http://from-cli/api".to_owned()),
            api_token: None,
            timeout_secs: Some(60),
        });

        assert_eq!(settings.api_base_url(), "http://from-cli/api");
        assert_eq!(settings.api_token.as_deref(), Some("env-token"));
        assert_eq!(settings.timeout(), Duration::from_secs(60));
    }

    #[rstest]
    #[case(0, 1)]
    #[case(45, 45)]
    #[case(10_000, 300)]
    fn timeout_is_clamped(#[case] configured: u64, #[case] expected: u64) {
        let settings = ClientSettings {
            timeout_secs: configured,
            ..ClientSettings::default()
        };
        assert_eq!(settings.timeout(), Duration::from_secs(expected));
    }

    #[rstest]
    fn blank_token_is_treated_as_absent() {
        let settings = ClientSettings {
            api_token: Some("   ".to_owned()),
            ..ClientSettings::default()
        };
        let config = settings.http_client_config().expect("valid settings");
        assert!(config.token.is_none());
    }

    #[rstest]
    #[case("not a url")]
    #[case("localhost:8080/api")]
    #[case("ftp://files.example.com/api")]
    fn rejects_unusable_base_urls(#[case] url: &str) {
        let settings = ClientSettings {
            api_base_url: Some(url.to_owned()),
            ..ClientSettings::default()
        };
        assert!(settings.http_client_config().is_err());
    }
}
