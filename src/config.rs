//! Per-instance client settings.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

use crate::error::ConfigError;

/// Base URL filled in by [`ClientConfiguration::default`].
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

/// Environment variable read by [`ClientConfiguration::from_env`] for the base URL.
pub const BASE_URL_ENV: &str = "API_BASE_URL";

/// Environment variable read by [`ClientConfiguration::from_env`] for the access token.
pub const ACCESS_TOKEN_ENV: &str = "API_ACCESS_TOKEN";

/// Settings for one [`ApiClient`](crate::client::ApiClient).
///
/// Stored as a plain JSON object when loaded from disk:
/// ```json
/// { "base_url": "https://api.example.com", "access_token": "abc123" }
/// ```
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfiguration {
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub access_token: Option<String>,
}

impl ClientConfiguration {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: Some(base_url.into()),
            access_token: None,
        }
    }

    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    /// Loads the configuration from a JSON file at `path`.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Builds a configuration from `API_BASE_URL` and `API_ACCESS_TOKEN`.
    ///
    /// Unset or empty variables are treated as absent; a missing base URL
    /// keeps [`DEFAULT_BASE_URL`].
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.is_empty());
        let mut config = Self::default();
        if let Some(base_url) = non_empty(BASE_URL_ENV) {
            config.base_url = Some(base_url);
        }
        config.access_token = non_empty(ACCESS_TOKEN_ENV);
        config
    }

    /// The access token, if one is set and non-empty.
    pub fn token(&self) -> Option<&str> {
        self.access_token.as_deref().filter(|t| !t.is_empty())
    }

    /// Parses the configured base URL.
    pub fn resolved_base_url(&self) -> Result<Url, ConfigError> {
        let raw = self
            .base_url
            .as_deref()
            .filter(|u| !u.is_empty())
            .ok_or(ConfigError::MissingBaseUrl)?;
        Url::parse(raw).map_err(|source| ConfigError::InvalidBaseUrl {
            url: raw.to_string(),
            source,
        })
    }
}

impl Default for ClientConfiguration {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl fmt::Debug for ClientConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfiguration")
            .field("base_url", &self.base_url)
            .field("access_token", &self.token().map(|_| "<redacted>"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::fs;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_uses_local_base_url() {
        let config = ClientConfiguration::default();
        assert_eq!(config.base_url.as_deref(), Some(DEFAULT_BASE_URL));
        assert_eq!(config.token(), None);
    }

    #[test]
    fn test_empty_token_is_treated_as_absent() {
        let config = ClientConfiguration::default().with_access_token("");
        assert_eq!(config.token(), None);

        let config = ClientConfiguration::default().with_access_token("abc");
        assert_eq!(config.token(), Some("abc"));
    }

    #[test]
    fn test_from_lookup_reads_both_values() {
        let config = ClientConfiguration::from_lookup(lookup(&[
            (BASE_URL_ENV, "https://api.example.com"),
            (ACCESS_TOKEN_ENV, "secret"),
        ]));
        assert_eq!(config.base_url.as_deref(), Some("https://api.example.com"));
        assert_eq!(config.token(), Some("secret"));
    }

    #[test]
    fn test_from_lookup_keeps_default_for_empty_base_url() {
        let config = ClientConfiguration::from_lookup(lookup(&[(BASE_URL_ENV, "")]));
        assert_eq!(config.base_url.as_deref(), Some(DEFAULT_BASE_URL));
        assert_eq!(config.access_token, None);
    }

    #[test]
    fn test_missing_base_url_is_an_error() {
        let config = ClientConfiguration {
            base_url: None,
            access_token: None,
        };
        assert!(matches!(
            config.resolved_base_url(),
            Err(ConfigError::MissingBaseUrl)
        ));
    }

    #[test]
    fn test_invalid_base_url_is_an_error() {
        let config = ClientConfiguration::new("not a url");
        assert!(matches!(
            config.resolved_base_url(),
            Err(ConfigError::InvalidBaseUrl { .. })
        ));
    }

    #[test]
    fn test_debug_redacts_token() {
        let config = ClientConfiguration::default().with_access_token("super-secret");
        let printed = format!("{config:?}");
        assert!(!printed.contains("super-secret"));
        assert!(printed.contains("<redacted>"));
    }

    #[test]
    fn test_load_from_json_file() {
        let path = format!("{}/api_client_test_config.json", std::env::temp_dir().display());
        fs::write(&path, r#"{"base_url":"http://example.test","access_token":"t"}"#).unwrap();

        let config = ClientConfiguration::load(&path).unwrap();
        assert_eq!(config.base_url.as_deref(), Some("http://example.test"));
        assert_eq!(config.token(), Some("t"));

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_load_tolerates_missing_fields() {
        let path = format!("{}/api_client_test_config_empty.json", std::env::temp_dir().display());
        fs::write(&path, "{}").unwrap();

        let config = ClientConfiguration::load(&path).unwrap();
        assert_eq!(config.base_url, None);
        assert_eq!(config.access_token, None);

        fs::remove_file(&path).unwrap();
    }
}
