use std::env;
use std::path::PathBuf;
use std::time::Duration;

use quiz_core::model::RankFilter;
use url::Url;

use crate::error::ConfigError;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080";

pub const ENV_API_BASE_URL: &str = "FINQUIZ_API_BASE_URL";
pub const ENV_API_TIMEOUT_SECS: &str = "FINQUIZ_API_TIMEOUT_SECS";
pub const ENV_CATALOG_RANK_FILTER: &str = "FINQUIZ_CATALOG_RANK_FILTER";
pub const ENV_CREDENTIALS_PATH: &str = "FINQUIZ_CREDENTIALS_PATH";

/// Connection and policy settings for the remote quiz service.
#[derive(Clone, Debug, PartialEq)]
pub struct ClientConfig {
    pub base_url: Url,
    /// `None` waits as long as the service takes.
    pub timeout: Option<Duration>,
    pub rank_filter: RankFilter,
    /// File used to keep the credential between runs; `None` keeps it in memory.
    pub credentials_path: Option<PathBuf>,
}

impl ClientConfig {
    #[must_use]
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            timeout: None,
            rank_filter: RankFilter::default(),
            credentials_path: None,
        }
    }

    /// Settings pointing at a locally running service.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidBaseUrl` if the built-in url fails to parse.
    pub fn local() -> Result<Self, ConfigError> {
        let base_url = Url::parse(DEFAULT_API_BASE_URL).map_err(|_| ConfigError::InvalidBaseUrl {
            raw: DEFAULT_API_BASE_URL.to_string(),
        })?;
        Ok(Self::new(base_url))
    }

    /// Reads `FINQUIZ_*` variables, falling back to defaults for unset ones.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when a set variable cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as `from_env` but with an injectable variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when a provided value cannot be parsed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::local()?;
        let set = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(raw) = set(ENV_API_BASE_URL) {
            config = config.with_base_url(&raw)?;
        }
        if let Some(raw) = set(ENV_API_TIMEOUT_SECS) {
            config = config.with_timeout_secs(&raw)?;
        }
        if let Some(raw) = set(ENV_CATALOG_RANK_FILTER) {
            config.rank_filter = raw
                .parse()
                .map_err(|_| ConfigError::InvalidRankFilter { raw: raw.clone() })?;
        }
        if let Some(raw) = set(ENV_CREDENTIALS_PATH) {
            config.credentials_path = Some(PathBuf::from(raw.trim()));
        }

        Ok(config)
    }

    /// # Errors
    ///
    /// Returns `ConfigError::InvalidBaseUrl` unless `raw` is an absolute http(s) url.
    pub fn with_base_url(mut self, raw: &str) -> Result<Self, ConfigError> {
        let invalid = || ConfigError::InvalidBaseUrl {
            raw: raw.to_string(),
        };
        let url = Url::parse(raw.trim()).map_err(|_| invalid())?;
        if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
            return Err(invalid());
        }
        self.base_url = url;
        Ok(self)
    }

    /// # Errors
    ///
    /// Returns `ConfigError::InvalidTimeout` unless `raw` is a positive whole number.
    pub fn with_timeout_secs(mut self, raw: &str) -> Result<Self, ConfigError> {
        let secs: u64 = raw
            .trim()
            .parse()
            .ok()
            .filter(|secs| *secs > 0)
            .ok_or_else(|| ConfigError::InvalidTimeout {
                raw: raw.to_string(),
            })?;
        self.timeout = Some(Duration::from_secs(secs));
        Ok(self)
    }

    #[must_use]
    pub fn with_rank_filter(mut self, rank_filter: RankFilter) -> Self {
        self.rank_filter = rank_filter;
        self
    }

    #[must_use]
    pub fn with_credentials_path(mut self, path: Option<PathBuf>) -> Self {
        self.credentials_path = path;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = ClientConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, ClientConfig::local().unwrap());
        assert_eq!(config.base_url.as_str(), "http://localhost:8080/");
        assert_eq!(config.rank_filter, RankFilter::Exact);
        assert!(config.timeout.is_none());
    }

    #[test]
    fn reads_every_variable() {
        let config = ClientConfig::from_lookup(lookup(&[
            (ENV_API_BASE_URL, "https://quiz.example.com/api/"),
            (ENV_API_TIMEOUT_SECS, "15"),
            (ENV_CATALOG_RANK_FILTER, "at-or-below"),
            (ENV_CREDENTIALS_PATH, "/tmp/finquiz.json"),
        ]))
        .unwrap();

        assert_eq!(config.base_url.as_str(), "https://quiz.example.com/api/");
        assert_eq!(config.timeout, Some(Duration::from_secs(15)));
        assert_eq!(config.rank_filter, RankFilter::AtOrBelow);
        assert_eq!(
            config.credentials_path,
            Some(PathBuf::from("/tmp/finquiz.json"))
        );
    }

    #[test]
    fn rejects_bad_values() {
        let err = ClientConfig::from_lookup(lookup(&[(ENV_API_BASE_URL, "localhost")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidBaseUrl { .. }));

        let err = ClientConfig::from_lookup(lookup(&[(ENV_API_TIMEOUT_SECS, "0")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidTimeout { .. }));

        let err =
            ClientConfig::from_lookup(lookup(&[(ENV_CATALOG_RANK_FILTER, "loose")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidRankFilter { .. }));
    }
}
