//! Dashboard settings from a TOML file and the environment.

use std::path::{Path, PathBuf};
use std::time::Duration;

use forest_dash_api::DEFAULT_BASE_URL;
use forest_dash_forest_models::Dataset;
use forest_dash_presentation::pages::{PageOptions, default_page_size};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable overriding [`DashboardConfig::api_url`].
pub const API_URL_VAR: &str = "FOREST_API_URL";
/// Environment variable overriding [`DashboardConfig::page_size`].
pub const PAGE_SIZE_VAR: &str = "FOREST_PAGE_SIZE";
/// Environment variable overriding [`DashboardConfig::bins`].
pub const BIN_COUNT_VAR: &str = "FOREST_BIN_COUNT";
/// Environment variable overriding [`DashboardConfig::timeout_secs`].
pub const TIMEOUT_VAR: &str = "FOREST_TIMEOUT_SECS";

const DEFAULT_BINS: usize = 9;
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config file: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid value '{value}' for {var}")]
    InvalidEnv { var: &'static str, value: String },
}

/// Settings shared by every subcommand.
///
/// Resolution order, highest first: command-line flag, environment
/// variable, config file, built-in default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DashboardConfig {
    pub api_url: String,
    /// Rows per table page. Unset uses each dataset's usual size.
    pub page_size: Option<usize>,
    /// Choropleth bin count.
    pub bins: usize,
    pub timeout_secs: u64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_BASE_URL.to_string(),
            page_size: None,
            bins: DEFAULT_BINS,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl DashboardConfig {
    /// Reads the optional config file at `path`, then applies the process
    /// environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed, or an
    /// environment variable holds a value of the wrong type.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => {
                let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })?;
                log::debug!("Loaded config from {}", path.display());
                Self::from_toml_str(&text)?
            }
            None => Self::default(),
        };
        config.with_env(|var| std::env::var(var).ok())
    }

    /// Parses a TOML document; missing keys keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Toml`] on malformed TOML or unknown keys.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Overrides fields with the variables `lookup` returns.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidEnv`] if a numeric variable does not
    /// parse.
    pub fn with_env(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(url) = lookup(API_URL_VAR).filter(|u| !u.trim().is_empty()) {
            self.api_url = url;
        }
        if let Some(size) = parse_var(&lookup, PAGE_SIZE_VAR)? {
            self.page_size = Some(size);
        }
        if let Some(bins) = parse_var(&lookup, BIN_COUNT_VAR)? {
            self.bins = bins;
        }
        if let Some(secs) = parse_var(&lookup, TIMEOUT_VAR)? {
            self.timeout_secs = secs;
        }
        Ok(self)
    }

    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Table and map settings for `dataset`.
    #[must_use]
    pub fn page_options(&self, dataset: Dataset) -> PageOptions {
        PageOptions {
            page_size: self
                .page_size
                .unwrap_or_else(|| default_page_size(dataset)),
            bins: self.bins,
            ..PageOptions::for_dataset(dataset)
        }
    }
}

fn parse_var<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
) -> Result<Option<T>, ConfigError> {
    lookup(var)
        .map(|value| {
            value
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidEnv { var, value })
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: BTreeMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |var: &str| map.get(var).cloned()
    }

    #[test]
    fn defaults_without_file_or_env() {
        let config = DashboardConfig::default().with_env(env(&[])).unwrap();
        assert_eq!(config.api_url, "http://localhost:8000");
        assert_eq!(config.bins, 9);
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert_eq!(config.page_options(Dataset::LandArea).page_size, 15);
        assert_eq!(config.page_options(Dataset::Dynamics).page_size, 10);
    }

    #[test]
    fn env_overrides_file() {
        let file = DashboardConfig::from_toml_str(
            r#"
            api_url = "http://stats.internal:9000"
            bins = 5
            "#,
        )
        .unwrap();
        assert_eq!(file.bins, 5);
        assert_eq!(file.timeout_secs, 30);

        let config = file
            .with_env(env(&[(BIN_COUNT_VAR, "7"), (PAGE_SIZE_VAR, "25")]))
            .unwrap();
        assert_eq!(config.api_url, "http://stats.internal:9000");
        assert_eq!(config.bins, 7);
        assert_eq!(config.page_options(Dataset::Dynamics).page_size, 25);
    }

    #[test]
    fn blank_url_env_is_ignored() {
        let config = DashboardConfig::default()
            .with_env(env(&[(API_URL_VAR, "  ")]))
            .unwrap();
        assert_eq!(config.api_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn malformed_env_is_an_error() {
        let err = DashboardConfig::default()
            .with_env(env(&[(TIMEOUT_VAR, "soon")]))
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid value 'soon' for FOREST_TIMEOUT_SECS");
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(matches!(
            DashboardConfig::from_toml_str("colour = \"green\""),
            Err(ConfigError::Toml(_))
        ));
    }
}
