use crate::{Cipher, Result};

use rowbridge_core::{Error, Mapper};
use serde::{Deserialize, Serialize};
use std::{fmt, path::Path, str::FromStr, time::Duration};

/// Runtime settings shared by the client and the service.
///
/// Every key is optional in TOML; missing keys take their defaults.
///
/// ```
/// let config: rowbridge::Config = "fuzzy_threshold = 0.3\nschema_refresh_ms = 5000".parse().unwrap();
/// assert_eq!(config.fuzzy_threshold, 0.3);
/// assert_eq!(config.key, "8080808080808080");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Pre-shared AES-128 key, 16 bytes of UTF-8
    pub key: String,

    /// Pre-shared CBC initialization vector, 16 bytes of UTF-8
    pub iv: String,

    /// Map result columns to fields by edit distance when no name matches
    pub fuzzy_mapping: bool,

    /// Largest accepted `distance / (len(column) + len(field))`
    pub fuzzy_threshold: f64,

    pub schema_refresh_ms: u64,

    /// Ceiling on a single statement's execution time
    pub statement_timeout_ms: u64,

    /// Longest accepted condition fragment
    pub max_condition_len: usize,

    /// Rows per bulk insert batch
    pub bulk_batch_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            key: Cipher::DEFAULT_SECRET.to_string(),
            iv: Cipher::DEFAULT_SECRET.to_string(),
            fuzzy_mapping: true,
            fuzzy_threshold: Mapper::DEFAULT_THRESHOLD,
            schema_refresh_ms: 20_000,
            statement_timeout_ms: 300_000,
            max_condition_len: rowbridge_core::stmt::Condition::MAX_LEN,
            bulk_batch_size: 5_000,
        }
    }
}

impl Config {
    /// Create a new Config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses and validates TOML text.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(s).map_err(|err| Error::invalid_config(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a config from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|err| {
            Error::invalid_config(format!("reading {}: {err}", path.display()))
        })?;
        Self::from_toml_str(&contents)
    }

    pub fn validate(&self) -> Result<()> {
        for (name, value) in [("key", &self.key), ("iv", &self.iv)] {
            if value.len() != Cipher::BLOCK_LEN {
                return Err(Error::invalid_config(format!(
                    "`{name}` must be {} bytes, got {}",
                    Cipher::BLOCK_LEN,
                    value.len()
                )));
            }
        }

        if !(self.fuzzy_threshold > 0.0 && self.fuzzy_threshold <= 1.0) {
            return Err(Error::invalid_config(format!(
                "`fuzzy_threshold` must be in (0, 1], got {}",
                self.fuzzy_threshold
            )));
        }

        if self.max_condition_len == 0 {
            return Err(Error::invalid_config("`max_condition_len` must be positive"));
        }

        if self.bulk_batch_size == 0 {
            return Err(Error::invalid_config("`bulk_batch_size` must be positive"));
        }

        Ok(())
    }

    pub fn mapper(&self) -> Mapper {
        Mapper::new()
            .with_fuzzy(self.fuzzy_mapping)
            .with_threshold(self.fuzzy_threshold)
    }

    pub fn cipher(&self) -> Result<Cipher> {
        Cipher::new(&self.key, &self.iv)
    }

    pub fn schema_refresh(&self) -> Duration {
        Duration::from_millis(self.schema_refresh_ms)
    }

    pub fn statement_timeout(&self) -> Duration {
        Duration::from_millis(self.statement_timeout_ms)
    }
}

impl FromStr for Config {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_toml_str(s)
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let toml_str = toml::to_string_pretty(self).map_err(|_| fmt::Error)?;
        write!(f, "{toml_str}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_is_default() {
        assert_eq!(Config::from_toml_str("").unwrap(), Config::default());
    }

    #[test]
    fn display_round_trips() {
        let config = Config {
            bulk_batch_size: 10,
            ..Config::default()
        };
        assert_eq!(config.to_string().parse::<Config>().unwrap(), config);
    }

    #[test]
    fn rejects_short_key() {
        let err = Config::from_toml_str("key = \"short\"").unwrap_err();
        assert!(err.is_invalid_config());
        assert!(err.to_string().contains("`key` must be 16 bytes"));
    }

    #[test]
    fn rejects_threshold_out_of_range() {
        for text in ["fuzzy_threshold = 0.0", "fuzzy_threshold = 1.5"] {
            assert!(Config::from_toml_str(text).unwrap_err().is_invalid_config());
        }
    }

    #[test]
    fn rejects_unknown_keys() {
        assert!(Config::from_toml_str("colour = 1").unwrap_err().is_invalid_config());
    }

    #[test]
    fn mapper_follows_settings() {
        let config = Config {
            fuzzy_mapping: false,
            fuzzy_threshold: 0.25,
            ..Config::default()
        };
        let mapper = config.mapper();
        assert!(!mapper.is_fuzzy());
        assert_eq!(mapper.threshold(), 0.25);
    }
}
