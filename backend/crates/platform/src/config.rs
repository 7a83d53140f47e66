//! Typed configuration lookup
//!
//! Settings are read through a lookup function instead of `std::env`
//! directly, so parsing can be exercised in tests with a plain map.

use std::fmt::Display;
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(String),

    #[error("{key}={value:?} is invalid: {reason}")]
    Invalid {
        key: String,
        value: String,
        reason: String,
    },
}

/// Source of raw configuration values
pub struct ConfigSource<F>
where
    F: Fn(&str) -> Option<String>,
{
    lookup: F,
}

fn env_lookup(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

impl ConfigSource<fn(&str) -> Option<String>> {
    /// Read from the process environment
    pub fn from_env() -> Self {
        Self { lookup: env_lookup }
    }
}

impl<F> ConfigSource<F>
where
    F: Fn(&str) -> Option<String>,
{
    pub fn new(lookup: F) -> Self {
        Self { lookup }
    }

    /// Value for `key`; blank values count as unset.
    pub fn optional(&self, key: &str) -> Option<String> {
        (self.lookup)(key)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    }

    pub fn required(&self, key: &str) -> Result<String, ConfigError> {
        self.optional(key)
            .ok_or_else(|| ConfigError::Missing(key.to_string()))
    }

    pub fn or(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }

    /// Parse `key` when present
    pub fn parse<T>(&self, key: &str) -> Result<Option<T>, ConfigError>
    where
        T: FromStr,
        T::Err: Display,
    {
        match self.optional(key) {
            None => Ok(None),
            Some(value) => value
                .parse::<T>()
                .map(Some)
                .map_err(|e| ConfigError::Invalid {
                    key: key.to_string(),
                    value,
                    reason: e.to_string(),
                }),
        }
    }

    /// Comma-separated list; empty entries are dropped
    pub fn list(&self, key: &str) -> Vec<String> {
        self.optional(key)
            .map(|value| {
                value
                    .split(',')
                    .map(str::trim)
                    .filter(|item| !item.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }
}
