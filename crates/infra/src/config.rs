//! Runtime configuration, read from the environment.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

pub const DATA_PATH_VAR: &str = "SHELFLIFE_DATA_PATH";
pub const TICK_SECS_VAR: &str = "SHELFLIFE_TICK_SECS";

/// How often a live countdown is recomputed unless configured otherwise.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_secs(10);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} must be a whole number of seconds >= 1, got '{value}'")]
    InvalidTick { var: &'static str, value: String },

    #[error("could not resolve a data directory; set {0}")]
    NoDataDir(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerConfig {
    /// JSON file holding the product list.
    pub data_path: PathBuf,
    /// Countdown recompute interval.
    pub tick_interval: Duration,
}

impl TrackerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (tests pass a closure over a map).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let data_path = match lookup(DATA_PATH_VAR).filter(|v| !v.trim().is_empty()) {
            Some(path) => PathBuf::from(path),
            None => default_data_path().ok_or(ConfigError::NoDataDir(DATA_PATH_VAR))?,
        };

        let tick_interval = match lookup(TICK_SECS_VAR) {
            None => DEFAULT_TICK_INTERVAL,
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs >= 1 => Duration::from_secs(secs),
                _ => {
                    return Err(ConfigError::InvalidTick {
                        var: TICK_SECS_VAR,
                        value: raw,
                    });
                }
            },
        };

        Ok(Self {
            data_path,
            tick_interval,
        })
    }
}

/// `{app_data_dir}/shelflife/products.json`.
pub fn default_data_path() -> Option<PathBuf> {
    let base = dirs::data_dir().or_else(|| {
        dirs::home_dir().map(|mut h| {
            h.push(".local");
            h.push("share");
            h
        })
    })?;

    let mut path = base;
    path.push("shelflife");
    path.push("products.json");
    Some(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn explicit_values_win() {
        let config = TrackerConfig::from_lookup(lookup(&[
            (DATA_PATH_VAR, "/tmp/shelf/products.json"),
            (TICK_SECS_VAR, "3"),
        ]))
        .unwrap();

        assert_eq!(config.data_path, PathBuf::from("/tmp/shelf/products.json"));
        assert_eq!(config.tick_interval, Duration::from_secs(3));
    }

    #[test]
    fn tick_defaults_to_ten_seconds() {
        let config =
            TrackerConfig::from_lookup(lookup(&[(DATA_PATH_VAR, "products.json")])).unwrap();
        assert_eq!(config.tick_interval, DEFAULT_TICK_INTERVAL);
    }

    #[test]
    fn rejects_zero_and_garbage_ticks() {
        for bad in ["0", "-1", "soon", ""] {
            let err = TrackerConfig::from_lookup(lookup(&[
                (DATA_PATH_VAR, "products.json"),
                (TICK_SECS_VAR, bad),
            ]))
            .unwrap_err();
            assert_eq!(
                err,
                ConfigError::InvalidTick {
                    var: TICK_SECS_VAR,
                    value: bad.to_string()
                }
            );
        }
    }

    #[test]
    fn default_path_ends_in_products_json() {
        if let Some(path) = default_data_path() {
            assert!(path.ends_with("shelflife/products.json"));
        }
    }
}
