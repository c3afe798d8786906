//! Process configuration, read from the environment.

use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;

pub const DATA_FILE_VAR: &str = "STOCKROOM_DATA_FILE";
pub const BIND_ADDR_VAR: &str = "STOCKROOM_BIND_ADDR";

const DEFAULT_DATA_FILE: &str = "data/inventory.json";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} is not a valid socket address: {value}")]
    InvalidBindAddr { var: &'static str, value: String },

    #[error("{var} must not be empty")]
    Empty { var: &'static str },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// JSON document holding items and movements.
    pub data_file: PathBuf,
    pub bind_addr: SocketAddr,
}

impl ApiConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup (unset variables use defaults).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let data_file = lookup(DATA_FILE_VAR).unwrap_or_else(|| DEFAULT_DATA_FILE.to_string());
        if data_file.trim().is_empty() {
            return Err(ConfigError::Empty { var: DATA_FILE_VAR });
        }

        let bind_addr = lookup(BIND_ADDR_VAR).unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr: SocketAddr = bind_addr
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidBindAddr {
                var: BIND_ADDR_VAR,
                value: bind_addr.clone(),
            })?;

        Ok(Self {
            data_file: PathBuf::from(data_file),
            bind_addr,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> =
            vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_unset() {
        let cfg = ApiConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(cfg.data_file, PathBuf::from("data/inventory.json"));
        assert_eq!(cfg.bind_addr, "0.0.0.0:8080".parse().unwrap());
    }

    #[test]
    fn overrides_are_read() {
        let cfg = ApiConfig::from_lookup(lookup(&[
            (DATA_FILE_VAR, "/var/lib/stockroom/inv.json"),
            (BIND_ADDR_VAR, "127.0.0.1:9000"),
        ]))
        .unwrap();
        assert_eq!(cfg.data_file, PathBuf::from("/var/lib/stockroom/inv.json"));
        assert_eq!(cfg.bind_addr.port(), 9000);
    }

    #[test]
    fn bad_values_are_rejected() {
        assert_eq!(
            ApiConfig::from_lookup(lookup(&[(BIND_ADDR_VAR, "nowhere")])).unwrap_err(),
            ConfigError::InvalidBindAddr {
                var: BIND_ADDR_VAR,
                value: "nowhere".to_string()
            }
        );
        assert_eq!(
            ApiConfig::from_lookup(lookup(&[(DATA_FILE_VAR, " ")])).unwrap_err(),
            ConfigError::Empty { var: DATA_FILE_VAR }
        );
    }
}
