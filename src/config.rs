//! Process configuration read from the environment.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;

use crate::research::{load_coefficients, CoefficientsError, ResearchCoefficients};

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
pub const BIND_ENV: &str = "EV_POLICY_BIND";
pub const COEFFICIENTS_ENV: &str = "EV_POLICY_COEFFICIENTS";
pub const WORKERS_ENV: &str = "EV_POLICY_WORKERS";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name}='{value}' is not a socket address")]
    InvalidBind { name: &'static str, value: String },
    #[error("{name}='{value}' is not a worker count")]
    InvalidWorkers { name: &'static str, value: String },
    #[error(transparent)]
    Coefficients(#[from] CoefficientsError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub bind: SocketAddr,
    /// YAML or JSON override for the research coefficient table.
    pub coefficients_path: Option<PathBuf>,
    /// Sweep worker threads; 0 uses every core.
    pub workers: usize,
}

impl EngineConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build from an arbitrary variable source. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let bind_raw = get(BIND_ENV).unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind = bind_raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidBind {
                name: BIND_ENV,
                value: bind_raw.clone(),
            })?;

        let workers = match get(WORKERS_ENV) {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidWorkers {
                    name: WORKERS_ENV,
                    value: raw.clone(),
                })?,
            None => 0,
        };

        Ok(Self {
            bind,
            coefficients_path: get(COEFFICIENTS_ENV).map(PathBuf::from),
            workers,
        })
    }

    /// Override table when one is configured, otherwise the built-in figures.
    pub fn research_coefficients(&self) -> Result<ResearchCoefficients, ConfigError> {
        match &self.coefficients_path {
            Some(path) => Ok(load_coefficients(path)?),
            None => Ok(ResearchCoefficients::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> Result<EngineConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        EngineConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let cfg = config(&[]).unwrap();
        assert_eq!(cfg.bind.to_string(), DEFAULT_BIND_ADDR);
        assert_eq!(cfg.coefficients_path, None);
        assert_eq!(cfg.workers, 0);
        assert_eq!(cfg.research_coefficients().unwrap(), ResearchCoefficients::default());
    }

    #[test]
    fn values_are_read_and_trimmed() {
        let cfg = config(&[
            (BIND_ENV, " 0.0.0.0:8080 "),
            (WORKERS_ENV, "4"),
            (COEFFICIENTS_ENV, "research.yaml"),
        ])
        .unwrap();
        assert_eq!(cfg.bind.port(), 8080);
        assert_eq!(cfg.workers, 4);
        assert_eq!(cfg.coefficients_path, Some(PathBuf::from("research.yaml")));
    }

    #[test]
    fn blank_values_count_as_unset() {
        let cfg = config(&[(BIND_ENV, ""), (WORKERS_ENV, "  ")]).unwrap();
        assert_eq!(cfg.bind.to_string(), DEFAULT_BIND_ADDR);
        assert_eq!(cfg.workers, 0);
    }

    #[test]
    fn malformed_values_are_errors() {
        assert!(matches!(
            config(&[(BIND_ENV, "localhost")]),
            Err(ConfigError::InvalidBind { .. })
        ));
        assert!(matches!(
            config(&[(WORKERS_ENV, "-2")]),
            Err(ConfigError::InvalidWorkers { .. })
        ));
    }

    #[test]
    fn missing_override_file_is_reported() {
        let cfg = config(&[(COEFFICIENTS_ENV, "/nonexistent/ev-policy/research.yaml")]).unwrap();
        assert!(matches!(
            cfg.research_coefficients(),
            Err(ConfigError::Coefficients(CoefficientsError::Io { .. }))
        ));
    }
}
