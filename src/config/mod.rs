// Copyright 2024-2026 devstack Contributors
// SPDX-License-Identifier: Apache-2.0

//! Configuration loading.
//!
//! Load order: built-in defaults, then `devstack.toml` (or an explicit
//! `--config` file), then `DEVSTACK_*` environment overrides.

pub mod types;
pub mod validation;

use std::path::{Path, PathBuf};

use thiserror::Error;

pub use types::{DevstackConfig, ReadinessConfig};
pub use validation::ValidationError;

/// Config file picked up from the working directory when present.
pub const DEFAULT_CONFIG_FILE: &str = "devstack.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid value for {var}: '{value}'")]
    Env { var: String, value: String },
}

/// Load configuration from file and process environment.
///
/// An explicit `path` must exist; the implicit `devstack.toml` is optional.
pub fn load(path: Option<&Path>) -> Result<DevstackConfig, ConfigError> {
    let mut config = match path {
        Some(p) => {
            if !p.exists() {
                return Err(ConfigError::NotFound(p.to_path_buf()));
            }
            from_file(p)?
        }
        None => {
            let implicit = Path::new(DEFAULT_CONFIG_FILE);
            if implicit.exists() {
                from_file(implicit)?
            } else {
                DevstackConfig::default()
            }
        }
    };
    apply_env(&mut config, |var| std::env::var(var).ok())?;
    Ok(config)
}

/// Parse a config file. Missing keys take their defaults.
pub fn from_file(path: &Path) -> Result<DevstackConfig, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Apply `DEVSTACK_*` overrides using `lookup` to read variables.
pub fn apply_env<F>(config: &mut DevstackConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(v) = lookup("DEVSTACK_CLUSTER_NAME") {
        config.cluster_name = v;
    }
    if let Some(v) = lookup("DEVSTACK_NETWORK_NAME") {
        config.network_name = v;
    }
    if let Some(v) = lookup("DEVSTACK_INSTALL_DIR") {
        config.install_dir = PathBuf::from(v);
    }
    if let Some(v) = lookup("DEVSTACK_VALUES_DIR") {
        config.values_dir = PathBuf::from(v);
    }
    if let Some(v) = lookup("DEVSTACK_CHART_DIR") {
        config.chart_dir = PathBuf::from(v);
    }
    if let Some(v) = lookup("DEVSTACK_READINESS_TIMEOUT") {
        config.readiness.timeout_attempts = v.parse().map_err(|_| ConfigError::Env {
            var: "DEVSTACK_READINESS_TIMEOUT".to_string(),
            value: v.clone(),
        })?;
    }
    Ok(())
}

/// Render a config as TOML for `config show`.
pub fn to_toml(config: &DevstackConfig) -> String {
    toml::to_string_pretty(config).unwrap_or_else(|e| format!("# failed to render: {}\n", e))
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
