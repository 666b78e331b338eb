// Copyright 2024-2026 devstack Contributors
// SPDX-License-Identifier: Apache-2.0

//! `config show|defaults|validate`.

use crate::config::{to_toml, DevstackConfig};
use crate::error::EXIT_CONFIG;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigAction {
    /// Effective configuration after file and environment overrides.
    Show,
    Defaults,
    Validate,
}

impl ConfigAction {
    pub fn parse(arg: Option<&str>) -> Option<Self> {
        match arg.unwrap_or("show") {
            "show" => Some(Self::Show),
            "defaults" => Some(Self::Defaults),
            "validate" => Some(Self::Validate),
            _ => None,
        }
    }
}

/// Run a config subcommand and return the process exit code.
pub fn run_config(action: ConfigAction, config: &DevstackConfig) -> i32 {
    match action {
        ConfigAction::Show => {
            print!("{}", to_toml(config));
            0
        }
        ConfigAction::Defaults => {
            print!("{}", to_toml(&DevstackConfig::default()));
            0
        }
        ConfigAction::Validate => match config.validate() {
            Ok(()) => {
                println!("configuration is valid");
                0
            }
            Err(e) => {
                eprintln!("Error: invalid configuration: {}", e);
                i32::from(EXIT_CONFIG)
            }
        },
    }
}
