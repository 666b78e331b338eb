// Copyright 2024-2026 devstack Contributors
// SPDX-License-Identifier: Apache-2.0

//! Crate-wide error type and exit code mapping.

use std::path::PathBuf;

use thiserror::Error;

use crate::config::{ConfigError, ValidationError};
use crate::runner::{CommandOutput, Invocation};

/// Exit code for a failed external step.
pub const EXIT_STEP_FAILED: u8 = 1;
/// Exit code for configuration and usage errors.
pub const EXIT_CONFIG: u8 = 2;
/// Exit code for a readiness wait that ran out of attempts.
pub const EXIT_READINESS_TIMEOUT: u8 = 3;
/// Exit code after Ctrl-C.
pub const EXIT_INTERRUPTED: u8 = 130;

#[derive(Error, Debug)]
pub enum DevstackError {
    #[error("`{command}` failed ({status}): {stderr}")]
    ToolFailed {
        command: String,
        status: String,
        stderr: String,
    },

    #[error("Failed to spawn `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{target} not ready after {attempts} attempts")]
    ReadinessTimeout { target: String, attempts: u32 },

    #[error("Interrupted")]
    Interrupted,

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid configuration: {0}")]
    Validation(#[from] ValidationError),

    #[error("Values files {} and {} both map to namespace '{namespace}'", first.display(), second.display())]
    DuplicateService {
        namespace: String,
        first: PathBuf,
        second: PathBuf,
    },

    #[error("Checksum mismatch for {asset}: expected {expected}, got {actual}")]
    Checksum {
        asset: String,
        expected: String,
        actual: String,
    },

    #[error("Failed to read {}: {source}", path.display())]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl DevstackError {
    /// Build a `ToolFailed` from a finished invocation.
    pub fn tool_failed(invocation: &Invocation, output: &CommandOutput) -> Self {
        let status = match output.status {
            Some(code) => format!("exit code {}", code),
            None => "terminated by signal".to_string(),
        };
        let stderr = output.stderr.trim();
        Self::ToolFailed {
            command: invocation.command_line(),
            status,
            stderr: if stderr.is_empty() {
                "no error output".to_string()
            } else {
                stderr.to_string()
            },
        }
    }

    pub fn read_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ReadFile {
            path: path.into(),
            source,
        }
    }

    /// Process exit code for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Config(_) | Self::Validation(_) | Self::DuplicateService { .. } => EXIT_CONFIG,
            Self::ReadinessTimeout { .. } => EXIT_READINESS_TIMEOUT,
            Self::Interrupted => EXIT_INTERRUPTED,
            Self::ToolFailed { .. }
            | Self::Spawn { .. }
            | Self::Checksum { .. }
            | Self::ReadFile { .. }
            | Self::Io(_) => EXIT_STEP_FAILED,
        }
    }
}

pub type Result<T> = std::result::Result<T, DevstackError>;
