// Copyright 2024-2026 devstack Contributors
// SPDX-License-Identifier: Apache-2.0

//! Validation functions for configuration fields.
//!
//! Resource names end up as docker/kind/Kubernetes object names and several
//! values are interpolated into `sh -c` installer pipelines, so both are
//! checked before any command runs.

use std::path::Path;

/// Maximum length of a DNS-1123 label.
pub const MAX_NAME_LENGTH: usize = 63;

/// Maximum allowed length for path fields.
const MAX_PATH_LENGTH: usize = 1024;

/// Characters that must never reach a shell pipeline.
const SHELL_METACHARACTERS: [char; 16] = [
    ';', '&', '|', '`', '$', '(', ')', '{', '}', '<', '>', '\n', '\r', '\0', '\'', '"',
];

/// Validation error types.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Path contains traversal sequences.
    PathTraversal(String),
    /// Path is malformed or not absolute where required.
    InvalidPath(String),
    /// Name is not a valid DNS-1123 label.
    InvalidName { field: String, reason: String },
    /// Value contains shell metacharacters.
    UnsafeValue { field: String, ch: char },
    /// Version string is malformed.
    InvalidVersion(String),
    /// Numeric field is out of range.
    OutOfRange { field: String, reason: String },
    /// Field exceeds maximum length.
    MaxLengthExceeded { field: String, max: usize },
    /// Field is empty but required.
    EmptyField(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PathTraversal(p) => write!(f, "Path traversal detected: {}", p),
            Self::InvalidPath(p) => write!(f, "Invalid path: {}", p),
            Self::InvalidName { field, reason } => {
                write!(f, "Invalid name for '{}': {}", field, reason)
            }
            Self::UnsafeValue { field, ch } => {
                write!(f, "Field '{}' contains forbidden character {:?}", field, ch)
            }
            Self::InvalidVersion(v) => write!(f, "Invalid version: {}", v),
            Self::OutOfRange { field, reason } => write!(f, "Field '{}' {}", field, reason),
            Self::MaxLengthExceeded { field, max } => {
                write!(f, "Field '{}' exceeds maximum length of {}", field, max)
            }
            Self::EmptyField(field) => write!(f, "Field '{}' cannot be empty", field),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Validate a resource name as a DNS-1123 label.
///
/// Lowercase alphanumerics and dashes, starting and ending alphanumeric.
pub fn validate_resource_name(name: &str, field_name: &str) -> Result<(), ValidationError> {
    if name.is_empty() {
        return Err(ValidationError::EmptyField(field_name.to_string()));
    }

    if name.len() > MAX_NAME_LENGTH {
        return Err(ValidationError::MaxLengthExceeded {
            field: field_name.to_string(),
            max: MAX_NAME_LENGTH,
        });
    }

    let valid_chars = |c: char| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-';
    if !name.chars().all(valid_chars) {
        return Err(ValidationError::InvalidName {
            field: field_name.to_string(),
            reason: format!(
                "'{}' must contain only lowercase alphanumeric characters and dashes",
                name
            ),
        });
    }

    if name.starts_with('-') || name.ends_with('-') {
        return Err(ValidationError::InvalidName {
            field: field_name.to_string(),
            reason: format!("'{}' cannot start or end with a dash", name),
        });
    }

    Ok(())
}

/// Validate a path for security issues.
///
/// Checks for path traversal, null bytes, and length limits.
pub fn validate_path(path: &Path, field_name: &str) -> Result<(), ValidationError> {
    let raw = path.to_string_lossy();
    if raw.is_empty() {
        return Err(ValidationError::EmptyField(field_name.to_string()));
    }

    if raw.len() > MAX_PATH_LENGTH {
        return Err(ValidationError::MaxLengthExceeded {
            field: field_name.to_string(),
            max: MAX_PATH_LENGTH,
        });
    }

    if raw.contains('\0') {
        return Err(ValidationError::InvalidPath(format!(
            "{}: contains null byte",
            field_name
        )));
    }

    for component in path.components() {
        if let std::path::Component::ParentDir = component {
            return Err(ValidationError::PathTraversal(format!(
                "{}: contains '..' sequence",
                field_name
            )));
        }
    }

    Ok(())
}

/// Validate the tool install directory.
///
/// Must be absolute and safe to embed in an installer pipeline.
pub fn validate_install_dir(path: &Path) -> Result<(), ValidationError> {
    validate_path(path, "install_dir")?;

    if !path.is_absolute() {
        return Err(ValidationError::InvalidPath(
            "install_dir: must be an absolute path".to_string(),
        ));
    }

    validate_shell_safe(&path.to_string_lossy(), "install_dir")
}

/// Reject shell metacharacters and whitespace.
pub fn validate_shell_safe(value: &str, field_name: &str) -> Result<(), ValidationError> {
    for ch in SHELL_METACHARACTERS {
        if value.contains(ch) {
            return Err(ValidationError::UnsafeValue {
                field: field_name.to_string(),
                ch,
            });
        }
    }
    if let Some(ch) = value.chars().find(|c| c.is_whitespace()) {
        return Err(ValidationError::UnsafeValue {
            field: field_name.to_string(),
            ch,
        });
    }
    Ok(())
}

/// Validate a release version tag such as `v0.24.0`.
pub fn validate_version(version: &str, field_name: &str) -> Result<(), ValidationError> {
    if version.is_empty() {
        return Err(ValidationError::EmptyField(field_name.to_string()));
    }

    let Some(numbers) = version.strip_prefix('v') else {
        return Err(ValidationError::InvalidVersion(format!(
            "{}: '{}' must start with 'v'",
            field_name, version
        )));
    };

    let parts: Vec<&str> = numbers.split('.').collect();
    let numeric = |p: &&str| !p.is_empty() && p.chars().all(|c| c.is_ascii_digit());
    if parts.len() != 3 || !parts.iter().all(numeric) {
        return Err(ValidationError::InvalidVersion(format!(
            "{}: '{}' is not of the form vMAJOR.MINOR.PATCH",
            field_name, version
        )));
    }

    Ok(())
}

#[cfg(test)]
#[path = "validation_tests.rs"]
mod tests;
