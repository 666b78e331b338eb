// Copyright 2024-2026 devstack Contributors
// SPDX-License-Identifier: Apache-2.0

//! SHA-256 verification of downloaded release binaries.

use std::path::Path;

use sha2::{Digest, Sha256};

use crate::error::{DevstackError, Result};

/// Find the digest for `asset` in `sha256sum`-style output.
///
/// Accepts `<hex>  <name>` lines (binary-mode `*name` too) and a bare
/// digest when the file holds a single entry.
pub fn parse_sha256sum(contents: &str, asset: &str) -> Option<String> {
    let lines: Vec<&str> = contents
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    for line in &lines {
        let mut parts = line.split_whitespace();
        let (Some(digest), name) = (parts.next(), parts.next()) else {
            continue;
        };
        let matches_asset = match name {
            Some(n) => n.trim_start_matches('*') == asset,
            None => lines.len() == 1,
        };
        if matches_asset && is_sha256_hex(digest) {
            return Some(digest.to_ascii_lowercase());
        }
    }
    None
}

fn is_sha256_hex(s: &str) -> bool {
    s.len() == 64 && s.chars().all(|c| c.is_ascii_hexdigit())
}

/// Hex SHA-256 of a file's contents.
pub fn file_sha256(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path).map_err(|e| DevstackError::read_file(path, e))?;
    Ok(hex::encode(Sha256::digest(&bytes)))
}

/// Check `path` against the published digest for `asset`.
pub fn verify_sha256(path: &Path, sums: &str, asset: &str) -> Result<()> {
    let expected = parse_sha256sum(sums, asset).ok_or_else(|| DevstackError::Checksum {
        asset: asset.to_string(),
        expected: "<missing from checksum file>".to_string(),
        actual: String::new(),
    })?;
    let actual = file_sha256(path)?;
    if actual != expected {
        return Err(DevstackError::Checksum {
            asset: asset.to_string(),
            expected,
            actual,
        });
    }
    tracing::debug!(asset, digest = %actual, "checksum verified");
    Ok(())
}

#[cfg(test)]
#[path = "checksum_tests.rs"]
mod tests;
