// Copyright 2024-2026 devstack Contributors
// SPDX-License-Identifier: Apache-2.0

use super::*;

#[test]
fn test_detect_macos() {
    assert_eq!(Platform::from_parts("macos", None, false), Platform::MacOs);
}

#[test]
fn test_detect_wsl_from_kernel_release() {
    let release = "5.15.153.1-microsoft-standard-WSL2";
    assert_eq!(Platform::from_parts("linux", Some(release), false), Platform::Wsl);
    assert_eq!(
        Platform::from_parts("linux", Some("4.4.0-19041-Microsoft"), false),
        Platform::Wsl
    );
}

#[test]
fn test_detect_wsl_from_env() {
    assert_eq!(Platform::from_parts("linux", None, true), Platform::Wsl);
}

#[test]
fn test_plain_linux() {
    assert_eq!(
        Platform::from_parts("linux", Some("6.8.0-45-generic"), false),
        Platform::Linux
    );
}

#[test]
fn test_unknown_os_falls_back_to_linux() {
    assert_eq!(Platform::from_parts("freebsd", None, false), Platform::Linux);
    assert_eq!(Platform::from_parts("", None, true), Platform::Linux);
}

#[test]
fn test_arch_mapping() {
    assert_eq!(Arch::from_target("x86_64"), Arch::Amd64);
    assert_eq!(Arch::from_target("aarch64"), Arch::Arm64);
    assert_eq!(Arch::from_target("riscv64"), Arch::Amd64);
    assert_eq!(Arch::Arm64.as_str(), "arm64");
}

#[test]
fn test_display_and_asset_os() {
    assert_eq!(Platform::Wsl.to_string(), "wsl");
    assert_eq!(Platform::MacOs.asset_os(), "darwin");
    assert_eq!(Platform::Wsl.asset_os(), "linux");
}
