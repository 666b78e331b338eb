// Copyright 2024-2026 devstack Contributors
// SPDX-License-Identifier: Apache-2.0

use super::*;

fn parse(args: &[&str]) -> CliArgs {
    parse_args(args.iter().map(|s| s.to_string())).unwrap()
}

#[test]
fn test_default_command_is_help() {
    assert_eq!(parse(&[]).command, "help");
}

#[test]
fn test_global_options_anywhere() {
    let args = parse(&["--dry-run", "start", "-v", "--config", "dev.toml"]);
    assert_eq!(args.command, "start");
    assert!(args.dry_run);
    assert!(args.verbose);
    assert_eq!(args.config, Some(PathBuf::from("dev.toml")));
    assert!(args.rest.is_empty());
}

#[test]
fn test_config_equals_form() {
    let args = parse(&["--config=/etc/devstack.toml", "status"]);
    assert_eq!(args.config, Some(PathBuf::from("/etc/devstack.toml")));
}

#[test]
fn test_missing_config_value() {
    assert!(parse_args(vec!["start".to_string(), "--config".to_string()]).is_err());
}

#[test]
fn test_command_arguments() {
    let args = parse(&["status", "--json"]);
    assert!(args.json());

    let args = parse(&["config", "validate"]);
    assert_eq!(args.subcommand(), Some("validate"));

    let args = parse(&["help", "microservices"]);
    assert_eq!(args.command, "help");
    assert_eq!(args.subcommand(), Some("microservices"));
}

#[test]
fn test_help_and_version_flags() {
    assert_eq!(parse(&["--help"]).command, "help");
    assert_eq!(parse(&["-V"]).command, "version");
}

#[test]
fn test_stale_command_hint() {
    assert_eq!(stale_command_hint("cleanup"), Some("clean"));
    assert_eq!(stale_command_hint("deploy-microservices"), Some("microservices"));
    assert_eq!(stale_command_hint("clean"), None);
}

#[test]
fn test_command_names() {
    assert_eq!(Command::from_name("start"), Some(Command::Start));
    assert_eq!(Command::from_name("wait-for-postgres"), Some(Command::WaitForPostgres));
    assert_eq!(Command::from_name("cleanup"), None);
    assert_eq!(Command::from_name("deploy-microservices"), None);
}
