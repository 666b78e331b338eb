// Copyright 2024-2026 devstack Contributors
// SPDX-License-Identifier: Apache-2.0

//! Logging, configuration and signal setup for the devstack binary.

use devstack::config::{self as devstack_config, DevstackConfig};
use devstack::error::{DevstackError, EXIT_INTERRUPTED};
use devstack::runner::{CommandRunner, DryRunRunner, ProcessRunner};
use devstack::Devstack;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use crate::cli_parser::CliArgs;

/// Initialise the global subscriber. Logs go to stderr so command output
/// on stdout stays parseable.
pub fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    let json = std::env::var("DEVSTACK_LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Load configuration from file and environment without validating it.
pub fn load_config(args: &CliArgs) -> Result<DevstackConfig, DevstackError> {
    Ok(devstack_config::load(args.config.as_deref())?)
}

/// Load and validate configuration, then bind it to this host.
pub fn build_stack(args: &CliArgs) -> Result<Devstack, DevstackError> {
    let config = load_config(args)?;
    config.validate()?;

    let runner: Box<dyn CommandRunner> = if args.dry_run {
        Box::new(DryRunRunner::new(ProcessRunner::new()))
    } else {
        Box::new(ProcessRunner::new())
    };
    Ok(Devstack::for_host(config, runner))
}

/// First Ctrl-C cancels `token`; a second one exits immediately.
pub fn install_interrupt_handler(token: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_err() {
            return;
        }
        tracing::warn!("interrupt received, stopping");
        token.cancel();

        if tokio::signal::ctrl_c().await.is_ok() {
            std::process::exit(i32::from(EXIT_INTERRUPTED));
        }
    });
}
