// Copyright 2024-2026 devstack Contributors
// SPDX-License-Identifier: Apache-2.0

//! CLI argument parsing and help text for devstack.

use std::path::PathBuf;

/// Global options plus the command and its own arguments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliArgs {
    pub config: Option<PathBuf>,
    pub dry_run: bool,
    pub verbose: bool,
    pub command: String,
    pub rest: Vec<String>,
}

impl CliArgs {
    pub fn json(&self) -> bool {
        self.rest.iter().any(|a| a == "--json")
    }

    /// First positional argument after the command.
    pub fn subcommand(&self) -> Option<&str> {
        self.rest.iter().map(|s| s.as_str()).find(|a| !a.starts_with('-'))
    }
}

/// Parse `args` (without the program name). Global options may appear
/// anywhere; the first other word is the command. Defaults to `help`.
pub fn parse_args<I>(args: I) -> Result<CliArgs, String>
where
    I: IntoIterator<Item = String>,
{
    let mut parsed = CliArgs::default();
    let mut command = None;
    let mut iter = args.into_iter();

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => match iter.next() {
                Some(path) => parsed.config = Some(PathBuf::from(path)),
                None => return Err("Missing value for --config".to_string()),
            },
            "--dry-run" => parsed.dry_run = true,
            "-v" | "--verbose" => parsed.verbose = true,
            "-h" | "--help" if command.is_none() => command = Some("help".to_string()),
            "-V" | "--version" if command.is_none() => command = Some("version".to_string()),
            _ => {
                if let Some(path) = arg.strip_prefix("--config=") {
                    parsed.config = Some(PathBuf::from(path));
                } else if command.is_none() {
                    command = Some(arg);
                } else {
                    parsed.rest.push(arg);
                }
            }
        }
    }

    parsed.command = command.unwrap_or_else(|| "help".to_string());
    Ok(parsed)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Help,
    Version,
    CheckKind,
    InstallKind,
    CheckHelm,
    InstallHelm,
    CreateNetwork,
    CreateCluster,
    Database,
    ResetDatabase,
    WaitForPostgres,
    Microservices,
    Start,
    Clean,
    Status,
    Config,
}

impl Command {
    pub fn from_name(name: &str) -> Option<Self> {
        let command = match name {
            "help" => Self::Help,
            "version" => Self::Version,
            "check-kind" => Self::CheckKind,
            "install-kind" => Self::InstallKind,
            "check-helm" => Self::CheckHelm,
            "install-helm" => Self::InstallHelm,
            "create-network" => Self::CreateNetwork,
            "create-cluster" => Self::CreateCluster,
            "database" => Self::Database,
            "reset-database" => Self::ResetDatabase,
            "wait-for-postgres" => Self::WaitForPostgres,
            "microservices" => Self::Microservices,
            "start" => Self::Start,
            "clean" => Self::Clean,
            "status" => Self::Status,
            "config" => Self::Config,
            _ => return None,
        };
        Some(command)
    }
}

/// Hint for command names that appear in older docs but were never real.
pub fn stale_command_hint(command: &str) -> Option<&'static str> {
    match command {
        "cleanup" => Some("clean"),
        "deploy-microservices" => Some("microservices"),
        _ => None,
    }
}

/// Print general usage information.
pub fn print_usage() {
    let version = env!("CARGO_PKG_VERSION");
    eprintln!(
        "devstack - local Kubernetes development environment v{}

USAGE:
    devstack [OPTIONS] [COMMAND] [ARGS]

COMMANDS:
    start            Create cluster, deploy database and microservices
    clean            Remove everything start created
    check-kind       Install kind if it is not on PATH
    install-kind     Install kind unconditionally
    check-helm       Install helm if it is not on PATH
    install-helm     Install helm unconditionally
    create-network   Create the docker network if missing
    create-cluster   Create the kind cluster if missing
    database         Deploy the database and wait for it
    reset-database   Delete and redeploy the database, then wait
    wait-for-postgres  Wait until the database accepts connections
    microservices    Deploy one helm release per values file
    status           Show what currently exists
    config           Show or validate configuration
    version          Show version information
    help             Show this help message (default)

OPTIONS:
    --config FILE    Load configuration from FILE (default: ./devstack.toml)
    --dry-run        Print mutating commands instead of running them
    -v, --verbose    Enable debug logging
    -h, --help       Show help
    -V, --version    Show version information

EXAMPLES:
    devstack start                    # Bring the environment up
    devstack --dry-run start          # Show what start would do
    devstack status --json            # Machine-readable status
    devstack help microservices       # Help for one command
    devstack clean                    # Tear everything down

ENVIRONMENT:
    DEVSTACK_CLUSTER_NAME       Cluster name
    DEVSTACK_NETWORK_NAME       Docker network name
    DEVSTACK_INSTALL_DIR        Tool install directory
    DEVSTACK_VALUES_DIR         Directory of per-service values files
    DEVSTACK_CHART_DIR          Shared helm chart
    DEVSTACK_READINESS_TIMEOUT  Readiness attempts before giving up
    DEVSTACK_LOG_FORMAT         Set to 'json' for JSON log lines
    RUST_LOG                    Log filter (debug, info, warn, error)

EXIT CODES:
    0    Success
    1    A step failed
    2    Configuration or usage error
    3    Readiness timeout
    130  Interrupted
",
        version
    );
}

/// Print detailed help for a specific command.
pub fn print_command_help(command: &str) {
    let text = match command {
        "start" => START_HELP,
        "clean" => CLEAN_HELP,
        "check-kind" | "check-helm" => CHECK_TOOL_HELP,
        "install-kind" | "install-helm" => INSTALL_TOOL_HELP,
        "create-network" => CREATE_NETWORK_HELP,
        "create-cluster" => CREATE_CLUSTER_HELP,
        "database" | "reset-database" | "wait-for-postgres" => DATABASE_HELP,
        "microservices" => MICROSERVICES_HELP,
        "status" => STATUS_HELP,
        "config" => CONFIG_HELP,
        _ => {
            match stale_command_hint(command) {
                Some(real) => eprintln!("'{}' is not a command; did you mean '{}'?", command, real),
                None => eprintln!(
                    "No detailed help available for '{}'. Use 'devstack help' for general usage.",
                    command
                ),
            }
            return;
        }
    };
    eprintln!("{}", text);
}

const START_HELP: &str = "devstack start - Bring the environment up

USAGE:
    devstack [--dry-run] start

DESCRIPTION:
    Runs create-cluster, database and microservices in order and stops at
    the first failure. Every step checks before it creates, so start can be
    rerun after an interrupted or partial run.

EXIT CODES:
    0  Environment is up
    1  A step failed
    3  The database did not become ready
";

const CLEAN_HELP: &str = "devstack clean - Tear the environment down

USAGE:
    devstack [--dry-run] clean

DESCRIPTION:
    Removes database resources, the cluster, the docker network and the
    installed kind binary. Missing resources are skipped and failed steps
    are reported; clean always exits 0.
";

const CHECK_TOOL_HELP: &str = "devstack check-kind | check-helm - Ensure a tool is installed

USAGE:
    devstack check-kind
    devstack check-helm

DESCRIPTION:
    Does nothing when the tool is on PATH, otherwise installs it the same
    way as install-kind / install-helm.
";

const INSTALL_TOOL_HELP: &str = "devstack install-kind | install-helm - Install a tool

USAGE:
    devstack install-kind
    devstack install-helm

DESCRIPTION:
    kind: downloads the release binary for this platform, verifies its
    sha256 and installs it into install_dir (with sudo when not root).
    helm: brew on macOS, the get-helm-3 script on Linux, the release
    tarball under WSL.
";

const CREATE_NETWORK_HELP: &str = "devstack create-network - Create the docker network

USAGE:
    devstack create-network
";

const CREATE_CLUSTER_HELP: &str = "devstack create-cluster - Create the kind cluster

USAGE:
    devstack create-cluster

DESCRIPTION:
    Ensures kind and the docker network exist, renders cluster_template
    with the cluster name, creates the cluster and attaches its control
    plane to the network.
";

const DATABASE_HELP: &str = "devstack database | reset-database | wait-for-postgres

USAGE:
    devstack database            Apply the database manifest, then wait
    devstack reset-database      Delete and re-apply the manifest, then wait
    devstack wait-for-postgres   Only wait

DESCRIPTION:
    Waiting runs pg_isready in a throwaway pod once per interval until it
    succeeds or readiness.timeout_attempts is exceeded.

EXIT CODES:
    0    Database is ready
    1    kubectl failed
    3    Readiness timeout
    130  Interrupted while waiting
";

const MICROSERVICES_HELP: &str = "devstack microservices - Deploy the services

USAGE:
    devstack microservices

DESCRIPTION:
    For every *.yaml / *.yml file in values_dir, in name order, creates a
    namespace named after the file and runs helm upgrade --install of
    chart_dir into it with that file as values.
";

const STATUS_HELP: &str = "devstack status - Show environment status

USAGE:
    devstack status [--json]

OPTIONS:
    --json  Output in JSON format
";

const CONFIG_HELP: &str = "devstack config - Manage configuration

USAGE:
    devstack config <SUBCOMMAND>

SUBCOMMANDS:
    show      Show effective configuration (default)
    defaults  Show default configuration
    validate  Validate configuration

EXIT CODES:
    0  Configuration is valid
    2  Configuration error
";

#[cfg(test)]
#[path = "cli_parser_tests.rs"]
mod tests;
