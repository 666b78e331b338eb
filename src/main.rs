// Copyright 2024-2026 devstack Contributors
// SPDX-License-Identifier: Apache-2.0

//! devstack entry point.
//!
//! Parses the command line, sets up logging and configuration, and runs one
//! command inside a `run` span tagged with a fresh run id.

mod cli_parser;
mod env_init;

use std::process::ExitCode;

use devstack::cli::{run_config, run_status, ConfigAction};
use devstack::deploy::ServiceDeployment;
use devstack::error::{EXIT_CONFIG, EXIT_INTERRUPTED};
use devstack::platform::Tool;
use devstack::provision::ToolState;
use devstack::Devstack;
use tracing::Instrument;
use uuid::Uuid;

use cli_parser::{CliArgs, Command};

#[tokio::main]
async fn main() -> ExitCode {
    let args = match cli_parser::parse_args(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(msg) => {
            eprintln!("{}", msg);
            cli_parser::print_usage();
            return ExitCode::from(EXIT_CONFIG);
        }
    };

    let Some(command) = Command::from_name(&args.command) else {
        match cli_parser::stale_command_hint(&args.command) {
            Some(real) => eprintln!(
                "Unknown command: {}. Did you mean '{}'?",
                args.command, real
            ),
            None => {
                eprintln!("Unknown command: {}", args.command);
                cli_parser::print_usage();
            }
        }
        return ExitCode::from(EXIT_CONFIG);
    };

    match command {
        Command::Help => {
            match args.subcommand() {
                Some(sub) => cli_parser::print_command_help(sub),
                None => cli_parser::print_usage(),
            }
            return ExitCode::SUCCESS;
        }
        Command::Version => {
            println!("devstack {}", env!("CARGO_PKG_VERSION"));
            return ExitCode::SUCCESS;
        }
        _ => {}
    }
    if args.rest.iter().any(|a| a == "-h" || a == "--help") {
        cli_parser::print_command_help(&args.command);
        return ExitCode::SUCCESS;
    }

    env_init::init_tracing(args.verbose);

    if command == Command::Config {
        return run_config_cmd(&args);
    }

    let stack = match env_init::build_stack(&args) {
        Ok(stack) => stack,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(e.exit_code());
        }
    };
    env_init::install_interrupt_handler(stack.cancel_token());

    let span = tracing::info_span!(
        "run",
        run_id = %Uuid::new_v4(),
        command = %args.command,
        dry_run = args.dry_run,
    );
    let code = dispatch(&stack, command, &args).instrument(span).await;
    ExitCode::from(code)
}

async fn dispatch(stack: &Devstack, command: Command, args: &CliArgs) -> u8 {
    let result = match command {
        Command::CheckKind => stack.check_kind().await.map(|s| tool_message(Tool::Kind, s)),
        Command::InstallKind => stack.install_kind().await.map(|()| "kind installed".to_string()),
        Command::CheckHelm => stack.check_helm().await.map(|s| tool_message(Tool::Helm, s)),
        Command::InstallHelm => stack.install_helm().await.map(|()| "helm installed".to_string()),
        Command::CreateNetwork => stack
            .create_network()
            .await
            .map(|p| format!("network {}: {}", stack.config().network_name, p)),
        Command::CreateCluster => stack
            .create_cluster()
            .await
            .map(|p| format!("cluster {}: {}", stack.config().cluster_name, p)),
        Command::Database | Command::ResetDatabase | Command::WaitForPostgres => {
            let waited = match command {
                Command::Database => stack.database().await,
                Command::ResetDatabase => stack.reset_database().await,
                _ => stack.wait_for_postgres().await,
            };
            waited.map(|attempts| format!("postgres ready after {} attempt(s)", attempts))
        }
        Command::Microservices => stack.microservices().await.map(|d| services_message(&d)),
        Command::Start => stack
            .start()
            .await
            .map(|d| format!("environment up; {}", services_message(&d))),
        Command::Clean => {
            let report = stack.clean().await;
            for line in report.summary_lines() {
                println!("{}", line);
            }
            return 0;
        }
        Command::Status => return run_status(stack, args.json()).await as u8,
        Command::Help | Command::Version | Command::Config => return 0,
    };

    match result {
        Ok(message) => {
            println!("{}", message);
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            // A child killed by the same Ctrl-C surfaces as a tool failure.
            if stack.cancel_token().is_cancelled() {
                EXIT_INTERRUPTED
            } else {
                e.exit_code()
            }
        }
    }
}

fn run_config_cmd(args: &CliArgs) -> ExitCode {
    let Some(action) = ConfigAction::parse(args.subcommand()) else {
        eprintln!("Unknown config subcommand: {}", args.subcommand().unwrap_or(""));
        cli_parser::print_command_help("config");
        return ExitCode::from(EXIT_CONFIG);
    };
    let config = match env_init::load_config(args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(e.exit_code());
        }
    };
    ExitCode::from(run_config(action, &config) as u8)
}

fn tool_message(tool: Tool, state: ToolState) -> String {
    match state {
        ToolState::AlreadyPresent(path) => format!("{} already installed at {}", tool, path.display()),
        ToolState::Installed => format!("{} installed", tool),
    }
}

fn services_message(deployed: &[ServiceDeployment]) -> String {
    if deployed.is_empty() {
        return "no services deployed".to_string();
    }
    let names: Vec<&str> = deployed.iter().map(|d| d.namespace.as_str()).collect();
    format!("deployed {} service(s): {}", names.len(), names.join(", "))
}
