// Copyright 2024-2026 devstack Contributors
// SPDX-License-Identifier: Apache-2.0

//! Runner backed by real child processes.

use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;

use super::{CommandOutput, CommandRunner, Invocation};
use crate::error::{DevstackError, Result};

/// Spawns each invocation with `tokio::process`.
///
/// Queries are captured silently. Mutations echo their output line by line
/// while it is captured, so long steps like `kind create cluster` show
/// progress and their stderr is still available for the error message.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessRunner;

impl ProcessRunner {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CommandRunner for ProcessRunner {
    async fn run(&self, invocation: &Invocation) -> Result<CommandOutput> {
        tracing::debug!(command = %invocation.command_line(), "exec");

        let spawn_err = |source| DevstackError::Spawn {
            program: invocation.program.clone(),
            source,
        };

        if !invocation.is_mutation() {
            let output = Command::new(&invocation.program)
                .args(&invocation.args)
                .stdin(Stdio::null())
                .output()
                .await
                .map_err(spawn_err)?;
            return Ok(CommandOutput {
                status: output.status.code(),
                stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        // stdin stays attached so sudo can prompt for a password.
        let mut child = Command::new(&invocation.program)
            .args(&invocation.args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(spawn_err)?;

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();
        let (stdout, stderr) = tokio::join!(
            relay_lines(stdout, |line| println!("{}", line)),
            relay_lines(stderr, |line| eprintln!("{}", line)),
        );

        let status = child.wait().await?;
        Ok(CommandOutput {
            status: status.code(),
            stdout: stdout?,
            stderr: stderr?,
        })
    }

    fn resolve(&self, program: &str) -> Option<PathBuf> {
        which::which(program).ok()
    }
}

/// Echo each line through `emit` and return everything read.
async fn relay_lines<R, F>(stream: Option<R>, emit: F) -> Result<String>
where
    R: AsyncRead + Unpin,
    F: Fn(&str),
{
    let mut captured = String::new();
    let Some(stream) = stream else {
        return Ok(captured);
    };

    let mut lines = BufReader::new(stream).lines();
    while let Some(line) = lines.next_line().await? {
        emit(&line);
        captured.push_str(&line);
        captured.push('\n');
    }
    Ok(captured)
}
