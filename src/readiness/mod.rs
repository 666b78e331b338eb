// Copyright 2024-2026 devstack Contributors
// SPDX-License-Identifier: Apache-2.0

//! Bounded readiness polling.
//!
//! A probe command is retried at a fixed interval until it succeeds or the
//! number of failures exceeds the configured threshold. There is no backoff
//! and no jitter: with threshold `T` an always-failing probe runs exactly
//! `T + 1` times.

use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::config::DevstackConfig;
use crate::error::{DevstackError, Result};
use crate::runner::{CommandRunner, Invocation};

/// A named probe command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadinessProbe {
    /// Human-readable target for diagnostics.
    pub target: String,
    pub invocation: Invocation,
}

impl ReadinessProbe {
    pub fn new(target: impl Into<String>, invocation: Invocation) -> Self {
        Self {
            target: target.into(),
            invocation,
        }
    }

    /// `pg_isready` in a throwaway pod inside the cluster.
    ///
    /// `pod_suffix` keeps the pod name unique per wait so a pod left behind
    /// by an interrupted run cannot block later probes.
    pub fn postgres(config: &DevstackConfig, pod_suffix: &str) -> Self {
        let r = &config.readiness;
        let invocation = Invocation::mutation("kubectl")
            .args(["--context", &config.kube_context()])
            .args(["run", &format!("devstack-pg-probe-{}", pod_suffix)])
            .args(["--rm", "-i", "--quiet", "--restart=Never"])
            .args(["--namespace", &r.namespace])
            .args(["--image", &r.image])
            .args(["--", "pg_isready", "-h", &r.host, "-p", &r.port.to_string()]);
        Self::new(format!("postgres at {}:{}", r.host, r.port), invocation)
    }
}

/// Attempt limit and pause between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitPolicy {
    /// Failed probes tolerated; one more failure ends the wait.
    pub timeout_attempts: u32,
    pub interval: Duration,
}

impl WaitPolicy {
    pub fn from_config(config: &DevstackConfig) -> Self {
        Self {
            timeout_attempts: config.readiness.timeout_attempts,
            interval: config.readiness.interval(),
        }
    }

    /// Probes left after `failures` failed ones.
    pub fn remaining(&self, failures: u32) -> u32 {
        self.timeout_attempts.saturating_add(1).saturating_sub(failures)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitState {
    Waiting { failures: u32 },
    Done { attempts: u32 },
    Failed { attempts: u32 },
}

/// Pure transition logic behind [`wait_ready`].
#[derive(Debug, Clone)]
pub struct Waiter {
    threshold: u32,
    state: WaitState,
}

impl Waiter {
    pub fn new(threshold: u32) -> Self {
        Self {
            threshold,
            state: WaitState::Waiting { failures: 0 },
        }
    }

    pub fn state(&self) -> WaitState {
        self.state
    }

    /// Record one probe result. Terminal states absorb further results.
    pub fn record(&mut self, success: bool) -> WaitState {
        if let WaitState::Waiting { failures } = self.state {
            let attempts = failures.saturating_add(1);
            self.state = if success {
                WaitState::Done { attempts }
            } else if failures >= self.threshold {
                WaitState::Failed { attempts }
            } else {
                WaitState::Waiting { failures: attempts }
            };
        }
        self.state
    }
}

/// Poll `probe` until it succeeds, returning the number of attempts made.
///
/// # Errors
/// `ReadinessTimeout` once failures exceed the threshold, `Interrupted` when
/// `cancel` fires. A probe that cannot be started counts as a failed attempt.
pub async fn wait_ready(
    runner: &dyn CommandRunner,
    probe: &ReadinessProbe,
    policy: WaitPolicy,
    cancel: &CancellationToken,
) -> Result<u32> {
    let mut waiter = Waiter::new(policy.timeout_attempts);
    tracing::info!(
        probe = %probe.target,
        timeout_attempts = policy.timeout_attempts,
        interval_ms = policy.interval.as_millis() as u64,
        "waiting for readiness"
    );

    loop {
        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(DevstackError::Interrupted),
            result = runner.run(&probe.invocation) => result,
        };
        let ready = match result {
            Ok(output) => output.success(),
            Err(e) => {
                tracing::debug!(probe = %probe.target, error = %e, "probe did not start");
                false
            }
        };

        match waiter.record(ready) {
            WaitState::Done { attempts } => {
                tracing::info!(probe = %probe.target, attempts, "ready");
                return Ok(attempts);
            }
            WaitState::Failed { attempts } => {
                tracing::error!(probe = %probe.target, attempts, "readiness timeout");
                return Err(DevstackError::ReadinessTimeout {
                    target: probe.target.clone(),
                    attempts,
                });
            }
            WaitState::Waiting { failures } => {
                tracing::debug!(
                    probe = %probe.target,
                    failures,
                    remaining = policy.remaining(failures),
                    "not ready yet"
                );
            }
        }

        tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(DevstackError::Interrupted),
            _ = tokio::time::sleep(policy.interval) => {}
        }
    }
}

#[cfg(test)]
#[path = "readiness_tests.rs"]
mod tests;
