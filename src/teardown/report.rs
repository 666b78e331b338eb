// Copyright 2024-2026 devstack Contributors
// SPDX-License-Identifier: Apache-2.0

//! Aggregated teardown outcome.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TeardownStep {
    DatabaseResources,
    Cluster,
    Network,
    KindBinary,
}

impl std::fmt::Display for TeardownStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DatabaseResources => write!(f, "database resources"),
            Self::Cluster => write!(f, "cluster"),
            Self::Network => write!(f, "network"),
            Self::KindBinary => write!(f, "kind binary"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "reason", rename_all = "snake_case")]
pub enum StepOutcome {
    Removed,
    /// Nothing to remove.
    Absent,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepReport {
    pub step: TeardownStep,
    pub target: String,
    #[serde(flatten)]
    pub outcome: StepOutcome,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TeardownReport {
    pub steps: Vec<StepReport>,
}

impl TeardownReport {
    pub fn record(&mut self, step: TeardownStep, target: impl Into<String>, outcome: StepOutcome) {
        self.steps.push(StepReport {
            step,
            target: target.into(),
            outcome,
        });
    }

    pub fn outcome(&self, step: TeardownStep) -> Option<&StepOutcome> {
        self.steps.iter().find(|s| s.step == step).map(|s| &s.outcome)
    }

    pub fn failures(&self) -> impl Iterator<Item = &StepReport> {
        self.steps
            .iter()
            .filter(|s| matches!(s.outcome, StepOutcome::Failed(_)))
    }

    /// No step failed.
    pub fn is_clean(&self) -> bool {
        self.failures().next().is_none()
    }

    /// One line per step for the terminal.
    pub fn summary_lines(&self) -> Vec<String> {
        self.steps
            .iter()
            .map(|s| match &s.outcome {
                StepOutcome::Removed => format!("  removed  {} ({})", s.step, s.target),
                StepOutcome::Absent => format!("  absent   {} ({})", s.step, s.target),
                StepOutcome::Failed(reason) => {
                    format!("  FAILED   {} ({}): {}", s.step, s.target, reason)
                }
            })
            .collect()
    }
}
