// Copyright 2024-2026 devstack Contributors
// SPDX-License-Identifier: Apache-2.0

//! Formatting helpers for the status command display.

use super::status::{EnvironmentState, EnvironmentStatus};

/// Print status in human-readable format.
pub fn print_status_human(status: &EnvironmentStatus) {
    for line in status_lines(status) {
        println!("{}", line);
    }
}

/// Lines of the human-readable status view.
pub fn status_lines(status: &EnvironmentStatus) -> Vec<String> {
    let mut lines = header_lines(status);
    lines.extend(tool_lines(status));
    lines.extend(resource_lines(status));
    lines.extend(service_lines(status));
    lines
}

fn header_lines(status: &EnvironmentStatus) -> Vec<String> {
    let icon = match status.state {
        EnvironmentState::Up => "V",
        EnvironmentState::Partial => "!",
        EnvironmentState::Down => "X",
    };
    vec![
        "====================================================".to_string(),
        format!("  devstack Status                        v{}", env!("CARGO_PKG_VERSION")),
        "====================================================".to_string(),
        format!(
            "  State: {} {:8}  Platform: {}",
            icon, status.state, status.platform
        ),
        format!("  Checked: {}", status.checked_at.format("%Y-%m-%d %H:%M:%S UTC")),
        "====================================================".to_string(),
    ]
}

fn tool_lines(status: &EnvironmentStatus) -> Vec<String> {
    let mut lines = vec![
        String::new(),
        "Tools".to_string(),
        "  Name     | Path".to_string(),
        "  ---------+-----------------------------------------".to_string(),
    ];
    for tool in &status.tools {
        let path = tool
            .path
            .as_ref()
            .map(|p| truncate(&p.display().to_string(), 41))
            .unwrap_or_else(|| "missing".to_string());
        lines.push(format!("  {:8} | {}", tool.name, path));
    }
    lines
}

fn resource_lines(status: &EnvironmentStatus) -> Vec<String> {
    vec![
        String::new(),
        "Resources".to_string(),
        format!(
            "  Network: {:27} {}",
            truncate(&status.network.name, 27),
            presence(status.network.exists)
        ),
        format!(
            "  Cluster: {:27} {}",
            truncate(&status.cluster.name, 27),
            presence(status.cluster.exists)
        ),
    ]
}

fn service_lines(status: &EnvironmentStatus) -> Vec<String> {
    let mut lines = vec![String::new(), format!("Services ({} found)", status.services.len())];
    if let Some(ref err) = status.services_error {
        lines.push(format!("  E {}", truncate(err, 54)));
        return lines;
    }
    for svc in &status.services {
        lines.push(format!(
            "  {:27} {}",
            truncate(&svc.namespace, 27),
            if svc.deployed { "deployed" } else { "not deployed" }
        ));
    }
    lines
}

fn presence(exists: bool) -> &'static str {
    if exists {
        "present"
    } else {
        "absent"
    }
}

/// Truncate a string to a maximum length.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
