// Copyright (c) 2025 - Cowboy AI, Inc.
//! Running provider and provisioning-tool commands
//!
//! Both external collaborators (`aws`, `terraform`) are driven through their
//! CLIs with JSON output. Each invocation is bounded by a timeout and its
//! stdout returned raw for the caller to decode.

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tracing::{debug, instrument, warn};

use crate::errors::CommandError;

/// Program plus arguments, rendered for diagnostics
pub fn render_command(program: &str, args: &[String]) -> String {
    std::iter::once(program)
        .chain(args.iter().map(String::as_str))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Run `program args...` and return its stdout
///
/// The child is killed if it outlives `timeout`. Non-zero exit becomes
/// [`CommandError::Failed`] carrying trimmed stderr.
#[instrument(skip_all, fields(program = program, timeout_ms = timeout.as_millis() as u64))]
pub async fn run_command(
    program: &str,
    args: &[String],
    working_dir: Option<&Path>,
    timeout: Duration,
) -> Result<Vec<u8>, CommandError> {
    let rendered = render_command(program, args);

    let mut command = Command::new(program);
    command
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    if let Some(dir) = working_dir {
        command.current_dir(dir);
    }

    debug!(command = %rendered, "running command");
    let child = command.spawn().map_err(|e| CommandError::Spawn {
        command: rendered.clone(),
        reason: e.to_string(),
    })?;

    let output = match tokio::time::timeout(timeout, child.wait_with_output()).await {
        Ok(result) => result.map_err(|e| CommandError::Spawn {
            command: rendered.clone(),
            reason: e.to_string(),
        })?,
        Err(_) => {
            warn!(command = %rendered, "command timed out");
            return Err(CommandError::Timeout {
                command: rendered,
                timeout,
            });
        }
    };

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        warn!(command = %rendered, status = %output.status, "command failed");
        return Err(CommandError::Failed {
            command: rendered,
            status: output.status.to_string(),
            stderr,
        });
    }

    debug!(bytes = output.stdout.len(), "command finished");
    Ok(output.stdout)
}
