// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Dispatch Authors

//! A spawned module process: piped stdout/stderr forwarded to the host log,
//! and a graceful-terminate-then-force-kill shutdown path.

use std::process::Stdio;
use std::time::Duration;

use nix::sys::signal::{self, Signal};
use nix::unistd::Pid;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::{Child, Command};

use crate::error::AdaptersError;

pub struct ModuleProcess {
    child: Child,
    pid: Pid,
    label: String,
}

impl ModuleProcess {
    /// Spawn `program` with `args`, prefixing forwarded stdout/stderr lines
    /// with `label` (the module's human name).
    pub fn spawn(label: impl Into<String>, program: &str, args: &[String]) -> Result<Self, AdaptersError> {
        let label = label.into();
        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        let pid = Pid::from_raw(child.id().ok_or(AdaptersError::ProcessAlreadyExited)? as i32);

        if let Some(stdout) = child.stdout.take() {
            forward_log_lines(label.clone(), "stdout", stdout);
        }
        if let Some(stderr) = child.stderr.take() {
            forward_log_lines(label.clone(), "stderr", stderr);
        }

        Ok(Self { child, pid, label })
    }

    /// Wait for the process to exit on its own (e.g. a crash).
    pub async fn wait(&mut self) -> std::io::Result<std::process::ExitStatus> {
        self.child.wait().await
    }

    /// Send `SIGTERM`, wait up to `timeout` for exit, then `SIGKILL` if it's
    /// still running.
    pub async fn terminate(&mut self, timeout: Duration) -> std::io::Result<std::process::ExitStatus> {
        let _ = signal::kill(self.pid, Signal::SIGTERM);
        match tokio::time::timeout(timeout, self.child.wait()).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(module = %self.label, "graceful terminate timed out, sending SIGKILL");
                let _ = signal::kill(self.pid, Signal::SIGKILL);
                self.child.wait().await
            }
        }
    }
}

fn forward_log_lines(label: String, stream: &'static str, reader: impl AsyncRead + Unpin + Send + 'static) {
    tokio::spawn(async move {
        let mut lines = BufReader::new(reader).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => tracing::info!(module = %label, stream, "{line}"),
                Ok(None) => break,
                Err(error) => {
                    tracing::warn!(module = %label, stream, %error, "log forwarding stopped");
                    break;
                }
            }
        }
    });
}

#[cfg(test)]
#[path = "process_tests.rs"]
mod tests;
