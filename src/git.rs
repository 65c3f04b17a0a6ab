// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Invoking the `git` binary with a deadline

use crate::error::{CommandFailure, InventoryError};
use std::ffi::OsString;
use std::fmt;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::trace;

/// Default deadline for each git invocation
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// The git queries made against each repository
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GitStep {
    /// `git remote get-url origin`
    RemoteUrl,
    /// `git log -1 --format=%cd --date=iso`
    LastCommit,
}

impl GitStep {
    /// Arguments passed to git for this step
    #[must_use]
    pub fn args(self) -> &'static [&'static str] {
        match self {
            Self::RemoteUrl => &["remote", "get-url", "origin"],
            Self::LastCommit => &["log", "-1", "--format=%cd", "--date=iso"],
        }
    }
}

impl fmt::Display for GitStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RemoteUrl => f.write_str("git remote get-url origin"),
            Self::LastCommit => f.write_str("git log"),
        }
    }
}

/// Something that can answer a [`GitStep`] for a repository root.
///
/// Implementations return the trimmed stdout of the query.
#[allow(async_fn_in_trait)]
pub trait GitRunner {
    /// Run `step` inside `repo`
    async fn run(&self, repo: &Path, step: GitStep) -> Result<String, InventoryError>;
}

/// Runs the real `git` executable
#[derive(Debug, Clone)]
pub struct SystemGit {
    program: OsString,
    timeout: Duration,
}

impl Default for SystemGit {
    fn default() -> Self {
        Self::new("git", DEFAULT_TIMEOUT)
    }
}

impl SystemGit {
    /// Use `program` as the git binary, killing each invocation after `timeout`
    pub fn new(program: impl Into<OsString>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            timeout,
        }
    }

    /// Deadline applied to each invocation
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl GitRunner for SystemGit {
    async fn run(&self, repo: &Path, step: GitStep) -> Result<String, InventoryError> {
        let mut cmd = Command::new(&self.program);
        cmd.args(step.args())
            .current_dir(repo)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true);

        // Keep git from walking up into an enclosing checkout; ceilings must be absolute.
        if let Some(parent) = repo.parent().filter(|p| !p.as_os_str().is_empty()) {
            let ceiling = match std::env::current_dir() {
                Ok(cwd) if parent.is_relative() => cwd.join(parent),
                _ => parent.to_path_buf(),
            };
            cmd.env("GIT_CEILING_DIRECTORIES", ceiling);
        }

        trace!(path = %repo.display(), "running {}", step);

        let output = match tokio::time::timeout(self.timeout, cmd.output()).await {
            Err(_) => {
                return Err(InventoryError::Timeout {
                    path: repo.to_path_buf(),
                    step,
                    timeout: self.timeout,
                })
            }
            Ok(Err(e)) => {
                return Err(InventoryError::CommandFailed {
                    path: repo.to_path_buf(),
                    step,
                    cause: CommandFailure::Spawn(e),
                })
            }
            Ok(Ok(output)) => output,
        };

        if !output.status.success() {
            return Err(InventoryError::CommandFailed {
                path: repo.to_path_buf(),
                step,
                cause: CommandFailure::Exit(output.status.code()),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}
