// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Error types for scanning, extraction and reporting

use crate::git::GitStep;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Coarse classification of an [`InventoryError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A git invocation exceeded its deadline
    Timeout,
    /// A git invocation could not be started or exited unsuccessfully
    CommandFailed,
    /// The commit date printed by git was not in the expected format
    ParseFailed,
    /// A path could not be visited during the directory walk
    Traversal,
    /// The report file could not be created
    SinkCreation,
}

/// Why a git invocation failed
#[derive(Debug, Error)]
pub enum CommandFailure {
    /// The process could not be spawned
    #[error("could not start git: {0}")]
    Spawn(#[source] std::io::Error),
    /// The process ran but returned a non-zero status (`None` when killed by a signal)
    #[error("git exited with status {}", .0.map_or_else(|| "signal".to_string(), |c| c.to_string()))]
    Exit(Option<i32>),
}

/// Errors raised while building the repository inventory
#[derive(Debug, Error)]
pub enum InventoryError {
    /// A git step did not finish within its deadline
    #[error("{step} timed out after {}s in {}", .timeout.as_secs(), .path.display())]
    Timeout {
        /// Repository root
        path: PathBuf,
        /// Which git step timed out
        step: GitStep,
        /// The deadline that was exceeded
        timeout: Duration,
    },

    /// A git step failed
    #[error("{step} failed in {}: {cause}", .path.display())]
    CommandFailed {
        /// Repository root
        path: PathBuf,
        /// Which git step failed
        step: GitStep,
        /// Underlying failure
        #[source]
        cause: CommandFailure,
    },

    /// The last commit date could not be parsed
    #[error("cannot parse commit date {value:?} in {}", .path.display())]
    ParseFailed {
        /// Repository root
        path: PathBuf,
        /// Text printed by git
        value: String,
        /// Parser error
        #[source]
        source: chrono::ParseError,
    },

    /// A path could not be visited
    #[error("cannot read {}: {source}", .path.display())]
    Traversal {
        /// Offending path (empty when walkdir could not name it)
        path: PathBuf,
        /// Walk error
        #[source]
        source: walkdir::Error,
    },

    /// The report file could not be created
    #[error("cannot create report {}: {source}", .path.display())]
    SinkCreation {
        /// Report destination
        path: PathBuf,
        /// I/O error from file creation
        #[source]
        source: std::io::Error,
    },
}

impl InventoryError {
    /// Classify this error
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Timeout { .. } => ErrorKind::Timeout,
            Self::CommandFailed { .. } => ErrorKind::CommandFailed,
            Self::ParseFailed { .. } => ErrorKind::ParseFailed,
            Self::Traversal { .. } => ErrorKind::Traversal,
            Self::SinkCreation { .. } => ErrorKind::SinkCreation,
        }
    }

    /// Path the error refers to
    #[must_use]
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::Timeout { path, .. }
            | Self::CommandFailed { path, .. }
            | Self::ParseFailed { path, .. }
            | Self::Traversal { path, .. }
            | Self::SinkCreation { path, .. } => path,
        }
    }
}
