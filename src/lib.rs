// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//
//! Reposcan library - inventory of the git repositories under your directories
//!
//! Walks one or more root directories, asks `git` for each repository's
//! `origin` URL and last commit date, and writes a sorted CSV report.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod commands;
pub mod config;
pub mod error;
pub mod extractor;
pub mod git;
pub mod progress;
pub mod report;
pub mod scanner;

/// Core data types
pub mod types {
    use chrono::{DateTime, FixedOffset};
    use std::path::{Path, PathBuf};

    /// One repository found during a scan.
    ///
    /// Built once by the scanner and read-only afterwards.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct RepositoryRecord {
        path: PathBuf,
        name: String,
        remote_url: String,
        last_commit: DateTime<FixedOffset>,
    }

    impl RepositoryRecord {
        /// Create a record for the repository rooted at `path`.
        ///
        /// The name is the final path segment, or the whole path when it has
        /// none (`.`, `/`).
        #[must_use]
        pub fn new(path: PathBuf, remote_url: String, last_commit: DateTime<FixedOffset>) -> Self {
            let name = path
                .file_name()
                .map_or_else(|| path.to_string_lossy(), |n| n.to_string_lossy())
                .into_owned();

            Self {
                path,
                name,
                remote_url,
                last_commit,
            }
        }

        /// Repository root
        #[must_use]
        pub fn path(&self) -> &Path {
            &self.path
        }

        /// Final segment of the path
        #[must_use]
        pub fn name(&self) -> &str {
            &self.name
        }

        /// URL of `origin`, empty when unknown
        #[must_use]
        pub fn remote_url(&self) -> &str {
            &self.remote_url
        }

        /// Committer date of the most recent commit
        #[must_use]
        pub fn last_commit(&self) -> &DateTime<FixedOffset> {
            &self.last_commit
        }
    }

}

/// Prelude for common imports
pub mod prelude {
    pub use crate::error::{ErrorKind, InventoryError};
    pub use crate::types::RepositoryRecord;
    pub use anyhow::{Context, Result};
}
