// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Repository scanning

use crate::error::InventoryError;
use crate::extractor::extract;
use crate::git::GitRunner;
use crate::progress::Progress;
use crate::types::RepositoryRecord;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Directory whose presence marks a repository root
pub const METADATA_DIR: &str = ".git";

/// Scan configuration
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Name of the metadata directory that marks a repository root
    pub metadata_dir: OsString,
    /// Follow symbolic links while walking
    pub follow_symlinks: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            metadata_dir: OsString::from(METADATA_DIR),
            follow_symlinks: false,
        }
    }
}

/// Something observed while walking a root
#[derive(Debug)]
pub enum ScanEvent {
    /// An ordinary directory was entered
    Entered(PathBuf),
    /// A repository root (parent of a metadata directory)
    Repository(PathBuf),
    /// A path could not be visited; the walk carries on
    Skipped(InventoryError),
}

/// Lazy depth-first walk of one root, see [`discover`]
pub struct Discoveries {
    walker: walkdir::IntoIter,
    metadata_dir: OsString,
}

/// Walk `root` lazily, reporting directories, repository roots and
/// unreadable paths in depth-first order.
///
/// Metadata directories are never descended into.
#[must_use]
pub fn discover(root: &Path, config: &ScanConfig) -> Discoveries {
    Discoveries {
        walker: WalkDir::new(root)
            .follow_links(config.follow_symlinks)
            .sort_by_file_name()
            .into_iter(),
        metadata_dir: config.metadata_dir.clone(),
    }
}

impl Iterator for Discoveries {
    type Item = ScanEvent;

    fn next(&mut self) -> Option<ScanEvent> {
        loop {
            let entry = match self.walker.next()? {
                Ok(entry) => entry,
                Err(source) => {
                    let path = source.path().map(Path::to_path_buf).unwrap_or_default();
                    return Some(ScanEvent::Skipped(InventoryError::Traversal { path, source }));
                }
            };

            if !entry.file_type().is_dir() {
                continue;
            }

            if entry.file_name() == self.metadata_dir.as_os_str() {
                self.walker.skip_current_dir();
                let repo = match entry.path().parent() {
                    Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
                    _ => PathBuf::from("."),
                };
                return Some(ScanEvent::Repository(repo));
            }

            return Some(ScanEvent::Entered(entry.into_path()));
        }
    }
}

/// Walk every root in order and extract metadata for each repository found.
///
/// Failures are logged and skipped; the returned records are in discovery
/// order.
pub async fn scan_roots<G, P>(
    roots: &[PathBuf],
    config: &ScanConfig,
    git: &G,
    progress: &mut P,
) -> Vec<RepositoryRecord>
where
    G: GitRunner,
    P: Progress + ?Sized,
{
    let mut records = Vec::new();

    for root in roots {
        info!("Scanning: {}", root.display());
        progress.root_started(root);

        for event in discover(root, config) {
            match event {
                ScanEvent::Entered(dir) => progress.entered(&dir),
                ScanEvent::Skipped(err) => {
                    warn!(path = %err.path().display(), "skipped: {}", err);
                    progress.skipped(&err);
                }
                ScanEvent::Repository(repo) => {
                    progress.repository_found(&repo);
                    match extract(git, &repo).await {
                        Ok(meta) => {
                            let record = RepositoryRecord::new(repo, meta.remote_url, meta.last_commit);
                            debug!(name = record.name(), "recorded");
                            progress.recorded(&record);
                            records.push(record);
                        }
                        Err(err) => {
                            warn!(path = %repo.display(), kind = ?err.kind(), "skipping project: {}", err);
                            progress.skipped(&err);
                        }
                    }
                }
            }
        }
    }

    progress.finished(records.len());
    records
}
