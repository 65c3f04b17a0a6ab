// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Configuration management

use crate::git::{SystemGit, DEFAULT_TIMEOUT};
use crate::report::DEFAULT_REPORT_FILE;
use crate::scanner::{ScanConfig, METADATA_DIR};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// git executable to invoke
    pub git_program: String,
    /// Deadline for each git invocation, in seconds
    pub timeout_secs: u64,
    /// Report destination, relative paths resolve against the working directory
    pub output: PathBuf,
    /// Name of the directory that marks a repository root
    pub metadata_dir: String,
    /// Follow symbolic links while walking
    pub follow_symlinks: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            git_program: "git".to_string(),
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
            output: PathBuf::from(DEFAULT_REPORT_FILE),
            metadata_dir: METADATA_DIR.to_string(),
            follow_symlinks: false,
        }
    }
}

impl Config {
    /// Git runner honouring `git_program` and `timeout_secs`
    #[must_use]
    pub fn git(&self) -> SystemGit {
        SystemGit::new(&self.git_program, Duration::from_secs(self.timeout_secs))
    }

    /// Walk settings
    #[must_use]
    pub fn scan(&self) -> ScanConfig {
        ScanConfig {
            metadata_dir: self.metadata_dir.clone().into(),
            follow_symlinks: self.follow_symlinks,
        }
    }
}

/// Per-user configuration file, if the platform has a config directory
#[must_use]
pub fn default_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("org", "hyperpolymath", "reposcan")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

/// Load configuration from disk or use defaults.
///
/// An explicit `path` must exist; the per-user file is optional.
pub fn load(path: Option<&Path>) -> Result<Config> {
    let source = match path {
        Some(p) => config::File::from(p).format(config::FileFormat::Toml).required(true),
        None => match default_path() {
            Some(p) => config::File::from(p).format(config::FileFormat::Toml).required(false),
            None => return Ok(Config::default()),
        },
    };

    let config: Config = config::Config::builder()
        .add_source(source)
        .build()
        .context("Failed to read configuration")?
        .try_deserialize()
        .context("Invalid configuration")?;

    debug!(?config, "loaded configuration");
    Ok(config)
}
