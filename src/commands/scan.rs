// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Scan command - inventories git repositories and writes the CSV report

use crate::config;
use crate::progress::{Console, Progress, Silent};
use crate::report::{sort_records, write_report_file};
use crate::scanner::scan_roots;
use anyhow::{bail, Context, Result};
use std::path::PathBuf;
use tracing::{info, warn};

/// Arguments for the scan command
#[derive(Debug, Default)]
pub struct ScanArgs {
    /// Roots to walk, in order
    pub directories: Vec<PathBuf>,
    /// Explicit configuration file
    pub config: Option<PathBuf>,
    /// Report destination override
    pub output: Option<PathBuf>,
    /// Per-invocation git deadline override, in seconds
    pub timeout_secs: Option<u64>,
    /// Follow symbolic links while walking
    pub follow_symlinks: bool,
    /// Suppress progress output
    pub quiet: bool,
    /// Colorize progress output
    pub color: bool,
}

/// Run the scan command
pub async fn run(args: ScanArgs) -> Result<()> {
    let mut config = config::load(args.config.as_deref())?;
    if let Some(output) = args.output {
        config.output = output;
    }
    if let Some(secs) = args.timeout_secs {
        config.timeout_secs = secs;
    }
    config.follow_symlinks |= args.follow_symlinks;

    if config.timeout_secs == 0 {
        bail!("Timeout must be at least one second");
    }

    let roots = normalize_roots(args.directories);
    if roots.is_empty() {
        bail!("Please provide at least one --directory=/path");
    }

    let mut progress: Box<dyn Progress> = if args.quiet {
        Box::new(Silent)
    } else {
        Box::new(Console::stdout(args.color))
    };

    let git = config.git();
    let records = scan_roots(&roots, &config.scan(), &git, progress.as_mut()).await;
    info!("Found {} repositories", records.len());

    let records = sort_records(records);
    let rows = write_report_file(&config.output, &records)
        .with_context(|| format!("Failed to save report after scanning {} repositories", records.len()))?;

    if !args.quiet {
        println!("Report saved to '{}' ({} repositories)", config.output.display(), rows);
    }

    Ok(())
}

/// Trim surrounding whitespace from each root and drop blank ones
fn normalize_roots(directories: Vec<PathBuf>) -> Vec<PathBuf> {
    directories
        .into_iter()
        .filter_map(|dir| {
            let raw = dir.to_string_lossy();
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                warn!("Ignoring blank --directory value");
                None
            } else if trimmed.len() == raw.len() {
                Some(dir)
            } else {
                Some(PathBuf::from(trimmed))
            }
        })
        .collect()
}
