// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//
//! Reposcan CLI - inventory of the git repositories under your directories

use anyhow::Result;
use clap::Parser;
use reposcan::commands::scan::{self, ScanArgs};
use std::io::IsTerminal;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "reposcan")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory to search for git repositories (can be repeated)
    #[arg(short, long = "directory", value_name = "PATH", required = true)]
    directories: Vec<PathBuf>,

    /// Report file [default: git_projects_report.csv]
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Seconds allowed for each git invocation [default: 10]
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Follow symbolic links while walking
    #[arg(long)]
    follow_symlinks: bool,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Quiet mode (suppress progress and non-error output)
    #[arg(short, long)]
    quiet: bool,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = match cli.verbose {
        0 if cli.quiet => tracing::Level::ERROR,
        0 => tracing::Level::INFO,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .with_ansi(!cli.no_color && std::io::stderr().is_terminal())
        .with_writer(std::io::stderr)
        .init();

    scan::run(ScanArgs {
        directories: cli.directories,
        config: cli.config,
        output: cli.output,
        timeout_secs: cli.timeout,
        follow_symlinks: cli.follow_symlinks,
        quiet: cli.quiet,
        color: !cli.no_color && std::io::stdout().is_terminal(),
    })
    .await
}
