// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Human-readable progress reporting for the scanner

use crate::error::InventoryError;
use crate::types::RepositoryRecord;
use owo_colors::OwoColorize;
use std::io::Write;
use std::path::Path;

/// Observer notified as the scan advances.
///
/// Purely observational: nothing here influences which records are produced.
pub trait Progress {
    /// A scan root is about to be walked
    fn root_started(&mut self, root: &Path);
    /// A directory was entered
    fn entered(&mut self, dir: &Path);
    /// A repository root was found and is being queried
    fn repository_found(&mut self, repo: &Path);
    /// A record was added to the inventory
    fn recorded(&mut self, record: &RepositoryRecord);
    /// A repository or path was skipped
    fn skipped(&mut self, error: &InventoryError);
    /// All roots have been walked
    fn finished(&mut self, records: usize) {
        let _ = records;
    }
}

/// Discards every event
#[derive(Debug, Default, Clone, Copy)]
pub struct Silent;

impl Progress for Silent {
    fn root_started(&mut self, _root: &Path) {}
    fn entered(&mut self, _dir: &Path) {}
    fn repository_found(&mut self, _repo: &Path) {}
    fn recorded(&mut self, _record: &RepositoryRecord) {}
    fn skipped(&mut self, _error: &InventoryError) {}
}

/// Writes one line per event and flushes immediately
pub struct Console<W: Write> {
    out: W,
    color: bool,
}

impl Console<std::io::Stdout> {
    /// Progress on standard output
    #[must_use]
    pub fn stdout(color: bool) -> Self {
        Self::new(std::io::stdout(), color)
    }
}

impl<W: Write> Console<W> {
    /// Progress on an arbitrary writer
    pub fn new(out: W, color: bool) -> Self {
        Self { out, color }
    }

    /// Recover the underlying writer
    pub fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, marker: &str, text: std::fmt::Arguments<'_>) {
        // Progress is best effort; a closed stdout must not stop the scan.
        let _ = writeln!(self.out, "{marker} {text}");
        let _ = self.out.flush();
    }
}

impl<W: Write> Progress for Console<W> {
    fn root_started(&mut self, root: &Path) {
        let marker = if self.color { "scan".bold().to_string() } else { "scan".to_string() };
        self.line(&marker, format_args!("{}", root.display()));
    }

    fn entered(&mut self, dir: &Path) {
        let marker = if self.color { ".".dimmed().to_string() } else { ".".to_string() };
        self.line(&marker, format_args!("{}", dir.display()));
    }

    fn repository_found(&mut self, repo: &Path) {
        let marker = if self.color { "git".cyan().to_string() } else { "git".to_string() };
        self.line(&marker, format_args!("{}", repo.display()));
    }

    fn recorded(&mut self, record: &RepositoryRecord) {
        let marker = if self.color { "+".green().to_string() } else { "+".to_string() };
        self.line(&marker, format_args!("{}", record.name()));
    }

    fn skipped(&mut self, error: &InventoryError) {
        let marker = if self.color { "skip".red().to_string() } else { "skip".to_string() };
        self.line(&marker, format_args!("{error}"));
    }

    fn finished(&mut self, records: usize) {
        let marker = if self.color { "done".bold().to_string() } else { "done".to_string() };
        self.line(&marker, format_args!("{records} repositories"));
    }
}
