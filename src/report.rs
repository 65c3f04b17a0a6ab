// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Ordering the inventory and writing it out as CSV

use crate::error::InventoryError;
use crate::types::RepositoryRecord;
use anyhow::{Context, Result};
use chrono::{DateTime, FixedOffset};
use std::cmp::Ordering;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tracing::info;

/// Default report file name, relative to the working directory
pub const DEFAULT_REPORT_FILE: &str = "git_projects_report.csv";

/// Header row of the report
pub const HEADER: [&str; 4] = ["Project name", "Path", "Remote repository", "Last commit date"];

/// How commit dates are rendered in the report (offset is dropped)
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Render a commit date using its own wall-clock components
#[must_use]
pub fn format_commit_date(date: &DateTime<FixedOffset>) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Pairwise ordering of two records.
///
/// When both have a remote: by remote URL, most recent commit first among
/// equal URLs. Otherwise by name. This is not transitive across records with
/// and without remotes; [`sort_records`] tolerates that.
#[must_use]
pub fn compare(a: &RepositoryRecord, b: &RepositoryRecord) -> Ordering {
    if a.remote_url().is_empty() || b.remote_url().is_empty() {
        return a.name().cmp(b.name());
    }

    a.remote_url()
        .cmp(b.remote_url())
        .then_with(|| b.last_commit().cmp(a.last_commit()))
}

/// Stable sort of the inventory by [`compare`]
#[must_use]
pub fn sort_records(records: Vec<RepositoryRecord>) -> Vec<RepositoryRecord> {
    merge_sort(records, &compare)
}

// `slice::sort_by` may panic on an inconsistent comparator, so merge by hand.
fn merge_sort<T, F>(mut items: Vec<T>, cmp: &F) -> Vec<T>
where
    F: Fn(&T, &T) -> Ordering,
{
    if items.len() <= 1 {
        return items;
    }

    let right = items.split_off(items.len() / 2);
    let left = merge_sort(items, cmp);
    let right = merge_sort(right, cmp);

    let mut merged = Vec::with_capacity(left.len() + right.len());
    let mut left = left.into_iter().peekable();
    let mut right = right.into_iter().peekable();

    while let (Some(l), Some(r)) = (left.peek(), right.peek()) {
        if cmp(r, l) == Ordering::Less {
            merged.extend(right.next());
        } else {
            merged.extend(left.next());
        }
    }
    merged.extend(left);
    merged.extend(right);

    merged
}

/// Write the header and one row per record to `out`
pub fn write_report<W: Write>(out: W, records: &[RepositoryRecord]) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(out);

    writer.write_record(HEADER).context("Failed to write report header")?;

    for record in records {
        let path = record.path().to_string_lossy();
        let date = format_commit_date(record.last_commit());
        writer
            .write_record([record.name(), &*path, record.remote_url(), date.as_str()])
            .with_context(|| format!("Failed to write row for {}", record.path().display()))?;
    }

    writer.flush().context("Failed to flush report")?;
    Ok(())
}

/// Create `path` and write the report into it, returning the number of rows.
///
/// Failure to create the file is reported as [`InventoryError::SinkCreation`].
pub fn write_report_file(path: &Path, records: &[RepositoryRecord]) -> Result<usize> {
    let file = File::create(path).map_err(|source| InventoryError::SinkCreation {
        path: path.to_path_buf(),
        source,
    })?;

    write_report(file, records)
        .with_context(|| format!("Failed to write report {}", path.display()))?;

    info!("Wrote {} rows to {}", records.len(), path.display());
    Ok(records.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use chrono::NaiveDateTime;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn record(path: &str, remote: &str, date: &str) -> RepositoryRecord {
        RepositoryRecord::new(
            PathBuf::from(path),
            remote.to_string(),
            DateTime::parse_from_str(date, "%Y-%m-%d %H:%M:%S %z").unwrap(),
        )
    }

    fn names(records: &[RepositoryRecord]) -> Vec<&str> {
        records.iter().map(RepositoryRecord::name).collect()
    }

    #[test]
    fn test_same_remote_most_recent_first() {
        let old = record("/a/old", "git@host:x.git", "2024-01-01 00:00:00 +0000");
        let new = record("/b/new", "git@host:x.git", "2024-06-01 00:00:00 +0000");

        assert_eq!(compare(&new, &old), Ordering::Less);
        assert_eq!(names(&sort_records(vec![old, new])), vec!["new", "old"]);
    }

    #[test]
    fn test_commit_times_compare_as_instants() {
        // 10:00 +0300 is 07:00 UTC, earlier than 09:00 +0000.
        let east = record("/a/east", "git@host:x.git", "2024-01-01 10:00:00 +0300");
        let utc = record("/a/utc", "git@host:x.git", "2024-01-01 09:00:00 +0000");

        assert_eq!(names(&sort_records(vec![east, utc])), vec!["utc", "east"]);
    }

    #[test]
    fn test_distinct_remotes_lexicographic() {
        let z = record("/a/aaa", "https://z.example/z.git", "2024-06-01 00:00:00 +0000");
        let a = record("/a/zzz", "git@a.example:a.git", "2020-01-01 00:00:00 +0000");

        assert_eq!(names(&sort_records(vec![z, a])), vec!["zzz", "aaa"]);
    }

    #[test]
    fn test_missing_remote_falls_back_to_name() {
        let with = record("/a/beta", "git@host:b.git", "2024-06-01 00:00:00 +0000");
        let without = record("/a/alpha", "", "2020-01-01 00:00:00 +0000");

        assert_eq!(compare(&with, &without), Ordering::Greater);
        assert_eq!(compare(&without, &with), Ordering::Less);
        assert_eq!(names(&sort_records(vec![with, without])), vec!["alpha", "beta"]);
    }

    #[test]
    fn test_intransitive_input_sorts_without_panicking() {
        // a < b by name, b < c by name, c < a by remote.
        let a = record("/r/a", "git@host:z.git", "2024-01-01 00:00:00 +0000");
        let b = record("/r/b", "", "2024-01-01 00:00:00 +0000");
        let c = record("/r/c", "git@host:a.git", "2024-01-01 00:00:00 +0000");

        let first = sort_records(vec![a.clone(), b.clone(), c.clone()]);
        let again = sort_records(vec![a, b, c]);

        assert_eq!(first.len(), 3);
        assert_eq!(first, again);
    }

    #[test]
    fn test_sort_is_stable_for_equal_names() {
        let first = record("/one/same", "", "2024-01-01 00:00:00 +0000");
        let second = record("/two/same", "", "2024-01-01 00:00:00 +0000");

        let sorted = sort_records(vec![first, second]);

        assert_eq!(sorted[0].path(), Path::new("/one/same"));
        assert_eq!(sorted[1].path(), Path::new("/two/same"));
    }

    #[test]
    fn test_header_only_report() {
        let mut out = Vec::new();
        write_report(&mut out, &[]).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Project name,Path,Remote repository,Last commit date\n"
        );
    }

    #[test]
    fn test_report_rows() {
        let records = vec![
            record("/tmp/a/repo1", "git@host:x.git", "2024-05-15 15:00:00 +0300"),
            record("/tmp/a/odd, name", "", "2023-02-03 04:05:06 -0700"),
        ];
        let mut out = Vec::new();
        write_report(&mut out, &records).unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[1], "repo1,/tmp/a/repo1,git@host:x.git,2024-05-15 15:00:00");
        assert_eq!(lines[2], "\"odd, name\",\"/tmp/a/odd, name\",,2023-02-03 04:05:06");
    }

    #[test]
    fn test_formatting_drops_offset() {
        let date = DateTime::parse_from_str("2024-05-15 15:00:00 +0300", "%Y-%m-%d %H:%M:%S %z").unwrap();

        let text = format_commit_date(&date);
        let reparsed = NaiveDateTime::parse_from_str(&text, DATE_FORMAT).unwrap();

        assert_eq!(text, "2024-05-15 15:00:00");
        assert_eq!(reparsed, date.naive_local());
        assert_ne!(reparsed, date.naive_utc());
    }

    #[test]
    fn test_write_report_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(DEFAULT_REPORT_FILE);

        let rows = write_report_file(&path, &[record("/x/one", "", "2024-01-01 00:00:00 +0000")]).unwrap();

        assert_eq!(rows, 1);
        assert_eq!(std::fs::read_to_string(&path).unwrap().lines().count(), 2);
    }

    #[test]
    fn test_sink_creation_failure() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("no-such-dir").join(DEFAULT_REPORT_FILE);

        let err = write_report_file(&path, &[]).unwrap_err();

        let inventory = err.downcast_ref::<InventoryError>().unwrap();
        assert_eq!(inventory.kind(), ErrorKind::SinkCreation);
        assert!(!path.exists());
    }
}
