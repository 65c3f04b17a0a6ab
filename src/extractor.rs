// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Metadata extraction for a single repository root

use crate::error::{ErrorKind, InventoryError};
use crate::git::{GitRunner, GitStep};
use chrono::{DateTime, FixedOffset};
use std::path::Path;
use tracing::{debug, warn};

/// Layout of `git log --date=iso` output, e.g. `2024-05-15 15:00:00 +0300`
pub const GIT_ISO_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S %z";

/// What git told us about a repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoMetadata {
    /// URL of `origin`, empty when it could not be determined
    pub remote_url: String,
    /// Committer date of `HEAD`
    pub last_commit: DateTime<FixedOffset>,
}

/// Parse a commit date as printed by `git log --date=iso`
pub fn parse_commit_date(repo: &Path, value: &str) -> Result<DateTime<FixedOffset>, InventoryError> {
    DateTime::parse_from_str(value, GIT_ISO_DATE_FORMAT).map_err(|source| InventoryError::ParseFailed {
        path: repo.to_path_buf(),
        value: value.to_string(),
        source,
    })
}

/// Query the remote URL and last commit date of `repo`.
///
/// A missing remote is tolerated and yields an empty URL. A timeout on either
/// query, a failing `git log` or an unreadable date fails the extraction.
pub async fn extract<G: GitRunner>(git: &G, repo: &Path) -> Result<RepoMetadata, InventoryError> {
    let remote_url = match git.run(repo, GitStep::RemoteUrl).await {
        Ok(url) => url,
        Err(e) if e.kind() == ErrorKind::Timeout => return Err(e),
        Err(e) => {
            warn!(path = %repo.display(), "failed to get remote repo: {}", e);
            String::new()
        }
    };

    let raw = git.run(repo, GitStep::LastCommit).await?;
    let last_commit = parse_commit_date(repo, &raw)?;

    debug!(path = %repo.display(), remote = %remote_url, %last_commit, "extracted");

    Ok(RepoMetadata { remote_url, last_commit })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::fake::{FakeGit, Reply};
    use chrono::{NaiveDate, Timelike};

    #[test]
    fn test_parse_git_iso_date() {
        let dt = parse_commit_date(Path::new("r"), "2024-05-15 15:00:00 +0300").unwrap();

        assert_eq!(dt.date_naive(), NaiveDate::from_ymd_opt(2024, 5, 15).unwrap());
        assert_eq!(dt.hour(), 15);
        assert_eq!(dt.offset().local_minus_utc(), 3 * 3600);
    }

    #[test]
    fn test_parse_negative_offset() {
        let dt = parse_commit_date(Path::new("r"), "2023-12-31 23:59:59 -0830").unwrap();

        assert_eq!(dt.offset().local_minus_utc(), -(8 * 3600 + 30 * 60));
        assert_eq!(dt.naive_utc().to_string(), "2024-01-01 08:29:59");
    }

    #[test]
    fn test_parse_rejects_other_layouts() {
        for bad in [
            "2024-05-15T15:00:00+03:00",
            "2024-05-15 15:00:00",
            "Wed May 15 15:00:00 2024 +0300",
            "",
        ] {
            let err = parse_commit_date(Path::new("r"), bad).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::ParseFailed, "{bad:?} should not parse");
        }
    }

    #[tokio::test]
    async fn test_extract_success() {
        let git = FakeGit::default().repo("/src/a", "git@host:x.git", "2024-05-15 15:00:00 +0300");

        let meta = extract(&git, Path::new("/src/a")).await.unwrap();

        assert_eq!(meta.remote_url, "git@host:x.git");
        assert_eq!(meta.last_commit.to_rfc3339(), "2024-05-15T15:00:00+03:00");
    }

    #[tokio::test]
    async fn test_remote_failure_is_not_fatal() {
        let git = FakeGit::default()
            .reply("/src/a", GitStep::RemoteUrl, Reply::Exit(2))
            .reply("/src/a", GitStep::LastCommit, Reply::Out("2024-01-02 03:04:05 +0000"));

        let meta = extract(&git, Path::new("/src/a")).await.unwrap();

        assert_eq!(meta.remote_url, "");
    }

    #[tokio::test]
    async fn test_remote_timeout_stops_extraction() {
        let git = FakeGit::default()
            .reply("/src/a", GitStep::RemoteUrl, Reply::Timeout)
            .reply("/src/a", GitStep::LastCommit, Reply::Out("2024-01-02 03:04:05 +0000"));

        let err = extract(&git, Path::new("/src/a")).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Timeout);
        assert_eq!(git.calls.borrow().len(), 1, "git log must not run after a timeout");
    }

    #[tokio::test]
    async fn test_log_failures() {
        let cases = [
            (Reply::Timeout, ErrorKind::Timeout),
            (Reply::Exit(128), ErrorKind::CommandFailed),
            (Reply::Out("not a date"), ErrorKind::ParseFailed),
        ];

        for (reply, expected) in cases {
            let git = FakeGit::default()
                .reply("/src/a", GitStep::RemoteUrl, Reply::Out("https://example.org/a.git"))
                .reply("/src/a", GitStep::LastCommit, reply);

            let err = extract(&git, Path::new("/src/a")).await.unwrap_err();

            assert_eq!(err.kind(), expected);
            assert_eq!(err.path(), Path::new("/src/a"));
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_extract_with_system_git_timeout() {
        use crate::git::SystemGit;
        use std::time::Duration;

        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(dir.path().join("remote"), "echo git@host:x.git\n").unwrap();
        std::fs::write(dir.path().join("log"), "exec sleep 30\n").unwrap();
        let git = SystemGit::new("sh", Duration::from_millis(200));

        let err = extract(&git, dir.path()).await.unwrap_err();

        assert!(matches!(
            err,
            InventoryError::Timeout { step: GitStep::LastCommit, .. }
        ));
    }
}
