//! Test fixtures
//!
//! Factory functions for creating test data with sensible defaults.

use std::path::Path;
use std::time::Duration;

use crate::config::Config;
use crate::domain::entities::{KeywordSet, Record};
use crate::domain::ports::{GithubCommit, GithubIssue};

/// A commit on pytorch/pytorch with the given sha and message
pub fn test_commit(sha: &str, message: &str) -> GithubCommit {
    GithubCommit {
        sha: sha.to_string(),
        html_url: format!("https://github.com/pytorch/pytorch/commit/{}", sha),
        message: message.to_string(),
        committed_at: "2024-01-01T12:00:00Z".to_string(),
    }
}

/// An issue created on 2024-01-{number}
pub fn test_issue(number: i64, title: &str, body: Option<&str>, is_pull_request: bool) -> GithubIssue {
    let kind = if is_pull_request { "pull" } else { "issues" };
    GithubIssue {
        number,
        title: title.to_string(),
        body: body.map(str::to_string),
        html_url: format!("https://github.com/pytorch/pytorch/{}/{}", kind, number),
        created_at: format!("2024-01-{:02}T00:00:00Z", number),
        is_pull_request,
    }
}

/// A matched record with a distinct URL per `n`
pub fn test_record(n: u32) -> Record {
    test_record_at(n, &format!("2024-01-01T{:02}:00:00Z", n % 24))
}

/// Like `test_record`, with an explicit source timestamp
pub fn test_record_at(n: u32, date: &str) -> Record {
    Record {
        title: format!("[inductor] change #{}", n),
        url: format!("https://github.com/pytorch/pytorch/commit/{:07x}", n),
        body: format!("[inductor] change #{}\n\nSummary line\nsecond line", n),
        date: date.to_string(),
    }
}

/// Config writing both feeds into `dir`, with fast HTTP settings
pub fn test_config(dir: &Path) -> Config {
    Config {
        github_api_url: "http://127.0.0.1:9".to_string(),
        github_token: None,
        repo: "pytorch/pytorch".to_string(),
        keywords: KeywordSet::new(["inductor"]),
        lookback_days: 1,
        page_size: 50,
        http_timeout: Duration::from_secs(5),
        max_retries: 0,
        commits_feed_path: dir.join("commits.xml"),
        issues_feed_path: dir.join("issues.xml"),
        ..Config::default()
    }
}
