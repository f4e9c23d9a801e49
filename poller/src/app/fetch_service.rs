//! Keyword fetch service
//!
//! Pages through a repository's commits or issues since a cutoff and keeps the
//! entries whose commit message (commits) or title (issues) mentions one of the
//! keywords.
//!
//! Paging stops at the first empty page. A page that fails (transport error
//! after retries, bad status, unparseable body) also stops paging, and the
//! records gathered so far are returned.

use std::sync::Arc;

use chrono::{DateTime, Duration, SecondsFormat, Utc};

use crate::domain::entities::{IssueState, KeywordSet, Record, SourceKind};
use crate::domain::ports::{GithubClient, GithubCommit, GithubIssue, PageRequest};
use crate::error::GithubError;

/// What to fetch and how to filter it
#[derive(Debug, Clone)]
pub struct SourceQuery {
    pub repo: String,
    pub source: SourceKind,
    pub keywords: KeywordSet,
    pub issue_state: IssueState,
    pub include_pull_requests: bool,
}

/// One page worth of results
struct Page {
    /// Entries returned by the API, matched or not
    seen: usize,
    matched: Vec<Record>,
}

/// Service for collecting keyword-matching records
pub struct FetchService<GC>
where
    GC: GithubClient,
{
    github: Arc<GC>,
    per_page: u32,
}

impl<GC> FetchService<GC>
where
    GC: GithubClient,
{
    pub fn new(github: Arc<GC>, per_page: u32) -> Self {
        Self { github, per_page }
    }

    /// Records from the last `lookback_days` days. A window reaching past
    /// the Unix epoch starts at the epoch.
    pub async fn fetch(&self, query: &SourceQuery, lookback_days: u32) -> Vec<Record> {
        let since = Duration::try_days(i64::from(lookback_days))
            .and_then(|window| Utc::now().checked_sub_signed(window))
            .map_or(DateTime::UNIX_EPOCH, |since| since.max(DateTime::UNIX_EPOCH));
        self.fetch_since(query, since).await
    }

    /// Records from `since` onwards, newest first as the API lists them
    pub async fn fetch_since(&self, query: &SourceQuery, since: DateTime<Utc>) -> Vec<Record> {
        if query.keywords.is_empty() {
            tracing::warn!("No keywords configured for {} {}, nothing can match", query.repo, query.source);
            return Vec::new();
        }

        let since = since.to_rfc3339_opts(SecondsFormat::Secs, true);
        let mut records = Vec::new();
        let mut page = 1u32;

        loop {
            let req = PageRequest {
                repo: &query.repo,
                since: &since,
                page,
                per_page: self.per_page,
            };

            match self.fetch_page(query, req).await {
                Ok(batch) if batch.seen == 0 => {
                    tracing::debug!("{} {}: page {} is empty, done", query.repo, query.source, page);
                    break;
                }
                Ok(batch) => {
                    records.extend(batch.matched);
                    tracing::debug!(
                        "{} {}: page {} had {} entries, {} matches so far",
                        query.repo,
                        query.source,
                        page,
                        batch.seen,
                        records.len()
                    );
                }
                Err(e) => {
                    tracing::warn!(
                        "{} {}: page {} failed ({}), keeping {} records gathered so far",
                        query.repo,
                        query.source,
                        page,
                        e,
                        records.len()
                    );
                    break;
                }
            }

            page += 1;
        }

        tracing::info!(
            "{} {} since {}: {} matching records",
            query.repo,
            query.source,
            since,
            records.len()
        );
        records
    }

    async fn fetch_page(&self, query: &SourceQuery, req: PageRequest<'_>) -> Result<Page, GithubError> {
        match query.source {
            SourceKind::Commits => {
                let commits = self.github.list_commits(req).await?;
                Ok(Page {
                    seen: commits.len(),
                    matched: commits
                        .into_iter()
                        .filter_map(|c| commit_record(c, &query.keywords))
                        .collect(),
                })
            }
            SourceKind::Issues => {
                let issues = self.github.list_issues(req, query.issue_state).await?;
                Ok(Page {
                    seen: issues.len(),
                    matched: issues
                        .into_iter()
                        .filter(|i| query.include_pull_requests || !i.is_pull_request)
                        .filter_map(|i| issue_record(i, &query.keywords))
                        .collect(),
                })
            }
        }
    }
}

/// Commits match on the full message; the title is its first line
fn commit_record(commit: GithubCommit, keywords: &KeywordSet) -> Option<Record> {
    if !keywords.matches(&commit.message) {
        return None;
    }
    tracing::debug!("Commit {} matched", commit.sha);
    Some(Record {
        title: commit.message.lines().next().unwrap_or_default().to_string(),
        url: commit.html_url,
        body: commit.message,
        date: commit.committed_at,
    })
}

/// Issues match on the title only
fn issue_record(issue: GithubIssue, keywords: &KeywordSet) -> Option<Record> {
    if !keywords.matches(&issue.title) {
        return None;
    }
    tracing::debug!("Issue #{} matched", issue.number);
    Some(Record {
        title: issue.title,
        url: issue.html_url,
        body: issue.body.unwrap_or_default(),
        date: issue.created_at,
    })
}
