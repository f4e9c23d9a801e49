//! GitHub client port trait
//!
//! Defines the interface for listing repository history from GitHub.

use async_trait::async_trait;

use crate::domain::entities::IssueState;
use crate::error::GithubError;

/// GitHub commit representation
#[derive(Debug, Clone)]
pub struct GithubCommit {
    pub sha: String,
    pub html_url: String,
    pub message: String,
    /// Committer date (ISO 8601)
    pub committed_at: String,
}

/// GitHub issue representation (pull requests show up here too)
#[derive(Debug, Clone)]
pub struct GithubIssue {
    pub number: i64,
    pub title: String,
    pub body: Option<String>,
    pub html_url: String,
    pub created_at: String,
    pub is_pull_request: bool,
}

/// One page of a listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest<'a> {
    /// `owner/name`
    pub repo: &'a str,
    /// RFC 3339 cutoff, passed as `since`
    pub since: &'a str,
    /// 1-based page number
    pub page: u32,
    pub per_page: u32,
}

/// Port trait for GitHub API operations
#[async_trait]
pub trait GithubClient: Send + Sync {
    /// List commits on the default branch, newest first
    async fn list_commits(&self, req: PageRequest<'_>) -> Result<Vec<GithubCommit>, GithubError>;

    /// List issues updated since the cutoff, newest first
    async fn list_issues(
        &self,
        req: PageRequest<'_>,
        state: IssueState,
    ) -> Result<Vec<GithubIssue>, GithubError>;
}
