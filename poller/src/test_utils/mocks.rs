//! Mock implementations of port traits
//!
//! In-memory implementations that can be configured for testing.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::domain::entities::IssueState;
use crate::domain::ports::{GithubClient, GithubCommit, GithubIssue, PageRequest};
use crate::error::GithubError;

// ============================================================================
// Mock GitHub Client
// ============================================================================

/// One recorded listing call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockCall {
    pub repo: String,
    pub since: String,
    pub page: u32,
    pub per_page: u32,
    /// Set for issue listings
    pub state: Option<IssueState>,
}

/// Serves queued pages in order; an exhausted queue answers with empty pages
#[derive(Default)]
pub struct MockGithubClient {
    commit_pages: Arc<Mutex<VecDeque<Result<Vec<GithubCommit>, GithubError>>>>,
    issue_pages: Arc<Mutex<VecDeque<Result<Vec<GithubIssue>, GithubError>>>>,
    calls: Arc<Mutex<Vec<MockCall>>>,
}

impl MockGithubClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_commit_page(self, commits: Vec<GithubCommit>) -> Self {
        self.commit_pages.lock().unwrap().push_back(Ok(commits));
        self
    }

    pub fn with_commit_failure(self, error: GithubError) -> Self {
        self.commit_pages.lock().unwrap().push_back(Err(error));
        self
    }

    pub fn with_issue_page(self, issues: Vec<GithubIssue>) -> Self {
        self.issue_pages.lock().unwrap().push_back(Ok(issues));
        self
    }

    pub fn with_issue_failure(self, error: GithubError) -> Self {
        self.issue_pages.lock().unwrap().push_back(Err(error));
        self
    }

    pub fn calls(&self) -> Vec<MockCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, req: &PageRequest<'_>, state: Option<IssueState>) {
        self.calls.lock().unwrap().push(MockCall {
            repo: req.repo.to_string(),
            since: req.since.to_string(),
            page: req.page,
            per_page: req.per_page,
            state,
        });
    }
}

#[async_trait]
impl GithubClient for MockGithubClient {
    async fn list_commits(&self, req: PageRequest<'_>) -> Result<Vec<GithubCommit>, GithubError> {
        self.record(&req, None);
        self.commit_pages
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn list_issues(
        &self,
        req: PageRequest<'_>,
        state: IssueState,
    ) -> Result<Vec<GithubIssue>, GithubError> {
        self.record(&req, Some(state));
        self.issue_pages
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}
