//! GitHub API client implementation

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use urlencoding::encode;

use crate::domain::entities::IssueState;
use crate::domain::ports::{GithubClient, GithubCommit, GithubIssue, PageRequest};
use crate::error::GithubError;

/// Status codes worth another attempt
const RETRY_STATUSES: [u16; 4] = [408, 500, 502, 504];

/// Bounded retry with exponential backoff
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Extra attempts after the first request
    pub max_retries: u32,
    /// Delay before the first retry; doubles for every retry after it
    pub backoff_base: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            backoff_base: Duration::from_millis(300),
        }
    }
}

impl RetryPolicy {
    pub fn should_retry(&self, status: StatusCode) -> bool {
        RETRY_STATUSES.contains(&status.as_u16())
    }

    pub fn is_retryable_error(&self, err: &reqwest::Error) -> bool {
        err.is_timeout() || err.is_connect()
    }

    /// Delay before retry number `attempt` (1-based)
    pub fn backoff(&self, attempt: u32) -> Duration {
        let capped = attempt.saturating_sub(1).min(5);
        self.backoff_base * (1u32 << capped)
    }
}

/// Implementation of the GitHub API client
pub struct GithubClientImpl {
    http: Client,
    base_url: String,
    token: Option<String>,
    retry: RetryPolicy,
}

impl GithubClientImpl {
    pub fn new(
        base_url: &str,
        token: Option<String>,
        timeout: Duration,
        retry: RetryPolicy,
    ) -> Result<Self, GithubError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "X-GitHub-Api-Version",
            HeaderValue::from_static("2022-11-28"),
        );

        let http = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.filter(|t| !t.trim().is_empty()),
            retry,
        })
    }

    fn repo_url(&self, repo: &str, path: &str) -> String {
        let repo = repo
            .trim_matches('/')
            .split('/')
            .map(|segment| encode(segment).into_owned())
            .collect::<Vec<_>>()
            .join("/");
        format!("{}/repos/{}{}", self.base_url, repo, path)
    }

    /// GET with retries; the final failure is returned as-is
    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T, GithubError> {
        let mut attempt = 0u32;
        loop {
            let mut request = self.http.get(url).query(query);
            if let Some(token) = &self.token {
                request = request.bearer_auth(token);
            }

            match request.send().await {
                Ok(resp) => {
                    let status = resp.status();
                    if status.is_success() {
                        let text = resp.text().await?;
                        return serde_json::from_str(&text)
                            .map_err(|e| GithubError::Deserialization(e.to_string()));
                    }

                    if self.retry.should_retry(status) && attempt < self.retry.max_retries {
                        attempt += 1;
                        let delay = self.retry.backoff(attempt);
                        tracing::warn!(
                            "GET {} returned {}, retrying in {:?} ({}/{})",
                            url,
                            status,
                            delay,
                            attempt,
                            self.retry.max_retries
                        );
                        tokio::time::sleep(delay).await;
                        continue;
                    }

                    return Err(self.status_error(resp).await);
                }
                Err(err) => {
                    if self.retry.is_retryable_error(&err) && attempt < self.retry.max_retries {
                        attempt += 1;
                        let delay = self.retry.backoff(attempt);
                        tracing::warn!(
                            "GET {} failed: {}, retrying in {:?} ({}/{})",
                            url,
                            err,
                            delay,
                            attempt,
                            self.retry.max_retries
                        );
                        tokio::time::sleep(delay).await;
                        continue;
                    }
                    return Err(err.into());
                }
            }
        }
    }

    async fn status_error(&self, response: reqwest::Response) -> GithubError {
        let status = response.status();
        let rate_limit_exhausted = response
            .headers()
            .get("x-ratelimit-remaining")
            .is_some_and(|v| v.as_bytes() == b"0");

        match status {
            StatusCode::UNAUTHORIZED => GithubError::Unauthorized,
            StatusCode::TOO_MANY_REQUESTS => GithubError::RateLimited,
            StatusCode::FORBIDDEN if rate_limit_exhausted => GithubError::RateLimited,
            _ => {
                let message = response.text().await.unwrap_or_default();
                GithubError::Api {
                    status: status.as_u16(),
                    message,
                }
            }
        }
    }
}

/// Response types from GitHub API
#[derive(Deserialize)]
struct GithubCommitResponse {
    sha: String,
    html_url: String,
    commit: GithubCommitDetail,
}

#[derive(Deserialize)]
struct GithubCommitDetail {
    message: String,
    committer: GithubSignature,
}

#[derive(Deserialize)]
struct GithubSignature {
    date: String,
}

impl From<GithubCommitResponse> for GithubCommit {
    fn from(r: GithubCommitResponse) -> Self {
        GithubCommit {
            sha: r.sha,
            html_url: r.html_url,
            message: r.commit.message,
            committed_at: r.commit.committer.date,
        }
    }
}

#[derive(Deserialize)]
struct GithubIssueResponse {
    number: i64,
    title: String,
    body: Option<String>,
    html_url: String,
    created_at: String,
    #[serde(default)]
    pull_request: Option<serde_json::Value>,
}

impl From<GithubIssueResponse> for GithubIssue {
    fn from(r: GithubIssueResponse) -> Self {
        GithubIssue {
            number: r.number,
            title: r.title,
            body: r.body,
            html_url: r.html_url,
            created_at: r.created_at,
            is_pull_request: r.pull_request.is_some(),
        }
    }
}

fn page_query(req: &PageRequest<'_>) -> Vec<(&'static str, String)> {
    vec![
        ("since", req.since.to_string()),
        ("page", req.page.to_string()),
        ("per_page", req.per_page.to_string()),
    ]
}

#[async_trait]
impl GithubClient for GithubClientImpl {
    async fn list_commits(&self, req: PageRequest<'_>) -> Result<Vec<GithubCommit>, GithubError> {
        let url = self.repo_url(req.repo, "/commits");
        let commits: Vec<GithubCommitResponse> = self.get_json(&url, &page_query(&req)).await?;
        Ok(commits.into_iter().map(Into::into).collect())
    }

    async fn list_issues(
        &self,
        req: PageRequest<'_>,
        state: IssueState,
    ) -> Result<Vec<GithubIssue>, GithubError> {
        let url = self.repo_url(req.repo, "/issues");
        let mut query = vec![("state", state.to_string())];
        query.extend(page_query(&req));
        let issues: Vec<GithubIssueResponse> = self.get_json(&url, &query).await?;
        Ok(issues.into_iter().map(Into::into).collect())
    }
}
