use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::domain::entities::{IssueState, KeywordSet, SourceKind};
use crate::error::ConfigError;

#[derive(Debug, Clone)]
pub struct Config {
    /// GitHub REST base URL (GitHub Enterprise uses `https://host/api/v3`)
    pub github_api_url: String,
    /// Personal access token, sent as a bearer token when set
    pub github_token: Option<String>,
    /// Repository to watch, `owner/name`
    pub repo: String,
    pub keywords: KeywordSet,
    pub lookback_days: u32,
    pub page_size: u32,
    pub http_timeout: Duration,
    pub max_retries: u32,
    /// Feeds to refresh, in order
    pub sources: Vec<SourceKind>,
    pub commits_feed_path: PathBuf,
    pub issues_feed_path: PathBuf,
    pub issue_state: IssueState,
    /// Keep pull requests returned by the issues listing
    pub include_pull_requests: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            github_api_url: "https://api.github.com".to_string(),
            github_token: None,
            repo: "pytorch/pytorch".to_string(),
            keywords: KeywordSet::new(["inductor"]),
            lookback_days: 1,
            page_size: 50,
            http_timeout: Duration::from_secs(10),
            max_retries: 3,
            sources: vec![SourceKind::Commits, SourceKind::Issues],
            commits_feed_path: PathBuf::from("commits_feed.xml"),
            issues_feed_path: PathBuf::from("issues_feed.xml"),
            issue_state: IssueState::Open,
            include_pull_requests: true,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; unset keys keep their defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let sources = match get("FEED_SOURCES") {
            Some(raw) => parse_sources(&raw)?,
            None => defaults.sources,
        };

        Ok(Self {
            github_api_url: get("GITHUB_API_URL").unwrap_or(defaults.github_api_url),
            github_token: get("GITHUB_PAT"),
            repo: match get("GITHUB_REPO") {
                Some(repo) => parse_repo(&repo)?,
                None => defaults.repo,
            },
            keywords: get("FEED_KEYWORDS")
                .map(|raw| KeywordSet::from_csv(&raw))
                .unwrap_or(defaults.keywords),
            lookback_days: parse_or("LOOKBACK_DAYS", get("LOOKBACK_DAYS"), defaults.lookback_days)?,
            page_size: parse_page_size(get("PAGE_SIZE"), defaults.page_size)?,
            http_timeout: parse_timeout(get("HTTP_TIMEOUT_SECS"), defaults.http_timeout)?,
            max_retries: parse_or("HTTP_MAX_RETRIES", get("HTTP_MAX_RETRIES"), defaults.max_retries)?,
            sources,
            commits_feed_path: get("COMMITS_FEED_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.commits_feed_path),
            issues_feed_path: get("ISSUES_FEED_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.issues_feed_path),
            issue_state: parse_or("ISSUE_STATE", get("ISSUE_STATE"), defaults.issue_state)?,
            include_pull_requests: match get("INCLUDE_PULL_REQUESTS") {
                Some(raw) => parse_bool("INCLUDE_PULL_REQUESTS", &raw)?,
                None => defaults.include_pull_requests,
            },
        })
    }

    /// Destination file for a source
    pub fn feed_path(&self, source: SourceKind) -> &PathBuf {
        match source {
            SourceKind::Commits => &self.commits_feed_path,
            SourceKind::Issues => &self.issues_feed_path,
        }
    }
}

fn invalid(key: &'static str, value: &str, reason: impl ToString) -> ConfigError {
    ConfigError::Invalid {
        key,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn parse_or<T>(key: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: ToString,
{
    match raw {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| invalid(key, &raw, e)),
        None => Ok(default),
    }
}

fn parse_page_size(raw: Option<String>, default: u32) -> Result<u32, ConfigError> {
    let size = parse_or("PAGE_SIZE", raw, default)?;
    // GitHub caps per_page at 100
    if size == 0 || size > 100 {
        return Err(invalid("PAGE_SIZE", &size.to_string(), "must be between 1 and 100"));
    }
    Ok(size)
}

fn parse_timeout(raw: Option<String>, default: Duration) -> Result<Duration, ConfigError> {
    let secs = parse_or("HTTP_TIMEOUT_SECS", raw, default.as_secs())?;
    if secs == 0 {
        return Err(invalid("HTTP_TIMEOUT_SECS", "0", "must be at least 1"));
    }
    Ok(Duration::from_secs(secs))
}

fn parse_bool(key: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(invalid(key, raw, "expected true or false")),
    }
}

fn parse_repo(raw: &str) -> Result<String, ConfigError> {
    let repo = raw.trim().trim_matches('/');
    let mut parts = repo.split('/');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(owner), Some(name), None) if !owner.is_empty() && !name.is_empty() => {
            Ok(repo.to_string())
        }
        _ => Err(invalid("GITHUB_REPO", raw, "expected owner/name")),
    }
}

fn parse_sources(raw: &str) -> Result<Vec<SourceKind>, ConfigError> {
    let mut sources = Vec::new();
    for part in raw.split(',').filter(|p| !p.trim().is_empty()) {
        let source: SourceKind = part.parse().map_err(|e| invalid("FEED_SOURCES", raw, e))?;
        if !sources.contains(&source) {
            sources.push(source);
        }
    }
    Ok(sources)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn from_pairs(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = from_pairs(&[]).unwrap();
        assert_eq!(config.github_api_url, "https://api.github.com");
        assert_eq!(config.repo, "pytorch/pytorch");
        assert!(config.keywords.matches("Inductor"));
        assert_eq!(config.lookback_days, 1);
        assert_eq!(config.page_size, 50);
        assert_eq!(config.http_timeout, Duration::from_secs(10));
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.sources, vec![SourceKind::Commits, SourceKind::Issues]);
        assert_eq!(config.issue_state, IssueState::Open);
        assert!(config.include_pull_requests);
        assert!(config.github_token.is_none());
    }

    #[test]
    fn reads_every_key() {
        let config = from_pairs(&[
            ("GITHUB_API_URL", "https://ghe.example.com/api/v3"),
            ("GITHUB_PAT", "ghp_x"),
            ("GITHUB_REPO", "rust-lang/rust"),
            ("FEED_KEYWORDS", "borrowck, NLL"),
            ("LOOKBACK_DAYS", "7"),
            ("PAGE_SIZE", "100"),
            ("HTTP_TIMEOUT_SECS", "30"),
            ("HTTP_MAX_RETRIES", "0"),
            ("FEED_SOURCES", "issues"),
            ("COMMITS_FEED_PATH", "out/c.xml"),
            ("ISSUES_FEED_PATH", "out/i.xml"),
            ("ISSUE_STATE", "all"),
            ("INCLUDE_PULL_REQUESTS", "no"),
        ])
        .unwrap();

        assert_eq!(config.github_api_url, "https://ghe.example.com/api/v3");
        assert_eq!(config.github_token.as_deref(), Some("ghp_x"));
        assert_eq!(config.repo, "rust-lang/rust");
        assert_eq!(config.keywords.len(), 2);
        assert!(config.keywords.matches("nll fix"));
        assert_eq!(config.lookback_days, 7);
        assert_eq!(config.page_size, 100);
        assert_eq!(config.http_timeout, Duration::from_secs(30));
        assert_eq!(config.max_retries, 0);
        assert_eq!(config.sources, vec![SourceKind::Issues]);
        assert_eq!(config.feed_path(SourceKind::Commits), &PathBuf::from("out/c.xml"));
        assert_eq!(config.feed_path(SourceKind::Issues), &PathBuf::from("out/i.xml"));
        assert_eq!(config.issue_state, IssueState::All);
        assert!(!config.include_pull_requests);
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let config = from_pairs(&[("GITHUB_PAT", "  "), ("LOOKBACK_DAYS", "")]).unwrap();
        assert!(config.github_token.is_none());
        assert_eq!(config.lookback_days, 1);
    }

    #[test]
    fn rejects_bad_numbers() {
        let err = from_pairs(&[("LOOKBACK_DAYS", "a week")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "LOOKBACK_DAYS", .. }));
    }

    #[test]
    fn rejects_out_of_range_page_size() {
        assert!(from_pairs(&[("PAGE_SIZE", "0")]).is_err());
        assert!(from_pairs(&[("PAGE_SIZE", "101")]).is_err());
    }

    #[test]
    fn rejects_zero_timeout() {
        let err = from_pairs(&[("HTTP_TIMEOUT_SECS", "0")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "HTTP_TIMEOUT_SECS", .. }));
        assert_eq!(
            from_pairs(&[("HTTP_TIMEOUT_SECS", "1")]).unwrap().http_timeout,
            Duration::from_secs(1)
        );
    }

    #[test]
    fn rejects_malformed_repo() {
        for repo in ["pytorch", "a/b/c", "/name"] {
            assert!(from_pairs(&[("GITHUB_REPO", repo)]).is_err(), "repo: {repo}");
        }
        assert_eq!(
            from_pairs(&[("GITHUB_REPO", "/owner/name/")]).unwrap().repo,
            "owner/name"
        );
    }

    #[test]
    fn rejects_unknown_source_and_state() {
        assert!(from_pairs(&[("FEED_SOURCES", "commits,pulls")]).is_err());
        assert!(from_pairs(&[("ISSUE_STATE", "merged")]).is_err());
        assert!(from_pairs(&[("INCLUDE_PULL_REQUESTS", "maybe")]).is_err());
    }

    #[test]
    fn duplicate_sources_collapse() {
        let config = from_pairs(&[("FEED_SOURCES", "commits, commits,issues")]).unwrap();
        assert_eq!(config.sources, vec![SourceKind::Commits, SourceKind::Issues]);
    }
}
