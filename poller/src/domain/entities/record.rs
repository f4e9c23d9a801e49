//! Record domain entity
//!
//! A record is one matched commit or issue pulled from GitHub. Records only
//! live for one run: the fetcher produces them, the merger turns each one into
//! a feed item.

/// One matched commit or issue
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub title: String,
    pub url: String,
    /// Raw commit message or issue body (Markdown)
    pub body: String,
    /// Publication timestamp, as reported by the source
    pub date: String,
}

/// Which listing a feed is built from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    Commits,
    Issues,
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceKind::Commits => write!(f, "commits"),
            SourceKind::Issues => write!(f, "issues"),
        }
    }
}

impl std::str::FromStr for SourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "commits" => Ok(SourceKind::Commits),
            "issues" => Ok(SourceKind::Issues),
            _ => Err(format!("Unknown source kind: {}", s)),
        }
    }
}

/// Issue state filter for the issues listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueState {
    Open,
    Closed,
    All,
}

impl std::fmt::Display for IssueState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IssueState::Open => write!(f, "open"),
            IssueState::Closed => write!(f, "closed"),
            IssueState::All => write!(f, "all"),
        }
    }
}

impl std::str::FromStr for IssueState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "open" => Ok(IssueState::Open),
            "closed" => Ok(IssueState::Closed),
            "all" => Ok(IssueState::All),
            _ => Err(format!("Unknown issue state: {}", s)),
        }
    }
}
