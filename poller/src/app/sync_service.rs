//! Sync service
//!
//! One run: for every configured source, fetch matching records and merge
//! them into that source's feed file.

use std::path::PathBuf;
use std::sync::Arc;

use crate::app::fetch_service::{FetchService, SourceQuery};
use crate::config::Config;
use crate::domain::entities::SourceKind;
use crate::domain::ports::GithubClient;
use crate::error::AppError;
use crate::feed::{ChannelMeta, FeedMerger, MergeOutcome};

/// A feed to refresh
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedJob {
    pub source: SourceKind,
    pub output: PathBuf,
}

/// Result of one job
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobReport {
    pub source: SourceKind,
    pub output: PathBuf,
    pub matched: usize,
    pub outcome: MergeOutcome,
}

pub struct SyncService<GC>
where
    GC: GithubClient,
{
    fetcher: FetchService<GC>,
    config: Config,
}

impl<GC> SyncService<GC>
where
    GC: GithubClient,
{
    pub fn new(github: Arc<GC>, config: Config) -> Self {
        Self {
            fetcher: FetchService::new(github, config.page_size),
            config,
        }
    }

    /// Jobs for the configured sources, in configuration order
    pub fn jobs(&self) -> Vec<FeedJob> {
        self.config
            .sources
            .iter()
            .map(|&source| FeedJob {
                source,
                output: self.config.feed_path(source).clone(),
            })
            .collect()
    }

    fn query_for(&self, source: SourceKind) -> SourceQuery {
        SourceQuery {
            repo: self.config.repo.clone(),
            source,
            keywords: self.config.keywords.clone(),
            issue_state: self.config.issue_state,
            include_pull_requests: self.config.include_pull_requests,
        }
    }

    pub async fn run_job(&self, job: &FeedJob) -> Result<JobReport, AppError> {
        let query = self.query_for(job.source);
        let records = self.fetcher.fetch(&query, self.config.lookback_days).await;

        let merger = FeedMerger::new(
            &job.output,
            ChannelMeta::defaults_for(job.source, &self.config.repo),
        );
        let outcome = merger.merge(&records)?;

        match &outcome {
            MergeOutcome::Unchanged => {
                tracing::info!("No new {} matched, {} left as is", job.source, merger.path().display());
            }
            MergeOutcome::Written { added, total, .. } => {
                tracing::info!(
                    "Appended {} new {} to {} ({} items)",
                    added,
                    job.source,
                    merger.path().display(),
                    total
                );
            }
        }

        Ok(JobReport {
            source: job.source,
            output: job.output.clone(),
            matched: records.len(),
            outcome,
        })
    }

    /// Run every job in order; the first merge failure aborts the run
    pub async fn run(&self) -> Result<Vec<JobReport>, AppError> {
        let mut reports = Vec::new();
        for job in self.jobs() {
            reports.push(self.run_job(&job).await?);
        }
        Ok(reports)
    }
}
