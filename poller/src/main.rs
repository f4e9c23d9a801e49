//! commitwatch
//!
//! Polls a GitHub repository's commits and issues, keeps the entries that
//! mention one of the configured keywords, and prepends them to RSS feed files.
//! Uses hexagonal (ports & adapters) architecture for clean separation of concerns.
//!
//! Meant to run as a periodic job; one invocation per schedule tick.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod adapters;
mod app;
mod config;
mod domain;
mod error;
mod feed;

#[cfg(test)]
mod test_utils;


use adapters::{GithubClientImpl, RetryPolicy};
use app::SyncService;
use config::Config;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,commitwatch=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting commitwatch...");

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    if config.github_token.is_none() {
        tracing::warn!("GITHUB_PAT not set, sending unauthenticated requests");
    }
    tracing::info!(
        "Watching {} for {} keyword(s) [{}] over the last {} day(s)",
        config.repo,
        config.keywords.len(),
        config.keywords.iter().collect::<Vec<_>>().join(", "),
        config.lookback_days
    );

    // Create adapters
    let github = Arc::new(
        GithubClientImpl::new(
            &config.github_api_url,
            config.github_token.clone(),
            config.http_timeout,
            RetryPolicy {
                max_retries: config.max_retries,
                ..RetryPolicy::default()
            },
        )
        .context("Failed to build GitHub client")?,
    );

    let service = SyncService::new(github, config);
    let reports = service.run().await?;

    tracing::info!("Done, {} feed(s) processed", reports.len());
    Ok(())
}
