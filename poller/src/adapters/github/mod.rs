//! GitHub adapter
//!
//! Implementation of the GitHub REST client.

pub mod client;

pub use client::{GithubClientImpl, RetryPolicy};
