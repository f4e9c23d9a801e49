//! Feed module
//!
//! RSS 2.0 document handling: publication dates, Markdown descriptions,
//! loading, and merging new records into the file on disk.

pub mod date;
pub mod document;
pub mod markdown;
pub mod merger;

pub use document::ChannelMeta;
pub use merger::{FeedMerger, MergeOutcome};
