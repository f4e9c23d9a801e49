//! Feed merger
//!
//! Turns matched records into RSS items and prepends them to the feed file.

use std::fs;
use std::path::{Path, PathBuf};

use rss::{Guid, Item};
use sha2::{Digest, Sha256};

use super::date::format_rfc2822;
use super::document::{ChannelMeta, FeedDocument};
use super::markdown::markdown_to_html;
use crate::domain::entities::Record;
use crate::error::FeedError;

/// What a merge did to the destination
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOutcome {
    /// Nothing to add; the file was not touched
    Unchanged,
    Written {
        added: usize,
        total: usize,
        /// SHA-256 of the bytes written, hex encoded
        digest: String,
    },
}

/// Merges record batches into one feed file
pub struct FeedMerger {
    path: PathBuf,
    defaults: ChannelMeta,
}

impl FeedMerger {
    pub fn new(path: impl Into<PathBuf>, defaults: ChannelMeta) -> Self {
        Self {
            path: path.into(),
            defaults,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Prepend `records` (in order) to the feed, creating it if needed.
    ///
    /// Items are built before the file is read, so a bad timestamp aborts
    /// without touching the destination.
    pub fn merge(&self, records: &[Record]) -> Result<MergeOutcome, FeedError> {
        if records.is_empty() {
            tracing::debug!("No records for {}, leaving it untouched", self.path.display());
            return Ok(MergeOutcome::Unchanged);
        }

        let new_items = records
            .iter()
            .map(record_to_item)
            .collect::<Result<Vec<_>, _>>()?;
        let added = new_items.len();

        let mut doc = FeedDocument::load_or_default(&self.path, &self.defaults);
        doc.prepend(new_items);
        let total = doc.items().len();

        let bytes = doc.to_xml()?;
        write_atomic(&self.path, &bytes)?;
        let digest = hex::encode(Sha256::digest(&bytes));

        tracing::debug!(
            "Wrote {} ({} new, {} total, sha256 {})",
            self.path.display(),
            added,
            total,
            digest
        );

        Ok(MergeOutcome::Written {
            added,
            total,
            digest,
        })
    }
}

/// Build the feed item for one record
pub fn record_to_item(record: &Record) -> Result<Item, FeedError> {
    let pub_date = format_rfc2822(&record.date)?;

    let mut guid = Guid::default();
    guid.set_value(record.url.clone());
    guid.set_permalink(true);

    let mut item = Item::default();
    item.set_title(record.title.clone());
    item.set_link(record.url.clone());
    item.set_description(markdown_to_html(&record.body));
    item.set_pub_date(pub_date);
    item.set_guid(guid);
    Ok(item)
}

/// Write to a sibling temp file, then rename it over `path`
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), FeedError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(|e| FeedError::io(parent, e))?;
        }
    }

    let tmp_path = path.with_extension("tmp");
    fs::write(&tmp_path, bytes).map_err(|e| FeedError::io(&tmp_path, e))?;
    fs::rename(&tmp_path, path).map_err(|e| FeedError::io(path, e))?;
    Ok(())
}
