//! Domain entities
//!
//! Pure domain models: matched records and the keyword set that selects them.

pub mod keywords;
pub mod record;

pub use keywords::KeywordSet;
pub use record::{IssueState, Record, SourceKind};
