//! Application layer
//!
//! Contains use cases and service orchestration.
//! Services coordinate between domain entities, ports, and the feed file.

pub mod fetch_service;
pub mod sync_service;

pub use sync_service::SyncService;
