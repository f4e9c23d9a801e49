//! Domain layer
//!
//! Contains pure logic with no I/O.
//! - `entities`: records and keyword matching
//! - `ports`: Trait definitions for external dependencies

pub mod entities;
pub mod ports;
