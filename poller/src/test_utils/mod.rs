//! Test utilities
//!
//! Manual mock implementations and test fixtures for unit testing.
//!
//! The GitHub port is mocked by hand: pages are queued up front and served in
//! order, and every call is recorded so tests can check paging. The real
//! client is exercised against `StubServer`, a canned-response HTTP server.

pub mod fixtures;
pub mod http;
pub mod mocks;

pub use fixtures::*;
pub use http::*;
pub use mocks::*;
