//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`domain`] - Builders for quotes and markets.
//! - [`payload`] - Raw provider payloads shaped like the real feeds.

pub mod domain;
pub mod payload;
