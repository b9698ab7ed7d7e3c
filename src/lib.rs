//! Surebet - cross-bookmaker arbitrage detection.
//!
//! This crate normalizes odds from independent bookmaking sources into one
//! canonical market model and detects "surebets": markets where the best
//! prices across bookmakers cover every outcome for less than the payout, so
//! a split stake guarantees a profit whatever the result.
//!
//! # Architecture
//!
//! - **Provider adapters** turn each source's untrusted payload into
//!   canonical [`domain::MarketOdds`] records, dropping malformed fields
//!   instead of failing.
//! - **The detector** keeps the best price per outcome, tests the
//!   implied-probability sum, and computes an equal-payout stake split.
//!
//! # Modules
//!
//! - [`config`] - Configuration loading from TOML files
//! - [`domain`] - Canonical market model and the arbitrage detector
//! - [`adapter`] - Provider adapters and concurrent payload fetching
//! - [`app`] - Detection cycles and the HTTP service
//! - [`cli`] - Command-line interface
//! - [`error`] - Error types for the crate
//!
//! # Example
//!
//! ```
//! use surebet::domain::{build_two_way, detect, DetectorConfig, MarketParams, TwoWayOdds};
//! use rust_decimal_macros::dec;
//!
//! let market = build_two_way(
//!     MarketParams::new("Tennis", "ATP", "A - B").market("Match Winner"),
//!     TwoWayOdds {
//!         bookmaker: "BookA".into(),
//!         outcome_a: Some(dec!(2.1)),
//!         outcome_b: Some(dec!(2.1)),
//!         ..Default::default()
//!     },
//! );
//!
//! let surebets = detect(&[market], &DetectorConfig::default());
//! assert_eq!(surebets[0].roi, dec!(5.00));
//! ```

pub mod adapter;
pub mod app;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
