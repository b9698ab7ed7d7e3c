//! Domain validation errors for canonical market types.
//!
//! These errors are returned by `try_new` constructors. The market builders
//! and provider adapters create every quote through them and drop the ones
//! that fail.
//!
//! # Examples
//!
//! ```
//! use surebet::domain::error::DomainError;
//! use surebet::domain::BookmakerOdds;
//! use rust_decimal_macros::dec;
//!
//! let result = BookmakerOdds::try_new("BookA", "1x2", "home", dec!(0.95));
//! assert!(matches!(result, Err(DomainError::OddsNotAboveOne { .. })));
//! ```

use thiserror::Error;

/// Errors that occur when domain invariants are violated.
#[derive(Error, Debug, Clone)]
pub enum DomainError {
    /// Decimal odds must exceed 1 for the quote to pay more than its stake.
    #[error("odds must be greater than 1, got {odds}")]
    OddsNotAboveOne {
        /// The rejected odds value.
        odds: rust_decimal::Decimal,
    },

    /// Quotes must name the outcome they price.
    #[error("outcome key cannot be empty")]
    EmptyOutcomeKey,

    /// Quotes must name the bookmaker offering them.
    #[error("bookmaker cannot be empty")]
    EmptyBookmaker,
}
