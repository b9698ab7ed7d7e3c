//! Detected arbitrage opportunities.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::money::{Amount, Odds};

/// One leg of a surebet: the stake to place on one outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurebetBet {
    pub bookmaker: String,
    pub market: String,
    pub outcome_key: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub odds: Odds,
    /// Stake for this leg, rounded to two decimals.
    #[serde(with = "rust_decimal::serde::float")]
    pub stake: Amount,
}

/// A detected arbitrage with an executable stake plan.
///
/// `id` is unique within one detection run only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Surebet {
    pub id: String,
    /// Guaranteed return in percent, rounded to two decimals.
    #[serde(with = "rust_decimal::serde::float")]
    pub roi: Amount,
    /// Guaranteed profit in the stake unit, rounded to two decimals.
    #[serde(with = "rust_decimal::serde::float")]
    pub profit: Amount,
    pub sport: String,
    pub league: String,
    #[serde(rename = "match")]
    pub match_name: String,
    pub market: String,
    pub updated_at: DateTime<Utc>,
    pub bets: Vec<SurebetBet>,
}

impl Surebet {
    /// Sum of the rounded leg stakes.
    pub fn total_stake(&self) -> Amount {
        self.bets.iter().map(|bet| bet.stake).sum()
    }
}
