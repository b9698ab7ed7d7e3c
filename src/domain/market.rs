//! Canonical market and quote types.
//!
//! Every provider adapter converges on [`MarketOdds`]: one real-world betting
//! market on one event, holding the competing [`BookmakerOdds`] quotes for its
//! outcomes. Quotes for the same outcome share an `outcome_key`, which is the
//! join key used when picking the best price across bookmakers.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::trace;

use super::error::DomainError;
use super::money::{is_usable_odds, Odds};

/// Market label used by the three-way builder when none is given.
pub const THREE_WAY_MARKET: &str = "1x2";

/// Canonical outcome keys of a three-way market.
pub const HOME: &str = "home";
pub const DRAW: &str = "draw";
pub const AWAY: &str = "away";

/// Default outcome keys of a two-way market.
pub const SIDE_A: &str = "a";
pub const SIDE_B: &str = "b";

/// One bookmaker's price for one outcome of a market.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookmakerOdds {
    pub bookmaker: String,
    pub market: String,
    pub outcome_key: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub odds: Odds,
}

impl BookmakerOdds {
    /// Create a quote, validating that it could ever pay out more than its stake.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError`] when the bookmaker or outcome key is empty, or
    /// when `odds <= 1`.
    pub fn try_new(
        bookmaker: impl Into<String>,
        market: impl Into<String>,
        outcome_key: impl Into<String>,
        odds: Odds,
    ) -> Result<Self, DomainError> {
        let bookmaker = bookmaker.into();
        let outcome_key = outcome_key.into();

        if bookmaker.trim().is_empty() {
            return Err(DomainError::EmptyBookmaker);
        }
        if outcome_key.trim().is_empty() {
            return Err(DomainError::EmptyOutcomeKey);
        }
        if !is_usable_odds(odds) {
            return Err(DomainError::OddsNotAboveOne { odds });
        }

        Ok(Self {
            bookmaker,
            market: market.into(),
            outcome_key,
            odds,
        })
    }

    /// Implied probability of this price (`1 / odds`).
    ///
    /// `None` for odds that are not positive.
    pub fn implied_probability(&self) -> Option<Odds> {
        if self.odds <= Odds::ZERO {
            return None;
        }
        Odds::ONE.checked_div(self.odds)
    }
}

/// The full set of competing quotes for one market on one event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketOdds {
    #[serde(default)]
    pub sport: String,
    #[serde(default)]
    pub league: String,
    #[serde(default, rename = "match")]
    pub match_name: String,
    #[serde(default)]
    pub market: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub selections: Vec<BookmakerOdds>,
}

impl MarketOdds {
    /// Grouping key used to merge the same market across providers.
    pub fn key(&self) -> MarketKey {
        MarketKey::new(&self.sport, &self.league, &self.match_name, &self.market)
    }
}

/// Normalized identity of a market: (sport, league, match, market type).
///
/// Components are trimmed and ASCII-lowercased so that cosmetic differences
/// between providers do not split one market into several.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MarketKey {
    sport: String,
    league: String,
    match_name: String,
    market: String,
}

impl MarketKey {
    pub fn new(sport: &str, league: &str, match_name: &str, market: &str) -> Self {
        Self {
            sport: normalize(sport),
            league: normalize(league),
            match_name: normalize(match_name),
            market: normalize(market),
        }
    }
}

fn normalize(part: &str) -> String {
    part.trim().to_ascii_lowercase()
}

/// Event identity shared by the market builders.
#[derive(Debug, Clone, Default)]
pub struct MarketParams {
    pub sport: String,
    pub league: String,
    pub match_name: String,
    /// Market label; builders fall back to their own default when `None`.
    pub market: Option<String>,
}

impl MarketParams {
    pub fn new(
        sport: impl Into<String>,
        league: impl Into<String>,
        match_name: impl Into<String>,
    ) -> Self {
        Self {
            sport: sport.into(),
            league: league.into(),
            match_name: match_name.into(),
            market: None,
        }
    }

    /// Set the market label.
    pub fn market(mut self, market: impl Into<String>) -> Self {
        self.market = Some(market.into());
        self
    }
}

/// One bookmaker's home/draw/away prices.
#[derive(Debug, Clone, Default)]
pub struct ThreeWayOdds {
    pub bookmaker: String,
    pub home: Option<Odds>,
    pub draw: Option<Odds>,
    pub away: Option<Odds>,
}

/// One bookmaker's prices for the two sides of a two-way market.
#[derive(Debug, Clone, Default)]
pub struct TwoWayOdds {
    pub bookmaker: String,
    pub outcome_a: Option<Odds>,
    pub outcome_b: Option<Odds>,
    /// Outcome key for side A, defaults to [`SIDE_A`].
    pub key_a: Option<String>,
    /// Outcome key for side B, defaults to [`SIDE_B`].
    pub key_b: Option<String>,
}

/// Build a three-way (home/draw/away) market for one bookmaker.
///
/// Emits one quote per present price; prices at or below 1 are dropped
/// because they can never contribute to a profit.
pub fn build_three_way(params: MarketParams, odds: ThreeWayOdds) -> MarketOdds {
    let market = params
        .market
        .unwrap_or_else(|| THREE_WAY_MARKET.to_string());

    let selections = [(HOME, odds.home), (DRAW, odds.draw), (AWAY, odds.away)]
        .into_iter()
        .filter_map(|(key, price)| quote(&odds.bookmaker, &market, key, price))
        .collect();

    MarketOdds {
        sport: params.sport,
        league: params.league,
        match_name: params.match_name,
        market,
        updated_at: None,
        selections,
    }
}

/// Build a two-way market for one bookmaker.
///
/// Missing or empty keys fall back to [`SIDE_A`] / [`SIDE_B`].
pub fn build_two_way(params: MarketParams, odds: TwoWayOdds) -> MarketOdds {
    let market = params.market.unwrap_or_default();
    let key_a = non_empty(odds.key_a).unwrap_or_else(|| SIDE_A.to_string());
    let key_b = non_empty(odds.key_b).unwrap_or_else(|| SIDE_B.to_string());

    let selections = [(key_a.as_str(), odds.outcome_a), (key_b.as_str(), odds.outcome_b)]
        .into_iter()
        .filter_map(|(key, price)| quote(&odds.bookmaker, &market, key, price))
        .collect();

    MarketOdds {
        sport: params.sport,
        league: params.league,
        match_name: params.match_name,
        market,
        updated_at: None,
        selections,
    }
}

fn quote(bookmaker: &str, market: &str, key: &str, price: Option<Odds>) -> Option<BookmakerOdds> {
    match BookmakerOdds::try_new(bookmaker, market, key, price?) {
        Ok(quote) => Some(quote),
        Err(err) => {
            trace!(bookmaker, key, error = %err, "Dropped quote");
            None
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Merge markets describing the same real-world market into one.
///
/// Markets are grouped by [`MarketKey`]; selections are concatenated in input
/// order, so the engine's first-seen tie-break follows provider order. The
/// first market of each group supplies the displayed names, and the latest
/// `updated_at` present in the group is kept. Groups come out in first-seen
/// order.
pub fn merge_markets(markets: Vec<MarketOdds>) -> Vec<MarketOdds> {
    let mut merged: Vec<MarketOdds> = Vec::with_capacity(markets.len());
    let mut index: HashMap<MarketKey, usize> = HashMap::new();

    for market in markets {
        let key = market.key();
        match index.get(&key).copied() {
            Some(slot) => {
                let target = &mut merged[slot];
                target.updated_at = match (target.updated_at, market.updated_at) {
                    (Some(a), Some(b)) => Some(a.max(b)),
                    (a, b) => a.or(b),
                };
                target.selections.extend(market.selections);
            }
            None => {
                index.insert(key, merged.len());
                merged.push(market);
            }
        }
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn params() -> MarketParams {
        MarketParams::new("Football", "Test League", "A - B")
    }

    #[test]
    fn three_way_builder_emits_one_quote_per_present_price() {
        let market = build_three_way(
            params(),
            ThreeWayOdds {
                bookmaker: "BookA".into(),
                home: Some(dec!(2.2)),
                draw: None,
                away: Some(dec!(3.0)),
            },
        );

        assert_eq!(market.market, "1x2");
        assert_eq!(market.selections.len(), 2);
        assert_eq!(market.selections[0].outcome_key, HOME);
        assert_eq!(market.selections[1].outcome_key, AWAY);
        assert!(market.selections.iter().all(|s| s.bookmaker == "BookA"));
        assert!(market.updated_at.is_none());
    }

    #[test]
    fn three_way_builder_keeps_custom_market_label() {
        let market = build_three_way(
            params().market("Full Time Result"),
            ThreeWayOdds {
                bookmaker: "BookA".into(),
                home: Some(dec!(2.0)),
                draw: Some(dec!(3.0)),
                away: Some(dec!(4.0)),
            },
        );

        assert_eq!(market.market, "Full Time Result");
        assert!(market.selections.iter().all(|s| s.market == "Full Time Result"));
    }

    #[test]
    fn builders_drop_prices_that_cannot_profit() {
        let market = build_three_way(
            params(),
            ThreeWayOdds {
                bookmaker: "BookA".into(),
                home: Some(dec!(1)),
                draw: Some(dec!(0)),
                away: Some(dec!(-3)),
            },
        );

        assert!(market.selections.is_empty());
    }

    #[test]
    fn two_way_builder_defaults_keys() {
        let market = build_two_way(
            params().market("Match Winner"),
            TwoWayOdds {
                bookmaker: "BookA".into(),
                outcome_a: Some(dec!(1.6)),
                outcome_b: Some(dec!(2.1)),
                key_a: None,
                key_b: Some(String::new()),
            },
        );

        let keys: Vec<_> = market.selections.iter().map(|s| s.outcome_key.as_str()).collect();
        assert_eq!(keys, vec![SIDE_A, SIDE_B]);
    }

    #[test]
    fn two_way_builder_uses_supplied_keys() {
        let market = build_two_way(
            params().market("Winner"),
            TwoWayOdds {
                bookmaker: "X".into(),
                outcome_a: Some(dec!(2.1)),
                outcome_b: None,
                key_a: Some("F1".into()),
                key_b: Some("F2".into()),
            },
        );

        assert_eq!(market.selections.len(), 1);
        assert_eq!(market.selections[0].outcome_key, "F1");
    }

    #[test]
    fn try_new_validates_quote() {
        assert!(BookmakerOdds::try_new("A", "1x2", "home", dec!(1.5)).is_ok());
        assert!(matches!(
            BookmakerOdds::try_new("A", "1x2", "home", dec!(1)),
            Err(DomainError::OddsNotAboveOne { .. })
        ));
        assert!(matches!(
            BookmakerOdds::try_new("A", "1x2", " ", dec!(2)),
            Err(DomainError::EmptyOutcomeKey)
        ));
        assert!(matches!(
            BookmakerOdds::try_new("", "1x2", "home", dec!(2)),
            Err(DomainError::EmptyBookmaker)
        ));
    }

    #[test]
    fn merge_groups_by_normalized_key_in_first_seen_order() {
        let a = build_three_way(
            params(),
            ThreeWayOdds {
                bookmaker: "BookA".into(),
                home: Some(dec!(2.2)),
                draw: Some(dec!(3.1)),
                away: Some(dec!(3.0)),
            },
        );
        let other = build_three_way(
            MarketParams::new("Football", "Test League", "C - D"),
            ThreeWayOdds {
                bookmaker: "BookA".into(),
                home: Some(dec!(1.9)),
                draw: Some(dec!(3.3)),
                away: Some(dec!(4.0)),
            },
        );
        let b = build_three_way(
            MarketParams::new(" football", "TEST LEAGUE ", "a - b"),
            ThreeWayOdds {
                bookmaker: "BookB".into(),
                home: Some(dec!(2.05)),
                draw: Some(dec!(3.4)),
                away: Some(dec!(2.8)),
            },
        );

        let merged = merge_markets(vec![a, other, b]);

        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].match_name, "A - B");
        assert_eq!(merged[0].selections.len(), 6);
        assert_eq!(merged[0].selections[0].bookmaker, "BookA");
        assert_eq!(merged[0].selections[3].bookmaker, "BookB");
        assert_eq!(merged[1].match_name, "C - D");
    }

    #[test]
    fn merge_keeps_latest_timestamp() {
        let early = DateTime::parse_from_rfc3339("2024-05-01T10:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let late = DateTime::parse_from_rfc3339("2024-05-01T10:05:00Z")
            .unwrap()
            .with_timezone(&Utc);

        let mut first = build_two_way(params().market("Winner"), TwoWayOdds::default());
        first.updated_at = Some(late);
        let mut second = first.clone();
        second.updated_at = Some(early);
        let third = build_two_way(params().market("Winner"), TwoWayOdds::default());

        let merged = merge_markets(vec![first, second, third]);

        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].updated_at, Some(late));
    }

    #[test]
    fn market_deserializes_from_camel_case_json() {
        let json = r#"{
            "sport": "Tennis",
            "league": "ATP",
            "match": "A - B",
            "market": "Match Winner",
            "selections": [
                {"bookmaker": "BookA", "market": "Match Winner", "outcomeKey": "A", "odds": 1.6}
            ]
        }"#;

        let market: MarketOdds = serde_json::from_str(json).unwrap();

        assert_eq!(market.match_name, "A - B");
        assert_eq!(market.selections[0].outcome_key, "A");
        assert_eq!(market.selections[0].odds, dec!(1.6));
        assert!(market.updated_at.is_none());
    }
}
