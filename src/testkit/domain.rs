//! Builders for domain primitives used across tests.
//!
//! Provides concise factory functions for [`BookmakerOdds`] and
//! [`MarketOdds`] so tests focus on assertions rather than construction
//! boilerplate.

use rust_decimal::Decimal;

use crate::domain::{
    build_three_way, build_two_way, BookmakerOdds, MarketOdds, MarketParams, ThreeWayOdds,
    TwoWayOdds,
};

/// Create a quote in a `1x2` market.
pub fn quote(bookmaker: &str, outcome_key: &str, odds: Decimal) -> BookmakerOdds {
    BookmakerOdds {
        bookmaker: bookmaker.to_string(),
        market: "1x2".to_string(),
        outcome_key: outcome_key.to_string(),
        odds,
    }
}

/// Create a football `1x2` market for `match_name` with the given quotes.
pub fn market(match_name: &str, selections: Vec<BookmakerOdds>) -> MarketOdds {
    MarketOdds {
        sport: "Football".to_string(),
        league: "Test League".to_string(),
        match_name: match_name.to_string(),
        market: "1x2".to_string(),
        updated_at: None,
        selections,
    }
}

/// One bookmaker's complete home/draw/away market for `match_name`.
pub fn three_way(
    match_name: &str,
    bookmaker: &str,
    home: Decimal,
    draw: Decimal,
    away: Decimal,
) -> MarketOdds {
    build_three_way(
        MarketParams::new("Football", "Test League", match_name),
        ThreeWayOdds {
            bookmaker: bookmaker.to_string(),
            home: Some(home),
            draw: Some(draw),
            away: Some(away),
        },
    )
}

/// One bookmaker's two-way `Winner` market with sides `A` and `B`.
pub fn two_way(match_name: &str, bookmaker: &str, a: Decimal, b: Decimal) -> MarketOdds {
    build_two_way(
        MarketParams::new("Tennis", "Test Tour", match_name).market("Winner"),
        TwoWayOdds {
            bookmaker: bookmaker.to_string(),
            outcome_a: Some(a),
            outcome_b: Some(b),
            key_a: Some("A".to_string()),
            key_b: Some("B".to_string()),
        },
    )
}
