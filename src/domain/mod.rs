//! Provider-agnostic domain logic: the canonical market model and the
//! arbitrage detector.

mod detector;
mod market;
mod money;
mod surebet;

pub mod error;

pub use detector::{
    best_per_outcome, compute_stakes, detect, detect_at, implied_sum, Arbitrage, DetectorConfig,
    DEFAULT_TOTAL_STAKE, MAX_TOTAL_STAKE,
};
pub use market::{
    build_three_way, build_two_way, merge_markets, BookmakerOdds, MarketKey, MarketOdds,
    MarketParams, ThreeWayOdds, TwoWayOdds, AWAY, DRAW, HOME, SIDE_A, SIDE_B, THREE_WAY_MARKET,
};
pub use money::{finite_decimal, is_usable_odds, round2, saturating_decimal, Amount, Odds};
pub use surebet::{Surebet, SurebetBet};
