//! Provider adapters.
//!
//! Each bookmaking source has its own payload shape. An adapter turns one
//! provider's raw payload into canonical [`MarketOdds`] records, degrading
//! field by field: a malformed outcome or event is dropped, never the whole
//! batch, and an absent payload (failed fetch) simply yields no markets.
//!
//! - [`onexbet`] - 1xBet live 1x2 feed
//! - [`ims`] - IMS sportsbook feed ("DavidSureBet")
//! - [`stake`] - Stake high-roller GraphQL board
//! - [`client`] - Concurrent payload fetching

pub mod client;
pub mod ims;
pub mod onexbet;
pub mod stake;
pub mod value;

use std::fmt;

use serde_json::Value;

use crate::domain::{build_three_way, is_usable_odds, MarketOdds, MarketParams, Odds, ThreeWayOdds};

pub use client::{fetch_all, PayloadSource, ProviderClient};

/// The supported bookmaking sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    OneXBet,
    Ims,
    Stake,
}

impl ProviderKind {
    pub const ALL: [ProviderKind; 3] = [ProviderKind::OneXBet, ProviderKind::Ims, ProviderKind::Stake];

    /// Identifier used in configuration and logs.
    pub fn name(self) -> &'static str {
        match self {
            Self::OneXBet => "onexbet",
            Self::Ims => "ims",
            Self::Stake => "stake",
        }
    }

    /// Bookmaker label attached to this provider's quotes.
    pub fn bookmaker(self) -> &'static str {
        match self {
            Self::OneXBet => onexbet::BOOKMAKER,
            Self::Ims => ims::BOOKMAKER,
            Self::Stake => stake::BOOKMAKER,
        }
    }

    /// Tag a raw payload (or its absence) with this provider.
    pub fn payload(self, raw: Option<Value>) -> ProviderPayload {
        match self {
            Self::OneXBet => ProviderPayload::OneXBet(raw),
            Self::Ims => ProviderPayload::Ims(raw),
            Self::Stake => ProviderPayload::Stake(raw),
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// One provider's raw payload, tagged with its source.
///
/// `None` means the fetch failed upstream.
#[derive(Debug, Clone)]
pub enum ProviderPayload {
    OneXBet(Option<Value>),
    Ims(Option<Value>),
    Stake(Option<Value>),
}

impl ProviderPayload {
    pub fn kind(&self) -> ProviderKind {
        match self {
            Self::OneXBet(_) => ProviderKind::OneXBet,
            Self::Ims(_) => ProviderKind::Ims,
            Self::Stake(_) => ProviderKind::Stake,
        }
    }

    /// Whether the payload was fetched at all.
    pub fn is_available(&self) -> bool {
        self.raw().is_some()
    }

    fn raw(&self) -> Option<&Value> {
        match self {
            Self::OneXBet(raw) | Self::Ims(raw) | Self::Stake(raw) => raw.as_ref(),
        }
    }

    /// Decode into canonical markets. Never fails.
    pub fn normalize(&self) -> Vec<MarketOdds> {
        match self {
            Self::OneXBet(raw) => onexbet::normalize(raw.as_ref()),
            Self::Ims(raw) => ims::normalize(raw.as_ref()),
            Self::Stake(raw) => stake::normalize(raw.as_ref()),
        }
    }
}

/// Build a complete 1x2 market, or nothing.
///
/// All three prices must be usable: a result market missing an outcome would
/// look like a two-way market and could report an arbitrage that does not
/// cover the draw.
fn three_way(
    params: MarketParams,
    bookmaker: &str,
    home: Option<Odds>,
    draw: Option<Odds>,
    away: Option<Odds>,
) -> Option<MarketOdds> {
    let usable = |odds: Option<Odds>| odds.filter(|o| is_usable_odds(*o));
    let (home, draw, away) = (usable(home)?, usable(draw)?, usable(away)?);

    Some(build_three_way(
        params,
        ThreeWayOdds {
            bookmaker: bookmaker.to_string(),
            home: Some(home),
            draw: Some(draw),
            away: Some(away),
        },
    ))
}
