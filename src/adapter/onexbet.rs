//! 1xBet live 1x2 feed.
//!
//! The feed is a `Value` array of events. Each event names its league in `L`
//! and its teams in `O1` / `O2`, and carries odds sets in `E`; the set with
//! `T == 1` is the full-time result with home, draw and away prices in `C`,
//! `D` and `E`.

use reqwest::{Client, RequestBuilder};
use serde_json::Value;

use super::three_way;
use super::value::{array, at, number, text};
use crate::config::OneXBetConfig;
use crate::domain::{MarketOdds, MarketParams};

pub(crate) const BOOKMAKER: &str = "1xBet";
const DEFAULT_LEAGUE: &str = "1xBet League";
const SPORT: &str = "Football";

/// Odds set type carrying the 1x2 prices.
const RESULT_SET: f64 = 1.0;

pub(crate) fn request(client: &Client, config: &OneXBetConfig) -> RequestBuilder {
    client.get(&config.url)
}

/// Normalize a 1xBet payload into canonical markets.
pub fn normalize(payload: Option<&Value>) -> Vec<MarketOdds> {
    let mut markets = Vec::new();

    for event in array(at(payload, &["Value"])) {
        let Some(odds_set) = array(event.get("E"))
            .iter()
            .find(|set| set.get("T").and_then(Value::as_f64) == Some(RESULT_SET))
        else {
            continue;
        };

        let league = text(event.get("L")).unwrap_or_else(|| DEFAULT_LEAGUE.to_string());
        let match_name = format!(
            "{} - {}",
            text(event.get("O1")).unwrap_or_default(),
            text(event.get("O2")).unwrap_or_default()
        );

        if let Some(market) = three_way(
            MarketParams::new(SPORT, league, match_name),
            BOOKMAKER,
            number(odds_set.get("C")),
            number(odds_set.get("D")),
            number(odds_set.get("E")),
        ) {
            markets.push(market);
        }
    }

    markets
}
