//! IMS sportsbook feed, published under the "DavidSureBet" bookmaker label.
//!
//! Events are nested as `sports[].leagues[].events[]`. Each event lists its
//! markets; the one typed `1X2` holds outcomes typed `1`, `X` and `2`.

use reqwest::{Client, RequestBuilder};
use serde_json::{json, Value};

use super::three_way;
use super::value::{array, at, number, text};
use crate::config::{ImsConfig, ProviderSecrets};
use crate::domain::{MarketOdds, MarketParams};

pub(crate) const BOOKMAKER: &str = "DavidSureBet";
const DEFAULT_SPORT: &str = "Football";
const DEFAULT_LEAGUE: &str = "Unknown League";
const DEFAULT_HOME: &str = "TeamA";
const DEFAULT_AWAY: &str = "TeamB";
const RESULT_MARKET: &str = "1X2";

pub(crate) fn request(
    client: &Client,
    config: &ImsConfig,
    secrets: &ProviderSecrets,
) -> RequestBuilder {
    let body = json!({
        "SportId": config.sport_id,
        "Market": 3,
        "BetTypeIds": [1, 2, 3],
        "PeriodIds": [1, 2],
        "IsCombo": false,
        "OddsType": 2,
        "DateFrom": null,
        "DateTo": null,
        "CompetitionIds": [],
        "SortType": 2,
        "ProgrammeIds": []
    });

    let mut request = client
        .post(&config.url)
        .header("x-v", &config.client_version)
        .json(&body);
    if let Some(sc) = &secrets.ims_sc {
        request = request.header("x-sc", sc);
    }
    if let Some(token) = &secrets.ims_token {
        request = request.header("x-token", token);
    }
    request
}

/// Normalize an IMS payload into canonical markets.
pub fn normalize(payload: Option<&Value>) -> Vec<MarketOdds> {
    let mut markets = Vec::new();

    for sport in array(at(payload, &["sports"])) {
        let sport_name = text(sport.get("name")).unwrap_or_else(|| DEFAULT_SPORT.to_string());

        for league in array(sport.get("leagues")) {
            let league_name =
                text(league.get("name")).unwrap_or_else(|| DEFAULT_LEAGUE.to_string());

            for event in array(league.get("events")) {
                let Some(result) = array(event.get("markets"))
                    .iter()
                    .find(|m| m.get("type").and_then(Value::as_str) == Some(RESULT_MARKET))
                else {
                    continue;
                };

                let outcomes = array(result.get("outcomes"));
                let price = |kind: &str| {
                    outcomes
                        .iter()
                        .find(|o| o.get("type").and_then(Value::as_str) == Some(kind))
                        .and_then(|o| number(o.get("odds")))
                };

                let match_name = format!(
                    "{} - {}",
                    text(at(Some(event), &["homeTeam", "name"]))
                        .unwrap_or_else(|| DEFAULT_HOME.to_string()),
                    text(at(Some(event), &["awayTeam", "name"]))
                        .unwrap_or_else(|| DEFAULT_AWAY.to_string())
                );

                if let Some(market) = three_way(
                    MarketParams::new(sport_name.clone(), league_name.clone(), match_name),
                    BOOKMAKER,
                    price("1"),
                    price("X"),
                    price("2"),
                ) {
                    markets.push(market);
                }
            }
        }
    }

    markets
}
