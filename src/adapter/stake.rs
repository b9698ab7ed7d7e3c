//! Stake high-roller bets board, fetched over GraphQL.
//!
//! Each board entry is a placed bet whose outcomes each carry an id, decimal
//! odds and fixture metadata. Every bet becomes one market keyed by outcome id.

use reqwest::{Client, RequestBuilder};
use serde_json::{json, Value};

use super::value::{array, at, number, text};
use crate::config::{ProviderSecrets, StakeConfig};
use crate::domain::{BookmakerOdds, MarketOdds};

pub(crate) const BOOKMAKER: &str = "Stake";
const MARKET: &str = "Stake Market";
const DEFAULT_MATCH: &str = "Unknown Match";
const DEFAULT_LEAGUE: &str = "Unknown League";
const DEFAULT_SPORT: &str = "sport";

const OPERATION: &str = "BetsBoard_HighrollerSportBets";
const QUERY: &str = r#"query BetsBoard_HighrollerSportBets($limit: Int!) {
  highrollerSportBets(limit: $limit) {
    id iid bet {
      __typename
      ... on SportBet {
        id
        outcomes {
          id
          odds
          fixtureName
          fixtureAbreviation
          fixture {
            id
            tournament {
              id
              category { id sport { id slug } }
            }
          }
        }
      }
    }
  }
}"#;

pub(crate) fn request(
    client: &Client,
    config: &StakeConfig,
    secrets: &ProviderSecrets,
) -> RequestBuilder {
    let body = json!({
        "query": QUERY,
        "variables": { "limit": config.limit },
        "operationName": OPERATION,
    });

    client
        .post(&config.url)
        .header("accept", "*/*")
        .header("origin", "https://stake.com")
        .header("referer", "https://stake.com/")
        .header(
            "x-access-token",
            secrets.stake_access_token.as_deref().unwrap_or_default(),
        )
        .json(&body)
}

/// Normalize a Stake GraphQL response into canonical markets.
pub fn normalize(payload: Option<&Value>) -> Vec<MarketOdds> {
    let mut markets = Vec::new();

    for item in array(at(payload, &["data", "highrollerSportBets"])) {
        let outcomes = array(at(Some(item), &["bet", "outcomes"]));
        let Some(first) = outcomes.first() else {
            continue;
        };

        let category = at(Some(first), &["fixture", "tournament", "category"]);
        let match_name = text(first.get("fixtureName")).unwrap_or_else(|| DEFAULT_MATCH.to_string());
        let league = text(at(category, &["id"])).unwrap_or_else(|| DEFAULT_LEAGUE.to_string());
        let sport = text(at(category, &["sport", "slug"])).unwrap_or_else(|| DEFAULT_SPORT.to_string());

        let selections: Vec<BookmakerOdds> = outcomes
            .iter()
            .filter_map(|outcome| {
                let outcome_key = text(outcome.get("id"))?;
                let odds = number(outcome.get("odds"))?;
                BookmakerOdds::try_new(BOOKMAKER, MARKET, outcome_key, odds).ok()
            })
            .collect();

        if selections.len() >= 2 {
            markets.push(MarketOdds {
                sport,
                league,
                match_name,
                market: MARKET.to_string(),
                updated_at: None,
                selections,
            });
        }
    }

    markets
}
