//! Raw provider payloads shaped like the real feeds.

use serde_json::{json, Value};

/// A 1xBet feed with one football event priced home/draw/away.
pub fn onexbet(home_team: &str, away_team: &str, prices: [f64; 3]) -> Value {
    json!({
        "Value": [{
            "L": "Premier League",
            "O1": home_team,
            "O2": away_team,
            "E": [{"T": 1, "C": prices[0], "D": prices[1], "E": prices[2]}]
        }]
    })
}

/// An IMS feed with one football event priced home/draw/away.
pub fn ims(home_team: &str, away_team: &str, prices: [f64; 3]) -> Value {
    json!({
        "sports": [{
            "name": "Football",
            "leagues": [{
                "name": "Premier League",
                "events": [{
                    "homeTeam": {"name": home_team},
                    "awayTeam": {"name": away_team},
                    "markets": [{"type": "1X2", "outcomes": [
                        {"type": "1", "odds": prices[0]},
                        {"type": "X", "odds": prices[1]},
                        {"type": "2", "odds": prices[2]}
                    ]}]
                }]
            }]
        }]
    })
}
