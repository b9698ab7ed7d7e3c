//! Handler for the `detect` command: offline detection over a market file.

use std::path::Path;

use serde_json::{json, Value};
use tracing::info;

use crate::cli::{output, DetectArgs};
use crate::config::Config;
use crate::domain::{detect, merge_markets, MarketOdds};
use crate::error::{Error, Result};

/// Read markets from a JSON file.
///
/// Accepts either a bare array of markets or an object with a `markets` array.
pub fn read_markets(path: &Path) -> Result<Vec<MarketOdds>> {
    let content = std::fs::read_to_string(path)?;
    let value: Value = serde_json::from_str(&content)?;

    let list = match value {
        Value::Array(_) => value,
        Value::Object(mut fields) => fields
            .remove("markets")
            .ok_or_else(|| Error::InvalidPayload("object has no `markets` field".into()))?,
        _ => return Err(Error::InvalidPayload("expected an array or an object".into())),
    };

    Ok(serde_json::from_value(list)?)
}

/// Execute the detect command.
pub fn execute(config: &Config, args: &DetectArgs) -> Result<()> {
    let markets = read_markets(&args.file)?;
    let detector = args.detector.apply(&config.detector);

    let merged = merge_markets(markets);
    info!(markets = merged.len(), file = %args.file.display(), "Markets loaded");

    let surebets = detect(&merged, &detector);

    if args.json {
        let body = json!({ "count": surebets.len(), "surebets": surebets });
        println!("{}", serde_json::to_string_pretty(&body)?);
    } else {
        output::header(env!("CARGO_PKG_VERSION"));
        output::field("markets", merged.len());
        output::field("stake", detector.total_stake);
        output::field("min roi %", detector.min_roi_pct);
        output::surebets(&surebets);
    }
    Ok(())
}
