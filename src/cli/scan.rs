//! Handlers for the `scan` and `watch` commands.

use serde_json::json;
use tokio::signal;
use tracing::info;

use crate::app::{App, CycleReport};
use crate::cli::{output, ScanArgs, WatchArgs};
use crate::config::Config;
use crate::error::Result;

fn report_json(report: &CycleReport) -> serde_json::Value {
    json!({
        "startedAt": report.started_at,
        "markets": report.markets,
        "count": report.surebets.len(),
        "surebets": report.surebets,
    })
}

/// Execute the scan command: one cycle, then exit.
pub async fn execute(config: &Config, args: &ScanArgs) -> Result<()> {
    let app = App::from_config(config)?;
    let detector = args.detector.apply(app.detector());

    let report = app.cycle_with(&detector).await;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report_json(&report))?);
    } else {
        output::header(env!("CARGO_PKG_VERSION"));
        output::report(&report);
    }
    Ok(())
}

/// Execute the watch command: cycle on an interval until Ctrl-C.
pub async fn execute_watch(config: &Config, args: &WatchArgs) -> Result<()> {
    let mut config = config.clone();
    config.detector = args.detector.apply(&config.detector);
    let app = App::from_config(&config)?;
    let every = args
        .interval
        .filter(|secs| *secs > 0)
        .map(std::time::Duration::from_secs)
        .unwrap_or_else(|| config.refresh.interval());

    info!(interval_secs = every.as_secs(), "Watching for surebets");

    let json = args.json;
    tokio::select! {
        _ = app.watch(every, |report| {
            if json {
                println!("{}", report_json(report));
            } else {
                output::report(report);
            }
        }) => {}
        _ = signal::ctrl_c() => {
            info!("Shutdown signal received");
        }
    }

    Ok(())
}
