//! Command-line interface definitions.

pub mod check;
pub mod detect;
pub mod output;
pub mod scan;
pub mod serve;

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;

use crate::config::Config;
use crate::domain::DetectorConfig;

/// Surebet - cross-bookmaker arbitrage detection.
#[derive(Parser, Debug)]
#[command(name = "surebet")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file (defaults apply when it does not exist)
    #[arg(short, long, global = true, default_value = "config.toml")]
    pub config: PathBuf,

    /// Override log level (debug, info, warn, error)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Use JSON log format instead of pretty
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch every provider once and list surebets
    Scan(ScanArgs),

    /// Re-run detection on a fixed interval until interrupted
    Watch(WatchArgs),

    /// Serve surebets over HTTP
    Serve(ServeArgs),

    /// Detect surebets in a JSON file of markets
    Detect(DetectArgs),

    /// Validate the configuration file
    CheckConfig,
}

/// Detector overrides shared by detecting commands.
#[derive(Args, Debug, Default)]
pub struct DetectorArgs {
    /// Stake budget to split across legs
    #[arg(long)]
    pub stake: Option<Decimal>,

    /// Minimum ROI in percent
    #[arg(long)]
    pub min_roi: Option<Decimal>,
}

impl DetectorArgs {
    /// Apply overrides on top of the configured detector settings.
    pub fn apply(&self, base: &DetectorConfig) -> DetectorConfig {
        DetectorConfig::new(
            self.stake.unwrap_or(base.total_stake),
            self.min_roi.unwrap_or(base.min_roi_pct),
        )
        .sanitized()
    }
}

/// Arguments for the `scan` subcommand.
#[derive(Parser, Debug)]
pub struct ScanArgs {
    #[command(flatten)]
    pub detector: DetectorArgs,

    /// Print results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `watch` subcommand.
#[derive(Parser, Debug)]
pub struct WatchArgs {
    #[command(flatten)]
    pub detector: DetectorArgs,

    /// Override refresh interval in seconds
    #[arg(long)]
    pub interval: Option<u64>,

    /// Print each cycle's results as a JSON line
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `serve` subcommand.
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Override bind address
    #[arg(long)]
    pub bind: Option<SocketAddr>,
}

/// Arguments for the `detect` subcommand.
#[derive(Parser, Debug)]
pub struct DetectArgs {
    /// JSON file holding a market list, or an object with a `markets` field
    pub file: PathBuf,

    #[command(flatten)]
    pub detector: DetectorArgs,

    /// Print results as JSON
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    /// Apply global logging overrides to a loaded config.
    pub fn apply_logging(&self, config: &mut Config) {
        if let Some(ref level) = self.log_level {
            config.logging.level = level.clone();
        }
        if self.json_logs {
            config.logging.format = "json".to_string();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn parses_detect_with_overrides() {
        let cli = Cli::parse_from([
            "surebet", "detect", "markets.json", "--stake", "250", "--min-roi", "1.5", "--json",
        ]);

        let Commands::Detect(args) = cli.command else {
            panic!("expected detect command");
        };
        assert_eq!(args.file, PathBuf::from("markets.json"));
        assert_eq!(args.detector.stake, Some(dec!(250)));
        assert_eq!(args.detector.min_roi, Some(dec!(1.5)));
        assert!(args.json);
        assert_eq!(cli.config, PathBuf::from("config.toml"));
    }

    #[test]
    fn global_flags_follow_subcommands() {
        let cli = Cli::parse_from(["surebet", "scan", "--config", "alt.toml", "--log-level", "debug"]);

        assert_eq!(cli.config, PathBuf::from("alt.toml"));
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn detector_args_override_config() {
        let base = DetectorConfig::new(dec!(100), dec!(2));
        let args = DetectorArgs {
            stake: Some(dec!(40)),
            min_roi: None,
        };

        let merged = args.apply(&base);

        assert_eq!(merged.total_stake, dec!(40));
        assert_eq!(merged.min_roi_pct, dec!(2));
    }

    #[test]
    fn detector_args_sanitize_stake() {
        let args = DetectorArgs {
            stake: Some(dec!(-1)),
            min_roi: None,
        };

        assert_eq!(args.apply(&DetectorConfig::default()).total_stake, dec!(100));
    }
}
