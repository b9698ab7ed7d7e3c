//! Detection cycle orchestration.
//!
//! A cycle fetches every provider concurrently, normalizes each payload,
//! merges the markets across providers and runs the detector once over the
//! result. Cycles share no state beyond the immutable configuration.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::adapter::{fetch_all, PayloadSource, ProviderClient, ProviderKind, ProviderPayload};
use crate::config::Config;
use crate::domain::{detect_at, merge_markets, DetectorConfig, MarketOdds, Surebet};
use crate::error::Result;

/// Per-provider outcome of one cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderSummary {
    pub kind: ProviderKind,
    /// Whether the payload was fetched.
    pub available: bool,
    /// Markets the adapter produced.
    pub markets: usize,
}

/// Everything one detection cycle produced.
#[derive(Debug, Clone)]
pub struct CycleReport {
    pub started_at: DateTime<Utc>,
    pub providers: Vec<ProviderSummary>,
    /// Markets after merging across providers.
    pub markets: usize,
    pub surebets: Vec<Surebet>,
}

/// Normalize, merge and detect over already-fetched payloads.
pub fn run_pipeline(
    payloads: &[ProviderPayload],
    detector: &DetectorConfig,
    now: DateTime<Utc>,
) -> CycleReport {
    let mut providers = Vec::with_capacity(payloads.len());
    let mut combined: Vec<MarketOdds> = Vec::new();

    for payload in payloads {
        let markets = payload.normalize();
        providers.push(ProviderSummary {
            kind: payload.kind(),
            available: payload.is_available(),
            markets: markets.len(),
        });
        combined.extend(markets);
    }

    let merged = merge_markets(combined);
    let surebets = detect_at(&merged, detector, now);

    CycleReport {
        started_at: now,
        providers,
        markets: merged.len(),
        surebets,
    }
}

/// Main application struct.
pub struct App {
    source: Arc<dyn PayloadSource>,
    detector: DetectorConfig,
}

impl App {
    pub fn new(source: Arc<dyn PayloadSource>, detector: DetectorConfig) -> Self {
        Self { source, detector }
    }

    /// Build an app fetching from the configured providers.
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = ProviderClient::new(config.clone())?;
        Ok(Self::new(Arc::new(client), config.detector.clone()))
    }

    /// Detector settings used by [`App::cycle`].
    pub fn detector(&self) -> &DetectorConfig {
        &self.detector
    }

    /// Run one cycle with the configured detector settings.
    pub async fn cycle(&self) -> CycleReport {
        self.cycle_with(&self.detector).await
    }

    /// Run one cycle with explicit detector settings.
    pub async fn cycle_with(&self, detector: &DetectorConfig) -> CycleReport {
        let started_at = Utc::now();
        let payloads = fetch_all(self.source.as_ref()).await;
        let report = run_pipeline(&payloads, detector, started_at);

        for provider in &report.providers {
            debug!(
                provider = %provider.kind,
                available = provider.available,
                markets = provider.markets,
                "Provider normalized"
            );
        }
        if report.providers.iter().all(|p| !p.available) && !report.providers.is_empty() {
            warn!("No provider returned a payload this cycle");
        }
        info!(
            markets = report.markets,
            surebets = report.surebets.len(),
            "Detection cycle complete"
        );

        report
    }

    /// Run cycles forever on a fixed interval, handing each report to `on_report`.
    ///
    /// Cycles never overlap; ticks missed while a cycle is running are skipped.
    pub async fn watch<F>(&self, every: Duration, mut on_report: F)
    where
        F: FnMut(&CycleReport),
    {
        let mut ticker = interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;
            let report = self.cycle().await;
            on_report(&report);
        }
    }
}
