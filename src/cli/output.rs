//! Shared CLI output helpers for consistent operator-facing text.

use std::fmt::Display;

use owo_colors::OwoColorize;
use tabled::{Table, Tabled};

use crate::app::{CycleReport, ProviderSummary};
use crate::domain::Surebet;

/// Print the application header with name and version.
pub fn header(version: &str) {
    println!("{} {}", "surebet".bold(), version.dimmed());
    println!();
}

/// Print a section header.
pub fn section(title: &str) {
    println!();
    println!("{}", title.bold());
}

/// Print a labeled value.
pub fn field(label: &str, value: impl Display) {
    println!("  {:<14} {}", label.dimmed(), value);
}

/// Print a success line.
pub fn success(message: &str) {
    println!("  {} {}", "✓".green(), message);
}

/// Print a warning line.
pub fn warning(message: &str) {
    println!("  {} {}", "⚠".yellow(), message);
}

/// Print an error line.
pub fn error(message: &str) {
    eprintln!("  {} {}", "×".red(), message);
}

#[derive(Tabled)]
struct SurebetRow {
    #[tabled(rename = "ROI %")]
    roi: String,
    #[tabled(rename = "Stake")]
    stake: String,
    #[tabled(rename = "Profit")]
    profit: String,
    #[tabled(rename = "Sport")]
    sport: String,
    #[tabled(rename = "Match")]
    match_name: String,
    #[tabled(rename = "Market")]
    market: String,
    #[tabled(rename = "Legs")]
    legs: String,
}

impl From<&Surebet> for SurebetRow {
    fn from(surebet: &Surebet) -> Self {
        let legs = surebet
            .bets
            .iter()
            .map(|b| format!("{} {} @ {} x {}", b.bookmaker, b.outcome_key, b.odds, b.stake))
            .collect::<Vec<_>>()
            .join("\n");

        Self {
            roi: surebet.roi.to_string(),
            stake: surebet.total_stake().to_string(),
            profit: surebet.profit.to_string(),
            sport: surebet.sport.clone(),
            match_name: surebet.match_name.clone(),
            market: surebet.market.clone(),
            legs,
        }
    }
}

/// Print surebets as an indented table.
pub fn surebets(surebets: &[Surebet]) {
    section(&format!("Surebets ({})", surebets.len()));
    if surebets.is_empty() {
        println!("  {}", "none found".dimmed());
        return;
    }

    let table = Table::new(surebets.iter().map(SurebetRow::from)).to_string();
    for line in table.lines() {
        println!("  {line}");
    }
}

/// Print the per-provider summary of a cycle.
pub fn providers(providers: &[ProviderSummary]) {
    section("Providers");
    for provider in providers {
        let status = if provider.available {
            format!("{} markets", provider.markets)
        } else {
            "unavailable".to_string()
        };
        field(
            provider.kind.name(),
            format!("{:<14} {}", provider.kind.bookmaker(), status),
        );
    }
}

/// Print a full cycle report.
pub fn report(report: &CycleReport) {
    providers(&report.providers);
    field("merged", report.markets);
    surebets(&report.surebets);
}
