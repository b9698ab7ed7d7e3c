//! Handler for the `check-config` command.

use std::path::Path;

use crate::adapter::ProviderKind;
use crate::cli::output;
use crate::config::Config;
use crate::error::Result;

/// Load and validate the config file, then print the effective settings.
pub fn execute(path: &Path) -> Result<()> {
    output::header(env!("CARGO_PKG_VERSION"));

    if !path.exists() {
        output::warning(&format!("{} not found, using defaults", path.display()));
    }
    let config = Config::load_or_default(path)?;
    output::success("Configuration is valid");

    output::section("Detector");
    output::field("stake", config.detector.total_stake);
    output::field("min roi %", config.detector.min_roi_pct);
    output::field("refresh", format!("{}s", config.refresh.interval_secs));
    output::field("bind", config.server.bind);

    output::section("Providers");
    let providers = &config.providers;
    for kind in ProviderKind::ALL {
        let (enabled, url) = match kind {
            ProviderKind::OneXBet => (providers.onexbet.enabled, &providers.onexbet.url),
            ProviderKind::Ims => (providers.ims.enabled, &providers.ims.url),
            ProviderKind::Stake => (providers.stake.enabled, &providers.stake.url),
        };
        let state = if enabled { "enabled" } else { "disabled" };
        output::field(kind.name(), format!("{:<14} {state}  {url}", kind.bookmaker()));
    }

    let secrets = &config.secrets;
    if providers.ims.enabled && secrets.ims_token.is_none() {
        output::warning("IMS_TOKEN not set; the IMS feed may reject requests");
    }
    if providers.stake.enabled && secrets.stake_access_token.is_none() {
        output::warning("STAKE_ACCESS_TOKEN not set; the Stake board may reject requests");
    }

    Ok(())
}
