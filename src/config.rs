//! Application configuration loading and validation.
//!
//! Configuration is loaded from a TOML file. Every section has defaults, so an
//! empty file (or no file at all, see [`Config::load_or_default`]) yields a
//! working setup. Provider credentials are read from environment variables
//! only, never from the config file.

use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use rust_decimal::Decimal;
use serde::Deserialize;
use tracing_subscriber::{fmt, EnvFilter};

use crate::domain::{DetectorConfig, MAX_TOTAL_STAKE};
use crate::error::{ConfigError, Result};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub detector: DetectorConfig,
    #[serde(default)]
    pub refresh: RefreshConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub providers: ProvidersConfig,
    /// Credentials loaded from the environment at runtime.
    #[serde(skip)]
    pub secrets: ProviderSecrets,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".into()
}

fn default_log_format() -> String {
    "pretty".into()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

/// How often `watch` re-runs a full detection cycle.
#[derive(Debug, Clone, Deserialize)]
pub struct RefreshConfig {
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
}

const fn default_interval_secs() -> u64 {
    15
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
        }
    }
}

impl RefreshConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: SocketAddr,
}

fn default_bind() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 3000))
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

/// Outbound HTTP client settings shared by all providers.
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    /// Per-request timeout; a provider that never answers is dropped for the cycle.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

const fn default_timeout_secs() -> u64 {
    10
}

fn default_user_agent() -> String {
    concat!("surebet/", env!("CARGO_PKG_VERSION")).into()
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Per-provider settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProvidersConfig {
    #[serde(default)]
    pub onexbet: OneXBetConfig,
    #[serde(default)]
    pub ims: ImsConfig,
    #[serde(default)]
    pub stake: StakeConfig,
}

const fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
pub struct OneXBetConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_onexbet_url")]
    pub url: String,
}

fn default_onexbet_url() -> String {
    "https://fun1x888.com/service-api/LiveFeed/Get1x2_VZip?count=20&lng=vi&gr=819&mode=4&country=43&virtualSports=true&noFilterBlockEvent=true".into()
}

impl Default for OneXBetConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            url: default_onexbet_url(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImsConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_ims_url")]
    pub url: String,
    /// Value of the `x-v` client version header.
    #[serde(default = "default_ims_client_version")]
    pub client_version: String,
    /// IMS sport id to query (1 is football).
    #[serde(default = "default_ims_sport_id")]
    pub sport_id: u32,
}

fn default_ims_url() -> String {
    "https://sb.imsptdls.com/api/Event/GetSportEvents".into()
}

fn default_ims_client_version() -> String {
    "81661".into()
}

const fn default_ims_sport_id() -> u32 {
    1
}

impl Default for ImsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            url: default_ims_url(),
            client_version: default_ims_client_version(),
            sport_id: default_ims_sport_id(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StakeConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_stake_url")]
    pub url: String,
    /// Number of high-roller bets requested per cycle.
    #[serde(default = "default_stake_limit")]
    pub limit: u32,
}

fn default_stake_url() -> String {
    "https://stake.com/_api/graphql".into()
}

const fn default_stake_limit() -> u32 {
    10
}

impl Default for StakeConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            url: default_stake_url(),
            limit: default_stake_limit(),
        }
    }
}

/// Provider credentials, loaded from environment variables.
#[derive(Debug, Clone, Default)]
pub struct ProviderSecrets {
    /// `IMS_TOKEN`, sent as `x-token`.
    pub ims_token: Option<String>,
    /// `IMS_SC`, sent as `x-sc`.
    pub ims_sc: Option<String>,
    /// `STAKE_ACCESS_TOKEN`, sent as `x-access-token`.
    pub stake_access_token: Option<String>,
}

impl ProviderSecrets {
    pub fn from_env() -> Self {
        Self {
            ims_token: std::env::var("IMS_TOKEN").ok(),
            ims_sc: std::env::var("IMS_SC").ok(),
            stake_access_token: std::env::var("STAKE_ACCESS_TOKEN").ok(),
        }
    }
}

impl Config {
    #[allow(clippy::result_large_err)]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse(&content)
    }

    /// Load `path` if it exists, otherwise start from defaults.
    #[allow(clippy::result_large_err)]
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            return Self::load(path);
        }
        let mut config = Self::default();
        config.secrets = ProviderSecrets::from_env();
        config.validate()?;
        Ok(config)
    }

    #[allow(clippy::result_large_err)]
    pub fn parse(content: &str) -> Result<Self> {
        let mut config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;

        // Credentials come from the environment only
        config.secrets = ProviderSecrets::from_env();

        config.validate()?;

        Ok(config)
    }

    #[allow(clippy::result_large_err)]
    pub fn validate(&self) -> Result<()> {
        if self.detector.total_stake <= Decimal::ZERO {
            return Err(ConfigError::InvalidValue {
                field: "detector.total_stake",
                reason: "must be positive".into(),
            }
            .into());
        }
        if self.detector.total_stake > MAX_TOTAL_STAKE {
            return Err(ConfigError::InvalidValue {
                field: "detector.total_stake",
                reason: format!("must not exceed {MAX_TOTAL_STAKE}"),
            }
            .into());
        }
        if self.refresh.interval_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "refresh.interval_secs",
                reason: "must be at least 1".into(),
            }
            .into());
        }
        if self.http.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "http.timeout_secs",
                reason: "must be at least 1".into(),
            }
            .into());
        }

        let urls = [
            ("providers.onexbet.url", &self.providers.onexbet.url),
            ("providers.ims.url", &self.providers.ims.url),
            ("providers.stake.url", &self.providers.stake.url),
        ];
        for (field, url) in urls {
            if url.is_empty() {
                return Err(ConfigError::MissingField { field }.into());
            }
            url::Url::parse(url).map_err(|e| ConfigError::InvalidValue {
                field,
                reason: e.to_string(),
            })?;
        }

        Ok(())
    }

    pub fn init_logging(&self) {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&self.logging.level));

        // Logs go to stderr; stdout carries command output.
        match self.logging.format.as_str() {
            "json" => {
                fmt()
                    .json()
                    .with_env_filter(filter)
                    .with_writer(std::io::stderr)
                    .init();
            }
            _ => {
                fmt()
                    .with_env_filter(filter)
                    .with_writer(std::io::stderr)
                    .init();
            }
        }
    }
}
