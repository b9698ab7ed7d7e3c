//! Provider payload fetching.
//!
//! All enabled providers are fetched concurrently and joined before
//! normalization. Every fetch owns its failure: an error is logged and turned
//! into an absent payload, so one slow or broken provider never poisons the
//! others.

use async_trait::async_trait;
use futures_util::future::join_all;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, warn};

use super::{ims, onexbet, stake, ProviderKind, ProviderPayload};
use crate::config::Config;
use crate::error::{ProviderError, Result};

/// Source of raw provider payloads.
#[async_trait]
pub trait PayloadSource: Send + Sync {
    /// Fetch and parse one provider's payload.
    async fn fetch(&self, kind: ProviderKind) -> std::result::Result<Value, ProviderError>;

    /// Providers this source should be asked for.
    fn providers(&self) -> Vec<ProviderKind>;
}

/// HTTP client for the configured providers.
pub struct ProviderClient {
    client: Client,
    config: Config,
}

impl ProviderClient {
    /// Build the shared HTTP client from configuration.
    pub fn new(config: Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.http.timeout())
            .user_agent(config.http.user_agent.clone())
            .build()?;

        Ok(Self { client, config })
    }
}

#[async_trait]
impl PayloadSource for ProviderClient {
    async fn fetch(&self, kind: ProviderKind) -> std::result::Result<Value, ProviderError> {
        let providers = &self.config.providers;
        let secrets = &self.config.secrets;
        let request = match kind {
            ProviderKind::OneXBet => onexbet::request(&self.client, &providers.onexbet),
            ProviderKind::Ims => ims::request(&self.client, &providers.ims, secrets),
            ProviderKind::Stake => stake::request(&self.client, &providers.stake, secrets),
        };
        let provider = kind.name();

        let response = request
            .send()
            .await
            .map_err(|source| ProviderError::Transport { provider, source })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Status { provider, status });
        }

        response
            .json::<Value>()
            .await
            .map_err(|source| ProviderError::Decode { provider, source })
    }

    fn providers(&self) -> Vec<ProviderKind> {
        let providers = &self.config.providers;
        ProviderKind::ALL
            .into_iter()
            .filter(|kind| match kind {
                ProviderKind::OneXBet => providers.onexbet.enabled,
                ProviderKind::Ims => providers.ims.enabled,
                ProviderKind::Stake => providers.stake.enabled,
            })
            .collect()
    }
}

/// Fetch every provider of `source` concurrently.
///
/// Returns one payload per provider, in provider order; failed fetches come
/// back as absent payloads.
pub async fn fetch_all(source: &dyn PayloadSource) -> Vec<ProviderPayload> {
    let fetches = source.providers().into_iter().map(|kind| async move {
        match source.fetch(kind).await {
            Ok(raw) => {
                debug!(provider = %kind, "Provider payload fetched");
                kind.payload(Some(raw))
            }
            Err(e) => {
                warn!(provider = %kind, error = %e, "Provider fetch failed");
                kind.payload(None)
            }
        }
    });

    join_all(fetches).await
}
