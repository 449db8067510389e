//! Per-domain configuration fetched from the Relay API.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::DomainFetchError;

pub const DOMAIN_CONFIG_PATH: &str = "/api/v1/domains/domain";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainConfig {
    pub domain: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub button_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path_whitelist: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize)]
struct DomainConfigResponse {
    #[serde(default)]
    ok: bool,
    #[serde(default)]
    domain: Option<DomainConfig>,
}

/// HTTP GET returning the response body. Implemented over `fetch` in the
/// browser loader and by fakes in tests.
#[async_trait(?Send)]
pub trait DomainConfigTransport {
    async fn get_text(&self, url: &str) -> Result<String, DomainFetchError>;
}

pub struct DomainConfigClient<T> {
    api_base_url: String,
    transport: T,
}

impl<T: DomainConfigTransport> DomainConfigClient<T> {
    pub fn new(api_base_url: impl Into<String>, transport: T) -> Self {
        Self {
            api_base_url: api_base_url.into(),
            transport,
        }
    }

    /// Fetches the config for `hostname`. Every failure is logged and
    /// reported as `None` so the widget keeps its defaults.
    pub async fn fetch(&self, hostname: &str) -> Option<DomainConfig> {
        let hostname = hostname.trim();
        if hostname.is_empty() {
            return None;
        }
        match self.try_fetch(hostname).await {
            Ok(config) => {
                if config.is_none() {
                    tracing::debug!(hostname, "no domain config registered");
                }
                config
            }
            Err(error) => {
                tracing::error!(%error, hostname, "failed to fetch domain config");
                None
            }
        }
    }

    async fn try_fetch(&self, hostname: &str) -> Result<Option<DomainConfig>, DomainFetchError> {
        let url = domain_config_url(&self.api_base_url, hostname)?;
        let body = self.transport.get_text(&url).await?;
        decode_domain_config(&body)
    }
}

pub fn domain_config_url(api_base_url: &str, hostname: &str) -> Result<String, DomainFetchError> {
    let mut url = Url::parse(api_base_url)
        .and_then(|base| base.join(DOMAIN_CONFIG_PATH))
        .map_err(|error| DomainFetchError::InvalidUrl(error.to_string()))?;
    url.query_pairs_mut().append_pair("domain", hostname);
    Ok(url.into())
}

/// `Ok(None)` when the API answers but has no config for the domain.
pub fn decode_domain_config(body: &str) -> Result<Option<DomainConfig>, DomainFetchError> {
    let response: DomainConfigResponse = serde_json::from_str(body)?;
    if !response.ok {
        return Ok(None);
    }
    Ok(response.domain)
}
