use anyhow::{Result, anyhow};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, instrument};

use crate::core::config::ProviderConfig;
use crate::core::rate::{RateProvider, RateQuote};

/// Rate provider for exchangerate-api.com style `latest/{base}` endpoints.
pub struct ExchangeRateApiProvider {
    base_url: String,
    api_key: Option<String>,
    timeout: Option<Duration>,
}

impl ExchangeRateApiProvider {
    pub fn new(base_url: &str) -> Self {
        ExchangeRateApiProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: None,
            timeout: None,
        }
    }

    pub fn from_config(config: &ProviderConfig) -> Self {
        let mut provider = Self::new(&config.base_url);
        provider.api_key = config.api_key.clone().filter(|key| !key.is_empty());
        provider.timeout = config.timeout_secs.map(Duration::from_secs);
        provider
    }
}

#[derive(Debug, Deserialize)]
struct LatestRatesResponse {
    rates: Option<HashMap<String, f64>>,
}

#[async_trait]
impl RateProvider for ExchangeRateApiProvider {
    #[instrument(name = "RateFetch", skip(self), fields(from = %from))]
    async fn fetch_rates(&self, from: &str) -> Result<RateQuote> {
        let url = format!("{}/{}", self.base_url, from);
        debug!("Requesting rates from {}", url);

        let mut builder = reqwest::Client::builder().user_agent("fxconv/1.0");
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        let mut request = client.get(&url);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| anyhow!("Request error: {} for currency: {}", e, from))?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "HTTP error: {} for currency: {}",
                response.status(),
                from
            ));
        }

        let text = response.text().await?;
        let data: LatestRatesResponse = serde_json::from_str(&text)
            .map_err(|e| anyhow!("Failed to parse JSON response for {}: {}", from, e))?;

        let rates = data
            .rates
            .ok_or_else(|| anyhow!("Invalid currency code: no rates for {}", from))?;
        debug!(count = rates.len(), "Received rates");

        Ok(RateQuote {
            base: from.to_string(),
            rates,
        })
    }
}
