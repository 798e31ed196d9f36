use crate::config::{DEFAULT_COINGECKO_BASE_URL, DEFAULT_USDT_VND_RATE};
use crate::error::Error;
use crate::Result;
use reqwest::Client;
use std::collections::HashMap;
use std::time::Duration;

/// Response from /simple/price: coin id -> currency -> price
type SimplePriceResponse = HashMap<String, HashMap<String, f64>>;

/// Fetches the USDT/VND exchange rate from CoinGecko
#[derive(Clone)]
pub struct UsdtRateClient {
    client: Client,
    base_url: String,
}

impl UsdtRateClient {
    /// Create a client for the public CoinGecko API
    pub fn new() -> Result<Self> {
        Self::with_base_url(DEFAULT_COINGECKO_BASE_URL, Duration::from_secs(5))
    }

    pub fn with_base_url(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// VND per USDT
    pub async fn get_usdt_vnd_rate(&self) -> Result<f64> {
        let url = format!("{}/api/v3/simple/price", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[("ids", "tether"), ("vs_currencies", "vnd")])
            .send()
            .await?
            .error_for_status()?;

        let prices: SimplePriceResponse = response.json().await?;

        let rate = prices
            .get("tether")
            .and_then(|currencies| currencies.get("vnd"))
            .copied()
            .ok_or_else(|| Error::EmptyData("tether/vnd".to_string()))?;

        if rate <= 0.0 {
            return Err(Error::InvalidInput(format!("USDT rate {}", rate)));
        }

        tracing::info!("USDT/VND rate: {:.0}", rate);
        Ok(rate)
    }

    /// Like [`get_usdt_vnd_rate`](Self::get_usdt_vnd_rate) but never fails
    pub async fn get_usdt_vnd_rate_or_default(&self) -> f64 {
        match self.get_usdt_vnd_rate().await {
            Ok(rate) => rate,
            Err(e) => {
                tracing::warn!(
                    "Failed to fetch USDT rate ({}), using default {:.0}",
                    e,
                    DEFAULT_USDT_VND_RATE
                );
                DEFAULT_USDT_VND_RATE
            }
        }
    }
}
