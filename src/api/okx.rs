use crate::config::DEFAULT_OKX_BASE_URL;
use crate::error::Error;
use crate::models::{Ticker, Timeframe};
use crate::Result;
use governor::{Quota, RateLimiter};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

const RATE_LIMIT_PER_SEC: u32 = 10; // Public market data: 20 requests / 2s
const MAX_RETRIES: u32 = 3;
const DEFAULT_BACKOFF: Duration = Duration::from_secs(1);
const CLOSE_INDEX: usize = 4; // [ts, o, h, l, c, vol, ...]

type OkxRateLimiter = RateLimiter<
    governor::state::direct::NotKeyed,
    governor::state::InMemoryState,
    governor::clock::DefaultClock,
>;

/// OKX public market-data client
///
/// Cloneable; all clones share one rate limiter.
#[derive(Clone)]
pub struct OkxClient {
    client: Client,
    base_url: String,
    rate_limiter: Arc<OkxRateLimiter>,
    retry_backoff: Duration,
}

/// Envelope shared by every v5 endpoint
#[derive(Debug, Deserialize)]
struct OkxResponse<T> {
    code: String,
    #[serde(default)]
    msg: String,
    #[serde(default = "Vec::new")]
    data: Vec<T>,
}

/// Response from /market/ticker
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TickerData {
    last: String,
    low24h: String,
    high24h: String,
}

/// Turn a bare symbol into an instrument id (`eth` -> `ETH-USDT`)
pub fn normalize_pair(symbol: &str) -> String {
    let symbol = symbol.trim().to_uppercase();
    if symbol.contains('-') {
        symbol
    } else {
        format!("{}-USDT", symbol)
    }
}

fn parse_price(field: &str, value: &str) -> Result<f64> {
    value
        .parse::<f64>()
        .map_err(|_| Error::Parse(format!("{} '{}'", field, value)))
}

impl OkxClient {
    /// Create a client for the production API
    pub fn new() -> Result<Self> {
        Self::with_base_url(DEFAULT_OKX_BASE_URL, Duration::from_secs(5))
    }

    /// Create a client against another host (tests, proxies)
    pub fn with_base_url(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;

        let per_second = NonZeroU32::new(RATE_LIMIT_PER_SEC).unwrap_or(NonZeroU32::MIN);
        let rate_limiter = Arc::new(RateLimiter::direct(Quota::per_second(per_second)));

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            rate_limiter,
            retry_backoff: DEFAULT_BACKOFF,
        })
    }

    /// Base delay between retries, doubled on each attempt
    pub fn with_retry_backoff(mut self, backoff: Duration) -> Self {
        self.retry_backoff = backoff;
        self
    }

    /// Make a rate-limited GET with retry logic
    async fn make_request(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<reqwest::Response> {
        let url = format!("{}{}", self.base_url, path);
        let mut last_error = None;

        for attempt in 1..=MAX_RETRIES {
            self.rate_limiter.until_ready().await;

            let backoff = self.retry_backoff * 2u32.pow(attempt - 1);

            match self.client.get(&url).query(query).send().await {
                Ok(response) => {
                    let status = response.status();

                    if status.is_success() {
                        return Ok(response);
                    }

                    // Rate limited or server error: retry
                    if status.as_u16() == 429 || status.is_server_error() {
                        tracing::warn!(
                            "OKX returned {} for {}, retrying in {:?} (attempt {}/{})",
                            status,
                            path,
                            backoff,
                            attempt,
                            MAX_RETRIES
                        );
                        last_error = Some(Error::Api {
                            code: status.as_u16().to_string(),
                            msg: format!("HTTP {}", status),
                        });
                        if attempt < MAX_RETRIES {
                            tokio::time::sleep(backoff).await;
                        }
                        continue;
                    }

                    // Other errors (4xx) - don't retry
                    let msg = response
                        .text()
                        .await
                        .unwrap_or_else(|_| "Unknown error".to_string());
                    return Err(Error::Api {
                        code: status.as_u16().to_string(),
                        msg,
                    });
                }
                Err(e) => {
                    tracing::warn!(
                        "Network error for {}: {}, retrying in {:?} (attempt {}/{})",
                        path,
                        e,
                        backoff,
                        attempt,
                        MAX_RETRIES
                    );
                    last_error = Some(Error::Http(e));
                    if attempt < MAX_RETRIES {
                        tokio::time::sleep(backoff).await;
                    }
                }
            }
        }

        Err(last_error.unwrap_or_else(|| Error::Api {
            code: "retry".to_string(),
            msg: format!("Failed after {} retries", MAX_RETRIES),
        }))
    }

    /// Fetch an endpoint and unwrap the `{code, msg, data}` envelope
    async fn get_data<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<T>> {
        let response = self.make_request(path, query).await?;
        let body: OkxResponse<T> = response.json().await?;

        if body.code != "0" {
            return Err(Error::Api {
                code: body.code,
                msg: body.msg,
            });
        }

        Ok(body.data)
    }

    /// Last trade price and 24h range
    pub async fn get_ticker(&self, inst_id: &str) -> Result<Ticker> {
        let data: Vec<TickerData> = self
            .get_data("/api/v5/market/ticker", &[("instId", inst_id.to_string())])
            .await?;

        let tick = data
            .into_iter()
            .next()
            .ok_or_else(|| Error::EmptyData(inst_id.to_string()))?;

        let ticker = Ticker {
            last: parse_price("last", &tick.last)?,
            low_24h: parse_price("low24h", &tick.low24h)?,
            high_24h: parse_price("high24h", &tick.high24h)?,
        };

        tracing::debug!(
            inst_id = %inst_id,
            last = %ticker.last,
            "Fetched ticker"
        );

        Ok(ticker)
    }

    /// Closing prices, oldest first
    ///
    /// OKX returns candles newest first; the order is reversed here.
    pub async fn get_closes(
        &self,
        inst_id: &str,
        timeframe: Timeframe,
        limit: usize,
    ) -> Result<Vec<f64>> {
        let rows: Vec<Vec<String>> = self
            .get_data(
                "/api/v5/market/candles",
                &[
                    ("instId", inst_id.to_string()),
                    ("bar", timeframe.as_bar().to_string()),
                    ("limit", limit.to_string()),
                ],
            )
            .await?;

        if rows.is_empty() {
            tracing::warn!("No {} candles returned for {}", timeframe, inst_id);
        }

        let mut closes = rows
            .iter()
            .map(|row| {
                row.get(CLOSE_INDEX)
                    .ok_or_else(|| Error::Parse(format!("candle row {:?}", row)))
                    .and_then(|close| parse_price("close", close))
            })
            .collect::<Result<Vec<f64>>>()?;
        closes.reverse();

        tracing::debug!("Fetched {} {} closes for {}", closes.len(), timeframe, inst_id);

        Ok(closes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn test_client(url: &str) -> OkxClient {
        OkxClient::with_base_url(url, Duration::from_secs(5))
            .unwrap()
            .with_retry_backoff(Duration::from_millis(1))
    }

    #[test]
    fn test_normalize_pair() {
        assert_eq!(normalize_pair("eth"), "ETH-USDT");
        assert_eq!(normalize_pair(" BTC "), "BTC-USDT");
        assert_eq!(normalize_pair("sol-usdc"), "SOL-USDC");
    }

    #[tokio::test]
    async fn test_get_ticker() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/v5/market/ticker")
            .match_query(Matcher::UrlEncoded("instId".into(), "ETH-USDT".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"code":"0","msg":"","data":[{"instId":"ETH-USDT","last":"2543.21","lastSz":"0.1","low24h":"2401.5","high24h":"2610","ts":"1700000000000"}]}"#,
            )
            .create_async()
            .await;

        let client = test_client(&server.url());
        let ticker = client.get_ticker("ETH-USDT").await.unwrap();

        assert_eq!(ticker.last, 2543.21);
        assert_eq!(ticker.low_24h, 2401.5);
        assert_eq!(ticker.high_24h, 2610.0);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_get_ticker_api_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/v5/market/ticker")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"code":"51001","msg":"Instrument ID does not exist","data":[]}"#)
            .create_async()
            .await;

        let client = test_client(&server.url());
        let err = client.get_ticker("NOPE-USDT").await.unwrap_err();

        match err {
            Error::Api { code, msg } => {
                assert_eq!(code, "51001");
                assert!(msg.contains("does not exist"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_get_ticker_empty_data() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/v5/market/ticker")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"code":"0","msg":"","data":[]}"#)
            .create_async()
            .await;

        let client = test_client(&server.url());
        let err = client.get_ticker("ETH-USDT").await.unwrap_err();
        assert!(matches!(err, Error::EmptyData(_)));
    }

    #[tokio::test]
    async fn test_get_ticker_bad_number() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/v5/market/ticker")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"code":"0","msg":"","data":[{"last":"abc","low24h":"1","high24h":"2"}]}"#)
            .create_async()
            .await;

        let client = test_client(&server.url());
        let err = client.get_ticker("ETH-USDT").await.unwrap_err();
        assert!(err.to_string().contains("last 'abc'"));
    }

    #[tokio::test]
    async fn test_get_closes_oldest_first() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/v5/market/candles")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("instId".into(), "ETH-USDT".into()),
                Matcher::UrlEncoded("bar".into(), "15m".into()),
                Matcher::UrlEncoded("limit".into(), "3".into()),
            ]))
            .with_status(200)
            .with_body(
                r#"{"code":"0","msg":"","data":[
                    ["1700001800000","102","103","101","102.5","10","1000","1000","1"],
                    ["1700000900000","101","102","100","101.5","10","1000","1000","1"],
                    ["1700000000000","100","101","99","100.5","10","1000","1000","1"]
                ]}"#,
            )
            .create_async()
            .await;

        let client = test_client(&server.url());
        let closes = client
            .get_closes("ETH-USDT", Timeframe::FifteenMinutes, 3)
            .await
            .unwrap();

        assert_eq!(closes, vec![100.5, 101.5, 102.5]);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_get_closes_short_row() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/v5/market/candles")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"code":"0","msg":"","data":[["1700000000000","100"]]}"#)
            .create_async()
            .await;

        let client = test_client(&server.url());
        let result = client.get_closes("ETH-USDT", Timeframe::FourHours, 25).await;
        assert!(matches!(result, Err(Error::Parse(_))));
    }

    #[tokio::test]
    async fn test_retries_server_errors() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/v5/market/ticker")
            .match_query(Matcher::Any)
            .with_status(503)
            .expect(3)
            .create_async()
            .await;

        let client = test_client(&server.url());
        let err = client.get_ticker("ETH-USDT").await.unwrap_err();

        assert!(matches!(err, Error::Api { ref code, .. } if code == "503"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_client_error_not_retried() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/v5/market/ticker")
            .match_query(Matcher::Any)
            .with_status(404)
            .with_body("not found")
            .expect(1)
            .create_async()
            .await;

        let client = test_client(&server.url());
        let err = client.get_ticker("ETH-USDT").await.unwrap_err();

        assert!(err.to_string().contains("not found"));
        mock.assert_async().await;
    }

    #[tokio::test]
    #[ignore] // Ignore by default to avoid hitting API in tests
    async fn test_get_ticker_live() {
        let client = OkxClient::new().unwrap();
        let ticker = client.get_ticker("BTC-USDT").await.unwrap();
        assert!(ticker.last > 0.0);
        assert!(ticker.high_24h >= ticker.low_24h);
    }
}
