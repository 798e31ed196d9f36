use crate::api::{normalize_pair, OkxClient};
use crate::config::Settings;
use crate::history::{LogEntry, SignalLog};
use crate::indicators::calculate_rsi;
use crate::models::{MarketSnapshot, Timeframe};
use crate::report;
use crate::strategy::{analyze_market_data, SignalConfig};
use crate::Result;
use chrono::Utc;

/// Fetches market data and runs the signal core
///
/// Holds clients and parameters only; the signal log is passed in and
/// handed back on every run.
#[derive(Clone)]
pub struct Commander {
    okx: OkxClient,
    signal_config: SignalConfig,
    rsi_period: usize,
    candle_limit: usize,
}

impl Commander {
    pub fn new(okx: OkxClient, settings: &Settings) -> Self {
        Self {
            okx,
            signal_config: SignalConfig::default(),
            rsi_period: settings.rsi_period,
            candle_limit: settings.candle_limit,
        }
    }

    pub fn with_signal_config(mut self, signal_config: SignalConfig) -> Self {
        self.signal_config = signal_config;
        self
    }

    /// Fetch, analyze, record
    ///
    /// # Arguments
    /// * `symbol` - Bare symbol (`ETH`) or instrument id (`ETH-USDC`)
    /// * `log` - The caller's rolling log; returned with the new entry at the front
    pub async fn run_once(
        &self,
        symbol: &str,
        mut log: SignalLog,
    ) -> Result<(LogEntry, SignalLog)> {
        let inst_id = normalize_pair(symbol);

        tracing::info!("🔍 Analyzing {}...", inst_id);

        let (ticker, short_closes, long_closes) = tokio::try_join!(
            self.okx.get_ticker(&inst_id),
            self.okx
                .get_closes(&inst_id, Timeframe::FifteenMinutes, self.candle_limit),
            self.okx
                .get_closes(&inst_id, Timeframe::FourHours, self.candle_limit),
        )?;

        let short_term_rsi = calculate_rsi(&short_closes, self.rsi_period);
        let long_term_rsi = calculate_rsi(&long_closes, self.rsi_period);

        tracing::debug!(
            "Indicators: RSI15m={:.1} ({} closes), RSI4h={:.1} ({} closes)",
            short_term_rsi,
            short_closes.len(),
            long_term_rsi,
            long_closes.len()
        );

        let snapshot = MarketSnapshot {
            current_price: ticker.last,
            low_24h: ticker.low_24h,
            high_24h: ticker.high_24h,
            short_term_rsi,
            long_term_rsi,
        };
        let recommendation = analyze_market_data(&snapshot, &self.signal_config);

        let entry = LogEntry {
            timestamp: Utc::now(),
            symbol: inst_id,
            price: ticker.last,
            short_term_rsi,
            long_term_rsi,
            recommendation,
        };

        report::announce(&entry);
        log.record(entry.clone());

        Ok((entry, log))
    }
}
