use ::config::{Config, Environment, File};
use serde::Deserialize;
use std::path::Path;

use crate::Result;

pub const DEFAULT_OKX_BASE_URL: &str = "https://www.okx.com";
pub const DEFAULT_COINGECKO_BASE_URL: &str = "https://api.coingecko.com";
pub const DEFAULT_USDT_VND_RATE: f64 = 26_700.0;

/// Runtime settings
///
/// Sources, later ones winning: built-in defaults, `commander.toml` (or the
/// file passed on the command line), `COMMANDER_*` environment variables.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Settings {
    pub okx_base_url: String,
    pub coingecko_base_url: String,
    pub default_symbol: String,
    pub rsi_period: usize,
    pub candle_limit: usize,
    pub capital_vnd: f64,
    pub usdt_rate: f64,
    pub refresh_interval_secs: u64,
    pub log_capacity: usize,
    pub request_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            okx_base_url: DEFAULT_OKX_BASE_URL.to_string(),
            coingecko_base_url: DEFAULT_COINGECKO_BASE_URL.to_string(),
            default_symbol: "ETH".to_string(),
            rsi_period: 14,
            candle_limit: 25,
            capital_vnd: 10_000_000.0,
            usdt_rate: DEFAULT_USDT_VND_RATE,
            refresh_interval_secs: 60,
            log_capacity: 50,
            request_timeout_secs: 5,
        }
    }
}

impl Settings {
    /// Load settings from `commander.toml` (optional) and the environment
    pub fn load() -> Result<Self> {
        Self::build(File::with_name("commander").required(false))
    }

    /// Load settings from an explicit file (must exist) and the environment
    pub fn load_from(path: &Path) -> Result<Self> {
        Self::build(File::from(path).required(true))
    }

    fn build<S>(file: S) -> Result<Self>
    where
        S: ::config::Source + Send + Sync + 'static,
    {
        let defaults = Self::default();

        let settings = Config::builder()
            .set_default("okx_base_url", defaults.okx_base_url)?
            .set_default("coingecko_base_url", defaults.coingecko_base_url)?
            .set_default("default_symbol", defaults.default_symbol)?
            .set_default("rsi_period", defaults.rsi_period as i64)?
            .set_default("candle_limit", defaults.candle_limit as i64)?
            .set_default("capital_vnd", defaults.capital_vnd)?
            .set_default("usdt_rate", defaults.usdt_rate)?
            .set_default("refresh_interval_secs", defaults.refresh_interval_secs as i64)?
            .set_default("log_capacity", defaults.log_capacity as i64)?
            .set_default("request_timeout_secs", defaults.request_timeout_secs as i64)?
            .add_source(file)
            .add_source(Environment::with_prefix("COMMANDER").try_parsing(true))
            .build()?;

        let settings: Settings = settings.try_deserialize()?;

        tracing::debug!("Loaded settings: {:?}", settings);
        Ok(settings)
    }
}
