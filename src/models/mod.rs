use serde::{Deserialize, Serialize};
use std::fmt;

/// Recommended action
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Action {
    Observe,
    Buy,
    Sell,
}

impl Action {
    /// Whether the caller should be alerted
    pub fn is_actionable(&self) -> bool {
        !matches!(self, Action::Observe)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Action::Observe => "OBSERVE",
            Action::Buy => "BUY",
            Action::Sell => "SELL",
        };
        f.write_str(label)
    }
}

/// Inputs to the signal analyzer
///
/// `high_24h >= low_24h` is assumed, not checked.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct MarketSnapshot {
    pub current_price: f64,
    pub low_24h: f64,
    pub high_24h: f64,
    pub short_term_rsi: f64,
    /// Carried for display only, the decision rule ignores it
    pub long_term_rsi: f64,
}

/// Trade recommendation with suggested order levels
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recommendation {
    pub action: Action,
    pub rationale: String,
    pub entry_price: f64,
    pub stop_loss_price: f64,
    pub take_profit_price: f64,
    pub limit_buy_price: f64,
    pub limit_sell_price: f64,
    pub trailing_activation_price: f64,
    pub trailing_callback_pct: f64,
}

/// Last trade and 24h range for an instrument
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Ticker {
    pub last: f64,
    pub low_24h: f64,
    pub high_24h: f64,
}

/// Candle duration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Timeframe {
    FifteenMinutes,
    FourHours,
}

impl Timeframe {
    /// OKX `bar` query value
    pub fn as_bar(&self) -> &'static str {
        match self {
            Timeframe::FifteenMinutes => "15m",
            Timeframe::FourHours => "4H",
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_bar())
    }
}
