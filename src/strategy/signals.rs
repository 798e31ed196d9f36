use crate::models::{Action, MarketSnapshot, Recommendation};

/// Configuration for signal generation
///
/// The defaults are the production rule set; other values exist for
/// experimentation and are not validated.
#[derive(Debug, Clone)]
pub struct SignalConfig {
    pub rsi_oversold: f64,
    pub rsi_overbought: f64,
    pub observe_entry_discount: f64, // Entry multiplier when no signal (0.99 = 1% below)
    pub stop_loss_buffer: f64,       // Multiplier on the 24h low
    pub fallback_stop_loss: f64,     // Multiplier on entry when entry is at/below the stop
    pub risk_reward_ratio: f64,
    pub limit_buy_markup: f64,       // Multiplier on the 24h low
    pub limit_sell_markdown: f64,    // Multiplier on the 24h high
    pub trailing_activation: f64,    // Multiplier on current price
    pub trailing_callback_pct: f64,
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self {
            rsi_oversold: 30.0,
            rsi_overbought: 70.0,
            observe_entry_discount: 0.99,
            stop_loss_buffer: 0.99,
            fallback_stop_loss: 0.95,
            risk_reward_ratio: 1.5,
            limit_buy_markup: 1.005,
            limit_sell_markdown: 0.995,
            trailing_activation: 1.01,
            trailing_callback_pct: 2.0,
        }
    }
}

/// Analyze a market snapshot with the default rule set
pub fn analyze(
    current_price: f64,
    low_24h: f64,
    high_24h: f64,
    short_term_rsi: f64,
    long_term_rsi: f64,
) -> Recommendation {
    let snapshot = MarketSnapshot {
        current_price,
        low_24h,
        high_24h,
        short_term_rsi,
        long_term_rsi,
    };
    analyze_market_data(&snapshot, &SignalConfig::default())
}

/// Classify the market and derive order price levels
///
/// Only the short-term RSI drives the action; thresholds are strict so
/// exactly 30 or 70 is still `Observe`. No rounding is applied.
pub fn analyze_market_data(snapshot: &MarketSnapshot, config: &SignalConfig) -> Recommendation {
    let rsi = snapshot.short_term_rsi;

    let (action, rationale) = if rsi < config.rsi_oversold {
        (
            Action::Buy,
            format!("RSI 15m low ({:.1}). Price is oversold.", rsi),
        )
    } else if rsi > config.rsi_overbought {
        (
            Action::Sell,
            format!("RSI 15m high ({:.1}). Price is overbought.", rsi),
        )
    } else {
        (Action::Observe, "Market is moving sideways.".to_string())
    };

    tracing::debug!(
        "Analyzing: price={:.4}, low={:.4}, high={:.4}, RSI15m={:.1}, RSI4h={:.1} -> {}",
        snapshot.current_price,
        snapshot.low_24h,
        snapshot.high_24h,
        rsi,
        snapshot.long_term_rsi,
        action
    );

    // Entry / SL / TP
    let entry_price = match action {
        Action::Observe => snapshot.current_price * config.observe_entry_discount,
        Action::Buy | Action::Sell => snapshot.current_price,
    };

    let mut stop_loss_price = snapshot.low_24h * config.stop_loss_buffer;
    if entry_price <= stop_loss_price {
        stop_loss_price = entry_price * config.fallback_stop_loss;
    }

    let mut take_profit_price =
        entry_price + (entry_price - stop_loss_price) * config.risk_reward_ratio;
    if take_profit_price > snapshot.high_24h {
        take_profit_price = snapshot.high_24h;
    }

    // Limit & trailing
    Recommendation {
        action,
        rationale,
        entry_price,
        stop_loss_price,
        take_profit_price,
        limit_buy_price: snapshot.low_24h * config.limit_buy_markup,
        limit_sell_price: snapshot.high_24h * config.limit_sell_markdown,
        trailing_activation_price: snapshot.current_price * config.trailing_activation,
        trailing_callback_pct: config.trailing_callback_pct,
    }
}
