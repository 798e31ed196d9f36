/// Default smoothing period for RSI
pub const DEFAULT_RSI_PERIOD: usize = 14;

/// Returned when there is not enough history to say anything
pub const NEUTRAL_RSI: f64 = 50.0;

/// Calculate Relative Strength Index (RSI)
///
/// RSI measures the magnitude of recent price changes to evaluate
/// overbought or oversold conditions.
///
/// Values:
/// - RSI > 70: Overbought
/// - RSI < 30: Oversold
///
/// `prices` must be ordered oldest first. The averages are seeded with the
/// simple mean of the first `period` changes and then smoothed Wilder-style
/// over the changes from index `period` up to `prices.len() - 2`.
///
/// Short series (fewer than `period + 1` prices) yield [`NEUTRAL_RSI`]
/// instead of an error. A zero average loss saturates to 100.
pub fn calculate_rsi(prices: &[f64], period: usize) -> f64 {
    if period == 0 || prices.len() <= period {
        return NEUTRAL_RSI;
    }

    let mut gains = Vec::with_capacity(prices.len() - 1);
    let mut losses = Vec::with_capacity(prices.len() - 1);

    // Calculate price changes
    for i in 1..prices.len() {
        let change = prices[i] - prices[i - 1];
        if change > 0.0 {
            gains.push(change);
            losses.push(0.0);
        } else {
            gains.push(0.0);
            losses.push(change.abs());
        }
    }

    let period_f = period as f64;

    // Seed with the simple mean of the first window
    let mut avg_gain: f64 = gains[..period].iter().sum::<f64>() / period_f;
    let mut avg_loss: f64 = losses[..period].iter().sum::<f64>() / period_f;

    for i in period..prices.len() - 1 {
        avg_gain = (avg_gain * (period_f - 1.0) + gains[i]) / period_f;
        avg_loss = (avg_loss * (period_f - 1.0) + losses[i]) / period_f;
    }

    if avg_loss == 0.0 {
        return 100.0;
    }

    let rs = avg_gain / avg_loss;
    100.0 - (100.0 / (1.0 + rs))
}
