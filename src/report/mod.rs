// Text rendering and alerts for analysis results
use crate::history::LogEntry;
use crate::models::Action;
use crate::pnl::PnlEstimate;
use crate::Result;
use std::fmt::Write;

/// How loudly a result should be surfaced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertLevel {
    Info,
    Opportunity,
    Warning,
}

pub fn alert_level(action: Action) -> AlertLevel {
    match action {
        Action::Observe => AlertLevel::Info,
        Action::Buy => AlertLevel::Opportunity,
        Action::Sell => AlertLevel::Warning,
    }
}

/// Log the outcome of an analysis
///
/// Buy/Sell go out at `warn` so they stand out in a scrolling terminal.
pub fn announce(entry: &LogEntry) {
    let rec = &entry.recommendation;
    match alert_level(rec.action) {
        AlertLevel::Opportunity => tracing::warn!(
            "🟢 {} {} @ {:.4}: {}",
            rec.action,
            entry.symbol,
            entry.price,
            rec.rationale
        ),
        AlertLevel::Warning => tracing::warn!(
            "🔴 {} {} @ {:.4}: {}",
            rec.action,
            entry.symbol,
            entry.price,
            rec.rationale
        ),
        AlertLevel::Info => tracing::info!(
            "{} {} @ {:.4}: {}",
            rec.action,
            entry.symbol,
            entry.price,
            rec.rationale
        ),
    }
}

/// Multi-line summary of one analysis, prices to 4 decimals
pub fn render_recommendation(entry: &LogEntry) -> String {
    let rec = &entry.recommendation;
    let mut out = String::new();

    // Writing to a String cannot fail
    let _ = writeln!(
        out,
        "{} @ {} ({})",
        entry.symbol,
        entry.price,
        entry.timestamp.format("%H:%M:%S")
    );
    let _ = writeln!(
        out,
        "RSI 15m: {:.1} | RSI 4H: {:.1}",
        entry.short_term_rsi, entry.long_term_rsi
    );
    let _ = writeln!(out, "Action: {}", rec.action);
    let _ = writeln!(out, "Reason: {}", rec.rationale);
    let _ = writeln!(out);
    let _ = writeln!(out, "Entry:               {:.4}", rec.entry_price);
    let _ = writeln!(out, "Stop Loss:           {:.4}", rec.stop_loss_price);
    let _ = writeln!(out, "Take Profit:         {:.4}", rec.take_profit_price);
    let _ = writeln!(out, "Limit Buy:           {:.4}", rec.limit_buy_price);
    let _ = writeln!(out, "Limit Sell:          {:.4}", rec.limit_sell_price);
    let _ = writeln!(out, "Trailing Activation: {:.4}", rec.trailing_activation_price);
    let _ = writeln!(out, "Callback:            {}%", rec.trailing_callback_pct);

    out
}

pub fn render_pnl(estimate: &PnlEstimate) -> String {
    format!(
        "Capital: {:.0} VND | Coins: {:.6} | Proceeds: {:.0} VND | P&L: {:.0} VND ({:.2}%)",
        estimate.capital_vnd,
        estimate.coin_amount,
        estimate.proceeds_vnd,
        estimate.profit_vnd,
        estimate.profit_pct
    )
}

/// Estimate line, or the reason there is none
pub fn render_estimate(estimate: &Result<PnlEstimate>) -> String {
    match estimate {
        Ok(estimate) => render_pnl(estimate),
        Err(e) => format!("P&L: unavailable ({})", e),
    }
}
