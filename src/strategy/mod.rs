// Trading strategy module
pub mod signals;

pub use signals::{analyze, analyze_market_data, SignalConfig};
