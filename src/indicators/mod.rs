// Technical indicators module
// Implements the RSI oscillator used by the signal analyzer

pub mod rsi;

pub use rsi::{calculate_rsi, DEFAULT_RSI_PERIOD, NEUTRAL_RSI};
