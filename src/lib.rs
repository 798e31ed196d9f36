// Core modules
pub mod api;
pub mod commander;
pub mod config;
pub mod error;
pub mod history;
pub mod indicators;
pub mod models;
pub mod pnl;
pub mod report;
pub mod strategy;

// Re-export commonly used types
pub use commander::Commander;
pub use crate::config::Settings;
pub use error::Error;
pub use history::{LogEntry, SignalLog};
pub use indicators::calculate_rsi;
pub use models::*;
pub use strategy::signals::{analyze, analyze_market_data, SignalConfig};

// Error handling
pub type Result<T> = std::result::Result<T, Error>;
