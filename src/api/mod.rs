pub mod coingecko;
pub mod okx;

pub use coingecko::UsdtRateClient;
pub use okx::{normalize_pair, OkxClient};
