//! Profit/loss estimation for a VND-funded round trip through USDT
use crate::error::Error;
use crate::Result;
use serde::{Deserialize, Serialize};

/// Exchange fee charged on each leg (0.1%)
pub const TRADING_FEE_RATE: f64 = 0.001;

/// A planned buy then sell
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct TradePlan {
    pub capital_vnd: f64,
    pub usdt_rate: f64, // VND per USDT
    pub buy_price: f64, // USDT
    pub sell_price: f64, // USDT
}

/// Result of a round trip estimate
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PnlEstimate {
    pub capital_vnd: f64,
    pub coin_amount: f64,
    pub proceeds_vnd: f64,
    pub profit_vnd: f64,
    pub profit_pct: f64,
}

/// Reject zero, negative and non-finite amounts
pub fn validate_positive(field: &str, value: f64) -> Result<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(Error::InvalidInput(format!(
            "{} must be positive, got {}",
            field, value
        )))
    }
}

/// Estimate the outcome of converting VND to USDT, buying, selling and
/// converting back, with [`TRADING_FEE_RATE`] taken on both legs.
pub fn estimate_round_trip(plan: &TradePlan) -> Result<PnlEstimate> {
    validate_positive("capital", plan.capital_vnd)?;
    validate_positive("USDT rate", plan.usdt_rate)?;
    validate_positive("buy price", plan.buy_price)?;

    let usdt = plan.capital_vnd * (1.0 - TRADING_FEE_RATE) / plan.usdt_rate;
    let coin_amount = usdt / plan.buy_price;
    let proceeds_vnd =
        coin_amount * plan.sell_price * plan.usdt_rate * (1.0 - TRADING_FEE_RATE);
    let profit_vnd = proceeds_vnd - plan.capital_vnd;

    Ok(PnlEstimate {
        capital_vnd: plan.capital_vnd,
        coin_amount,
        proceeds_vnd,
        profit_vnd,
        profit_pct: profit_vnd / plan.capital_vnd * 100.0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan(buy: f64, sell: f64) -> TradePlan {
        TradePlan {
            capital_vnd: 10_000_000.0,
            usdt_rate: 25_000.0,
            buy_price: buy,
            sell_price: sell,
        }
    }

    #[test]
    fn test_flat_trade_loses_fees() {
        let est = estimate_round_trip(&plan(100.0, 100.0)).unwrap();

        // Two 0.1% fees: 10M * 0.999^2
        let expected = 10_000_000.0 * 0.999 * 0.999;
        assert!((est.proceeds_vnd - expected).abs() < 1e-6);
        assert!(est.profit_vnd < 0.0);
        assert!((est.profit_pct - (-0.1999)).abs() < 1e-9);
    }

    #[test]
    fn test_profitable_trade() {
        let est = estimate_round_trip(&plan(100.0, 110.0)).unwrap();

        // 10M * 0.999 / 25000 = 399.6 USDT -> 3.996 coins
        assert!((est.coin_amount - 3.996).abs() < 1e-9);
        let expected = 3.996 * 110.0 * 25_000.0 * 0.999;
        assert!((est.proceeds_vnd - expected).abs() < 1e-6);
        assert!(est.profit_pct > 9.0);
    }

    #[test]
    fn test_invalid_inputs_rejected() {
        let mut bad = plan(100.0, 110.0);
        bad.capital_vnd = 0.0;
        assert!(matches!(estimate_round_trip(&bad), Err(Error::InvalidInput(_))));

        let mut bad = plan(100.0, 110.0);
        bad.usdt_rate = -1.0;
        assert!(estimate_round_trip(&bad).is_err());

        let bad = plan(0.0, 110.0);
        let err = estimate_round_trip(&bad).unwrap_err();
        assert!(err.to_string().contains("buy price"));
    }

    #[test]
    fn test_validate_positive() {
        assert_eq!(validate_positive("capital", 5.0).unwrap(), 5.0);
        assert!(validate_positive("capital", 0.0).is_err());
        assert!(validate_positive("capital", -1.0).is_err());
        assert!(validate_positive("rate", f64::NAN).is_err());

        let err = validate_positive("--sell-price", f64::INFINITY).unwrap_err();
        assert!(err.to_string().contains("--sell-price must be positive"));
    }

    #[test]
    fn test_zero_entry_price_rejected() {
        // A ticker reporting a last price of 0 yields a zero entry
        let rec = crate::strategy::analyze(0.0, 0.0, 0.0, 25.0, 50.0);
        assert_eq!(rec.entry_price, 0.0);

        let err = estimate_round_trip(&plan(rec.entry_price, rec.take_profit_price)).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
        assert!(err.to_string().contains("buy price must be positive, got 0"));
    }
}
