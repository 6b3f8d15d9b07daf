//! Cost-of-carry futures valuation and arbitrage-band detection.
//!
//! The theoretical price follows `F = S e^{(r - q) T}` where `q` carries
//! both dividend and convenience yield. Arbitrage analysis compares an
//! observed futures quote against the theoretical price net of a
//! proportional transaction cost on the spot leg.

use serde::{Deserialize, Serialize};

use crate::core::EngineError;

/// Arbitrage analysis of an observed futures quote.
///
/// Both directional profits are net of the round-trip cost `S * cost_rate`.
/// The opportunity flag uses a strict inequality: a mispricing exactly at
/// the cost threshold is not an opportunity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArbitrageReport {
    pub theoretical_price: f64,
    pub market_price: f64,
    pub price_difference: f64,
    pub buy_spot_sell_futures_profit: f64,
    pub sell_spot_buy_futures_profit: f64,
    pub arbitrage_opportunity: bool,
}

/// Cost-of-carry futures pricing model.
///
/// # Examples
/// ```
/// use ferroquant::pricing::futures::FuturesModel;
///
/// let model = FuturesModel::new(100.0, 0.05, 0.02, 90.0 / 365.0).unwrap();
/// let fair = model.theoretical_price();
/// assert!(fair > 100.0 && fair < 101.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FuturesModel {
    spot: f64,
    rate: f64,
    carry_yield: f64,
    expiry: f64,
}

impl FuturesModel {
    /// Builds a model from spot `s`, rate `r`, carry/dividend yield `q`,
    /// and expiry `t` in years.
    ///
    /// # Errors
    /// `InvalidParameter` when `s <= 0` or `t <= 0` or any input is
    /// non-finite. `r` and `q` are unconstrained.
    pub fn new(s: f64, r: f64, q: f64, t: f64) -> Result<Self, EngineError> {
        if !s.is_finite() || !r.is_finite() || !q.is_finite() || !t.is_finite() {
            return Err(EngineError::InvalidParameter(
                "futures inputs must be finite".to_string(),
            ));
        }
        if s <= 0.0 {
            return Err(EngineError::InvalidParameter(format!(
                "spot must be > 0, got {s}"
            )));
        }
        if t <= 0.0 {
            return Err(EngineError::InvalidParameter(format!(
                "expiry must be > 0, got {t}"
            )));
        }

        Ok(Self {
            spot: s,
            rate: r,
            carry_yield: q,
            expiry: t,
        })
    }

    pub fn spot(&self) -> f64 {
        self.spot
    }

    /// Theoretical futures price `S e^{(r - q) T}`.
    pub fn theoretical_price(&self) -> f64 {
        self.spot * ((self.rate - self.carry_yield) * self.expiry).exp()
    }

    /// Basis of an observed quote, `market - spot`.
    pub fn basis(&self, market_price: f64) -> f64 {
        market_price - self.spot
    }

    /// Arbitrage analysis of an observed quote against the theoretical
    /// price, with a proportional transaction cost on the spot leg.
    ///
    /// # Examples
    /// ```
    /// use ferroquant::pricing::futures::FuturesModel;
    ///
    /// let model = FuturesModel::new(100.0, 0.05, 0.02, 90.0 / 365.0).unwrap();
    /// let report = model.arbitrage(102.0, 0.001);
    /// assert!(report.arbitrage_opportunity);
    /// ```
    pub fn arbitrage(&self, market_price: f64, transaction_cost_rate: f64) -> ArbitrageReport {
        let theoretical_price = self.theoretical_price();
        let price_difference = market_price - theoretical_price;
        let cost = self.spot * transaction_cost_rate;

        ArbitrageReport {
            theoretical_price,
            market_price,
            price_difference,
            buy_spot_sell_futures_profit: price_difference - cost,
            sell_spot_buy_futures_profit: -price_difference - cost,
            arbitrage_opportunity: price_difference.abs() > cost,
        }
    }
}
