//! Long/short equity strategy: independent long and short books, P&L
//! against current marks, and market-exposure analysis.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::core::EngineError;
use crate::strategies::leverage::borrowing_cost;

/// Net exposure below this fraction of gross counts as market neutral.
const MARKET_NEUTRAL_THRESHOLD: f64 = 0.10;

/// A holding in one book, keyed by symbol on the strategy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub entry_price: f64,
    pub quantity: f64,
}

impl Position {
    /// Notional at entry.
    pub fn entry_value(&self) -> f64 {
        self.entry_price * self.quantity
    }
}

/// Mark-to-market value and P&L of both books.
///
/// `short_value` is the (negative) liability of the short book at current
/// prices; `short_pnl` is positive when prices have fallen since entry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionsValue {
    pub long_value: f64,
    pub short_value: f64,
    pub net_value: f64,
    pub long_pnl: f64,
    pub short_pnl: f64,
    pub total_pnl: f64,
    /// Total P&L over initial capital.
    pub return_on_capital: f64,
}

/// Entry-notional exposure split of the two books.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarketExposure {
    pub long_exposure: f64,
    pub short_exposure: f64,
    pub gross_exposure: f64,
    pub net_exposure: f64,
    /// `|net| / gross`, 0.0 when there is no gross exposure.
    pub market_neutral_ratio: f64,
    pub is_market_neutral: bool,
}

/// Long/short strategy account.
///
/// Positions change only through the explicit add calls; marking to
/// market never mutates the books.
///
/// # Examples
/// ```
/// use std::collections::HashMap;
/// use ferroquant::strategies::longshort::LongShortStrategy;
///
/// let mut strategy = LongShortStrategy::new(1_000_000.0, 2.0, 0.03, 0.01).unwrap();
/// strategy.add_long_position("AAPL", 150.0, 1_000.0);
/// strategy.add_short_position("MSFT", 300.0, 500.0);
///
/// let longs = HashMap::from([("AAPL".to_string(), 155.0)]);
/// let shorts = HashMap::from([("MSFT".to_string(), 295.0)]);
/// let value = strategy.positions_value(&longs, &shorts);
/// assert!((value.total_pnl - 7_500.0).abs() < 1.0e-9);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct LongShortStrategy {
    initial_capital: f64,
    leverage_ratio: f64,
    borrowing_rate: f64,
    short_rebate_rate: f64,
    long_holdings: HashMap<String, Position>,
    short_holdings: HashMap<String, Position>,
}

impl LongShortStrategy {
    /// # Errors
    /// `InvalidParameter` when the initial capital is non-positive or the
    /// leverage ratio is below 1.
    pub fn new(
        initial_capital: f64,
        leverage_ratio: f64,
        borrowing_rate: f64,
        short_rebate_rate: f64,
    ) -> Result<Self, EngineError> {
        if !initial_capital.is_finite() || initial_capital <= 0.0 {
            return Err(EngineError::InvalidParameter(format!(
                "initial capital must be > 0, got {initial_capital}"
            )));
        }
        if !leverage_ratio.is_finite() || leverage_ratio < 1.0 {
            return Err(EngineError::InvalidParameter(format!(
                "leverage ratio must be >= 1, got {leverage_ratio}"
            )));
        }

        Ok(Self {
            initial_capital,
            leverage_ratio,
            borrowing_rate,
            short_rebate_rate,
            long_holdings: HashMap::new(),
            short_holdings: HashMap::new(),
        })
    }

    pub fn initial_capital(&self) -> f64 {
        self.initial_capital
    }

    pub fn short_rebate_rate(&self) -> f64 {
        self.short_rebate_rate
    }

    /// Capital borrowed on top of equity, `capital * (leverage - 1)`.
    pub fn borrowed_capital(&self) -> f64 {
        self.initial_capital * (self.leverage_ratio - 1.0)
    }

    /// Deployable capital, `capital * leverage`.
    pub fn total_capital(&self) -> f64 {
        self.initial_capital * self.leverage_ratio
    }

    /// Interest on the borrowed capital over a holding period.
    pub fn borrowing_cost(&self, holding_days: u32) -> f64 {
        borrowing_cost(self.borrowed_capital(), self.borrowing_rate, holding_days)
    }

    /// Buys the underlying; replaces any existing position in the symbol.
    pub fn add_long_position(&mut self, symbol: &str, price: f64, quantity: f64) {
        self.long_holdings
            .insert(symbol.to_string(), Position { entry_price: price, quantity });
    }

    /// Sells the underlying short; replaces any existing position.
    pub fn add_short_position(&mut self, symbol: &str, price: f64, quantity: f64) {
        self.short_holdings
            .insert(symbol.to_string(), Position { entry_price: price, quantity });
    }

    /// Marks both books against current prices. Symbols without a quote
    /// are skipped.
    pub fn positions_value(
        &self,
        long_prices: &HashMap<String, f64>,
        short_prices: &HashMap<String, f64>,
    ) -> PositionsValue {
        let mut long_value = 0.0;
        let mut long_pnl = 0.0;
        for (symbol, holding) in &self.long_holdings {
            if let Some(&price) = long_prices.get(symbol) {
                let current = price * holding.quantity;
                long_value += current;
                long_pnl += current - holding.entry_value();
            }
        }

        let mut short_value = 0.0;
        let mut short_pnl = 0.0;
        for (symbol, holding) in &self.short_holdings {
            if let Some(&price) = short_prices.get(symbol) {
                // Short book: profit when the price falls below entry.
                short_pnl += (holding.entry_price - price) * holding.quantity;
                short_value -= price * holding.quantity;
            }
        }

        let total_pnl = long_pnl + short_pnl;
        PositionsValue {
            long_value,
            short_value,
            net_value: long_value + short_value,
            long_pnl,
            short_pnl,
            total_pnl,
            return_on_capital: total_pnl / self.initial_capital,
        }
    }

    /// Exposure split at entry notionals and the market-neutrality check.
    pub fn market_exposure(&self) -> MarketExposure {
        let long_exposure: f64 = self.long_holdings.values().map(Position::entry_value).sum();
        let short_exposure: f64 = self.short_holdings.values().map(Position::entry_value).sum();

        let gross_exposure = long_exposure + short_exposure;
        let net_exposure = long_exposure - short_exposure;
        let market_neutral_ratio = if gross_exposure > 0.0 {
            net_exposure.abs() / gross_exposure
        } else {
            0.0
        };

        MarketExposure {
            long_exposure,
            short_exposure,
            gross_exposure,
            net_exposure,
            market_neutral_ratio,
            is_market_neutral: market_neutral_ratio < MARKET_NEUTRAL_THRESHOLD,
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn marked_strategy() -> LongShortStrategy {
        let mut strategy = LongShortStrategy::new(1_000_000.0, 2.0, 0.03, 0.01).unwrap();
        strategy.add_long_position("AAPL", 150.0, 1_000.0);
        strategy.add_short_position("MSFT", 300.0, 500.0);
        strategy
    }

    #[test]
    fn rejects_bad_capital_and_leverage() {
        assert!(LongShortStrategy::new(0.0, 2.0, 0.03, 0.01).is_err());
        assert!(LongShortStrategy::new(1.0e6, 0.5, 0.03, 0.01).is_err());
    }

    #[test]
    fn leverage_derived_quantities() {
        let strategy = marked_strategy();
        assert_relative_eq!(strategy.borrowed_capital(), 1_000_000.0, epsilon = 1.0e-9);
        assert_relative_eq!(strategy.total_capital(), 2_000_000.0, epsilon = 1.0e-9);
        assert_relative_eq!(
            strategy.borrowing_cost(30),
            1_000_000.0 * 0.03 / 365.0 * 30.0,
            epsilon = 1.0e-9
        );
    }

    #[test]
    fn pnl_from_both_books() {
        let strategy = marked_strategy();
        let longs = HashMap::from([("AAPL".to_string(), 155.0)]);
        let shorts = HashMap::from([("MSFT".to_string(), 295.0)]);

        let value = strategy.positions_value(&longs, &shorts);
        assert_relative_eq!(value.long_pnl, 5_000.0, epsilon = 1.0e-9);
        assert_relative_eq!(value.short_pnl, 2_500.0, epsilon = 1.0e-9);
        assert_relative_eq!(value.total_pnl, 7_500.0, epsilon = 1.0e-9);
        assert_relative_eq!(value.return_on_capital, 0.0075, epsilon = 1.0e-12);
        // Short book is carried as a liability.
        assert_relative_eq!(value.short_value, -147_500.0, epsilon = 1.0e-9);
    }

    #[test]
    fn short_book_profits_when_prices_fall() {
        let mut strategy = LongShortStrategy::new(100_000.0, 1.0, 0.03, 0.01).unwrap();
        strategy.add_short_position("XYZ", 50.0, 100.0);

        let down = strategy.positions_value(
            &HashMap::new(),
            &HashMap::from([("XYZ".to_string(), 45.0)]),
        );
        assert_relative_eq!(down.short_pnl, 500.0, epsilon = 1.0e-9);

        let up = strategy.positions_value(
            &HashMap::new(),
            &HashMap::from([("XYZ".to_string(), 55.0)]),
        );
        assert_relative_eq!(up.short_pnl, -500.0, epsilon = 1.0e-9);
    }

    #[test]
    fn unmarked_symbols_are_skipped() {
        let strategy = marked_strategy();
        let value = strategy.positions_value(&HashMap::new(), &HashMap::new());
        assert_eq!(value.total_pnl, 0.0);
        assert_eq!(value.long_value, 0.0);
    }

    #[test]
    fn balanced_books_are_market_neutral() {
        let mut strategy = LongShortStrategy::new(1_000_000.0, 1.0, 0.03, 0.01).unwrap();
        strategy.add_long_position("AAPL", 150.0, 1_000.0);
        strategy.add_short_position("MSFT", 300.0, 500.0);

        let exposure = strategy.market_exposure();
        assert_relative_eq!(exposure.gross_exposure, 300_000.0, epsilon = 1.0e-9);
        assert_relative_eq!(exposure.net_exposure, 0.0, epsilon = 1.0e-9);
        assert!(exposure.is_market_neutral);
    }

    #[test]
    fn lopsided_books_are_not_neutral() {
        let mut strategy = LongShortStrategy::new(1_000_000.0, 1.0, 0.03, 0.01).unwrap();
        strategy.add_long_position("AAPL", 150.0, 2_000.0);
        strategy.add_short_position("MSFT", 300.0, 500.0);

        let exposure = strategy.market_exposure();
        assert!(exposure.market_neutral_ratio > MARKET_NEUTRAL_THRESHOLD);
        assert!(!exposure.is_market_neutral);
    }

    #[test]
    fn empty_books_have_zero_neutral_ratio() {
        let strategy = LongShortStrategy::new(1_000_000.0, 1.0, 0.03, 0.01).unwrap();
        let exposure = strategy.market_exposure();
        assert_eq!(exposure.market_neutral_ratio, 0.0);
    }
}
