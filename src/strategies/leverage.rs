//! Leverage arithmetic shared across the strategy types: borrowing cost,
//! leveraged returns, margin-call levels, and scenario comparison.

use serde::{Deserialize, Serialize};

/// Interest on borrowed capital over a holding period, at `annual_rate`
/// accrued daily over a 365-day year.
pub fn borrowing_cost(borrowed_capital: f64, annual_rate: f64, holding_days: u32) -> f64 {
    borrowed_capital * (annual_rate / 365.0) * holding_days as f64
}

/// Return after applying leverage and deducting the borrowing cost on the
/// levered portion (capital normalized to one unit).
pub fn leveraged_return(
    unleveraged_return: f64,
    leverage_ratio: f64,
    borrowing_rate: f64,
    holding_days: u32,
) -> f64 {
    let cost = borrowing_cost(leverage_ratio - 1.0, borrowing_rate, holding_days);
    unleveraged_return * leverage_ratio - cost
}

/// Price at which a maintenance-margin call triggers:
/// `entry * (1 - (1 - margin_requirement) / leverage)`.
pub fn margin_call_price(entry_price: f64, leverage_ratio: f64, margin_requirement: f64) -> f64 {
    let max_loss_pct = (1.0 - margin_requirement) / leverage_ratio;
    entry_price * (1.0 - max_loss_pct)
}

/// Outcome of one leverage multiple under a given price move.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LeverageScenario {
    pub leverage: f64,
    pub gross_profit: f64,
    pub borrowing_cost: f64,
    pub net_profit: f64,
    pub net_return: f64,
}

/// Compares a set of leverage multiples for a single price move and
/// holding period.
///
/// # Examples
/// ```
/// use ferroquant::strategies::leverage::leverage_scenarios;
///
/// let scenarios = leverage_scenarios(1.0e6, 0.05, &[1.0, 2.0, 3.0], 0.03, 30);
/// assert_eq!(scenarios.len(), 3);
/// // Unlevered: 5% gross, no borrowing cost.
/// assert!((scenarios[0].net_return - 0.05).abs() < 1.0e-12);
/// assert!(scenarios[2].gross_profit > scenarios[1].gross_profit);
/// ```
pub fn leverage_scenarios(
    initial_investment: f64,
    price_change_pct: f64,
    leverage_ratios: &[f64],
    borrowing_rate: f64,
    holding_days: u32,
) -> Vec<LeverageScenario> {
    leverage_ratios
        .iter()
        .map(|&leverage| {
            let borrowed = initial_investment * (leverage - 1.0);
            let cost = borrowing_cost(borrowed, borrowing_rate, holding_days);
            let gross_profit = initial_investment * leverage * price_change_pct;
            let net_profit = gross_profit - cost;
            LeverageScenario {
                leverage,
                gross_profit,
                borrowing_cost: cost,
                net_profit,
                net_return: net_profit / initial_investment,
            }
        })
        .collect()
}
