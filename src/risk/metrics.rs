//! Drawdown, risk-adjusted-return ratios, and correlation utilities.
//!
//! Every ratio defines its zero-denominator case explicitly and returns
//! 0.0 instead of raising or propagating NaN. Small and synthetic series
//! hit these cases routinely, so the sentinel is part of the contract,
//! not a convenience.

use serde::{Deserialize, Serialize};

use crate::math::{log_returns, mean, pearson_correlation, population_std};

/// Default annualization factor for daily observations.
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// A holding marked at a price, for portfolio-value aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    pub quantity: f64,
    pub price: f64,
}

/// Total marked value of a set of holdings.
pub fn portfolio_value(holdings: &[Holding]) -> f64 {
    holdings.iter().map(|h| h.quantity * h.price).sum()
}

/// Drawdown magnitude at each point: `(runningMax - price) / runningMax`.
pub fn drawdown(prices: &[f64]) -> Vec<f64> {
    let mut running_max = f64::NEG_INFINITY;
    prices
        .iter()
        .map(|&p| {
            running_max = running_max.max(p);
            ((p - running_max) / running_max).abs()
        })
        .collect()
}

/// Largest drawdown magnitude over the series; 0.0 for an empty series.
pub fn max_drawdown(prices: &[f64]) -> f64 {
    drawdown(prices).into_iter().fold(0.0, f64::max)
}

/// Annualized Sharpe ratio.
///
/// The mean return scales by `periods_per_year` and the standard deviation
/// by its square root. Returns 0.0 for an empty series or zero variance.
///
/// # Examples
/// ```
/// use ferroquant::risk::metrics::{sharpe_ratio, TRADING_DAYS_PER_YEAR};
///
/// let flat = [0.0_f64; 30];
/// assert_eq!(sharpe_ratio(&flat, 0.02, TRADING_DAYS_PER_YEAR), 0.0);
/// ```
pub fn sharpe_ratio(returns: &[f64], risk_free_rate: f64, periods_per_year: f64) -> f64 {
    if returns.is_empty() {
        return 0.0;
    }

    let annual_mean = mean(returns) * periods_per_year;
    let annual_std = population_std(returns) * periods_per_year.sqrt();
    if annual_std == 0.0 {
        return 0.0;
    }
    (annual_mean - risk_free_rate) / annual_std
}

/// Annualized Sortino ratio: the Sharpe numerator over the downside
/// deviation of below-target excess returns.
///
/// Returns 0.0 when the below-target subset is empty or has zero
/// deviation.
pub fn sortino_ratio(
    returns: &[f64],
    target_return: f64,
    risk_free_rate: f64,
    periods_per_year: f64,
) -> f64 {
    if returns.is_empty() {
        return 0.0;
    }

    let downside: Vec<f64> = returns
        .iter()
        .map(|r| r - target_return)
        .filter(|e| *e < 0.0)
        .collect();
    if downside.is_empty() {
        return 0.0;
    }

    let downside_std = population_std(&downside) * periods_per_year.sqrt();
    if downside_std == 0.0 {
        return 0.0;
    }

    (mean(returns) * periods_per_year - risk_free_rate) / downside_std
}

/// Calmar ratio: annualized mean return over max drawdown of the price
/// series. Returns 0.0 when the drawdown is 0.
pub fn calmar_ratio(returns: &[f64], prices: &[f64], periods_per_year: f64) -> f64 {
    let max_dd = max_drawdown(prices);
    if max_dd == 0.0 {
        return 0.0;
    }
    mean(returns) * periods_per_year / max_dd
}

/// Rolling Pearson correlation over a sliding window.
///
/// The output has `len - window` entries, one per window start. Windows
/// with zero variance in either slice contribute 0.0.
pub fn rolling_correlation(a: &[f64], b: &[f64], window: usize) -> Vec<f64> {
    assert_eq!(a.len(), b.len(), "series must have equal length");
    assert!(window >= 2, "window must be >= 2");
    if a.len() <= window {
        return Vec::new();
    }

    (0..a.len() - window)
        .map(|i| pearson_correlation(&a[i..i + window], &b[i..i + window]))
        .collect()
}

/// Pairwise Pearson correlation matrix over a set of equal-length series.
pub fn correlation_matrix(series: &[Vec<f64>]) -> Vec<Vec<f64>> {
    let n = series.len();
    let mut out = vec![vec![0.0; n]; n];
    for i in 0..n {
        out[i][i] = 1.0;
        for j in (i + 1)..n {
            let c = pearson_correlation(&series[i], &series[j]);
            out[i][j] = c;
            out[j][i] = c;
        }
    }
    out
}

/// Annualized historical volatility from the trailing `window` log
/// returns of a price series. Returns 0.0 with fewer than two prices.
pub fn historical_volatility(prices: &[f64], window: usize) -> f64 {
    if prices.len() < 2 {
        return 0.0;
    }

    let returns = log_returns(prices);
    let recent = if returns.len() > window {
        &returns[returns.len() - window..]
    } else {
        &returns[..]
    };
    population_std(recent) * TRADING_DAYS_PER_YEAR.sqrt()
}

/// Diversification ratio: weighted average of individual volatilities
/// over the portfolio volatility. Returns 0.0 when portfolio volatility
/// is 0.
pub fn diversification_ratio(
    weights: &[f64],
    individual_vols: &[f64],
    portfolio_vol: f64,
) -> f64 {
    assert_eq!(
        weights.len(),
        individual_vols.len(),
        "weights and vols must have equal length"
    );
    if portfolio_vol <= 0.0 {
        return 0.0;
    }
    let weighted: f64 = weights
        .iter()
        .zip(individual_vols.iter())
        .map(|(w, v)| w * v)
        .sum();
    weighted / portfolio_vol
}
