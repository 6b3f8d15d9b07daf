//! Value-at-Risk and Conditional-VaR estimators over a return series.
//!
//! Historical VaR reads the empirical quantile with linear-interpolation
//! percentile semantics so results reproduce across implementations.
//! Parametric VaR evaluates the closed-form inverse normal CDF directly;
//! no sampling is involved and results are fully deterministic.
//!
//! All estimators report a loss magnitude scaled by portfolio value and
//! return 0.0 for an empty series, the documented degenerate-input
//! fallback.
//!
//! References:
//! - J.P. Morgan/Reuters, *RiskMetrics Technical Document* (1996).
//! - McNeil, Frey, Embrechts, *Quantitative Risk Management* (2015).

use crate::math::{mean, normal_inv_cdf, population_std, quantile};

fn validate_confidence(confidence: f64) {
    assert!(
        (0.0..1.0).contains(&confidence) && confidence > 0.0,
        "confidence must be in (0,1)"
    );
}

/// Historical VaR: the `(1 - confidence)` quantile of the return
/// distribution, as a loss magnitude scaled by `portfolio_value`.
///
/// # Examples
/// ```
/// use ferroquant::risk::var::historical_var;
///
/// let returns = [-0.05, -0.02, -0.01, 0.0, 0.01, 0.02, 0.03, 0.04, 0.05, 0.06];
/// let var_95 = historical_var(&returns, 0.95, 1_000_000.0);
/// assert!(var_95 > 0.0);
/// ```
pub fn historical_var(returns: &[f64], confidence: f64, portfolio_value: f64) -> f64 {
    validate_confidence(confidence);
    if returns.is_empty() {
        return 0.0;
    }
    quantile(returns, 1.0 - confidence).abs() * portfolio_value
}

/// Conditional VaR (expected shortfall): the mean of all returns at or
/// below the VaR quantile, as a loss magnitude scaled by `portfolio_value`.
pub fn conditional_var(returns: &[f64], confidence: f64, portfolio_value: f64) -> f64 {
    validate_confidence(confidence);
    if returns.is_empty() {
        return 0.0;
    }

    let cutoff = quantile(returns, 1.0 - confidence);
    let tail: Vec<f64> = returns.iter().copied().filter(|&r| r <= cutoff).collect();
    // The minimum return is always <= the quantile, so the tail is non-empty.
    mean(&tail).abs() * portfolio_value
}

/// Parametric (delta-normal) VaR under a normal-returns assumption:
/// `|mean - z sigma|` scaled by `portfolio_value`, with `z` the standard
/// normal quantile at the confidence level.
pub fn parametric_var(returns: &[f64], confidence: f64, portfolio_value: f64) -> f64 {
    validate_confidence(confidence);
    if returns.is_empty() {
        return 0.0;
    }

    let z = normal_inv_cdf(confidence);
    (mean(returns) - z * population_std(returns)).abs() * portfolio_value
}
