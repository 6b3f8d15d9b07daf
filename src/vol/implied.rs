//! Newton-Raphson implied-volatility inversion of the Black-Scholes model.
//!
//! The solver rebuilds a pricing model at each candidate volatility and
//! walks the price error down the vega slope. Volatility is clamped to a
//! strictly positive floor after every update; this is a deliberate policy
//! to keep the iterate inside the model's valid domain, not an incidental
//! detail, and it is part of the solver contract.

use crate::core::{EngineError, OptionType};
use crate::pricing::european::BlackScholesModel;

/// Tuning knobs for [`implied_volatility`].
///
/// The defaults match common desk practice: a 20% seed, price tolerance of
/// 1e-5, and a hundred Newton steps before giving up.
#[derive(Debug, Clone, Copy)]
pub struct ImpliedVolOptions {
    /// Starting volatility for the iteration.
    pub initial_sigma: f64,
    /// Absolute price-error tolerance for convergence.
    pub tolerance: f64,
    /// Iteration budget before reporting non-convergence.
    pub max_iterations: usize,
    /// Lower clamp applied to the iterate after each update.
    pub sigma_floor: f64,
    /// Vega below this floor makes the Newton update undefined.
    pub vega_floor: f64,
}

impl Default for ImpliedVolOptions {
    fn default() -> Self {
        Self {
            initial_sigma: 0.20,
            tolerance: 1.0e-5,
            max_iterations: 100,
            sigma_floor: 1.0e-4,
            vega_floor: 1.0e-10,
        }
    }
}

/// Solves for the volatility that reproduces `market_price` under the
/// Black-Scholes model.
///
/// # Errors
/// - `InvalidParameter` when `s`, `k`, or `t` is non-positive, the market
///   price is negative, or any input is non-finite.
/// - `VegaTooSmall` when vega underflows and the update step is undefined.
/// - `DidNotConverge` when the iteration budget is exhausted.
///
/// Both solver failures are recoverable: retry with a different
/// `initial_sigma` or a looser tolerance.
///
/// # Examples
/// ```
/// use ferroquant::core::OptionType;
/// use ferroquant::pricing::european::BlackScholesModel;
/// use ferroquant::vol::implied::{implied_volatility, ImpliedVolOptions};
///
/// let model = BlackScholesModel::new(100.0, 100.0, 1.0, 0.05, 0.25).unwrap();
/// let market = model.call_price();
/// let sigma = implied_volatility(
///     OptionType::Call,
///     market,
///     100.0,
///     100.0,
///     1.0,
///     0.05,
///     &ImpliedVolOptions::default(),
/// )
/// .unwrap();
/// assert!((sigma - 0.25).abs() < 0.01);
/// ```
pub fn implied_volatility(
    option_type: OptionType,
    market_price: f64,
    s: f64,
    k: f64,
    t: f64,
    r: f64,
    options: &ImpliedVolOptions,
) -> Result<f64, EngineError> {
    if !market_price.is_finite() {
        return Err(EngineError::InvalidParameter(
            "market price must be finite".to_string(),
        ));
    }
    if market_price < 0.0 {
        return Err(EngineError::InvalidParameter(format!(
            "market price must be >= 0, got {market_price}"
        )));
    }

    let mut sigma = options.initial_sigma.max(options.sigma_floor);

    for _ in 0..options.max_iterations {
        let model = BlackScholesModel::new(s, k, t, r, sigma)?;
        let price_error = model.price(option_type) - market_price;

        if price_error.abs() < options.tolerance {
            return Ok(sigma);
        }

        // Rescale from the per-percentage-point quote to price per unit vol.
        let vega = model.vega() * 100.0;
        if vega < options.vega_floor {
            return Err(EngineError::VegaTooSmall(vega));
        }

        sigma = (sigma - price_error / vega).max(options.sigma_floor);
    }

    Err(EngineError::DidNotConverge {
        iterations: options.max_iterations,
    })
}
