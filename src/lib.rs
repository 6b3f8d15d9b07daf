//! Ferroquant is a quantitative-analytics engine for option and futures
//! valuation, implied volatility, portfolio risk and allocation, and
//! leveraged-transaction return analysis.
//!
//! The crate combines closed-form models (Black-Scholes-Merton pricing and
//! Greeks, cost-of-carry futures fair value), the iterative solvers built
//! on them (Newton-Raphson implied volatility, IRR root finding, a
//! box-constrained Nelder-Mead portfolio optimizer), and a risk/return
//! metric library over caller-supplied return and price series.
//!
//! References used across modules include:
//! - Hull, *Options, Futures, and Other Derivatives*, Ch. 5, 15, 19.
//! - Markowitz (1952) for the mean-variance framework.
//! - J.P. Morgan/Reuters, *RiskMetrics Technical Document* (1996).
//!
//! Design constraints:
//! - Every component is a pure, synchronous computation over immutable
//!   inputs; there is no shared state, no I/O, and no logging inside the
//!   engine. Calls on independent inputs can run in parallel without
//!   coordination.
//! - Constructors validate eagerly and fail with
//!   [`core::EngineError::InvalidParameter`]; nothing clamps silently.
//! - Iterative paths are bounded by explicit iteration budgets and report
//!   non-convergence instead of truncating.
//! - Ratio metrics define every zero-denominator case to return 0.0.
//!
//! # Quick Start
//! Price a call and read its Greeks:
//! ```rust
//! use ferroquant::core::OptionType;
//! use ferroquant::pricing::european::BlackScholesModel;
//!
//! let model = BlackScholesModel::new(100.0, 100.0, 1.0, 0.05, 0.20).unwrap();
//! assert!(model.call_price() > 10.0 && model.call_price() < 11.0);
//!
//! let greeks = model.greeks(OptionType::Call);
//! assert!(greeks.delta > 0.0 && greeks.gamma > 0.0);
//! ```
//!
//! Invert implied volatility:
//! ```rust
//! use ferroquant::core::OptionType;
//! use ferroquant::pricing::european::BlackScholesModel;
//! use ferroquant::vol::implied::{implied_volatility, ImpliedVolOptions};
//!
//! let sigma_true = 0.25;
//! let market = BlackScholesModel::new(100.0, 105.0, 1.0, 0.02, sigma_true)
//!     .unwrap()
//!     .call_price();
//! let sigma = implied_volatility(
//!     OptionType::Call, market, 100.0, 105.0, 1.0, 0.02,
//!     &ImpliedVolOptions::default(),
//! )
//! .unwrap();
//! assert!((sigma - sigma_true).abs() < 0.01);
//! ```
//!
//! Run a historical VaR:
//! ```rust
//! use ferroquant::risk::var::historical_var;
//!
//! let returns = [-0.02, -0.015, 0.002, 0.004, 0.01, -0.008, 0.001];
//! let var_95 = historical_var(&returns, 0.95, 1_000_000.0);
//! assert!(var_95 > 0.0);
//! ```
//!
//! Optimize a two-asset allocation:
//! ```rust
//! use ferroquant::risk::portfolio::{Objective, PortfolioOptimizer};
//!
//! let optimizer = PortfolioOptimizer::new(
//!     &[0.08, 0.12],
//!     &[vec![0.04, 0.006], vec![0.006, 0.09]],
//! )
//! .unwrap();
//! let allocation = optimizer.optimize(Objective::MinimumVariance).unwrap();
//! let total: f64 = allocation.weights.iter().sum();
//! assert!((total - 1.0).abs() < 1.0e-6);
//! ```

pub mod core;
pub mod corporate;
pub mod math;
pub mod pricing;
pub mod risk;
pub mod strategies;
pub mod vol;

pub use crate::core::{EngineError, Moneyness, OptionType};
