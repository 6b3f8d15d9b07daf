//! Distributional risk, drawdown, risk-adjusted-return ratios, and
//! constrained portfolio allocation.
//!
//! This module wires and re-exports:
//! - `var`: historical, conditional, and parametric VaR,
//! - `metrics`: drawdown, Sharpe/Sortino/Calmar, correlation utilities,
//! - `portfolio`: the long-only constrained mean-variance optimizer.

pub mod metrics;
pub mod portfolio;
pub mod var;

pub use metrics::{
    calmar_ratio, correlation_matrix, diversification_ratio, drawdown, historical_volatility,
    max_drawdown, portfolio_value, rolling_correlation, sharpe_ratio, sortino_ratio, Holding,
    TRADING_DAYS_PER_YEAR,
};
pub use portfolio::{Objective, OptimalAllocation, PortfolioOptimizer};
pub use var::{conditional_var, historical_var, parametric_var};
