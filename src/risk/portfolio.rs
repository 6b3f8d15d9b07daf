//! Constrained portfolio allocation over mean returns and a covariance
//! matrix.
//!
//! Both objectives run the box-constrained Nelder-Mead minimizer over a
//! normalized-weight parameterization: candidate vectors live in the unit
//! box and are rescaled to sum to one inside the objective, which keeps
//! every iterate long-only and fully invested by construction. A small
//! quadratic penalty pins the raw vector near the simplex so the search
//! has no flat ray directions.
//!
//! References: Markowitz (1952) for the mean-variance frontier; Nelder and
//! Mead (1965) for the solver.

use nalgebra::{DMatrix, DVector, SymmetricEigen};
use serde::{Deserialize, Serialize};

use crate::core::EngineError;
use crate::math::{nelder_mead, BoxConstraints, NelderMeadOptions};

/// Objective for [`PortfolioOptimizer::optimize`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Objective {
    /// Minimize portfolio variance `w' Sigma w`.
    MinimumVariance,
    /// Maximize `(mean . w - risk_free_rate) / sqrt(w' Sigma w)`.
    MaximumSharpe { risk_free_rate: f64 },
}

/// Optimal long-only, fully-invested allocation and its realized
/// statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimalAllocation {
    /// Weights summing to one, each in `[0, 1]`.
    pub weights: Vec<f64>,
    pub expected_return: f64,
    pub std_dev: f64,
    pub sharpe: f64,
}

/// Mean returns and covariance over `N >= 1` assets, owned for the
/// duration of an optimization call.
#[derive(Debug, Clone, PartialEq)]
pub struct PortfolioOptimizer {
    mean_returns: DVector<f64>,
    covariance: DMatrix<f64>,
}

impl PortfolioOptimizer {
    /// Builds an optimizer from per-asset mean returns and an `N x N`
    /// covariance matrix given as rows.
    ///
    /// # Errors
    /// `InvalidParameter` when the dimensions disagree, the matrix is not
    /// square, it is asymmetric beyond a small tolerance, or any entry is
    /// non-finite.
    pub fn new(mean_returns: &[f64], covariance: &[Vec<f64>]) -> Result<Self, EngineError> {
        let n = mean_returns.len();
        if n == 0 {
            return Err(EngineError::InvalidParameter(
                "at least one asset is required".to_string(),
            ));
        }
        if covariance.len() != n || covariance.iter().any(|row| row.len() != n) {
            return Err(EngineError::InvalidParameter(format!(
                "covariance must be {n}x{n} to match {n} mean returns"
            )));
        }
        if mean_returns.iter().any(|m| !m.is_finite())
            || covariance.iter().flatten().any(|c| !c.is_finite())
        {
            return Err(EngineError::InvalidParameter(
                "optimizer inputs must be finite".to_string(),
            ));
        }
        for i in 0..n {
            for j in (i + 1)..n {
                let diff = (covariance[i][j] - covariance[j][i]).abs();
                let scale = covariance[i][j].abs().max(covariance[j][i].abs()).max(1.0);
                if diff > 1.0e-8 * scale {
                    return Err(EngineError::InvalidParameter(format!(
                        "covariance is asymmetric at ({i}, {j})"
                    )));
                }
            }
        }

        let flat: Vec<f64> = covariance.iter().flatten().copied().collect();
        Ok(Self {
            mean_returns: DVector::from_column_slice(mean_returns),
            covariance: DMatrix::from_row_slice(n, n, &flat),
        })
    }

    /// Number of assets.
    pub fn asset_count(&self) -> usize {
        self.mean_returns.len()
    }

    /// Expected return and standard deviation at a weight vector.
    pub fn portfolio_stats(&self, weights: &[f64]) -> (f64, f64) {
        assert_eq!(
            weights.len(),
            self.asset_count(),
            "weight vector must match asset count"
        );
        let w = DVector::from_column_slice(weights);
        let expected = self.mean_returns.dot(&w);
        let variance = (&self.covariance * &w).dot(&w);
        (expected, variance.max(0.0).sqrt())
    }

    /// Sharpe ratio at a weight vector; 0.0 when the standard deviation
    /// is 0.
    pub fn sharpe_ratio(&self, weights: &[f64], risk_free_rate: f64) -> f64 {
        let (expected, std_dev) = self.portfolio_stats(weights);
        if std_dev > 0.0 {
            (expected - risk_free_rate) / std_dev
        } else {
            0.0
        }
    }

    /// Runs the constrained minimization for the requested objective,
    /// seeded at equal weights.
    ///
    /// # Errors
    /// `OptimizationFailed` when the covariance matrix is not positive
    /// semi-definite or the minimizer does not converge. An arbitrary
    /// stationary point is never returned silently.
    ///
    /// # Examples
    /// ```
    /// use ferroquant::risk::portfolio::{Objective, PortfolioOptimizer};
    ///
    /// let optimizer = PortfolioOptimizer::new(
    ///     &[0.08, 0.12],
    ///     &[vec![0.04, 0.0], vec![0.0, 0.09]],
    /// )
    /// .unwrap();
    /// let allocation = optimizer.optimize(Objective::MinimumVariance).unwrap();
    /// let total: f64 = allocation.weights.iter().sum();
    /// assert!((total - 1.0).abs() < 1.0e-6);
    /// ```
    pub fn optimize(&self, objective: Objective) -> Result<OptimalAllocation, EngineError> {
        self.check_positive_semi_definite()?;

        let n = self.asset_count();
        if n == 1 {
            return Ok(self.allocation_at(&[1.0], objective));
        }

        let bounds = BoxConstraints::unit(n)?;
        let seed = vec![1.0 / n as f64; n];
        let options = NelderMeadOptions {
            max_iterations: 5_000,
            tolerance: 1.0e-9,
            ..NelderMeadOptions::default()
        };

        let result = nelder_mead(&seed, &bounds, options, |x| {
            let Some(w) = normalize(x) else {
                return f64::MAX;
            };
            let sum: f64 = x.iter().sum();
            let penalty = (sum - 1.0) * (sum - 1.0);
            let value = match objective {
                Objective::MinimumVariance => self.variance_at(&w),
                Objective::MaximumSharpe { risk_free_rate } => {
                    -self.sharpe_ratio(&w, risk_free_rate)
                }
            };
            value + penalty
        })?;

        if !result.converged {
            return Err(EngineError::OptimizationFailed(format!(
                "minimizer did not converge within {} iterations",
                result.iterations
            )));
        }

        let weights = normalize(&result.x).ok_or_else(|| {
            EngineError::OptimizationFailed("minimizer collapsed to a zero weight vector".to_string())
        })?;

        Ok(self.allocation_at(&weights, objective))
    }

    fn variance_at(&self, weights: &[f64]) -> f64 {
        let w = DVector::from_column_slice(weights);
        (&self.covariance * &w).dot(&w)
    }

    fn allocation_at(&self, weights: &[f64], objective: Objective) -> OptimalAllocation {
        let (expected_return, std_dev) = self.portfolio_stats(weights);
        // The min-variance report quotes Sharpe at the conventional 2%.
        let risk_free_rate = match objective {
            Objective::MaximumSharpe { risk_free_rate } => risk_free_rate,
            Objective::MinimumVariance => 0.02,
        };
        OptimalAllocation {
            weights: weights.to_vec(),
            expected_return,
            std_dev,
            sharpe: self.sharpe_ratio(weights, risk_free_rate),
        }
    }

    fn check_positive_semi_definite(&self) -> Result<(), EngineError> {
        let eigen = SymmetricEigen::new(self.covariance.clone());
        let max_abs = eigen
            .eigenvalues
            .iter()
            .fold(0.0_f64, |acc, e| acc.max(e.abs()));
        let floor = -1.0e-8 * max_abs.max(1.0);
        if eigen.eigenvalues.iter().any(|&e| e < floor) {
            return Err(EngineError::OptimizationFailed(
                "covariance matrix is not positive semi-definite".to_string(),
            ));
        }
        Ok(())
    }
}

/// Rescales a non-negative vector to sum to one; `None` when the mass is
/// numerically zero.
fn normalize(x: &[f64]) -> Option<Vec<f64>> {
    let sum: f64 = x.iter().sum();
    if sum <= 1.0e-12 {
        return None;
    }
    Some(x.iter().map(|v| v / sum).collect())
}
