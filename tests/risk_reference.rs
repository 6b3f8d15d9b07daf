use approx::assert_relative_eq;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use statrs::distribution::{ContinuousCDF, Normal as StatrsNormal};

use ferroquant::math::normal_inv_cdf;
use ferroquant::risk::metrics::{
    calmar_ratio, max_drawdown, rolling_correlation, sharpe_ratio, sortino_ratio,
};
use ferroquant::risk::portfolio::{Objective, PortfolioOptimizer};
use ferroquant::risk::var::{conditional_var, historical_var, parametric_var};

fn simulated_returns(n: usize, mean: f64, std: f64, seed: u64) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let dist = Normal::new(mean, std).unwrap();
    (0..n).map(|_| dist.sample(&mut rng)).collect()
}

#[test]
fn inverse_normal_quantiles_match_statrs() {
    let reference = StatrsNormal::new(0.0, 1.0).unwrap();
    for &p in &[0.01, 0.05, 0.1, 0.5, 0.9, 0.95, 0.99] {
        assert_relative_eq!(
            normal_inv_cdf(p),
            reference.inverse_cdf(p),
            epsilon = 1.0e-6
        );
    }
}

#[test]
fn historical_var_is_monotone_in_confidence() {
    let returns = simulated_returns(1_000, 0.0005, 0.02, 42);
    let portfolio_value = 1_000_000.0;

    let var_90 = historical_var(&returns, 0.90, portfolio_value);
    let var_95 = historical_var(&returns, 0.95, portfolio_value);
    let var_99 = historical_var(&returns, 0.99, portfolio_value);

    assert!(var_95 >= var_90);
    assert!(var_99 >= var_95);
    assert!(var_95 > 0.0);
}

#[test]
fn conditional_var_dominates_historical_var() {
    let returns = simulated_returns(1_000, 0.0, 0.015, 7);
    let var = historical_var(&returns, 0.95, 1.0);
    let cvar = conditional_var(&returns, 0.95, 1.0);
    assert!(cvar >= var);
}

#[test]
fn parametric_var_tracks_historical_var_for_normal_returns() {
    let returns = simulated_returns(5_000, 0.0, 0.02, 11);
    let parametric = parametric_var(&returns, 0.95, 1.0);
    let historical = historical_var(&returns, 0.95, 1.0);

    // Both estimate the same 5% tail of a normal sample.
    assert!((parametric - historical).abs() / historical < 0.15);
}

#[test]
fn all_zero_returns_yield_zero_ratios_without_failing() {
    let zeros = vec![0.0_f64; 252];
    assert_eq!(sharpe_ratio(&zeros, 0.02, 252.0), 0.0);
    assert_eq!(sortino_ratio(&zeros, 0.0, 0.0, 252.0), 0.0);
}

#[test]
fn risk_metrics_behave_on_a_simulated_equity_curve() {
    let returns = simulated_returns(504, 0.002, 0.012, 99);
    let mut prices = vec![100.0];
    for r in &returns {
        let last = *prices.last().unwrap();
        prices.push(last * (1.0 + r));
    }

    let max_dd = max_drawdown(&prices);
    assert!(max_dd > 0.0 && max_dd < 1.0);

    let calmar = calmar_ratio(&returns, &prices, 252.0);
    let sharpe = sharpe_ratio(&returns, 0.02, 252.0);
    assert!(calmar.is_finite());
    assert!(sharpe.is_finite());
    assert!(sharpe > 0.0);
}

#[test]
fn rolling_correlation_of_a_series_with_itself_is_one() {
    let series = simulated_returns(120, 0.0, 0.01, 3);
    let corr = rolling_correlation(&series, &series, 30);
    assert_eq!(corr.len(), 90);
    for c in corr {
        assert_relative_eq!(c, 1.0, epsilon = 1.0e-9);
    }
}

#[test]
fn optimizer_output_is_always_feasible() {
    let optimizer = PortfolioOptimizer::new(
        &[0.05, 0.09, 0.12, 0.07],
        &[
            vec![0.0225, 0.0030, 0.0018, 0.0012],
            vec![0.0030, 0.0625, 0.0075, 0.0020],
            vec![0.0018, 0.0075, 0.1024, 0.0016],
            vec![0.0012, 0.0020, 0.0016, 0.0144],
        ],
    )
    .unwrap();

    for objective in [
        Objective::MinimumVariance,
        Objective::MaximumSharpe { risk_free_rate: 0.02 },
    ] {
        let allocation = optimizer.optimize(objective).unwrap();

        let total: f64 = allocation.weights.iter().sum();
        assert_relative_eq!(total, 1.0, epsilon = 1.0e-6);
        for &w in &allocation.weights {
            assert!((-1.0e-9..=1.0 + 1.0e-9).contains(&w), "weight {w} out of range");
        }

        let (expected, std_dev) = optimizer.portfolio_stats(&allocation.weights);
        assert_relative_eq!(expected, allocation.expected_return, epsilon = 1.0e-9);
        assert_relative_eq!(std_dev, allocation.std_dev, epsilon = 1.0e-9);
    }
}

#[test]
fn minimum_variance_beats_equal_weights() {
    let optimizer = PortfolioOptimizer::new(
        &[0.06, 0.08, 0.10],
        &[
            vec![0.0400, 0.0060, 0.0040],
            vec![0.0060, 0.0900, 0.0075],
            vec![0.0040, 0.0075, 0.1600],
        ],
    )
    .unwrap();

    let allocation = optimizer.optimize(Objective::MinimumVariance).unwrap();
    let (_, optimized_std) = optimizer.portfolio_stats(&allocation.weights);
    let (_, equal_std) = optimizer.portfolio_stats(&[1.0 / 3.0; 3]);

    assert!(optimized_std <= equal_std + 1.0e-6);
}

#[test]
fn non_psd_covariance_surfaces_optimization_failure() {
    let optimizer =
        PortfolioOptimizer::new(&[0.05, 0.05], &[vec![1.0, 2.0], vec![2.0, 1.0]]).unwrap();
    assert!(optimizer.optimize(Objective::MinimumVariance).is_err());
}
