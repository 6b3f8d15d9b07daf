//! Private-equity return measures: IRR, MOIC, and fund-level ratios.
//!
//! IRR solves for the discount rate that zeroes the net present value of
//! a cash-flow schedule, Newton first with a bisection fallback. A
//! schedule without a sign change has no root, which is reported as
//! non-convergence rather than papered over with a default.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::EngineError;

/// Rates are kept above this floor so the discount factor stays defined.
const RATE_FLOOR: f64 = -0.9999;
const MAX_NEWTON_ITERATIONS: usize = 50;
const MAX_BISECTION_ITERATIONS: usize = 200;

/// Signed cash flows keyed by period index; period 0 is the initial
/// outlay and is conventionally negative.
///
/// # Examples
/// ```
/// use ferroquant::corporate::returns::{irr, CashFlowSchedule};
///
/// let schedule = CashFlowSchedule::from_pairs(&[(0, -100.0), (1, 110.0)]);
/// let rate = irr(&schedule).unwrap();
/// assert!((rate - 0.10).abs() < 1.0e-6);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CashFlowSchedule {
    flows: BTreeMap<u32, f64>,
}

impl CashFlowSchedule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a schedule from `(period, amount)` pairs; a repeated period
    /// keeps the last amount.
    pub fn from_pairs(pairs: &[(u32, f64)]) -> Self {
        let mut schedule = Self::new();
        for &(period, amount) in pairs {
            schedule.set(period, amount);
        }
        schedule
    }

    pub fn set(&mut self, period: u32, amount: f64) {
        self.flows.insert(period, amount);
    }

    /// Amount at a period, 0.0 when absent.
    pub fn amount(&self, period: u32) -> f64 {
        self.flows.get(&period).copied().unwrap_or(0.0)
    }

    pub fn is_empty(&self) -> bool {
        self.flows.is_empty()
    }

    /// Flows as a dense vector indexed by period, zero-filled for the
    /// periods in between.
    pub fn dense(&self) -> Vec<f64> {
        let Some((&last, _)) = self.flows.iter().next_back() else {
            return Vec::new();
        };
        let mut dense = vec![0.0; last as usize + 1];
        for (&period, &amount) in &self.flows {
            dense[period as usize] = amount;
        }
        dense
    }
}

/// Net present value of a schedule at a discount rate.
pub fn npv(rate: f64, schedule: &CashFlowSchedule) -> f64 {
    npv_dense(rate, &schedule.dense())
}

fn npv_dense(rate: f64, flows: &[f64]) -> f64 {
    flows
        .iter()
        .enumerate()
        .map(|(t, cash)| cash / (1.0 + rate).powi(t as i32))
        .sum()
}

fn npv_derivative(rate: f64, flows: &[f64]) -> f64 {
    flows
        .iter()
        .enumerate()
        .skip(1)
        .map(|(t, cash)| -(t as f64) * cash / (1.0 + rate).powi(t as i32 + 1))
        .sum()
}

/// Internal rate of return of a cash-flow schedule.
///
/// # Errors
/// `DidNotConverge` when the schedule has no sign change (zero iterations
/// spent; there is no root to find) or when neither Newton nor the
/// bisection fallback locates one within the iteration budget.
pub fn irr(schedule: &CashFlowSchedule) -> Result<f64, EngineError> {
    let flows = schedule.dense();
    let has_inflow = flows.iter().any(|&c| c > 0.0);
    let has_outflow = flows.iter().any(|&c| c < 0.0);
    if !has_inflow || !has_outflow {
        return Err(EngineError::DidNotConverge { iterations: 0 });
    }

    let scale = flows.iter().fold(0.0_f64, |acc, c| acc.max(c.abs()));
    let tolerance = 1.0e-9 * scale;

    let mut rate = 0.1;
    for _ in 0..MAX_NEWTON_ITERATIONS {
        let value = npv_dense(rate, &flows);
        if value.abs() < tolerance {
            return Ok(rate);
        }
        let derivative = npv_derivative(rate, &flows);
        if derivative.abs() < 1.0e-12 * scale.max(1.0) {
            break;
        }
        let next = rate - value / derivative;
        if !next.is_finite() {
            break;
        }
        rate = next.max(RATE_FLOOR);
    }

    bisect_irr(&flows, tolerance).ok_or(EngineError::DidNotConverge {
        iterations: MAX_NEWTON_ITERATIONS + MAX_BISECTION_ITERATIONS,
    })
}

/// Brackets a sign change of the NPV on a coarse rate grid and bisects.
fn bisect_irr(flows: &[f64], tolerance: f64) -> Option<f64> {
    let mut lo = RATE_FLOOR;
    let mut f_lo = npv_dense(lo, flows);
    let mut bracket = None;

    let mut rate = lo;
    while rate < 10.0 {
        rate += 0.05;
        let value = npv_dense(rate, flows);
        if f_lo.signum() != value.signum() {
            bracket = Some((lo, rate));
            break;
        }
        lo = rate;
        f_lo = value;
    }

    let (mut a, mut b) = bracket?;
    let mut f_a = npv_dense(a, flows);
    for _ in 0..MAX_BISECTION_ITERATIONS {
        let mid = 0.5 * (a + b);
        let f_mid = npv_dense(mid, flows);
        if f_mid.abs() < tolerance || (b - a) < 1.0e-12 {
            return Some(mid);
        }
        if f_a.signum() != f_mid.signum() {
            b = mid;
        } else {
            a = mid;
            f_a = f_mid;
        }
    }
    None
}

/// Multiple on invested capital; 0.0 when nothing was invested.
pub fn moic(invested_capital: f64, proceeds: f64) -> f64 {
    if invested_capital > 0.0 {
        proceeds / invested_capital
    } else {
        0.0
    }
}

/// Distributed, residual, and total value relative to paid-in capital.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FundMetrics {
    pub dpi: f64,
    pub rvpi: f64,
    pub tvpi: f64,
}

/// DPI/RVPI/TVPI ratios; all 0.0 when no capital has been called.
pub fn fund_metrics(
    called_capital: f64,
    distributed_capital: f64,
    residual_value: f64,
) -> FundMetrics {
    if called_capital <= 0.0 {
        return FundMetrics {
            dpi: 0.0,
            rvpi: 0.0,
            tvpi: 0.0,
        };
    }
    let dpi = distributed_capital / called_capital;
    let rvpi = residual_value / called_capital;
    FundMetrics {
        dpi,
        rvpi,
        tvpi: dpi + rvpi,
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn one_period_irr_is_exact() {
        let schedule = CashFlowSchedule::from_pairs(&[(0, -100.0), (1, 110.0)]);
        let rate = irr(&schedule).unwrap();
        assert_relative_eq!(rate, 0.10, epsilon = 1.0e-6);
    }

    #[test]
    fn irr_zeroes_the_npv_for_a_multi_year_schedule() {
        let schedule = CashFlowSchedule::from_pairs(&[
            (0, -1_000.0),
            (1, 300.0),
            (2, 400.0),
            (3, 500.0),
            (5, 200.0),
        ]);
        let rate = irr(&schedule).unwrap();
        assert!(npv(rate, &schedule).abs() < 1.0e-5);
        assert!(rate > 0.0 && rate < 1.0);
    }

    #[test]
    fn schedule_without_sign_change_has_no_irr() {
        let all_in = CashFlowSchedule::from_pairs(&[(0, 100.0), (1, 50.0)]);
        assert_eq!(
            irr(&all_in),
            Err(EngineError::DidNotConverge { iterations: 0 })
        );

        let all_out = CashFlowSchedule::from_pairs(&[(0, -100.0), (3, -50.0)]);
        assert!(irr(&all_out).is_err());
    }

    #[test]
    fn dense_fills_skipped_periods_with_zero() {
        let schedule = CashFlowSchedule::from_pairs(&[(0, -10.0), (3, 15.0)]);
        assert_eq!(schedule.dense(), vec![-10.0, 0.0, 0.0, 15.0]);
        assert_eq!(schedule.amount(2), 0.0);
    }

    #[test]
    fn npv_at_zero_rate_is_the_plain_sum() {
        let schedule = CashFlowSchedule::from_pairs(&[(0, -100.0), (1, 60.0), (2, 60.0)]);
        assert_relative_eq!(npv(0.0, &schedule), 20.0, epsilon = 1.0e-12);
    }

    #[test]
    fn moic_and_fund_metric_sentinels() {
        assert_relative_eq!(moic(300.0, 780.0), 2.6, epsilon = 1.0e-12);
        assert_eq!(moic(0.0, 500.0), 0.0);

        let metrics = fund_metrics(100.0, 150.0, 30.0);
        assert_relative_eq!(metrics.dpi, 1.5, epsilon = 1.0e-12);
        assert_relative_eq!(metrics.rvpi, 0.3, epsilon = 1.0e-12);
        assert_relative_eq!(metrics.tvpi, 1.8, epsilon = 1.0e-12);

        let empty = fund_metrics(0.0, 10.0, 10.0);
        assert_eq!((empty.dpi, empty.rvpi, empty.tvpi), (0.0, 0.0, 0.0));
    }
}
