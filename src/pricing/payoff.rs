//! Pure payoff and sensitivity-surface evaluators for presentation layers.
//!
//! Nothing here renders. The functions evaluate expiry P&L and Greek values
//! over caller-chosen grids so a charting layer can plot them without
//! knowing the model internals.

use crate::core::{EngineError, OptionType};
use crate::pricing::european::BlackScholesModel;

/// Direction of an option position for payoff purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionSide {
    Long,
    Short,
}

/// Greek selected for a sensitivity surface.
///
/// `Theta` is reported per day, the convention used by desk heatmaps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceGreek {
    Delta,
    Gamma,
    Theta,
    Vega,
}

/// One leg of a multi-leg option strategy.
#[derive(Debug, Clone, PartialEq)]
pub struct StrategyLeg {
    pub option_type: OptionType,
    pub side: PositionSide,
    pub strike: f64,
    pub premium: f64,
    pub quantity: f64,
}

/// Expiry P&L of a single option position at one spot level.
///
/// Long positions pay the premium and earn the exercise value; short
/// positions collect the premium and owe the exercise value.
pub fn expiry_pnl(
    option_type: OptionType,
    side: PositionSide,
    strike: f64,
    premium: f64,
    spot: f64,
) -> f64 {
    let exercise = match option_type {
        OptionType::Call => (spot - strike).max(0.0),
        OptionType::Put => (strike - spot).max(0.0),
    };
    match side {
        PositionSide::Long => exercise - premium,
        PositionSide::Short => premium - exercise,
    }
}

/// Expiry P&L of a single position over a spot axis.
pub fn payoff_curve(
    option_type: OptionType,
    side: PositionSide,
    strike: f64,
    premium: f64,
    spot_axis: &[f64],
) -> Vec<f64> {
    spot_axis
        .iter()
        .map(|&s| expiry_pnl(option_type, side, strike, premium, s))
        .collect()
}

/// Combined expiry P&L of a multi-leg strategy over a spot axis.
///
/// # Examples
/// ```
/// use ferroquant::core::OptionType;
/// use ferroquant::pricing::payoff::{strategy_payoff_curve, PositionSide, StrategyLeg};
///
/// // Bull call spread: buy the 100 call, sell the 110 call.
/// let legs = vec![
///     StrategyLeg {
///         option_type: OptionType::Call,
///         side: PositionSide::Long,
///         strike: 100.0,
///         premium: 5.0,
///         quantity: 1.0,
///     },
///     StrategyLeg {
///         option_type: OptionType::Call,
///         side: PositionSide::Short,
///         strike: 110.0,
///         premium: 2.0,
///         quantity: 1.0,
///     },
/// ];
/// let pnl = strategy_payoff_curve(&legs, &[90.0, 105.0, 120.0]);
/// assert_eq!(pnl, vec![-3.0, 2.0, 7.0]);
/// ```
pub fn strategy_payoff_curve(legs: &[StrategyLeg], spot_axis: &[f64]) -> Vec<f64> {
    spot_axis
        .iter()
        .map(|&s| {
            legs.iter()
                .map(|leg| {
                    leg.quantity * expiry_pnl(leg.option_type, leg.side, leg.strike, leg.premium, s)
                })
                .sum()
        })
        .collect()
}

/// Greek values over a spot/volatility grid at fixed strike, expiry, rate.
///
/// The output has one row per volatility and one column per spot, the
/// orientation heatmap consumers expect. Grid axes must be strictly
/// positive since each cell constructs a validated pricing model.
///
/// # Errors
/// `InvalidParameter` when `k` or `t` is non-positive, or any axis value
/// fails model validation.
pub fn greek_surface(
    option_type: OptionType,
    greek: SurfaceGreek,
    k: f64,
    t: f64,
    r: f64,
    spot_axis: &[f64],
    vol_axis: &[f64],
) -> Result<Vec<Vec<f64>>, EngineError> {
    let mut surface = Vec::with_capacity(vol_axis.len());
    for &sigma in vol_axis {
        let mut row = Vec::with_capacity(spot_axis.len());
        for &s in spot_axis {
            let model = BlackScholesModel::new(s, k, t, r, sigma)?;
            let value = match greek {
                SurfaceGreek::Delta => match option_type {
                    OptionType::Call => model.call_delta(),
                    OptionType::Put => model.put_delta(),
                },
                SurfaceGreek::Gamma => model.gamma(),
                SurfaceGreek::Theta => match option_type {
                    OptionType::Call => model.call_theta() / 365.0,
                    OptionType::Put => model.put_theta() / 365.0,
                },
                SurfaceGreek::Vega => model.vega(),
            };
            row.push(value);
        }
        surface.push(row);
    }
    Ok(surface)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn long_call_pnl_across_moneyness() {
        let spots = [90.0, 100.0, 110.0, 120.0];
        let pnl = payoff_curve(OptionType::Call, PositionSide::Long, 100.0, 5.0, &spots);
        assert_eq!(pnl, vec![-5.0, -5.0, 5.0, 15.0]);
    }

    #[test]
    fn short_put_pnl_mirrors_long() {
        let spots = [80.0, 100.0, 120.0];
        let long = payoff_curve(OptionType::Put, PositionSide::Long, 100.0, 4.0, &spots);
        let short = payoff_curve(OptionType::Put, PositionSide::Short, 100.0, 4.0, &spots);
        for (l, s) in long.iter().zip(short.iter()) {
            assert_relative_eq!(l + s, 0.0, epsilon = 1.0e-12);
        }
    }

    #[test]
    fn straddle_payoff_is_symmetric_around_strike() {
        let legs = vec![
            StrategyLeg {
                option_type: OptionType::Call,
                side: PositionSide::Long,
                strike: 100.0,
                premium: 4.0,
                quantity: 1.0,
            },
            StrategyLeg {
                option_type: OptionType::Put,
                side: PositionSide::Long,
                strike: 100.0,
                premium: 3.0,
                quantity: 1.0,
            },
        ];
        let pnl = strategy_payoff_curve(&legs, &[90.0, 100.0, 110.0]);
        assert_relative_eq!(pnl[0], 3.0, epsilon = 1.0e-12);
        assert_relative_eq!(pnl[1], -7.0, epsilon = 1.0e-12);
        assert_relative_eq!(pnl[2], 3.0, epsilon = 1.0e-12);
    }

    #[test]
    fn delta_surface_has_expected_shape_and_bounds() {
        let spots: Vec<f64> = (80..=120).step_by(10).map(|s| s as f64).collect();
        let vols = [0.10, 0.25, 0.40];
        let surface = greek_surface(
            OptionType::Call,
            SurfaceGreek::Delta,
            100.0,
            30.0 / 365.0,
            0.05,
            &spots,
            &vols,
        )
        .unwrap();

        assert_eq!(surface.len(), vols.len());
        assert_eq!(surface[0].len(), spots.len());
        for row in &surface {
            for &delta in row {
                assert!((0.0..=1.0).contains(&delta));
            }
            // Call delta is increasing in spot.
            for pair in row.windows(2) {
                assert!(pair[1] >= pair[0]);
            }
        }
    }

    #[test]
    fn surface_rejects_invalid_axes() {
        let result = greek_surface(
            OptionType::Call,
            SurfaceGreek::Gamma,
            100.0,
            0.25,
            0.05,
            &[100.0],
            &[0.0],
        );
        assert!(result.is_err());
    }
}
