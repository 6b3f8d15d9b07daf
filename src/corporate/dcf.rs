//! Discounted-cash-flow enterprise valuation.
//!
//! EBITDA is projected under a constant growth rate, converted to free
//! cash flow with a flat tax rate and capex percentage (D&A is folded
//! into EBITDA), and discounted at WACC together with an exit-multiple
//! terminal value.

use crate::core::EngineError;

/// DCF valuation anchored on a starting EBITDA and a discount rate.
///
/// # Examples
/// ```
/// use ferroquant::corporate::dcf::DcfValuation;
///
/// let dcf = DcfValuation::new(150.0e6, 0.08).unwrap();
/// let ebitda = dcf.project_ebitda(5, 0.10);
/// let fcf = dcf.free_cash_flow(&ebitda, 0.25, 0.05, 0.0);
/// let terminal = dcf.terminal_value(ebitda[4], 7.0);
/// let ev = dcf.enterprise_value(&fcf, terminal);
/// assert!(ev > 0.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DcfValuation {
    initial_ebitda: f64,
    wacc: f64,
}

impl DcfValuation {
    /// # Errors
    /// `InvalidParameter` when `wacc <= -1` (the discount factor would be
    /// undefined) or any input is non-finite.
    pub fn new(initial_ebitda: f64, wacc: f64) -> Result<Self, EngineError> {
        if !initial_ebitda.is_finite() || !wacc.is_finite() {
            return Err(EngineError::InvalidParameter(
                "DCF inputs must be finite".to_string(),
            ));
        }
        if wacc <= -1.0 {
            return Err(EngineError::InvalidParameter(format!(
                "wacc must be > -1, got {wacc}"
            )));
        }
        Ok(Self {
            initial_ebitda,
            wacc,
        })
    }

    pub fn wacc(&self) -> f64 {
        self.wacc
    }

    /// EBITDA for years `1..=years` under a constant growth rate.
    pub fn project_ebitda(&self, years: usize, growth_rate: f64) -> Vec<f64> {
        (1..=years)
            .map(|year| self.initial_ebitda * (1.0 + growth_rate).powi(year as i32))
            .collect()
    }

    /// Free cash flow per year:
    /// `EBITDA (1 - tax) - EBITDA capex_pct - nwc_change`.
    pub fn free_cash_flow(
        &self,
        ebitda: &[f64],
        tax_rate: f64,
        capex_pct: f64,
        nwc_change: f64,
    ) -> Vec<f64> {
        ebitda
            .iter()
            .map(|e| e * (1.0 - tax_rate) - e * capex_pct - nwc_change)
            .collect()
    }

    /// Exit-multiple terminal value `EV/EBITDA * final-year EBITDA`.
    pub fn terminal_value(&self, final_ebitda: f64, exit_multiple: f64) -> f64 {
        final_ebitda * exit_multiple
    }

    /// Enterprise value: each year's FCF discounted at WACC plus the
    /// terminal value discounted at the final-year factor.
    pub fn enterprise_value(&self, fcf: &[f64], terminal_value: f64) -> f64 {
        let pv_fcf: f64 = fcf
            .iter()
            .enumerate()
            .map(|(i, cash)| cash / (1.0 + self.wacc).powi(i as i32 + 1))
            .sum();
        let pv_terminal = terminal_value / (1.0 + self.wacc).powi(fcf.len() as i32);
        pv_fcf + pv_terminal
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn rejects_degenerate_discount_rate() {
        assert!(DcfValuation::new(100.0, -1.0).is_err());
        assert!(DcfValuation::new(100.0, f64::NAN).is_err());
        assert!(DcfValuation::new(100.0, 0.08).is_ok());
    }

    #[test]
    fn ebitda_projection_compounds_growth() {
        let dcf = DcfValuation::new(100.0, 0.08).unwrap();
        let ebitda = dcf.project_ebitda(3, 0.10);
        assert_eq!(ebitda.len(), 3);
        assert_relative_eq!(ebitda[0], 110.0, epsilon = 1.0e-9);
        assert_relative_eq!(ebitda[1], 121.0, epsilon = 1.0e-9);
        assert_relative_eq!(ebitda[2], 133.1, epsilon = 1.0e-9);
    }

    #[test]
    fn free_cash_flow_applies_tax_and_capex() {
        let dcf = DcfValuation::new(100.0, 0.08).unwrap();
        let fcf = dcf.free_cash_flow(&[100.0, 200.0], 0.25, 0.05, 1.0);
        assert_relative_eq!(fcf[0], 100.0 * 0.75 - 5.0 - 1.0, epsilon = 1.0e-9);
        assert_relative_eq!(fcf[1], 200.0 * 0.75 - 10.0 - 1.0, epsilon = 1.0e-9);
    }

    #[test]
    fn enterprise_value_matches_hand_discounting() {
        // Flat 70 FCF for two years, 500 terminal, 10% WACC:
        // 70/1.1 + 70/1.21 + 500/1.21 = 534.7107...
        let dcf = DcfValuation::new(100.0, 0.10).unwrap();
        let ev = dcf.enterprise_value(&[70.0, 70.0], 500.0);
        assert_relative_eq!(ev, 534.710_743_801, epsilon = 1.0e-6);
    }

    #[test]
    fn terminal_value_is_multiple_times_final_ebitda() {
        let dcf = DcfValuation::new(100.0, 0.10).unwrap();
        assert_relative_eq!(dcf.terminal_value(133.1, 7.0), 931.7, epsilon = 1.0e-9);
    }
}
