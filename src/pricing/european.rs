//! Black-Scholes-Merton valuation and sensitivities for European options.
//!
//! The model is an immutable parameter set validated at construction; every
//! query is a pure function of those parameters. Greeks are recomputed on
//! demand and never cached.
//!
//! References: Hull, *Options, Futures, and Other Derivatives*, Ch. 15 for
//! the closed form and Ch. 19 for the sensitivity conventions. Vega and rho
//! are scaled to a one-percentage-point move, the quoting convention used by
//! the desk-facing reports this engine feeds.

use serde::{Deserialize, Serialize};

use crate::core::{EngineError, Moneyness, OptionType};
use crate::math::{normal_cdf, normal_pdf};

/// Sensitivities of a European option under Black-Scholes assumptions.
///
/// `theta` is annualized; `theta_daily` is the same figure divided by 365.
/// `vega` and `rho` are per one-percentage-point moves in volatility and
/// rate respectively.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Greeks {
    pub delta: f64,
    pub gamma: f64,
    pub theta: f64,
    pub theta_daily: f64,
    pub vega: f64,
    pub rho: f64,
}

/// Black-Scholes-Merton pricing model for a single European option
/// parameter set.
///
/// # Examples
/// ```
/// use ferroquant::pricing::european::BlackScholesModel;
///
/// let model = BlackScholesModel::new(100.0, 100.0, 1.0, 0.05, 0.20).unwrap();
/// let call = model.call_price();
/// assert!(call > 10.0 && call < 11.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlackScholesModel {
    spot: f64,
    strike: f64,
    expiry: f64,
    rate: f64,
    vol: f64,
}

impl BlackScholesModel {
    /// Builds a model from spot `s`, strike `k`, expiry `t` in years,
    /// continuously compounded rate `r`, and annualized volatility `sigma`.
    ///
    /// # Errors
    /// `InvalidParameter` when `s`, `k`, `t`, or `sigma` is non-positive or
    /// any input is non-finite. The rate is unconstrained; negative rates
    /// are valid.
    pub fn new(s: f64, k: f64, t: f64, r: f64, sigma: f64) -> Result<Self, EngineError> {
        if !s.is_finite() || !k.is_finite() || !t.is_finite() || !r.is_finite() || !sigma.is_finite()
        {
            return Err(EngineError::InvalidParameter(
                "pricing inputs must be finite".to_string(),
            ));
        }
        if s <= 0.0 {
            return Err(EngineError::InvalidParameter(format!(
                "spot must be > 0, got {s}"
            )));
        }
        if k <= 0.0 {
            return Err(EngineError::InvalidParameter(format!(
                "strike must be > 0, got {k}"
            )));
        }
        if t <= 0.0 {
            return Err(EngineError::InvalidParameter(format!(
                "expiry must be > 0, got {t}"
            )));
        }
        if sigma <= 0.0 {
            return Err(EngineError::InvalidParameter(format!(
                "volatility must be > 0, got {sigma}"
            )));
        }

        Ok(Self {
            spot: s,
            strike: k,
            expiry: t,
            rate: r,
            vol: sigma,
        })
    }

    pub fn spot(&self) -> f64 {
        self.spot
    }

    pub fn strike(&self) -> f64 {
        self.strike
    }

    pub fn expiry(&self) -> f64 {
        self.expiry
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }

    pub fn vol(&self) -> f64 {
        self.vol
    }

    /// `d1 = [ln(S/K) + (r + sigma^2/2) T] / (sigma sqrt(T))`.
    pub fn d1(&self) -> f64 {
        ((self.spot / self.strike).ln() + (self.rate + 0.5 * self.vol * self.vol) * self.expiry)
            / (self.vol * self.expiry.sqrt())
    }

    /// `d2 = d1 - sigma sqrt(T)`.
    pub fn d2(&self) -> f64 {
        self.d1() - self.vol * self.expiry.sqrt()
    }

    /// Call premium `S Phi(d1) - K e^{-rT} Phi(d2)`.
    pub fn call_price(&self) -> f64 {
        let d1 = self.d1();
        let d2 = self.d2();
        self.spot * normal_cdf(d1) - self.strike * self.discount_factor() * normal_cdf(d2)
    }

    /// Put premium `K e^{-rT} Phi(-d2) - S Phi(-d1)`.
    pub fn put_price(&self) -> f64 {
        let d1 = self.d1();
        let d2 = self.d2();
        self.strike * self.discount_factor() * normal_cdf(-d2) - self.spot * normal_cdf(-d1)
    }

    /// Premium for the requested side.
    pub fn price(&self, option_type: OptionType) -> f64 {
        match option_type {
            OptionType::Call => self.call_price(),
            OptionType::Put => self.put_price(),
        }
    }

    /// Call delta `Phi(d1)`, in `[0, 1]`.
    pub fn call_delta(&self) -> f64 {
        normal_cdf(self.d1())
    }

    /// Put delta `Phi(d1) - 1`, in `[-1, 0]`.
    pub fn put_delta(&self) -> f64 {
        normal_cdf(self.d1()) - 1.0
    }

    /// Gamma `phi(d1) / (S sigma sqrt(T))`, shared by call and put.
    pub fn gamma(&self) -> f64 {
        normal_pdf(self.d1()) / (self.spot * self.vol * self.expiry.sqrt())
    }

    /// Vega per one-percentage-point volatility move,
    /// `S phi(d1) sqrt(T) / 100`.
    pub fn vega(&self) -> f64 {
        self.spot * normal_pdf(self.d1()) * self.expiry.sqrt() / 100.0
    }

    /// Annualized call theta. Divide by 365 for a per-day figure.
    pub fn call_theta(&self) -> f64 {
        let d1 = self.d1();
        let d2 = self.d2();
        -(self.spot * normal_pdf(d1) * self.vol) / (2.0 * self.expiry.sqrt())
            - self.rate * self.strike * self.discount_factor() * normal_cdf(d2)
    }

    /// Annualized put theta.
    pub fn put_theta(&self) -> f64 {
        let d1 = self.d1();
        let d2 = self.d2();
        -(self.spot * normal_pdf(d1) * self.vol) / (2.0 * self.expiry.sqrt())
            + self.rate * self.strike * self.discount_factor() * normal_cdf(-d2)
    }

    /// Call rho per one-percentage-point rate move.
    pub fn call_rho(&self) -> f64 {
        self.strike * self.expiry * self.discount_factor() * normal_cdf(self.d2()) / 100.0
    }

    /// Put rho per one-percentage-point rate move.
    pub fn put_rho(&self) -> f64 {
        -self.strike * self.expiry * self.discount_factor() * normal_cdf(-self.d2()) / 100.0
    }

    /// All sensitivities for the requested side, recomputed on demand.
    ///
    /// # Examples
    /// ```
    /// use ferroquant::core::OptionType;
    /// use ferroquant::pricing::european::BlackScholesModel;
    ///
    /// let model = BlackScholesModel::new(100.0, 100.0, 1.0, 0.05, 0.20).unwrap();
    /// let greeks = model.greeks(OptionType::Call);
    /// assert!(greeks.delta > 0.0 && greeks.delta < 1.0);
    /// assert!(greeks.gamma > 0.0 && greeks.vega > 0.0);
    /// ```
    pub fn greeks(&self, option_type: OptionType) -> Greeks {
        let (delta, theta, rho) = match option_type {
            OptionType::Call => (self.call_delta(), self.call_theta(), self.call_rho()),
            OptionType::Put => (self.put_delta(), self.put_theta(), self.put_rho()),
        };
        Greeks {
            delta,
            gamma: self.gamma(),
            theta,
            theta_daily: theta / 365.0,
            vega: self.vega(),
            rho,
        }
    }

    /// Intrinsic value `max(S - K, 0)` for calls, `max(K - S, 0)` for puts.
    pub fn intrinsic_value(&self, option_type: OptionType) -> f64 {
        match option_type {
            OptionType::Call => (self.spot - self.strike).max(0.0),
            OptionType::Put => (self.strike - self.spot).max(0.0),
        }
    }

    /// Time value, premium minus intrinsic value.
    pub fn time_value(&self, option_type: OptionType) -> f64 {
        self.price(option_type) - self.intrinsic_value(option_type)
    }

    /// Moneyness classification for the requested side.
    pub fn moneyness(&self, option_type: OptionType) -> Moneyness {
        let signed = option_type.sign() * (self.spot - self.strike);
        if signed > 0.0 {
            Moneyness::InTheMoney
        } else if signed < 0.0 {
            Moneyness::OutOfTheMoney
        } else {
            Moneyness::AtTheMoney
        }
    }

    fn discount_factor(&self) -> f64 {
        (-self.rate * self.expiry).exp()
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn atm_model() -> BlackScholesModel {
        BlackScholesModel::new(100.0, 100.0, 1.0, 0.05, 0.20).unwrap()
    }

    #[test]
    fn rejects_non_positive_parameters() {
        assert!(BlackScholesModel::new(0.0, 100.0, 1.0, 0.05, 0.2).is_err());
        assert!(BlackScholesModel::new(100.0, -5.0, 1.0, 0.05, 0.2).is_err());
        assert!(BlackScholesModel::new(100.0, 100.0, 0.0, 0.05, 0.2).is_err());
        assert!(BlackScholesModel::new(100.0, 100.0, 1.0, 0.05, 0.0).is_err());
        // Negative rates are a valid regime.
        assert!(BlackScholesModel::new(100.0, 100.0, 1.0, -0.01, 0.2).is_ok());
    }

    #[test]
    fn atm_prices_match_reference_values() {
        let model = atm_model();
        assert_relative_eq!(model.call_price(), 10.450_583_572, epsilon = 1.0e-4);
        assert_relative_eq!(model.put_price(), 5.573_526_022, epsilon = 1.0e-4);
    }

    #[test]
    fn short_dated_otm_call_matches_reference_value() {
        let model = BlackScholesModel::new(100.0, 105.0, 30.0 / 365.0, 0.05, 0.20).unwrap();
        assert_relative_eq!(model.call_price(), 0.730_790_579, epsilon = 1.0e-4);
        assert_relative_eq!(model.put_price(), 5.300_169_175, epsilon = 1.0e-4);
    }

    #[test]
    fn greeks_match_reference_values() {
        let model = atm_model();
        assert_relative_eq!(model.call_delta(), 0.636_830_651, epsilon = 1.0e-6);
        assert_relative_eq!(model.put_delta(), -0.363_169_349, epsilon = 1.0e-6);
        assert_relative_eq!(model.gamma(), 0.018_762_017, epsilon = 1.0e-6);
        assert_relative_eq!(model.vega(), 0.375_240_347, epsilon = 1.0e-6);
        assert_relative_eq!(model.call_theta(), -6.414_027_546, epsilon = 1.0e-5);
        assert_relative_eq!(model.put_theta(), -1.657_880_424, epsilon = 1.0e-5);
        assert_relative_eq!(model.call_rho(), 0.532_324_815, epsilon = 1.0e-6);
        assert_relative_eq!(model.put_rho(), -0.418_904_609, epsilon = 1.0e-6);
    }

    #[test]
    fn theta_daily_is_annual_theta_over_365() {
        let model = atm_model();
        let greeks = model.greeks(OptionType::Call);
        assert_relative_eq!(greeks.theta_daily, greeks.theta / 365.0, epsilon = 1.0e-12);
    }

    #[test]
    fn intrinsic_and_time_value_decompose_premium() {
        let model = BlackScholesModel::new(110.0, 100.0, 0.5, 0.05, 0.25).unwrap();
        assert_relative_eq!(model.intrinsic_value(OptionType::Call), 10.0);
        assert_relative_eq!(model.intrinsic_value(OptionType::Put), 0.0);
        assert_relative_eq!(
            model.time_value(OptionType::Call),
            model.call_price() - 10.0,
            epsilon = 1.0e-12
        );
        assert!(model.time_value(OptionType::Call) > 0.0);
    }

    #[test]
    fn moneyness_classification() {
        let model = BlackScholesModel::new(110.0, 100.0, 1.0, 0.05, 0.2).unwrap();
        assert_eq!(model.moneyness(OptionType::Call), Moneyness::InTheMoney);
        assert_eq!(model.moneyness(OptionType::Put), Moneyness::OutOfTheMoney);

        let atm = atm_model();
        assert_eq!(atm.moneyness(OptionType::Call), Moneyness::AtTheMoney);
    }
}
