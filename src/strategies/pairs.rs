//! Pairs trading: spread tracking and mean-reversion signals.

use serde::{Deserialize, Serialize};

/// Z-scores beyond this magnitude flag a mean-reversion opportunity.
const ZSCORE_SIGNAL_THRESHOLD: f64 = 2.0;

/// A candidate pair with its observed correlation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pair {
    pub long_symbol: String,
    pub short_symbol: String,
    pub correlation: f64,
    /// False when the correlation fell short of the strategy threshold at
    /// the time the pair was added.
    pub meets_threshold: bool,
}

/// Spread diagnostics against the historical distribution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpreadReport {
    pub current_spread: f64,
    pub historical_mean: f64,
    pub z_score: f64,
    pub is_overvalued: bool,
    pub is_undervalued: bool,
    pub mean_reversion_opportunity: bool,
}

/// Pairs-trading book: correlated long/short pairs and spread signals.
#[derive(Debug, Clone, PartialEq)]
pub struct PairsStrategy {
    correlation_threshold: f64,
    pairs: Vec<Pair>,
}

impl Default for PairsStrategy {
    fn default() -> Self {
        Self::new(0.8)
    }
}

impl PairsStrategy {
    pub fn new(correlation_threshold: f64) -> Self {
        Self {
            correlation_threshold,
            pairs: Vec::new(),
        }
    }

    pub fn pairs(&self) -> &[Pair] {
        &self.pairs
    }

    /// Records a pair and reports whether its correlation meets the
    /// strategy threshold. A weak pair is still recorded; the flag is the
    /// caller's signal, not a rejection.
    pub fn add_pair(&mut self, long_symbol: &str, short_symbol: &str, correlation: f64) -> bool {
        let meets_threshold = correlation >= self.correlation_threshold;
        self.pairs.push(Pair {
            long_symbol: long_symbol.to_string(),
            short_symbol: short_symbol.to_string(),
            correlation,
            meets_threshold,
        });
        meets_threshold
    }
}

/// Spread and Z-score of the current leg prices against the historical
/// spread distribution. The Z-score is 0 when the historical deviation is
/// 0, matching the library-wide zero-denominator convention.
///
/// # Examples
/// ```
/// use ferroquant::strategies::pairs::spread_zscore;
///
/// let report = spread_zscore(105.0, 98.0, 3.0, 1.5);
/// assert!((report.z_score - 8.0 / 3.0).abs() < 1.0e-12);
/// assert!(report.mean_reversion_opportunity);
/// ```
pub fn spread_zscore(
    long_price: f64,
    short_price: f64,
    historical_mean: f64,
    historical_std: f64,
) -> SpreadReport {
    let current_spread = long_price - short_price;
    let z_score = if historical_std > 0.0 {
        (current_spread - historical_mean) / historical_std
    } else {
        0.0
    };

    SpreadReport {
        current_spread,
        historical_mean,
        z_score,
        is_overvalued: z_score > ZSCORE_SIGNAL_THRESHOLD,
        is_undervalued: z_score < -ZSCORE_SIGNAL_THRESHOLD,
        mean_reversion_opportunity: z_score.abs() > ZSCORE_SIGNAL_THRESHOLD,
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn add_pair_flags_weak_correlation_but_keeps_it() {
        let mut strategy = PairsStrategy::default();
        assert!(strategy.add_pair("KO", "PEP", 0.92));
        assert!(!strategy.add_pair("KO", "TSLA", 0.35));

        assert_eq!(strategy.pairs().len(), 2);
        assert!(strategy.pairs()[0].meets_threshold);
        assert!(!strategy.pairs()[1].meets_threshold);
    }

    #[test]
    fn zscore_measures_deviation_in_std_units() {
        let report = spread_zscore(110.0, 100.0, 4.0, 2.0);
        assert_relative_eq!(report.current_spread, 10.0, epsilon = 1.0e-12);
        assert_relative_eq!(report.z_score, 3.0, epsilon = 1.0e-12);
        assert!(report.mean_reversion_opportunity);
    }

    #[test]
    fn signals_only_fire_beyond_two_std() {
        // Exactly two standard deviations: strict inequality, no signal.
        let at_two = spread_zscore(104.0, 100.0, 0.0, 2.0);
        assert_relative_eq!(at_two.z_score, 2.0, epsilon = 1.0e-12);
        assert!(!at_two.mean_reversion_opportunity);

        let below = spread_zscore(95.0, 100.0, 0.0, 2.0);
        assert!(below.z_score < -2.0);
        assert!(below.mean_reversion_opportunity);
    }

    #[test]
    fn zero_deviation_spread_has_zero_zscore() {
        let report = spread_zscore(110.0, 100.0, 4.0, 0.0);
        assert_eq!(report.z_score, 0.0);
        assert!(!report.mean_reversion_opportunity);
    }
}
