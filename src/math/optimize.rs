//! Box-constrained Nelder-Mead simplex minimization.
//!
//! Reference: Nelder and Mead (1965). The implementation clamps every
//! candidate vertex into the feasible box, which is sufficient for the
//! long-only portfolio weight domain this crate optimizes over.

use crate::core::EngineError;

/// Box constraints `lower <= x <= upper` for the minimizer.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxConstraints {
    pub lower: Vec<f64>,
    pub upper: Vec<f64>,
}

impl BoxConstraints {
    pub fn new(lower: Vec<f64>, upper: Vec<f64>) -> Result<Self, EngineError> {
        if lower.is_empty() || lower.len() != upper.len() {
            return Err(EngineError::InvalidParameter(
                "constraints require matching non-empty lower/upper bounds".to_string(),
            ));
        }
        for i in 0..lower.len() {
            if !lower[i].is_finite() || !upper[i].is_finite() || lower[i] > upper[i] {
                return Err(EngineError::InvalidParameter(format!(
                    "invalid bound at index {i}: [{}, {}]",
                    lower[i], upper[i]
                )));
            }
        }
        Ok(Self { lower, upper })
    }

    /// Unit box `[0, 1]^n`.
    pub fn unit(dimension: usize) -> Result<Self, EngineError> {
        Self::new(vec![0.0; dimension], vec![1.0; dimension])
    }

    #[inline]
    pub fn dimension(&self) -> usize {
        self.lower.len()
    }

    pub fn clamp(&self, x: &[f64]) -> Vec<f64> {
        x.iter()
            .enumerate()
            .map(|(i, v)| v.clamp(self.lower[i], self.upper[i]))
            .collect()
    }
}

/// Tuning knobs for [`nelder_mead`].
#[derive(Debug, Clone, Copy)]
pub struct NelderMeadOptions {
    pub max_iterations: usize,
    pub initial_step: f64,
    pub reflection: f64,
    pub expansion: f64,
    pub contraction: f64,
    pub shrink: f64,
    pub tolerance: f64,
}

impl Default for NelderMeadOptions {
    fn default() -> Self {
        Self {
            max_iterations: 500,
            initial_step: 0.1,
            reflection: 1.0,
            expansion: 2.0,
            contraction: 0.5,
            shrink: 0.5,
            tolerance: 1.0e-9,
        }
    }
}

/// Minimization outcome.
#[derive(Debug, Clone)]
pub struct NelderMeadResult {
    /// Best vertex found.
    pub x: Vec<f64>,
    /// Objective value at `x`.
    pub objective: f64,
    /// Iterations consumed.
    pub iterations: usize,
    /// Whether the simplex collapsed within tolerance.
    pub converged: bool,
}

/// Minimizes `objective_fn` over the box with a downhill simplex.
///
/// The simplex is seeded at `initial` with one extra vertex per dimension,
/// each offset by `initial_step` times the box width along that axis.
pub fn nelder_mead<F>(
    initial: &[f64],
    bounds: &BoxConstraints,
    options: NelderMeadOptions,
    mut objective_fn: F,
) -> Result<NelderMeadResult, EngineError>
where
    F: FnMut(&[f64]) -> f64,
{
    let dim = bounds.dimension();
    if initial.len() != dim {
        return Err(EngineError::InvalidParameter(
            "initial vector dimension does not match bounds".to_string(),
        ));
    }

    let x0 = bounds.clamp(initial);
    let mut simplex = vec![x0.clone()];
    let mut values = vec![objective_fn(&x0)];

    for d in 0..dim {
        let mut x = x0.clone();
        let step = (bounds.upper[d] - bounds.lower[d]).abs() * options.initial_step.max(1.0e-4);
        x[d] = (x[d] + step).min(bounds.upper[d]);
        if (x[d] - x0[d]).abs() < 1.0e-14 {
            x[d] = (x[d] - step).max(bounds.lower[d]);
        }
        values.push(objective_fn(&x));
        simplex.push(x);
    }

    let mut iterations = 0;
    let mut converged = false;

    for iter in 0..options.max_iterations {
        iterations = iter + 1;

        let mut order: Vec<usize> = (0..simplex.len()).collect();
        order.sort_by(|&i, &j| values[i].total_cmp(&values[j]));
        simplex = order.iter().map(|&i| simplex[i].clone()).collect();
        values = order.iter().map(|&i| values[i]).collect();

        let spread = (values[dim] - values[0]).abs();

        let centroid: Vec<f64> = (0..dim)
            .map(|d| simplex.iter().take(dim).map(|x| x[d]).sum::<f64>() / dim as f64)
            .collect();

        let max_vertex_dist = simplex
            .iter()
            .map(|x| {
                x.iter()
                    .zip(centroid.iter())
                    .map(|(a, b)| (a - b) * (a - b))
                    .sum::<f64>()
                    .sqrt()
            })
            .fold(0.0_f64, f64::max);

        if spread <= options.tolerance && max_vertex_dist <= options.tolerance.sqrt() {
            converged = true;
            break;
        }

        // Reflection.
        let xr: Vec<f64> = (0..dim)
            .map(|d| centroid[d] + options.reflection * (centroid[d] - simplex[dim][d]))
            .collect();
        let xr = bounds.clamp(&xr);
        let fr = objective_fn(&xr);

        if fr < values[0] {
            // Expansion.
            let xe: Vec<f64> = (0..dim)
                .map(|d| centroid[d] + options.expansion * (xr[d] - centroid[d]))
                .collect();
            let xe = bounds.clamp(&xe);
            let fe = objective_fn(&xe);
            if fe < fr {
                simplex[dim] = xe;
                values[dim] = fe;
            } else {
                simplex[dim] = xr;
                values[dim] = fr;
            }
            continue;
        }

        if fr < values[dim - 1] {
            simplex[dim] = xr;
            values[dim] = fr;
            continue;
        }

        // Contraction toward the worst vertex.
        let xc: Vec<f64> = (0..dim)
            .map(|d| centroid[d] + options.contraction * (simplex[dim][d] - centroid[d]))
            .collect();
        let xc = bounds.clamp(&xc);
        let fc = objective_fn(&xc);
        if fc < values[dim] {
            simplex[dim] = xc;
            values[dim] = fc;
            continue;
        }

        // Shrink all vertices toward the best.
        for i in 1..=dim {
            for d in 0..dim {
                simplex[i][d] = simplex[0][d] + options.shrink * (simplex[i][d] - simplex[0][d]);
            }
            simplex[i] = bounds.clamp(&simplex[i]);
            values[i] = objective_fn(&simplex[i]);
        }
    }

    let mut best = 0;
    for i in 1..values.len() {
        if values[i] < values[best] {
            best = i;
        }
    }

    Ok(NelderMeadResult {
        x: simplex[best].clone(),
        objective: values[best],
        iterations,
        converged,
    })
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn minimizes_shifted_quadratic_in_box() {
        let bounds = BoxConstraints::unit(2).unwrap();
        let result = nelder_mead(
            &[0.5, 0.5],
            &bounds,
            NelderMeadOptions::default(),
            |x| (x[0] - 0.3).powi(2) + (x[1] - 0.7).powi(2),
        )
        .unwrap();

        assert!(result.converged);
        assert_relative_eq!(result.x[0], 0.3, epsilon = 1.0e-3);
        assert_relative_eq!(result.x[1], 0.7, epsilon = 1.0e-3);
    }

    #[test]
    fn clamps_to_boundary_when_minimum_is_outside() {
        let bounds = BoxConstraints::unit(1).unwrap();
        let result = nelder_mead(
            &[0.5],
            &bounds,
            NelderMeadOptions::default(),
            |x| (x[0] - 2.0).powi(2),
        )
        .unwrap();

        assert_relative_eq!(result.x[0], 1.0, epsilon = 1.0e-6);
    }

    #[test]
    fn rejects_dimension_mismatch() {
        let bounds = BoxConstraints::unit(2).unwrap();
        let result = nelder_mead(&[0.5], &bounds, NelderMeadOptions::default(), |_| 0.0);
        assert!(matches!(result, Err(EngineError::InvalidParameter(_))));
    }
}
