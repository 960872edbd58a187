//! Explicit finite-difference schemes
//!
//! # Available Methods
//!
//! ## Ordinary differential equations
//!
//! - **[`FirstOrderOdeSolver`]**: forward Euler on dx/dt = f(t, x)
//! - **[`SecondOrderOdeSolver`]**: forward Euler on the system
//!   (dx/dt = y, dy/dt = f(t, x, y))
//!
//! Both use `dt = T / (samples − 1)` and cost one source evaluation per step.
//!
//! ## Partial differential equations
//!
//! - **[`HeatEquationSolver`]**: forward-time centred-space (FTCS)
//! - **[`WaveEquationSolver`]**: centred second differences in time and space
//!
//! The user fixes the spatial resolution. The time resolution is derived by
//! [`TimeGrid`] so that the scheme's stability bound holds:
//!
//! | Scheme | q            | Bound             |
//! |--------|--------------|-------------------|
//! | heat   | 2·α·T / dx²  | α·dt/dx² ≤ ½      |
//! | wave   | c·T / dx     | (c·dt/dx)² ≤ 1    |
//!
//! with `time_samples = 2·⌊q⌋ + 1` and `dt = T / (time_samples − 1)`.
//!
//! # Performance Considerations
//!
//! Interior stencil updates run on Rayon (feature `parallel`) once a row is
//! wider than [`parallel_threshold()`](crate::solver::parallel_threshold).
//! Expressions are evaluated sequentially.

mod first_order;
mod heat;
mod second_order;
mod wave;

pub use first_order::FirstOrderOdeSolver;
pub use heat::HeatEquationSolver;
pub use second_order::SecondOrderOdeSolver;
pub use wave::WaveEquationSolver;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::equation::params::Params;
use crate::error::{EquationError, SolveError};
use crate::expression::Expression;
use crate::solver::{Boundary, BoundaryKind, SolverConfiguration};

/// Slack allowed on stability bounds for floating-point rounding
const STABILITY_TOLERANCE: f64 = 1e-12;

/// Fewest time samples a PDE solve produces (initial row plus two steps)
const MIN_TIME_SAMPLES: f64 = 3.0;

// =================================================================================================
// Derived time grid
// =================================================================================================

/// Time and space resolution of a PDE solve
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeGrid {
    /// Rows of the solution grid (always odd)
    pub time_samples: usize,

    /// Columns of the solution grid
    pub space_samples: usize,

    pub dt: f64,
    pub dx: f64,

    /// α·dt/dx² for heat, (c·dt/dx)² for wave
    pub ratio: f64,
}

impl TimeGrid {
    /// Grid for ∂u/∂t = α ∂²u/∂x²
    pub fn heat(
        alpha: f64,
        length: f64,
        time_period: f64,
        space_samples: usize,
        config: &SolverConfiguration,
    ) -> Result<Self, SolveError> {
        let dx = length / (space_samples - 1) as f64;
        let q = 2.0 * alpha * time_period / (dx * dx);
        let (time_samples, dt) = Self::derive_steps(q, time_period, space_samples, config)?;
        let ratio = alpha * dt / (dx * dx);

        Self::check_stability(ratio, 0.5)?;
        Ok(Self { time_samples, space_samples, dt, dx, ratio })
    }

    /// Grid for ∂²u/∂t² = c² ∂²u/∂x²
    pub fn wave(
        c: f64,
        length: f64,
        time_period: f64,
        space_samples: usize,
        config: &SolverConfiguration,
    ) -> Result<Self, SolveError> {
        let dx = length / (space_samples - 1) as f64;
        let q = c * time_period / dx;
        let (time_samples, dt) = Self::derive_steps(q, time_period, space_samples, config)?;
        let courant = c * dt / dx;
        let ratio = courant * courant;

        Self::check_stability(ratio, 1.0)?;
        Ok(Self { time_samples, space_samples, dt, dx, ratio })
    }

    /// `(time_samples, dt)` from q, after checking the grid fits the budget.
    ///
    /// Tiny q would give fewer than three rows (and dt = T/0 for a single
    /// row), so the count is clamped to [`MIN_TIME_SAMPLES`]. A larger step
    /// count only lowers the ratio.
    fn derive_steps(
        q: f64,
        time_period: f64,
        space_samples: usize,
        config: &SolverConfiguration,
    ) -> Result<(usize, f64), SolveError> {
        let rows = (2.0 * q.floor() + 1.0).max(MIN_TIME_SAMPLES);
        config.check_grid(rows, space_samples as f64)?;

        let time_samples = rows as usize;
        let dt = time_period / (time_samples - 1) as f64;
        Ok((time_samples, dt))
    }

    fn check_stability(ratio: f64, limit: f64) -> Result<(), SolveError> {
        if !ratio.is_finite() || ratio > limit + STABILITY_TOLERANCE {
            return Err(SolveError::Unstable { ratio, limit });
        }
        Ok(())
    }

    /// Time of row `k`
    pub fn time(&self, k: usize) -> f64 {
        k as f64 * self.dt
    }

    /// Position of column `i`
    pub fn position(&self, i: usize) -> f64 {
        i as f64 * self.dx
    }
}

// =================================================================================================
// Shared kernels
// =================================================================================================

/// Write the three-point stencil of `prev` into the interior of `next`.
///
/// `next[i] = w₀·prev[i−1] + w₁·prev[i] + w₂·prev[i+1] − lag[i]` for
/// `i` in `1..n−1`. The edge cells of `next` are left untouched.
pub(crate) fn apply_stencil(prev: &[f64], next: &mut [f64], weights: [f64; 3], lag: Option<&[f64]>) {
    let n = prev.len();
    let [left, centre, right] = weights;

    let cell = |(offset, value): (usize, &mut f64)| {
        let i = offset + 1;
        let mut updated = left * prev[i - 1] + centre * prev[i] + right * prev[i + 1];
        if let Some(lag) = lag {
            updated -= lag[i];
        }
        *value = updated;
    };

    let interior = &mut next[1..n - 1];
    if interior.len() > super::parallel_threshold() {
        #[cfg(feature = "parallel")]
        interior.par_iter_mut().enumerate().for_each(cell);
        #[cfg(not(feature = "parallel"))]
        interior.iter_mut().enumerate().for_each(cell);
    } else {
        interior.iter_mut().enumerate().for_each(cell);
    }
}

/// Spatial sample count of a PDE, both edges included.
///
/// Two samples (edges only) are accepted when both edges are Dirichlet. A
/// Neumann edge reads its interior neighbour, so it needs at least three.
pub(crate) fn space_samples(params: &Params, boundary: &Boundary) -> Result<usize, EquationError> {
    let samples = params.count("samples", 2)?;
    let neumann = [&boundary.left, &boundary.right]
        .iter()
        .any(|edge| edge.kind == BoundaryKind::Neumann);

    if neumann && samples < 3 {
        return Err(EquationError::InvalidValue {
            field: params.path_of("samples"),
            reason: format!("a Neumann boundary needs at least 3 samples, got {samples}"),
        });
    }
    Ok(samples)
}

/// Evaluate a function of x at every column of the grid.
pub(crate) fn sample_in_space(function: &Expression, grid: &TimeGrid, row: &mut [f64]) -> Result<(), SolveError> {
    for (i, value) in row.iter_mut().enumerate() {
        *value = function.call(&[grid.position(i)])?;
    }
    Ok(())
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::ThresholdGuard;

    #[test]
    fn test_heat_grid_derivation() {
        // dx = 0.25, q = 2·1·1/0.0625 = 32, time_samples = 65
        let grid = TimeGrid::heat(1.0, 1.0, 1.0, 5, &SolverConfiguration::default()).unwrap();
        assert_eq!(grid.time_samples, 65);
        assert!((grid.dx - 0.25).abs() < 1e-15);
        assert!((grid.dt - 1.0 / 64.0).abs() < 1e-15);
        assert!((grid.ratio - 0.25).abs() < 1e-12);
        assert_eq!(grid.time_samples % 2, 1);
    }

    #[test]
    fn test_heat_ratio_never_exceeds_half() {
        for &(alpha, length, period, samples) in &[
            (1.0, 1.0, 1.0, 11),
            (0.3, 2.0, 0.7, 17),
            (2.5, 1.0, 0.01, 41),
            (1e-3, 1.0, 1.0, 5),
        ] {
            let grid = TimeGrid::heat(alpha, length, period, samples, &SolverConfiguration::default()).unwrap();
            assert!(grid.ratio <= 0.5 + 1e-12, "ratio {} for {:?}", grid.ratio, (alpha, length, period, samples));
        }
    }

    #[test]
    fn test_small_q_is_clamped() {
        let grid = TimeGrid::heat(1e-6, 1.0, 1.0, 3, &SolverConfiguration::default()).unwrap();
        assert_eq!(grid.time_samples, 3);
        assert!((grid.dt - 0.5).abs() < 1e-15);
    }

    #[test]
    fn test_wave_grid_derivation() {
        // dx = 0.1, q = 1·2/0.1 = 20, time_samples = 41, courant = 0.5
        let grid = TimeGrid::wave(1.0, 1.0, 2.0, 11, &SolverConfiguration::default()).unwrap();
        assert_eq!(grid.time_samples, 41);
        assert!((grid.dt - 0.05).abs() < 1e-12);
        assert!((grid.ratio - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_wave_courant_never_exceeds_one() {
        for &(c, length, period, samples) in &[(1.0, 1.0, 1.0, 11), (3.0, 2.0, 0.37, 23), (0.01, 1.0, 1.0, 5)] {
            let grid = TimeGrid::wave(c, length, period, samples, &SolverConfiguration::default()).unwrap();
            assert!(grid.ratio <= 1.0 + 1e-12);
        }
    }

    #[test]
    fn test_grid_budget() {
        let config = SolverConfiguration::new(100);
        let result = TimeGrid::heat(1.0, 1.0, 1.0, 11, &config);
        assert!(matches!(result, Err(SolveError::GridTooLarge { limit: 100, .. })));
    }

    #[test]
    fn test_absurd_grid_rejected_before_allocation() {
        let result = TimeGrid::heat(1e300, 1.0, 1e300, 11, &SolverConfiguration::default());
        assert!(matches!(result, Err(SolveError::GridTooLarge { .. })));
    }

    #[test]
    fn test_stencil_interior_only() {
        let prev = [1.0, 2.0, 3.0, 4.0];
        let mut next = [-1.0; 4];
        apply_stencil(&prev, &mut next, [1.0, 10.0, 100.0], None);
        assert_eq!(next, [-1.0, 321.0, 432.0, -1.0]);
    }

    #[test]
    fn test_stencil_with_lag() {
        let prev = [1.0, 1.0, 1.0];
        let lag = [0.0, 0.5, 0.0];
        let mut next = [0.0; 3];
        apply_stencil(&prev, &mut next, [0.25, 1.5, 0.25], Some(&lag));
        assert_eq!(next, [0.0, 1.5, 0.0]);
    }

    #[test]
    fn test_stencil_parallel_matches_sequential() {
        let prev: Vec<f64> = (0..2000).map(|i| (i as f64 * 0.01).sin()).collect();
        let mut sequential = vec![0.0; prev.len()];
        let mut parallel = vec![0.0; prev.len()];

        {
            let _guard = ThresholdGuard::save(usize::MAX);
            apply_stencil(&prev, &mut sequential, [0.25, 0.5, 0.25], None);
        }
        {
            let _guard = ThresholdGuard::save(1);
            apply_stencil(&prev, &mut parallel, [0.25, 0.5, 0.25], None);
        }

        assert_eq!(sequential, parallel);
    }
}
