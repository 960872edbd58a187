//! Explicit FTCS scheme for the 1-D heat equation
//!
//! # Mathematical Background
//!
//! ```text
//! ∂u/∂t = α ∂²u/∂x²,   x ∈ [0, L],  t ∈ [0, T]
//! ```
//!
//! Forward difference in time, centred difference in space:
//!
//! ```text
//! uᵢᵏ⁺¹ = r·uᵢ₋₁ᵏ + (1 − 2r)·uᵢᵏ + r·uᵢ₊₁ᵏ,     r = α·dt/dx²
//! ```
//!
//! # Stability
//!
//! The scheme is stable for r ≤ ½. The user only chooses the number of
//! spatial samples; the number of time samples is derived from it
//! (see [`TimeGrid::heat`]) so that the bound always holds.
//!
//! # Grid layout
//!
//! - Row 0 is u(0, x) sampled at `x = i·dx`, edges included.
//! - Every later row k updates the interior from row k − 1, then sets the
//!   two edge cells from the boundary conditions at `t = k·dt`.

use log::debug;

use crate::equation::params::Params;
use crate::equation::{Equation, EquationFamily, HeatEquation, RawParams, Solution};
use crate::error::{EquationError, SolveError};
use crate::solver::methods::{TimeGrid, apply_stencil, sample_in_space, space_samples};
use crate::solver::{EquationSolver, SolverConfiguration, validate_row};

/// FTCS solver for ∂u/∂t = α ∂²u/∂x²
#[derive(Debug, Clone, Copy, Default)]
pub struct HeatEquationSolver;

impl HeatEquationSolver {
    /// Create a new heat equation solver
    ///
    /// # Example
    ///
    /// ```rust
    /// use deq_rs::equation::EquationFamily;
    /// use deq_rs::solver::{EquationSolver, HeatEquationSolver};
    ///
    /// let solver = HeatEquationSolver::new();
    /// assert_eq!(solver.family(), EquationFamily::HeatEquation);
    /// ```
    pub fn new() -> Self {
        Self
    }

    fn integrate(&self, equation: &HeatEquation, config: &SolverConfiguration) -> Result<Solution, SolveError> {
        config.validate()?;

        let grid = TimeGrid::heat(
            equation.alpha,
            equation.length,
            equation.time_period,
            equation.samples,
            config,
        )?;
        debug!(
            "solving heat equation: time_samples={}, space_samples={}, dt={}, dx={}, r={}",
            grid.time_samples, grid.space_samples, grid.dt, grid.dx, grid.ratio
        );

        let n = grid.space_samples;
        let r = grid.ratio;
        let weights = [r, 1.0 - 2.0 * r, r];
        let mut values = vec![0.0; grid.time_samples * n];

        // ====== Row 0: initial condition ======

        sample_in_space(&equation.initial_value, &grid, &mut values[..n])?;
        validate_row(&values[..n], 0)?;

        // ====== Rows 1..: interior stencil, then edges ======

        for k in 1..grid.time_samples {
            let (history, rest) = values.split_at_mut(k * n);
            let prev = &history[(k - 1) * n..];
            let next = &mut rest[..n];

            apply_stencil(prev, next, weights, None);
            equation.boundary.apply(next, grid.time(k), grid.dx)?;
            validate_row(next, k)?;
        }

        let mut solution = Solution::grid(
            equation.time_period,
            equation.length,
            grid.time_samples,
            n,
            &values,
        );
        solution.add_metadata("solver", self.name());
        solution.add_metadata("dt", &grid.dt.to_string());
        solution.add_metadata("dx", &grid.dx.to_string());
        solution.add_metadata("r", &grid.ratio.to_string());
        solution.add_metadata("time samples", &grid.time_samples.to_string());
        Ok(solution)
    }
}

impl EquationSolver for HeatEquationSolver {
    fn family(&self) -> EquationFamily {
        EquationFamily::HeatEquation
    }

    fn parse(&self, params: &RawParams) -> Result<Equation, EquationError> {
        let params = Params::root(params)?;
        let boundary = params.boundary()?;

        Ok(HeatEquation {
            alpha: params.positive("alpha")?,
            length: params.positive("length")?,
            time_period: params.positive("time_period")?,
            samples: space_samples(&params, &boundary)?,
            boundary,
            initial_value: params.initial_condition("initial_condition", 0)?,
        }
        .into())
    }

    fn solve(&self, equation: &Equation, config: &SolverConfiguration) -> Result<Solution, SolveError> {
        match equation {
            Equation::Heat(equation) => self.integrate(equation, config),
            other => Err(SolveError::WrongFamily {
                solver: self.name(),
                family: other.family(),
            }),
        }
    }

    fn name(&self) -> &'static str {
        "Heat equation (explicit FTCS)"
    }
}

// =================================================================================================
// Tests
// =================================================================================================
