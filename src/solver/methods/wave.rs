//! Explicit centred scheme for the 1-D wave equation
//!
//! # Mathematical Background
//!
//! ```text
//! ∂²u/∂t² = c² ∂²u/∂x²,   x ∈ [0, L],  t ∈ [0, T]
//! ```
//!
//! Centred second differences in both time and space give the three-level
//! recurrence
//!
//! ```text
//! uᵢᵏ⁺¹ = r·uᵢ₋₁ᵏ + 2(1 − r)·uᵢᵏ + r·uᵢ₊₁ᵏ − uᵢᵏ⁻¹,     r = (c·dt/dx)²
//! ```
//!
//! The recurrence needs two history rows. Row 1 comes from a Taylor
//! half-step on the initial data:
//!
//! ```text
//! uᵢ¹ = ½·(r·uᵢ₋₁⁰ + 2(1 − r)·uᵢ⁰ + r·uᵢ₊₁⁰) + dt²·v(xᵢ)
//! ```
//!
//! The velocity term is scaled by dt², not the dt of a second-order Taylor
//! start. With zero initial velocity the two agree.
//!
//! # Stability
//!
//! The Courant-Friedrichs-Lewy condition c·dt/dx ≤ 1 is enforced by
//! [`TimeGrid::wave`], which derives the number of time samples from the
//! spatial resolution.

use log::debug;

use crate::equation::params::Params;
use crate::equation::{Equation, EquationFamily, RawParams, Solution, WaveEquation};
use crate::error::{EquationError, SolveError};
use crate::solver::methods::{TimeGrid, apply_stencil, sample_in_space, space_samples};
use crate::solver::{EquationSolver, SolverConfiguration, validate_row};

/// Centred explicit solver for ∂²u/∂t² = c² ∂²u/∂x²
#[derive(Debug, Clone, Copy, Default)]
pub struct WaveEquationSolver;

impl WaveEquationSolver {
    pub fn new() -> Self {
        Self
    }

    fn integrate(&self, equation: &WaveEquation, config: &SolverConfiguration) -> Result<Solution, SolveError> {
        config.validate()?;

        let grid = TimeGrid::wave(
            equation.c,
            equation.length,
            equation.time_period,
            equation.samples,
            config,
        )?;
        debug!(
            "solving wave equation: time_samples={}, space_samples={}, dt={}, dx={}, r={}",
            grid.time_samples, grid.space_samples, grid.dt, grid.dx, grid.ratio
        );

        let n = grid.space_samples;
        let r = grid.ratio;
        let weights = [r, 2.0 * (1.0 - r), r];
        let mut values = vec![0.0; grid.time_samples * n];

        // ====== Row 0: initial displacement ======

        sample_in_space(&equation.initial_value, &grid, &mut values[..n])?;
        validate_row(&values[..n], 0)?;

        // ====== Row 1: Taylor half-step with initial velocity ======

        let mut velocity = vec![0.0; n];
        sample_in_space(&equation.initial_velocity, &grid, &mut velocity)?;
        {
            let (first, rest) = values.split_at_mut(n);
            let second = &mut rest[..n];

            apply_stencil(first, second, weights, None);
            let dt2 = grid.dt * grid.dt;
            for i in 1..n - 1 {
                second[i] = 0.5 * second[i] + dt2 * velocity[i];
            }

            equation.boundary.apply(second, grid.time(1), grid.dx)?;
            validate_row(second, 1)?;
        }

        // ====== Rows 2..: three-level recurrence ======

        for k in 2..grid.time_samples {
            let (history, rest) = values.split_at_mut(k * n);
            let lag = &history[(k - 2) * n..(k - 1) * n];
            let prev = &history[(k - 1) * n..];
            let next = &mut rest[..n];

            apply_stencil(prev, next, weights, Some(lag));
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

impl EquationSolver for WaveEquationSolver {
    fn family(&self) -> EquationFamily {
        EquationFamily::WaveEquation
    }

    fn parse(&self, params: &RawParams) -> Result<Equation, EquationError> {
        let params = Params::root(params)?;
        let boundary = params.boundary()?;

        Ok(WaveEquation {
            c: params.positive("c")?,
            length: params.positive("length")?,
            time_period: params.positive("time_period")?,
            samples: space_samples(&params, &boundary)?,
            boundary,
            initial_value: params.initial_condition("initial_condition", 0)?,
            initial_velocity: params.initial_condition("initial_condition", 1)?,
        }
        .into())
    }

    fn solve(&self, equation: &Equation, config: &SolverConfiguration) -> Result<Solution, SolveError> {
        match equation {
            Equation::Wave(equation) => self.integrate(equation, config),
            other => Err(SolveError::WrongFamily {
                solver: self.name(),
                family: other.family(),
            }),
        }
    }

    fn name(&self) -> &'static str {
        "Wave equation (explicit centred)"
    }
}

// =================================================================================================
// Tests
// =================================================================================================
