//! Forward Euler for first-order ODEs
//!
//! # Mathematical Background
//!
//! ```text
//! dx/dt = f(t, x),   x(0) = x₀
//! ```
//!
//! With `dt = T / (samples − 1)` the solver produces
//!
//! ```text
//! x₀ = initial_value
//! xᵢ = xᵢ₋₁ + f(i·dt, xᵢ₋₁)·dt     for i = 1 … samples − 1
//! ```
//!
//! Note that the source is sampled at the *new* time `i·dt` while using the
//! previous value, where textbook Euler would use `(i − 1)·dt`. For
//! autonomous sources (no `t`) the two coincide.
//!
//! # Characteristics
//!
//! - **Order**: first-order accurate, global error O(dt)
//! - **Cost**: one source evaluation per step
//! - **Memory**: O(samples)
//!
//! # Example
//!
//! ```rust
//! use deq_rs::solver::{EquationSolver, FirstOrderOdeSolver, SolverConfiguration};
//! use serde_json::json;
//!
//! let solver = FirstOrderOdeSolver::new();
//! let equation = solver.parse(&json!({
//!     "samples": 3,
//!     "time_period": 2.0,
//!     "initial_value": 1.0,
//!     "source": "x",
//! })).unwrap();
//!
//! let solution = solver.solve(&equation, &SolverConfiguration::default()).unwrap();
//! assert_eq!(solution.as_series().unwrap().as_slice(), &[1.0, 2.0, 4.0]);
//! ```

use log::debug;

use crate::equation::params::Params;
use crate::equation::{Equation, EquationFamily, FirstOrderOde, RawParams, Solution};
use crate::error::{EquationError, SolveError};
use crate::solver::{EquationSolver, SolverConfiguration, validate_row};

/// Variables visible to the source f(t, x)
pub(crate) const SOURCE_VARIABLES: &[&str] = &["t", "x"];

/// Forward Euler solver for dx/dt = f(t, x)
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstOrderOdeSolver;

impl FirstOrderOdeSolver {
    /// Create a new first-order ODE solver
    ///
    /// # Example
    ///
    /// ```rust
    /// use deq_rs::solver::{EquationSolver, FirstOrderOdeSolver};
    ///
    /// let solver = FirstOrderOdeSolver::new();
    /// assert_eq!(solver.name(), "First-order ODE (forward Euler)");
    /// ```
    pub fn new() -> Self {
        Self
    }

    fn integrate(&self, equation: &FirstOrderOde, config: &SolverConfiguration) -> Result<Solution, SolveError> {
        config.validate()?;
        config.check_grid(equation.samples as f64, 1.0)?;

        let samples = equation.samples;
        let dt = equation.time_period / (samples - 1) as f64;
        debug!(
            "solving first-order ODE: samples={}, dt={}, source='{}'",
            samples,
            dt,
            equation.source.source()
        );

        let mut values = Vec::with_capacity(samples);
        values.push(equation.initial_value);

        for i in 1..samples {
            let previous = values[i - 1];
            let t = i as f64 * dt;
            let next = previous + equation.source.call(&[t, previous])? * dt;

            validate_row(&[next], i)?;
            values.push(next);
        }

        let mut solution = Solution::series(equation.time_period, values);
        solution.add_metadata("solver", self.name());
        solution.add_metadata("dt", &dt.to_string());
        solution.add_metadata("samples", &samples.to_string());
        Ok(solution)
    }
}

impl EquationSolver for FirstOrderOdeSolver {
    fn family(&self) -> EquationFamily {
        EquationFamily::FirstOrderOde
    }

    fn parse(&self, params: &RawParams) -> Result<Equation, EquationError> {
        let params = Params::root(params)?;

        Ok(FirstOrderOde {
            samples: params.count("samples", 2)?,
            time_period: params.positive("time_period")?,
            initial_value: params.finite("initial_value")?,
            source: params.expression("source", SOURCE_VARIABLES)?,
        }
        .into())
    }

    fn solve(&self, equation: &Equation, config: &SolverConfiguration) -> Result<Solution, SolveError> {
        match equation {
            Equation::FirstOrderOde(equation) => self.integrate(equation, config),
            other => Err(SolveError::WrongFamily {
                solver: self.name(),
                family: other.family(),
            }),
        }
    }

    fn name(&self) -> &'static str {
        "First-order ODE (forward Euler)"
    }
}

// =================================================================================================
// Tests
// =================================================================================================
