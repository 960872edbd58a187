//! Forward Euler for second-order ODEs
//!
//! # Mathematical Background
//!
//! The equation d²x/dt² = f(t, x, dx/dt) is rewritten as the first-order
//! system
//!
//! ```text
//! dx/dt = y
//! dy/dt = f(t, x, y)
//! ```
//!
//! and stepped with forward Euler, `dt = T / (samples − 1)`:
//!
//! ```text
//! xᵢ = xᵢ₋₁ + yᵢ₋₁·dt
//! yᵢ = yᵢ₋₁ + f((i − 1)·dt, xᵢ₋₁, yᵢ₋₁)·dt
//! ```
//!
//! The source is evaluated on the previous (x, y) pair before y is
//! updated. Reordering these two updates changes every output value.
//!
//! Only x is returned; y is internal state.

use log::debug;

use crate::equation::params::Params;
use crate::equation::{Equation, EquationFamily, RawParams, SecondOrderOde, Solution};
use crate::error::{EquationError, SolveError};
use crate::solver::{EquationSolver, SolverConfiguration, validate_row};

/// Variables visible to the source f(t, x, y), y = dx/dt
pub(crate) const SOURCE_VARIABLES: &[&str] = &["t", "x", "y"];

/// Forward Euler solver for d²x/dt² = f(t, x, dx/dt)
#[derive(Debug, Clone, Copy, Default)]
pub struct SecondOrderOdeSolver;

impl SecondOrderOdeSolver {
    pub fn new() -> Self {
        Self
    }

    fn integrate(&self, equation: &SecondOrderOde, config: &SolverConfiguration) -> Result<Solution, SolveError> {
        config.validate()?;
        config.check_grid(equation.samples as f64, 1.0)?;

        let samples = equation.samples;
        let dt = equation.time_period / (samples - 1) as f64;
        debug!(
            "solving second-order ODE: samples={}, dt={}, source='{}'",
            samples,
            dt,
            equation.source.source()
        );

        let mut values = Vec::with_capacity(samples);
        values.push(equation.initial_value);
        let mut derivative = equation.initial_derivative;

        for i in 1..samples {
            let previous = values[i - 1];
            let next = previous + derivative * dt;

            let t = (i - 1) as f64 * dt;
            derivative += equation.source.call(&[t, previous, derivative])? * dt;

            validate_row(&[next, derivative], i)?;
            values.push(next);
        }

        let mut solution = Solution::series(equation.time_period, values);
        solution.add_metadata("solver", self.name());
        solution.add_metadata("dt", &dt.to_string());
        solution.add_metadata("samples", &samples.to_string());
        Ok(solution)
    }
}

impl EquationSolver for SecondOrderOdeSolver {
    fn family(&self) -> EquationFamily {
        EquationFamily::SecondOrderOde
    }

    fn parse(&self, params: &RawParams) -> Result<Equation, EquationError> {
        let params = Params::root(params)?;

        Ok(SecondOrderOde {
            samples: params.count("samples", 2)?,
            time_period: params.positive("time_period")?,
            initial_value: params.finite("initial_value")?,
            initial_derivative: params.finite("initial_derivative")?,
            source: params.expression("source", SOURCE_VARIABLES)?,
        }
        .into())
    }

    fn solve(&self, equation: &Equation, config: &SolverConfiguration) -> Result<Solution, SolveError> {
        match equation {
            Equation::SecondOrderOde(equation) => self.integrate(equation, config),
            other => Err(SolveError::WrongFamily {
                solver: self.name(),
                family: other.family(),
            }),
        }
    }

    fn name(&self) -> &'static str {
        "Second-order ODE (forward Euler)"
    }
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn series(params: serde_json::Value) -> Vec<f64> {
        let solver = SecondOrderOdeSolver::new();
        let equation = solver.parse(&params).unwrap();
        let solution = solver.solve(&equation, &SolverConfiguration::default()).unwrap();
        solution.as_series().unwrap().iter().copied().collect()
    }

    #[test]
    fn test_free_motion_is_linear() {
        let values = series(json!({
            "samples": 5, "time_period": 4.0, "initial_value": 1.0,
            "initial_derivative": 2.0, "source": "0",
        }));
        assert_eq!(values, vec![1.0, 3.0, 5.0, 7.0, 9.0]);
    }

    #[test]
    fn test_update_order() {
        // f = 1, dt = 1
        // x₁ = 0 + 0·1 = 0,  y₁ = 0 + 1 = 1
        // x₂ = 0 + 1·1 = 1,  y₂ = 2
        // x₃ = 1 + 2·1 = 3
        let values = series(json!({
            "samples": 4, "time_period": 3.0, "initial_value": 0.0,
            "initial_derivative": 0.0, "source": "1",
        }));
        assert_eq!(values, vec![0.0, 0.0, 1.0, 3.0]);
    }

    #[test]
    fn test_source_sees_previous_time() {
        // f = t, dt = 1: y₁ = 0 + f(0)·1 = 0, y₂ = 0 + f(1)·1 = 1
        // x₁ = 0, x₂ = 0, x₃ = 0 + 1 = 1
        let values = series(json!({
            "samples": 4, "time_period": 3.0, "initial_value": 0.0,
            "initial_derivative": 0.0, "source": "t",
        }));
        assert_eq!(values, vec![0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_source_sees_derivative() {
        // f = y, y₀ = 1, dt = 1: y doubles each step
        // x: 0, 1, 3, 7
        let values = series(json!({
            "samples": 4, "time_period": 3.0, "initial_value": 0.0,
            "initial_derivative": 1.0, "source": "y",
        }));
        assert_eq!(values, vec![0.0, 1.0, 3.0, 7.0]);
    }

    #[test]
    fn test_harmonic_oscillator() {
        let values = series(json!({
            "samples": 100001, "time_period": std::f64::consts::PI, "initial_value": 1.0,
            "initial_derivative": 0.0, "source": "-x",
        }));
        assert_eq!(values.len(), 100001);
        assert!((values[100000] + 1.0).abs() < 1e-3);
    }

    #[test]
    fn test_parse_requires_initial_derivative() {
        let result = SecondOrderOdeSolver::new().parse(&json!({
            "samples": 4, "time_period": 3.0, "initial_value": 0.0, "source": "x",
        }));
        assert!(matches!(result, Err(EquationError::MissingField { ref field }) if field == "initial_derivative"));
    }

    #[test]
    fn test_divergence_is_reported() {
        let solver = SecondOrderOdeSolver::new();
        let equation = solver
            .parse(&json!({
                "samples": 10, "time_period": 1.0, "initial_value": 1e300,
                "initial_derivative": 0.0, "source": "x * x",
            }))
            .unwrap();
        let result = solver.solve(&equation, &SolverConfiguration::default());
        assert!(matches!(result, Err(SolveError::NonFinite { step: 1 })));
    }
}
