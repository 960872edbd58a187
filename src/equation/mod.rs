//! Equation model
//!
//! This module defines WHAT can be solved: one struct per supported
//! family, the closed [`Equation`] sum type over them, and the
//! [`Solution`] container every solver produces.
//!
//! # Families
//!
//! | Tag                | Type               | Unknown        |
//! |--------------------|--------------------|----------------|
//! | `first_order_ode`  | [`FirstOrderOde`]  | x(t)           |
//! | `second_order_ode` | [`SecondOrderOde`] | x(t)           |
//! | `heat_equation`    | [`HeatEquation`]   | u(t, x)        |
//! | `wave_equation`    | [`WaveEquation`]   | u(t, x)        |
//!
//! The family set is fixed. Each family is parsed and solved by its own
//! [`EquationSolver`](crate::solver::EquationSolver), selected through
//! [`EquationFamily::solver`].
//!
//! # Example
//!
//! ```rust
//! use deq_rs::equation::EquationFamily;
//! use serde_json::json;
//!
//! let family: EquationFamily = "first_order_ode".parse().unwrap();
//! let equation = family.solver().parse(&json!({
//!     "samples": 3,
//!     "time_period": 2.0,
//!     "initial_value": 1.0,
//!     "source": "x",
//! })).unwrap();
//! assert_eq!(equation.family(), family);
//! ```

pub mod params;
pub mod solution;

pub use params::RawParams;
pub use solution::{Solution, SolutionValues};

use std::fmt;
use std::str::FromStr;

use crate::error::EquationError;
use crate::expression::Expression;
use crate::solver::{
    Boundary, EquationSolver, FirstOrderOdeSolver, HeatEquationSolver, SecondOrderOdeSolver,
    WaveEquationSolver,
};

// =================================================================================================
// Family tag
// =================================================================================================

/// Identifier of an equation family, as used on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EquationFamily {
    FirstOrderOde,
    SecondOrderOde,
    HeatEquation,
    WaveEquation,
}

impl EquationFamily {
    /// All supported families
    pub const ALL: [EquationFamily; 4] = [
        EquationFamily::FirstOrderOde,
        EquationFamily::SecondOrderOde,
        EquationFamily::HeatEquation,
        EquationFamily::WaveEquation,
    ];

    /// Wire tag of the family
    pub fn tag(&self) -> &'static str {
        match self {
            EquationFamily::FirstOrderOde => "first_order_ode",
            EquationFamily::SecondOrderOde => "second_order_ode",
            EquationFamily::HeatEquation => "heat_equation",
            EquationFamily::WaveEquation => "wave_equation",
        }
    }

    /// The stateless solver responsible for this family
    pub fn solver(&self) -> &'static dyn EquationSolver {
        match self {
            EquationFamily::FirstOrderOde => &FirstOrderOdeSolver,
            EquationFamily::SecondOrderOde => &SecondOrderOdeSolver,
            EquationFamily::HeatEquation => &HeatEquationSolver,
            EquationFamily::WaveEquation => &WaveEquationSolver,
        }
    }

    /// `true` for the two partial differential equations
    pub fn is_pde(&self) -> bool {
        matches!(self, EquationFamily::HeatEquation | EquationFamily::WaveEquation)
    }
}

impl fmt::Display for EquationFamily {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

impl FromStr for EquationFamily {
    type Err = EquationError;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|family| family.tag() == tag)
            .ok_or_else(|| EquationError::UnknownFamily { tag: tag.to_string() })
    }
}

// =================================================================================================
// Ordinary differential equations
// =================================================================================================

/// dx/dt = f(t, x), x(0) = x₀
#[derive(Debug, Clone)]
pub struct FirstOrderOde {
    /// Number of time samples, including t = 0 (≥ 2)
    pub samples: usize,

    /// Integration horizon T (> 0)
    pub time_period: f64,

    /// x(0)
    pub initial_value: f64,

    /// f(t, x)
    pub source: Expression,
}

/// d²x/dt² = f(t, x, y) with y = dx/dt, x(0) = x₀, y(0) = y₀
#[derive(Debug, Clone)]
pub struct SecondOrderOde {
    /// Number of time samples, including t = 0 (≥ 2)
    pub samples: usize,

    /// Integration horizon T (> 0)
    pub time_period: f64,

    /// x(0)
    pub initial_value: f64,

    /// dx/dt at t = 0
    pub initial_derivative: f64,

    /// f(t, x, y)
    pub source: Expression,
}

// =================================================================================================
// Partial differential equations
// =================================================================================================

/// ∂u/∂t = α ∂²u/∂x² on [0, L] × [0, T]
#[derive(Debug, Clone)]
pub struct HeatEquation {
    /// Diffusivity α (> 0)
    pub alpha: f64,

    /// Rod length L (> 0)
    pub length: f64,

    /// Time horizon T (> 0)
    pub time_period: f64,

    /// Number of spatial samples, including both edges (≥ 2, ≥ 3 with a Neumann edge)
    pub samples: usize,

    /// Edge conditions at x = 0 and x = L
    pub boundary: Boundary,

    /// u(0, x)
    pub initial_value: Expression,
}

/// ∂²u/∂t² = c² ∂²u/∂x² on [0, L] × [0, T]
#[derive(Debug, Clone)]
pub struct WaveEquation {
    /// Propagation speed c (> 0)
    pub c: f64,

    /// String length L (> 0)
    pub length: f64,

    /// Time horizon T (> 0)
    pub time_period: f64,

    /// Number of spatial samples, including both edges (≥ 2, ≥ 3 with a Neumann edge)
    pub samples: usize,

    /// Edge conditions at x = 0 and x = L
    pub boundary: Boundary,

    /// u(0, x)
    pub initial_value: Expression,

    /// ∂u/∂t(0, x)
    pub initial_velocity: Expression,
}

// =================================================================================================
// Equation (closed sum type)
// =================================================================================================

/// A parsed equation of one of the four supported families.
#[derive(Debug, Clone)]
pub enum Equation {
    FirstOrderOde(FirstOrderOde),
    SecondOrderOde(SecondOrderOde),
    Heat(HeatEquation),
    Wave(WaveEquation),
}

impl Equation {
    /// Family of this equation
    pub fn family(&self) -> EquationFamily {
        match self {
            Equation::FirstOrderOde(_) => EquationFamily::FirstOrderOde,
            Equation::SecondOrderOde(_) => EquationFamily::SecondOrderOde,
            Equation::Heat(_) => EquationFamily::HeatEquation,
            Equation::Wave(_) => EquationFamily::WaveEquation,
        }
    }

    /// Time horizon T
    pub fn time_period(&self) -> f64 {
        match self {
            Equation::FirstOrderOde(equation) => equation.time_period,
            Equation::SecondOrderOde(equation) => equation.time_period,
            Equation::Heat(equation) => equation.time_period,
            Equation::Wave(equation) => equation.time_period,
        }
    }

    /// User-supplied sample count (time samples for ODEs, space samples for PDEs)
    pub fn samples(&self) -> usize {
        match self {
            Equation::FirstOrderOde(equation) => equation.samples,
            Equation::SecondOrderOde(equation) => equation.samples,
            Equation::Heat(equation) => equation.samples,
            Equation::Wave(equation) => equation.samples,
        }
    }
}

impl From<FirstOrderOde> for Equation {
    fn from(equation: FirstOrderOde) -> Self {
        Equation::FirstOrderOde(equation)
    }
}

impl From<SecondOrderOde> for Equation {
    fn from(equation: SecondOrderOde) -> Self {
        Equation::SecondOrderOde(equation)
    }
}

impl From<HeatEquation> for Equation {
    fn from(equation: HeatEquation) -> Self {
        Equation::Heat(equation)
    }
}

impl From<WaveEquation> for Equation {
    fn from(equation: WaveEquation) -> Self {
        Equation::Wave(equation)
    }
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_family_tags_round_trip() {
        for family in EquationFamily::ALL {
            assert_eq!(family.tag().parse::<EquationFamily>().unwrap(), family);
            assert_eq!(format!("{}", family), family.tag());
        }
    }

    #[test]
    fn test_unknown_family() {
        let result = "bogus".parse::<EquationFamily>();
        assert!(matches!(result, Err(EquationError::UnknownFamily { ref tag }) if tag == "bogus"));
    }

    #[test]
    fn test_tags_are_case_sensitive() {
        assert!("Heat_Equation".parse::<EquationFamily>().is_err());
    }

    #[test]
    fn test_solver_dispatch_matches_family() {
        for family in EquationFamily::ALL {
            assert_eq!(family.solver().family(), family);
        }
    }

    #[test]
    fn test_is_pde() {
        assert!(!EquationFamily::FirstOrderOde.is_pde());
        assert!(!EquationFamily::SecondOrderOde.is_pde());
        assert!(EquationFamily::HeatEquation.is_pde());
        assert!(EquationFamily::WaveEquation.is_pde());
    }

    #[test]
    fn test_equation_accessors() {
        let equation: Equation = FirstOrderOde {
            samples: 5,
            time_period: 2.0,
            initial_value: 1.0,
            source: Expression::compile("x", &["t", "x"]).unwrap(),
        }
        .into();

        assert_eq!(equation.family(), EquationFamily::FirstOrderOde);
        assert_eq!(equation.samples(), 5);
        assert_eq!(equation.time_period(), 2.0);
    }
}
