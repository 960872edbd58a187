//! Boundary conditions for one-dimensional PDEs
//!
//! Each edge of the spatial domain `[0, L]` carries one
//! [`BoundaryCondition`]: a [`BoundaryKind`] plus a function g(t).
//!
//! | Kind        | Left edge (i = 0)       | Right edge (i = n−1)       |
//! |-------------|-------------------------|----------------------------|
//! | Dirichlet   | u₀ = g(t)               | uₙ₋₁ = g(t)                |
//! | Neumann     | u₀ = u₁ − g(t)·dx       | uₙ₋₁ = uₙ₋₂ + g(t)·dx      |
//!
//! The Neumann rule is a first-order one-sided difference of ∂u/∂x = g(t).
//! It reads the freshly updated interior neighbour, so [`Boundary::apply`]
//! must run after the interior stencil of the same row.

use std::fmt;
use std::str::FromStr;

use crate::error::SolveError;
use crate::expression::Expression;

// =================================================================================================
// Boundary kind
// =================================================================================================

/// Type of an edge condition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoundaryKind {
    /// Prescribed value
    Dirichlet,
    /// Prescribed outward slope ∂u/∂x
    Neumann,
}

impl fmt::Display for BoundaryKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            BoundaryKind::Dirichlet => write!(f, "dirichlet"),
            BoundaryKind::Neumann => write!(f, "neumann"),
        }
    }
}

/// Error returned when a boundary kind name is not recognised
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownBoundaryKind(pub String);

impl FromStr for BoundaryKind {
    type Err = UnknownBoundaryKind;

    /// Case-insensitive; `D` and `N` are accepted as short forms.
    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name.trim().to_ascii_lowercase().as_str() {
            "dirichlet" | "d" => Ok(BoundaryKind::Dirichlet),
            "neumann" | "n" => Ok(BoundaryKind::Neumann),
            _ => Err(UnknownBoundaryKind(name.to_string())),
        }
    }
}

// =================================================================================================
// Boundary condition
// =================================================================================================

/// Kind and time-dependent function of one edge
#[derive(Debug, Clone)]
pub struct BoundaryCondition {
    pub kind: BoundaryKind,

    /// g(t)
    pub function: Expression,
}

impl BoundaryCondition {
    pub fn new(kind: BoundaryKind, function: Expression) -> Self {
        Self { kind, function }
    }

    /// g(t)
    pub fn value_at(&self, t: f64) -> Result<f64, SolveError> {
        Ok(self.function.call(&[t])?)
    }
}

/// Edge conditions at x = 0 (`left`) and x = L (`right`)
#[derive(Debug, Clone)]
pub struct Boundary {
    pub left: BoundaryCondition,
    pub right: BoundaryCondition,
}

impl Boundary {
    pub fn new(left: BoundaryCondition, right: BoundaryCondition) -> Self {
        Self { left, right }
    }

    /// Overwrite both edge cells of `row` for time `t`.
    ///
    /// `row` must hold at least 2 samples (3 with a Neumann edge) and its
    /// interior must already be updated for time `t`.
    pub fn apply(&self, row: &mut [f64], t: f64, dx: f64) -> Result<(), SolveError> {
        let last = row.len() - 1;

        let left = self.left.value_at(t)?;
        row[0] = match self.left.kind {
            BoundaryKind::Dirichlet => left,
            BoundaryKind::Neumann => row[1] - left * dx,
        };

        let right = self.right.value_at(t)?;
        row[last] = match self.right.kind {
            BoundaryKind::Dirichlet => right,
            BoundaryKind::Neumann => row[last - 1] + right * dx,
        };

        Ok(())
    }
}

// =================================================================================================
// Tests
// =================================================================================================
