//! Numerical solvers
//!
//! Every supported equation family has one stateless solver implementing
//! [`EquationSolver`]. All four are explicit schemes: each time sample is
//! computed from the one or two samples before it, so a solve is a single
//! forward sweep with no linear systems involved.
//!
//! # Module Organization
//!
//! - **`traits`**: [`EquationSolver`] and [`SolverConfiguration`]
//! - **`boundary`**: Dirichlet/Neumann edge conditions for the PDEs
//! - **`methods`**: the four schemes
//!   - [`FirstOrderOdeSolver`]: forward Euler
//!   - [`SecondOrderOdeSolver`]: forward Euler on the (x, y = dx/dt) system
//!   - [`HeatEquationSolver`]: FTCS, r = α·dt/dx² ≤ ½
//!   - [`WaveEquationSolver`]: central differences, (c·dt/dx)² ≤ 1
//!
//! # Workflow
//!
//! ```text
//! raw params ──parse──▶ Equation ──solve──▶ Solution
//!                 │                  │
//!           EquationError        SolveError
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use deq_rs::solver::{EquationSolver, HeatEquationSolver, SolverConfiguration};
//! use serde_json::json;
//!
//! let solver = HeatEquationSolver::new();
//! let equation = solver.parse(&json!({
//!     "alpha": 1.0,
//!     "length": 1.0,
//!     "time_period": 0.1,
//!     "samples": 11,
//!     "initial_condition": ["sin(pi * x)"],
//!     "boundary": {
//!         "left_condition": { "type": "dirichlet", "function": "0" },
//!         "right_condition": { "type": "dirichlet", "function": "0" },
//!     },
//! })).unwrap();
//!
//! let solution = solver.solve(&equation, &SolverConfiguration::default()).unwrap();
//! assert_eq!(solution.space_samples(), Some(11));
//! ```
//!
//! # Error Handling
//!
//! Parsing fails with [`EquationError`](crate::error::EquationError) and
//! solving with [`SolveError`](crate::error::SolveError). Every PDE row and
//! every ODE sample is checked for NaN/Inf as soon as it is produced; the
//! solve stops at the first bad step.

// =================================================================================================
// Module Declarations
// =================================================================================================
mod boundary;
mod methods;
mod traits;

// =================================================================================================
// Parallel Execution Threshold
// =================================================================================================
//
// Interior stencil updates switch to Rayon once a row is wider than the
// threshold. The value is a performance hint read on every row, so it is
// kept in an AtomicUsize with Relaxed ordering.
// =================================================================================================

use std::sync::atomic::{AtomicUsize, Ordering};

/// Default row width above which stencil updates run in parallel.
///
/// Below roughly a thousand cells the Rayon dispatch costs more than the
/// three multiply-adds per cell it would spread out.
const DEFAULT_PARALLEL_THRESHOLD: usize = 999;

static PARALLEL_THRESHOLD: AtomicUsize = AtomicUsize::new(DEFAULT_PARALLEL_THRESHOLD);

/// Row width (interior cells) above which PDE stencil updates use Rayon.
///
/// Has no effect without the `parallel` feature.
///
/// ```rust
/// use deq_rs::solver::parallel_threshold;
///
/// assert!(parallel_threshold() >= 1);
/// ```
pub fn parallel_threshold() -> usize {
    PARALLEL_THRESHOLD.load(Ordering::Relaxed)
}

/// Change the stencil row width at which updates go parallel.
///
/// Applies to every solve started afterwards, process-wide.
///
/// # Panics
///
/// Panics when `threshold == 0`.
///
/// ```rust
/// use deq_rs::solver::{parallel_threshold, set_parallel_threshold};
///
/// let before = parallel_threshold();
/// set_parallel_threshold(4096);
/// assert_eq!(parallel_threshold(), 4096);
/// set_parallel_threshold(before);
/// ```
pub fn set_parallel_threshold(threshold: usize) {
    assert!(threshold > 0, "parallel threshold must be at least 1");
    PARALLEL_THRESHOLD.store(threshold, Ordering::Relaxed);
}

#[cfg(test)]
static THRESHOLD_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

/// Saves the current threshold on construction and restores it on drop.
///
/// Guards are mutually exclusive, so tests holding one never observe each
/// other's threshold.
#[cfg(test)]
pub(crate) struct ThresholdGuard {
    previous: usize,
    _lock: std::sync::MutexGuard<'static, ()>,
}

#[cfg(test)]
impl ThresholdGuard {
    pub(crate) fn save(threshold: usize) -> Self {
        let lock = THRESHOLD_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let guard = Self { previous: parallel_threshold(), _lock: lock };
        set_parallel_threshold(threshold);
        guard
    }
}

#[cfg(test)]
impl Drop for ThresholdGuard {
    fn drop(&mut self) {
        PARALLEL_THRESHOLD.store(self.previous, Ordering::Relaxed);
    }
}

// =================================================================================================
// Public Re-exports
// =================================================================================================

pub use traits::{DEFAULT_MAX_GRID_CELLS, EquationSolver, SolverConfiguration};

pub use boundary::{Boundary, BoundaryCondition, BoundaryKind, UnknownBoundaryKind};

pub use methods::{
    FirstOrderOdeSolver, HeatEquationSolver, SecondOrderOdeSolver, TimeGrid, WaveEquationSolver,
};

// =================================================================================================
// Helper Functions
// =================================================================================================

use crate::error::SolveError;

/// Fail with [`SolveError::NonFinite`] if `values` holds NaN or Inf.
///
/// `step` is the time sample index reported back to the caller.
pub(crate) fn validate_row(values: &[f64], step: usize) -> Result<(), SolveError> {
    if values.iter().all(|value| value.is_finite()) {
        Ok(())
    } else {
        Err(SolveError::NonFinite { step })
    }
}

// =================================================================================================
// Tests
// =================================================================================================
