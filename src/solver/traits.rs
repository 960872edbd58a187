//! Solver trait and configuration
//!
//! # Design
//!
//! - [`EquationSolver`]: one stateless implementation per equation family.
//!   It owns both halves of the family's life cycle: turning raw parameters
//!   into an [`Equation`] and turning that equation into a [`Solution`].
//! - [`SolverConfiguration`]: knobs shared by every solver. Grid sizes are
//!   derived from the equation itself, so the configuration only carries
//!   resource limits.
//!
//! Solvers are unit structs and are reachable as `&'static dyn EquationSolver`
//! through [`EquationFamily::solver`](crate::equation::EquationFamily::solver).

use crate::equation::{Equation, EquationFamily, RawParams, Solution};
use crate::error::{EquationError, SolveError};

// =================================================================================================
// Solver configuration
// =================================================================================================

/// Default cap on the number of cells a single solution may hold.
///
/// 50 million `f64` values is 400 MB, which is already a lot for one job.
pub const DEFAULT_MAX_GRID_CELLS: usize = 50_000_000;

/// Resource limits applied to every solve
///
/// # Examples
///
/// ```rust
/// use deq_rs::solver::SolverConfiguration;
///
/// let config = SolverConfiguration::default().with_max_grid_cells(1_000);
/// assert_eq!(config.max_grid_cells, 1_000);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct SolverConfiguration {
    /// Largest `time_samples × space_samples` a solve may allocate
    pub max_grid_cells: usize,
}

impl SolverConfiguration {
    /// Create a configuration with an explicit cell budget
    pub fn new(max_grid_cells: usize) -> Self {
        Self { max_grid_cells }
    }

    /// Replace the cell budget
    pub fn with_max_grid_cells(mut self, max_grid_cells: usize) -> Self {
        self.max_grid_cells = max_grid_cells;
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), SolveError> {
        if self.max_grid_cells < 2 {
            return Err(SolveError::InvalidConfiguration(format!(
                "max_grid_cells must be at least 2, got {}",
                self.max_grid_cells
            )));
        }
        Ok(())
    }

    /// Fail with [`SolveError::GridTooLarge`] when `rows × columns` exceeds the budget.
    ///
    /// The product is formed in `f64` so that absurd sizes are rejected
    /// before anything is allocated.
    pub fn check_grid(&self, rows: f64, columns: f64) -> Result<(), SolveError> {
        let cells = rows * columns;
        if !cells.is_finite() || cells > self.max_grid_cells as f64 {
            return Err(SolveError::GridTooLarge {
                cells,
                limit: self.max_grid_cells,
            });
        }
        Ok(())
    }
}

impl Default for SolverConfiguration {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_GRID_CELLS)
    }
}

// =================================================================================================
// Solver trait
// =================================================================================================

/// A family-specific parser and numerical method.
///
/// Implementations are stateless and shared between worker threads.
pub trait EquationSolver: Send + Sync {
    /// Family handled by this solver
    fn family(&self) -> EquationFamily;

    /// Build a validated equation from raw parameters.
    fn parse(&self, params: &RawParams) -> Result<Equation, EquationError>;

    /// Solve an equation of this solver's family.
    ///
    /// Returns [`SolveError::WrongFamily`] for any other family.
    fn solve(&self, equation: &Equation, config: &SolverConfiguration) -> Result<Solution, SolveError>;

    /// Human readable name, used in logs and solution metadata
    fn name(&self) -> &'static str;
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_configuration() {
        let config = SolverConfiguration::default();
        assert_eq!(config.max_grid_cells, DEFAULT_MAX_GRID_CELLS);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_configuration() {
        let config = SolverConfiguration::new(1);
        assert!(matches!(config.validate(), Err(SolveError::InvalidConfiguration(_))));
    }

    #[test]
    fn test_check_grid() {
        let config = SolverConfiguration::new(100);
        assert!(config.check_grid(10.0, 10.0).is_ok());
        assert!(matches!(
            config.check_grid(10.0, 11.0),
            Err(SolveError::GridTooLarge { limit: 100, .. })
        ));
        assert!(config.check_grid(f64::INFINITY, 1.0).is_err());
        assert!(config.check_grid(1e300, 1e300).is_err());
    }
}
