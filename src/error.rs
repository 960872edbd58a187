//! Error taxonomy
//!
//! Three layers, matching the three places a request can go wrong:
//!
//! - [`EquationError`]: raw parameters could not be turned into an
//!   [`Equation`](crate::equation::Equation). Raised synchronously.
//! - [`SolveError`]: a parsed equation could not be solved (stability bound
//!   violated, grid too large, non-finite values). Raised on a worker.
//! - [`JobError`]: what callers of the [`JobManager`](crate::jobs::JobManager)
//!   see. Every variant is recoverable: fix the input and resubmit.

use thiserror::Error;

use crate::equation::EquationFamily;
use crate::expression::ExpressionError;

// =================================================================================================
// Parse errors
// =================================================================================================

/// Raw parameters do not describe a valid equation.
#[derive(Debug, Error)]
pub enum EquationError {
    /// The family tag is not one of the four supported families
    #[error("unknown equation type '{tag}'")]
    UnknownFamily { tag: String },

    /// The parameter node at `field` must be a key→value mapping
    #[error("'{field}' must be a mapping of parameters")]
    NotAMapping { field: String },

    /// A required key is absent
    #[error("missing required field '{field}'")]
    MissingField { field: String },

    /// A key holds something that is not a number
    #[error("field '{field}' must be numeric, got {value}")]
    NotNumeric { field: String, value: String },

    /// A key holds a number outside its allowed range
    #[error("field '{field}' is invalid: {reason}")]
    InvalidValue { field: String, reason: String },

    /// A boundary `type` does not name a known boundary condition
    #[error("field '{field}' names an unknown boundary condition '{value}'")]
    UnknownBoundaryKind { field: String, value: String },

    /// An embedded expression failed to compile
    #[error("field '{field}' holds an invalid expression: {source}")]
    InvalidExpression {
        field: String,
        #[source]
        source: ExpressionError,
    },
}

// =================================================================================================
// Solve errors
// =================================================================================================

/// A parsed equation could not be solved.
#[derive(Debug, Error)]
pub enum SolveError {
    /// A solver was handed an equation of another family
    #[error("{solver} cannot solve a {family} equation")]
    WrongFamily {
        solver: &'static str,
        family: EquationFamily,
    },

    /// The derived stability ratio exceeds the scheme's bound
    #[error("unstable discretisation: ratio {ratio} exceeds the bound {limit}")]
    Unstable { ratio: f64, limit: f64 },

    /// The derived grid would exceed the configured cell budget
    #[error("grid of {cells} cells exceeds the configured limit of {limit}")]
    GridTooLarge { cells: f64, limit: usize },

    /// NaN or Inf appeared while stepping
    #[error("non-finite value at time step {step}; the input diverges numerically")]
    NonFinite { step: usize },

    /// An expression failed while being evaluated
    #[error("expression evaluation failed: {0}")]
    Expression(#[from] ExpressionError),

    /// The solver configuration itself is invalid
    #[error("invalid solver configuration: {0}")]
    InvalidConfiguration(String),
}

// =================================================================================================
// Job errors
// =================================================================================================

/// Errors surfaced by the job manager.
///
/// ```rust
/// use deq_rs::JobError;
///
/// let err = JobError::MissingSolution { id: "abc".to_string() };
/// assert_eq!(err.to_string(), "solution abc does not exist");
/// ```
#[derive(Debug, Error)]
pub enum JobError {
    /// Unknown family tag
    #[error("invalid equation type '{tag}'")]
    InvalidEquationType { tag: String },

    /// Parameters were rejected by the family's parser
    #[error("invalid equation: {0}")]
    InvalidEquation(#[source] EquationError),

    /// A caller-supplied identifier is already in use
    #[error("job identifier {id} is already in use")]
    IdentifierCollision { id: String },

    /// Unknown or already consumed identifier
    #[error("solution {id} does not exist")]
    MissingSolution { id: String },

    /// The job is still running
    #[error("calculation {id} is not done yet")]
    CalculationNotDone { id: String },

    /// The solve failed on its worker
    #[error("calculation {id} failed: {reason}")]
    SolveFailure { id: String, reason: String },

    /// A synchronous solve failed
    #[error("solve failed: {0}")]
    Solve(#[from] SolveError),

    /// The job table is full
    #[error("job capacity of {limit} exhausted; retrieve finished results first")]
    CapacityExhausted { limit: usize },

    /// The manager could not be built
    #[error("invalid job manager configuration: {0}")]
    InvalidConfiguration(String),
}

impl From<EquationError> for JobError {
    fn from(error: EquationError) -> Self {
        match error {
            EquationError::UnknownFamily { tag } => JobError::InvalidEquationType { tag },
            other => JobError::InvalidEquation(other),
        }
    }
}
