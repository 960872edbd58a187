//! deq-rs: Differential Equation Solving Service
//!
//! Numerical solutions of ordinary and partial differential equations by
//! explicit finite differences, run as identifiable asynchronous jobs.
//!
//! # Architecture
//!
//! deq-rs is built on two core principles:
//!
//! 1. **Separation of Problem and Method**
//!    - Equations define what to solve ([`equation`])
//!    - Solvers provide the numerical scheme ([`solver`])
//!
//! 2. **At-most-once Job Results**
//!    - [`JobManager`] runs solves off the caller's thread
//!    - Every result is handed out exactly once, then forgotten
//!
//! # Supported Equations
//!
//! | Tag                | Equation                         | Scheme                 |
//! |--------------------|----------------------------------|------------------------|
//! | `first_order_ode`  | dx/dt = f(t, x)                  | forward Euler          |
//! | `second_order_ode` | d²x/dt² = f(t, x, dx/dt)         | forward Euler          |
//! | `heat_equation`    | ∂u/∂t = α ∂²u/∂x²                | FTCS                   |
//! | `wave_equation`    | ∂²u/∂t² = c² ∂²u/∂x²             | centred differences    |
//!
//! Sources, initial conditions and boundary functions are arithmetic
//! expressions over a fixed vocabulary (see [`expression`]).
//!
//! # Quick Start
//!
//! ```rust
//! use std::time::Duration;
//! use deq_rs::prelude::*;
//! use serde_json::json;
//!
//! # fn main() -> Result<(), JobError> {
//! let manager = JobManager::new(JobManagerConfig::default())?;
//!
//! let id = manager.submit("heat_equation", &json!({
//!     "alpha": 1.0,
//!     "length": 1.0,
//!     "time_period": 0.1,
//!     "samples": 21,
//!     "initial_condition": ["sin(pi * x)"],
//!     "boundary": {
//!         "left_condition": { "type": "dirichlet", "function": "0" },
//!         "right_condition": { "type": "dirichlet", "function": "0" },
//!     },
//! }))?;
//!
//! manager.wait(&id, Duration::from_secs(30));
//! let solution = manager.result(&id)?;
//! println!("{} time samples", solution.time_samples());
//! # Ok(())
//! # }
//! ```
//!
//! # Modules
//!
//! - [`equation`]: Equation families, parameter parsing and [`Solution`]
//! - [`expression`]: Sandboxed arithmetic expressions
//! - [`solver`]: Numerical schemes
//! - [`jobs`]: Asynchronous job manager
//! - [`output`]: Export of solutions
//! - [`error`]: Error taxonomy

// Core modules
pub mod equation;
pub mod error;
pub mod expression;
pub mod solver;

pub mod jobs;
pub mod output;

pub use equation::{Equation, EquationFamily, Solution};
pub use error::{EquationError, JobError, SolveError};
pub use jobs::{JobId, JobManager, JobManagerConfig, JobStatus};

pub mod prelude {
    //! Convenient imports for common usage
    //!
    //! ```rust
    //! use deq_rs::prelude::*;
    //! ```
    pub use crate::equation::{Equation, EquationFamily, Solution, SolutionValues};
    pub use crate::error::{EquationError, JobError, SolveError};
    pub use crate::jobs::{JobId, JobManager, JobManagerConfig, JobStatus};
    pub use crate::solver::{
        EquationSolver, FirstOrderOdeSolver, HeatEquationSolver, SecondOrderOdeSolver,
        SolverConfiguration, WaveEquationSolver,
    };
}
