//! Asynchronous solve jobs
//!
//! A [`JobManager`] accepts solve requests, runs them on a dedicated worker
//! pool and hands each result out exactly once.
//!
//! # Life cycle
//!
//! ```text
//!            submit                 worker finishes
//!  (none) ───────────▶ Running ──────────┬──────────▶ Succeeded ──┐
//!                                        └──────────▶ Failed ─────┤
//!                                                                 │ result()
//!                                                                 ▼
//!                                                             (removed)
//! ```
//!
//! - Parameters are parsed on the caller's thread, so bad input is rejected
//!   by `submit` and never reaches a worker.
//! - Both terminal states are final. There is no cancellation.
//! - `result` removes the job from the table. This is what bounds memory:
//!   a job occupies a slot from `submit` until its result is retrieved.
//! - The table holds at most [`JobManagerConfig::max_jobs`] jobs; `submit`
//!   fails with [`JobError::CapacityExhausted`](crate::error::JobError::CapacityExhausted)
//!   beyond that.
//!
//! # Example
//!
//! ```rust
//! use std::time::Duration;
//! use deq_rs::jobs::{JobManager, JobManagerConfig, JobStatus};
//! use serde_json::json;
//!
//! let manager = JobManager::new(JobManagerConfig::default().with_workers(2)).unwrap();
//! let id = manager.submit("first_order_ode", &json!({
//!     "samples": 3,
//!     "time_period": 2.0,
//!     "initial_value": 1.0,
//!     "source": "x",
//! })).unwrap();
//!
//! assert_eq!(manager.wait(&id, Duration::from_secs(10)), JobStatus::Succeeded);
//! let solution = manager.result(&id).unwrap();
//! assert_eq!(solution.as_series().unwrap().as_slice(), &[1.0, 2.0, 4.0]);
//! assert!(manager.result(&id).is_err());
//! ```

mod manager;

pub use manager::JobManager;

use std::borrow::Borrow;
use std::fmt;
use std::ops::Deref;

use uuid::Uuid;

use crate::error::JobError;
use crate::solver::SolverConfiguration;

// =================================================================================================
// Job identifier
// =================================================================================================

/// Opaque job identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct JobId(String);

impl JobId {
    /// A fresh random (UUID v4) identifier
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Deref for JobId {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for JobId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for JobId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<String> for JobId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for JobId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

// =================================================================================================
// Job status
// =================================================================================================

/// Observable state of a job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobStatus {
    /// Scheduled or being solved
    Running,
    /// Solved; the result is waiting to be retrieved
    Succeeded,
    /// The solve failed; the reason is returned by `result`
    Failed,
    /// Never submitted, or already retrieved
    Unknown,
}

impl JobStatus {
    /// Wire name: `running`, `success`, `failed` or `unknown`
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Running => "running",
            JobStatus::Succeeded => "success",
            JobStatus::Failed => "failed",
            JobStatus::Unknown => "unknown",
        }
    }

    /// `true` for Succeeded and Failed
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Succeeded | JobStatus::Failed)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =================================================================================================
// Configuration
// =================================================================================================

/// Default bound on the number of jobs held at once
pub const DEFAULT_MAX_JOBS: usize = 1024;

/// Job manager configuration
///
/// # Examples
///
/// ```rust
/// use deq_rs::jobs::JobManagerConfig;
///
/// let config = JobManagerConfig::default().with_workers(4).with_max_jobs(16);
/// assert_eq!(config.workers, 4);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct JobManagerConfig {
    /// Worker threads in the solve pool
    pub workers: usize,

    /// Largest number of jobs (running or awaiting retrieval) in the table
    pub max_jobs: usize,

    /// Limits passed to every solve
    pub solver: SolverConfiguration,
}

impl JobManagerConfig {
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_max_jobs(mut self, max_jobs: usize) -> Self {
        self.max_jobs = max_jobs;
        self
    }

    pub fn with_solver(mut self, solver: SolverConfiguration) -> Self {
        self.solver = solver;
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), JobError> {
        if self.workers == 0 {
            return Err(JobError::InvalidConfiguration("workers must be at least 1".to_string()));
        }
        if self.max_jobs == 0 {
            return Err(JobError::InvalidConfiguration("max_jobs must be at least 1".to_string()));
        }
        self.solver
            .validate()
            .map_err(|e| JobError::InvalidConfiguration(e.to_string()))
    }
}

impl Default for JobManagerConfig {
    fn default() -> Self {
        Self {
            workers: std::thread::available_parallelism().map_or(1, |n| n.get()),
            max_jobs: DEFAULT_MAX_JOBS,
            solver: SolverConfiguration::default(),
        }
    }
}

// =================================================================================================
// Tests
// =================================================================================================
