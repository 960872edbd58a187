//! Job table and worker pool

use std::any::Any;
use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, OnceLock};
use std::time::{Duration, Instant};

use log::{error, info, warn};
use parking_lot::RwLock;
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::equation::{Equation, EquationFamily, RawParams, Solution};
use crate::error::JobError;
use crate::jobs::{JobId, JobManagerConfig, JobStatus};
use crate::solver::{EquationSolver, SolverConfiguration};

/// Interval between two status polls in [`JobManager::wait`]
const POLL_INTERVAL: Duration = Duration::from_millis(2);

/// Outcome written once by the worker: the solution or a failure description
type Outcome = Result<Solution, String>;

/// One entry of the job table
#[derive(Debug)]
struct JobSlot {
    family: EquationFamily,
    outcome: OnceLock<Outcome>,
}

impl JobSlot {
    fn new(family: EquationFamily) -> Self {
        Self {
            family,
            outcome: OnceLock::new(),
        }
    }

    fn status(&self) -> JobStatus {
        match self.outcome.get() {
            None => JobStatus::Running,
            Some(Ok(_)) => JobStatus::Succeeded,
            Some(Err(_)) => JobStatus::Failed,
        }
    }
}

/// Runs solves on a worker pool and hands results out exactly once.
///
/// All methods take `&self`; share the manager between threads with an `Arc`.
pub struct JobManager {
    config: JobManagerConfig,
    pool: ThreadPool,
    jobs: RwLock<HashMap<JobId, Arc<JobSlot>>>,
}

impl JobManager {
    /// Build a manager and its worker pool
    pub fn new(config: JobManagerConfig) -> Result<Self, JobError> {
        config.validate()?;

        let pool = ThreadPoolBuilder::new()
            .num_threads(config.workers)
            .thread_name(|index| format!("deq-worker-{index}"))
            .build()
            .map_err(|e| JobError::InvalidConfiguration(e.to_string()))?;

        info!(
            "job manager started: workers={}, max_jobs={}",
            config.workers, config.max_jobs
        );

        Ok(Self {
            config,
            pool,
            jobs: RwLock::new(HashMap::new()),
        })
    }

    pub fn config(&self) -> &JobManagerConfig {
        &self.config
    }

    // ============================================ Submission ============================================

    /// Parse `params` as an equation of family `tag` and schedule its solve.
    ///
    /// Returns as soon as the job is recorded as Running. Unknown tags and
    /// invalid parameters are reported here, never by a worker.
    pub fn submit(&self, tag: &str, params: &RawParams) -> Result<JobId, JobError> {
        let (solver, equation) = Self::parse(tag, params)?;
        self.schedule(None, solver, equation)
    }

    /// Like [`submit`](Self::submit), with a caller-chosen identifier.
    ///
    /// Fails with [`JobError::IdentifierCollision`] when `id` is already held.
    pub fn submit_with_id(&self, id: impl Into<JobId>, tag: &str, params: &RawParams) -> Result<JobId, JobError> {
        let (solver, equation) = Self::parse(tag, params)?;
        self.schedule(Some(id.into()), solver, equation)
    }

    fn parse(tag: &str, params: &RawParams) -> Result<(&'static dyn EquationSolver, Equation), JobError> {
        let parsed = tag
            .parse::<EquationFamily>()
            .and_then(|family| {
                let solver = family.solver();
                solver.parse(params).map(|equation| (solver, equation))
            });

        parsed.map_err(|e| {
            warn!("rejected '{}' request: {}", tag, e);
            JobError::from(e)
        })
    }

    /// Record a Running job and hand its solve to the pool.
    pub(crate) fn schedule(
        &self,
        id: Option<JobId>,
        solver: &'static dyn EquationSolver,
        equation: Equation,
    ) -> Result<JobId, JobError> {
        let slot = Arc::new(JobSlot::new(equation.family()));

        let id = {
            let mut jobs = self.jobs.write();

            if jobs.len() >= self.config.max_jobs {
                warn!("job table full ({} jobs), rejecting submission", jobs.len());
                return Err(JobError::CapacityExhausted {
                    limit: self.config.max_jobs,
                });
            }

            let id = match id {
                Some(id) if jobs.contains_key(&id) => {
                    warn!("job identifier {} is already in use", id);
                    return Err(JobError::IdentifierCollision { id: id.to_string() });
                }
                Some(id) => id,
                None => loop {
                    let candidate = JobId::generate();
                    if !jobs.contains_key(&candidate) {
                        break candidate;
                    }
                },
            };

            jobs.insert(id.clone(), Arc::clone(&slot));
            id
        };

        info!("job {} submitted ({})", id, slot.family);

        let config = self.config.solver.clone();
        let job = id.clone();
        self.pool.spawn(move || {
            let outcome = run_solve(solver, &equation, &config);
            match &outcome {
                Ok(_) => info!("job {} succeeded", job),
                Err(reason) => warn!("job {} failed: {}", job, reason),
            }
            // Only this closure ever writes the slot.
            let _ = slot.outcome.set(outcome);
        });

        Ok(id)
    }

    // ============================================ Queries ============================================

    /// Current status of `id`; Unknown for ids never submitted or already retrieved.
    pub fn status(&self, id: &str) -> JobStatus {
        self.jobs
            .read()
            .get(id)
            .map_or(JobStatus::Unknown, |slot| slot.status())
    }

    /// Take the result of a finished job.
    ///
    /// The job is removed on success *and* on failure; a second call returns
    /// [`JobError::MissingSolution`].
    pub fn result(&self, id: &str) -> Result<Solution, JobError> {
        let slot = {
            let mut jobs = self.jobs.write();
            match jobs.get(id).map(|slot| slot.status()) {
                None => return Err(JobError::MissingSolution { id: id.to_string() }),
                Some(JobStatus::Running) => return Err(JobError::CalculationNotDone { id: id.to_string() }),
                Some(_) => {}
            }
            jobs.remove(id)
                .ok_or_else(|| JobError::MissingSolution { id: id.to_string() })?
        };

        // The worker may still hold its clone for a moment after writing.
        let outcome = match Arc::try_unwrap(slot) {
            Ok(slot) => slot.outcome.into_inner(),
            Err(shared) => shared.outcome.get().cloned(),
        };

        match outcome {
            Some(Ok(solution)) => Ok(solution),
            Some(Err(reason)) => Err(JobError::SolveFailure {
                id: id.to_string(),
                reason,
            }),
            None => Err(JobError::CalculationNotDone { id: id.to_string() }),
        }
    }

    /// Poll until `id` reaches a terminal state or `timeout` elapses.
    ///
    /// Returns the last observed status. Never consumes the job.
    pub fn wait(&self, id: &str, timeout: Duration) -> JobStatus {
        let deadline = Instant::now() + timeout;
        loop {
            let status = self.status(id);
            if status != JobStatus::Running || Instant::now() >= deadline {
                return status;
            }
            std::thread::sleep(POLL_INTERVAL);
        }
    }

    /// Snapshot of every held job, ordered by identifier
    pub fn jobs(&self) -> Vec<(JobId, JobStatus)> {
        let mut jobs: Vec<_> = self
            .jobs
            .read()
            .iter()
            .map(|(id, slot)| (id.clone(), slot.status()))
            .collect();
        jobs.sort_by(|a, b| a.0.cmp(&b.0));
        jobs
    }

    /// Number of jobs held (running or awaiting retrieval)
    pub fn len(&self) -> usize {
        self.jobs.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.read().is_empty()
    }

    /// Parse and solve on the calling thread, bypassing the job table.
    pub fn solve_now(&self, tag: &str, params: &RawParams) -> Result<Solution, JobError> {
        let (solver, equation) = Self::parse(tag, params)?;
        Ok(solver.solve(&equation, &self.config.solver)?)
    }
}

impl std::fmt::Debug for JobManager {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("JobManager")
            .field("config", &self.config)
            .field("jobs", &self.len())
            .finish()
    }
}

// =================================================================================================
// Worker side
// =================================================================================================

/// Solve, turning both errors and panics into a failure description.
fn run_solve(
    solver: &'static dyn EquationSolver,
    equation: &Equation,
    config: &SolverConfiguration,
) -> Outcome {
    match panic::catch_unwind(AssertUnwindSafe(|| solver.solve(equation, config))) {
        Ok(Ok(solution)) => Ok(solution),
        Ok(Err(e)) => Err(e.to_string()),
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            error!("{} panicked: {}", solver.name(), message);
            Err(format!("solver panicked: {message}"))
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

// =================================================================================================
// Tests
// =================================================================================================
