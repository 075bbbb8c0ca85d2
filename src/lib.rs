//! Multi-policy discrete-event CPU scheduler simulation library.
//!
//! This crate decides which jobs occupy which of a fixed set of
//! identical cores under a selected scheduling policy, in response to
//! discrete events (new arrival, completion, quantum expiry) delivered
//! by an external simulator driver. It also accumulates per-job timing
//! metrics and reports averages at end-of-run.
//!
//! [`Scheduler`] is the primary, directly-testable surface. The
//! free functions in this module (`startup`, `new_job`, `job_finished`,
//! `quantum_expired`, `avg_wait`, `avg_turnaround`, `avg_response`,
//! `cleanup`, `show_queue`) mirror that surface exactly for drivers
//! built around the plain-integer callback shape this system was
//! originally specified with.

pub mod core_table;
pub mod error;
pub mod job;
pub mod policy;
pub mod ready_set;
pub mod scheduler;

pub use core_table::CoreTable;
pub use error::ContractViolation;
pub use job::{Job, JobId, Time};
pub use policy::Policy;
pub use ready_set::OrderedReadySet;
pub use scheduler::{Scheduler, SchedulerConfig};

use std::sync::Mutex;

use once_cell::sync::OnceCell;

/// Process-wide scheduler instance backing the free-function API below.
///
/// This crate runs a single simulation per process with a
/// single-init/single-destroy lifecycle; the `Mutex` exists only so the
/// static is `Send + Sync` for the functions below to share, not as a
/// concurrency mechanism — the simulator drives every call sequentially.
static GLOBAL: OnceCell<Mutex<Option<Scheduler>>> = OnceCell::new();

fn global() -> &'static Mutex<Option<Scheduler>> {
    GLOBAL.get_or_init(|| Mutex::new(None))
}

/// Initializes the process-wide scheduler. Must be called exactly once,
/// before any other function in this module. Calling it twice without
/// an intervening [`cleanup`] is a contract violation.
pub fn startup(num_cores: usize, policy: Policy) {
    let mut slot = global().lock().expect("scheduler mutex poisoned");
    if slot.is_some() {
        error::fatal(ContractViolation::DoubleStartup);
    }
    *slot = Some(Scheduler::new(SchedulerConfig { num_cores, policy }));
}

fn with_scheduler<R>(f: impl FnOnce(&mut Scheduler) -> R) -> R {
    let mut slot = global().lock().expect("scheduler mutex poisoned");
    match slot.as_mut() {
        Some(scheduler) => f(scheduler),
        None => error::fatal(ContractViolation::NotStarted),
    }
}

/// Called when a new job arrives. Returns the core id it was
/// immediately dispatched to, or `-1` if it was not.
pub fn new_job(job_id: JobId, now: Time, burst: Time, priority: i64) -> i64 {
    with_scheduler(|scheduler| {
        scheduler
            .on_new_job(job_id, now, burst, priority)
            .map(|core| core as i64)
            .unwrap_or(-1)
    })
}

/// Called when a job completes execution on `core_id`. Returns the job
/// id now occupying `core_id`, or `-1` if it remains idle.
pub fn job_finished(core_id: usize, job_id: JobId, now: Time) -> i64 {
    with_scheduler(|scheduler| {
        scheduler
            .on_job_finished(core_id, job_id, now)
            .map(|id| id as i64)
            .unwrap_or(-1)
    })
}

/// Called on RR quantum expiry for `core_id`. Returns the job id now
/// occupying `core_id`, or `-1` if it remains idle. Only meaningful
/// under the round-robin policy.
pub fn quantum_expired(core_id: usize, now: Time) -> i64 {
    with_scheduler(|scheduler| {
        scheduler
            .on_quantum_expired(core_id, now)
            .map(|id| id as i64)
            .unwrap_or(-1)
    })
}

/// Average waiting time across every job observed this run. Only
/// meaningful after all events have been delivered.
pub fn avg_wait() -> f64 {
    with_scheduler(Scheduler::avg_wait)
}

/// Average turnaround time across every job observed this run.
pub fn avg_turnaround() -> f64 {
    with_scheduler(Scheduler::avg_turnaround)
}

/// Average response time across every job observed this run.
pub fn avg_response() -> f64 {
    with_scheduler(Scheduler::avg_response)
}

/// Optional debug diagnostic; logs the ready set. Never prints to
/// stdout, since the simulator owns it.
pub fn show_queue() {
    with_scheduler(Scheduler::show_queue);
}

/// Releases the process-wide scheduler. Must be the last call made.
pub fn cleanup() {
    let mut slot = global().lock().expect("scheduler mutex poisoned");
    if let Some(scheduler) = slot.as_mut() {
        scheduler.cleanup();
    }
    *slot = None;
}
