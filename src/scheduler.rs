use std::cmp::Ordering;

use itertools::Itertools;

use crate::core_table::CoreTable;
use crate::error::{ContractViolation, fatal};
use crate::job::{Job, JobId, Time};
use crate::policy::Policy;
use crate::ready_set::OrderedReadySet;

/// Everything `startup` needs: the fixed core count and the policy
/// chosen for the lifetime of this simulation.
#[derive(Debug, Clone, Copy)]
pub struct SchedulerConfig {
    pub num_cores: usize,
    pub policy: Policy,
}

/// Owns every job, the core table, and the selected policy for one
/// simulation run. See [`crate`] for the free-function wrapper that
/// mirrors the simulator's plain-integer callback surface.
pub struct Scheduler {
    ready: OrderedReadySet<Job>,
    cores: CoreTable,
    policy: Policy,
}

impl Scheduler {
    pub fn new(config: SchedulerConfig) -> Self {
        assert!(config.num_cores > 0, "num_cores must be positive");
        let policy = config.policy;
        log::info!(
            "scheduler startup: {} core(s), policy {:?}",
            config.num_cores,
            policy
        );
        Self {
            ready: OrderedReadySet::new(move |a: &Job, b: &Job| policy.compare(a, b)),
            cores: CoreTable::new(config.num_cores),
            policy,
        }
    }

    pub fn num_cores(&self) -> usize {
        self.cores.len()
    }

    pub fn policy(&self) -> Policy {
        self.policy
    }

    fn check_core(&self, core: usize) {
        if core >= self.cores.len() {
            fatal(ContractViolation::CoreOutOfRange {
                core,
                num_cores: self.cores.len(),
            });
        }
    }

    fn job_index(&self, id: JobId) -> Option<usize> {
        self.ready.iter().position(|job| job.id == id)
    }

    // ---- time accounting ----

    fn update_running_time(job: &mut Job, now: Time) {
        if let Some(last) = job.last_dispatch {
            job.accumulated_run += now - last;
            job.last_dispatch = Some(now);
        }
    }

    fn update_first_dispatch(job: &mut Job, now: Time) {
        if job.first_dispatch_offset.is_none() {
            job.first_dispatch_offset = Some(now - job.arrival);
        }
    }

    fn update_time(&mut self, now: Time) {
        for job in self.ready.iter_mut() {
            if job.core.is_some() {
                Self::update_running_time(job, now);
                Self::update_first_dispatch(job, now);
            } else if job.finished && job.end == now {
                Self::update_running_time(job, now);
            }
        }
    }

    // ---- shared dispatch primitive ----

    /// Assigns the job at `index` to `core`, marking it as just started
    /// on that core. Shared by idle-core fill and preemptive replace.
    fn dispatch_to_core(&mut self, index: usize, core: usize, now: Time) {
        let job = self.ready.at_mut(index).expect("dispatch index in range");
        job.core = Some(core);
        job.last_dispatch = Some(now);
        let id = job.id;
        self.cores.assign(core, id);
        log::debug!("t={now}: job {id} dispatched to core {core}");
    }

    fn run_dispatch_strategy(&mut self, now: Time) {
        match self.policy {
            Policy::Fcfs | Policy::Sjf | Policy::Pri => self.fill_idle(now),
            Policy::Psjf | Policy::Ppri => self.preemptive_replace(now),
            Policy::Rr => self.fill_idle(now),
        }
    }

    /// Non-preemptive fill: while an idle core exists, scan front-to-back
    /// for the first pending job and assign it.
    fn fill_idle(&mut self, now: Time) {
        loop {
            let Some(core) = self.cores.lowest_idle() else {
                break;
            };
            let Some(index) = self.ready.iter().position(Job::is_pending) else {
                break;
            };
            self.dispatch_to_core(index, core, now);
        }
    }

    /// Preemptive replace, used by PSJF and PPRI.
    fn preemptive_replace(&mut self, now: Time) {
        let mut i = 0;
        while i < self.ready.size() {
            let is_pending = self.ready.at(i).map(Job::is_pending).unwrap_or(false);
            if !is_pending {
                i += 1;
                continue;
            }

            if let Some(core) = self.cores.lowest_idle() {
                self.dispatch_to_core(i, core, now);
                i += 1;
                continue;
            }

            let new_job = self.ready.at(i).expect("index in range").clone();
            let victim_index = (0..self.ready.size()).rev().find(|&j| {
                self.ready
                    .at(j)
                    .map(|candidate| {
                        candidate.is_running() && self.policy.compare(&new_job, candidate) != Ordering::Greater
                    })
                    .unwrap_or(false)
            });

            if let Some(victim_index) = victim_index {
                let victim_core = self
                    .ready
                    .at(victim_index)
                    .and_then(|victim| victim.core)
                    .expect("victim is running");

                let victim = self.ready.at_mut(victim_index).expect("victim index in range");
                Self::update_running_time(victim, now);
                victim.core = None;
                victim.last_dispatch = None;
                if victim.accumulated_run == 0 {
                    victim.first_dispatch_offset = None;
                }

                self.cores.release(victim_core);
                log::debug!(
                    "t={now}: job {} preempts job {} on core {victim_core}",
                    new_job.id,
                    victim_index
                );
                self.dispatch_to_core(i, victim_core, now);
            }

            i += 1;
        }
    }

    /// Round-robin rotation, used only from
    /// [`Scheduler::on_quantum_expired`].
    fn rr_rotate(&mut self, core: usize, running_id: JobId, now: Time) -> JobId {
        let current_index = self
            .job_index(running_id)
            .expect("running job must exist in the ready set");

        let other_eligible = self
            .ready
            .iter()
            .enumerate()
            .any(|(idx, job)| idx != current_index && job.is_pending());
        if !other_eligible {
            return running_id;
        }

        let mut rotated = self.ready.remove_at(current_index).expect("valid index");
        Self::update_running_time(&mut rotated, now);
        rotated.core = None;
        if rotated.accumulated_run == 0 {
            rotated.first_dispatch_offset = None;
        }
        self.cores.release(core);
        self.ready.insert(rotated);

        self.fill_idle(now);
        self.cores
            .get(core)
            .expect("fill_idle must have refilled the freed core")
    }

    // ---- event handlers ----

    /// Called when a new job arrives. Returns the core it was
    /// immediately dispatched to, if any.
    pub fn on_new_job(&mut self, id: JobId, now: Time, burst: Time, priority: i64) -> Option<usize> {
        let job = Job::new(id, now, burst, priority);
        let index = self.ready.insert(job);
        self.run_dispatch_strategy(now);
        self.update_time(now);
        self.ready.at(index).and_then(|job| job.core)
    }

    /// Called when a job completes execution on `core`. Returns the job
    /// now occupying `core`, if the dispatch strategy filled it.
    pub fn on_job_finished(&mut self, core: usize, id: JobId, now: Time) -> Option<JobId> {
        self.check_core(core);
        let Some(index) = self.job_index(id) else {
            fatal(ContractViolation::UnknownJob { job_id: id });
        };

        {
            let job = self.ready.at_mut(index).expect("index in range");
            job.end = now;
            job.finished = true;
            job.core = None;
            // Priority dampening: push a finished job's priority to the
            // bottom so preemptive-priority comparators never pick it as
            // an eviction victim on the next scan.
            job.priority = i64::MIN;
        }
        self.cores.release(core);

        self.run_dispatch_strategy(now);
        self.update_time(now);
        self.cores.get(core)
    }

    /// Called on RR quantum expiry for `core`. Only meaningful under the
    /// round-robin policy.
    pub fn on_quantum_expired(&mut self, core: usize, now: Time) -> Option<JobId> {
        self.check_core(core);
        if !self.policy.is_round_robin() {
            fatal(ContractViolation::QuantumUnderNonRr);
        }
        let Some(running_id) = self.cores.get(core) else {
            fatal(ContractViolation::QuantumOnIdleCore { core });
        };

        let result = self.rr_rotate(core, running_id, now);
        self.update_time(now);
        Some(result)
    }

    // ---- metric aggregation ----

    fn mean(&self, metric: impl Fn(&Job) -> Time) -> f64 {
        let n = self.ready.size();
        if n == 0 {
            return 0.0;
        }
        let total: Time = self.ready.iter().map(metric).sum();
        total as f64 / n as f64
    }

    pub fn avg_wait(&self) -> f64 {
        self.mean(Job::wait_time)
    }

    pub fn avg_turnaround(&self) -> f64 {
        self.mean(Job::turnaround_time)
    }

    pub fn avg_response(&self) -> f64 {
        self.mean(|job| job.first_dispatch_offset.unwrap_or(0))
    }

    /// Optional debug diagnostic; logs the ready set in current
    /// precedence order. The simulator owns stdout, so this never
    /// prints directly.
    pub fn show_queue(&self) {
        for (index, job) in self.ready.iter().enumerate() {
            log::debug!(
                "[{index}] job={} arrival={} burst={} priority={} core={:?} finished={}",
                job.id,
                job.arrival,
                job.burst,
                job.priority,
                job.core,
                job.finished
            );
        }
    }

    /// Ids of the jobs currently occupying a core, lowest core index
    /// first, formatted for a single log line.
    pub fn running_ids_summary(&self) -> String {
        self.ready
            .iter()
            .filter(|job| job.is_running())
            .sorted_by_key(|job| job.core)
            .map(|job| job.id.to_string())
            .join(", ")
    }

    /// Serializes every observed job (pending, running, or finished) to
    /// JSON for offline inspection or replay.
    pub fn jobs_snapshot_json(&self) -> serde_json::Result<String> {
        let jobs: Vec<&Job> = self.ready.iter().collect();
        serde_json::to_string_pretty(&jobs)
    }

    /// Releases all jobs. The last call made against a scheduler.
    pub fn cleanup(&mut self) {
        self.ready.destroy();
    }
}
