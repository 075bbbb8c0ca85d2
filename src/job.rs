use serde::{Deserialize, Serialize};

pub type JobId = u64;
pub type Time = i64;

/// A single process instance as tracked by the scheduler from its first
/// arrival through final metric aggregation. Jobs are never destroyed
/// mid-run — see [`crate::ready_set::OrderedReadySet`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Job {
    pub id: JobId,
    pub arrival: Time,
    pub burst: Time,
    pub priority: i64,
    pub accumulated_run: Time,
    pub last_dispatch: Option<Time>,
    pub first_dispatch_offset: Option<Time>,
    pub end: Time,
    pub finished: bool,
    pub core: Option<usize>,
}

impl Job {
    pub fn new(id: JobId, arrival: Time, burst: Time, priority: i64) -> Self {
        Self {
            id,
            arrival,
            burst,
            priority,
            accumulated_run: 0,
            last_dispatch: None,
            first_dispatch_offset: None,
            end: 0,
            finished: false,
            core: None,
        }
    }

    /// Remaining CPU time required before this job finishes.
    pub fn remaining(&self) -> Time {
        self.burst - self.accumulated_run
    }

    pub fn is_running(&self) -> bool {
        self.core.is_some()
    }

    /// Eligible to be dispatched: not finished, not already on a core.
    pub fn is_pending(&self) -> bool {
        !self.finished && self.core.is_none()
    }

    pub fn wait_time(&self) -> Time {
        (self.end - self.arrival) - self.burst
    }

    pub fn turnaround_time(&self) -> Time {
        self.end - self.arrival
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remaining_tracks_accumulated_run() {
        let mut job = Job::new(1, 0, 10, 0);
        assert_eq!(job.remaining(), 10);
        job.accumulated_run = 4;
        assert_eq!(job.remaining(), 6);
    }

    #[test]
    fn pending_requires_unfinished_and_unassigned() {
        let mut job = Job::new(1, 0, 5, 0);
        assert!(job.is_pending());
        job.core = Some(0);
        assert!(!job.is_pending());
        job.core = None;
        job.finished = true;
        assert!(!job.is_pending());
    }
}
