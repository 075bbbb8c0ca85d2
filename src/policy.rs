use std::cmp::Ordering;

use crate::job::Job;

/// Scheduling policy selected once at [`crate::scheduler::Scheduler::new`].
///
/// "Lower priority number = higher precedence" is explicit and
/// intentional for `Pri` and `Ppri`; it is not a bug to double-check at
/// call sites.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Policy {
    /// First-come, first-served. Non-preemptive.
    Fcfs,
    /// Shortest job first. Non-preemptive.
    Sjf,
    /// Preemptive shortest job first.
    Psjf,
    /// Priority. Non-preemptive.
    Pri,
    /// Preemptive priority.
    Ppri,
    /// Round-robin.
    Rr,
}

impl Policy {
    /// Whether the ordered ready set's "a running job precedes a pending
    /// job" meta-rule applies for this policy. RR, PPRI, and PSJF omit it
    /// so a newly-arrived higher-precedence job can out-sort — and later
    /// evict — a running one.
    fn applies_running_job_rule(self) -> bool {
        !matches!(self, Policy::Rr | Policy::Ppri | Policy::Psjf)
    }

    /// Whether this policy preempts a running job in favor of a higher-
    /// precedence arrival, rather than only filling idle cores.
    pub fn is_preemptive(self) -> bool {
        matches!(self, Policy::Psjf | Policy::Ppri)
    }

    pub fn is_round_robin(self) -> bool {
        matches!(self, Policy::Rr)
    }

    /// Total-order comparison used both to keep the ready set sorted and
    /// to select a preemption victim. `Ordering::Less` means `a`
    /// precedes `b` (`a` has strictly higher precedence); `Ordering::Equal`
    /// means the two are equivalent and insertion order (FIFO) decides.
    pub fn compare(self, a: &Job, b: &Job) -> Ordering {
        if self.applies_running_job_rule() {
            match (a.is_running(), b.is_running()) {
                (true, false) => return Ordering::Less,
                (false, true) => return Ordering::Greater,
                _ => {}
            }
        }

        match self {
            Policy::Fcfs => a.arrival.cmp(&b.arrival),
            Policy::Sjf => a.remaining().cmp(&b.remaining()).then(a.arrival.cmp(&b.arrival)),
            Policy::Psjf => a.remaining().cmp(&b.remaining()).then(a.arrival.cmp(&b.arrival)),
            Policy::Pri => a.priority.cmp(&b.priority).then(a.arrival.cmp(&b.arrival)),
            Policy::Ppri => a.priority.cmp(&b.priority).then(a.arrival.cmp(&b.arrival)),
            // Every pair is "equal" so the set's stable, after-ties
            // insertion convention alone does the work: new arrivals
            // always land at the back, giving plain FIFO rotation.
            Policy::Rr => Ordering::Equal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job(id: u64, arrival: i64, burst: i64, priority: i64) -> Job {
        Job::new(id, arrival, burst, priority)
    }

    #[test]
    fn fcfs_orders_by_arrival() {
        let a = job(1, 0, 5, 0);
        let b = job(2, 1, 5, 0);
        assert_eq!(Policy::Fcfs.compare(&a, &b), Ordering::Less);
        assert_eq!(Policy::Fcfs.compare(&b, &a), Ordering::Greater);
    }

    #[test]
    fn sjf_breaks_ties_on_arrival() {
        let a = job(1, 5, 3, 0);
        let b = job(2, 1, 3, 0);
        assert_eq!(Policy::Sjf.compare(&a, &b), Ordering::Greater);
    }

    #[test]
    fn pri_lower_number_precedes() {
        let high = job(1, 0, 5, 1);
        let low = job(2, 1, 5, 5);
        assert_eq!(Policy::Pri.compare(&high, &low), Ordering::Less);
    }

    #[test]
    fn rr_treats_every_pair_as_equal() {
        let a = job(1, 0, 5, 0);
        let b = job(2, 1, 5, 0);
        assert_eq!(Policy::Rr.compare(&a, &b), Ordering::Equal);
        assert_eq!(Policy::Rr.compare(&b, &a), Ordering::Equal);
    }

    #[test]
    fn running_job_rule_applies_to_fcfs_sjf_pri() {
        let mut running = job(1, 10, 5, 9);
        running.core = Some(0);
        let pending = job(2, 0, 1, 0);
        assert_eq!(Policy::Fcfs.compare(&running, &pending), Ordering::Less);
        assert_eq!(Policy::Sjf.compare(&running, &pending), Ordering::Less);
        assert_eq!(Policy::Pri.compare(&running, &pending), Ordering::Less);
    }

    #[test]
    fn running_job_rule_is_omitted_for_psjf_ppri_rr() {
        let mut running = job(1, 10, 5, 9);
        running.core = Some(0);
        let pending = job(2, 0, 1, 0);
        assert_eq!(Policy::Psjf.compare(&running, &pending), Ordering::Greater);
        assert_eq!(Policy::Ppri.compare(&running, &pending), Ordering::Greater);
    }
}
