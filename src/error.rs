use thiserror::Error;

/// Conditions the simulator driver is contractually forbidden from
/// triggering. Every variant here corresponds to a violated precondition
/// documented on the public API in [`crate::scheduler`]; none of them are
/// recoverable, so callers never see a `Result` for these — see
/// [`fatal`].
#[derive(Debug, Error)]
pub enum ContractViolation {
    #[error("startup called twice without an intervening cleanup")]
    DoubleStartup,

    #[error("scheduler event received before startup")]
    NotStarted,

    #[error("core id {core} out of range for {num_cores} core(s)")]
    CoreOutOfRange { core: usize, num_cores: usize },

    #[error("quantum_expired on core {core}, which is idle")]
    QuantumOnIdleCore { core: usize },

    #[error("job_finished referenced unknown job id {job_id}")]
    UnknownJob { job_id: u64 },

    #[error("quantum_expired delivered to a scheduler not running the round-robin policy")]
    QuantumUnderNonRr,
}

/// Logs `violation` at error level and aborts the process.
///
/// Diagnostic then fatal: the simulator driver is assumed to uphold
/// every precondition, so a violation here means the caller has a bug,
/// not that this crate has a degraded path to fall back to.
pub fn fatal(violation: ContractViolation) -> ! {
    log::error!("{violation}");
    panic!("{violation}");
}
