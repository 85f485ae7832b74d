/// Error taxonomy for the RTE core.
///
/// The core itself is mostly infallible at the interface boundary — see
/// the contract table in the server core design for which operations can
/// fail at all. `RteError` exists for the few things that genuinely can go
/// wrong (a not-yet-implemented transport, malformed configuration) and to
/// give a future transport crate a stable set of variants to map its own
/// failures onto.
use thiserror::Error;

/// Errors a driver loop or transport layer can surface.
///
/// Most server operations are non-blocking and do not return `Result` at
/// all (see `rte_server::ClientInterface` / `WorkerInterface`); protocol
/// misuse (e.g. `set_result` for an unknown id) is tolerated silently
/// rather than raised here.
#[derive(Debug, Error)]
pub enum RteError {
    /// User code failed during `execute_task`. Never reaches a caller
    /// of the public interfaces — the worker driver catches it and
    /// converts it into a failed `TaskResult` instead.
    #[error("task execution failed: {0}")]
    TaskExecutionFailure(String),

    /// The heartbeat supervisor judged a task's worker dead. Synthesized
    /// into a failed `TaskResult`, indistinguishable from
    /// `TaskExecutionFailure` once it reaches the results table.
    #[error("task {0} timed out")]
    TaskTimeout(u64),

    /// A hypothetical RPC transport failed to deliver a call. No
    /// transport ships in this workspace; this variant exists so one
    /// can be added later without changing the error type callers match
    /// on.
    #[error("transport failure: {0}")]
    TransportFailure(String),
}

pub type RteResult<T> = Result<T, RteError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_execution_failure_display() {
        let err = RteError::TaskExecutionFailure("boom".to_string());
        assert_eq!(err.to_string(), "task execution failed: boom");
    }

    #[test]
    fn task_timeout_display() {
        let err = RteError::TaskTimeout(42);
        assert_eq!(err.to_string(), "task 42 timed out");
    }
}
