/// The worker driver's user-provided behavior.
///
/// Implementers override `execute_task` (the actual work) and, optionally,
/// `on_cancel` (a hook invoked once when the driver observes a
/// cancellation while the task is still running). In a statically-typed
/// target this is exposed as a trait injected at construction rather than
/// via inheritance, matching the polymorphism-over-handlers design note.
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

/// Executes a single task's payload and optionally reacts to
/// cancellation.
#[async_trait]
pub trait TaskExecutor: Send + Sync {
    /// Runs the task. `cancel` is canceled exactly once, the moment the
    /// driver's refresher observes `is_task_canceled() == true`;
    /// implementations that can observe it mid-flight (e.g. by polling
    /// `cancel.is_cancelled()` between work units) should stop promptly.
    /// Execution is otherwise free to run to completion or its own error
    /// exit — the driver does not forcibly abort the future.
    async fn execute_task(
        &self,
        data: &[u8],
        cancel: &CancellationToken,
    ) -> anyhow::Result<Vec<u8>>;

    /// Invoked once, from the refresher, the moment cancellation is
    /// observed. The default implementation does nothing; most
    /// implementers will set a flag here that `execute_task` checks.
    async fn on_cancel(&self) {}
}
