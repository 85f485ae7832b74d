/// The client driver's user-provided behavior.
///
/// Implementers override all three methods. In a statically-typed target
/// this is exposed as a trait injected at construction rather than via
/// inheritance, matching the polymorphism-over-handlers design note.
use async_trait::async_trait;
use rte_shared::models::task::TaskResult;

#[async_trait]
pub trait ClientHandler: Send + Sync {
    /// Given a reserved id, produce a task payload or decline (returning
    /// `None`, which the driver turns into a `return_id`).
    async fn on_request(&self, task_id: u64) -> Option<Vec<u8>>;

    /// Delivers a completed result.
    async fn on_result(&self, result: TaskResult);

    /// Termination predicate, checked at the top of every loop iteration.
    async fn is_finished(&self) -> bool;
}
