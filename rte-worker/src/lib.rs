//! # RTE Worker
//!
//! The worker driver: a loop that blocks for a task, runs a refresher
//! that both renews the server-side heartbeat and checks for
//! cancellation, executes the task via a user-supplied [`TaskExecutor`],
//! and submits the result.
//!
//! ## Modules
//!
//! - `executor`: the `TaskExecutor` trait
//! - `driver`: `WorkerDriver`, the loop itself
//! - `testing`: reference executors (`TrivialExecutor`, `FailingExecutor`,
//!   `CancellableExecutor`) used across this workspace's integration tests

mod driver;
mod executor;
pub mod testing;

pub use driver::WorkerDriver;
pub use executor::TaskExecutor;
