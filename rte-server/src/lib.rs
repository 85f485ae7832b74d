//! # RTE Server
//!
//! The server's coordination engine: task id allocation, the task queue,
//! the results table, the cancellation set, and the heartbeat-based
//! timeout subsystem.
//!
//! ## Modules
//!
//! - `server`: `Server`, `ClientInterface`, `WorkerInterface`, and the
//!   narrower `ClientHandle`/`WorkerHandle` views handed to each driver.

mod server;

pub use server::{ClientHandle, ClientInterface, Server, WorkerHandle, WorkerInterface};
