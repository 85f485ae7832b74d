//! # RTE Client
//!
//! The client driver: a loop that reserves ids, hands them to a
//! user-supplied [`ClientHandler`] for either a task payload or a
//! decline, submits tasks, and polls for results until the handler
//! reports it is finished.
//!
//! ## Modules
//!
//! - `handler`: the `ClientHandler` trait
//! - `driver`: `ClientDriver`, the loop itself
//! - `batch`: `BatchClient`, the canonical fixed-batch handler

mod batch;
mod driver;
mod handler;

pub use batch::BatchClient;
pub use driver::ClientDriver;
pub use handler::ClientHandler;
