/// Task and Result models
///
/// Tasks are opaque byte-string payloads tagged with a server-assigned,
/// globally unique id. The server does not interpret `data`; it is handed
/// unchanged to whichever worker dequeues the task and echoed back (on
/// success) as part of the matching `TaskResult`.
///
/// # State Machine
///
/// ```text
/// AVAILABLE ──get_next_id──► RESERVED ──add_task──► QUEUED
///     ▲                                                │ get_task
///     └──────────────────return_id────────────────────┤
///                                                       ▼
///                                                    RUNNING
///                                        ┌───────────┬────┴────┬──────────┐
///                                  set_result   cancel_task  timeout   (none)
///                                        ▼             ▼         ▼
///                                      DONE         CANCELED   DONE(failure)
/// ```
use serde::{Deserialize, Serialize};

/// A unit of work submitted by a client.
///
/// `id` is minted by the server's id generator and is never reused.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: u64,
    pub data: Vec<u8>,
}

impl Task {
    pub fn new(id: u64, data: impl Into<Vec<u8>>) -> Self {
        Task {
            id,
            data: data.into(),
        }
    }
}

/// The outcome of executing a `Task`.
///
/// On failure, `data` is always empty — there is no partial-output channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskResult {
    pub task_id: u64,
    pub success: bool,
    pub data: Vec<u8>,
}

impl TaskResult {
    /// Builds a successful result carrying the worker's output.
    pub fn success(task_id: u64, data: impl Into<Vec<u8>>) -> Self {
        TaskResult {
            task_id,
            success: true,
            data: data.into(),
        }
    }

    /// Builds a failed result. Used both for `execute_task` failures and
    /// for synthesized heartbeat-timeout failures; the two are
    /// indistinguishable at this layer by design (see error taxonomy).
    pub fn failure(task_id: u64) -> Self {
        TaskResult {
            task_id,
            success: false,
            data: Vec::new(),
        }
    }
}
