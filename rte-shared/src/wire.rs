/// Wire-protocol contract types.
///
/// The transport layer itself — a thin RPC stub forwarding each
/// `ClientInterface`/`WorkerInterface` method across a network one-to-one —
/// is out of scope for this workspace. These types document the request
/// and response shapes such a transport would serialize; nothing here
/// binds a socket or dispatches a call.
///
/// A hypothetical transport's worker-pool size is deliberately bounded
/// rather than left unbounded (see `RPC_EXECUTOR_CAPACITY`) — an
/// unbounded executor accepting one thread/task per in-flight RPC would
/// let a burst of blocked `GetTask` calls exhaust the transport's
/// resources.
use serde::{Deserialize, Serialize};

use crate::models::task::{Task, TaskResult};

/// Recommended upper bound on concurrent in-flight RPCs for a transport
/// built on these types. Not enforced by anything in this workspace.
pub const RPC_EXECUTOR_CAPACITY: usize = 1024;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetNextIdResponse {
    pub id: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReturnIdRequest {
    pub id: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddTaskRequest {
    pub id: u64,
    pub data: Vec<u8>,
}

impl From<AddTaskRequest> for Task {
    fn from(req: AddTaskRequest) -> Self {
        Task::new(req.id, req.data)
    }
}

impl From<Task> for AddTaskRequest {
    fn from(task: Task) -> Self {
        AddTaskRequest {
            id: task.id,
            data: task.data,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetTaskResponse {
    pub task: Option<AddTaskRequest>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetResultRequest {
    pub task_id: u64,
    pub success: bool,
    pub data: Vec<u8>,
}

impl From<TaskResult> for SetResultRequest {
    fn from(result: TaskResult) -> Self {
        SetResultRequest {
            task_id: result.task_id,
            success: result.success,
            data: result.data,
        }
    }
}

impl From<SetResultRequest> for TaskResult {
    fn from(req: SetResultRequest) -> Self {
        TaskResult {
            task_id: req.task_id,
            success: req.success,
            data: req.data,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetResultsRequest {
    pub ids: Vec<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetResultsResponse {
    pub results: Vec<Option<SetResultRequest>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancelTaskRequest {
    pub id: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IsTaskCanceledRequest {
    pub id: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IsTaskCanceledResponse {
    pub canceled: bool,
}
