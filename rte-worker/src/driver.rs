/// The worker driver loop.
///
/// `WorkerDriver::run` repeatedly calls `get_task` (which blocks), spawns
/// a refresher [`Heart`] that doubles as the heartbeat-renewal and
/// cancellation-check point, executes the task via a user-supplied
/// [`TaskExecutor`], and submits the result.
///
/// # Example
///
/// ```no_run
/// use rte_worker::{TaskExecutor, WorkerDriver};
/// use rte_server::Server;
/// use rte_shared::config::{DriverConfig, ServerConfig};
/// use async_trait::async_trait;
/// use tokio_util::sync::CancellationToken;
/// use std::sync::Arc;
///
/// struct Echo;
///
/// #[async_trait]
/// impl TaskExecutor for Echo {
///     async fn execute_task(&self, data: &[u8], _cancel: &CancellationToken) -> anyhow::Result<Vec<u8>> {
///         Ok(data.to_vec())
///     }
/// }
///
/// # async fn example() {
/// let server = Server::new(ServerConfig::default());
/// let driver = WorkerDriver::new(server.worker_handle(), Arc::new(Echo), DriverConfig::default());
/// // driver.run().await; // blocks until the server releases this worker
/// # let _ = driver;
/// # }
/// ```
use std::sync::Arc;

use rte_server::{WorkerHandle, WorkerInterface};
use rte_shared::config::DriverConfig;
use rte_shared::heartbeat::Heart;
use rte_shared::models::task::{Task, TaskResult};
use tokio_util::sync::CancellationToken;

use crate::executor::TaskExecutor;

/// Drives a single worker's lifecycle against a [`WorkerHandle`].
pub struct WorkerDriver<E: TaskExecutor + 'static> {
    worker: WorkerHandle,
    executor: Arc<E>,
    config: DriverConfig,
    max_tasks: Option<u64>,
}

impl<E: TaskExecutor + 'static> WorkerDriver<E> {
    pub fn new(worker: WorkerHandle, executor: Arc<E>, config: DriverConfig) -> Self {
        WorkerDriver {
            worker,
            executor,
            config,
            max_tasks: None,
        }
    }

    /// Bounds the number of tasks this driver will execute before
    /// exiting voluntarily, instead of calling `get_task` again.
    pub fn with_max_tasks(mut self, max_tasks: u64) -> Self {
        self.max_tasks = Some(max_tasks);
        self
    }

    /// Runs until `get_task` returns `None` (the worker was released) or
    /// the task-count budget, if any, is exhausted.
    pub async fn run(&self) {
        let mut completed: u64 = 0;
        loop {
            if let Some(max) = self.max_tasks {
                if completed >= max {
                    break;
                }
            }

            let task = match self.worker.get_task().await {
                Some(task) => task,
                None => break,
            };

            self.run_one(task).await;
            completed += 1;
        }
    }

    async fn run_one(&self, task: Task) {
        let task_id = task.id;
        let cancel_token = CancellationToken::new();

        let worker_for_heart = self.worker.clone();
        let executor_for_heart = self.executor.clone();
        let cancel_token_for_heart = cancel_token.clone();

        let refresher = Heart::spawn(self.config.refresh_time, move || {
            let worker = worker_for_heart.clone();
            let executor = executor_for_heart.clone();
            let cancel_token = cancel_token_for_heart.clone();
            async move {
                if cancel_token.is_cancelled() {
                    return;
                }
                if worker.is_task_canceled(task_id).await {
                    cancel_token.cancel();
                    executor.on_cancel().await;
                }
            }
        });

        let result = match self.executor.execute_task(&task.data, &cancel_token).await {
            Ok(output) => TaskResult::success(task_id, output),
            Err(err) => {
                tracing::warn!(task_id, error = %err, "task execution failed");
                TaskResult::failure(task_id)
            }
        };

        refresher.stop().await;
        self.worker.set_result(result).await;
    }
}
