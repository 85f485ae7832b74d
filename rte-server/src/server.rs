/// The server's coordination engine.
///
/// `Server` owns the unassigned-id queue, the task queue, the results
/// table, the cancellation set, and a `MultiHeartbeatMonitor` keyed by
/// task id. It exposes two interface facets — [`ClientInterface`] and
/// [`WorkerInterface`] — through narrower handle types so each driver
/// only sees the methods relevant to its role, without duplicating any
/// state.
///
/// # Example
///
/// ```no_run
/// use rte_server::Server;
/// use rte_shared::config::ServerConfig;
///
/// # async fn example() {
/// let server = Server::new(ServerConfig::default());
/// let client = server.client_handle();
/// let worker = server.worker_handle();
/// # let _ = (client, worker);
/// # }
/// ```
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::{mpsc, Mutex as TokioMutex};
use tracing::{debug, warn};

use rte_shared::config::ServerConfig;
use rte_shared::heartbeat::MultiHeartbeatMonitor;
use rte_shared::idgen::IdGenerator;
use rte_shared::models::task::{Task, TaskResult};

/// The facet of the server a client peer talks to.
#[async_trait]
pub trait ClientInterface: Send + Sync {
    /// Dequeues one id from the unassigned-ids queue, or none if empty.
    async fn get_next_id(&self) -> Option<u64>;

    /// Pushes `id` back onto the unassigned-ids queue. The client MUST
    /// call this if it reserved an id but will not submit a task for it,
    /// or the corresponding blocked worker never wakes.
    async fn return_id(&self, id: u64);

    /// Enqueues `task` for delivery to a worker.
    async fn add_task(&self, task: Task);

    /// Removes and returns the stored result for each of `ids`, in
    /// order; `None` where no result is available yet. Each result is
    /// consumed at most once.
    async fn get_results(&self, ids: &[u64]) -> Vec<Option<TaskResult>>;

    /// Requests cancellation of an in-flight task. Tolerates unknown ids
    /// silently (protocol misuse).
    async fn cancel_task(&self, id: u64);
}

/// The facet of the server a worker peer talks to.
#[async_trait]
pub trait WorkerInterface: Send + Sync {
    /// Blocks until a task is available or the worker is released via
    /// `release_waiting_workers`, in which case it returns `None`.
    async fn get_task(&self) -> Option<Task>;

    /// Records the outcome of a task. Tolerates unknown ids silently.
    async fn set_result(&self, result: TaskResult);

    /// Checks and clears the pending-cancellation flag for `id` while
    /// simultaneously renewing its heartbeat. This dual effect is
    /// intentional and must not be split into two calls.
    async fn is_task_canceled(&self, id: u64) -> bool;
}

#[derive(Default)]
struct Inner {
    results: HashMap<u64, TaskResult>,
    canceled: HashSet<u64>,
}

/// The concrete coordination engine. See the module docs and the
/// workspace-level design notes for the full contract.
pub struct Server {
    unassigned_ids: Mutex<VecDeque<u64>>,
    reserved_ids: Mutex<HashSet<u64>>,
    task_tx: mpsc::UnboundedSender<Option<Task>>,
    task_rx: TokioMutex<mpsc::UnboundedReceiver<Option<Task>>>,
    inner: Arc<Mutex<Inner>>,
    monitor: MultiHeartbeatMonitor,
    id_gen: IdGenerator,
}

impl Server {
    /// Constructs a server with the given task-timeout threshold and
    /// starts its heartbeat supervisor immediately.
    pub fn new(config: ServerConfig) -> Arc<Self> {
        let inner = Arc::new(Mutex::new(Inner::default()));
        let death_inner = inner.clone();

        let monitor = MultiHeartbeatMonitor::new(config.task_timeout, move |id| {
            warn!(task_id = id, "task timed out");
            let mut guard = death_inner.lock().unwrap();
            guard.canceled.remove(&id);
            guard
                .results
                .entry(id)
                .or_insert_with(|| TaskResult::failure(id));
        });

        let (task_tx, task_rx) = mpsc::unbounded_channel();

        Arc::new(Server {
            unassigned_ids: Mutex::new(VecDeque::new()),
            reserved_ids: Mutex::new(HashSet::new()),
            task_tx,
            task_rx: TokioMutex::new(task_rx),
            inner,
            monitor,
            id_gen: IdGenerator::new(),
        })
    }

    /// Returns a handle exposing only [`ClientInterface`].
    pub fn client_handle(self: &Arc<Self>) -> ClientHandle {
        ClientHandle(self.clone())
    }

    /// Returns a handle exposing only [`WorkerInterface`].
    pub fn worker_handle(self: &Arc<Self>) -> WorkerHandle {
        WorkerHandle(self.clone())
    }

    /// Drains the unassigned-ids queue and pushes one nil sentinel into
    /// the task queue per drained id, waking every currently-blocked
    /// worker exactly once with `None`.
    pub async fn release_waiting_workers(&self) {
        let drained: Vec<u64> = {
            let mut queue = self.unassigned_ids.lock().unwrap();
            queue.drain(..).collect()
        };
        for _ in drained {
            let _ = self.task_tx.send(None);
        }
    }

    /// Stops the heartbeat supervisor. Does not release blocked workers
    /// — call `release_waiting_workers` separately for that.
    pub async fn stop(&self) {
        self.monitor.stop().await;
    }
}

#[async_trait]
impl ClientInterface for Server {
    async fn get_next_id(&self) -> Option<u64> {
        let id = self.unassigned_ids.lock().unwrap().pop_front()?;
        self.reserved_ids.lock().unwrap().insert(id);
        Some(id)
    }

    async fn return_id(&self, id: u64) {
        if !self.reserved_ids.lock().unwrap().remove(&id) {
            debug!(task_id = id, "return_id for an id that was not previously reserved");
        }
        self.unassigned_ids.lock().unwrap().push_front(id);
    }

    async fn add_task(&self, task: Task) {
        self.reserved_ids.lock().unwrap().remove(&task.id);
        let _ = self.task_tx.send(Some(task));
    }

    async fn get_results(&self, ids: &[u64]) -> Vec<Option<TaskResult>> {
        let mut inner = self.inner.lock().unwrap();
        ids.iter().map(|id| inner.results.remove(id)).collect()
    }

    async fn cancel_task(&self, id: u64) {
        self.monitor.remove(id).await;
        let mut inner = self.inner.lock().unwrap();
        if inner.results.contains_key(&id) {
            // The task already finished (and nothing will ever poll
            // `is_task_canceled` or call `set_result` for it again), so
            // marking it canceled here would never get cleaned up.
            debug!(task_id = id, "cancel_task for an id that already has a result");
            return;
        }
        inner.canceled.insert(id);
    }
}

#[async_trait]
impl WorkerInterface for Server {
    async fn get_task(&self) -> Option<Task> {
        let fresh_id = self.id_gen.next_id();
        self.unassigned_ids.lock().unwrap().push_back(fresh_id);

        let mut rx = self.task_rx.lock().await;
        let received = rx.recv().await;
        drop(rx);

        match received.flatten() {
            Some(task) => {
                self.monitor.add(task.id).await;
                Some(task)
            }
            None => None,
        }
    }

    async fn set_result(&self, result: TaskResult) {
        self.monitor.remove(result.task_id).await;
        let mut inner = self.inner.lock().unwrap();
        if inner.results.contains_key(&result.task_id) {
            // A timeout already synthesized a failure for this id before
            // this (late) result arrived. Ignore it — the safer of the
            // two documented options.
            debug!(task_id = result.task_id, "set_result for an id that already has a result");
            return;
        }
        inner.canceled.remove(&result.task_id);
        inner.results.insert(result.task_id, result);
    }

    async fn is_task_canceled(&self, id: u64) -> bool {
        self.monitor.beat(id).await;
        let mut inner = self.inner.lock().unwrap();
        inner.canceled.remove(&id)
    }
}

/// A narrow view of [`Server`] exposing only [`ClientInterface`], handed
/// to the client driver.
#[derive(Clone)]
pub struct ClientHandle(Arc<Server>);

#[async_trait]
impl ClientInterface for ClientHandle {
    async fn get_next_id(&self) -> Option<u64> {
        self.0.get_next_id().await
    }

    async fn return_id(&self, id: u64) {
        self.0.return_id(id).await
    }

    async fn add_task(&self, task: Task) {
        self.0.add_task(task).await
    }

    async fn get_results(&self, ids: &[u64]) -> Vec<Option<TaskResult>> {
        self.0.get_results(ids).await
    }

    async fn cancel_task(&self, id: u64) {
        self.0.cancel_task(id).await
    }
}

/// A narrow view of [`Server`] exposing only [`WorkerInterface`], handed
/// to the worker driver.
#[derive(Clone)]
pub struct WorkerHandle(Arc<Server>);

#[async_trait]
impl WorkerInterface for WorkerHandle {
    async fn get_task(&self) -> Option<Task> {
        self.0.get_task().await
    }

    async fn set_result(&self, result: TaskResult) {
        self.0.set_result(result).await
    }

    async fn is_task_canceled(&self, id: u64) -> bool {
        self.0.is_task_canceled(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn server_with_timeout(secs: u64) -> Arc<Server> {
        Server::new(ServerConfig {
            task_timeout: Duration::from_secs(secs),
        })
    }

    #[tokio::test]
    async fn get_next_id_empty_queue_returns_none() {
        let server = server_with_timeout(30);
        assert_eq!(server.get_next_id().await, None);
    }

    #[tokio::test]
    async fn return_id_makes_it_available_again() {
        let server = server_with_timeout(30);
        server.return_id(5).await;
        assert_eq!(server.get_next_id().await, Some(5));
    }

    #[tokio::test]
    async fn return_id_is_fifo_from_the_front() {
        let server = server_with_timeout(30);
        // simulate two workers advertising ids 0 and 1
        server.unassigned_ids.lock().unwrap().push_back(0);
        server.unassigned_ids.lock().unwrap().push_back(1);
        assert_eq!(server.get_next_id().await, Some(0));
        server.return_id(0).await;
        // the returned id is seen before the still-queued fresher one
        assert_eq!(server.get_next_id().await, Some(0));
        assert_eq!(server.get_next_id().await, Some(1));
    }

    #[tokio::test]
    async fn return_id_for_an_unreserved_id_still_makes_it_available() {
        let server = server_with_timeout(30);
        // id 7 was never handed out by get_next_id; protocol misuse, but
        // still tolerated.
        server.return_id(7).await;
        assert_eq!(server.get_next_id().await, Some(7));
    }

    #[tokio::test]
    async fn get_task_advertises_before_blocking() {
        let server = server_with_timeout(30);
        let server2 = server.clone();
        let handle = tokio::spawn(async move { server2.get_task().await });

        // give get_task a chance to push its advertised id
        tokio::time::sleep(Duration::from_millis(20)).await;
        let advertised = server.get_next_id().await;
        assert!(advertised.is_some());

        server.add_task(Task::new(advertised.unwrap(), b"hi".to_vec())).await;
        let task = handle.await.unwrap().unwrap();
        assert_eq!(task.data, b"hi");
    }

    #[tokio::test]
    async fn set_result_then_get_results_round_trips() {
        let server = server_with_timeout(30);
        server.get_next_id().await; // no-op, just exercising the path
        server.set_result(TaskResult::success(1, b"out".to_vec())).await;

        let results = server.get_results(&[1]).await;
        assert_eq!(results, vec![Some(TaskResult::success(1, b"out".to_vec()))]);
    }

    #[tokio::test]
    async fn get_results_consumes_exactly_once() {
        let server = server_with_timeout(30);
        server.set_result(TaskResult::success(1, b"out".to_vec())).await;

        assert!(server.get_results(&[1]).await[0].is_some());
        assert!(server.get_results(&[1]).await[0].is_none());
    }

    #[tokio::test]
    async fn cancel_then_is_task_canceled_reports_once() {
        let server = server_with_timeout(30);
        server.monitor.add(1).await;
        server.cancel_task(1).await;

        assert!(server.is_task_canceled(1).await);
        assert!(!server.is_task_canceled(1).await);
    }

    #[tokio::test]
    async fn cancel_task_after_result_already_delivered_does_not_leak() {
        let server = server_with_timeout(30);
        server.set_result(TaskResult::success(1, b"done".to_vec())).await;
        server.get_results(&[1]).await;

        server.cancel_task(1).await;

        assert!(server.inner.lock().unwrap().canceled.is_empty());
    }

    #[tokio::test]
    async fn is_task_canceled_renews_heartbeat() {
        let server = server_with_timeout(1);
        server.monitor.add(1).await;
        for _ in 0..3 {
            tokio::time::sleep(Duration::from_millis(400)).await;
            server.is_task_canceled(1).await;
        }
        assert!(server.monitor.is_alive(1).await);
        server.stop().await;
    }

    #[tokio::test]
    async fn release_waiting_workers_wakes_all_blocked_workers() {
        let server = server_with_timeout(30);
        let mut handles = Vec::new();
        for _ in 0..3 {
            let s = server.clone();
            handles.push(tokio::spawn(async move { s.get_task().await }));
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
        server.release_waiting_workers().await;

        for handle in handles {
            assert_eq!(handle.await.unwrap(), None);
        }
    }

    #[tokio::test]
    async fn dying_worker_times_out() {
        let server = server_with_timeout_ms(100);
        let id = server.id_gen.next_id();
        server.monitor.add(id).await;

        tokio::time::sleep(Duration::from_millis(250)).await;
        let results = server.get_results(&[id]).await;
        assert_eq!(results, vec![Some(TaskResult::failure(id))]);
        server.stop().await;
    }

    #[tokio::test]
    async fn late_set_result_after_timeout_is_ignored() {
        let server = server_with_timeout_ms(80);
        let id = server.id_gen.next_id();
        server.monitor.add(id).await;

        tokio::time::sleep(Duration::from_millis(200)).await;
        // worker finally checks in with a (late) success
        server.set_result(TaskResult::success(id, b"too-late".to_vec())).await;

        let results = server.get_results(&[id]).await;
        assert_eq!(results, vec![Some(TaskResult::failure(id))]);
        server.stop().await;
    }

    fn server_with_timeout_ms(ms: u64) -> Arc<Server> {
        Server::new(ServerConfig {
            task_timeout: Duration::from_millis(ms),
        })
    }
}
