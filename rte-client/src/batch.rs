/// The canonical [`ClientHandler`]: submit a fixed batch of inputs, collect
/// one output per input, and finish once every output has arrived.
///
/// Inputs are handed out in order via a running index rather than up
/// front, so a reserved id is only ever mapped to an input once the
/// server actually asks for one.
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use rte_server::ClientHandle;
use rte_shared::config::DriverConfig;
use rte_shared::models::task::TaskResult;

use crate::driver::ClientDriver;
use crate::handler::ClientHandler;

struct BatchState {
    inputs: Vec<Vec<u8>>,
    id_to_index: Mutex<HashMap<u64, usize>>,
    next_index: AtomicUsize,
    outputs: Mutex<Vec<Option<Vec<u8>>>>,
    remaining: AtomicUsize,
}

struct BatchHandler {
    state: BatchState,
}

#[async_trait]
impl ClientHandler for BatchHandler {
    async fn on_request(&self, task_id: u64) -> Option<Vec<u8>> {
        let index = self.state.next_index.fetch_add(1, Ordering::SeqCst);
        if index >= self.state.inputs.len() {
            self.state.next_index.store(self.state.inputs.len(), Ordering::SeqCst);
            return None;
        }
        self.state.id_to_index.lock().unwrap().insert(task_id, index);
        Some(self.state.inputs[index].clone())
    }

    async fn on_result(&self, result: TaskResult) {
        let index = match self.state.id_to_index.lock().unwrap().remove(&result.task_id) {
            Some(index) => index,
            None => return,
        };
        let output = if result.success { Some(result.data) } else { None };
        self.state.outputs.lock().unwrap()[index] = output;
        self.state.remaining.fetch_sub(1, Ordering::SeqCst);
    }

    async fn is_finished(&self) -> bool {
        self.state.remaining.load(Ordering::SeqCst) == 0
    }
}

/// Drives a [`ClientDriver`] over a [`BatchHandler`] to completion and
/// returns one slot per input: `Some(data)` on success, `None` on
/// failure or timeout.
pub struct BatchClient;

impl BatchClient {
    pub async fn solve(
        inputs: Vec<Vec<u8>>,
        client: ClientHandle,
        config: DriverConfig,
    ) -> Vec<Option<Vec<u8>>> {
        let count = inputs.len();
        let state = BatchState {
            inputs,
            id_to_index: Mutex::new(HashMap::new()),
            next_index: AtomicUsize::new(0),
            outputs: Mutex::new(vec![None; count]),
            remaining: AtomicUsize::new(count),
        };
        let handler = Arc::new(BatchHandler { state });
        let driver = ClientDriver::new(client, handler.clone(), config);
        driver.run().await;
        let outputs = handler.state.outputs.lock().unwrap().clone();
        outputs
    }
}
