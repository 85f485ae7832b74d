/// The client driver loop.
///
/// Polling loop: attempt to reserve and submit a task, attempt to collect
/// results for all outstanding ids, sleep for `refresh_time` if neither
/// attempt made progress. Terminates when the handler's `is_finished`
/// holds.
///
/// The set of pending task ids is the driver's responsibility: it is
/// added-to on a successful submit and removed-from on a received
/// result — the handler never sees it directly.
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use rte_server::{ClientHandle, ClientInterface};
use rte_shared::config::DriverConfig;
use rte_shared::models::task::Task;

use crate::handler::ClientHandler;

pub struct ClientDriver<H: ClientHandler + 'static> {
    client: ClientHandle,
    handler: Arc<H>,
    config: DriverConfig,
    pending: Mutex<HashSet<u64>>,
}

impl<H: ClientHandler + 'static> ClientDriver<H> {
    pub fn new(client: ClientHandle, handler: Arc<H>, config: DriverConfig) -> Self {
        ClientDriver {
            client,
            handler,
            config,
            pending: Mutex::new(HashSet::new()),
        }
    }

    pub async fn run(&self) {
        while !self.handler.is_finished().await {
            let mut progressed = self.try_reserve_and_submit().await;
            progressed |= self.try_collect_results().await;

            if !progressed {
                tokio::time::sleep(self.config.refresh_time).await;
            }
        }
    }

    async fn try_reserve_and_submit(&self) -> bool {
        let id = match self.client.get_next_id().await {
            Some(id) => id,
            None => return false,
        };

        match self.handler.on_request(id).await {
            Some(data) => {
                self.client.add_task(Task::new(id, data)).await;
                self.pending.lock().unwrap().insert(id);
                true
            }
            None => {
                self.client.return_id(id).await;
                false
            }
        }
    }

    async fn try_collect_results(&self) -> bool {
        let outstanding: Vec<u64> = {
            let pending = self.pending.lock().unwrap();
            pending.iter().copied().collect()
        };
        if outstanding.is_empty() {
            return false;
        }

        let results = self.client.get_results(&outstanding).await;
        let mut progressed = false;
        for (id, result) in outstanding.into_iter().zip(results) {
            if let Some(result) = result {
                self.pending.lock().unwrap().remove(&id);
                self.handler.on_result(result).await;
                progressed = true;
            }
        }
        progressed
    }
}
