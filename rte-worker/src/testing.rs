/// Reference [`TaskExecutor`] implementations used by this crate's own
/// tests and by integration tests in `rte-client`. Kept public rather
/// than `#[cfg(test)]`-gated so other crates in the workspace can drive
/// real end-to-end scenarios against them.
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::executor::TaskExecutor;

/// Echoes its input back unchanged.
pub struct TrivialExecutor;

#[async_trait]
impl TaskExecutor for TrivialExecutor {
    async fn execute_task(
        &self,
        data: &[u8],
        _cancel: &CancellationToken,
    ) -> anyhow::Result<Vec<u8>> {
        Ok(data.to_vec())
    }
}

/// Always fails, regardless of input.
pub struct FailingExecutor;

#[async_trait]
impl TaskExecutor for FailingExecutor {
    async fn execute_task(
        &self,
        _data: &[u8],
        _cancel: &CancellationToken,
    ) -> anyhow::Result<Vec<u8>> {
        anyhow::bail!("simulated execution failure")
    }
}

/// Sleeps for `duration`, polling the cancellation token in small
/// increments, and fails if canceled before the sleep elapses. Tracks
/// whether `on_cancel` fired in `canceled`, so tests can assert on it.
pub struct CancellableExecutor {
    duration: Duration,
    canceled: Arc<AtomicBool>,
}

impl CancellableExecutor {
    pub fn new(duration: Duration) -> Self {
        CancellableExecutor {
            duration,
            canceled: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn was_canceled(&self) -> bool {
        self.canceled.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TaskExecutor for CancellableExecutor {
    async fn execute_task(
        &self,
        _data: &[u8],
        cancel: &CancellationToken,
    ) -> anyhow::Result<Vec<u8>> {
        let step = Duration::from_millis(10);
        let mut elapsed = Duration::ZERO;
        while elapsed < self.duration {
            if cancel.is_cancelled() {
                anyhow::bail!("canceled");
            }
            tokio::time::sleep(step).await;
            elapsed += step;
        }
        Ok(Vec::new())
    }

    async fn on_cancel(&self) {
        self.canceled.store(true, Ordering::SeqCst);
    }
}
