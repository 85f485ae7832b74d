//! In-process liveness tracking.
//!
//! Three cooperating abstractions:
//!
//! - [`Heart`]: an active periodic ticker. Invokes a callback every period
//!   until stopped.
//! - `HeartbeatToken`: a passive timestamp token. `beat()` refreshes it,
//!   `is_alive()` checks whether it has aged past its threshold.
//! - [`MultiHeartbeatMonitor`]: a keyed table of `HeartbeatToken`s plus a
//!   supervisor [`Heart`] running at `threshold / 2`, which evicts and
//!   reports dead tokens.
//!
//! None of this persists across a process restart; liveness state lives
//! only as long as the owning server does.
//!
//! # Example
//!
//! ```no_run
//! use rte_shared::heartbeat::MultiHeartbeatMonitor;
//! use std::time::Duration;
//!
//! # async fn example() {
//! let monitor = MultiHeartbeatMonitor::new(Duration::from_secs(30), |id| {
//!     println!("task {id} timed out");
//! });
//!
//! monitor.add(1).await;
//! monitor.beat(1).await;
//! assert!(monitor.is_alive(1).await);
//! # }
//! ```

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::sleep;

type BoxedCallback = Box<dyn Fn() -> Pin<Box<dyn Future<Output = ()> + Send>> + Send + Sync>;

/// An active periodic ticker.
///
/// Invokes its callback every `period` until [`Heart::stop`] is called.
/// Stop is idempotent and observable within one period: the stop signal
/// races the sleep inside a single `tokio::select!`, so a pending tick is
/// never started after `stop()` has been requested.
pub struct Heart {
    stop_tx: Mutex<Option<oneshot::Sender<()>>>,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl Heart {
    /// Spawns the ticker immediately, invoking `callback` every `period`.
    pub fn spawn<F, Fut>(period: Duration, callback: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let boxed: BoxedCallback = Box::new(move || Box::pin(callback()));
        let (stop_tx, mut stop_rx) = oneshot::channel();

        let handle = tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = sleep(period) => {
                        boxed().await;
                    }
                    _ = &mut stop_rx => break,
                }
            }
        });

        Heart {
            stop_tx: Mutex::new(Some(stop_tx)),
            handle: Mutex::new(Some(handle)),
        }
    }

    /// Signals the ticker to stop and waits for its loop to exit.
    ///
    /// Idempotent: a second call is a no-op.
    pub async fn stop(&self) {
        let tx = self.stop_tx.lock().unwrap().take();
        if let Some(tx) = tx {
            let _ = tx.send(());
        }
        let handle = self.handle.lock().unwrap().take();
        if let Some(handle) = handle {
            let _ = handle.await;
        }
    }
}

/// A passive liveness token.
///
/// `beat` and `is_alive` are cheap enough that holding the internal lock
/// across either call's body is fine; they never await.
struct HeartbeatToken {
    last_beat: Instant,
    threshold: Duration,
}

impl HeartbeatToken {
    fn new(threshold: Duration) -> Self {
        HeartbeatToken {
            last_beat: Instant::now(),
            threshold,
        }
    }

    fn beat(&mut self) {
        self.last_beat = Instant::now();
    }

    fn is_alive(&self) -> bool {
        self.last_beat.elapsed() < self.threshold
    }
}

/// A keyed table of [`HeartbeatToken`]s supervised by a single background
/// [`Heart`] running at `threshold / 2`.
///
/// On each supervisor tick, every token whose age exceeds `threshold` is
/// removed and `on_death(id)` fires exactly once for it. `on_death` is
/// never invoked a second time for the same id without an intervening
/// `add`.
pub struct MultiHeartbeatMonitor {
    tokens: std::sync::Arc<Mutex<HashMap<u64, HeartbeatToken>>>,
    threshold: Duration,
    supervisor: Heart,
}

impl MultiHeartbeatMonitor {
    /// Creates a monitor with the given per-token `threshold` and starts
    /// its supervisor ticker at `threshold / 2`.
    pub fn new<F>(threshold: Duration, on_death: F) -> Self
    where
        F: Fn(u64) + Send + Sync + 'static,
    {
        let tokens: std::sync::Arc<Mutex<HashMap<u64, HeartbeatToken>>> =
            std::sync::Arc::new(Mutex::new(HashMap::new()));
        let period = threshold / 2;
        let sweep_tokens = tokens.clone();
        let on_death = std::sync::Arc::new(on_death);

        let supervisor = Heart::spawn(period, move || {
            let tokens = sweep_tokens.clone();
            let on_death = on_death.clone();
            async move {
                let dead: Vec<u64> = {
                    let mut guard = tokens.lock().unwrap();
                    let dead_ids: Vec<u64> = guard
                        .iter()
                        .filter(|(_, tok)| !tok.is_alive())
                        .map(|(id, _)| *id)
                        .collect();
                    for id in &dead_ids {
                        guard.remove(id);
                    }
                    dead_ids
                };
                for id in dead {
                    on_death(id);
                }
            }
        });

        MultiHeartbeatMonitor {
            tokens,
            threshold,
            supervisor,
        }
    }

    /// Registers a fresh, live token for `id`.
    pub async fn add(&self, id: u64) {
        self.tokens
            .lock()
            .unwrap()
            .insert(id, HeartbeatToken::new(self.threshold));
    }

    /// Removes the token for `id`, if present. No-op otherwise.
    pub async fn remove(&self, id: u64) {
        self.tokens.lock().unwrap().remove(&id);
    }

    /// Refreshes the token for `id`. No-op if `id` is absent (already
    /// removed, by completion or by a prior timeout) — this is what
    /// prevents a zombie task from resurrecting its own heartbeat.
    pub async fn beat(&self, id: u64) {
        if let Some(tok) = self.tokens.lock().unwrap().get_mut(&id) {
            tok.beat();
        }
    }

    /// Returns whether `id` is both present and within its threshold.
    /// Absent ids are reported as not alive.
    pub async fn is_alive(&self, id: u64) -> bool {
        self.tokens
            .lock()
            .unwrap()
            .get(&id)
            .map(|tok| tok.is_alive())
            .unwrap_or(false)
    }

    /// Stops the supervisor ticker. Does not fire `on_death` for any
    /// tokens still registered.
    pub async fn stop(&self) {
        self.supervisor.stop().await;
    }
}
