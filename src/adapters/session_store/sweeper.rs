//! SessionSweeper - background eviction for the in-memory session store.
//!
//! Runs two independent timers on one task:
//!
//! | Timer | Default | Action |
//! |-------|---------|--------|
//! | inactivity | 10 min | Evict sessions idle past the threshold |
//! | QR tokens | 10 min | Purge expired QR tokens |
//!
//! ## Graceful Shutdown
//!
//! `SweeperHandle::stop` signals the task through a watch channel and
//! waits for it to finish its current sweep.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

use super::InMemorySessionStore;

/// Sweep periods.
#[derive(Debug, Clone)]
pub struct SweeperConfig {
    pub inactivity_interval: Duration,
    pub qr_token_interval: Duration,
}

impl Default for SweeperConfig {
    fn default() -> Self {
        Self {
            inactivity_interval: Duration::from_secs(600),
            qr_token_interval: Duration::from_secs(600),
        }
    }
}

/// Starts the sweep task.
pub struct SessionSweeper;

impl SessionSweeper {
    /// Spawns the sweep loop on the current runtime.
    ///
    /// The first sweeps run one full period after start.
    pub fn start(store: Arc<InMemorySessionStore>, config: SweeperConfig) -> SweeperHandle {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let task = tokio::spawn(run(store, config, shutdown_rx));
        tracing::info!("Session sweeper started");
        SweeperHandle {
            shutdown: shutdown_tx,
            task,
        }
    }
}

/// Owns the running sweep task.
pub struct SweeperHandle {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl SweeperHandle {
    /// Signals shutdown and waits for the task to exit.
    pub async fn stop(self) {
        // The task may already be gone; nothing to signal then.
        let _ = self.shutdown.send(true);
        if let Err(e) = self.task.await {
            tracing::warn!(error = %e, "Session sweeper task ended abnormally");
        }
        tracing::info!("Session sweeper stopped");
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

async fn run(
    store: Arc<InMemorySessionStore>,
    config: SweeperConfig,
    mut shutdown: watch::Receiver<bool>,
) {
    let start = Instant::now();
    let mut inactivity = time::interval_at(
        start + config.inactivity_interval,
        config.inactivity_interval,
    );
    let mut tokens = time::interval_at(start + config.qr_token_interval, config.qr_token_interval);
    inactivity.set_missed_tick_behavior(MissedTickBehavior::Delay);
    tokens.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    return;
                }
            }

            _ = inactivity.tick() => {
                let evicted = store.sweep_inactive().await;
                if !evicted.is_empty() {
                    tracing::info!(count = evicted.len(), "Inactivity sweep evicted sessions");
                }
            }

            _ = tokens.tick() => {
                store.sweep_expired_tokens().await;
            }
        }
    }
}
