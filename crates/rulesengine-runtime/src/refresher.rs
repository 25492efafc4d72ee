//! Background sweep task

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};

use crate::cache::Cache;

/// Handle to the task that sweeps a cache on a fixed interval
///
/// The task stops when [`Refresher::shutdown`] is called or the handle is
/// dropped.
#[derive(Debug)]
pub struct Refresher {
    shutdown: watch::Sender<bool>,
    handle: Option<JoinHandle<()>>,
}

impl Refresher {
    /// Start sweeping `cache` every `period`
    ///
    /// The first sweep runs one full period after spawning. Must be called
    /// from within a tokio runtime.
    pub fn spawn<P, R>(cache: Arc<Cache<P, R>>, period: Duration) -> Self
    where
        P: 'static,
        R: 'static,
    {
        let (shutdown, mut stop) = watch::channel(false);
        let period = period.max(Duration::from_millis(1));

        let handle = tokio::spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately
            ticker.tick().await;

            tracing::info!(?period, "cache refresher started");
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        cache.sweep().await;
                    }
                    changed = stop.changed() => {
                        if changed.is_err() || *stop.borrow() {
                            break;
                        }
                    }
                }
            }
            tracing::info!("cache refresher stopped");
        });

        Self {
            shutdown,
            handle: Some(handle),
        }
    }

    /// Stop the task and wait for an in-flight sweep to finish
    pub async fn shutdown(mut self) {
        let _ = self.shutdown.send(true);
        if let Some(handle) = self.handle.take() {
            if let Err(e) = handle.await {
                tracing::warn!(error = %e, "cache refresher task failed");
            }
        }
    }

    /// Whether the task has exited
    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().map_or(true, JoinHandle::is_finished)
    }
}

impl Drop for Refresher {
    fn drop(&mut self) {
        let _ = self.shutdown.send(true);
    }
}

impl<P: 'static, R: 'static> Cache<P, R> {
    /// Start a [`Refresher`] using the configured sweep interval
    pub fn spawn_refresher(self: &Arc<Self>) -> Refresher {
        Refresher::spawn(Arc::clone(self), self.config().sweep_interval())
    }
}
