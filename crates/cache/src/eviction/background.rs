//! Background eviction task management

use super::Evictor;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Handle to the recurring eviction loop of one cache
#[derive(Debug)]
pub struct EvictionTask {
    shutdown: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl EvictionTask {
    /// Run a cycle immediately, then one every `interval` until stopped
    pub fn spawn(evictor: Arc<Evictor>, interval: Duration) -> Self {
        let (shutdown, mut stopped) = watch::channel(false);

        let handle = tokio::spawn(async move {
            loop {
                match evictor.run_cycle().await {
                    Ok(report) => {
                        tracing::debug!(
                            shard = report.survey.shard,
                            purged = report.purge.is_some(),
                            "eviction cycle finished"
                        );
                    }
                    Err(e) => {
                        tracing::warn!("Cache eviction error: {}", e);
                    }
                }

                tokio::select! {
                    // Either an explicit stop or the sender being dropped.
                    _ = stopped.changed() => break,
                    _ = tokio::time::sleep(interval) => {}
                }
            }
            tracing::debug!("eviction task stopped");
        });

        Self { shutdown, handle }
    }

    /// Signal the loop to exit without waiting for it
    pub fn stop(self) {
        let _ = self.shutdown.send(true);
    }

    /// Signal the loop to exit and wait until it has
    pub async fn shutdown(self) {
        let _ = self.shutdown.send(true);
        let _ = self.handle.await;
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}
