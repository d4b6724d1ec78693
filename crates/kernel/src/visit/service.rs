//! Visit log worker and its caller-facing handle.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::types::{Visit, VisitSink};
use crate::config::Config;
use crate::error::{Error, Result};

/// Tuning for the visit log worker.
#[derive(Debug, Clone)]
pub struct VisitLogOptions {
    /// How often the buffer is flushed regardless of size.
    pub flush_interval: Duration,

    /// Buffered visit count that triggers an immediate flush.
    pub flush_threshold: usize,

    /// Capacity of the channel feeding the worker.
    pub queue_capacity: usize,
}

impl Default for VisitLogOptions {
    fn default() -> Self {
        Self {
            flush_interval: Duration::from_secs(10),
            flush_threshold: 100,
            queue_capacity: 1024,
        }
    }
}

impl From<&Config> for VisitLogOptions {
    fn from(config: &Config) -> Self {
        Self {
            flush_interval: config.visit_flush_interval,
            flush_threshold: config.visit_flush_threshold,
            queue_capacity: config.visit_queue_capacity,
        }
    }
}

/// Cheap cloneable handle for recording visits from request handlers.
#[derive(Clone)]
pub struct VisitLogger {
    tx: mpsc::Sender<Visit>,
}

impl VisitLogger {
    /// Queue a visit for the background worker.
    ///
    /// Never blocks: a full queue or a stopped worker returns an error and
    /// the visit is dropped. Callers treat both as non-fatal — losing a
    /// visit record must never fail the request that produced it.
    pub fn record(&self, visit: Visit) -> Result<()> {
        self.tx.try_send(visit).map_err(|e| match e {
            TrySendError::Full(_) => Error::VisitQueueFull,
            TrySendError::Closed(_) => Error::VisitLogClosed,
        })
    }
}

impl std::fmt::Debug for VisitLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VisitLogger").finish()
    }
}

/// Owner of the background flush task.
pub struct VisitLogService {
    shutdown_tx: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl VisitLogService {
    /// Spawn the worker task and return the recording handle plus the
    /// service owning the task.
    pub fn spawn(sink: Arc<dyn VisitSink>, options: VisitLogOptions) -> (VisitLogger, Self) {
        let (tx, rx) = mpsc::channel(options.queue_capacity.max(1));
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let handle = tokio::spawn(run_worker(rx, sink, options, shutdown_rx));

        (
            VisitLogger { tx },
            Self {
                shutdown_tx,
                handle,
            },
        )
    }

    /// Stop the worker, draining and flushing anything still queued.
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(true);
        if let Err(e) = self.handle.await {
            warn!(error = %e, "visit log worker task panicked");
        }
    }
}

impl std::fmt::Debug for VisitLogService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VisitLogService").finish()
    }
}

/// Worker loop: owns the batching buffer, fed only via the channel.
async fn run_worker(
    mut rx: mpsc::Receiver<Visit>,
    sink: Arc<dyn VisitSink>,
    options: VisitLogOptions,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    let threshold = options.flush_threshold.max(1);
    let mut buffer: Vec<Visit> = Vec::with_capacity(threshold);
    let mut interval = tokio::time::interval(options.flush_interval);
    // The first tick fires immediately; skip it so an empty startup buffer
    // is not flushed at time zero.
    interval.tick().await;

    loop {
        tokio::select! {
            visit = rx.recv() => {
                match visit {
                    Some(visit) => {
                        buffer.push(visit);
                        if buffer.len() >= threshold {
                            flush(sink.as_ref(), &mut buffer, threshold).await;
                        }
                    }
                    // All logger handles dropped.
                    None => break,
                }
            }
            _ = interval.tick() => {
                flush(sink.as_ref(), &mut buffer, threshold).await;
            }
            _ = shutdown_rx.changed() => {
                if *shutdown_rx.borrow() {
                    break;
                }
            }
        }
    }

    // Drain whatever is still queued, then flush the remainder.
    while let Ok(visit) = rx.try_recv() {
        buffer.push(visit);
        if buffer.len() >= threshold {
            flush(sink.as_ref(), &mut buffer, threshold).await;
        }
    }
    flush(sink.as_ref(), &mut buffer, threshold).await;

    debug!("visit log worker stopped");
}

/// Flush the buffer to the sink.
///
/// On failure the batch is retained for the next attempt, capped at twice
/// the flush threshold; beyond that the oldest visits are discarded so a
/// dead sink cannot grow the buffer without bound.
async fn flush(sink: &dyn VisitSink, buffer: &mut Vec<Visit>, threshold: usize) {
    if buffer.is_empty() {
        return;
    }

    match sink.write_visits(buffer).await {
        Ok(()) => {
            debug!(count = buffer.len(), "flushed visit batch");
            buffer.clear();
        }
        Err(e) => {
            warn!(
                error = %e,
                count = buffer.len(),
                "failed to flush visit batch, retaining for retry"
            );
            let cap = threshold * 2;
            if buffer.len() > cap {
                let dropped = buffer.len() - cap;
                buffer.drain(..dropped);
                warn!(dropped = dropped, "visit backlog over cap, dropped oldest");
            }
        }
    }
}

#[cfg(test)]
// Tests are allowed to use unwrap/expect freely.
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::visit::MemorySink;

    #[tokio::test]
    async fn threshold_triggers_flush() {
        let sink = Arc::new(MemorySink::new());
        let options = VisitLogOptions {
            flush_interval: Duration::from_secs(3600),
            flush_threshold: 3,
            queue_capacity: 16,
        };
        let (logger, service) = VisitLogService::spawn(sink.clone(), options);

        for path in ["/a", "/b", "/c"] {
            logger.record(Visit::new(path)).unwrap();
        }

        // Wait for the worker to pick up the batch.
        for _ in 0..100 {
            if sink.len() == 3 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert_eq!(sink.len(), 3);
        assert_eq!(sink.flush_count(), 1);

        service.shutdown().await;
    }

    #[tokio::test]
    async fn shutdown_flushes_partial_batch() {
        let sink = Arc::new(MemorySink::new());
        let options = VisitLogOptions {
            flush_interval: Duration::from_secs(3600),
            flush_threshold: 100,
            queue_capacity: 16,
        };
        let (logger, service) = VisitLogService::spawn(sink.clone(), options);

        logger.record(Visit::new("/only")).unwrap();
        service.shutdown().await;

        assert_eq!(sink.len(), 1);
        assert_eq!(sink.recorded()[0].path, "/only");
    }

    #[tokio::test]
    async fn record_after_shutdown_errors() {
        let sink = Arc::new(MemorySink::new());
        let (logger, service) = VisitLogService::spawn(sink, VisitLogOptions::default());

        service.shutdown().await;

        let err = logger.record(Visit::new("/late")).unwrap_err();
        assert!(matches!(err, Error::VisitLogClosed));
    }

    #[tokio::test]
    async fn full_queue_errors_without_blocking() {
        let sink = Arc::new(MemorySink::new());
        let options = VisitLogOptions {
            flush_interval: Duration::from_secs(3600),
            // Threshold higher than capacity so the worker may lag behind.
            flush_threshold: 1000,
            queue_capacity: 1,
        };
        let (logger, service) = VisitLogService::spawn(sink, options);

        // With capacity 1, pushing quickly must eventually hit a full queue
        // rather than blocking the caller.
        let mut saw_full = false;
        for i in 0..1000 {
            if let Err(Error::VisitQueueFull) = logger.record(Visit::new(format!("/p/{i}"))) {
                saw_full = true;
                break;
            }
        }
        assert!(saw_full);

        service.shutdown().await;
    }
}
