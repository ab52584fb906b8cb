//! Single-worker request queue
//!
//! Requests are dispatched one at a time in submission order, with a cool-down
//! pause after each one so bursts never reach the service back to back.

use std::future::Future;
use std::time::Duration;

use futures_util::future::BoxFuture;
use tokio::sync::{mpsc, oneshot};
use uuid::Uuid;

use super::error::GatewayError;

/// Default pause between two dispatches
pub const DEFAULT_COOLDOWN: Duration = Duration::from_millis(500);

/// A queued unit of work
struct QueuedRequest {
    id: Uuid,
    label: String,
    job: BoxFuture<'static, ()>,
}

/// Handle for the request worker. Clones feed the same worker.
#[derive(Clone)]
pub struct RequestQueue {
    sender: mpsc::UnboundedSender<QueuedRequest>,
}

impl RequestQueue {
    /// Spawn the worker on the current tokio runtime
    pub fn start(cooldown: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(request_worker_loop(rx, cooldown));
        Self { sender: tx }
    }

    /// Queue `request` and wait for its output. The future is not polled until
    /// every request queued before it has finished.
    pub async fn submit<T, Fut>(&self, label: &str, request: Fut) -> Result<T, GatewayError>
    where
        Fut: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        let (done_tx, done_rx) = oneshot::channel();
        let job = Box::pin(async move {
            // The caller may have gone away; its result is simply dropped
            let _ = done_tx.send(request.await);
        });

        let queued = QueuedRequest {
            id: Uuid::new_v4(),
            label: label.to_string(),
            job,
        };
        log::debug!("gateway: queued {} ({})", queued.label, queued.id);

        self.sender.send(queued).map_err(|_| GatewayError::QueueClosed)?;
        done_rx.await.map_err(|_| GatewayError::QueueClosed)
    }
}

async fn request_worker_loop(mut rx: mpsc::UnboundedReceiver<QueuedRequest>, cooldown: Duration) {
    while let Some(request) = rx.recv().await {
        log::debug!("gateway: dispatching {} ({})", request.label, request.id);
        request.job.await;
        tokio::time::sleep(cooldown).await;
    }
    log::info!("gateway: request queue closed");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use tokio::time::Instant;

    #[tokio::test(start_paused = true)]
    async fn test_one_request_in_flight_in_fifo_order() {
        let queue = RequestQueue::start(DEFAULT_COOLDOWN);
        let in_flight = Arc::new(AtomicUsize::new(0));
        let max_seen = Arc::new(AtomicUsize::new(0));
        let order = Arc::new(Mutex::new(Vec::new()));

        let job = |n: usize| {
            let in_flight = Arc::clone(&in_flight);
            let max_seen = Arc::clone(&max_seen);
            let order = Arc::clone(&order);
            async move {
                let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                max_seen.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(100)).await;
                order.lock().unwrap().push(n);
                in_flight.fetch_sub(1, Ordering::SeqCst);
                n * 10
            }
        };

        let (a, b, c) = tokio::join!(
            queue.submit("a", job(0)),
            queue.submit("b", job(1)),
            queue.submit("c", job(2)),
        );

        assert_eq!((a.unwrap(), b.unwrap(), c.unwrap()), (0, 10, 20));
        assert_eq!(max_seen.load(Ordering::SeqCst), 1);
        assert_eq!(*order.lock().unwrap(), vec![0, 1, 2]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cooldown_between_dispatches() {
        let queue = RequestQueue::start(DEFAULT_COOLDOWN);
        let started = Arc::new(Mutex::new(Vec::new()));

        let stamp = |started: Arc<Mutex<Vec<Instant>>>| async move {
            started.lock().unwrap().push(Instant::now());
        };

        let (first, second) = tokio::join!(
            queue.submit("first", stamp(Arc::clone(&started))),
            queue.submit("second", stamp(Arc::clone(&started))),
        );
        first.unwrap();
        second.unwrap();

        let stamps = started.lock().unwrap();
        assert_eq!(stamps.len(), 2);
        assert!(stamps[1] - stamps[0] >= DEFAULT_COOLDOWN);
    }
}
