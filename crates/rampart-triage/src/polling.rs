//! Auto-polling service
//!
//! Re-issues the current query at a fixed interval while active, fanning
//! each successful response out to refresh subscribers. Refresh failures
//! are logged and swallowed; polling continues best-effort.

use crate::error::TriageResult;
use crate::query::QueryBuilder;
use crate::{SearchRequest, SearchResponse};
use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::time::{interval_at, Instant};
use tracing::{debug, info, warn};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(15);

/// Search-issuing collaborator. The console's REST client implements this;
/// tests inject counters and failure injectors.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    async fn search(&self, request: &SearchRequest) -> TriageResult<SearchResponse>;
}

struct PollTask {
    shutdown_tx: broadcast::Sender<()>,
    handle: tokio::task::JoinHandle<()>,
}

/// Stopped ⇄ Active polling timer over a shared [`QueryBuilder`].
///
/// `start` and `stop` are both idempotent; at most one timer task exists at
/// any time. After `stop` returns no further tick issues a search, though
/// one search already in flight may still deliver a late refresh.
pub struct AutoPollingService {
    provider: Arc<dyn SearchProvider>,
    builder: Arc<RwLock<QueryBuilder>>,
    interval: Duration,
    refresh_tx: broadcast::Sender<SearchResponse>,
    task: Mutex<Option<PollTask>>,
}

impl AutoPollingService {
    pub fn new(
        provider: Arc<dyn SearchProvider>,
        builder: Arc<RwLock<QueryBuilder>>,
        interval: Duration,
    ) -> Self {
        let (refresh_tx, _) = broadcast::channel(16);
        Self {
            provider,
            builder,
            interval,
            refresh_tx,
            task: Mutex::new(None),
        }
    }

    pub fn with_default_interval(
        provider: Arc<dyn SearchProvider>,
        builder: Arc<RwLock<QueryBuilder>>,
    ) -> Self {
        Self::new(provider, builder, DEFAULT_POLL_INTERVAL)
    }

    /// Receives one message per successful refresh while polling is active.
    pub fn subscribe(&self) -> broadcast::Receiver<SearchResponse> {
        self.refresh_tx.subscribe()
    }

    pub fn is_active(&self) -> bool {
        self.task.lock().is_some()
    }

    /// Begins polling. No-op when already active; two rapid calls never
    /// produce two timers. The first tick fires one full interval after
    /// start, not immediately.
    pub fn start(&self) {
        let mut task = self.task.lock();
        if task.is_some() {
            debug!("polling already active, start ignored");
            return;
        }

        let (shutdown_tx, mut shutdown_rx) = broadcast::channel(1);
        let provider = self.provider.clone();
        let builder = self.builder.clone();
        let refresh_tx = self.refresh_tx.clone();
        let period = self.interval;

        let handle = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            loop {
                tokio::select! {
                    biased;
                    _ = shutdown_rx.recv() => {
                        debug!("poll loop shutting down");
                        break;
                    }
                    _ = ticker.tick() => {
                        let request = builder.read().search_request();
                        match provider.search(&request).await {
                            Ok(response) => {
                                debug!(total = response.total, "poll refresh");
                                // No subscribers is not an error.
                                let _ = refresh_tx.send(response);
                            }
                            Err(e) => {
                                warn!(error = %e, query = %request.query, "poll refresh failed, continuing");
                            }
                        }
                    }
                }
            }
        });

        info!(interval_secs = period.as_secs_f64(), "auto-polling started");
        *task = Some(PollTask {
            shutdown_tx,
            handle,
        });
    }

    /// Stops polling. No-op when already stopped. The shutdown branch is
    /// polled before the timer branch, so a tick racing this call cannot
    /// start a new search once the signal is observed.
    pub fn stop(&self) {
        let Some(task) = self.task.lock().take() else {
            debug!("polling already stopped, stop ignored");
            return;
        };
        if task.shutdown_tx.send(()).is_err() {
            // Loop already gone; nothing left to cancel.
            task.handle.abort();
        }
        info!("auto-polling stopped");
    }
}

impl Drop for AutoPollingService {
    fn drop(&mut self) {
        if let Some(task) = self.task.lock().take() {
            let _ = task.shutdown_tx.send(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TriageError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingProvider {
        calls: AtomicUsize,
        fail_on: Option<usize>,
    }

    impl CountingProvider {
        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl SearchProvider for CountingProvider {
        async fn search(&self, _request: &SearchRequest) -> TriageResult<SearchResponse> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if self.fail_on == Some(call) {
                return Err(TriageError::SearchFailed("backend unavailable".into()));
            }
            Ok(SearchResponse {
                total: call as u64,
                results: vec![],
            })
        }
    }

    fn service(provider: Arc<CountingProvider>, interval: Duration) -> AutoPollingService {
        let builder = Arc::new(RwLock::new(QueryBuilder::new()));
        AutoPollingService::new(provider, builder, interval)
    }

    #[tokio::test(start_paused = true)]
    async fn refreshes_once_per_interval() {
        let provider = Arc::new(CountingProvider::default());
        let svc = service(provider.clone(), Duration::from_secs(5));
        let mut rx = svc.subscribe();

        svc.start();
        for expected in 1..=3u64 {
            let response = rx.recv().await.unwrap();
            assert_eq!(response.total, expected);
        }
        assert_eq!(provider.calls(), 3);
        svc.stop();
    }

    #[tokio::test(start_paused = true)]
    async fn start_is_idempotent() {
        let provider = Arc::new(CountingProvider::default());
        let svc = service(provider.clone(), Duration::from_secs(5));
        let mut rx = svc.subscribe();

        svc.start();
        svc.start();
        assert!(svc.is_active());

        rx.recv().await.unwrap();
        tokio::task::yield_now().await;
        // One timer only: a second concurrent timer would have doubled the
        // call count by the first interval boundary.
        assert_eq!(provider.calls(), 1);
        svc.stop();
    }

    #[tokio::test(start_paused = true)]
    async fn stop_halts_future_ticks() {
        let provider = Arc::new(CountingProvider::default());
        let svc = service(provider.clone(), Duration::from_secs(4));
        let mut rx = svc.subscribe();

        svc.start();
        rx.recv().await.unwrap();
        svc.stop();
        svc.stop();
        assert!(!svc.is_active());

        tokio::time::advance(Duration::from_secs(20)).await;
        tokio::task::yield_now().await;
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_refresh_does_not_stop_polling() {
        let provider = Arc::new(CountingProvider {
            calls: AtomicUsize::new(0),
            fail_on: Some(1),
        });
        let svc = service(provider.clone(), Duration::from_secs(5));
        let mut rx = svc.subscribe();

        svc.start();
        // First tick fails silently; the second still delivers.
        let response = rx.recv().await.unwrap();
        assert_eq!(response.total, 2);
        assert_eq!(provider.calls(), 2);
        svc.stop();
    }

    #[tokio::test(start_paused = true)]
    async fn restart_after_stop_polls_again() {
        let provider = Arc::new(CountingProvider::default());
        let svc = service(provider.clone(), Duration::from_secs(5));
        let mut rx = svc.subscribe();

        svc.start();
        rx.recv().await.unwrap();
        svc.stop();

        svc.start();
        assert!(svc.is_active());
        rx.recv().await.unwrap();
        assert_eq!(provider.calls(), 2);
        svc.stop();
    }
}
