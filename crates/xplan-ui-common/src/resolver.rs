//! Data source resolution with synthetic fallback.
//!
//! The [`DataSourceResolver`] turns a [`ResultQuery`] into a [`Resolution`]:
//! live rows when the backend has them, the demo dataset otherwise. While a fetch
//! is in flight the demo rows are already published, so views never render an
//! empty state during the transition.
//!
//! Only the most recently issued query may publish. A response for a superseded
//! query is dropped when it arrives.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::{broadcast, watch};
use tracing::{debug, info, warn};
use xplan_core::{ResultQuery, ResultRow};
use xplan_io::sources::fallback_rows;
use xplan_io::{ApiError, ResultsSource};

use crate::events::{DataOrigin, QueryEvent};
use crate::queries::{QueryId, QueryOutcome, QueryTicket, QueryTracker};

/// Published state of the results a view should render.
#[derive(Debug, Clone)]
pub struct Resolution {
    /// Query these rows answer; `None` before the first query.
    pub query: Option<ResultQuery>,
    pub rows: Arc<Vec<ResultRow>>,
    pub origin: DataOrigin,
    pub is_loading: bool,
    /// User-facing failure message when the backend was unavailable.
    pub error: Option<String>,
}

impl Resolution {
    /// State before any query was issued.
    pub fn idle() -> Self {
        Self {
            query: None,
            rows: Arc::new(Vec::new()),
            origin: DataOrigin::NoData,
            is_loading: false,
            error: None,
        }
    }

    /// Fetch in flight: demo rows for the query's basis.
    pub fn loading(query: ResultQuery) -> Self {
        Self {
            rows: Arc::new(fallback_rows(query.basis)),
            query: Some(query),
            origin: DataOrigin::Pending,
            is_loading: true,
            error: None,
        }
    }

    /// Map a finished fetch onto the rows to show.
    pub fn settle(query: ResultQuery, fetched: Result<Vec<ResultRow>, ApiError>) -> Self {
        match fetched {
            Ok(rows) if !rows.is_empty() => Self {
                query: Some(query),
                rows: Arc::new(rows),
                origin: DataOrigin::Live,
                is_loading: false,
                error: None,
            },
            Ok(_) => {
                debug!("{} returned no rows, showing demo data", query.key());
                Self {
                    rows: Arc::new(fallback_rows(query.basis)),
                    query: Some(query),
                    origin: DataOrigin::NoData,
                    is_loading: false,
                    error: None,
                }
            }
            Err(err) => {
                match err.status() {
                    Some(status) => warn!("{} failed with HTTP {}: {}", query.key(), status, err),
                    None => warn!("{} failed: {}", query.key(), err),
                }
                Self {
                    rows: Arc::new(fallback_rows(query.basis)),
                    query: Some(query),
                    origin: DataOrigin::Unavailable,
                    is_loading: false,
                    error: Some(err.user_message()),
                }
            }
        }
    }

    /// True only when the rows came from the backend.
    pub fn is_live(&self) -> bool {
        self.origin == DataOrigin::Live
    }

    /// True once loading finished without live rows.
    pub fn is_using_mock_data(&self) -> bool {
        !self.is_loading && !self.is_live()
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

impl Default for Resolution {
    fn default() -> Self {
        Self::idle()
    }
}

/// Fetch once, and once more if the first failure looks transient.
pub fn fetch_with_retry(
    source: &dyn ResultsSource,
    query: &ResultQuery,
    retry_transient: bool,
) -> Result<Vec<ResultRow>, ApiError> {
    match source.fetch_results(query) {
        Err(err) if retry_transient && err.is_transient() => {
            info!("retrying {} after transient failure: {}", query.key(), err);
            source.fetch_results(query)
        }
        other => other,
    }
}

struct Published {
    current: Mutex<Option<QueryId>>,
    state_tx: watch::Sender<Resolution>,
}

/// Resolves result queries against a [`ResultsSource`] with last-query-wins.
///
/// [`issue`](Self::issue) and [`resolve`](Self::resolve) spawn onto the ambient
/// tokio runtime; the blocking fetch runs on the blocking pool.
pub struct DataSourceResolver {
    source: Arc<dyn ResultsSource>,
    tracker: Arc<QueryTracker>,
    published: Arc<Published>,
    retry_transient: bool,
}

impl DataSourceResolver {
    pub fn new(source: Arc<dyn ResultsSource>) -> Self {
        Self::with_tracker(source, QueryTracker::shared())
    }

    /// Share an existing tracker (the service facade owns one).
    pub fn with_tracker(source: Arc<dyn ResultsSource>, tracker: Arc<QueryTracker>) -> Self {
        let (state_tx, _) = watch::channel(Resolution::idle());
        Self {
            source,
            tracker,
            published: Arc::new(Published {
                current: Mutex::new(None),
                state_tx,
            }),
            retry_transient: true,
        }
    }

    /// Enable or disable the single retry on transient failures.
    pub fn retry_transient(mut self, retry: bool) -> Self {
        self.retry_transient = retry;
        self
    }

    /// Start fetching `query`, superseding whatever was in flight.
    ///
    /// Must be called within a tokio runtime.
    pub fn issue(&self, query: ResultQuery) -> QueryTicket {
        let ticket = self.tracker.begin(&query);
        let id = ticket.id;

        let superseded = {
            let mut current = self.published.current.lock();
            self.published
                .state_tx
                .send_replace(Resolution::loading(query.clone()));
            current.replace(id)
        };
        if let Some(previous) = superseded {
            debug!("query {} supersedes {}", id, previous);
        }

        let source = Arc::clone(&self.source);
        let tracker = Arc::clone(&self.tracker);
        let published = Arc::clone(&self.published);
        let retry = self.retry_transient;

        tokio::spawn(async move {
            let fetch_query = query.clone();
            let fetched = tokio::task::spawn_blocking(move || {
                fetch_with_retry(source.as_ref(), &fetch_query, retry)
            })
            .await
            .unwrap_or_else(|e| Err(ApiError::Transport(format!("fetch task failed: {e}"))));

            let key = query.key();
            let resolution = Resolution::settle(query, fetched);

            let applied = {
                let current = published.current.lock();
                if *current == Some(id) {
                    published.state_tx.send_replace(resolution.clone());
                    true
                } else {
                    false
                }
            };

            if applied {
                tracker.complete(id, resolution);
            } else {
                debug!("dropping stale response for {}", key);
                tracker.discard(id);
            }
        });

        ticket
    }

    /// Issue `query` and wait for it to settle.
    ///
    /// If a newer query wins the race, this waits for whichever query is current
    /// to finish loading and returns that state. The result is never a loading
    /// state.
    pub async fn resolve(&self, query: ResultQuery) -> Resolution {
        let mut state = self.subscribe();
        let ticket = self.issue(query);
        if let Ok(QueryOutcome::Applied(resolution)) = ticket.outcome.await {
            return resolution;
        }

        let settled = match state.wait_for(|resolution| !resolution.is_loading).await {
            Ok(settled) => settled.clone(),
            Err(_) => self.current(),
        };
        settled
    }

    /// Snapshot of the published state.
    pub fn current(&self) -> Resolution {
        self.published.state_tx.borrow().clone()
    }

    /// Watch the published state.
    pub fn subscribe(&self) -> watch::Receiver<Resolution> {
        self.published.state_tx.subscribe()
    }

    /// Subscribe to query lifecycle events.
    pub fn events(&self) -> broadcast::Receiver<QueryEvent> {
        self.tracker.subscribe()
    }

    pub fn tracker(&self) -> &Arc<QueryTracker> {
        &self.tracker
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;
    use std::time::Duration;
    use xplan_core::CalculationBasis;

    /// Answers from a fixed script, counting calls.
    struct Scripted {
        calls: AtomicUsize,
        replies: Mutex<Vec<Result<Vec<ResultRow>, ApiError>>>,
    }

    impl Scripted {
        fn new(replies: Vec<Result<Vec<ResultRow>, ApiError>>) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                replies: Mutex::new(replies),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl ResultsSource for Scripted {
        fn fetch_results(&self, _query: &ResultQuery) -> Result<Vec<ResultRow>, ApiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let mut replies = self.replies.lock();
            if replies.is_empty() {
                Ok(Vec::new())
            } else {
                replies.remove(0)
            }
        }
    }

    /// Sleeps per scenario, then returns a single row naming the scenario.
    struct Delayed;

    impl ResultsSource for Delayed {
        fn fetch_results(&self, query: &ResultQuery) -> Result<Vec<ResultRow>, ApiError> {
            let delay = if query.scenario_id == 5 { 300 } else { 20 };
            thread::sleep(Duration::from_millis(delay));
            Ok(vec![ResultRow::new(
                format!("scenario-{}", query.scenario_id),
                1,
                2031,
            )])
        }
    }

    fn live_rows() -> Vec<ResultRow> {
        vec![ResultRow::new("CCGT 500MW", 1, 2031).with_status("Selected")]
    }

    fn transport() -> ApiError {
        ApiError::Transport("connection refused".into())
    }

    #[test]
    fn test_settle_live() {
        let query = ResultQuery::new(5, CalculationBasis::Yearly);
        let resolution = Resolution::settle(query, Ok(live_rows()));
        assert!(resolution.is_live());
        assert!(!resolution.is_using_mock_data());
        assert_eq!(resolution.rows.as_slice(), live_rows().as_slice());
    }

    #[test]
    fn test_settle_failure_uses_fallback() {
        let query = ResultQuery::new(5, CalculationBasis::Npv);
        let resolution = Resolution::settle(query, Err(transport()));
        assert_eq!(resolution.origin, DataOrigin::Unavailable);
        assert_eq!(resolution.error.as_deref(), Some("connection failed"));
        assert_eq!(*resolution.rows, fallback_rows(CalculationBasis::Npv));
        assert!(resolution.is_using_mock_data());
    }

    #[test]
    fn test_loading_shows_fallback() {
        let resolution = Resolution::loading(ResultQuery::new(1, CalculationBasis::Yearly));
        assert!(resolution.is_loading);
        assert!(!resolution.rows.is_empty());
        assert!(!resolution.is_live());
        assert!(!resolution.is_using_mock_data());
    }

    #[test]
    fn test_retry_once_on_transient_failure() {
        let query = ResultQuery::new(5, CalculationBasis::Yearly);

        let source = Scripted::new(vec![Err(transport()), Ok(live_rows())]);
        assert_eq!(fetch_with_retry(source.as_ref(), &query, true).unwrap(), live_rows());
        assert_eq!(source.calls(), 2);

        let source = Scripted::new(vec![Err(transport()), Err(transport()), Ok(live_rows())]);
        assert!(fetch_with_retry(source.as_ref(), &query, true).is_err());
        assert_eq!(source.calls(), 2);

        let source = Scripted::new(vec![Err(transport()), Ok(live_rows())]);
        assert!(fetch_with_retry(source.as_ref(), &query, false).is_err());
        assert_eq!(source.calls(), 1);
    }

    #[test]
    fn test_client_errors_are_not_retried() {
        let query = ResultQuery::new(5, CalculationBasis::Yearly);
        let source = Scripted::new(vec![
            Err(ApiError::Status {
                status: 404,
                message: "no such scenario".into(),
            }),
            Ok(live_rows()),
        ]);
        assert!(fetch_with_retry(source.as_ref(), &query, true).is_err());
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_empty_success_falls_back_without_error() {
        let resolver = DataSourceResolver::new(Scripted::new(vec![Ok(Vec::new())]));
        let resolution = resolver
            .resolve(ResultQuery::new(5, CalculationBasis::Yearly))
            .await;

        assert_eq!(*resolution.rows, fallback_rows(CalculationBasis::Yearly));
        assert!(!resolution.is_live());
        assert_eq!(resolution.origin, DataOrigin::NoData);
        assert!(resolution.error.is_none());
        assert!(!resolution.is_loading);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_live_rows_are_published() {
        let resolver = DataSourceResolver::new(Scripted::new(vec![Ok(live_rows())]));
        let mut state = resolver.subscribe();

        let resolution = resolver
            .resolve(ResultQuery::new(5, CalculationBasis::Yearly))
            .await;

        assert!(resolution.is_live());
        assert!(state.has_changed().unwrap());
        assert!(state.borrow_and_update().is_live());
        assert_eq!(resolver.tracker().active_count(), 0);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_superseded_resolve_waits_for_newer_query() {
        let resolver = DataSourceResolver::new(Arc::new(Delayed));
        let mut events = resolver.events();

        // Scenario 7 answers fast but is superseded by the slow scenario 5.
        let (resolution, newer) = tokio::join!(
            resolver.resolve(ResultQuery::new(7, CalculationBasis::Yearly)),
            async {
                while !matches!(events.recv().await, Ok(QueryEvent::Started { .. })) {}
                resolver.issue(ResultQuery::new(5, CalculationBasis::Yearly))
            },
        );

        assert!(!resolution.is_loading);
        assert!(resolution.is_live());
        assert_eq!(resolution.query.as_ref().map(|q| q.scenario_id), Some(5));
        assert_eq!(resolution.rows[0].technology, "scenario-5");
        assert!(newer.outcome.await.unwrap().is_applied());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_stale_response_is_discarded() {
        let resolver = DataSourceResolver::new(Arc::new(Delayed));
        let mut events = resolver.events();

        let first = resolver.issue(ResultQuery::new(5, CalculationBasis::Yearly));
        let second = resolver.issue(ResultQuery::new(7, CalculationBasis::Yearly));

        let second = second.outcome.await.unwrap();
        let first = first.outcome.await.unwrap();

        assert!(second.is_applied());
        assert!(matches!(first, QueryOutcome::Discarded));

        let current = resolver.current();
        assert_eq!(current.query.as_ref().map(|q| q.scenario_id), Some(7));
        assert_eq!(current.rows[0].technology, "scenario-7");
        assert!(current.is_live());

        let mut discarded = 0;
        while let Ok(event) = events.try_recv() {
            if let QueryEvent::Discarded { key, .. } = event {
                assert_eq!(key.scenario_id, 5);
                discarded += 1;
            }
        }
        assert_eq!(discarded, 1);
    }
}
