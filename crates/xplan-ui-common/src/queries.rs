//! In-flight result query tracking.
//!
//! The [`QueryTracker`] records every fetch the resolver starts, hands out a
//! [`QueryTicket`] for awaiting its outcome, and broadcasts lifecycle events.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tokio::sync::{broadcast, oneshot};
use uuid::Uuid;
use xplan_core::{QueryKey, ResultQuery};

use crate::events::QueryEvent;
use crate::resolver::Resolution;

/// Unique identifier for one issued query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QueryId(Uuid);

impl QueryId {
    /// Create a new random query ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for QueryId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for QueryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How an issued query ended.
#[derive(Debug, Clone)]
pub enum QueryOutcome {
    /// The query was still current; its resolution was published.
    Applied(Resolution),

    /// A newer query was issued first; the response was dropped.
    Discarded,
}

impl QueryOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, QueryOutcome::Applied(_))
    }
}

/// Handle to an issued query.
pub struct QueryTicket {
    pub id: QueryId,
    pub key: QueryKey,

    /// Receives the outcome once the fetch finishes.
    pub outcome: oneshot::Receiver<QueryOutcome>,
}

struct QueryState {
    key: QueryKey,
    started_at: DateTime<Utc>,
    outcome_tx: Option<oneshot::Sender<QueryOutcome>>,
}

/// Tracks in-flight result queries.
pub struct QueryTracker {
    queries: DashMap<QueryId, QueryState>,
    events_tx: broadcast::Sender<QueryEvent>,
}

impl QueryTracker {
    pub fn new() -> Self {
        let (events_tx, _) = broadcast::channel(256);
        Self {
            queries: DashMap::new(),
            events_tx,
        }
    }

    /// Create a new tracker wrapped in Arc for sharing.
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Register a query and return its ticket.
    pub fn begin(&self, query: &ResultQuery) -> QueryTicket {
        let id = QueryId::new();
        let key = query.key();
        let (outcome_tx, outcome_rx) = oneshot::channel();

        self.queries.insert(
            id,
            QueryState {
                key,
                started_at: Utc::now(),
                outcome_tx: Some(outcome_tx),
            },
        );

        let _ = self.events_tx.send(QueryEvent::Started { id, key });

        QueryTicket {
            id,
            key,
            outcome: outcome_rx,
        }
    }

    /// Finish a query whose resolution was published.
    pub fn complete(&self, id: QueryId, resolution: Resolution) {
        if let Some((_, mut state)) = self.queries.remove(&id) {
            let elapsed_ms = (Utc::now() - state.started_at).num_milliseconds();
            let origin = resolution.origin;
            let rows = resolution.rows.len();

            // Event first: whoever wakes on the outcome must already see it.
            let _ = self.events_tx.send(QueryEvent::Resolved {
                id,
                key: state.key,
                origin,
                rows,
                elapsed_ms,
            });

            if let Some(tx) = state.outcome_tx.take() {
                let _ = tx.send(QueryOutcome::Applied(resolution));
            }
        }
    }

    /// Finish a query whose response arrived too late.
    pub fn discard(&self, id: QueryId) {
        if let Some((_, mut state)) = self.queries.remove(&id) {
            let _ = self.events_tx.send(QueryEvent::Discarded { id, key: state.key });

            if let Some(tx) = state.outcome_tx.take() {
                let _ = tx.send(QueryOutcome::Discarded);
            }
        }
    }

    /// Number of queries still waiting on the backend.
    pub fn active_count(&self) -> usize {
        self.queries.len()
    }

    pub fn active_queries(&self) -> Vec<(QueryId, QueryKey)> {
        self.queries
            .iter()
            .map(|entry| (*entry.key(), entry.value().key))
            .collect()
    }

    /// Subscribe to query events.
    pub fn subscribe(&self) -> broadcast::Receiver<QueryEvent> {
        self.events_tx.subscribe()
    }
}

impl Default for QueryTracker {
    fn default() -> Self {
        Self::new()
    }
}
