//! Event types for reactive UI updates.

use std::fmt;

use serde::Serialize;
use xplan_core::QueryKey;

use crate::{CandidateId, PlanId, QueryId};

/// Where the rows currently on screen came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DataOrigin {
    /// A fetch is in flight; demo rows are shown meanwhile.
    Pending,

    /// The backend returned rows.
    Live,

    /// The backend answered with zero rows; demo rows are shown.
    NoData,

    /// The backend could not be reached or returned an error; demo rows are shown.
    Unavailable,
}

impl DataOrigin {
    /// True when the rows are the synthetic demo set.
    pub fn is_synthetic(self) -> bool {
        !matches!(self, DataOrigin::Live)
    }
}

impl fmt::Display for DataOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataOrigin::Pending => write!(f, "loading"),
            DataOrigin::Live => write!(f, "live"),
            DataOrigin::NoData => write!(f, "no data"),
            DataOrigin::Unavailable => write!(f, "unavailable"),
        }
    }
}

/// Events emitted by the query tracker.
#[derive(Debug, Clone)]
pub enum QueryEvent {
    /// A query was issued and became current.
    Started { id: QueryId, key: QueryKey },

    /// The current query finished and its resolution was published.
    Resolved {
        id: QueryId,
        key: QueryKey,
        origin: DataOrigin,
        rows: usize,
        elapsed_ms: i64,
    },

    /// A response arrived for a query that had been superseded.
    Discarded { id: QueryId, key: QueryKey },
}

/// Events emitted by the plan store when state changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanEvent {
    /// A plan was created.
    Created { id: PlanId, name: String },

    /// A plan's name or description changed.
    Updated { id: PlanId },

    /// A plan was deleted.
    Deleted { id: PlanId },

    /// A candidate was added, changed or removed.
    CandidatesChanged { plan: PlanId, candidate: CandidateId },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_live_rows_are_real() {
        assert!(!DataOrigin::Live.is_synthetic());
        for origin in [DataOrigin::Pending, DataOrigin::NoData, DataOrigin::Unavailable] {
            assert!(origin.is_synthetic(), "{origin} should be synthetic");
        }
    }
}
