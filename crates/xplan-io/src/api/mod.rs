//! REST boundary of the expansion-plan backend.
//!
//! - [`dto`] - wire payloads (scenarios, details, error bodies)
//! - [`mapping`] - flat JSON records to [`ResultRow`]
//! - [`database`] - datastore connection settings and replies
//! - [`client`] - blocking `ureq` client (native builds only)

#[cfg(feature = "native-io")]
pub mod client;
pub mod database;
pub mod dto;
pub mod mapping;

#[cfg(feature = "native-io")]
pub use client::{ApiClient, DEFAULT_TIMEOUT};
pub use database::{DatabaseConfig, DatabaseOperationResult, DatabaseStatus};
pub use dto::{RawRecord, ScenarioDetails, ScenarioSummary};
pub use mapping::{row_from_record, rows_from_records};

use xplan_core::{ResultQuery, ResultRow};

use crate::error::ApiError;

/// Anything that can answer a result query.
///
/// Implementations block; async callers run them on a blocking thread.
pub trait ResultsSource: Send + Sync {
    fn fetch_results(&self, query: &ResultQuery) -> Result<Vec<ResultRow>, ApiError>;
}
