//! # xplan-io: Results Backend, Import & Export
//!
//! Everything that moves expansion-plan results in or out of the process: the
//! blocking REST client for the results backend, the one-shot CSV importer, the
//! clipboard export adapter, and the deterministic demo dataset used as a
//! fallback when the backend is unavailable.
//!
//! ## Quick Start: Fetch Yearly Results
//!
//! ```rust,no_run
//! use xplan_core::{CalculationBasis, ResultQuery};
//! use xplan_io::api::ApiClient;
//!
//! fn main() -> anyhow::Result<()> {
//!     let client = ApiClient::new("http://localhost:5000/api");
//!     let query = ResultQuery::new(5, CalculationBasis::Yearly).with_year(2031);
//!     let rows = client.yearly_results(&query)?;
//!     println!("{} rows", rows.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Module Overview
//!
//! ### REST boundary ([`api`])
//! - [`api::ApiClient`] - scenarios, results and datastore endpoints (30 s timeout)
//! - [`api::ResultsSource`] - seam used by the resolver and by tests
//! - [`api::mapping`] - flat JSON records to [`xplan_core::ResultRow`]
//!
//! ### Import ([`importers`])
//! - [`importers::import_results_csv`] - spreadsheet columns to camelCase records
//!
//! ### Export ([`export`])
//! - [`export::to_tsv`] / [`export::to_json`] - clipboard text
//!
//! ### Demo data ([`sources`])
//! - [`sources::fallback_rows`] - seeded synthetic results per calculation basis
//!
//! ## Features
//!
//! - `native-io` (default): HTTP client, CSV importer and demo data generator.
//!   Without it only the wire types, mapping and export remain.

pub mod api;
pub mod error;
pub mod export;
#[cfg(feature = "native-io")]
pub mod importers;
#[cfg(feature = "native-io")]
pub mod sources;

pub use api::{RawRecord, ResultsSource};
pub use error::{ApiError, ImportError};
pub use export::{to_json, to_tsv, ExportColumn};

#[cfg(feature = "native-io")]
pub use api::ApiClient;
#[cfg(feature = "native-io")]
pub use sources::fallback_rows;
