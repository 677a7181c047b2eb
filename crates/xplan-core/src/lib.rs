//! # xplan-core: Expansion-Plan Result Model
//!
//! Provides the data structures shared by every xplan crate: flat result rows,
//! metric catalogs, result queries and display formatting.
//!
//! ## Design Philosophy
//!
//! Capacity-expansion studies are solved by an external service. What reaches
//! this side is a set of **flat result rows**:
//! - **Identity**: technology (candidate/unit combination), build cycle, year
//! - **Status**: free text, containing `"Selected"` when the solver picked the
//!   technology in that cycle
//! - **Metrics**: an open bag of named numeric or categorical values
//!
//! Metric sets differ between yearly and NPV result sets and grow with the data,
//! so rows carry a [`MetricBag`] and each result-set type declares a static
//! catalog of [`MetricDescriptor`]s.
//!
//! ## Quick Start
//!
//! ```rust
//! use xplan_core::*;
//!
//! let row = ResultRow::new("CCGT 500MW", 1, 2030)
//!     .with_status("Selected")
//!     .with_metric("Added Capacity", 500.0);
//!
//! assert!(row.is_selected());
//! assert_eq!(row.field("Added Capacity"), Some(FieldRef::Number(500.0)));
//!
//! let unit = find_descriptor("Added Capacity").map(|d| d.unit);
//! assert_eq!(unit, Some("MW"));
//! ```
//!
//! ## Modules
//!
//! - [`row`] - [`ResultRow`], [`MetricValue`], field lookup for sorting/export
//! - [`metrics`] - [`CalculationBasis`] and the per-basis metric catalogs
//! - [`query`] - [`ResultQuery`] and its last-query-wins [`QueryKey`]
//! - [`format`] - display abbreviation and technology labels
//! - [`diagnostics`] - import diagnostics
//! - [`error`] - [`XplanError`]

pub mod diagnostics;
pub mod error;
pub mod format;
pub mod metrics;
pub mod query;
pub mod row;

pub use diagnostics::{DiagnosticIssue, ImportDiagnostics, ImportStats, Severity};
pub use error::{XplanError, XplanResult};
pub use format::{format_metric_value, short_technology_label};
pub use metrics::{
    find_by_key, find_descriptor, CalculationBasis, MetricDescriptor, NPV_METRICS,
    UNIT_CHANGE_METRICS, YEARLY_METRICS,
};
pub use query::{QueryKey, ResultQuery};
pub use row::{
    FieldLookup, FieldRef, MetricBag, MetricValue, ResultRow, BUILD_CYCLE_KEY, SELECTED_MARKER,
    STATUS_KEY, TECHNOLOGY_KEY, YEAR_KEY,
};
