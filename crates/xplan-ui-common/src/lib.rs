//! # xplan UI Common
//!
//! Shared services for xplan front-ends.
//!
//! This crate turns raw expansion-plan results into what a results screen
//! renders: resolved data with a demo fallback, sorted and paginated tables,
//! metric pivots with prior-cycle baselines, and clipboard export.
//!
//! ## Architecture
//!
//! ```text
//! xplan-cli ──► UiService ──► DataSourceResolver ──► xplan-io (ApiClient, demo data)
//!                   │                │
//!                   │                └──► Resolution ──► ResultsView ──► pivot / sort / page
//!                   ├──► PlanStore
//!                   └──► DatabaseService
//! ```
//!
//! ## Core Components
//!
//! - [`UiService`]: Main entry point combining all services
//! - [`DataSourceResolver`]: Live rows or demo fallback, last query wins
//! - [`ResultsView`]: Sort, pagination, metric pivot and export state
//! - [`PlanStore`]: Expansion plans and their candidates
//! - [`XplanConfig`]: Unified configuration
//!
//! ## Usage
//!
//! ```ignore
//! use xplan_core::{CalculationBasis, ResultQuery};
//! use xplan_ui_common::UiService;
//!
//! let service = UiService::new()?;
//!
//! let resolution = service
//!     .resolver()
//!     .resolve(ResultQuery::new(5, CalculationBasis::Npv))
//!     .await;
//!
//! let mut view = service.new_view(&resolution)?;
//! view.toggle_sort("technology");
//! for row in view.page().items {
//!     println!("{}", row.technology);
//! }
//! ```

pub mod baseline;
pub mod config;
pub mod database;
pub mod error;
pub mod events;
pub mod pagination;
pub mod pivot;
pub mod plans;
pub mod queries;
pub mod resolver;
pub mod service;
pub mod sorting;
pub mod view;

// Re-exports for convenience
pub use baseline::{baseline, baseline_delta, selected_technology};
pub use config::{ApiConfig, ExportConfig, ExportFormat, ViewConfig, XplanConfig};
pub use database::DatabaseService;
pub use error::{Error, Result};
pub use events::{DataOrigin, PlanEvent, QueryEvent};
pub use pagination::{paginate, Page, PaginationState, DEFAULT_PAGE_SIZE, PAGE_SIZE_OPTIONS};
pub use pivot::{pivot, pivot_sorted, ChartSeries, MetricKind, PivotCell, PivotTable};
pub use plans::{
    Candidate, CandidateDraft, CandidateId, CandidateKind, Plan, PlanId, PlanStore,
    SolverSettings,
};
pub use queries::{QueryId, QueryOutcome, QueryTicket, QueryTracker};
pub use resolver::{DataSourceResolver, Resolution};
pub use service::{UiService, UiServiceBuilder};
pub use sorting::{sort_rows, SortConfig, SortDirection};
pub use view::{ExportScope, ResultsView};
