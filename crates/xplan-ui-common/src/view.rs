//! Results view session.
//!
//! A [`ResultsView`] owns everything a results screen derives from one
//! resolution: selected metric, table sort, pivot sort and pagination. The table
//! pages over rows and the pivot pages over build cycles, so each keeps its own
//! page. Rows are shared and never mutated; sorting works on references.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use xplan_core::{
    find_by_key, find_descriptor, CalculationBasis, FieldRef, MetricDescriptor, ResultRow,
    BUILD_CYCLE_KEY, STATUS_KEY, TECHNOLOGY_KEY, YEAR_KEY,
};
use xplan_io::export::{to_json, to_tsv, ExportColumn};

use crate::error::Result;
use crate::events::DataOrigin;
use crate::pagination::{Page, PaginationState};
use crate::pivot::{pivot_sorted, PivotTable};
use crate::resolver::Resolution;
use crate::sorting::{sorted_refs, SortConfig};

/// Which rows a TSV export covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportScope {
    /// The visible page only.
    #[default]
    Page,
    /// Every row, in sort order.
    All,
}

/// Render a pivot as TSV: `Build Cycle` plus one column per technology.
///
/// Absent cells are empty fields. Values are written unabbreviated.
pub fn pivot_to_tsv(pivot: &PivotTable) -> String {
    let mut lines = Vec::with_capacity(pivot.build_cycles.len() + 1);

    let mut header = vec!["Build Cycle"];
    header.extend(pivot.technologies.iter().map(String::as_str));
    lines.push(header.join("\t"));

    for &cycle in &pivot.build_cycles {
        let mut fields = vec![cycle.to_string()];
        fields.extend(pivot.row(cycle).into_iter().map(|cell| {
            cell.and_then(|c| c.value.as_ref())
                .map(|v| v.as_field().to_string())
                .unwrap_or_default()
        }));
        lines.push(fields.join("\t"));
    }
    lines.join("\n")
}

/// Header label for a metric: `"Name (unit)"`, or the bare name without a unit.
pub fn metric_label(name: &str) -> String {
    match find_descriptor(name) {
        Some(d) if !d.unit.is_empty() => format!("{} ({})", d.name, d.unit),
        _ => name.to_string(),
    }
}

/// Per-screen state derived from a set of result rows.
#[derive(Debug, Clone)]
pub struct ResultsView {
    rows: Arc<Vec<ResultRow>>,
    basis: CalculationBasis,
    origin: DataOrigin,
    selected_metric: Option<String>,
    sort: SortConfig,
    pivot_sort: SortConfig,
    pagination: PaginationState,
    pivot_pagination: PaginationState,
}

impl ResultsView {
    /// View over a resolver snapshot.
    pub fn new(resolution: &Resolution, page_size: usize) -> Result<Self> {
        let basis = resolution
            .query
            .as_ref()
            .map(|q| q.basis)
            .unwrap_or_default();
        let mut view = Self::from_rows(Arc::clone(&resolution.rows), basis, page_size)?;
        view.origin = resolution.origin;
        Ok(view)
    }

    /// View over rows that did not come through the resolver (e.g. an import).
    pub fn from_rows(
        rows: Arc<Vec<ResultRow>>,
        basis: CalculationBasis,
        page_size: usize,
    ) -> Result<Self> {
        let mut view = Self {
            rows,
            basis,
            origin: DataOrigin::Live,
            selected_metric: None,
            sort: SortConfig::unsorted(),
            pivot_sort: SortConfig::unsorted(),
            pagination: PaginationState::new(page_size)?,
            pivot_pagination: PaginationState::new(page_size)?,
        };
        view.selected_metric = view.default_metric();
        Ok(view)
    }

    /// Swap in a newer resolution, keeping sort and metric where still valid.
    pub fn replace_data(&mut self, resolution: &Resolution) {
        self.rows = Arc::clone(&resolution.rows);
        self.origin = resolution.origin;
        if let Some(query) = &resolution.query {
            self.basis = query.basis;
        }
        let still_present = self
            .selected_metric
            .as_deref()
            .is_some_and(|m| self.rows.iter().any(|r| r.metric(m).is_some()));
        if !still_present {
            self.selected_metric = self.default_metric();
        }
        self.pagination.clamp(self.rows.len());
        self.clamp_pivot_page();
    }

    pub fn rows(&self) -> &[ResultRow] {
        &self.rows
    }

    pub fn basis(&self) -> CalculationBasis {
        self.basis
    }

    pub fn origin(&self) -> DataOrigin {
        self.origin
    }

    pub fn is_using_mock_data(&self) -> bool {
        self.origin.is_synthetic()
    }

    // ─────────────────────────────────────────────────────────────────────
    // Metrics
    // ─────────────────────────────────────────────────────────────────────

    /// Catalog for the view's basis.
    pub fn catalog(&self) -> &'static [MetricDescriptor] {
        self.basis.metrics()
    }

    /// Metric names present in the rows: catalog order first, then unknown names.
    pub fn available_metrics(&self) -> Vec<String> {
        let mut present: Vec<String> = Vec::new();
        for descriptor in self.catalog() {
            if self.rows.iter().any(|r| r.metric(descriptor.name).is_some()) {
                present.push(descriptor.name.to_string());
            }
        }
        for row in self.rows.iter() {
            for name in row.metrics.keys() {
                if !present.contains(name) {
                    present.push(name.clone());
                }
            }
        }
        present
    }

    fn default_metric(&self) -> Option<String> {
        self.available_metrics().into_iter().next()
    }

    pub fn selected_metric(&self) -> Option<&str> {
        self.selected_metric.as_deref()
    }

    /// Select a metric by display name or wire key.
    pub fn select_metric(&mut self, metric: &str) {
        let name = find_by_key(self.catalog(), metric).map_or(metric, |d| d.name);
        self.selected_metric = Some(name.to_string());
        self.clamp_pivot_page();
    }

    // ─────────────────────────────────────────────────────────────────────
    // Table sort and pagination
    // ─────────────────────────────────────────────────────────────────────

    pub fn sort(&self) -> &SortConfig {
        &self.sort
    }

    pub fn set_sort(&mut self, sort: SortConfig) {
        self.sort = sort;
    }

    /// Header click on the table.
    pub fn toggle_sort(&mut self, key: &str) {
        self.sort = self.sort.toggle(key);
    }

    pub fn sorted_rows(&self) -> Vec<&ResultRow> {
        sorted_refs(&self.rows, &self.sort)
    }

    pub fn pagination(&self) -> &PaginationState {
        &self.pagination
    }

    pub fn set_page(&mut self, page: usize) {
        self.pagination.go_to(page, self.rows.len());
    }

    pub fn next_page(&mut self) {
        self.pagination.next(self.rows.len());
    }

    pub fn previous_page(&mut self) {
        self.pagination.previous(self.rows.len());
    }

    /// Applies to both the table and the pivot; both return to page 1.
    pub fn set_page_size(&mut self, page_size: usize) -> Result<()> {
        self.pagination.set_page_size(page_size)?;
        self.pivot_pagination.set_page_size(page_size)
    }

    /// Visible page of sorted rows.
    pub fn page(&self) -> Page<&ResultRow> {
        self.pagination.apply(&self.sorted_rows())
    }

    // ─────────────────────────────────────────────────────────────────────
    // Pivot
    // ─────────────────────────────────────────────────────────────────────

    pub fn pivot_sort(&self) -> &SortConfig {
        &self.pivot_sort
    }

    pub fn set_pivot_sort(&mut self, sort: SortConfig) {
        self.pivot_sort = sort;
    }

    /// Header click on the pivot.
    pub fn toggle_pivot_sort(&mut self, key: &str) {
        self.pivot_sort = self.pivot_sort.toggle_pivot(key);
    }

    /// Pivot of the selected metric; `None` when the rows carry no metrics.
    pub fn pivot(&self) -> Option<PivotTable> {
        let metric = self.selected_metric.as_deref()?;
        Some(pivot_sorted(&self.rows, metric, &self.pivot_sort))
    }

    pub fn pivot_pagination(&self) -> &PaginationState {
        &self.pivot_pagination
    }

    fn pivot_cycle_count(&self) -> usize {
        self.pivot().map_or(0, |table| table.build_cycles.len())
    }

    fn clamp_pivot_page(&mut self) {
        let total = self.pivot_cycle_count();
        self.pivot_pagination.clamp(total);
    }

    pub fn set_pivot_page(&mut self, page: usize) {
        let total = self.pivot_cycle_count();
        self.pivot_pagination.go_to(page, total);
    }

    pub fn next_pivot_page(&mut self) {
        let total = self.pivot_cycle_count();
        self.pivot_pagination.next(total);
    }

    pub fn previous_pivot_page(&mut self) {
        let total = self.pivot_cycle_count();
        self.pivot_pagination.previous(total);
    }

    /// Pivot with its visible page of build cycles.
    pub fn pivot_page(&self) -> Option<(PivotTable, Page<u32>)> {
        let table = self.pivot()?;
        let page = self.pivot_pagination.apply(&table.build_cycles);
        Some((table, page))
    }

    // ─────────────────────────────────────────────────────────────────────
    // Export
    // ─────────────────────────────────────────────────────────────────────

    /// Identity columns followed by every metric present.
    pub fn columns(&self) -> Vec<ExportColumn> {
        let mut columns = vec![
            ExportColumn::new(TECHNOLOGY_KEY, "Technology"),
            ExportColumn::new(BUILD_CYCLE_KEY, "Build Cycle"),
            ExportColumn::new(STATUS_KEY, "Status"),
            ExportColumn::new(YEAR_KEY, "Year"),
        ];
        columns.extend(
            self.available_metrics()
                .into_iter()
                .map(|name| ExportColumn::new(name.clone(), metric_label(&name))),
        );
        columns
    }

    /// Sorted rows as TSV, either the visible page or everything.
    pub fn export_tsv(&self, scope: ExportScope) -> String {
        let columns = self.columns();
        match scope {
            ExportScope::Page => to_tsv(&columns, &self.page().items),
            ExportScope::All => to_tsv(&columns, &self.sorted_rows()),
        }
    }

    /// All sorted rows as pretty JSON; pagination is ignored.
    pub fn export_json(&self) -> Result<String> {
        Ok(to_json(&self.sorted_rows())?)
    }

    /// Pivot of the selected metric as TSV.
    pub fn export_pivot_tsv(&self) -> Option<String> {
        self.pivot().map(|table| pivot_to_tsv(&table))
    }
}

/// Raw text of a row field, as written to TSV.
pub fn field_text(field: Option<FieldRef<'_>>) -> String {
    field.map(|f| f.to_string()).unwrap_or_default()
}
