//! Build cycle x technology pivot of one metric.
//!
//! Rows become build cycles, technologies become columns, and each cell carries
//! the metric value plus the row status (needed for baseline lookups). Pairs
//! absent from the source rows have no cell; nothing is zero-filled.

use std::collections::{BTreeSet, HashMap};

use serde::Serialize;
use xplan_core::{
    find_descriptor, format_metric_value, short_technology_label, FieldLookup, FieldRef,
    MetricValue, ResultRow, BUILD_CYCLE_KEY, SELECTED_MARKER,
};

use crate::sorting::{locale_compare, sort_rows, SortConfig};

/// Whether a metric can be plotted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MetricKind {
    Numeric,
    Categorical,
}

/// Kind of `metric`, decided by its first non-null occurrence in row order.
///
/// A metric that never occurs is categorical.
pub fn metric_kind(rows: &[ResultRow], metric: &str) -> MetricKind {
    match rows.iter().find_map(|row| row.metric(metric)) {
        Some(value) if value.is_numeric() => MetricKind::Numeric,
        _ => MetricKind::Categorical,
    }
}

/// One pivot cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PivotCell {
    /// `None` when the row had no value for the metric.
    pub value: Option<MetricValue>,
    pub status: String,
}

impl PivotCell {
    pub fn is_selected(&self) -> bool {
        self.status.contains(SELECTED_MARKER)
    }

    pub fn as_f64(&self) -> Option<f64> {
        self.value.as_ref().and_then(MetricValue::as_f64)
    }

    /// Abbreviated display text; empty for null.
    pub fn display(&self) -> String {
        match &self.value {
            Some(MetricValue::Number(v)) => format_metric_value(*v),
            Some(MetricValue::Text(s)) => s.clone(),
            None => String::new(),
        }
    }
}

/// Pivoted view of one metric.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PivotTable {
    pub metric: String,
    pub has_baseline: bool,
    pub kind: MetricKind,
    /// Row order; ascending unless a sort was applied.
    pub build_cycles: Vec<u32>,
    /// Column order: case-insensitive by short label, then full id.
    pub technologies: Vec<String>,
    #[serde(skip)]
    cells: HashMap<u32, HashMap<String, PivotCell>>,
}

impl PivotTable {
    pub fn cell(&self, build_cycle: u32, technology: &str) -> Option<&PivotCell> {
        self.cells.get(&build_cycle)?.get(technology)
    }

    pub fn cell_count(&self) -> usize {
        self.cells.values().map(HashMap::len).sum()
    }

    pub fn is_chartable(&self) -> bool {
        self.kind == MetricKind::Numeric
    }

    /// Cells of one build cycle in column order.
    pub fn row(&self, build_cycle: u32) -> Vec<Option<&PivotCell>> {
        self.technologies
            .iter()
            .map(|tech| self.cell(build_cycle, tech))
            .collect()
    }

    /// Reorder build cycles; unsorted means ascending cycle order.
    pub fn sort_cycles(&mut self, config: &SortConfig) {
        self.build_cycles.sort_unstable();
        if !config.is_active() {
            return;
        }
        let order: Vec<u32> = {
            let mut views: Vec<CycleView<'_>> = self
                .build_cycles
                .iter()
                .map(|&cycle| CycleView { table: self, cycle })
                .collect();
            sort_rows(&mut views, config);
            views.iter().map(|v| v.cycle).collect()
        };
        self.build_cycles = order;
    }

    /// Numeric series per technology for charting; empty for categorical metrics.
    pub fn chart_series(&self) -> Vec<ChartSeries> {
        if !self.is_chartable() {
            return Vec::new();
        }
        self.technologies
            .iter()
            .map(|tech| ChartSeries {
                technology: tech.clone(),
                label: short_technology_label(tech),
                points: self
                    .build_cycles
                    .iter()
                    .filter_map(|&cycle| {
                        self.cell(cycle, tech)
                            .and_then(PivotCell::as_f64)
                            .map(|v| (cycle, v))
                    })
                    .collect(),
            })
            .collect()
    }
}

/// One technology's values across build cycles.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub technology: String,
    pub label: String,
    pub points: Vec<(u32, f64)>,
}

/// A pivot row seen through [`FieldLookup`]: `buildCycle` or a technology column.
struct CycleView<'a> {
    table: &'a PivotTable,
    cycle: u32,
}

impl FieldLookup for CycleView<'_> {
    fn field(&self, key: &str) -> Option<FieldRef<'_>> {
        if key == BUILD_CYCLE_KEY {
            return Some(FieldRef::Number(f64::from(self.cycle)));
        }
        self.table
            .cell(self.cycle, key)
            .and_then(|cell| cell.value.as_ref())
            .map(MetricValue::as_field)
    }
}

/// Pivot `rows` on `metric` with ascending build cycles.
pub fn pivot(rows: &[ResultRow], metric: &str) -> PivotTable {
    let mut cycles = BTreeSet::new();
    let mut technologies = BTreeSet::new();
    let mut cells: HashMap<u32, HashMap<String, PivotCell>> = HashMap::new();

    for row in rows {
        cycles.insert(row.build_cycle);
        technologies.insert(row.technology.as_str());
        // Duplicate (cycle, technology) pairs: the later row wins.
        cells.entry(row.build_cycle).or_default().insert(
            row.technology.clone(),
            PivotCell {
                value: row.metric(metric).cloned(),
                status: row.status.clone(),
            },
        );
    }

    let mut technologies: Vec<(String, &str)> = technologies
        .into_iter()
        .map(|tech| (short_technology_label(tech), tech))
        .collect();
    technologies.sort_by(|(a_label, a), (b_label, b)| {
        locale_compare(a_label, b_label).then_with(|| a.cmp(b))
    });

    PivotTable {
        metric: metric.to_string(),
        has_baseline: find_descriptor(metric).is_some_and(|d| d.has_baseline),
        kind: metric_kind(rows, metric),
        build_cycles: cycles.into_iter().collect(),
        technologies: technologies
            .into_iter()
            .map(|(_, tech)| tech.to_string())
            .collect(),
        cells,
    }
}

/// Pivot and apply a build-cycle sort in one step.
pub fn pivot_sorted(rows: &[ResultRow], metric: &str, sort: &SortConfig) -> PivotTable {
    let mut table = pivot(rows, metric);
    table.sort_cycles(sort);
    table
}
