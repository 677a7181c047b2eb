//! Prior-cycle baseline for pivot metrics.
//!
//! The baseline of build cycle `c` is the value held by the technology selected
//! in cycle `c - 1`. When several technologies are marked selected in that cycle,
//! the first in pivot column order wins.

use crate::pivot::{PivotCell, PivotTable};

/// Technology selected in `build_cycle`, first in column order.
pub fn selected_technology(pivot: &PivotTable, build_cycle: u32) -> Option<&str> {
    pivot
        .technologies
        .iter()
        .find(|tech| {
            pivot
                .cell(build_cycle, tech)
                .is_some_and(PivotCell::is_selected)
        })
        .map(String::as_str)
}

/// Baseline value for `build_cycle`.
///
/// `None` for cycle 0, for metrics without baseline comparison, when nothing was
/// selected in the prior cycle, or when the selected cell is not numeric.
pub fn baseline(pivot: &PivotTable, build_cycle: u32) -> Option<f64> {
    if build_cycle == 0 || !pivot.has_baseline {
        return None;
    }
    let previous = build_cycle - 1;
    let tech = selected_technology(pivot, previous)?;
    pivot.cell(previous, tech)?.as_f64()
}

/// `value - baseline` for one cell, when both are numeric.
pub fn baseline_delta(pivot: &PivotTable, build_cycle: u32, technology: &str) -> Option<f64> {
    let value = pivot.cell(build_cycle, technology)?.as_f64()?;
    Some(value - baseline(pivot, build_cycle)?)
}
