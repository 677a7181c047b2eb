//! Column sorting for result tables and pivot build-cycle order.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use xplan_core::{FieldLookup, FieldRef, BUILD_CYCLE_KEY};

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn reversed(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

/// Active sort column, or none for source order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SortConfig {
    pub key: Option<String>,
    pub direction: SortDirection,
}

impl SortConfig {
    pub fn unsorted() -> Self {
        Self::default()
    }

    pub fn ascending(key: impl Into<String>) -> Self {
        Self {
            key: Some(key.into()),
            direction: SortDirection::Asc,
        }
    }

    pub fn descending(key: impl Into<String>) -> Self {
        Self {
            key: Some(key.into()),
            direction: SortDirection::Desc,
        }
    }

    pub fn is_active(&self) -> bool {
        self.key.is_some()
    }

    pub fn is_sorted_by(&self, key: &str) -> bool {
        self.key.as_deref() == Some(key)
    }

    /// Header click on a table: new key ascending, then descending, then unsorted.
    pub fn toggle(&self, key: &str) -> Self {
        match (&self.key, self.direction) {
            (Some(current), SortDirection::Asc) if current == key => Self::descending(key),
            (Some(current), SortDirection::Desc) if current == key => Self::unsorted(),
            _ => Self::ascending(key),
        }
    }

    /// Header click on a pivot: like [`toggle`](Self::toggle) but the third
    /// state is ascending build-cycle order.
    pub fn toggle_pivot(&self, key: &str) -> Self {
        match self.toggle(key) {
            next if next.is_active() => next,
            _ => Self::ascending(BUILD_CYCLE_KEY),
        }
    }
}

/// Case-folded string order; on case-only ties lowercase sorts first.
pub fn locale_compare(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| b.cmp(a))
}

/// Ascending order of two present values.
///
/// Numbers compare numerically; any other pairing compares as text.
pub fn compare_values(a: FieldRef<'_>, b: FieldRef<'_>) -> Ordering {
    match (a, b) {
        (FieldRef::Number(x), FieldRef::Number(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        (FieldRef::Text(x), FieldRef::Text(y)) => locale_compare(x, y),
        (a, b) => locale_compare(&a.to_string(), &b.to_string()),
    }
}

/// Order two optional values in `direction`; missing values always sort last.
pub fn compare_fields(
    a: Option<FieldRef<'_>>,
    b: Option<FieldRef<'_>>,
    direction: SortDirection,
) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => match direction {
            SortDirection::Asc => compare_values(a, b),
            SortDirection::Desc => compare_values(b, a),
        },
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Stable in-place sort; an unsorted config leaves the order untouched.
pub fn sort_rows<R: FieldLookup>(rows: &mut [R], config: &SortConfig) {
    let Some(key) = config.key.as_deref() else {
        return;
    };
    rows.sort_by(|a, b| compare_fields(a.field(key), b.field(key), config.direction));
}

/// Sorted references to `rows`, leaving the source untouched.
pub fn sorted_refs<'a, R: FieldLookup>(rows: &'a [R], config: &SortConfig) -> Vec<&'a R> {
    let mut refs: Vec<&R> = rows.iter().collect();
    sort_rows(&mut refs, config);
    refs
}

#[cfg(test)]
mod tests {
    use super::*;
    use xplan_core::ResultRow;

    fn rows() -> Vec<ResultRow> {
        vec![
            ResultRow::new("wind", 1, 2031).with_metric("Cost", 30.0),
            ResultRow::new("Solar", 2, 2032).with_metric("Cost", 10.0),
            ResultRow::new("ccgt", 3, 2033).with_metric("Cost", 30.0),
            ResultRow::new("Battery", 4, 2034),
            ResultRow::new("CT", 5, 2035).with_metric("Cost", 20.0),
        ]
    }

    fn cycles(rows: &[ResultRow]) -> Vec<u32> {
        rows.iter().map(|r| r.build_cycle).collect()
    }

    #[test]
    fn test_numeric_sort_is_stable_and_missing_last() {
        let mut data = rows();
        sort_rows(&mut data, &SortConfig::ascending("Cost"));
        assert_eq!(cycles(&data), vec![2, 5, 1, 3, 4]);

        let mut data = rows();
        sort_rows(&mut data, &SortConfig::descending("Cost"));
        assert_eq!(cycles(&data), vec![1, 3, 5, 2, 4]);
    }

    #[test]
    fn test_text_sort_is_case_insensitive() {
        let mut data = rows();
        sort_rows(&mut data, &SortConfig::ascending("technology"));
        let names: Vec<_> = data.iter().map(|r| r.technology.as_str()).collect();
        assert_eq!(names, vec!["Battery", "ccgt", "CT", "Solar", "wind"]);
    }

    #[test]
    fn test_mixed_values_compare_as_text() {
        assert_eq!(
            compare_values(FieldRef::Number(10.0), FieldRef::Text("9")),
            Ordering::Less
        );
        assert_eq!(locale_compare("a", "A"), Ordering::Less);
    }

    #[test]
    fn test_three_clicks_restore_original_order() {
        let original = rows();
        let mut config = SortConfig::unsorted();
        for _ in 0..3 {
            config = config.toggle("Cost");
        }
        assert_eq!(config, SortConfig::unsorted());

        let mut data = original.clone();
        sort_rows(&mut data, &config);
        assert_eq!(data, original);
    }

    #[test]
    fn test_toggle_states() {
        let asc = SortConfig::unsorted().toggle("year");
        assert_eq!(asc, SortConfig::ascending("year"));
        let desc = asc.toggle("year");
        assert_eq!(desc, SortConfig::descending("year"));
        assert_eq!(desc.toggle("Cost"), SortConfig::ascending("Cost"));
    }

    #[test]
    fn test_pivot_toggle_falls_back_to_build_cycle() {
        let config = SortConfig::unsorted().toggle_pivot("Wind").toggle_pivot("Wind");
        assert_eq!(config, SortConfig::descending("Wind"));
        assert_eq!(
            config.toggle_pivot("Wind"),
            SortConfig::ascending(BUILD_CYCLE_KEY)
        );
    }

    #[test]
    fn test_sorted_refs_leaves_source_alone() {
        let data = rows();
        let sorted = sorted_refs(&data, &SortConfig::descending("buildCycle"));
        assert_eq!(sorted[0].build_cycle, 5);
        assert_eq!(data[0].build_cycle, 1);
    }
}
