//! Tab-separated and JSON renderings for the clipboard.
//!
//! TSV output performs no quoting. Embedded tabs or newlines in a field end up
//! verbatim in the output and will shift columns when pasted.

use serde::Serialize;
use xplan_core::FieldLookup;

/// One exported column: the field key read from each row and its header label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportColumn {
    pub key: String,
    pub label: String,
}

impl ExportColumn {
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
        }
    }

    /// Column whose header is the key itself.
    pub fn keyed(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            label: key.clone(),
            key,
        }
    }
}

/// Header line plus one line per row, tab-joined, no trailing newline.
///
/// Missing fields are written as empty strings.
pub fn to_tsv<R: FieldLookup>(columns: &[ExportColumn], rows: &[R]) -> String {
    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(
        columns
            .iter()
            .map(|c| c.label.as_str())
            .collect::<Vec<_>>()
            .join("\t"),
    );
    for row in rows {
        let fields: Vec<String> = columns
            .iter()
            .map(|c| row.field(&c.key).map(|f| f.to_string()).unwrap_or_default())
            .collect();
        lines.push(fields.join("\t"));
    }
    lines.join("\n")
}

/// Pretty JSON with two-space indentation.
pub fn to_json<T: Serialize>(rows: &[T]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use xplan_core::{FieldRef, ResultRow};

    struct Pair {
        a: f64,
        b: &'static str,
    }

    impl FieldLookup for Pair {
        fn field(&self, key: &str) -> Option<FieldRef<'_>> {
            match key {
                "a" => Some(FieldRef::Number(self.a)),
                "b" => Some(FieldRef::Text(self.b)),
                _ => None,
            }
        }
    }

    #[test]
    fn test_tsv_header_and_rows() {
        let rows = [Pair { a: 1.0, b: "x" }, Pair { a: 2.0, b: "y" }];
        let columns = [ExportColumn::keyed("a"), ExportColumn::keyed("b")];
        assert_eq!(to_tsv(&columns, &rows), "a\tb\n1\tx\n2\ty");
    }

    #[test]
    fn test_tsv_does_not_escape() {
        let rows = [Pair {
            a: 0.5,
            b: "tab\there",
        }];
        let columns = [ExportColumn::new("b", "B"), ExportColumn::new("missing", "M")];
        assert_eq!(to_tsv(&columns, &rows), "B\tM\ntab\there\t");
    }

    #[test]
    fn test_tsv_uses_labels_and_row_fields() {
        let rows = vec![ResultRow::new("Wind 150MW", 2, 2032)
            .with_status("Selected")
            .with_metric("Generation", 1250.25)];
        let columns = [
            ExportColumn::new("technology", "Technology"),
            ExportColumn::new("buildCycle", "Build Cycle"),
            ExportColumn::new("Generation", "Generation (MWh)"),
        ];
        assert_eq!(
            to_tsv(&columns, &rows),
            "Technology\tBuild Cycle\tGeneration (MWh)\nWind 150MW\t2\t1250.25"
        );
    }

    #[test]
    fn test_json_is_pretty() {
        let rows = vec![ResultRow::new("CT", 1, 2031).with_metric("Zone", "North")];
        let json = to_json(&rows).unwrap();
        assert!(json.starts_with("[\n  {\n    \"technology\": \"CT\""));
        assert!(json.contains("\"buildCycle\": 1"));
        assert!(json.contains("\"Zone\": \"North\""));
    }

    #[test]
    fn test_empty_rows_only_header() {
        let rows: Vec<ResultRow> = Vec::new();
        assert_eq!(to_tsv(&[ExportColumn::keyed("year")], &rows), "year");
        assert_eq!(to_json(&rows).unwrap(), "[]");
    }
}
