//! DTO -> [`ResultRow`] mapping.
//!
//! Backend rows and imported spreadsheet records share one shape: a flat JSON
//! object with camelCase keys. Identity fields are pulled out, every other key
//! becomes a metric named by the catalog (or by its raw key when the catalog does
//! not know it). Bad input never fails the mapping.

use serde_json::Value;
use xplan_core::{find_by_key, MetricBag, MetricDescriptor, MetricValue, ResultRow};

use super::dto::RawRecord;

const TECHNOLOGY_FIELDS: &[&str] = &["technology", "candidateUnit", "unitName"];
const BUILD_CYCLE_FIELDS: &[&str] = &["buildCycle", "iteration"];
const IDENTITY_FIELDS: &[&str] = &[
    "technology",
    "candidateUnit",
    "unitName",
    "buildCycle",
    "iteration",
    "status",
    "year",
];

/// Label used when a record carries no technology identifier.
pub const UNKNOWN_TECHNOLOGY: &str = "Unknown";

/// Map one record onto a result row using `catalog` for metric names.
pub fn row_from_record(record: &RawRecord, catalog: &[MetricDescriptor]) -> ResultRow {
    let technology = TECHNOLOGY_FIELDS
        .iter()
        .find_map(|key| record.get(*key).and_then(as_text))
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| UNKNOWN_TECHNOLOGY.to_string());

    let build_cycle = BUILD_CYCLE_FIELDS
        .iter()
        .find_map(|key| record.get(*key).and_then(as_number))
        .filter(|v| *v >= 0.0)
        .map(|v| v as u32)
        .unwrap_or(0);

    let year = record
        .get("year")
        .and_then(as_number)
        .map(|v| v as i32)
        .unwrap_or(0);

    let status = record.get("status").and_then(as_text).unwrap_or_default();

    let mut metrics = MetricBag::new();
    for (key, value) in record {
        if IDENTITY_FIELDS.contains(&key.as_str()) {
            continue;
        }
        let Some(value) = metric_value(value) else {
            continue;
        };
        let name = find_by_key(catalog, key).map_or(key.as_str(), |d| d.name);
        metrics.insert(name.to_string(), value);
    }

    ResultRow {
        technology,
        build_cycle,
        status,
        year,
        metrics,
    }
}

/// Map every record; order is preserved.
pub fn rows_from_records(records: &[RawRecord], catalog: &[MetricDescriptor]) -> Vec<ResultRow> {
    records
        .iter()
        .map(|record| row_from_record(record, catalog))
        .collect()
}

fn metric_value(value: &Value) -> Option<MetricValue> {
    match value {
        Value::Number(n) => n.as_f64().map(MetricValue::Number),
        Value::String(s) => Some(MetricValue::Text(s.clone())),
        Value::Bool(b) => Some(MetricValue::Text(b.to_string())),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use xplan_core::{NPV_METRICS, UNIT_CHANGE_METRICS, YEARLY_METRICS};

    fn record(value: Value) -> RawRecord {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_yearly_row_mapping() {
        let rec = record(json!({
            "technology": "CCGT 500MW",
            "buildCycle": 2,
            "year": 2031,
            "status": "Selected",
            "addedCapacity": 500,
            "fuelType": "Gas",
            "eue": null,
            "customField": 1.5
        }));

        let row = row_from_record(&rec, YEARLY_METRICS);
        assert_eq!(row.technology, "CCGT 500MW");
        assert_eq!(row.build_cycle, 2);
        assert_eq!(row.year, 2031);
        assert!(row.is_selected());
        assert_eq!(row.metric("Added Capacity"), Some(&MetricValue::Number(500.0)));
        assert_eq!(row.metric("Fuel Type"), Some(&MetricValue::Text("Gas".into())));
        assert_eq!(row.metric("EUE"), None);
        assert_eq!(row.metric("customField"), Some(&MetricValue::Number(1.5)));
        assert!(row.metric("technology").is_none());
    }

    #[test]
    fn test_npv_names_come_from_npv_catalog() {
        let rec = record(json!({
            "technology": "Wind", "iteration": "3", "year": "2033",
            "fuelCost": 10.0, "npvFuelCost": 7.5
        }));
        let row = row_from_record(&rec, NPV_METRICS);
        assert_eq!(row.build_cycle, 3);
        assert_eq!(row.year, 2033);
        assert_eq!(row.metric("NPV Fuel Cost"), Some(&MetricValue::Number(7.5)));
        assert_eq!(row.metric("Fuel Cost"), Some(&MetricValue::Number(10.0)));
    }

    #[test]
    fn test_unit_rows_use_unit_name() {
        let rec = record(json!({
            "unitName": "Coal 2", "year": 2035, "capacityRemoved": 350
        }));
        let row = row_from_record(&rec, UNIT_CHANGE_METRICS);
        assert_eq!(row.technology, "Coal 2");
        assert_eq!(row.build_cycle, 0);
        assert_eq!(row.metric("Capacity Removed"), Some(&MetricValue::Number(350.0)));
    }

    #[test]
    fn test_garbage_identity_fields_default() {
        let rec = record(json!({ "buildCycle": -4, "year": "soon", "status": 7 }));
        let row = row_from_record(&rec, YEARLY_METRICS);
        assert_eq!(row.technology, UNKNOWN_TECHNOLOGY);
        assert_eq!(row.build_cycle, 0);
        assert_eq!(row.year, 0);
        assert_eq!(row.status, "7");
    }
}
