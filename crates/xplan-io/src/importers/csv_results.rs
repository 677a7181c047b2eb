//! One-shot import of results spreadsheets exported as CSV.
//!
//! Headers are translated through [`COLUMN_MAP`]; fields in [`NUMERIC_FIELDS`]
//! parse as `f64` (0 on failure, recorded as a warning), everything else passes
//! through as text. Unmapped headers are ignored.
//!
//! ```csv
//! Technology,Build Cycle,Year,Status,Energy Margin ($/MW)
//! CCGT 500MW,1,2031,Selected,41250.5
//! ```

use std::fs;
use std::io::Read;
use std::path::Path;

use serde_json::{Map, Number, Value};
use tracing::{debug, info};
use xplan_core::{CalculationBasis, ImportDiagnostics, ResultRow};

use crate::api::dto::RawRecord;
use crate::api::mapping::rows_from_records;
use crate::error::ImportError;

/// Spreadsheet header -> camelCase field.
pub static COLUMN_MAP: &[(&str, &str)] = &[
    ("Technology", "technology"),
    ("Build Cycle", "buildCycle"),
    ("Year", "year"),
    ("Status", "status"),
    ("Zone", "zone"),
    ("Fuel Type", "fuelType"),
    ("Unit Type", "unitType"),
    ("Added Capacity (MW)", "addedCapacity"),
    ("Retired Capacity (MW)", "retiredCapacity"),
    ("Total Capacity (MW)", "totalCapacity"),
    ("Peak Load (MW)", "peakLoad"),
    ("Energy Demand (MWh)", "energyDemand"),
    ("Reserve Margin (%)", "reserveMargin"),
    ("LOLE (hrs/yr)", "lole"),
    ("EUE (MWh)", "eue"),
    ("System Cost ($)", "systemCost"),
    ("Capital Cost ($)", "capitalCost"),
    ("Fixed O&M Cost ($)", "fixedOmCost"),
    ("Variable O&M Cost ($)", "variableOmCost"),
    ("Fuel Cost ($)", "fuelCost"),
    ("Startup Cost ($)", "startupCost"),
    ("Emissions Cost ($)", "emissionsCost"),
    ("Generation (MWh)", "generation"),
    ("Renewable Generation (MWh)", "renewableGeneration"),
    ("Curtailment (MWh)", "curtailment"),
    ("Capacity Factor (%)", "capacityFactor"),
    ("Energy Margin ($/MW)", "energyMargin"),
    ("Capacity Value ($/MW)", "capacityValue"),
    ("Net Margin ($/MW)", "netMargin"),
    ("Levelized Cost ($/MWh)", "levelizedCost"),
    ("CO2 Emissions (tons)", "co2Emissions"),
    ("NOx Emissions (tons)", "noxEmissions"),
    ("SO2 Emissions (tons)", "so2Emissions"),
    ("Market Purchases (MWh)", "marketPurchases"),
];

/// Fields parsed as floating point.
pub static NUMERIC_FIELDS: &[&str] = &[
    "buildCycle",
    "year",
    "addedCapacity",
    "retiredCapacity",
    "totalCapacity",
    "peakLoad",
    "energyDemand",
    "reserveMargin",
    "lole",
    "eue",
    "systemCost",
    "capitalCost",
    "fixedOmCost",
    "variableOmCost",
    "fuelCost",
    "startupCost",
    "emissionsCost",
    "generation",
    "renewableGeneration",
    "curtailment",
    "capacityFactor",
    "energyMargin",
    "capacityValue",
    "netMargin",
    "levelizedCost",
    "co2Emissions",
    "noxEmissions",
    "so2Emissions",
    "marketPurchases",
];

/// Field name for a spreadsheet header, if mapped.
pub fn field_for_header(header: &str) -> Option<&'static str> {
    let header = header.trim();
    COLUMN_MAP
        .iter()
        .find(|(source, _)| *source == header)
        .map(|(_, field)| *field)
}

pub fn is_numeric_field(field: &str) -> bool {
    NUMERIC_FIELDS.contains(&field)
}

/// Records read from one spreadsheet plus what went wrong along the way.
#[derive(Debug, Clone, Default)]
pub struct CsvImport {
    pub records: Vec<RawRecord>,
    pub diagnostics: ImportDiagnostics,
}

impl CsvImport {
    /// Convert the records to result rows using the basis' metric names.
    pub fn to_result_rows(&self, basis: CalculationBasis) -> Vec<ResultRow> {
        rows_from_records(&self.records, basis.metrics())
    }

    /// Write the records as a pretty JSON array.
    pub fn write_json(&self, path: &Path) -> Result<(), ImportError> {
        let json = serde_json::to_string_pretty(&self.records)?;
        fs::write(path, json)?;
        Ok(())
    }
}

/// Import a results CSV file.
pub fn import_results_csv(path: &Path) -> Result<CsvImport, ImportError> {
    let file = fs::File::open(path)?;
    let import = parse_results_csv(file)?;
    info!(
        "Imported {} records from {} ({})",
        import.diagnostics.stats.records,
        path.display(),
        import.diagnostics.summary()
    );
    Ok(import)
}

/// Parse results CSV from any reader.
pub fn parse_results_csv<R: Read>(reader: R) -> Result<CsvImport, ImportError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    let mut diagnostics = ImportDiagnostics::new();

    let columns: Vec<Option<&'static str>> = headers.iter().map(field_for_header).collect();
    for (header, field) in headers.iter().zip(&columns) {
        if field.is_none() {
            debug!("ignoring unmapped column '{}'", header);
            diagnostics.add_warning("mapping", &format!("ignored unmapped column '{header}'"));
            diagnostics.stats.ignored_columns += 1;
        }
    }
    if !columns.contains(&Some("technology")) {
        return Err(ImportError::MissingColumn("Technology".to_string()));
    }

    let mut records = Vec::new();
    for (index, result) in reader.records().enumerate() {
        // Header is line 1.
        let line = index + 2;
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                diagnostics.add_error_at_line("csv", &e.to_string(), line);
                continue;
            }
        };

        let mut out = Map::new();
        for (value, field) in record.iter().zip(&columns) {
            let Some(field) = field else { continue };
            let value = if is_numeric_field(field) {
                Value::Number(parse_number(value, field, line, &mut diagnostics))
            } else {
                Value::String(value.to_string())
            };
            out.insert((*field).to_string(), value);
        }
        records.push(out);
    }

    diagnostics.stats.records = records.len();
    Ok(CsvImport {
        records,
        diagnostics,
    })
}

fn parse_number(
    raw: &str,
    field: &str,
    line: usize,
    diagnostics: &mut ImportDiagnostics,
) -> Number {
    let trimmed = raw.trim();
    let parsed = trimmed
        .parse::<f64>()
        .ok()
        .and_then(Number::from_f64);
    match parsed {
        Some(n) => n,
        None => {
            diagnostics.add_warning_at_line(
                "parse",
                &format!("{field}: '{trimmed}' is not a number, using 0"),
                line,
            );
            Number::from(0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;
    use xplan_core::MetricValue;

    const SAMPLE: &str = "\
Technology,Build Cycle,Year,Status,Energy Margin ($/MW),Fuel Type,Notes
CCGT 500MW,1,2031,Selected,41250.5,Gas,first pick
Wind 150MW,1,2031,Evaluated,n/a,Wind,
";

    #[test]
    fn test_column_map_size_and_targets() {
        assert_eq!(COLUMN_MAP.len(), 34);
        for field in NUMERIC_FIELDS {
            assert!(
                COLUMN_MAP.iter().any(|(_, f)| f == field),
                "{field} is numeric but never mapped"
            );
        }
        assert_eq!(field_for_header(" Energy Margin ($/MW) "), Some("energyMargin"));
        assert_eq!(field_for_header("Notes"), None);
    }

    #[test]
    fn test_parse_numeric_and_text_fields() {
        let import = parse_results_csv(SAMPLE.as_bytes()).unwrap();
        assert_eq!(import.records.len(), 2);

        let first = &import.records[0];
        assert_eq!(first["technology"], "CCGT 500MW");
        assert_eq!(first["energyMargin"], 41250.5);
        assert_eq!(first["buildCycle"], 1.0);
        assert_eq!(first["fuelType"], "Gas");
        assert!(first.get("Notes").is_none());

        // "n/a" defaults to zero and is reported.
        assert_eq!(import.records[1]["energyMargin"], 0);
        assert_eq!(import.diagnostics.stats.defaulted_values, 1);
        assert_eq!(import.diagnostics.stats.ignored_columns, 1);
    }

    #[test]
    fn test_records_become_result_rows() {
        let import = parse_results_csv(SAMPLE.as_bytes()).unwrap();
        let rows = import.to_result_rows(CalculationBasis::Yearly);

        assert_eq!(rows[0].build_cycle, 1);
        assert_eq!(rows[0].year, 2031);
        assert!(rows[0].is_selected());
        assert_eq!(
            rows[0].metric("Energy Margin"),
            Some(&MetricValue::Number(41250.5))
        );
    }

    #[test]
    fn test_missing_technology_column_fails() {
        let err = parse_results_csv("Year,Status\n2030,Selected\n".as_bytes()).unwrap_err();
        assert!(matches!(err, ImportError::MissingColumn(_)));
    }

    #[test]
    fn test_file_import_and_json_output() {
        let mut input = NamedTempFile::new().unwrap();
        write!(input, "{SAMPLE}").unwrap();

        let import = import_results_csv(input.path()).unwrap();
        let output = NamedTempFile::new().unwrap();
        import.write_json(output.path()).unwrap();

        let text = fs::read_to_string(output.path()).unwrap();
        let parsed: Vec<RawRecord> = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed.len(), 2);
        assert!(text.contains("\n  {"));
    }
}
