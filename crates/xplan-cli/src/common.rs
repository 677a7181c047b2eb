//! Common CLI types and utilities shared across commands.

use clap::ValueEnum;
use serde::Serialize;
use std::io::{self, Write};
use xplan_core::{format_metric_value, CalculationBasis, FieldRef};
use xplan_ui_common::{ExportFormat, Resolution};

/// Output format for row-shaped data.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable aligned table
    #[default]
    Table,
    /// Pretty JSON array (all rows, sort order)
    Json,
    /// Tab-separated values, ready for a spreadsheet
    Tsv,
}

impl OutputFormat {
    /// Returns true if this format is machine-readable (suitable for piping)
    pub fn is_machine_readable(&self) -> bool {
        matches!(self, Self::Json | Self::Tsv)
    }
}

impl From<ExportFormat> for OutputFormat {
    fn from(format: ExportFormat) -> Self {
        match format {
            ExportFormat::Tsv => Self::Tsv,
            ExportFormat::Json => Self::Json,
        }
    }
}

/// Output format for pivots.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PivotFormat {
    /// Abbreviated values in an aligned grid
    #[default]
    Table,
    /// Raw values as tab-separated text
    Tsv,
}

/// Calculation basis.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BasisArg {
    /// Undiscounted yearly values
    #[default]
    Yearly,
    /// Discounted net present values
    Npv,
}

impl From<BasisArg> for CalculationBasis {
    fn from(arg: BasisArg) -> Self {
        match arg {
            BasisArg::Yearly => CalculationBasis::Yearly,
            BasisArg::Npv => CalculationBasis::Npv,
        }
    }
}

/// Write data as JSON to the given writer.
pub fn write_json<W: Write, T: Serialize>(
    data: &T,
    writer: &mut W,
    pretty: bool,
) -> io::Result<()> {
    if pretty {
        serde_json::to_writer_pretty(&mut *writer, data).map_err(io::Error::other)?;
    } else {
        serde_json::to_writer(&mut *writer, data).map_err(io::Error::other)?;
    }
    writeln!(writer)?;
    Ok(())
}

/// Display text for a table cell: numbers abbreviated, text verbatim.
pub fn display_field(field: Option<FieldRef<'_>>) -> String {
    match field {
        Some(FieldRef::Number(v)) => format_metric_value(v),
        Some(FieldRef::Text(s)) => s.to_string(),
        None => String::new(),
    }
}

/// Stderr notice shown whenever synthetic rows are on screen.
pub fn demo_notice(resolution: &Resolution) -> Option<String> {
    if !resolution.origin.is_synthetic() {
        return None;
    }
    let reason = match &resolution.error {
        Some(message) => format!("backend unavailable: {message}"),
        None => "no results for this query".to_string(),
    };
    Some(format!("note: showing demo data ({reason})"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use xplan_core::ResultQuery;
    use xplan_io::ApiError;

    #[test]
    fn display_field_abbreviates_numbers() {
        assert_eq!(display_field(Some(FieldRef::Number(0.0))), "0");
        assert_eq!(display_field(Some(FieldRef::Text("Gas"))), "Gas");
        assert_eq!(display_field(None), "");
    }

    #[test]
    fn demo_notice_only_for_synthetic_rows() {
        let query = ResultQuery::new(5, CalculationBasis::Yearly);

        let live = Resolution::settle(
            query.clone(),
            Ok(vec![xplan_core::ResultRow::new("Wind", 1, 2031)]),
        );
        assert_eq!(demo_notice(&live), None);

        let empty = Resolution::settle(query.clone(), Ok(Vec::new()));
        assert!(demo_notice(&empty).unwrap().contains("no results"));

        let failed = Resolution::settle(
            query,
            Err(ApiError::Status {
                status: 500,
                message: "boom".into(),
            }),
        );
        assert!(demo_notice(&failed).unwrap().contains("backend unavailable"));
    }
}
