//! File importers.

pub mod csv_results;

pub use csv_results::{import_results_csv, parse_results_csv, CsvImport, COLUMN_MAP, NUMERIC_FIELDS};
