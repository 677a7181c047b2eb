//! Clipboard-ready exports of table and pivot data.

pub mod clipboard;

pub use clipboard::{to_json, to_tsv, ExportColumn};
