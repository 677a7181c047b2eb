//! Diagnostics collected while importing or mapping result data.
//!
//! Bad input never aborts an import: unparseable numbers are coerced to a
//! default and recorded here so callers can report them.
//!
//! # Example
//!
//! ```
//! use xplan_core::diagnostics::ImportDiagnostics;
//!
//! let mut diag = ImportDiagnostics::new();
//! diag.add_warning_at_line("parse", "Fuel Cost: 'n/a' is not a number, using 0", 7);
//! assert_eq!(diag.warning_count(), 1);
//! assert_eq!(diag.stats.defaulted_values, 1);
//! ```

use serde::Serialize;

/// Severity level for diagnostic issues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Unusual but operation continued (e.g., defaulted value)
    Warning,
    /// Could not complete element/operation (e.g., malformed record)
    Error,
}

/// A single diagnostic issue
#[derive(Debug, Clone, Serialize)]
pub struct DiagnosticIssue {
    pub severity: Severity,
    /// Category for grouping (e.g., "parse", "mapping")
    pub category: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
}

impl DiagnosticIssue {
    pub fn new(
        severity: Severity,
        category: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            category: category.into(),
            message: message.into(),
            line: None,
        }
    }

    pub fn with_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }
}

impl std::fmt::Display for DiagnosticIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let severity = match self.severity {
            Severity::Warning => "warning",
            Severity::Error => "error",
        };

        write!(f, "[{}:{}] {}", severity, self.category, self.message)?;
        if let Some(line) = self.line {
            write!(f, " at line {}", line)?;
        }
        Ok(())
    }
}

/// Counters for an import run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ImportStats {
    pub records: usize,
    pub skipped_records: usize,
    pub defaulted_values: usize,
    pub ignored_columns: usize,
}

/// Statistics plus issues for one import.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ImportDiagnostics {
    pub stats: ImportStats,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub issues: Vec<DiagnosticIssue>,
}

impl ImportDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_warning(&mut self, category: &str, message: &str) {
        self.issues
            .push(DiagnosticIssue::new(Severity::Warning, category, message));
    }

    /// Add a warning with line number (increments defaulted_values counter)
    pub fn add_warning_at_line(&mut self, category: &str, message: &str, line: usize) {
        self.issues
            .push(DiagnosticIssue::new(Severity::Warning, category, message).with_line(line));
        self.stats.defaulted_values += 1;
    }

    /// Add an error with line number (increments skipped_records counter)
    pub fn add_error_at_line(&mut self, category: &str, message: &str, line: usize) {
        self.issues
            .push(DiagnosticIssue::new(Severity::Error, category, message).with_line(line));
        self.stats.skipped_records += 1;
    }

    pub fn warning_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == Severity::Warning)
            .count()
    }

    pub fn error_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == Severity::Error)
            .count()
    }

    pub fn has_errors(&self) -> bool {
        self.issues.iter().any(|i| i.severity == Severity::Error)
    }

    pub fn summary(&self) -> String {
        let warnings = self.warning_count();
        let errors = self.error_count();
        let plural = |n: usize| if n == 1 { "" } else { "s" };

        match (warnings, errors) {
            (0, 0) => "No issues".to_string(),
            (w, 0) => format!("{} warning{}", w, plural(w)),
            (0, e) => format!("{} error{}", e, plural(e)),
            (w, e) => format!("{} warning{}, {} error{}", w, plural(w), e, plural(e)),
        }
    }
}

impl std::fmt::Display for ImportDiagnostics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "Imported {} records: {}",
            self.stats.records,
            self.summary()
        )?;
        for issue in &self.issues {
            writeln!(f, "  {}", issue)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_follow_issues() {
        let mut diag = ImportDiagnostics::new();
        diag.add_warning_at_line("parse", "bad number", 3);
        diag.add_error_at_line("csv", "unequal field count", 9);
        diag.add_warning("mapping", "unknown column 'Notes'");

        assert_eq!(diag.stats.defaulted_values, 1);
        assert_eq!(diag.stats.skipped_records, 1);
        assert_eq!(diag.summary(), "2 warnings, 1 error");
        assert!(diag.has_errors());
    }

    #[test]
    fn test_issue_display() {
        let issue = DiagnosticIssue::new(Severity::Warning, "parse", "bad number").with_line(4);
        assert_eq!(issue.to_string(), "[warning:parse] bad number at line 4");
    }
}
