//! Flat result rows emitted by a study result set.
//!
//! Every result endpoint (yearly, NPV, unit changes) and the CSV importer end up
//! producing [`ResultRow`]s: four fixed identity fields plus an open-ended bag of
//! named metrics. Metric sets differ per result type and grow with the data, so
//! they live in a [`MetricBag`] rather than in struct fields.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Row field key for the technology identifier.
pub const TECHNOLOGY_KEY: &str = "technology";
/// Row field key for the build cycle.
pub const BUILD_CYCLE_KEY: &str = "buildCycle";
/// Row field key for the status text.
pub const STATUS_KEY: &str = "status";
/// Row field key for the study year.
pub const YEAR_KEY: &str = "year";

/// Substring marking a technology the solver picked in a cycle.
pub const SELECTED_MARKER: &str = "Selected";

/// A single metric value: either numeric or categorical.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    Number(f64),
    Text(String),
}

impl MetricValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            MetricValue::Number(v) => Some(*v),
            MetricValue::Text(_) => None,
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, MetricValue::Number(_))
    }

    /// Borrow as a comparable field reference.
    pub fn as_field(&self) -> FieldRef<'_> {
        match self {
            MetricValue::Number(v) => FieldRef::Number(*v),
            MetricValue::Text(s) => FieldRef::Text(s),
        }
    }
}

impl From<f64> for MetricValue {
    fn from(v: f64) -> Self {
        MetricValue::Number(v)
    }
}

impl From<&str> for MetricValue {
    fn from(s: &str) -> Self {
        MetricValue::Text(s.to_string())
    }
}

impl From<String> for MetricValue {
    fn from(s: String) -> Self {
        MetricValue::Text(s)
    }
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.as_field().fmt(f)
    }
}

/// Named metric bag keyed by display metric name.
pub type MetricBag = BTreeMap<String, MetricValue>;

/// Borrowed view of a single row field, used by sorting and export.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldRef<'a> {
    Number(f64),
    Text(&'a str),
}

impl fmt::Display for FieldRef<'_> {
    /// Raw (unabbreviated) rendering: integral numbers print without a fraction.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldRef::Number(v) if v.fract() == 0.0 && v.abs() < 1e15 => {
                write!(f, "{}", *v as i64)
            }
            FieldRef::Number(v) => write!(f, "{}", v),
            FieldRef::Text(s) => f.write_str(s),
        }
    }
}

/// Anything that exposes named fields to the sort and export engines.
pub trait FieldLookup {
    fn field(&self, key: &str) -> Option<FieldRef<'_>>;
}

impl<T: FieldLookup + ?Sized> FieldLookup for &T {
    fn field(&self, key: &str) -> Option<FieldRef<'_>> {
        (**self).field(key)
    }
}

/// Canonical flat record of one solver/NPV/unit result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultRow {
    /// Candidate/unit combination identifier.
    pub technology: String,
    pub build_cycle: u32,
    /// Free text; contains "Selected" when the technology was chosen in this cycle.
    #[serde(default)]
    pub status: String,
    pub year: i32,
    #[serde(flatten)]
    pub metrics: MetricBag,
}

impl ResultRow {
    pub fn new(technology: impl Into<String>, build_cycle: u32, year: i32) -> Self {
        Self {
            technology: technology.into(),
            build_cycle,
            status: String::new(),
            year,
            metrics: MetricBag::new(),
        }
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }

    pub fn with_metric(mut self, name: impl Into<String>, value: impl Into<MetricValue>) -> Self {
        self.metrics.insert(name.into(), value.into());
        self
    }

    /// Value of a named metric; `None` means null.
    pub fn metric(&self, name: &str) -> Option<&MetricValue> {
        self.metrics.get(name)
    }

    pub fn is_selected(&self) -> bool {
        self.status.contains(SELECTED_MARKER)
    }
}

impl FieldLookup for ResultRow {
    fn field(&self, key: &str) -> Option<FieldRef<'_>> {
        match key {
            TECHNOLOGY_KEY => Some(FieldRef::Text(&self.technology)),
            BUILD_CYCLE_KEY => Some(FieldRef::Number(f64::from(self.build_cycle))),
            STATUS_KEY => Some(FieldRef::Text(&self.status)),
            YEAR_KEY => Some(FieldRef::Number(f64::from(self.year))),
            other => self.metrics.get(other).map(MetricValue::as_field),
        }
    }
}
