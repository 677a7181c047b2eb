//! Result query descriptors.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::metrics::CalculationBasis;

/// Which results to fetch: scenario, basis and optional filters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResultQuery {
    pub scenario_id: i64,
    pub basis: CalculationBasis,
    pub year: Option<i32>,
    pub iteration: Option<u32>,
}

impl ResultQuery {
    pub fn new(scenario_id: i64, basis: CalculationBasis) -> Self {
        Self {
            scenario_id,
            basis,
            year: None,
            iteration: None,
        }
    }

    pub fn with_year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    pub fn with_iteration(mut self, iteration: u32) -> Self {
        self.iteration = Some(iteration);
        self
    }

    /// Identity used for last-query-wins comparison.
    pub fn key(&self) -> QueryKey {
        QueryKey {
            scenario_id: self.scenario_id,
            basis: self.basis,
        }
    }
}

/// `(scenario, basis)` pair; at most one fetch per key is meaningful at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QueryKey {
    pub scenario_id: i64,
    pub basis: CalculationBasis,
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "scenario {} ({})", self.scenario_id, self.basis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_ignores_filters() {
        let a = ResultQuery::new(5, CalculationBasis::Yearly).with_year(2030);
        let b = ResultQuery::new(5, CalculationBasis::Yearly).with_iteration(3);
        assert_eq!(a.key(), b.key());
        assert_ne!(a.key(), ResultQuery::new(5, CalculationBasis::Npv).key());
        assert_eq!(a.key().to_string(), "scenario 5 (Yearly)");
    }
}
