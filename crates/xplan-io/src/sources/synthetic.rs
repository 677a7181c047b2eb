//! Deterministic demo results shown when the backend has nothing to offer.
//!
//! Five candidate technologies are evaluated over five build cycles; exactly one
//! is marked selected per cycle. The generator is seeded per calculation basis so
//! repeated calls return identical rows.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use xplan_core::{CalculationBasis, ResultRow};

/// Build cycles in the demo plan (1-based).
pub const DEMO_CYCLES: u32 = 5;
/// Study year of cycle 0; cycle `c` lands in `DEMO_BASE_YEAR + c`.
pub const DEMO_BASE_YEAR: i32 = 2030;
/// Discount rate used for the NPV flavour.
pub const DEMO_DISCOUNT_RATE: f64 = 0.07;

const YEARLY_SEED: u64 = 0x5EED_0001;
const NPV_SEED: u64 = 0x5EED_0002;

struct Candidate {
    name: &'static str,
    capacity_mw: f64,
    capital_per_mw: f64,
    capacity_factor: f64,
    fuel_per_mwh: f64,
    co2_per_mwh: f64,
    fuel_type: &'static str,
    zone: &'static str,
}

const CANDIDATES: &[Candidate] = &[
    Candidate {
        name: "CCGT 500MW",
        capacity_mw: 500.0,
        capital_per_mw: 1_100_000.0,
        capacity_factor: 0.55,
        fuel_per_mwh: 24.0,
        co2_per_mwh: 0.37,
        fuel_type: "Gas",
        zone: "North",
    },
    Candidate {
        name: "CT Aero 100MW",
        capacity_mw: 100.0,
        capital_per_mw: 900_000.0,
        capacity_factor: 0.08,
        fuel_per_mwh: 38.0,
        co2_per_mwh: 0.55,
        fuel_type: "Gas",
        zone: "South",
    },
    Candidate {
        name: "Solar PV 100MW",
        capacity_mw: 100.0,
        capital_per_mw: 1_000_000.0,
        capacity_factor: 0.25,
        fuel_per_mwh: 0.0,
        co2_per_mwh: 0.0,
        fuel_type: "Solar",
        zone: "South",
    },
    Candidate {
        name: "Wind 150MW",
        capacity_mw: 150.0,
        capital_per_mw: 1_400_000.0,
        capacity_factor: 0.35,
        fuel_per_mwh: 0.0,
        co2_per_mwh: 0.0,
        fuel_type: "Wind",
        zone: "North",
    },
    Candidate {
        name: "Battery 4h 50MW",
        capacity_mw: 50.0,
        capital_per_mw: 1_600_000.0,
        capacity_factor: 0.12,
        fuel_per_mwh: 0.0,
        co2_per_mwh: 0.0,
        fuel_type: "Storage",
        zone: "Central",
    },
];

/// Technology names used by the demo data.
pub fn demo_technologies() -> impl Iterator<Item = &'static str> {
    CANDIDATES.iter().map(|c| c.name)
}

/// Demo rows for `basis`; identical on every call.
pub fn fallback_rows(basis: CalculationBasis) -> Vec<ResultRow> {
    let mut rng = StdRng::seed_from_u64(match basis {
        CalculationBasis::Yearly => YEARLY_SEED,
        CalculationBasis::Npv => NPV_SEED,
    });

    let mut rows = Vec::with_capacity(CANDIDATES.len() * DEMO_CYCLES as usize);
    let mut installed_mw = 4_000.0;

    for cycle in 1..=DEMO_CYCLES {
        let year = DEMO_BASE_YEAR + cycle as i32;
        let selected = rng.gen_range(0..CANDIDATES.len());
        let peak_load = 3_600.0 * (1.0 + 0.02 * f64::from(cycle));

        for (index, candidate) in CANDIDATES.iter().enumerate() {
            let is_selected = index == selected;
            let jitter = rng.gen_range(0.9..=1.1);
            let status = if is_selected { "Selected" } else { "Evaluated" };
            let total_capacity = installed_mw + candidate.capacity_mw;

            let generation = candidate.capacity_mw * candidate.capacity_factor * 8_760.0 * jitter;
            let capital = candidate.capacity_mw * candidate.capital_per_mw * jitter;
            let fixed_om = candidate.capacity_mw * 18_000.0;
            let variable_om = generation * 3.5;
            let fuel = generation * candidate.fuel_per_mwh;
            let startup = if candidate.fuel_per_mwh > 0.0 {
                40_000.0 * jitter
            } else {
                0.0
            };
            let emissions = generation * candidate.co2_per_mwh * 45.0;
            let system_cost = 310_000_000.0 * jitter + fuel + variable_om + fixed_om;

            let row = ResultRow::new(candidate.name, cycle, year).with_status(status);
            let row = match basis {
                CalculationBasis::Yearly => {
                    let energy_margin: f64 = rng.gen_range(20_000.0..60_000.0);
                    let capacity_value: f64 = rng.gen_range(40_000.0..90_000.0);
                    let reserve_margin = (total_capacity - peak_load) / peak_load * 100.0;
                    row.with_metric("Added Capacity", candidate.capacity_mw)
                        .with_metric("Retired Capacity", 0.0)
                        .with_metric("Total Capacity", total_capacity)
                        .with_metric("Peak Load", peak_load)
                        .with_metric("Reserve Margin", round2(reserve_margin))
                        .with_metric("LOLE", round2(rng.gen_range(0.05..0.6)))
                        .with_metric("EUE", round2(rng.gen_range(5.0..120.0)))
                        .with_metric("System Cost", system_cost.round())
                        .with_metric("Capital Cost", capital.round())
                        .with_metric("Fixed O&M Cost", fixed_om.round())
                        .with_metric("Variable O&M Cost", variable_om.round())
                        .with_metric("Fuel Cost", fuel.round())
                        .with_metric("Startup Cost", startup.round())
                        .with_metric("Emissions Cost", emissions.round())
                        .with_metric("Generation", generation.round())
                        .with_metric("Capacity Factor", round2(candidate.capacity_factor * 100.0))
                        .with_metric("Energy Margin", energy_margin.round())
                        .with_metric("Capacity Value", capacity_value.round())
                        .with_metric("Net Margin", (energy_margin + capacity_value).round())
                        .with_metric("CO2 Emissions", (generation * candidate.co2_per_mwh).round())
                        .with_metric("Fuel Type", candidate.fuel_type)
                        .with_metric("Zone", candidate.zone)
                }
                CalculationBasis::Npv => {
                    let factor = discount_factor(cycle);
                    let mut row = row.with_metric("Discount Factor", round4(factor));
                    for (name, value) in [
                        ("System Cost", system_cost),
                        ("Capital Cost", capital),
                        ("Fixed O&M Cost", fixed_om),
                        ("Variable O&M Cost", variable_om),
                        ("Fuel Cost", fuel),
                        ("Startup Cost", startup),
                        ("Emissions Cost", emissions),
                    ] {
                        row = row
                            .with_metric(name, value.round())
                            .with_metric(format!("NPV {name}"), (value * factor).round());
                    }
                    row
                }
            };
            rows.push(row);
        }

        installed_mw += CANDIDATES[selected].capacity_mw;
    }

    rows
}

/// `1 / (1 + r)^cycle`
pub fn discount_factor(cycle: u32) -> f64 {
    1.0 / (1.0 + DEMO_DISCOUNT_RATE).powi(cycle as i32)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use xplan_core::{find_descriptor, MetricValue};

    #[test]
    fn test_fallback_is_deterministic() {
        assert_eq!(
            fallback_rows(CalculationBasis::Yearly),
            fallback_rows(CalculationBasis::Yearly)
        );
        assert_eq!(
            fallback_rows(CalculationBasis::Npv),
            fallback_rows(CalculationBasis::Npv)
        );
    }

    #[test]
    fn test_one_selection_per_cycle() {
        let rows = fallback_rows(CalculationBasis::Yearly);
        assert_eq!(rows.len(), CANDIDATES.len() * DEMO_CYCLES as usize);

        for cycle in 1..=DEMO_CYCLES {
            let selected = rows
                .iter()
                .filter(|r| r.build_cycle == cycle && r.is_selected())
                .count();
            assert_eq!(selected, 1, "cycle {cycle}");
        }
        let pairs: HashSet<_> = rows
            .iter()
            .map(|r| (r.build_cycle, r.technology.as_str()))
            .collect();
        assert_eq!(pairs.len(), rows.len());
    }

    #[test]
    fn test_npv_values_are_discounted() {
        let rows = fallback_rows(CalculationBasis::Npv);
        let row = rows.iter().find(|r| r.build_cycle == 3).unwrap();

        let fuel = row.metric("Fuel Cost").and_then(MetricValue::as_f64).unwrap();
        let npv_fuel = row.metric("NPV Fuel Cost").and_then(MetricValue::as_f64).unwrap();
        assert!((npv_fuel - (fuel * discount_factor(3)).round()).abs() <= 1.0);
        assert!(npv_fuel <= fuel);
    }

    #[test]
    fn test_metric_names_are_catalogued() {
        for basis in [CalculationBasis::Yearly, CalculationBasis::Npv] {
            for row in fallback_rows(basis) {
                for name in row.metrics.keys() {
                    assert!(find_descriptor(name).is_some(), "{name} not catalogued");
                }
            }
        }
    }

    #[test]
    fn test_years_follow_cycles() {
        for row in fallback_rows(CalculationBasis::Yearly) {
            assert_eq!(row.year, DEMO_BASE_YEAR + row.build_cycle as i32);
        }
    }
}
