//! Metric catalogs per result-set type.
//!
//! Each catalog is a static, declarative table: the camelCase wire field, the
//! display name used as the [`MetricBag`](crate::MetricBag) key, the display unit,
//! and whether baseline comparison applies. The API mapper and the pivot view both
//! read from these tables, so adding a metric is a one-line change.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::XplanError;

/// Whether a result set holds undiscounted yearly values or discounted NPV values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CalculationBasis {
    #[default]
    Yearly,
    #[serde(rename = "NPV")]
    Npv,
}

impl CalculationBasis {
    /// Metric catalog for this basis.
    pub fn metrics(self) -> &'static [MetricDescriptor] {
        match self {
            CalculationBasis::Yearly => YEARLY_METRICS,
            CalculationBasis::Npv => NPV_METRICS,
        }
    }
}

impl fmt::Display for CalculationBasis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CalculationBasis::Yearly => write!(f, "Yearly"),
            CalculationBasis::Npv => write!(f, "NPV"),
        }
    }
}

impl FromStr for CalculationBasis {
    type Err = XplanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "yearly" => Ok(CalculationBasis::Yearly),
            "npv" => Ok(CalculationBasis::Npv),
            other => Err(XplanError::Parse(format!(
                "unknown calculation basis '{other}' (expected Yearly or NPV)"
            ))),
        }
    }
}

/// Display unit and baseline behaviour of one named metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MetricDescriptor {
    /// camelCase field name on the wire.
    pub key: &'static str,
    /// Display name; also the metric bag key.
    pub name: &'static str,
    pub unit: &'static str,
    pub has_baseline: bool,
}

const fn metric(
    key: &'static str,
    name: &'static str,
    unit: &'static str,
    has_baseline: bool,
) -> MetricDescriptor {
    MetricDescriptor {
        key,
        name,
        unit,
        has_baseline,
    }
}

/// Metrics of `GET /results/study/{id}` rows.
pub static YEARLY_METRICS: &[MetricDescriptor] = &[
    metric("addedCapacity", "Added Capacity", "MW", false),
    metric("retiredCapacity", "Retired Capacity", "MW", false),
    metric("totalCapacity", "Total Capacity", "MW", true),
    metric("peakLoad", "Peak Load", "MW", false),
    metric("energyDemand", "Energy Demand", "MWh", false),
    metric("reserveMargin", "Reserve Margin", "%", true),
    metric("lole", "LOLE", "hrs/yr", true),
    metric("eue", "EUE", "MWh", true),
    metric("systemCost", "System Cost", "$", true),
    metric("capitalCost", "Capital Cost", "$", false),
    metric("fixedOmCost", "Fixed O&M Cost", "$", true),
    metric("variableOmCost", "Variable O&M Cost", "$", true),
    metric("fuelCost", "Fuel Cost", "$", true),
    metric("startupCost", "Startup Cost", "$", true),
    metric("emissionsCost", "Emissions Cost", "$", true),
    metric("transmissionCost", "Transmission Cost", "$", true),
    metric("unservedEnergyCost", "Unserved Energy Cost", "$", true),
    metric("purchaseCost", "Purchase Cost", "$", true),
    metric("salesRevenue", "Sales Revenue", "$", true),
    metric("generation", "Generation", "MWh", true),
    metric("renewableGeneration", "Renewable Generation", "MWh", true),
    metric("curtailment", "Curtailment", "MWh", true),
    metric("marketPurchases", "Market Purchases", "MWh", true),
    metric("marketSales", "Market Sales", "MWh", true),
    metric("capacityFactor", "Capacity Factor", "%", false),
    metric("energyMargin", "Energy Margin", "$/MW", false),
    metric("capacityValue", "Capacity Value", "$/MW", false),
    metric("netMargin", "Net Margin", "$/MW", false),
    metric("levelizedCost", "Levelized Cost", "$/MWh", false),
    metric("co2Emissions", "CO2 Emissions", "tons", true),
    metric("noxEmissions", "NOx Emissions", "tons", true),
    metric("so2Emissions", "SO2 Emissions", "tons", true),
    metric("fuelType", "Fuel Type", "", false),
    metric("unitType", "Unit Type", "", false),
    metric("zone", "Zone", "", false),
];

/// Metrics of `GET /results/npv/{id}` rows: each cost paired with its discounted value.
pub static NPV_METRICS: &[MetricDescriptor] = &[
    metric("discountFactor", "Discount Factor", "", false),
    metric("systemCost", "System Cost", "$", true),
    metric("npvSystemCost", "NPV System Cost", "$", true),
    metric("capitalCost", "Capital Cost", "$", false),
    metric("npvCapitalCost", "NPV Capital Cost", "$", false),
    metric("fixedOmCost", "Fixed O&M Cost", "$", true),
    metric("npvFixedOmCost", "NPV Fixed O&M Cost", "$", true),
    metric("variableOmCost", "Variable O&M Cost", "$", true),
    metric("npvVariableOmCost", "NPV Variable O&M Cost", "$", true),
    metric("fuelCost", "Fuel Cost", "$", true),
    metric("npvFuelCost", "NPV Fuel Cost", "$", true),
    metric("startupCost", "Startup Cost", "$", true),
    metric("npvStartupCost", "NPV Startup Cost", "$", true),
    metric("emissionsCost", "Emissions Cost", "$", true),
    metric("npvEmissionsCost", "NPV Emissions Cost", "$", true),
    metric("transmissionCost", "Transmission Cost", "$", true),
    metric("npvTransmissionCost", "NPV Transmission Cost", "$", true),
    metric("unservedEnergyCost", "Unserved Energy Cost", "$", true),
    metric("npvUnservedEnergyCost", "NPV Unserved Energy Cost", "$", true),
    metric("purchaseCost", "Purchase Cost", "$", true),
    metric("npvPurchaseCost", "NPV Purchase Cost", "$", true),
    metric("salesRevenue", "Sales Revenue", "$", true),
    metric("npvSalesRevenue", "NPV Sales Revenue", "$", true),
];

/// Metrics of `GET /results/units/{id}` rows.
pub static UNIT_CHANGE_METRICS: &[MetricDescriptor] = &[
    metric("capacityAdded", "Capacity Added", "MW", false),
    metric("capacityRemoved", "Capacity Removed", "MW", false),
];

/// Look up a descriptor by display name across all catalogs.
///
/// Names shared between the yearly and NPV catalogs carry identical settings.
pub fn find_descriptor(name: &str) -> Option<&'static MetricDescriptor> {
    YEARLY_METRICS
        .iter()
        .chain(NPV_METRICS)
        .chain(UNIT_CHANGE_METRICS)
        .find(|d| d.name == name)
}

/// Look up a descriptor by wire key within one catalog.
pub fn find_by_key<'a>(
    catalog: &'a [MetricDescriptor],
    key: &str,
) -> Option<&'a MetricDescriptor> {
    catalog.iter().find(|d| d.key == key)
}
