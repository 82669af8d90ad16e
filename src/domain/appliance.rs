// Appliance domain model
use super::error::DashboardError;
use std::fmt;
use std::str::FromStr;

/// The appliances the dashboard knows about. The declaration order is the
/// chart series order and must not change independently of `series_index`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Appliance {
    AirConditioner,
    WashingMachine,
    Refrigerator,
}

impl Appliance {
    pub const COUNT: usize = 3;

    pub const ALL: [Appliance; Appliance::COUNT] = [
        Appliance::AirConditioner,
        Appliance::WashingMachine,
        Appliance::Refrigerator,
    ];

    /// Identifier used by the backend endpoints.
    pub fn name(&self) -> &'static str {
        match self {
            Appliance::AirConditioner => "AirConditioner",
            Appliance::WashingMachine => "WashingMachine",
            Appliance::Refrigerator => "Refrigerator",
        }
    }

    pub fn series_index(&self) -> usize {
        match self {
            Appliance::AirConditioner => 0,
            Appliance::WashingMachine => 1,
            Appliance::Refrigerator => 2,
        }
    }

    pub fn display_label(&self) -> &'static str {
        match self {
            Appliance::AirConditioner => "Air Conditioner Consumption (kWh)",
            Appliance::WashingMachine => "Washing Machine Consumption (kWh)",
            Appliance::Refrigerator => "Refrigerator Consumption (kWh)",
        }
    }

    /// (background, border) colors of the appliance's line
    pub fn colors(&self) -> (&'static str, &'static str) {
        match self {
            Appliance::AirConditioner => ("rgba(0, 123, 255, 0.5)", "rgba(0, 123, 255, 1)"),
            Appliance::WashingMachine => ("rgba(0, 255, 123, 0.5)", "rgba(0, 255, 123, 1)"),
            Appliance::Refrigerator => ("rgba(255, 123, 0, 0.5)", "rgba(255, 123, 0, 1)"),
        }
    }
}

impl fmt::Display for Appliance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Appliance {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        dataset_index_for_appliance(s)
            .map(|idx| Appliance::ALL[idx])
            .ok_or_else(|| DashboardError::UnknownAppliance(s.to_string()))
    }
}

/// Series index for an appliance identifier. `None` is the invalid sentinel
/// for identifiers outside the known set.
pub fn dataset_index_for_appliance(name: &str) -> Option<usize> {
    Appliance::ALL
        .iter()
        .find(|appliance| appliance.name() == name)
        .map(|appliance| appliance.series_index())
}
