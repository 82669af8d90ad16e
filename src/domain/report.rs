// Report and forecast domain models
use std::fmt;
use std::str::FromStr;

pub const CURRENCY: &str = "INR";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Report {
    ConsumptionDetails,
    MonthlyBill,
    ArchivedData,
}

impl Report {
    pub fn slug(&self) -> &'static str {
        match self {
            Report::ConsumptionDetails => "consumption_details",
            Report::MonthlyBill => "monthly_bill",
            Report::ArchivedData => "archived_data",
        }
    }
}

impl FromStr for Report {
    type Err = UnknownName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "consumption_details" => Ok(Report::ConsumptionDetails),
            "monthly_bill" => Ok(Report::MonthlyBill),
            "archived_data" => Ok(Report::ArchivedData),
            other => Err(UnknownName(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForecastHorizon {
    NextDay,
    NextMonth,
}

impl FromStr for ForecastHorizon {
    type Err = UnknownName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "next_day" => Ok(ForecastHorizon::NextDay),
            "next_month" => Ok(ForecastHorizon::NextMonth),
            other => Err(UnknownName(other.to_string())),
        }
    }
}

/// Name that does not match any report or forecast horizon
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownName(pub String);

impl fmt::Display for UnknownName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown name: {}", self.0)
    }
}

impl std::error::Error for UnknownName {}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Forecast {
    pub consumption_kwh: f64,
    pub cost: f64,
}

impl Forecast {
    pub fn render(&self, horizon: ForecastHorizon) -> String {
        let scope = match horizon {
            ForecastHorizon::NextDay => "",
            ForecastHorizon::NextMonth => "Monthly ",
        };
        format!(
            "Forecast {scope}Consumption: {} kWh<br>Forecast {scope}Cost: {} {CURRENCY}",
            self.consumption_kwh, self.cost
        )
    }
}

/// What a forecast endpoint answered: numbers, or an explanatory message
/// such as "Not enough data for prediction."
#[derive(Debug, Clone, PartialEq)]
pub enum ForecastOutcome {
    Forecast(Forecast),
    Unavailable(String),
}

impl ForecastOutcome {
    pub fn render(&self, horizon: ForecastHorizon) -> String {
        match self {
            ForecastOutcome::Forecast(forecast) => forecast.render(horizon),
            ForecastOutcome::Unavailable(message) => message.clone(),
        }
    }
}
