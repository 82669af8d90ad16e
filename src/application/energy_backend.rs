// Backend trait for the energy monitoring server
use crate::domain::appliance::Appliance;
use crate::domain::error::DashboardError;
use crate::domain::reading::Reading;
use crate::domain::report::{ForecastHorizon, ForecastOutcome, Report};
use async_trait::async_trait;

#[async_trait]
pub trait EnergyBackend: Send + Sync {
    /// Ask the backend to start collecting readings; returns its status message
    async fn start_monitoring(&self, appliance: Appliance) -> Result<String, DashboardError>;

    /// Ask the backend to stop collecting readings; returns its status message
    async fn stop_monitoring(&self, appliance: Appliance) -> Result<String, DashboardError>;

    /// Latest reading for one appliance
    async fn fetch_reading(&self, appliance: Appliance) -> Result<Reading, DashboardError>;

    /// Rendered report body (HTML table or plain message)
    async fn fetch_report(&self, report: Report) -> Result<String, DashboardError>;

    async fn fetch_forecast(&self, horizon: ForecastHorizon) -> Result<ForecastOutcome, DashboardError>;

    /// Archive and wipe stored consumption; returns the result message
    async fn reset_data(&self) -> Result<String, DashboardError>;
}
