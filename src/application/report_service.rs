// Report service - One-shot reports, forecasts and data reset
use crate::application::energy_backend::EnergyBackend;
use crate::application::live_chart::LiveChart;
use crate::application::results_panel::{ResultsPanel, Ticket};
use crate::domain::error::DashboardError;
use crate::domain::report::{ForecastHorizon, Report};
use std::sync::Arc;

#[derive(Clone)]
pub struct ReportService {
    backend: Arc<dyn EnergyBackend>,
    chart: LiveChart,
    panel: Arc<ResultsPanel>,
}

impl ReportService {
    pub fn new(backend: Arc<dyn EnergyBackend>, chart: LiveChart, panel: Arc<ResultsPanel>) -> Self {
        Self {
            backend,
            chart,
            panel,
        }
    }

    pub fn results(&self) -> Option<String> {
        self.panel.content()
    }

    /// Fetch a report and show it in the results panel
    pub async fn show_report(&self, report: Report) -> Result<String, DashboardError> {
        let ticket = self.panel.begin();
        let outcome = self.backend.fetch_report(report).await;
        self.present(ticket, outcome, report.slug())
    }

    pub async fn show_forecast(&self, horizon: ForecastHorizon) -> Result<String, DashboardError> {
        let ticket = self.panel.begin();
        let outcome = self
            .backend
            .fetch_forecast(horizon)
            .await
            .map(|forecast| forecast.render(horizon));
        self.present(ticket, outcome, "forecast")
    }

    /// Reset backend data and clear the chart. Active pollers keep running.
    pub async fn reset_data(&self) -> Result<String, DashboardError> {
        let ticket = self.panel.begin();
        let outcome = self.backend.reset_data().await;
        if outcome.is_ok() {
            self.chart.clear();
        }
        self.present(ticket, outcome, "reset")
    }

    fn present(
        &self,
        ticket: Ticket,
        outcome: Result<String, DashboardError>,
        action: &str,
    ) -> Result<String, DashboardError> {
        match outcome {
            Ok(content) => {
                self.panel.publish(ticket, content.clone());
                Ok(content)
            }
            Err(e) => {
                tracing::error!(action, error = %e, "Dashboard action failed");
                self.panel.publish(ticket, format!("Error: {}", e));
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::energy_backend::fake::FakeBackend;
    use crate::application::monitoring_service::MonitoringService;
    use crate::domain::appliance::Appliance;
    use crate::domain::chart::{ChartOptions, TimelinePolicy};
    use crate::domain::report::ForecastOutcome;
    use std::sync::atomic::Ordering;
    use std::time::Duration;

    fn setup() -> (Arc<FakeBackend>, LiveChart, ReportService) {
        let backend = Arc::new(FakeBackend::new());
        let chart = LiveChart::initialize(ChartOptions::default(), TimelinePolicy::default());
        let service = ReportService::new(backend.clone(), chart.clone(), Arc::new(ResultsPanel::new()));
        (backend, chart, service)
    }

    #[tokio::test]
    async fn test_report_replaces_results() {
        let (backend, _chart, service) = setup();
        *backend.report_body.lock().unwrap() = Some("<table>bill</table>".to_string());

        service.show_report(Report::MonthlyBill).await.unwrap();

        assert_eq!(service.results().as_deref(), Some("<table>bill</table>"));
        assert_eq!(backend.calls(), vec!["report:monthly_bill"]);
    }

    #[tokio::test]
    async fn test_report_failure_is_visible() {
        let (_backend, _chart, service) = setup();

        assert!(service.show_report(Report::ArchivedData).await.is_err());

        let shown = service.results().unwrap();
        assert!(shown.starts_with("Error:"));
        assert!(shown.contains("connection refused"));
    }

    #[tokio::test]
    async fn test_forecasts_render_units() {
        let (backend, _chart, service) = setup();

        service.show_forecast(ForecastHorizon::NextDay).await.unwrap();
        let shown = service.results().unwrap();
        assert!(shown.contains("12.3 kWh"));
        assert!(shown.contains("45.6 INR"));
        assert!(!shown.contains("Monthly"));

        service.show_forecast(ForecastHorizon::NextMonth).await.unwrap();
        assert_eq!(
            service.results().as_deref(),
            Some("Forecast Monthly Consumption: 12.3 kWh<br>Forecast Monthly Cost: 45.6 INR")
        );

        *backend.forecast.lock().unwrap() =
            Some(ForecastOutcome::Unavailable("Not enough data for prediction.".to_string()));
        service.show_forecast(ForecastHorizon::NextMonth).await.unwrap();
        assert_eq!(service.results().as_deref(), Some("Not enough data for prediction."));
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_clears_chart_but_keeps_pollers() {
        let (backend, chart, service) = setup();
        let monitoring = MonitoringService::new(backend.clone(), chart.clone(), Duration::from_millis(1000));
        for appliance in Appliance::ALL {
            monitoring.start_monitoring(appliance).await.unwrap();
        }
        tokio::time::sleep(Duration::from_millis(2500)).await;
        for appliance in Appliance::ALL {
            assert_eq!(chart.snapshot().series(appliance).data.len(), 2);
        }

        let message = service.reset_data().await.unwrap();
        assert_eq!(message, "Data has been reset.");
        assert_eq!(service.results().as_deref(), Some("Data has been reset."));
        assert!(chart.snapshot().is_empty());
        assert_eq!(monitoring.active_appliances().await.len(), 3);

        tokio::time::sleep(Duration::from_millis(1000)).await;
        let model = chart.snapshot();
        for appliance in Appliance::ALL {
            assert_eq!(model.series(appliance).data.len(), 1);
        }
        assert_eq!(model.labels().len(), 3);
    }

    #[tokio::test]
    async fn test_failed_reset_leaves_chart() {
        let (backend, chart, service) = setup();
        chart.ingest(
            Appliance::AirConditioner,
            crate::domain::reading::Reading::from_unix_seconds("/x", 10.0, 1.0).unwrap(),
        );
        backend.fail_control.store(true, Ordering::SeqCst);

        assert!(service.reset_data().await.is_err());
        assert!(!chart.snapshot().is_empty());
        assert!(service.results().unwrap().contains("status 500"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_older_report_answering_last_is_not_shown() {
        let (backend, _chart, service) = setup();
        backend.reports.lock().unwrap().extend([
            ("monthly_bill", (Duration::from_secs(2), "<table>bill</table>".to_string())),
            ("archived_data", (Duration::ZERO, "<table>archive</table>".to_string())),
        ]);

        // join! polls in order, so the bill request takes the older ticket
        let (bill, archive) = tokio::join!(
            service.show_report(Report::MonthlyBill),
            service.show_report(Report::ArchivedData),
        );

        assert_eq!(bill.unwrap(), "<table>bill</table>");
        assert_eq!(archive.unwrap(), "<table>archive</table>");
        assert_eq!(service.results().as_deref(), Some("<table>archive</table>"));
    }
}
