// Application state for HTTP handlers
use crate::application::live_chart::LiveChart;
use crate::application::monitoring_service::MonitoringService;
use crate::application::report_service::ReportService;

#[derive(Clone)]
pub struct AppState {
    pub chart: LiveChart,
    pub monitoring_service: MonitoringService,
    pub report_service: ReportService,
}
