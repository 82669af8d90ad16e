// Application layer - Use cases driving the dashboard
pub mod energy_backend;
pub mod live_chart;
pub mod monitoring_service;
pub mod report_service;
pub mod results_panel;
