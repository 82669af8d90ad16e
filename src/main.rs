// Main entry point - Dependency injection and server setup
mod domain;
mod application;
mod infrastructure;
mod presentation;

use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use crate::application::live_chart::LiveChart;
use crate::application::monitoring_service::MonitoringService;
use crate::application::report_service::ReportService;
use crate::application::results_panel::ResultsPanel;
use crate::domain::chart::ChartOptions;
use crate::infrastructure::config::load_dashboard_config;
use crate::infrastructure::http_backend::HttpBackend;
use crate::presentation::app_state::AppState;
use crate::presentation::router::build_router;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    let config = load_dashboard_config()?;

    // Create backend client (infrastructure layer)
    let backend = Arc::new(HttpBackend::new(
        &config.backend.base_url,
        config.backend.request_timeout(),
    )?);

    // Chart is built once and shared by every poller and the reset action
    let chart = LiveChart::initialize(ChartOptions::default(), config.monitoring.timeline);

    // Create services (application layer)
    let monitoring_service = MonitoringService::new(
        backend.clone(),
        chart.clone(),
        config.monitoring.poll_interval(),
    );
    let report_service = ReportService::new(backend, chart.clone(), Arc::new(ResultsPanel::new()));

    let state = Arc::new(AppState {
        chart,
        monitoring_service: monitoring_service.clone(),
        report_service,
    });

    let router = build_router(state);

    let listener = tokio::net::TcpListener::bind(config.server.listen).await?;
    tracing::info!(
        listen = %config.server.listen,
        backend = %config.backend.base_url,
        "Starting energy dashboard"
    );

    axum::serve(listener, router)
        .with_graceful_shutdown(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for shutdown signal");
                return;
            }
            tracing::info!("Shutting down, stopping all monitoring");
            monitoring_service.stop_all_monitoring().await;
        })
        .await?;

    Ok(())
}
