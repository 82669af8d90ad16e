// Route table for the dashboard control surface
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    get_chart, get_results, health_check, list_monitoring, reset_data, show_forecast, show_report,
    start_monitoring, stop_all_monitoring, stop_monitoring, stream_chart,
};
use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(health_check))
        .route("/chart", get(get_chart))
        .route("/chart/stream", get(stream_chart))
        .route("/monitoring", get(list_monitoring))
        .route("/monitoring/stop_all", post(stop_all_monitoring))
        .route("/monitoring/:appliance/start", post(start_monitoring))
        .route("/monitoring/:appliance/stop", post(stop_monitoring))
        .route("/reports/:kind", post(show_report))
        .route("/forecasts/:horizon", post(show_forecast))
        .route("/reset", post(reset_data))
        .route("/results", get(get_results))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
