// HTTP request handlers
use crate::application::monitoring_service::StartOutcome;
use crate::domain::appliance::Appliance;
use crate::domain::chart::ChartView;
use crate::domain::error::DashboardError;
use crate::domain::report::{ForecastHorizon, Report};
use crate::presentation::app_state::AppState;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{
        IntoResponse, Response,
        sse::{Event, KeepAlive, Sse},
    },
};
use futures::stream::Stream;
use serde::Serialize;
use std::sync::Arc;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::WatchStream;

/// Error response for the control surface
pub struct ApiError(DashboardError);

impl From<DashboardError> for ApiError {
    fn from(err: DashboardError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            DashboardError::UnknownAppliance(_) => StatusCode::BAD_REQUEST,
            DashboardError::Client(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_GATEWAY,
        };
        (status, Json(MessageBody { message: self.0.to_string() })).into_response()
    }
}

#[derive(Serialize)]
pub struct MessageBody {
    pub message: String,
}

#[derive(Serialize)]
pub struct MonitoringBody {
    pub appliance: String,
    pub active: bool,
    pub message: String,
}

#[derive(Serialize)]
pub struct StopAllEntry {
    pub appliance: String,
    pub stopped: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Serialize)]
pub struct ResultsBody {
    pub content: Option<String>,
}

fn bad_request(message: String) -> Response {
    (StatusCode::BAD_REQUEST, Json(MessageBody { message })).into_response()
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Chart configuration with current data
pub async fn get_chart(State(state): State<Arc<AppState>>) -> Json<ChartView> {
    Json(state.chart.view())
}

/// One event per chart redraw, starting with the current data
pub async fn stream_chart(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, axum::Error>>> {
    let redraws = WatchStream::new(state.chart.subscribe())
        .map(|model| Event::default().event("chart").json_data(&model));

    Sse::new(redraws).keep_alive(KeepAlive::default())
}

pub async fn list_monitoring(State(state): State<Arc<AppState>>) -> Json<Vec<String>> {
    let active = state.monitoring_service.active_appliances().await;
    Json(active.iter().map(|a| a.name().to_string()).collect())
}

pub async fn start_monitoring(
    Path(name): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<MonitoringBody>, ApiError> {
    let appliance: Appliance = name.parse()?;
    let message = match state.monitoring_service.start_monitoring(appliance).await? {
        StartOutcome::Started { status } => status,
        StartOutcome::AlreadyActive => "Monitoring already active".to_string(),
    };

    Ok(Json(MonitoringBody {
        appliance: appliance.name().to_string(),
        active: true,
        message,
    }))
}

pub async fn stop_monitoring(
    Path(name): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<MonitoringBody>, ApiError> {
    let appliance: Appliance = name.parse()?;
    let was_active = state.monitoring_service.stop_monitoring(appliance).await?;

    Ok(Json(MonitoringBody {
        appliance: appliance.name().to_string(),
        active: false,
        message: if was_active {
            "Monitoring stopped".to_string()
        } else {
            "Monitoring was not active".to_string()
        },
    }))
}

pub async fn stop_all_monitoring(State(state): State<Arc<AppState>>) -> Json<Vec<StopAllEntry>> {
    let results = state.monitoring_service.stop_all_monitoring().await;

    Json(
        results
            .into_iter()
            .map(|(appliance, outcome)| StopAllEntry {
                appliance: appliance.name().to_string(),
                stopped: matches!(outcome, Ok(true)),
                error: outcome.err().map(|e| e.to_string()),
            })
            .collect(),
    )
}

pub async fn show_report(Path(kind): Path<String>, State(state): State<Arc<AppState>>) -> Response {
    let report: Report = match kind.parse() {
        Ok(report) => report,
        Err(e) => return bad_request(format!("{}", e)),
    };

    match state.report_service.show_report(report).await {
        Ok(content) => Json(ResultsBody { content: Some(content) }).into_response(),
        Err(e) => ApiError(e).into_response(),
    }
}

pub async fn show_forecast(Path(horizon): Path<String>, State(state): State<Arc<AppState>>) -> Response {
    let horizon: ForecastHorizon = match horizon.parse() {
        Ok(horizon) => horizon,
        Err(e) => return bad_request(format!("{}", e)),
    };

    match state.report_service.show_forecast(horizon).await {
        Ok(content) => Json(ResultsBody { content: Some(content) }).into_response(),
        Err(e) => ApiError(e).into_response(),
    }
}

pub async fn reset_data(State(state): State<Arc<AppState>>) -> Result<Json<ResultsBody>, ApiError> {
    let message = state.report_service.reset_data().await?;
    Ok(Json(ResultsBody { content: Some(message) }))
}

pub async fn get_results(State(state): State<Arc<AppState>>) -> Json<ResultsBody> {
    Json(ResultsBody {
        content: state.report_service.results(),
    })
}
