// HTTP implementation of the energy backend
use crate::application::energy_backend::EnergyBackend;
use crate::domain::appliance::Appliance;
use crate::domain::error::DashboardError;
use crate::domain::reading::Reading;
use crate::domain::report::{Forecast, ForecastHorizon, ForecastOutcome, Report};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct RealTimeDataResponse {
    timestamp: f64,
    consumption: f64,
}

#[derive(Debug, Deserialize)]
struct StatusResponse {
    status: String,
}

#[derive(Debug, Deserialize)]
struct ResultResponse {
    result: String,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ForecastResponse {
    Forecast {
        forecast_consumption: f64,
        forecast_cost: f64,
    },
    Message {
        result: String,
    },
}

#[derive(serde::Serialize)]
struct ApplianceForm<'a> {
    appliance: &'a str,
}

impl HttpBackend {
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, DashboardError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| DashboardError::Client(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send a request and return the body of a successful response
    async fn execute(&self, endpoint: &str, request: RequestBuilder) -> Result<String, DashboardError> {
        let network = |e: reqwest::Error| DashboardError::NetworkFailure {
            endpoint: endpoint.to_string(),
            reason: e.to_string(),
        };

        let response = request.send().await.map_err(network)?;
        let status = response.status();
        let body = response.text().await.map_err(network)?;

        if !status.is_success() {
            return Err(DashboardError::ServerError {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        tracing::trace!(endpoint, bytes = body.len(), "Backend responded");
        Ok(body)
    }

    async fn execute_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        request: RequestBuilder,
    ) -> Result<T, DashboardError> {
        let body = self.execute(endpoint, request).await?;
        serde_json::from_str(&body).map_err(|e| DashboardError::malformed(endpoint, e.to_string()))
    }

    async fn post_appliance(&self, endpoint: &str, appliance: Appliance) -> Result<String, DashboardError> {
        let request = self.client.post(self.url(endpoint)).form(&ApplianceForm {
            appliance: appliance.name(),
        });
        let response: StatusResponse = self.execute_json(endpoint, request).await?;
        Ok(response.status)
    }
}

fn report_path(report: Report) -> &'static str {
    match report {
        Report::ConsumptionDetails => "/display_consumption_details",
        Report::MonthlyBill => "/display_monthly_bill",
        Report::ArchivedData => "/display_archived_data",
    }
}

fn forecast_path(horizon: ForecastHorizon) -> &'static str {
    match horizon {
        ForecastHorizon::NextDay => "/predict_next_day_consumption_es",
        ForecastHorizon::NextMonth => "/predict_next_month_consumption_es",
    }
}

#[async_trait]
impl EnergyBackend for HttpBackend {
    async fn start_monitoring(&self, appliance: Appliance) -> Result<String, DashboardError> {
        self.post_appliance("/start_monitoring", appliance).await
    }

    async fn stop_monitoring(&self, appliance: Appliance) -> Result<String, DashboardError> {
        self.post_appliance("/stop_monitoring", appliance).await
    }

    async fn fetch_reading(&self, appliance: Appliance) -> Result<Reading, DashboardError> {
        let endpoint = format!("/get_real_time_data/{}", urlencoding::encode(appliance.name()));
        let request = self.client.get(self.url(&endpoint));
        let data: RealTimeDataResponse = self.execute_json(&endpoint, request).await?;

        Reading::from_unix_seconds(&endpoint, data.timestamp, data.consumption)
    }

    async fn fetch_report(&self, report: Report) -> Result<String, DashboardError> {
        let endpoint = report_path(report);
        let body = self.execute(endpoint, self.client.get(self.url(endpoint))).await?;

        // Empty reports come back as {"result": "..."} instead of an HTML table
        match serde_json::from_str::<ResultResponse>(&body) {
            Ok(message) => Ok(message.result),
            Err(_) => Ok(body),
        }
    }

    async fn fetch_forecast(&self, horizon: ForecastHorizon) -> Result<ForecastOutcome, DashboardError> {
        let endpoint = forecast_path(horizon);
        let response: ForecastResponse = self
            .execute_json(endpoint, self.client.get(self.url(endpoint)))
            .await?;

        Ok(match response {
            ForecastResponse::Forecast {
                forecast_consumption,
                forecast_cost,
            } => ForecastOutcome::Forecast(Forecast {
                consumption_kwh: forecast_consumption,
                cost: forecast_cost,
            }),
            ForecastResponse::Message { result } => ForecastOutcome::Unavailable(result),
        })
    }

    async fn reset_data(&self) -> Result<String, DashboardError> {
        let endpoint = "/reset_data";
        let response: ResultResponse = self
            .execute_json(endpoint, self.client.post(self.url(endpoint)))
            .await?;
        Ok(response.result)
    }
}
