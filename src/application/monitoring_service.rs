// Monitoring service - Per-appliance polling loops feeding the live chart
use crate::application::energy_backend::EnergyBackend;
use crate::application::live_chart::LiveChart;
use crate::domain::appliance::Appliance;
use crate::domain::error::DashboardError;
use chrono::{DateTime, Utc};
use futures::future::join_all;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Shortest polling period; `tokio::time::interval` panics on zero
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(1);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartOutcome {
    Started { status: String },
    AlreadyActive,
}

/// An active polling loop for one appliance. Dropping the session cancels
/// future ticks; fetches already in flight still land on the chart.
struct MonitoringSession {
    handle: JoinHandle<()>,
    started_at: DateTime<Utc>,
}

impl Drop for MonitoringSession {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[derive(Clone)]
pub struct MonitoringService {
    backend: Arc<dyn EnergyBackend>,
    chart: LiveChart,
    poll_interval: Duration,
    sessions: Arc<Mutex<HashMap<Appliance, MonitoringSession>>>,
}

impl MonitoringService {
    pub fn new(backend: Arc<dyn EnergyBackend>, chart: LiveChart, poll_interval: Duration) -> Self {
        let poll_interval = if poll_interval < MIN_POLL_INTERVAL {
            tracing::warn!(
                requested_ms = poll_interval.as_millis() as u64,
                "Poll interval too short, using minimum"
            );
            MIN_POLL_INTERVAL
        } else {
            poll_interval
        };

        Self {
            backend,
            chart,
            poll_interval,
            sessions: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub async fn start_monitoring(&self, appliance: Appliance) -> Result<StartOutcome, DashboardError> {
        if self.sessions.lock().await.contains_key(&appliance) {
            tracing::info!(%appliance, "Monitoring already active");
            return Ok(StartOutcome::AlreadyActive);
        }

        let status = self.backend.start_monitoring(appliance).await?;
        tracing::info!(%appliance, %status, "Backend acknowledged start");

        let mut sessions = self.sessions.lock().await;
        if sessions.contains_key(&appliance) {
            // a concurrent start won the race while we awaited the backend
            return Ok(StartOutcome::AlreadyActive);
        }
        sessions.insert(
            appliance,
            MonitoringSession {
                handle: self.spawn_poller(appliance),
                started_at: Utc::now(),
            },
        );

        Ok(StartOutcome::Started { status })
    }

    /// Returns whether a polling loop was actually cancelled.
    pub async fn stop_monitoring(&self, appliance: Appliance) -> Result<bool, DashboardError> {
        let status = self.backend.stop_monitoring(appliance).await?;
        tracing::info!(%appliance, %status, "Backend acknowledged stop");

        match self.sessions.lock().await.remove(&appliance) {
            Some(session) => {
                let elapsed = Utc::now() - session.started_at;
                tracing::info!(%appliance, seconds = elapsed.num_seconds(), "Polling stopped");
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Stop every known appliance, whether or not it is running.
    pub async fn stop_all_monitoring(&self) -> Vec<(Appliance, Result<bool, DashboardError>)> {
        let stops = Appliance::ALL.map(|appliance| async move {
            let outcome = self.stop_monitoring(appliance).await;
            if let Err(e) = &outcome {
                tracing::warn!(%appliance, error = %e, "Failed to stop monitoring");
            }
            (appliance, outcome)
        });

        join_all(stops).await
    }

    pub async fn active_appliances(&self) -> Vec<Appliance> {
        let sessions = self.sessions.lock().await;
        Appliance::ALL
            .into_iter()
            .filter(|appliance| sessions.contains_key(appliance))
            .collect()
    }

    fn spawn_poller(&self, appliance: Appliance) -> JoinHandle<()> {
        let backend = self.backend.clone();
        let chart = self.chart.clone();
        let period = self.poll_interval;

        tracing::debug!(%appliance, period_ms = period.as_millis() as u64, "Spawning poller");

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            // First tick completes immediately; polling begins one period after start
            ticker.tick().await;

            loop {
                ticker.tick().await;

                // Each tick is independent: a slow fetch never delays the next one
                let backend = backend.clone();
                let chart = chart.clone();
                tokio::spawn(async move {
                    poll_once(backend.as_ref(), &chart, appliance).await;
                });
            }
        })
    }
}

/// One polling tick: fetch the latest reading and append it. Failures drop the tick.
async fn poll_once(backend: &dyn EnergyBackend, chart: &LiveChart, appliance: Appliance) {
    match backend.fetch_reading(appliance).await {
        Ok(reading) => chart.ingest(appliance, reading),
        Err(e) => {
            tracing::warn!(%appliance, error = %e, "Dropping polling tick");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::energy_backend::fake::FakeBackend;
    use crate::domain::chart::{ChartOptions, TimelinePolicy};
    use crate::domain::reading::Reading;
    use std::sync::atomic::Ordering;

    fn setup() -> (Arc<FakeBackend>, LiveChart, MonitoringService) {
        let backend = Arc::new(FakeBackend::new());
        let chart = LiveChart::initialize(ChartOptions::default(), TimelinePolicy::default());
        let service = MonitoringService::new(backend.clone(), chart.clone(), Duration::from_millis(1000));
        (backend, chart, service)
    }

    async fn advance(ms: u64) {
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_single_tick_appends_one_sample() {
        let (backend, chart, service) = setup();
        let t = 1_700_000_000.0;
        backend.push_reading(
            Appliance::Refrigerator,
            Reading::from_unix_seconds("/x", t, 1.5),
        );

        let outcome = service.start_monitoring(Appliance::Refrigerator).await.unwrap();
        assert!(matches!(outcome, StartOutcome::Started { .. }));

        advance(1500).await;

        let model = chart.snapshot();
        assert_eq!(model.series(Appliance::Refrigerator).data, vec![1.5]);
        assert_eq!(model.labels().len(), 1);
        assert_eq!(model.labels()[0].timestamp(), 1_700_000_000);
        assert!(model.series(Appliance::AirConditioner).data.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_tick_before_first_period() {
        let (backend, chart, service) = setup();
        service.start_monitoring(Appliance::WashingMachine).await.unwrap();

        advance(900).await;

        assert!(chart.snapshot().is_empty());
        assert_eq!(backend.fetches.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_prevents_further_samples() {
        let (backend, chart, service) = setup();
        service.start_monitoring(Appliance::Refrigerator).await.unwrap();
        advance(1500).await;
        assert_eq!(chart.snapshot().series(Appliance::Refrigerator).data.len(), 1);

        assert!(service.stop_monitoring(Appliance::Refrigerator).await.unwrap());
        advance(5000).await;

        assert_eq!(chart.snapshot().series(Appliance::Refrigerator).data.len(), 1);
        assert_eq!(backend.fetches.load(Ordering::SeqCst), 1);
        assert!(service.active_appliances().await.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_without_session_is_noop() {
        let (backend, chart, service) = setup();

        assert!(!service.stop_monitoring(Appliance::AirConditioner).await.unwrap());
        assert_eq!(backend.calls(), vec!["stop:AirConditioner"]);
        assert!(chart.snapshot().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_all_with_no_pollers() {
        let (backend, chart, service) = setup();
        let redraws = chart.subscribe();

        let results = service.stop_all_monitoring().await;

        assert_eq!(results.len(), 3);
        assert!(results.iter().all(|(_, r)| matches!(r, Ok(false))));
        assert_eq!(backend.calls().len(), 3);
        assert!(!redraws.has_changed().unwrap());
        assert!(chart.snapshot().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_all_cancels_running_pollers() {
        let (_backend, chart, service) = setup();
        service.start_monitoring(Appliance::AirConditioner).await.unwrap();
        service.start_monitoring(Appliance::WashingMachine).await.unwrap();
        advance(1500).await;

        let results = service.stop_all_monitoring().await;
        let cancelled: Vec<Appliance> = results
            .into_iter()
            .filter_map(|(a, r)| matches!(r, Ok(true)).then_some(a))
            .collect();
        assert_eq!(cancelled, vec![Appliance::AirConditioner, Appliance::WashingMachine]);

        let before = chart.snapshot();
        advance(3000).await;
        assert_eq!(chart.snapshot(), before);
    }

    #[tokio::test(start_paused = true)]
    async fn test_double_start_is_noop() {
        let (backend, chart, service) = setup();
        service.start_monitoring(Appliance::AirConditioner).await.unwrap();
        let second = service.start_monitoring(Appliance::AirConditioner).await.unwrap();
        assert_eq!(second, StartOutcome::AlreadyActive);
        assert_eq!(backend.calls(), vec!["start:AirConditioner"]);

        advance(3500).await;
        assert_eq!(chart.snapshot().series(Appliance::AirConditioner).data.len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_start_spawns_nothing() {
        let (backend, chart, service) = setup();
        backend.fail_control.store(true, Ordering::SeqCst);

        let err = service.start_monitoring(Appliance::Refrigerator).await.unwrap_err();
        assert!(matches!(err, DashboardError::ServerError { status: 500, .. }));

        advance(3000).await;
        assert!(service.active_appliances().await.is_empty());
        assert!(chart.snapshot().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_tick_keeps_polling() {
        let (backend, chart, service) = setup();
        backend.push_reading(
            Appliance::WashingMachine,
            Err(DashboardError::NetworkFailure {
                endpoint: "/get_real_time_data/WashingMachine".to_string(),
                reason: "connection reset".to_string(),
            }),
        );
        service.start_monitoring(Appliance::WashingMachine).await.unwrap();

        advance(1500).await;
        assert!(chart.snapshot().is_empty());

        advance(1000).await;
        assert_eq!(chart.snapshot().series(Appliance::WashingMachine).data.len(), 1);
        assert_eq!(service.active_appliances().await, vec![Appliance::WashingMachine]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_stop_keeps_session() {
        let (backend, _chart, service) = setup();
        service.start_monitoring(Appliance::Refrigerator).await.unwrap();
        backend.fail_control.store(true, Ordering::SeqCst);

        assert!(service.stop_monitoring(Appliance::Refrigerator).await.is_err());
        assert_eq!(service.active_appliances().await, vec![Appliance::Refrigerator]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_in_flight_fetch_lands_after_stop() {
        let (backend, chart, service) = setup();
        *backend.fetch_delay.lock().unwrap() = Duration::from_secs(3);
        backend.push_reading(
            Appliance::AirConditioner,
            Reading::from_unix_seconds("/x", 1_700_000_000.0, 9.0),
        );
        service.start_monitoring(Appliance::AirConditioner).await.unwrap();

        // tick at 1s issues the fetch, which answers at 4s
        advance(1500).await;
        assert!(service.stop_monitoring(Appliance::AirConditioner).await.unwrap());
        assert!(chart.snapshot().is_empty());

        advance(10_000).await;

        assert_eq!(chart.snapshot().series(Appliance::AirConditioner).data, vec![9.0]);
        assert_eq!(backend.fetches.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_interval_is_clamped() {
        let backend = Arc::new(FakeBackend::new());
        let chart = LiveChart::initialize(ChartOptions::default(), TimelinePolicy::default());
        let service = MonitoringService::new(backend.clone(), chart.clone(), Duration::ZERO);
        assert_eq!(service.poll_interval, MIN_POLL_INTERVAL);

        service.start_monitoring(Appliance::Refrigerator).await.unwrap();
        advance(10).await;

        assert!(!chart.snapshot().series(Appliance::Refrigerator).data.is_empty());
        assert_eq!(service.active_appliances().await, vec![Appliance::Refrigerator]);
    }
}
