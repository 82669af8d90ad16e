// Live chart sink - Owns the chart model and publishes a redraw on every mutation
use crate::domain::appliance::Appliance;
use crate::domain::chart::{ChartModel, ChartOptions, ChartView, TimelinePolicy};
use crate::domain::reading::Reading;
use std::sync::Arc;
use tokio::sync::watch;

#[derive(Clone)]
pub struct LiveChart {
    model: Arc<watch::Sender<ChartModel>>,
    options: ChartOptions,
}

impl LiveChart {
    /// Build the chart once at startup. Subscribers are notified of every redraw.
    pub fn initialize(options: ChartOptions, timeline: TimelinePolicy) -> Self {
        let (tx, _rx) = watch::channel(ChartModel::new(timeline));
        tracing::info!(?timeline, "Chart initialized");
        Self {
            model: Arc::new(tx),
            options,
        }
    }

    /// Append one reading to the appliance's series and redraw
    pub fn ingest(&self, appliance: Appliance, reading: Reading) {
        let mut sizes = (0, 0);
        self.model.send_modify(|model| {
            model.ingest(appliance, &reading);
            sizes = (model.labels().len(), model.series(appliance).data.len());
        });
        tracing::trace!(
            %appliance,
            consumption = reading.consumption,
            at = %reading.at,
            labels = sizes.0,
            samples = sizes.1,
            "Sample appended"
        );
    }

    /// Empty every series and the shared timeline, then redraw
    pub fn clear(&self) {
        let mut had_data = false;
        self.model.send_modify(|model| {
            had_data = !model.is_empty();
            model.clear();
        });
        tracing::debug!(had_data, "Chart cleared");
    }

    pub fn snapshot(&self) -> ChartModel {
        self.model.borrow().clone()
    }

    pub fn view(&self) -> ChartView {
        ChartView::line(self.snapshot(), self.options.clone())
    }

    pub fn subscribe(&self) -> watch::Receiver<ChartModel> {
        self.model.subscribe()
    }
}
