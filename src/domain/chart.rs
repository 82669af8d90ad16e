// Chart domain models
use super::appliance::Appliance;
use super::reading::Reading;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How the shared timeline treats a timestamp that is already present
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimelinePolicy {
    /// Every ingested sample appends a label, even for identical instants
    #[default]
    AppendEveryTick,
    /// An instant equal to one already on the timeline is not appended again
    SkipDuplicates,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSeries {
    pub label: String,
    pub data: Vec<f64>,
    pub background_color: String,
    pub border_color: String,
    pub border_width: u32,
    pub fill: bool,
}

impl ChartSeries {
    pub fn for_appliance(appliance: Appliance) -> Self {
        let (background, border) = appliance.colors();
        Self {
            label: appliance.display_label().to_string(),
            data: Vec::new(),
            background_color: background.to_string(),
            border_color: border.to_string(),
            border_width: 1,
            fill: false,
        }
    }
}

/// Shared timeline plus one series per appliance, in series-index order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartModel {
    labels: Vec<DateTime<Utc>>,
    datasets: [ChartSeries; Appliance::COUNT],
    #[serde(skip)]
    timeline: TimelinePolicy,
}

impl ChartModel {
    pub fn new(timeline: TimelinePolicy) -> Self {
        Self {
            labels: Vec::new(),
            datasets: Appliance::ALL.map(ChartSeries::for_appliance),
            timeline,
        }
    }

    /// Returns whether the timestamp was added to the timeline.
    pub fn append_timestamp(&mut self, at: DateTime<Utc>) -> bool {
        if self.timeline == TimelinePolicy::SkipDuplicates && self.labels.contains(&at) {
            return false;
        }
        self.labels.push(at);
        true
    }

    pub fn append_sample(&mut self, appliance: Appliance, consumption: f64) {
        self.datasets[appliance.series_index()].data.push(consumption);
    }

    pub fn ingest(&mut self, appliance: Appliance, reading: &Reading) {
        self.append_timestamp(reading.at);
        self.append_sample(appliance, reading.consumption);
    }

    /// Empties every series and the timeline in place.
    pub fn clear(&mut self) {
        for series in self.datasets.iter_mut() {
            series.data.clear();
        }
        self.labels.clear();
    }

    pub fn labels(&self) -> &[DateTime<Utc>] {
        &self.labels
    }

    pub fn series(&self, appliance: Appliance) -> &ChartSeries {
        &self.datasets[appliance.series_index()]
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty() && self.datasets.iter().all(|s| s.data.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeAxis {
    #[serde(rename = "type")]
    pub kind: String,
    pub time: TimeAxisFormat,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeAxisFormat {
    pub unit: String,
    pub tooltip_format: String,
    pub display_formats: DisplayFormats,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayFormats {
    pub minute: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueAxis {
    pub begin_at_zero: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scales {
    pub x: TimeAxis,
    pub y: ValueAxis,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartOptions {
    pub scales: Scales,
}

impl Default for ChartOptions {
    /// Minute-resolution time axis with a zero-based value axis
    fn default() -> Self {
        Self {
            scales: Scales {
                x: TimeAxis {
                    kind: "time".to_string(),
                    time: TimeAxisFormat {
                        unit: "minute".to_string(),
                        tooltip_format: "ll HH:mm".to_string(),
                        display_formats: DisplayFormats {
                            minute: "HH:mm".to_string(),
                        },
                    },
                },
                y: ValueAxis { begin_at_zero: true },
            },
        }
    }
}

/// Complete chart document in the shape a Chart.js line chart consumes
#[derive(Debug, Clone, Serialize)]
pub struct ChartView {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub data: ChartModel,
    pub options: ChartOptions,
}

impl ChartView {
    pub fn line(data: ChartModel, options: ChartOptions) -> Self {
        Self {
            kind: "line",
            data,
            options,
        }
    }
}
