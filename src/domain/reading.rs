// Real-time reading domain model
use super::error::DashboardError;
use chrono::{DateTime, Utc};

/// One consumption sample reported by the backend for a single appliance
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reading {
    pub at: DateTime<Utc>,
    pub consumption: f64,
}

impl Reading {
    pub fn new(at: DateTime<Utc>, consumption: f64) -> Self {
        Self { at, consumption }
    }

    /// Build a reading from a Unix timestamp in (possibly fractional) seconds.
    /// Sub-millisecond digits are truncated.
    pub fn from_unix_seconds(
        endpoint: &str,
        seconds: f64,
        consumption: f64,
    ) -> Result<Self, DashboardError> {
        if !seconds.is_finite() {
            return Err(DashboardError::malformed(endpoint, "timestamp is not a finite number"));
        }
        if !consumption.is_finite() {
            return Err(DashboardError::malformed(endpoint, "consumption is not a finite number"));
        }

        let millis = (seconds * 1000.0).trunc();
        if millis < i64::MIN as f64 || millis > i64::MAX as f64 {
            return Err(DashboardError::malformed(endpoint, format!("timestamp {} out of range", seconds)));
        }

        let at = DateTime::from_timestamp_millis(millis as i64).ok_or_else(|| {
            DashboardError::malformed(endpoint, format!("timestamp {} out of range", seconds))
        })?;

        Ok(Self::new(at, consumption))
    }
}
