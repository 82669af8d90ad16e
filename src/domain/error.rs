//! Dashboard error types

use thiserror::Error;

/// Errors raised while talking to the energy backend or handling user input
#[derive(Error, Debug)]
pub enum DashboardError {
    /// The request never completed (connect failure, timeout, broken body)
    #[error("request to {endpoint} failed: {reason}")]
    NetworkFailure { endpoint: String, reason: String },

    /// The backend answered with a non-success status
    #[error("{endpoint} responded with status {status}: {body}")]
    ServerError {
        endpoint: String,
        status: u16,
        body: String,
    },

    /// The body did not carry the expected fields
    #[error("malformed response from {endpoint}: {reason}")]
    MalformedResponse { endpoint: String, reason: String },

    /// Identifier outside the fixed appliance set
    #[error("unknown appliance: {0}")]
    UnknownAppliance(String),

    #[error("failed to build HTTP client: {0}")]
    Client(String),
}

impl DashboardError {
    pub fn malformed(endpoint: impl Into<String>, reason: impl Into<String>) -> Self {
        DashboardError::MalformedResponse {
            endpoint: endpoint.into(),
            reason: reason.into(),
        }
    }
}
