// Domain layer - Appliances, readings, chart model and reports
pub mod appliance;
pub mod chart;
pub mod error;
pub mod reading;
pub mod report;
