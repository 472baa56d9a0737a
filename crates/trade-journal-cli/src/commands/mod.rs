pub mod analytics;
pub mod trade;
