pub mod equity_curve;
pub mod statistics;
pub mod summary;
pub mod timeline;
