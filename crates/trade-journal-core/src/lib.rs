pub mod error;
pub mod journal;
pub mod settings;
pub mod types;

#[cfg(feature = "analytics")]
pub mod analytics;

pub use error::JournalError;
pub use types::*;

/// Standard result type for all trade-journal operations
pub type JournalResult<T> = Result<T, JournalError>;
