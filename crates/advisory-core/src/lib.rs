pub mod config;
pub mod error;
pub mod types;

#[cfg(feature = "classification")]
pub mod classification;

#[cfg(feature = "retirement")]
pub mod retirement;

#[cfg(feature = "profiling")]
pub mod profiling;

#[cfg(feature = "allocation")]
pub mod allocation;

#[cfg(feature = "analytics")]
pub mod analytics;

pub use config::EngineConfig;
pub use error::AdvisoryError;
pub use types::*;

/// Standard result type for all advisory operations
pub type AdvisoryResult<T> = Result<T, AdvisoryError>;
